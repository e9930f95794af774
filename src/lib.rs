//! Genealogy Graph - WASM Module
//!
//! Family-tree data handling and layout for the genealogy viewer. It is
//! compiled to WebAssembly and exposes a JavaScript-friendly API via
//! wasm-bindgen; the host page only draws what this module places.
//!
//! # Architecture
//!
//! - `graph`: Persons, generation assignment, hierarchy and unified graph building
//! - `layout`: Generation bands, force simulation, tidy tree and the view coordinator
//! - `spatial`: R-tree spatial indexing for hit testing
//! - `api`: Fetching views from the genealogy server
//! - `presentation`: Gender styling, detail panel formatting, local search
//! - `config`: Tunable layout constants

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use js_sys::{Float32Array, Promise};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

pub mod api;
pub mod config;
pub mod graph;
pub mod layout;
pub mod presentation;
pub mod spatial;

use api::{ApiClient, ApiError, Notice, NoticeContext, RequestTracker, ViewRequest};
use config::LayoutConfig;
use graph::{GraphLink, GraphNode, HierarchyNode, Person, UnifiedGraph};
use layout::{ActiveView, LayoutCoordinator};
use presentation::DetailsView;

/// Initialize the WASM module: console logging and readable panics.
#[wasm_bindgen(start)]
pub fn init() {
    let _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
    log::info!("genealogy graph module initialized");
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn notice_to_js(notice: &Notice) -> JsValue {
    to_js(notice).unwrap_or_else(|_| JsValue::from_str(&notice.message))
}

// =============================================================================
// Stateless functions
// =============================================================================

/// Build the parent-to-child forest of a person list.
#[wasm_bindgen(js_name = buildHierarchy)]
pub fn build_hierarchy(personnes: JsValue) -> Result<JsValue, JsValue> {
    let persons: Vec<Person> = from_js(personnes)?;
    to_js(&graph::build_hierarchy(&persons))
}

/// Annotate graph nodes with generations derived from the parent links.
///
/// Returns the nodes with their `generation` field set.
#[wasm_bindgen(js_name = computeGenerations)]
pub fn compute_generations(nodes: JsValue, links: JsValue) -> Result<JsValue, JsValue> {
    let mut nodes: Vec<GraphNode> = from_js(nodes)?;
    let links: Vec<GraphLink> = from_js(links)?;
    graph::compute_generations_from_links(&mut nodes, &links);
    to_js(&nodes)
}

/// Build the unified graph (nodes plus parent and spouse links).
#[wasm_bindgen(js_name = buildUnifiedGraph)]
pub fn build_unified_graph(personnes: JsValue) -> Result<JsValue, JsValue> {
    let persons: Vec<Person> = from_js(personnes)?;
    to_js(&graph::build_unified_graph(&persons))
}

/// Pin every node in its generation band on a `width` x `height` canvas.
///
/// Returns `{ nodes, links }`; links pass through unchanged.
#[wasm_bindgen(js_name = layoutGraphByGeneration)]
pub fn layout_graph_by_generation(
    nodes: JsValue,
    links: JsValue,
    width: f32,
    height: f32,
) -> Result<JsValue, JsValue> {
    let mut nodes: Vec<GraphNode> = from_js(nodes)?;
    let links: Vec<GraphLink> = from_js(links)?;
    layout::layout_graph_by_generation(&mut nodes, width, height);
    to_js(&UnifiedGraph { nodes, links })
}

/// Tidy tree layout of a forest with the default collapse state.
#[wasm_bindgen(js_name = layoutHierarchyTree)]
pub fn layout_hierarchy_tree(hierarchy: JsValue, width: f32, height: f32) -> Result<JsValue, JsValue> {
    let forest: Vec<HierarchyNode> = from_js(hierarchy)?;
    to_js(&layout::layout_hierarchy_tree(&forest, width, height))
}

/// Fill colour for a gender label ("Femme", "Homme", anything else).
#[wasm_bindgen(js_name = nodeFill)]
pub fn node_fill(genre: &str) -> String {
    presentation::node_fill(graph::Gender::from_label(genre)).to_string()
}

// =============================================================================
// Viewer
// =============================================================================

/// Main entry point for one genealogy canvas.
///
/// Owns the layout coordinator and the API client. Load methods return
/// promises that resolve to the epoch of the view they installed, or to
/// `false` when a newer request superseded them. Failures reject with a
/// `{ level, message }` notice and leave the current view untouched.
#[wasm_bindgen]
pub struct GenealogyGraphWasm {
    coordinator: Rc<RefCell<LayoutCoordinator>>,
    api: ApiClient,
    views: Rc<RequestTracker>,
    details: Rc<RequestTracker>,
    searches: Rc<RequestTracker>,
}

#[wasm_bindgen]
impl GenealogyGraphWasm {
    /// Create a viewer talking to `base_url` ("" for same origin).
    ///
    /// `config` may be a partial layout configuration object.
    #[wasm_bindgen(constructor)]
    pub fn new(base_url: &str, width: f32, height: f32, config: Option<JsValue>) -> Result<GenealogyGraphWasm, JsValue> {
        let config = match config {
            Some(value) if !value.is_undefined() && !value.is_null() => from_js::<LayoutConfig>(value)?,
            _ => LayoutConfig::default(),
        };
        Ok(Self {
            coordinator: Rc::new(RefCell::new(LayoutCoordinator::new(config, width, height))),
            api: ApiClient::new(base_url),
            views: Rc::new(RequestTracker::new()),
            details: Rc::new(RequestTracker::new()),
            searches: Rc::new(RequestTracker::new()),
        })
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load the full network, falling back to the raw persons.
    #[wasm_bindgen(js_name = loadInitial)]
    pub fn load_initial(&self) -> Promise {
        let api = self.api.clone();
        self.load_view(
            NoticeContext::Graph,
            async move { api.load_initial().await },
            |coordinator, graph| coordinator.show_graph(graph),
        )
    }

    /// Load the collapsible tree view.
    #[wasm_bindgen(js_name = loadHierarchy)]
    pub fn load_hierarchy(&self) -> Promise {
        let api = self.api.clone();
        self.load_view(
            NoticeContext::Hierarchy,
            async move { api.load_hierarchy().await },
            |coordinator, forest| coordinator.show_hierarchy(forest),
        )
    }

    #[wasm_bindgen(js_name = loadFullTree)]
    pub fn load_full_tree(&self) -> Promise {
        self.load_graph_view(ViewRequest::FullTree)
    }

    #[wasm_bindgen(js_name = loadAncestors)]
    pub fn load_ancestors(&self, name: &str) -> Promise {
        self.load_graph_view(ViewRequest::Ancestors(name.to_string()))
    }

    #[wasm_bindgen(js_name = loadDescendants)]
    pub fn load_descendants(&self, name: &str) -> Promise {
        self.load_graph_view(ViewRequest::Descendants(name.to_string()))
    }

    /// Load the shortest relation between two persons.
    #[wasm_bindgen(js_name = loadRelationPath)]
    pub fn load_relation_path(&self, person1: &str, person2: &str) -> Promise {
        self.load_graph_view(ViewRequest::RelationPath(person1.to_string(), person2.to_string()))
    }

    /// Fetch the detail panel of a person.
    ///
    /// Resolves to the formatted panel, or `null` when a newer details
    /// request was made meanwhile.
    #[wasm_bindgen(js_name = personDetails)]
    pub fn person_details(&self, name: &str) -> Promise {
        let api = self.api.clone();
        let details = Rc::clone(&self.details);
        let ticket = details.issue();
        let name = name.to_string();

        future_to_promise(async move {
            let result = api.person_details(&name).await;
            if !details.is_current(ticket) {
                return Ok(JsValue::NULL);
            }
            match result {
                Ok(person) => to_js(&DetailsView::new(&person)),
                Err(error) => {
                    log::warn!("details of {} failed: {}", name, error);
                    Err(notice_to_js(&Notice::from_error(&error, NoticeContext::Details)))
                }
            }
        })
    }

    /// Server-side name search. Resolves to `[{ name, gender }]`, or
    /// `null` when superseded.
    #[wasm_bindgen(js_name = searchRemote)]
    pub fn search_remote(&self, query: &str) -> Promise {
        let api = self.api.clone();
        let searches = Rc::clone(&self.searches);
        let ticket = searches.issue();
        let query = query.to_string();

        future_to_promise(async move {
            let result = api.search(&query).await;
            if !searches.is_current(ticket) {
                return Ok(JsValue::NULL);
            }
            match result {
                Ok(hits) => to_js(&hits),
                Err(error) => Err(JsValue::from_str(&error.to_string())),
            }
        })
    }

    /// Drop any in-flight view responses.
    #[wasm_bindgen(js_name = cancelPending)]
    pub fn cancel_pending(&self) {
        self.views.cancel_all();
        self.details.cancel_all();
        self.searches.cancel_all();
    }

    // =========================================================================
    // Local views
    // =========================================================================

    /// Show the unified graph of a person list. Returns the new epoch.
    #[wasm_bindgen(js_name = showPersons)]
    pub fn show_persons(&self, personnes: JsValue) -> Result<f64, JsValue> {
        let persons: Vec<Person> = from_js(personnes)?;
        self.views.cancel_all();
        Ok(self.coordinator.borrow_mut().show_persons(&persons) as f64)
    }

    /// Show a forest as a tree. Returns the new epoch.
    #[wasm_bindgen(js_name = showHierarchy)]
    pub fn show_hierarchy(&self, hierarchy: JsValue) -> Result<f64, JsValue> {
        let forest: Vec<HierarchyNode> = from_js(hierarchy)?;
        self.views.cancel_all();
        Ok(self.coordinator.borrow_mut().show_hierarchy(forest) as f64)
    }

    /// Drop the active view.
    pub fn clear(&self) {
        self.views.cancel_all();
        self.coordinator.borrow_mut().clear();
    }

    /// Epoch of the active build.
    #[wasm_bindgen(getter)]
    pub fn epoch(&self) -> f64 {
        self.coordinator.borrow().epoch() as f64
    }

    /// Nodes and links of the graph view, or `null`.
    pub fn graph(&self) -> Result<JsValue, JsValue> {
        match self.coordinator.borrow().graph() {
            Some(graph) => to_js(graph),
            None => Ok(JsValue::NULL),
        }
    }

    /// Positioned nodes and links of the tree view, or `null`.
    pub fn tree(&self) -> Result<JsValue, JsValue> {
        match self.coordinator.borrow().tree() {
            Some(tree) => to_js(tree),
            None => Ok(JsValue::NULL),
        }
    }

    /// Node positions of the active view as [x0, y0, x1, y1, ...].
    ///
    /// Cheaper than `graph()` for redrawing every frame.
    pub fn positions(&self) -> Float32Array {
        let coordinator = self.coordinator.borrow();
        let positions: Vec<f32> = match coordinator.view() {
            Some(ActiveView::Graph(view)) => view.graph.nodes.iter().flat_map(|n| [n.x, n.y]).collect(),
            Some(ActiveView::Tree(view)) => view.layout.nodes.iter().flat_map(|n| [n.x, n.y]).collect(),
            None => Vec::new(),
        };
        Float32Array::from(positions.as_slice())
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Advance the simulation of build `epoch` by `dt` seconds.
    ///
    /// Returns false once the frame loop should stop.
    pub fn tick(&self, epoch: f64, dt: f32) -> bool {
        self.coordinator.borrow_mut().tick(epoch as u64, dt)
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.coordinator.borrow().is_running()
    }

    pub fn stop(&self) {
        self.coordinator.borrow_mut().stop();
    }

    pub fn restart(&self) {
        self.coordinator.borrow_mut().restart();
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&self, index: usize) -> bool {
        self.coordinator.borrow_mut().drag_start(index)
    }

    #[wasm_bindgen(js_name = dragTo)]
    pub fn drag_to(&self, index: usize, x: f32, y: f32) -> bool {
        self.coordinator.borrow_mut().drag_to(index, x, y)
    }

    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&self, index: usize) -> bool {
        self.coordinator.borrow_mut().drag_end(index)
    }

    /// Collapse or expand a tree node. Returns the new collapsed state,
    /// or undefined when the path names no expandable node.
    #[wasm_bindgen(js_name = toggleCollapse)]
    pub fn toggle_collapse(&self, path: &str) -> Option<bool> {
        self.coordinator.borrow_mut().toggle_collapse(path)
    }

    pub fn resize(&self, width: f32, height: f32) {
        self.coordinator.borrow_mut().resize(width, height);
    }

    /// Index of the node under the pointer, or undefined.
    #[wasm_bindgen(js_name = nodeAt)]
    pub fn node_at(&self, x: f32, y: f32) -> Option<u32> {
        self.coordinator.borrow_mut().node_at(x, y).map(|i| i as u32)
    }

    /// Names in the active view matching `query`.
    pub fn search(&self, query: &str) -> Vec<String> {
        self.coordinator.borrow().search(query)
    }
}

impl GenealogyGraphWasm {
    fn load_view<T, F, A>(&self, context: NoticeContext, fetch: F, apply: A) -> Promise
    where
        T: 'static,
        F: Future<Output = Result<T, ApiError>> + 'static,
        A: FnOnce(&mut LayoutCoordinator, T) -> u64 + 'static,
    {
        let coordinator = Rc::clone(&self.coordinator);
        let views = Rc::clone(&self.views);
        let ticket = views.issue();

        future_to_promise(async move {
            let result = fetch.await;
            if !views.is_current(ticket) {
                log::debug!("dropping superseded view response");
                return Ok(JsValue::FALSE);
            }
            match result {
                Ok(data) => {
                    let mut coordinator = coordinator.borrow_mut();
                    let epoch = apply(&mut *coordinator, data);
                    Ok(JsValue::from_f64(epoch as f64))
                }
                Err(error) => {
                    log::warn!("view load failed: {}", error);
                    Err(notice_to_js(&Notice::from_error(&error, context)))
                }
            }
        })
    }

    fn load_graph_view(&self, request: ViewRequest) -> Promise {
        if let Err(error) = request.path() {
            return Promise::reject(&notice_to_js(&Notice::from_error(&error, NoticeContext::Graph)));
        }
        let api = self.api.clone();
        self.load_view(
            NoticeContext::Graph,
            async move { api.load_graph(&request).await },
            |coordinator, graph| coordinator.show_graph(graph),
        )
    }
}

// =============================================================================
// Integration tests
// =============================================================================
