//! LayoutCoordinator - owner of the active view.
//!
//! Exactly one view is active at a time: a force graph or a tidy tree.
//! Showing a new view drops the previous one together with its solver
//! and bumps the epoch, so a frame loop started for an older view can
//! detect that it is stale and never touches the new build.

use super::banding::{GenerationBands, layout_with_config};
use super::simulation::Simulation;
use super::tidy_tree::{CollapseState, TidyTreeLayout, TreeLayout, find_path};
use crate::config::LayoutConfig;
use crate::graph::{HierarchyNode, Person, UnifiedGraph, build_unified_graph};
use crate::presentation::{LOCAL_SEARCH_LIMIT, search_names};
use crate::spatial::SpatialIndex;

/// Force-directed graph view.
pub struct GraphView {
    pub graph: UnifiedGraph,
    pub bands: GenerationBands,
    simulation: Simulation,
}

/// Collapsible tree view.
pub struct TreeView {
    pub forest: Vec<HierarchyNode>,
    pub collapse: CollapseState,
    pub layout: TreeLayout,
}

pub enum ActiveView {
    Graph(GraphView),
    Tree(TreeView),
}

/// Layout context for one canvas.
pub struct LayoutCoordinator {
    config: LayoutConfig,
    width: f32,
    height: f32,
    epoch: u64,
    view: Option<ActiveView>,
    spatial: SpatialIndex,
    spatial_dirty: bool,
}

impl LayoutCoordinator {
    pub fn new(config: LayoutConfig, width: f32, height: f32) -> Self {
        Self {
            config,
            width,
            height,
            epoch: 0,
            view: None,
            spatial: SpatialIndex::new(),
            spatial_dirty: false,
        }
    }

    pub fn with_defaults(width: f32, height: f32) -> Self {
        Self::new(LayoutConfig::default(), width, height)
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Identifier of the current build.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn view(&self) -> Option<&ActiveView> {
        self.view.as_ref()
    }

    /// Nodes and links of the graph view.
    pub fn graph(&self) -> Option<&UnifiedGraph> {
        match &self.view {
            Some(ActiveView::Graph(view)) => Some(&view.graph),
            _ => None,
        }
    }

    /// Positioned nodes of the tree view.
    pub fn tree(&self) -> Option<&TreeLayout> {
        match &self.view {
            Some(ActiveView::Tree(view)) => Some(&view.layout),
            _ => None,
        }
    }

    fn replace_view(&mut self, view: Option<ActiveView>) -> u64 {
        self.epoch += 1;
        self.view = view;
        self.spatial_dirty = true;
        self.epoch
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Show the unified graph of a person list.
    pub fn show_persons(&mut self, persons: &[Person]) -> u64 {
        self.show_graph(build_unified_graph(persons))
    }

    /// Show a generation-annotated graph: band it, then start relaxing.
    pub fn show_graph(&mut self, mut graph: UnifiedGraph) -> u64 {
        let bands = layout_with_config(&mut graph.nodes, self.width, self.height, &self.config.bands);
        let mut simulation = Simulation::new(&graph.nodes, &graph.links, self.config.simulation.clone());
        simulation.start();

        log::info!(
            "graph view: {} nodes, {} links, max generation {}",
            graph.nodes.len(),
            graph.links.len(),
            graph.max_generation()
        );
        self.replace_view(Some(ActiveView::Graph(GraphView {
            graph,
            bands,
            simulation,
        })))
    }

    /// Show a forest as a collapsible tree.
    pub fn show_hierarchy(&mut self, forest: Vec<HierarchyNode>) -> u64 {
        let collapse = CollapseState::initial(&forest, self.config.tree.collapse_depth);
        let layout = self.layout_tree(&forest, &collapse);

        log::info!(
            "tree view: {} roots, {} visible nodes, {} collapsed",
            forest.len(),
            layout.nodes.len(),
            collapse.len()
        );
        self.replace_view(Some(ActiveView::Tree(TreeView {
            forest,
            collapse,
            layout,
        })))
    }

    fn layout_tree(&self, forest: &[HierarchyNode], collapse: &CollapseState) -> TreeLayout {
        TidyTreeLayout::new(self.config.tree.clone()).compute(forest, collapse, self.width, self.height)
    }

    /// Drop the active view and its solver.
    pub fn clear(&mut self) {
        self.replace_view(None);
        self.spatial.clear();
        self.spatial_dirty = false;
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    fn graph_view_mut(&mut self) -> Option<&mut GraphView> {
        match &mut self.view {
            Some(ActiveView::Graph(view)) => Some(view),
            _ => None,
        }
    }

    /// Advance the solver of build `epoch` by `dt` seconds.
    ///
    /// Returns false when `epoch` is stale, no graph view is active or
    /// the solver has stopped; the frame loop should end then.
    pub fn tick(&mut self, epoch: u64, dt: f32) -> bool {
        if epoch != self.epoch {
            return false;
        }
        let Some(view) = self.graph_view_mut() else {
            return false;
        };
        let running = view.simulation.tick(dt, &mut view.graph.nodes, &view.bands);
        self.spatial_dirty = true;
        running
    }

    pub fn is_running(&self) -> bool {
        matches!(&self.view, Some(ActiveView::Graph(view)) if view.simulation.is_running())
    }

    pub fn stop(&mut self) {
        if let Some(view) = self.graph_view_mut() {
            view.simulation.stop();
        }
    }

    pub fn restart(&mut self) {
        if let Some(view) = self.graph_view_mut() {
            view.simulation.restart();
        }
    }

    // =========================================================================
    // Drag
    // =========================================================================

    /// Pin a graph node where it is and reheat the solver.
    pub fn drag_start(&mut self, index: usize) -> bool {
        let Some(view) = self.graph_view_mut() else {
            return false;
        };
        let Some(node) = view.graph.nodes.get_mut(index) else {
            return false;
        };
        let (x, y) = (node.x, node.y);
        node.fix_at(x, y);
        view.simulation.reheat();
        true
    }

    /// Move a dragged node.
    pub fn drag_to(&mut self, index: usize, x: f32, y: f32) -> bool {
        let Some(view) = self.graph_view_mut() else {
            return false;
        };
        let Some(node) = view.graph.nodes.get_mut(index) else {
            return false;
        };
        node.fix_at(x, y);
        self.spatial_dirty = true;
        true
    }

    /// Release a dragged node and let the solver cool.
    pub fn drag_end(&mut self, index: usize) -> bool {
        let Some(view) = self.graph_view_mut() else {
            return false;
        };
        let Some(node) = view.graph.nodes.get_mut(index) else {
            return false;
        };
        node.release();
        view.simulation.cool();
        true
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// Collapse or expand the tree node at `path`.
    ///
    /// Returns the new collapsed state, or None when no tree is shown or
    /// the path does not name a node with children.
    pub fn toggle_collapse(&mut self, path: &str) -> Option<bool> {
        let tree_config = self.config.tree.clone();
        let (width, height) = (self.width, self.height);
        let Some(ActiveView::Tree(view)) = &mut self.view else {
            return None;
        };
        if find_path(&view.forest, path).is_none_or(|node| node.children.is_empty()) {
            return None;
        }

        let collapsed = view.collapse.toggle(path);
        view.layout = TidyTreeLayout::new(tree_config).compute(&view.forest, &view.collapse, width, height);
        self.spatial_dirty = true;
        Some(collapsed)
    }

    // =========================================================================
    // Canvas
    // =========================================================================

    /// Re-lay out the active view for a new canvas size.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        let bands = self.config.bands.clone();
        let tree_config = self.config.tree.clone();

        match &mut self.view {
            Some(ActiveView::Graph(view)) => {
                view.bands = layout_with_config(&mut view.graph.nodes, width, height, &bands);
                view.simulation.start();
            }
            Some(ActiveView::Tree(view)) => {
                view.layout = TidyTreeLayout::new(tree_config).compute(&view.forest, &view.collapse, width, height);
            }
            None => {}
        }
        self.spatial_dirty = true;
    }

    /// Index of the node under a point, in the active view's node list.
    pub fn node_at(&mut self, x: f32, y: f32) -> Option<usize> {
        if self.spatial_dirty {
            self.rebuild_spatial_index();
        }
        self.spatial
            .nearest_within(x, y, self.config.hit_radius)
            .map(|id| id.index())
    }

    fn rebuild_spatial_index(&mut self) {
        match &self.view {
            Some(ActiveView::Graph(view)) => self.spatial.rebuild(view.graph.nodes.iter().map(|n| (n.x, n.y))),
            Some(ActiveView::Tree(view)) => self.spatial.rebuild(view.layout.nodes.iter().map(|n| (n.x, n.y))),
            None => self.spatial.clear(),
        }
        self.spatial_dirty = false;
    }

    /// Names in the active view matching `query`, for offline suggestions.
    pub fn search(&self, query: &str) -> Vec<String> {
        let hits = match &self.view {
            Some(ActiveView::Graph(view)) => search_names(
                view.graph.nodes.iter().map(|n| n.name.as_str()),
                query,
                LOCAL_SEARCH_LIMIT,
            ),
            Some(ActiveView::Tree(view)) => search_names(
                view.layout
                    .nodes
                    .iter()
                    .filter(|n| !n.synthetic)
                    .map(|n| n.name.as_str()),
                query,
                LOCAL_SEARCH_LIMIT,
            ),
            None => Vec::new(),
        };
        hits.into_iter().map(str::to_string).collect()
    }
}
