//! API client for genealogy data.
//!
//! Uses web-sys fetch on wasm32. Other targets have no browser to fetch
//! with, so every request fails with [`ApiError::NoWindow`] there; the
//! path builders and decoding stay testable natively.

use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::responses::{
    GraphResponse, HierarchicalTreeResponse, PersonDetails, SearchHit, prepare_graph,
};
use crate::graph::{HierarchyNode, UnifiedGraph};

/// A graph view the server can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRequest {
    /// Whole family network.
    FullTree,
    Ancestors(String),
    Descendants(String),
    /// Shortest relation between two persons.
    RelationPath(String, String),
}

fn required(name: &str) -> Result<&str, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        Err(ApiError::MissingName)
    } else {
        Ok(name)
    }
}

impl ViewRequest {
    /// Request path with percent-encoded segments.
    pub fn path(&self) -> Result<String, ApiError> {
        Ok(match self {
            ViewRequest::FullTree => "/api/tree".to_string(),
            ViewRequest::Ancestors(name) => {
                format!("/api/ancestors/{}", urlencoding::encode(required(name)?))
            }
            ViewRequest::Descendants(name) => {
                format!("/api/descendants/{}", urlencoding::encode(required(name)?))
            }
            ViewRequest::RelationPath(a, b) => format!(
                "/api/relation-path?person1={}&person2={}",
                urlencoding::encode(required(a)?),
                urlencoding::encode(required(b)?)
            ),
        })
    }
}

pub const HIERARCHY_PATH: &str = "/api/hierarchical-tree";

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn person_path(name: &str) -> Result<String, ApiError> {
        Ok(format!("/api/person/{}", urlencoding::encode(required(name)?)))
    }

    pub fn search_path(query: &str) -> String {
        format!("/api/search?q={}", urlencoding::encode(query.trim()))
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;
        use web_sys::{Request, RequestInit, RequestMode, Response};

        let url = self.url(path);

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        let request = Request::new_with_str_and_init(&url, &opts)
            .map_err(|e| ApiError::Network(format!("request error: {:?}", e)))?;

        let window = web_sys::window().ok_or(ApiError::NoWindow)?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ApiError::Network(format!("{:?}", e)))?;

        let resp: Response = resp_value
            .dyn_into()
            .map_err(|_| ApiError::Network("response is not a Response".to_string()))?;

        if !resp.ok() {
            log::warn!("GET {} -> HTTP {}", path, resp.status());
            return Err(ApiError::Status(resp.status()));
        }

        let json = JsFuture::from(
            resp.json()
                .map_err(|e| ApiError::Decode(format!("json promise error: {:?}", e)))?,
        )
        .await
        .map_err(|e| ApiError::Decode(format!("{:?}", e)))?;

        serde_wasm_bindgen::from_value(json).map_err(|e| ApiError::Decode(e.to_string()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        log::warn!("GET {} unavailable outside the browser", self.url(path));
        Err(ApiError::NoWindow)
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Load a graph view, normalised and generation-annotated.
    pub async fn load_graph(&self, request: &ViewRequest) -> Result<UnifiedGraph, ApiError> {
        let path = request.path()?;
        let response: GraphResponse = self.get(&path).await?;
        prepare_graph(response)
    }

    /// Load the forest for the tree view.
    pub async fn load_hierarchy(&self) -> Result<Vec<HierarchyNode>, ApiError> {
        let response: HierarchicalTreeResponse = self.get(HIERARCHY_PATH).await?;
        response.into_forest()
    }

    /// Initial graph: the full tree, or the unified graph of the raw
    /// persons when the full tree is unusable.
    pub async fn load_initial(&self) -> Result<UnifiedGraph, ApiError> {
        match self.load_graph(&ViewRequest::FullTree).await {
            Ok(graph) => {
                log::info!("loaded /api/tree: {} nodes, {} links", graph.nodes.len(), graph.links.len());
                Ok(graph)
            }
            Err(error) => {
                log::warn!("/api/tree unusable ({}), falling back to {}", error, HIERARCHY_PATH);
                let response: HierarchicalTreeResponse = self.get(HIERARCHY_PATH).await?;
                response.into_unified()
            }
        }
    }

    // =========================================================================
    // Details and search
    // =========================================================================

    pub async fn person_details(&self, name: &str) -> Result<PersonDetails, ApiError> {
        let path = Self::person_path(name)?;
        self.get(&path).await
    }

    /// Server-side search. An empty query returns nothing without a request.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ApiError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.get(&Self::search_path(query)).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_paths_are_encoded() {
        assert_eq!(ViewRequest::FullTree.path().unwrap(), "/api/tree");
        assert_eq!(
            ViewRequest::Ancestors("Jean Dupont".into()).path().unwrap(),
            "/api/ancestors/Jean%20Dupont"
        );
        assert_eq!(
            ViewRequest::Descendants(" Éloïse ".into()).path().unwrap(),
            "/api/descendants/%C3%89lo%C3%AFse"
        );
        assert_eq!(
            ViewRequest::RelationPath("A&B".into(), "C/D".into()).path().unwrap(),
            "/api/relation-path?person1=A%26B&person2=C%2FD"
        );
    }

    #[test]
    fn test_missing_name() {
        assert_eq!(ViewRequest::Ancestors("  ".into()).path(), Err(ApiError::MissingName));
        assert_eq!(
            ViewRequest::RelationPath("A".into(), String::new()).path(),
            Err(ApiError::MissingName)
        );
        assert_eq!(ApiClient::person_path(""), Err(ApiError::MissingName));
    }

    #[test]
    fn test_urls() {
        let client = ApiClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url(HIERARCHY_PATH), "http://localhost:5000/api/hierarchical-tree");
        assert_eq!(ApiClient::search_path("ma rie"), "/api/search?q=ma%20rie");
        assert_eq!(ApiClient::person_path("Zoé").unwrap(), "/api/person/Zo%C3%A9");
    }
}
