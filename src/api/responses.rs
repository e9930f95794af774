//! JSON shapes returned by the genealogy API.
//!
//! Field names follow the server; aliases cover the French and English
//! spellings it has used.

use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::graph::{
    Gender, HierarchyNode, Person, UnifiedGraph, build_hierarchy, build_unified_graph,
    compute_generations_from_links, name_list,
};

/// `GET /api/hierarchical-tree`.
///
/// Current servers send the raw `personnes`; older ones a prebuilt
/// `hierarchy`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HierarchicalTreeResponse {
    #[serde(default)]
    pub personnes: Option<Vec<Person>>,
    #[serde(default)]
    pub hierarchy: Option<Vec<HierarchyNode>>,
}

impl HierarchicalTreeResponse {
    /// Forest for the tree view, built locally when persons are present.
    pub fn into_forest(self) -> Result<Vec<HierarchyNode>, ApiError> {
        let forest = match (self.personnes, self.hierarchy) {
            (Some(personnes), _) if !personnes.is_empty() => build_hierarchy(&personnes),
            (_, Some(hierarchy)) => hierarchy,
            _ => Vec::new(),
        };
        if forest.is_empty() {
            return Err(ApiError::Empty);
        }
        Ok(forest)
    }

    /// Unified graph of the persons, for the initial-load fallback.
    pub fn into_unified(self) -> Result<UnifiedGraph, ApiError> {
        match self.personnes {
            Some(personnes) if !personnes.is_empty() => Ok(build_unified_graph(&personnes)),
            _ => Err(ApiError::Empty),
        }
    }
}

/// `GET /api/tree`, `/api/ancestors/..`, `/api/descendants/..` and
/// `/api/relation-path`.
pub type GraphResponse = UnifiedGraph;

/// Drop id-less nodes and derive generations from the parent links.
pub fn prepare_graph(mut graph: GraphResponse) -> Result<UnifiedGraph, ApiError> {
    graph.nodes.retain(|node| !node.id.is_empty());
    if graph.nodes.is_empty() {
        return Err(ApiError::Empty);
    }
    compute_generations_from_links(&mut graph.nodes, &graph.links);
    Ok(graph)
}

/// A relative listed in person details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relative {
    pub name: String,
    #[serde(default, alias = "genre")]
    pub gender: Gender,
}

/// `GET /api/person/{id}`.
///
/// Relatives come either as `*_details` with genders or as bare names.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PersonDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "genre")]
    pub gender: Gender,
    #[serde(default, deserialize_with = "name_list")]
    pub parents: Vec<String>,
    #[serde(default, alias = "enfants", deserialize_with = "name_list")]
    pub children: Vec<String>,
    #[serde(default, alias = "conjoints", deserialize_with = "name_list")]
    pub spouses: Vec<String>,
    #[serde(default)]
    pub parents_details: Option<Vec<Relative>>,
    #[serde(default)]
    pub children_details: Option<Vec<Relative>>,
    #[serde(default)]
    pub spouses_details: Option<Vec<Relative>>,
}

/// One entry of `GET /api/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub name: String,
    #[serde(default, alias = "genre")]
    pub gender: Gender,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forest_from_personnes() {
        let json = r#"{"personnes":[
            {"name":"A","genre":"Homme","enfants":["B"]},
            {"name":"B","genre":"Femme","parents":["A"]}
        ]}"#;
        let response: HierarchicalTreeResponse = serde_json::from_str(json).unwrap();
        let forest = response.into_forest().unwrap();

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children[0].name, "B");
    }

    #[test]
    fn test_forest_from_legacy_hierarchy() {
        let json = r#"{"hierarchy":[{"id":"A","name":"A","genre":"Homme","children":[]}]}"#;
        let response: HierarchicalTreeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_forest().unwrap()[0].name, "A");
    }

    #[test]
    fn test_legacy_hierarchy_keeps_gender() {
        let json = r#"{"hierarchy":[{"id":"A","name":"A","gender":"Homme","children":[
            {"id":"B","name":"B","gender":"Femme","children":[]}
        ]}]}"#;
        let response: HierarchicalTreeResponse = serde_json::from_str(json).unwrap();
        let forest = response.into_forest().unwrap();

        assert_eq!(forest[0].genre, Gender::Male);
        assert_eq!(forest[0].children[0].genre, Gender::Female);
    }

    #[test]
    fn test_empty_hierarchy_is_error() {
        let response: HierarchicalTreeResponse = serde_json::from_str(r#"{"hierarchy":[]}"#).unwrap();
        assert_eq!(response.into_forest(), Err(ApiError::Empty));

        let response: HierarchicalTreeResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.into_unified(), Err(ApiError::Empty));
    }

    #[test]
    fn test_prepare_graph_normalises_and_assigns() {
        let json = r#"{
            "nodes":[{"id":"P","name":"P","gender":"Homme"},{"name":"K"},{"gender":"Femme"}],
            "links":[{"source":"P","target":"K","type":"parent"}]
        }"#;
        let response: GraphResponse = serde_json::from_str(json).unwrap();
        let graph = prepare_graph(response).unwrap();

        assert_eq!(graph.nodes.len(), 2, "node without id or name dropped");
        assert_eq!(graph.nodes[0].genre, Gender::Male);
        assert_eq!(graph.nodes[1].id, "K");
        assert_eq!(graph.nodes[1].generation, 1);
    }

    #[test]
    fn test_prepare_empty_graph() {
        assert_eq!(prepare_graph(UnifiedGraph::default()), Err(ApiError::Empty));
    }

    #[test]
    fn test_person_details_both_shapes() {
        let json = r#"{
            "id":"C","name":"C","gender":"Femme",
            "parents":["A","B"],"children":[],"spouses":["D"],
            "parents_details":[{"name":"A","gender":"Homme"},{"name":"B","gender":"Femme"}],
            "children_details":[],
            "spouses_details":[{"name":"D","gender":"Homme"}]
        }"#;
        let details: PersonDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.gender, Gender::Female);
        assert_eq!(details.parents_details.as_ref().map(Vec::len), Some(2));

        let bare: PersonDetails = serde_json::from_str(r#"{"name":"C","enfants":["X"]}"#).unwrap();
        assert_eq!(bare.children, vec!["X"]);
        assert!(bare.children_details.is_none());
    }

    #[test]
    fn test_search_hits() {
        let hits: Vec<SearchHit> =
            serde_json::from_str(r#"[{"id":"Ana","name":"Ana","gender":"Femme"},{"name":"Anatole"}]"#).unwrap();
        assert_eq!(hits[0].gender, Gender::Female);
        assert_eq!(hits[1].gender, Gender::Unknown);
    }
}
