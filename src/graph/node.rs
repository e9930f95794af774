//! Node types and related structures.
//!
//! Two node shapes leave the graph module:
//! - [`GraphNode`]: one per person, positioned by the force layout
//! - [`HierarchyNode`]: one per tree occurrence, a person may repeat
//!
//! [`NodeId`] is the dense index used internally by the lineage graph
//! and the spatial index.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::person::{Gender, Person, gender_from_labels, name_list};

/// Dense node identifier.
///
/// Indexes the node list of the current build. Wraps a u32 for
/// efficient storage and WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a NodeId from a list position.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position in the node list.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

// ============================================================================
// Force-graph node
// ============================================================================

/// A person in the unified graph.
///
/// `fx`/`fy` are fixed-position overrides: set by banded placement and
/// while dragging, cleared when a drag ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGraphNode")]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub genre: Gender,
    pub parents: Vec<String>,
    pub enfants: Vec<String>,
    pub conjoints: Vec<String>,
    pub generation: u32,
    pub x: f32,
    pub y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fx: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fy: Option<f32>,
}

impl GraphNode {
    /// Node for a person record, generation 0, at the origin.
    pub fn from_person(person: &Person) -> Self {
        Self {
            id: person.name.clone(),
            name: person.name.clone(),
            genre: person.genre,
            parents: person.parents.clone(),
            enfants: person.enfants.clone(),
            conjoints: person.conjoints.clone(),
            generation: 0,
            x: 0.0,
            y: 0.0,
            fx: None,
            fy: None,
        }
    }

    /// Whether a fixed position override is active.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.fx.is_some() || self.fy.is_some()
    }

    /// Fix the node at a position.
    pub fn fix_at(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.fx = Some(x);
        self.fy = Some(y);
    }

    /// Drop the fixed override, keeping the current position.
    pub fn release(&mut self) {
        self.fx = None;
        self.fy = None;
    }
}

/// Lenient wire shape for API nodes: `id` and `name` stand in for each
/// other, `genre` falls back to `gender`.
#[derive(Deserialize)]
struct RawGraphNode {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default, deserialize_with = "name_list")]
    parents: Vec<String>,
    #[serde(default, alias = "children", deserialize_with = "name_list")]
    enfants: Vec<String>,
    #[serde(default, alias = "spouses", deserialize_with = "name_list")]
    conjoints: Vec<String>,
    #[serde(default)]
    generation: Option<u32>,
    #[serde(default)]
    x: Option<f32>,
    #[serde(default)]
    y: Option<f32>,
    #[serde(default)]
    fx: Option<f32>,
    #[serde(default)]
    fy: Option<f32>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<RawGraphNode> for GraphNode {
    fn from(raw: RawGraphNode) -> Self {
        let id = non_empty(raw.id);
        let name = non_empty(raw.name);
        let genre = gender_from_labels(raw.genre, raw.gender);

        Self {
            id: id.clone().or_else(|| name.clone()).unwrap_or_default(),
            name: name.or(id).unwrap_or_default(),
            genre,
            parents: raw.parents,
            enfants: raw.enfants,
            conjoints: raw.conjoints,
            generation: raw.generation.unwrap_or(0),
            x: raw.x.unwrap_or(0.0),
            y: raw.y.unwrap_or(0.0),
            fx: raw.fx,
            fy: raw.fy,
        }
    }
}

// ============================================================================
// Hierarchy node
// ============================================================================

/// One occurrence of a person in the rooted forest.
///
/// `children` holds the nested subtrees; `enfants` keeps the raw child
/// names, so a node can still report children that were cut by the
/// cycle guard or are dangling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawHierarchyNode")]
pub struct HierarchyNode {
    pub id: String,
    pub name: String,
    pub genre: Gender,
    pub children: Vec<HierarchyNode>,
    pub parents: Vec<String>,
    pub conjoints: Vec<String>,
    pub enfants: Vec<String>,
}

/// Wire shape of a forest node. Prebuilt server forests send `gender`,
/// forests built here send `genre`.
#[derive(Deserialize)]
struct RawHierarchyNode {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    children: Vec<HierarchyNode>,
    #[serde(default, deserialize_with = "name_list")]
    parents: Vec<String>,
    #[serde(default, alias = "spouses", deserialize_with = "name_list")]
    conjoints: Vec<String>,
    #[serde(default, deserialize_with = "name_list")]
    enfants: Vec<String>,
}

impl From<RawHierarchyNode> for HierarchyNode {
    fn from(raw: RawHierarchyNode) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            genre: gender_from_labels(raw.genre, raw.gender),
            children: raw.children,
            parents: raw.parents,
            conjoints: raw.conjoints,
            enfants: raw.enfants,
        }
    }
}

impl HierarchyNode {
    /// Leaf occurrence of a person.
    pub fn from_person(person: &Person) -> Self {
        Self {
            id: person.name.clone(),
            name: person.name.clone(),
            genre: person.genre,
            children: Vec::new(),
            parents: person.parents.clone(),
            conjoints: person.conjoints.clone(),
            enfants: person.enfants.clone(),
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::from_index(42);
        assert_eq!(id.index(), 42);
        assert_eq!(format!("{}", id), "Node(42)");

        let raw: u32 = NodeId::from(7).into();
        assert_eq!(raw, 7);
    }

    #[test]
    fn test_graph_node_name_fallbacks() {
        let only_id: GraphNode = serde_json::from_str(r#"{"id":"Anne","gender":"Femme"}"#).unwrap();
        assert_eq!(only_id.name, "Anne");
        assert_eq!(only_id.genre, Gender::Female);

        let only_name: GraphNode = serde_json::from_str(r#"{"name":"Luc","genre":""}"#).unwrap();
        assert_eq!(only_name.id, "Luc");
        assert_eq!(only_name.genre, Gender::Unknown);
        assert_eq!(only_name.generation, 0);
        assert!(!only_name.is_fixed());
    }

    #[test]
    fn test_graph_node_genre_precedence() {
        let node: GraphNode =
            serde_json::from_str(r#"{"name":"X","genre":"Homme","gender":"Femme"}"#).unwrap();
        assert_eq!(node.genre, Gender::Male);
    }

    #[test]
    fn test_graph_node_fix_and_release() {
        let mut node = GraphNode::from_person(&Person::new("A"));
        node.fix_at(10.0, 20.0);
        assert!(node.is_fixed());
        assert_eq!((node.x, node.y), (10.0, 20.0));

        node.release();
        assert!(!node.is_fixed());
        assert_eq!((node.x, node.y), (10.0, 20.0));
    }

    #[test]
    fn test_graph_node_serializes_without_free_overrides() {
        let node = GraphNode::from_person(&Person::new("A"));
        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("fx").is_none());
        assert_eq!(json["genre"], "Inconnu");
    }

    #[test]
    fn test_hierarchy_node_size() {
        let mut root = HierarchyNode::from_person(&Person::new("R"));
        let mut child = HierarchyNode::from_person(&Person::new("C"));
        child.children.push(HierarchyNode::from_person(&Person::new("G")));
        root.children.push(child);
        root.children.push(HierarchyNode::from_person(&Person::new("D")));

        assert_eq!(root.size(), 4);
    }
}
