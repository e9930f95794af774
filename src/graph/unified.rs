//! Unified graph: one node per person, deduplicated parent and spouse
//! links, every node annotated with its generation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::generation::compute_generations;
use super::link::GraphLink;
use super::node::GraphNode;
use super::person::Person;
use super::registry::Registry;

/// Node and link arrays ready for the force layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnifiedGraph {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

impl UnifiedGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Deepest generation among the nodes.
    pub fn max_generation(&self) -> u32 {
        self.nodes.iter().map(|n| n.generation).max().unwrap_or(0)
    }

    /// Position of a node by id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }
}

/// Build the unified graph of a person list.
///
/// Nodes follow registry order. Parent links come from each node's
/// `parents` list only, so re-deriving parents from the links gives
/// back the recorded ones; `enfants` still feeds generation assignment.
/// Spouse links are emitted only from the lexicographically smaller
/// side. Dangling names produce nothing.
pub fn build_unified_graph(persons: &[Person]) -> UnifiedGraph {
    let registry = Registry::new(persons);
    let generations = compute_generations(&registry);

    let nodes: Vec<GraphNode> = registry
        .iter()
        .map(|person| GraphNode {
            generation: generations.get(&person.name).unwrap_or(0),
            ..GraphNode::from_person(person)
        })
        .collect();

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    let mut push = |link: GraphLink| {
        if seen.insert(link.key()) {
            links.push(link);
        }
    };

    for person in registry.iter() {
        let name = person.name.as_str();
        for parent in person.parents.iter().filter(|p| registry.contains(p)) {
            if parent != name {
                push(GraphLink::parent(parent.as_str(), name));
            }
        }
        for spouse in person.conjoints.iter().filter(|s| registry.contains(s)) {
            if name < spouse.as_str() {
                push(GraphLink::spouse(name, spouse.as_str()));
            }
        }
    }

    log::debug!(
        "unified graph built: {} node(s), {} link(s), max generation {}",
        nodes.len(),
        links.len(),
        generations.max_generation()
    );

    UnifiedGraph { nodes, links }
}
