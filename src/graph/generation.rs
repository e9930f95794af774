//! Generation assignment.
//!
//! Generations are longest-path depths from the roots of the parent
//! relation. Two sources feed the same [`Lineage`] propagation: raw
//! person records (both `parents` and `enfants` lists) and API graphs
//! (parent-typed links).

use std::collections::HashMap;

use super::lineage::Lineage;
use super::link::GraphLink;
use super::node::{GraphNode, NodeId};
use super::registry::Registry;

/// Name → generation for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationMap {
    by_name: HashMap<String, u32>,
    max: u32,
}

impl GenerationMap {
    /// Generation of a person, if it belongs to the build.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    /// Deepest generation, 0 when empty.
    pub fn max_generation(&self) -> u32 {
        self.max
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Parent edges of a registry, resolved to dense ids.
///
/// Edges come from each person's `parents` list and from its `enfants`
/// list; names that do not resolve are dropped.
pub(crate) fn registry_lineage(registry: &Registry<'_>) -> Lineage {
    let mut lineage = Lineage::with_nodes(registry.len());

    for (position, person) in registry.iter().enumerate() {
        let me = NodeId::from_index(position);
        for parent in &person.parents {
            if let Some(p) = registry.position(parent) {
                lineage.add_parent_edge(NodeId::from_index(p), me);
            }
        }
        for child in &person.enfants {
            if let Some(c) = registry.position(child) {
                lineage.add_parent_edge(me, NodeId::from_index(c));
            }
        }
    }

    log::debug!(
        "lineage resolved: {} person(s), {} parent edge(s)",
        lineage.node_count(),
        lineage.edge_count()
    );
    lineage
}

/// Assign a generation to every person of the registry.
pub fn compute_generations(registry: &Registry<'_>) -> GenerationMap {
    let generations = registry_lineage(registry).assign_generations();

    let mut map = GenerationMap::default();
    for (person, generation) in registry.iter().zip(generations) {
        map.max = map.max.max(generation);
        map.by_name.insert(person.name.clone(), generation);
    }
    map
}

/// Write generations onto API nodes from their parent-typed links.
///
/// Links are matched to nodes by id; spouse links and links with an
/// unknown endpoint are ignored.
pub fn compute_generations_from_links(nodes: &mut [GraphNode], links: &[GraphLink]) {
    let positions: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.as_str(), i))
        .collect();

    let mut lineage = Lineage::with_nodes(nodes.len());
    for link in links.iter().filter(|link| link.is_parent()) {
        if let (Some(&p), Some(&c)) = (
            positions.get(link.source.as_str()),
            positions.get(link.target.as_str()),
        ) {
            lineage.add_parent_edge(NodeId::from_index(p), NodeId::from_index(c));
        }
    }

    let generations = lineage.assign_generations();
    for (node, generation) in nodes.iter_mut().zip(generations) {
        node.generation = generation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Person;

    fn generations(persons: &[Person]) -> GenerationMap {
        compute_generations(&Registry::new(persons))
    }

    #[test]
    fn test_parentless_are_generation_zero() {
        let persons = vec![
            Person::new("A").with_children(["C"]),
            Person::new("B").with_children(["C"]),
            Person::new("C").with_parents(["A", "B"]),
        ];
        let map = generations(&persons);

        assert_eq!(map.get("A"), Some(0));
        assert_eq!(map.get("B"), Some(0));
        assert_eq!(map.get("C"), Some(1));
        assert_eq!(map.max_generation(), 1);
    }

    #[test]
    fn test_child_below_deepest_parent() {
        // P1 at 1, P2 at 3 => child at 4
        let persons = vec![
            Person::new("R").with_children(["P1", "X"]),
            Person::new("P1").with_parents(["R"]).with_children(["K"]),
            Person::new("X").with_parents(["R"]).with_children(["Y"]),
            Person::new("Y").with_parents(["X"]).with_children(["P2"]),
            Person::new("P2").with_parents(["Y"]).with_children(["K"]),
            Person::new("K").with_parents(["P1", "P2"]),
        ];
        let map = generations(&persons);

        assert_eq!(map.get("P1"), Some(1));
        assert_eq!(map.get("P2"), Some(3));
        assert_eq!(map.get("K"), Some(4));
    }

    #[test]
    fn test_edges_from_enfants_only() {
        // Only the parent side records the relation
        let persons = vec![Person::new("A").with_children(["B"]), Person::new("B")];
        let map = generations(&persons);
        assert_eq!(map.get("B"), Some(1));
    }

    #[test]
    fn test_rootless_data_fully_assigned() {
        let persons = vec![
            Person::new("A").with_parents(["C"]).with_children(["B"]),
            Person::new("B").with_parents(["A"]).with_children(["C"]),
            Person::new("C").with_parents(["B"]).with_children(["A"]),
        ];
        let map = generations(&persons);

        assert_eq!(map.len(), 3);
        for name in ["A", "B", "C"] {
            let generation = map.get(name).unwrap();
            assert!(generation < 3, "{name} got {generation}");
        }
    }

    #[test]
    fn test_dangling_names_ignored() {
        let persons = vec![Person::new("A").with_parents(["Ghost"]).with_children(["Nobody"])];
        let map = generations(&persons);
        assert_eq!(map.get("A"), Some(0));
        assert_eq!(map.get("Ghost"), None);
    }

    #[test]
    fn test_from_links() {
        let mut nodes: Vec<GraphNode> = ["A", "B", "C"]
            .iter()
            .map(|n| GraphNode::from_person(&Person::new(*n)))
            .collect();
        let links = vec![
            GraphLink::parent("A", "B"),
            GraphLink::parent("B", "C"),
            GraphLink::spouse("A", "C"),
            GraphLink::parent("Ghost", "A"),
        ];

        compute_generations_from_links(&mut nodes, &links);

        let gens: Vec<u32> = nodes.iter().map(|n| n.generation).collect();
        assert_eq!(gens, vec![0, 1, 2]);
    }
}
