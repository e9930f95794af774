//! Lineage - parent → child topology over petgraph.
//!
//! The lineage stores deduplicated parent edges between dense node ids
//! using petgraph's StableGraph, and runs the breadth-first generation
//! propagation on top of it.

use std::collections::{HashSet, VecDeque};

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::{Directed, Direction};

use super::node::NodeId;

/// Directed parent → child graph.
///
/// Node `i` of the lineage is node `i` of the list it was built for.
pub struct Lineage {
    /// Nodes store their dense NodeId, edges carry no weight.
    graph: StableGraph<NodeId, (), Directed>,

    /// Edge set used to reject duplicates.
    edges: HashSet<(NodeId, NodeId)>,
}

/// Roots chosen for generation propagation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    pub nodes: Vec<NodeId>,
    /// True when no node was parentless and the minimum parent count
    /// was used instead.
    pub fallback: bool,
}

impl Lineage {
    /// Create a lineage with `node_count` isolated nodes.
    pub fn with_nodes(node_count: usize) -> Self {
        let mut graph = StableGraph::with_capacity(node_count, node_count);
        for i in 0..node_count {
            graph.add_node(NodeId::from_index(i));
        }
        Self {
            graph,
            edges: HashSet::new(),
        }
    }

    #[inline]
    fn index(&self, id: NodeId) -> Option<NodeIndex> {
        let index = NodeIndex::new(id.index());
        self.graph.contains_node(index).then_some(index)
    }

    /// Add a parent → child edge.
    ///
    /// Returns false for self-loops, duplicates and unknown ids.
    pub fn add_parent_edge(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || self.edges.contains(&(parent, child)) {
            return false;
        }
        let (Some(p), Some(c)) = (self.index(parent), self.index(child)) else {
            return false;
        };
        self.graph.add_edge(p, c, ());
        self.edges.insert((parent, child));
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of resolved parents of a node.
    pub fn parent_count(&self, id: NodeId) -> usize {
        self.index(id)
            .map(|i| self.graph.neighbors_directed(i, Direction::Incoming).count())
            .unwrap_or(0)
    }

    /// Children of a node in edge insertion order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(index) = self.index(id) else {
            return Vec::new();
        };
        // petgraph walks a node's edge list newest first
        let mut children: Vec<NodeId> = self
            .graph
            .neighbors_directed(index, Direction::Outgoing)
            .map(|n| self.graph[n])
            .collect();
        children.reverse();
        children
    }

    /// Parentless nodes, or every node at the minimum parent count when
    /// none is parentless.
    pub fn roots(&self) -> Roots {
        let counts: Vec<(NodeId, usize)> = self
            .graph
            .node_indices()
            .map(|i| (self.graph[i], self.graph.neighbors_directed(i, Direction::Incoming).count()))
            .collect();

        let Some(min) = counts.iter().map(|&(_, count)| count).min() else {
            return Roots {
                nodes: Vec::new(),
                fallback: false,
            };
        };

        Roots {
            nodes: counts
                .into_iter()
                .filter(|&(_, count)| count == min)
                .map(|(id, _)| id)
                .collect(),
            fallback: min > 0,
        }
    }

    /// Longest-path generation of every node, indexed by NodeId.
    ///
    /// Breadth-first from the roots: a child takes `parent + 1` whenever
    /// that is unseen or strictly greater than its current value. A value
    /// equal to the node count is never accepted, so cycles terminate.
    /// Unreachable nodes stay at 0.
    pub fn assign_generations(&self) -> Vec<u32> {
        let n = self.node_count();
        let mut generation = vec![0u32; n];
        let mut visited = vec![false; n];
        let mut queue = VecDeque::new();

        let roots = self.roots();
        if roots.fallback {
            log::info!(
                "no parentless person, using {} fallback root(s)",
                roots.nodes.len()
            );
        }
        for root in roots.nodes {
            visited[root.index()] = true;
            queue.push_back(root);
        }

        while let Some(current) = queue.pop_front() {
            let candidate = generation[current.index()] + 1;
            if candidate as usize >= n {
                continue;
            }
            for child in self.children(current) {
                let slot = child.index();
                if !visited[slot] || candidate > generation[slot] {
                    visited[slot] = true;
                    generation[slot] = candidate;
                    queue.push_back(child);
                }
            }
        }

        generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lineage(n: usize, edges: &[(u32, u32)]) -> Lineage {
        let mut lineage = Lineage::with_nodes(n);
        for &(p, c) in edges {
            lineage.add_parent_edge(NodeId(p), NodeId(c));
        }
        lineage
    }

    #[test]
    fn test_add_edge_rejects_duplicates_and_loops() {
        let mut lineage = Lineage::with_nodes(3);
        assert!(lineage.add_parent_edge(NodeId(0), NodeId(1)));
        assert!(!lineage.add_parent_edge(NodeId(0), NodeId(1)));
        assert!(!lineage.add_parent_edge(NodeId(2), NodeId(2)));
        assert!(!lineage.add_parent_edge(NodeId(0), NodeId(9)));
        assert_eq!(lineage.edge_count(), 1);
        assert_eq!(lineage.parent_count(NodeId(1)), 1);
    }

    #[test]
    fn test_children_in_insertion_order() {
        let lineage = lineage(4, &[(0, 3), (0, 1), (0, 2)]);
        assert_eq!(lineage.children(NodeId(0)), vec![NodeId(3), NodeId(1), NodeId(2)]);
    }

    #[test]
    fn test_roots_parentless() {
        let lineage = lineage(3, &[(0, 1), (1, 2)]);
        let roots = lineage.roots();
        assert_eq!(roots.nodes, vec![NodeId(0)]);
        assert!(!roots.fallback);
    }

    #[test]
    fn test_roots_fallback_on_cycle() {
        let lineage = lineage(3, &[(0, 1), (1, 2), (2, 0)]);
        let roots = lineage.roots();
        assert!(roots.fallback);
        assert_eq!(roots.nodes.len(), 3);
    }

    #[test]
    fn test_roots_fallback_picks_minimum_count() {
        // 0 <-> 1 each have one parent, 2 has both of them
        let lineage = lineage(3, &[(0, 1), (1, 0), (0, 2), (1, 2)]);
        let roots = lineage.roots();
        assert!(roots.fallback);
        assert_eq!(roots.nodes, vec![NodeId(0), NodeId(1)]);
        assert_eq!(lineage.parent_count(NodeId(2)), 2);
    }

    #[test]
    fn test_longest_path_wins() {
        // 0 -> 1 -> 2 -> 3 and 0 -> 3 directly
        let lineage = lineage(4, &[(0, 3), (0, 1), (1, 2), (2, 3)]);
        assert_eq!(lineage.assign_generations(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_cycle_terminates_below_node_count() {
        let lineage = lineage(3, &[(0, 1), (1, 2), (2, 0)]);
        let generations = lineage.assign_generations();
        assert!(generations.iter().all(|&g| (g as usize) < 3));
    }

    #[test]
    fn test_empty_lineage() {
        let lineage = Lineage::with_nodes(0);
        assert!(lineage.assign_generations().is_empty());
        assert!(lineage.roots().nodes.is_empty());
    }
}
