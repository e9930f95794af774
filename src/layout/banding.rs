//! Generation-banded placement.
//!
//! The canvas is cut into horizontal bands, one per generation plus
//! padding. Nodes of a generation are spread evenly across the width of
//! their band, in input order, and fixed there until dragged.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::graph::GraphNode;

/// Configuration for generation bands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    /// Empty bands kept above the first generation and below the last.
    pub padding_bands: u32,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self { padding_bands: 1 }
    }
}

/// Band geometry for one placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationBands {
    /// Height of a single band.
    pub band_height: f32,
    padding: u32,
}

impl GenerationBands {
    /// Bands for generations `0..=max_generation` on a canvas of `height`.
    pub fn new(max_generation: u32, height: f32, config: &BandConfig) -> Self {
        let bands = max_generation + 2 * config.padding_bands;
        Self {
            band_height: height / bands.max(1) as f32,
            padding: config.padding_bands,
        }
    }

    /// Vertical centre line of a generation.
    #[inline]
    pub fn center(&self, generation: u32) -> f32 {
        (generation + self.padding) as f32 * self.band_height
    }
}

/// Place nodes in generation bands and fix them there.
///
/// With the default padding the band height is `height / (G + 2)` and
/// the `i`-th of `k` nodes in a band (1-indexed) sits at
/// `x = i * width / (k + 1)`, `y = (gen + 1) * band_height`.
pub fn layout_graph_by_generation(nodes: &mut [GraphNode], width: f32, height: f32) -> GenerationBands {
    layout_with_config(nodes, width, height, &BandConfig::default())
}

/// [`layout_graph_by_generation`] with explicit band configuration.
pub fn layout_with_config(
    nodes: &mut [GraphNode],
    width: f32,
    height: f32,
    config: &BandConfig,
) -> GenerationBands {
    let max_generation = nodes.iter().map(|n| n.generation).max().unwrap_or(0);
    let bands = GenerationBands::new(max_generation, height, config);

    let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (i, node) in nodes.iter().enumerate() {
        groups.entry(node.generation).or_default().push(i);
    }

    for (generation, members) in groups {
        let step = width / (members.len() + 1) as f32;
        let y = bands.center(generation);
        for (rank, i) in members.into_iter().enumerate() {
            nodes[i].fix_at((rank + 1) as f32 * step, y);
        }
    }

    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Person;

    fn node(name: &str, generation: u32) -> GraphNode {
        GraphNode {
            generation,
            ..GraphNode::from_person(&Person::new(name))
        }
    }

    #[test]
    fn test_three_in_one_band() {
        let mut nodes = vec![node("A", 0), node("B", 0), node("C", 0)];
        let bands = layout_graph_by_generation(&mut nodes, 900.0, 600.0);

        let xs: Vec<f32> = nodes.iter().map(|n| n.x).collect();
        assert!((xs[0] - 225.0).abs() < 1e-3);
        assert!((xs[1] - 450.0).abs() < 1e-3);
        assert!((xs[2] - 675.0).abs() < 1e-3);
        assert!((bands.band_height - 300.0).abs() < 1e-3);
        assert!(nodes.iter().all(|n| (n.y - 300.0).abs() < 1e-3));
    }

    #[test]
    fn test_generations_stack_downwards() {
        let mut nodes = vec![node("A", 0), node("B", 1), node("C", 2)];
        layout_graph_by_generation(&mut nodes, 400.0, 800.0);

        // band height = 800 / 4
        assert!((nodes[0].y - 200.0).abs() < 1e-3);
        assert!((nodes[1].y - 400.0).abs() < 1e-3);
        assert!((nodes[2].y - 600.0).abs() < 1e-3);
        assert!(nodes.iter().all(|n| (n.x - 200.0).abs() < 1e-3));
    }

    #[test]
    fn test_positions_are_fixed() {
        let mut nodes = vec![node("A", 0)];
        layout_graph_by_generation(&mut nodes, 100.0, 100.0);
        assert_eq!(nodes[0].fx, Some(nodes[0].x));
        assert_eq!(nodes[0].fy, Some(nodes[0].y));
    }

    #[test]
    fn test_empty_is_noop() {
        let mut nodes: Vec<GraphNode> = Vec::new();
        let bands = layout_graph_by_generation(&mut nodes, 900.0, 600.0);
        assert!(bands.band_height > 0.0);
    }

    #[test]
    fn test_custom_padding() {
        let config = BandConfig { padding_bands: 0 };
        let bands = GenerationBands::new(3, 300.0, &config);
        assert!((bands.center(1) - 100.0).abs() < 1e-3);
    }
}
