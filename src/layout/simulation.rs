//! Restartable force relaxation over the unified graph.
//!
//! The physics is delegated to `force_graph`; this module owns the
//! cooling schedule (alpha), the generation-pinning force and the
//! bookkeeping between the solver and the [`GraphNode`] list.
//!
//! Each call to [`Simulation::tick`] performs one whole solver step and
//! only then copies positions back, so a redraw never sees a partially
//! updated frame.

use std::collections::HashMap;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use serde::Deserialize;

use super::banding::GenerationBands;
use crate::graph::{GraphLink, GraphNode};

/// Configuration for the force simulation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Repulsion between every pair of nodes.
    pub force_charge: f32,
    /// Spring constant of links.
    pub force_spring: f32,
    /// Upper bound on the force applied to a node in one step.
    pub force_max: f32,
    pub node_speed: f32,
    pub damping_factor: f32,
    pub node_mass: f32,
    /// Fraction of the gap to the alpha target closed per tick.
    pub alpha_decay: f32,
    /// The simulation stops itself below this alpha.
    pub alpha_min: f32,
    /// Alpha target while a node is dragged.
    pub drag_alpha_target: f32,
    /// Pull of free nodes towards their generation band, scaled by alpha.
    pub generation_strength: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            force_charge: 150.0,
            force_spring: 0.05,
            force_max: 100.0,
            node_speed: 3000.0,
            damping_factor: 0.9,
            node_mass: 10.0,
            alpha_decay: 0.02,
            alpha_min: 0.001,
            drag_alpha_target: 0.3,
            generation_strength: 0.8,
        }
    }
}

/// Force simulation for one graph build.
///
/// Solver user data is the node's position in the [`GraphNode`] list the
/// simulation was built from.
pub struct Simulation {
    graph: ForceGraph<usize, ()>,
    config: SimulationConfig,
    alpha: f32,
    alpha_target: f32,
    running: bool,
}

impl Simulation {
    /// Build a stopped simulation from nodes and links.
    ///
    /// Links whose endpoints are not in `nodes` are skipped.
    pub fn new(nodes: &[GraphNode], links: &[GraphLink], config: SimulationConfig) -> Self {
        let mut graph = ForceGraph::new(SimulationParameters {
            force_charge: config.force_charge,
            force_spring: config.force_spring,
            force_max: config.force_max,
            node_speed: config.node_speed,
            damping_factor: config.damping_factor,
        });

        let mut indices = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            let idx = graph.add_node(NodeData {
                x: node.fx.unwrap_or(node.x),
                y: node.fy.unwrap_or(node.y),
                mass: config.node_mass,
                is_anchor: node.is_fixed(),
                user_data: i,
            });
            indices.insert(node.id.as_str(), idx);
        }

        for link in links {
            if let (Some(&src), Some(&tgt)) = (indices.get(link.source.as_str()), indices.get(link.target.as_str())) {
                graph.add_edge(src, tgt, EdgeData::default());
            }
        }

        Self {
            graph,
            config,
            alpha: 1.0,
            alpha_target: 0.0,
            running: false,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    #[inline]
    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    // =========================================================================
    // Control
    // =========================================================================

    /// Start from full heat.
    pub fn start(&mut self) {
        self.alpha = 1.0;
        self.running = true;
    }

    /// Stop ticking. Positions stay where the last step left them.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Resume ticking with the current alpha.
    pub fn restart(&mut self) {
        self.running = true;
    }

    /// Raise the alpha target and resume, as when a drag begins.
    pub fn reheat(&mut self) {
        self.alpha_target = self.config.drag_alpha_target;
        self.restart();
    }

    /// Let alpha decay to zero again.
    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    // =========================================================================
    // Stepping
    // =========================================================================

    /// Advance one step of `dt` seconds and commit positions to `nodes`.
    ///
    /// Nodes with `fx`/`fy` act as anchors at that position. Returns
    /// whether the simulation is still running afterwards.
    pub fn tick(&mut self, dt: f32, nodes: &mut [GraphNode], bands: &GenerationBands) -> bool {
        if !self.running {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

        self.graph.visit_nodes_mut(|node| {
            let Some(source) = nodes.get(node.data.user_data) else {
                return;
            };
            match (source.fx, source.fy) {
                (Some(fx), Some(fy)) => {
                    node.data.x = fx;
                    node.data.y = fy;
                    node.data.is_anchor = true;
                }
                _ => node.data.is_anchor = false,
            }
        });

        self.graph.update(dt);

        let pull = self.config.generation_strength * self.alpha;
        self.graph.visit_nodes_mut(|node| {
            if node.data.is_anchor {
                return;
            }
            if let Some(source) = nodes.get(node.data.user_data) {
                let target = bands.center(source.generation);
                node.data.y += (target - node.data.y) * pull;
            }
        });

        self.graph.visit_nodes(|node| {
            if let Some(target) = nodes.get_mut(node.data.user_data) {
                target.x = node.x();
                target.y = node.y();
            }
        });

        if self.alpha < self.config.alpha_min {
            log::debug!("simulation settled at alpha {:.4}", self.alpha);
            self.running = false;
        }
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Person;
    use crate::layout::banding::{BandConfig, layout_graph_by_generation};

    fn nodes(specs: &[(&str, u32)]) -> Vec<GraphNode> {
        specs
            .iter()
            .map(|&(name, generation)| GraphNode {
                generation,
                ..GraphNode::from_person(&Person::new(name))
            })
            .collect()
    }

    #[test]
    fn test_alpha_decays_and_stops() {
        let mut list = nodes(&[("A", 0), ("B", 1)]);
        let bands = layout_graph_by_generation(&mut list, 400.0, 300.0);
        let config = SimulationConfig {
            alpha_decay: 0.5,
            alpha_min: 0.1,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(&list, &[GraphLink::parent("A", "B")], config);
        assert!(!sim.is_running());

        sim.start();
        let mut ticks = 0;
        while sim.tick(0.016, &mut list, &bands) {
            ticks += 1;
            assert!(ticks < 100, "simulation never settled");
        }
        // 1 -> 0.5 -> 0.25 -> 0.125 -> 0.0625
        assert_eq!(ticks, 3);
        assert!(sim.alpha() < 0.1);
        assert!(!sim.tick(0.016, &mut list, &bands));
    }

    #[test]
    fn test_fixed_nodes_stay_put() {
        let mut list = nodes(&[("A", 0), ("B", 0), ("C", 1)]);
        let bands = layout_graph_by_generation(&mut list, 600.0, 300.0);
        let before: Vec<(f32, f32)> = list.iter().map(|n| (n.x, n.y)).collect();

        let mut sim = Simulation::new(&list, &[], SimulationConfig::default());
        sim.start();
        for _ in 0..10 {
            sim.tick(0.016, &mut list, &bands);
        }

        let after: Vec<(f32, f32)> = list.iter().map(|n| (n.x, n.y)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_free_node_pulled_to_band() {
        let mut list = nodes(&[("A", 1)]);
        let bands = GenerationBands::new(1, 300.0, &BandConfig::default());
        list[0].x = 50.0;
        list[0].y = 0.0;

        let mut sim = Simulation::new(&list, &[], SimulationConfig::default());
        sim.start();
        sim.tick(0.016, &mut list, &bands);

        let target = bands.center(1);
        assert!((list[0].y - target).abs() < target, "y={} target={}", list[0].y, target);
    }

    #[test]
    fn test_reheat_and_cool() {
        let list = nodes(&[("A", 0)]);
        let mut sim = Simulation::new(&list, &[], SimulationConfig::default());

        sim.reheat();
        assert!(sim.is_running());
        assert!((sim.alpha_target() - 0.3).abs() < 1e-6);

        sim.cool();
        assert_eq!(sim.alpha_target(), 0.0);

        sim.stop();
        assert!(!sim.is_running());
        sim.restart();
        assert!(sim.is_running());
    }

    #[test]
    fn test_dangling_links_skipped() {
        let list = nodes(&[("A", 0)]);
        let sim = Simulation::new(&list, &[GraphLink::parent("A", "Ghost")], SimulationConfig::default());
        assert_eq!(sim.alpha(), 1.0);
    }
}
