//! Tunable layout constants.
//!
//! Every section defaults to the values the views were designed with. JS
//! may pass a partial object; missing fields keep their default.

use serde::Deserialize;

use crate::layout::{BandConfig, SimulationConfig, TreeLayoutConfig};

/// All layout settings of a [`crate::layout::LayoutCoordinator`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub bands: BandConfig,
    pub tree: TreeLayoutConfig,
    pub simulation: SimulationConfig,
    /// Pointer distance within which a node counts as hit.
    pub hit_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bands: BandConfig::default(),
            tree: TreeLayoutConfig::default(),
            simulation: SimulationConfig::default(),
            hit_radius: 30.0,
        }
    }
}
