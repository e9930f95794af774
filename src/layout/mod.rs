//! Layout algorithms for the genealogy views.
//!
//! The graph view places nodes in generation bands and relaxes them with
//! a force simulation; the tree view uses a tidy tree layout. The
//! [`LayoutCoordinator`] owns whichever view is active.

pub mod banding;
pub mod coordinator;
pub mod simulation;
pub mod tidy_tree;

pub use banding::{BandConfig, GenerationBands, layout_graph_by_generation};
pub use coordinator::{ActiveView, GraphView, LayoutCoordinator, TreeView};
pub use simulation::{Simulation, SimulationConfig};
pub use tidy_tree::{
    CollapseState, Orientation, PlacedTreeNode, TidyTreeLayout, TreeLayout, TreeLayoutConfig, TreeLink,
    layout_hierarchy_tree,
};
