//! Graph data structures and construction.
//!
//! Person records are resolved through a name-keyed [`Registry`], their
//! parent relation is held in a petgraph-backed [`Lineage`], and the two
//! outputs are built from there: a rooted forest for the tree view and a
//! unified, generation-annotated node/link graph for the force view.

mod generation;
mod hierarchy;
mod lineage;
mod link;
mod node;
mod person;
mod registry;
mod unified;

pub use generation::{GenerationMap, compute_generations, compute_generations_from_links};
pub use hierarchy::build_hierarchy;
pub use lineage::{Lineage, Roots};
pub use link::{GraphLink, LinkKind};
pub use node::{GraphNode, HierarchyNode, NodeId};
pub use person::{Gender, Person};
pub(crate) use person::name_list;
pub use registry::Registry;
pub use unified::{UnifiedGraph, build_unified_graph};
