//! Genealogy API access.
//!
//! Response shapes, a fetch-based client, the error taxonomy with its
//! user notices, and the guard that drops superseded responses.

mod client;
mod error;
mod guard;
mod responses;

pub use client::{ApiClient, HIERARCHY_PATH, ViewRequest};
pub use error::{ApiError, Notice, NoticeContext, NoticeLevel};
pub use guard::{RequestTracker, Ticket};
pub use responses::{
    GraphResponse, HierarchicalTreeResponse, PersonDetails, Relative, SearchHit, prepare_graph,
};
