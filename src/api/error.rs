//! Transport errors and the notices shown for them.

use serde::Serialize;
use thiserror::Error;

/// Failure while loading data from the genealogy API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request could not be sent or the connection failed.
    #[error("fetch failed: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),

    /// The body was not the expected JSON shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The response decoded but holds nothing to show.
    #[error("no data found")]
    Empty,

    /// A person-scoped request was made without a name.
    #[error("a person name is required")]
    MissingName,

    /// Not running inside a browser window.
    #[error("no window available")]
    NoWindow,
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// What the user was trying to load when a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeContext {
    /// The collapsible tree.
    Hierarchy,
    /// A graph view: full network, ancestors, descendants, relation path.
    Graph,
    /// The detail panel of one person.
    Details,
}

/// Message surfaced to the user instead of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Notice for a failed load.
    pub fn from_error(error: &ApiError, context: NoticeContext) -> Self {
        match (error, context) {
            (ApiError::MissingName, _) => Self::info("Veuillez saisir un nom"),
            (_, NoticeContext::Details) => Self::error("Impossible de charger les détails de cette personne."),
            (ApiError::Empty, NoticeContext::Hierarchy) => {
                Self::info("Aucune hiérarchie trouvée. Vérifiez vos données sources.")
            }
            (ApiError::Empty, NoticeContext::Graph) => Self::info("Aucune donnée trouvée pour cette personne."),
            _ => Self::error("Une erreur est survenue lors du chargement des données."),
        }
    }
}
