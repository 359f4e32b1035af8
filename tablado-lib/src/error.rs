use tablado_catalog::CatalogError;
use tablado_state::StateError;

use crate::collaborator::CollaboratorError;

/// Errors that stop a sync run before any item is processed.
///
/// Failures on individual items are recorded in the failed collection and
/// never surface here.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Could not list {url}: {source}")]
    Listing {
        url: String,
        source: CollaboratorError,
    },

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl SyncError {
    pub fn listing(url: impl Into<String>, source: CollaboratorError) -> Self {
        Self::Listing {
            url: url.into(),
            source,
        }
    }
}
