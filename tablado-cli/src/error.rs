use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Catalog could not be loaded
    #[error("Catalog error: {0}")]
    Catalog(#[from] tablado_catalog::CatalogError),

    /// State directory could not be read or written
    #[error("State error: {0}")]
    State(#[from] tablado_state::StateError),

    /// The sync run aborted
    #[error("Sync failed: {0}")]
    Sync(#[from] tablado_lib::SyncError),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}

impl From<tablado_lib::settings::SettingsError> for CliError {
    fn from(e: tablado_lib::settings::SettingsError) -> Self {
        Self::Config(e.to_string())
    }
}
