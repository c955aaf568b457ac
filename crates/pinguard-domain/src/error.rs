use crate::resolve::ResolutionError;
use thiserror::Error;

/// Policy problems detected before any traversal starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid exclusion pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error(
        "unknown dependency scope '{0}' (expected compile, provided, runtime, test, system or import)"
    )]
    UnknownScope(String),

    #[error("The file list is empty and Null files are disabled.")]
    EmptyFileList,
}

/// Errors surfaced by an audit run. Policy violations are not errors; see [`crate::AuditReport`].
#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("could not retrieve dependency metadata for {root}")]
    Resolution {
        root: String,
        #[source]
        source: ResolutionError,
    },
}
