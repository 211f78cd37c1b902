//! Error types for property access and filter creation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by filter components during startup and ticking.
///
/// Every failure is fatal to the failing instance: there are no retries
/// and no recoverable paths at this layer.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A property name was read that no declaration covers.
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// A declared property was never resolved by the host.
    #[error("property '{0}' has no resolved value")]
    Unresolved(String),

    /// A property held a different variant than the caller asked for.
    #[error("property '{name}' is not a {expected}")]
    WrongType {
        name: String,
        expected: &'static str,
    },

    /// A uniform was set before the filter pass existed.
    #[error("filter pass has not been created yet")]
    NotCreated,

    /// Shader source could not be read from disk.
    #[error("failed to read shader source {}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The filter backend refused to create the pass.
    #[error("filter backend error: {0}")]
    Backend(String),
}
