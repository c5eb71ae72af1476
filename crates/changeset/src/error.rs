//! Error types for the changeset crate

use crate::types::ChangeKind;
use thiserror::Error;

/// Errors that can occur while rendering change sets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Rendering needs the declared configuration but none was attached
    #[error("change set '{name}' of kind {kind} has no declared configuration to render")]
    MissingConfig {
        /// Name of the resource
        name: String,
        /// Kind the change set was rendered as
        kind: ChangeKind,
    },
}

/// Result type for changeset operations
pub type Result<T> = std::result::Result<T, Error>;
