//! Typed errors for the conversion engine.
//!
//! Conversion itself never fails: unknown commands and empty input are ordinary
//! result variants. These errors cover table construction and the external
//! collaborators, and are absorbed at the `convert` boundary.

use std::time::Duration;

/// Mapping table construction errors
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Invalid complex pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Invalid custom mapping `{source_cmd}` -> `{target}`: {reason}")]
    InvalidCustomMapping {
        source_cmd: String,
        target: String,
        reason: &'static str,
    },
}

/// Remote lookup errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LookupError {
    #[error("Lookup timed out after {0:?}")]
    Timeout(Duration),
    #[error("Lookup cancelled")]
    Cancelled,
    #[error("Lookup leader dropped before publishing a result")]
    Abandoned,
    #[error("Lookup failed: {0}")]
    Failed(String),
}
