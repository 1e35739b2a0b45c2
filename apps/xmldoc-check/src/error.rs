//! Error taxonomy for metadata loading, documentation lookup, and key synthesis.
//!
//! Only `DocIndexUnavailable` and `MetadataUnavailable` abort a check; the
//! remaining conditions are absorbed into the coverage tree as data.

use crate::metadata::TypeInfo;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CheckError>;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Metadata snapshot unavailable at {}: {reason}", .path.display())]
    MetadataUnavailable { path: PathBuf, reason: String },

    #[error("Documentation file unavailable at {}: {reason}", .path.display())]
    DocIndexUnavailable { path: PathBuf, reason: String },

    #[error("Documentation not found for '{id}'")]
    DocumentationNotFound { id: String },
}

/// Failure to build a canonical key from the metadata at hand.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("Metadata unavailable while building key for {element}")]
    MetadataUnavailable { element: String },
}

/// The type list could only be partially resolved.
#[derive(Error, Debug)]
#[error("{unresolved} type(s) could not be resolved; continuing with {} resolved", .resolved.len())]
pub struct PartialMetadataLoad {
    pub resolved: Vec<TypeInfo>,
    pub unresolved: usize,
}
