//! xmldoc-check core library.
//!
//! This crate audits a compiled library's public API surface against its
//! documentation-comment file and reports every element lacking a summary.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `metadata`: Descriptive records of the library surface and providers.
//! - `key`: Canonical documentation-comment identifiers.
//! - `docs`: Documentation lookup and the documentation-file index.
//! - `walker`: Builds the coverage tree for a library.
//! - `models`: Coverage tree data model.
//! - `rollup`: Bottom-up error aggregation.
//! - `report`: Findings sink injected into the walker.
//! - `output`: Human/JSON printers.
//! - `error`: Error types.
pub mod cli;
pub mod config;
pub mod docs;
pub mod error;
pub mod key;
pub mod metadata;
pub mod models;
pub mod output;
pub mod report;
pub mod rollup;
pub mod walker;

pub use error::{CheckError, PartialMetadataLoad, SynthesisError};
pub use models::CheckResult;
pub use walker::{check, check_library, CheckOptions};
