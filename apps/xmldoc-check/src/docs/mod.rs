//! Documentation-comment lookup.
//!
//! A `DocIndex` resolves canonical ids to `SummaryFragment`s. Implementors
//! only provide `fragment`; the three lookups the walker uses are built on it.

pub mod xml;

use crate::error::CheckError;
use crate::key::{self, MemberKey};
use crate::metadata::TypeInfo;

/// How a lookup reports an id that has no documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupMode {
    /// Absence is `Ok(None)`.
    #[default]
    Lenient,
    /// Absence is `CheckError::DocumentationNotFound`.
    Strict,
}

/// Documentation block found for one member id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryFragment {
    /// Inner text of `<summary>`; `None` when the block has no summary child.
    pub summary: Option<String>,
}

impl SummaryFragment {
    pub fn new(summary: Option<String>) -> Self {
        SummaryFragment { summary }
    }

    /// Trimmed summary text; empty when the block has no summary.
    pub fn text(&self) -> &str {
        self.summary.as_deref().map(str::trim).unwrap_or("")
    }
}

pub trait DocIndex {
    /// Raw lookup by full id (`T:Acme.Widget`).
    fn fragment(&self, id: &str) -> Option<SummaryFragment>;

    fn lookup_by_key(
        &self,
        owner: &TypeInfo,
        key: &MemberKey,
        mode: LookupMode,
    ) -> Result<Option<SummaryFragment>, CheckError> {
        let id = key.qualify(&key::owner_name(owner));
        resolve(self.fragment(&id), id, mode)
    }

    /// The representative type only needs to belong to the namespace; a
    /// single documentation file serves the whole library.
    fn lookup_namespace(
        &self,
        namespace: &str,
        representative: &TypeInfo,
        mode: LookupMode,
    ) -> Result<Option<SummaryFragment>, CheckError> {
        log::trace!(
            "namespace {} resolved through {}",
            namespace,
            representative.qualified_name()
        );
        let id = key::namespace_key(namespace);
        resolve(self.fragment(&id), id, mode)
    }

    fn lookup_constructor(
        &self,
        _owner: &TypeInfo,
        full_key: &str,
        mode: LookupMode,
    ) -> Result<Option<SummaryFragment>, CheckError> {
        resolve(self.fragment(full_key), full_key.to_string(), mode)
    }
}

fn resolve(
    found: Option<SummaryFragment>,
    id: String,
    mode: LookupMode,
) -> Result<Option<SummaryFragment>, CheckError> {
    match (found, mode) {
        (Some(f), _) => Ok(Some(f)),
        (None, LookupMode::Lenient) => Ok(None),
        (None, LookupMode::Strict) => Err(CheckError::DocumentationNotFound { id }),
    }
}
