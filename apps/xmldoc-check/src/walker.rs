//! Metadata walker: builds and aggregates the coverage tree for one library.
//!
//! One sequential pass: namespaces in first-seen order, types within a
//! namespace, then constructors, methods, fields, and properties of each type.
//! Lookups are always lenient so that absence is recorded as data; only an
//! unavailable documentation file aborts (see `check_library`).

use crate::docs::xml::{docs_path_for, DocCache};
use crate::docs::{DocIndex, LookupMode, SummaryFragment};
use crate::error::{CheckError, PartialMetadataLoad};
use crate::key::{self, ElementKind};
use crate::metadata::snapshot::{snapshot_path_for, SnapshotProvider};
use crate::metadata::{MetadataProvider, TypeInfo};
use crate::models::{CheckResult, MemberNode, NamespaceNode, Summary, TypeNode};
use crate::report::{Finding, Reporter};
use crate::rollup;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Text reported for a parameterless constructor without a summary.
pub const EXEMPT_NOTE: &str = "Default constructor is allowed to have empty summary description";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    /// Only stream findings for elements missing a summary.
    pub report_only_missing: bool,
    /// Check delegate types' own summary but not their synthetic members.
    pub skip_delegate_members: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions {
            report_only_missing: true,
            skip_delegate_members: true,
        }
    }
}

/// Check a library through its companion files: the metadata snapshot
/// (`<stem>.api.json`) and the documentation file (`<stem>.xml`).
pub fn check_library(
    library: &Path,
    cache: &DocCache,
    options: &CheckOptions,
    reporter: &mut dyn Reporter,
) -> Result<CheckResult, CheckError> {
    log::info!("Processing library '{}'", library.display());
    let provider = SnapshotProvider::load(&snapshot_path_for(library))?;
    let docs = cache.get_or_load(&docs_path_for(library))?;
    Ok(check(&provider, &*docs, options, reporter))
}

/// Build the aggregated coverage tree for everything `provider` exposes.
pub fn check(
    provider: &dyn MetadataProvider,
    docs: &dyn DocIndex,
    options: &CheckOptions,
    reporter: &mut dyn Reporter,
) -> CheckResult {
    let mut result = CheckResult::new(provider.assembly_name());

    let all_types = match provider.types() {
        Ok(types) => types,
        Err(PartialMetadataLoad {
            resolved,
            unresolved,
        }) => {
            log::warn!(
                "{} type(s) in '{}' could not be resolved; checking the remaining {}",
                unresolved,
                provider.assembly_name(),
                resolved.len()
            );
            result.unresolved_types = unresolved;
            resolved
        }
    };

    let public: Vec<TypeInfo> = all_types
        .into_iter()
        .filter(|t| t.visibility.is_public())
        .collect();
    let groups = group_by_namespace(public);
    log::info!("Total namespaces found: {}", groups.len());

    let mut walker = Walker {
        docs,
        options,
        reporter,
    };
    let ns_count = groups.len();
    for (i, (name, types)) in groups.iter().enumerate() {
        log::info!(
            "Processing namespace {} of {}. Namespace: '{}'. Types: {}",
            i + 1,
            ns_count,
            name,
            types.len()
        );
        result.namespaces.push(walker.namespace(name, types));
    }

    rollup::aggregate(&mut result);
    if result.has_errors() {
        log::info!("Check completed with {} errors", result.error_count());
    } else {
        log::info!("Check completed successfully");
    }
    result
}

/// Group types by namespace, keeping first-seen order of namespaces.
fn group_by_namespace(types: Vec<TypeInfo>) -> Vec<(String, Vec<TypeInfo>)> {
    let mut groups: Vec<(String, Vec<TypeInfo>)> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for t in types {
        let ns = t.namespace_name().to_string();
        let slot = *slots.entry(ns.clone()).or_insert_with(|| {
            groups.push((ns, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(t);
    }
    groups
}

fn type_progress(position: usize, count: usize, t: &TypeInfo) -> String {
    format!(
        "  Processing type {} of {}. TypeName: '{}'. Constructors: {}, Methods: {}, Fields: {}, Properties: {}",
        position,
        count,
        t.display_name(),
        t.public_constructors().count(),
        t.public_methods().count(),
        t.public_fields().count(),
        t.public_properties().count()
    )
}

struct Walker<'a> {
    docs: &'a dyn DocIndex,
    options: &'a CheckOptions,
    reporter: &'a mut dyn Reporter,
}

impl<'a> Walker<'a> {
    fn namespace(&mut self, name: &str, types: &[TypeInfo]) -> NamespaceNode {
        let summary = match types.first() {
            Some(rep) => self.resolve(
                self.docs.lookup_namespace(name, rep, LookupMode::Lenient),
                name,
            ),
            None => Summary::Missing,
        };
        self.emit(ElementKind::Namespace, name.to_string(), &summary);

        let mut node = NamespaceNode::new(name, summary);
        let mut seen: HashSet<String> = HashSet::new();
        let count = types.len();
        for (j, t) in types.iter().enumerate() {
            let display = t.display_name();
            if !seen.insert(display.clone()) {
                log::debug!("Skipping duplicate type '{}' in '{}'", display, name);
                continue;
            }
            log::debug!("{}", type_progress(j + 1, count, t));
            node.types.push(self.type_node(t));
        }
        node
    }

    fn type_node(&mut self, t: &TypeInfo) -> TypeNode {
        let owner = t.qualified_name();
        let summary = self.resolve(
            self.docs
                .lookup_by_key(t, &key::type_key(), LookupMode::Lenient),
            &owner,
        );
        self.emit(ElementKind::Type, owner.clone(), &summary);
        let mut node = TypeNode::new(t.display_name(), summary);

        if self.options.skip_delegate_members && t.is_delegate() {
            log::debug!("  Skipping members of delegate '{}'", owner);
            return node;
        }

        for c in t.public_constructors() {
            let name = c.display_name();
            let summary = match key::constructor_key(t, c) {
                Ok(id) => self.resolve(
                    self.docs.lookup_constructor(t, &id, LookupMode::Lenient),
                    &id,
                ),
                Err(e) => self.synthesis_failed(e),
            };
            let summary = if !summary.is_satisfied() && c.parameters.is_empty() {
                Summary::Exempt
            } else {
                summary
            };
            self.emit(ElementKind::Constructor, format!("{}::{}", owner, name), &summary);
            node.constructors
                .push(MemberNode::new(ElementKind::Constructor, name, summary));
        }

        for m in t.public_methods() {
            let name = m.display_name();
            let summary = match key::method_key(m) {
                Ok(k) => self.member_summary(t, &k),
                Err(e) => self.synthesis_failed(e),
            };
            self.emit(ElementKind::Method, format!("{}::{}", owner, name), &summary);
            node.methods
                .push(MemberNode::new(ElementKind::Method, name, summary));
        }

        for f in t.public_fields() {
            let summary = self.member_summary(t, &key::field_key(f));
            self.emit(ElementKind::Field, format!("{}::{}", owner, f.name), &summary);
            node.fields
                .push(MemberNode::new(ElementKind::Field, f.name.clone(), summary));
        }

        for p in t.public_properties() {
            let name = p.display_name();
            let summary = match key::property_key(p) {
                Ok(k) => self.member_summary(t, &k),
                Err(e) => self.synthesis_failed(e),
            };
            self.emit(ElementKind::Property, format!("{}::{}", owner, name), &summary);
            node.properties
                .push(MemberNode::new(ElementKind::Property, name, summary));
        }
        node
    }

    fn member_summary(&self, owner: &TypeInfo, k: &key::MemberKey) -> Summary {
        let id = k.qualify(&key::owner_name(owner));
        self.resolve(self.docs.lookup_by_key(owner, k, LookupMode::Lenient), &id)
    }

    fn resolve(&self, found: Result<Option<SummaryFragment>, CheckError>, what: &str) -> Summary {
        match found {
            Ok(Some(fragment)) => Summary::from_text(fragment.text()),
            Ok(None) => Summary::Missing,
            Err(e) => {
                log::warn!("Lookup for '{}' failed: {}", what, e);
                Summary::Missing
            }
        }
    }

    fn synthesis_failed(&self, e: crate::error::SynthesisError) -> Summary {
        log::warn!("{}; treating as missing summary", e);
        Summary::Missing
    }

    fn emit(&mut self, kind: ElementKind, qualified_name: String, summary: &Summary) {
        log::trace!("    Checked {} '{}'", kind.label(), qualified_name);
        let text = match summary {
            Summary::Missing => None,
            Summary::Present(t) => Some(t.clone()),
            Summary::Exempt => Some(EXEMPT_NOTE.to_string()),
        };
        if text.is_some() && self.options.report_only_missing {
            return;
        }
        self.reporter.finding(Finding {
            kind,
            qualified_name,
            summary: text,
        });
    }
}
