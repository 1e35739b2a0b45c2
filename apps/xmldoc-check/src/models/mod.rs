//! Coverage tree: namespace -> type -> {constructors, methods, fields, properties}.
//!
//! Nodes are built by the walker with zeroed `Rollup`s; `rollup::aggregate`
//! fills them in once the tree is complete.

use crate::key::ElementKind;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "lowercase")]
/// Summary state of one element.
pub enum Summary {
    Present(String),
    Missing,
    /// No summary, but none is required (parameterless constructors).
    Exempt,
}

impl Summary {
    /// Empty text counts as missing.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            Summary::Missing
        } else {
            Summary::Present(text.to_string())
        }
    }

    pub fn is_satisfied(&self) -> bool {
        !matches!(self, Summary::Missing)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Summary::Present(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Aggregated error state of a node.
pub struct Rollup {
    pub has_errors: bool,
    pub error_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Constructor, method, field, or property.
pub struct MemberNode {
    pub kind: ElementKind,
    pub name: String,
    pub summary: Summary,
    #[serde(flatten)]
    pub rollup: Rollup,
}

impl MemberNode {
    pub fn new(kind: ElementKind, name: impl Into<String>, summary: Summary) -> Self {
        MemberNode {
            kind,
            name: name.into(),
            summary,
            rollup: Rollup::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeNode {
    pub name: String,
    pub summary: Summary,
    pub constructors: Vec<MemberNode>,
    pub methods: Vec<MemberNode>,
    pub fields: Vec<MemberNode>,
    pub properties: Vec<MemberNode>,
    #[serde(flatten)]
    pub rollup: Rollup,
}

impl TypeNode {
    pub fn new(name: impl Into<String>, summary: Summary) -> Self {
        TypeNode {
            name: name.into(),
            summary,
            constructors: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            rollup: Rollup::default(),
        }
    }

    /// All members in category order.
    pub fn members(&self) -> impl Iterator<Item = &MemberNode> {
        self.constructors
            .iter()
            .chain(&self.methods)
            .chain(&self.fields)
            .chain(&self.properties)
    }

    pub fn members_mut(&mut self) -> impl Iterator<Item = &mut MemberNode> {
        self.constructors
            .iter_mut()
            .chain(self.methods.iter_mut())
            .chain(self.fields.iter_mut())
            .chain(self.properties.iter_mut())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceNode {
    pub name: String,
    pub summary: Summary,
    pub types: Vec<TypeNode>,
    #[serde(flatten)]
    pub rollup: Rollup,
}

impl NamespaceNode {
    pub fn new(name: impl Into<String>, summary: Summary) -> Self {
        NamespaceNode {
            name: name.into(),
            summary,
            types: Vec::new(),
            rollup: Rollup::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Result of checking one library.
pub struct CheckResult {
    pub assembly_name: String,
    pub namespaces: Vec<NamespaceNode>,
    /// Types the metadata source could not resolve.
    pub unresolved_types: usize,
    #[serde(flatten)]
    pub rollup: Rollup,
}

impl CheckResult {
    pub fn new(assembly_name: impl Into<String>) -> Self {
        CheckResult {
            assembly_name: assembly_name.into(),
            namespaces: Vec::new(),
            unresolved_types: 0,
            rollup: Rollup::default(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.rollup.has_errors
    }

    pub fn error_count(&self) -> usize {
        self.rollup.error_count
    }
}
