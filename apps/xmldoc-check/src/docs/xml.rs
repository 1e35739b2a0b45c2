//! Index over a compiler-generated documentation-comment file.
//!
//! The file is `<doc><members>` holding one `<member name="...">` block per
//! documented element; only the `<summary>` of each block is kept. Summary
//! text is the element's text content: CDATA included, nested markup and
//! comments dropped, entities decoded.

use super::{DocIndex, SummaryFragment};
use crate::error::{self, CheckError};
use roxmltree::{Document, Node};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Documentation file for a library: `bin/Acme.dll` -> `bin/Acme.xml`.
pub fn docs_path_for(library: &Path) -> PathBuf {
    library.with_extension("xml")
}

fn unavailable(reason: impl Into<String>) -> CheckError {
    CheckError::DocIndexUnavailable {
        path: PathBuf::new(),
        reason: reason.into(),
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn inner_text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Parsed documentation file.
#[derive(Debug, Clone, Default)]
pub struct XmlDocIndex {
    assembly: Option<String>,
    members: HashMap<String, SummaryFragment>,
}

impl XmlDocIndex {
    pub fn load(path: &Path) -> error::Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| CheckError::DocIndexUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&data).map_err(|e| match e {
            CheckError::DocIndexUnavailable { reason, .. } => CheckError::DocIndexUnavailable {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    pub fn parse(data: &str) -> error::Result<Self> {
        let doc = Document::parse(data.trim_start_matches('\u{feff}'))
            .map_err(|e| unavailable(format!("malformed XML: {}", e)))?;
        let root = doc.root_element();
        let members_node = match root.tag_name().name() {
            "doc" => child(root, "members"),
            "members" => Some(root),
            _ => None,
        }
        .ok_or_else(|| unavailable("no <doc><members> element"))?;

        let assembly = child(root, "assembly")
            .and_then(|a| child(a, "name"))
            .map(|n| inner_text(n).trim().to_string());

        let mut members = HashMap::new();
        for m in members_node
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "member")
        {
            let Some(id) = m.attribute("name") else {
                continue;
            };
            let summary = child(m, "summary").map(inner_text);
            // First occurrence wins, as with a first-match XPath query.
            members
                .entry(id.to_string())
                .or_insert_with(|| SummaryFragment::new(summary));
        }
        log::debug!(
            "Parsed {} documented member(s){}",
            members.len(),
            assembly
                .as_deref()
                .map(|a| format!(" for {}", a))
                .unwrap_or_default()
        );
        Ok(XmlDocIndex { assembly, members })
    }

    pub fn assembly(&self) -> Option<&str> {
        self.assembly.as_deref()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl DocIndex for XmlDocIndex {
    fn fragment(&self, id: &str) -> Option<SummaryFragment> {
        self.members.get(id).cloned()
    }
}

/// Loads each documentation file once and shares it across lookups.
#[derive(Default)]
pub struct DocCache {
    entries: Mutex<HashMap<PathBuf, Arc<XmlDocIndex>>>,
}

impl DocCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&self, path: &Path) -> error::Result<Arc<XmlDocIndex>> {
        if let Some(ix) = self.lock().get(path) {
            return Ok(Arc::clone(ix));
        }
        // Parse outside the lock; a concurrent load of the same path just
        // loses the race below.
        let loaded = Arc::new(XmlDocIndex::load(path)?);
        let mut entries = self.lock();
        let entry = entries
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::clone(&loaded));
        Ok(Arc::clone(entry))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Arc<XmlDocIndex>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
