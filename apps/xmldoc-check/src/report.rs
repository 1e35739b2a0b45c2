//! Reporting sink injected into the walker.
//!
//! The walker streams one `Finding` per element in namespace, type, category
//! order. Console rendering lives in `output`.

use crate::key::ElementKind;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Per-element record: what was checked and what summary it has.
pub struct Finding {
    pub kind: ElementKind,
    pub qualified_name: String,
    /// `None` marks a missing summary.
    pub summary: Option<String>,
}

impl Finding {
    pub fn is_missing(&self) -> bool {
        self.summary.is_none()
    }
}

pub trait Reporter {
    fn finding(&mut self, finding: Finding);
}

/// Discards everything.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn finding(&mut self, _finding: Finding) {}
}

/// Buffers findings, e.g. to replay them in order after a parallel run.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub findings: Vec<Finding>,
}

impl CollectingReporter {
    pub fn replay(self, sink: &mut dyn Reporter) {
        for f in self.findings {
            sink.finding(f);
        }
    }
}

impl Reporter for CollectingReporter {
    fn finding(&mut self, finding: Finding) {
        self.findings.push(finding);
    }
}
