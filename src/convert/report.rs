//! @acp:module "Conversion Report"
//! @acp:summary "Outcome counters and diagnostics of one conversion run"
//! @acp:domain core
//! @acp:layer model

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::annotation::MergeOutcome;
use crate::host::DiagnosticSink;
use crate::mapping::DocumentKind;

/// A unit tag that could not be converted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedUnit {
    pub name: String,
    pub reason: String,
}

/// @acp:summary "What a conversion run did"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    pub document: DocumentKind,
    pub units_selected: usize,
    pub units_converted: usize,
    pub units_skipped: Vec<SkippedUnit>,
    pub annotations_added: usize,
    pub annotations_present: usize,
    pub annotations_rejected: usize,
    /// Member tags whose field or constructor could not be resolved
    pub targets_missed: usize,
    /// `parent/child` tag kinds no rule applies to, with occurrence counts
    pub unrecognized_tags: BTreeMap<String, usize>,
    pub diagnostics: Vec<String>,
}

impl ConversionReport {
    pub fn new(document: DocumentKind) -> Self {
        Self {
            document,
            units_selected: 0,
            units_converted: 0,
            units_skipped: Vec::new(),
            annotations_added: 0,
            annotations_present: 0,
            annotations_rejected: 0,
            targets_missed: 0,
            unrecognized_tags: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: MergeOutcome) {
        match outcome {
            MergeOutcome::Added => self.annotations_added += 1,
            MergeOutcome::AlreadyPresent => self.annotations_present += 1,
            MergeOutcome::Rejected => self.annotations_rejected += 1,
        }
    }

    pub fn skip(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.units_skipped.push(SkippedUnit {
            name: name.into(),
            reason: reason.into(),
        });
    }

    pub fn unrecognized(&mut self, parent: &str, kind: &str) {
        *self
            .unrecognized_tags
            .entry(format!("{}/{}", parent, kind))
            .or_insert(0) += 1;
    }

    /// True when the run changed nothing and reported no problems
    pub fn is_noop(&self) -> bool {
        self.annotations_added == 0 && self.annotations_rejected == 0 && self.units_skipped.is_empty()
    }
}

impl DiagnosticSink for ConversionReport {
    fn emit(&mut self, message: String) {
        warn!("{}", message);
        self.diagnostics.push(message);
    }
}
