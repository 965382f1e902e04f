//! @acp:module "Annotation Merge Guard"
//! @acp:summary "Prevents duplicate annotations across repeated conversion runs"
//! @acp:domain core
//! @acp:layer service
//!
//! Presence is decided by name identity only. Arguments are never compared,
//! so an existing `@Column(name = "a")` blocks a new `@Column(name = "b")`.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::host::{DeclId, DiagnosticSink, ProjectModel};

/// Java (possibly qualified) identifier
static QUALIFIED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(?:\.[A-Za-z_$][A-Za-z0-9_$]*)*$").unwrap()
});

/// Result of one guarded add
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Annotation appended to the declaration
    Added,
    /// An annotation with the same qualified or simple name already exists
    AlreadyPresent,
    /// Text could not be turned into an annotation; a diagnostic was emitted
    Rejected,
}

/// @acp:summary "Existing annotations keyed by qualified and simple name"
#[derive(Debug, Clone, Default)]
pub struct AnnotationSet {
    names: HashSet<String>,
}

impl AnnotationSet {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for name in names {
            set.insert(name.as_ref());
        }
        set
    }

    /// Snapshot the annotations currently on `decl`
    pub fn of(model: &dyn ProjectModel, decl: DeclId) -> Self {
        Self::from_names(model.annotations(decl))
    }

    pub fn insert(&mut self, name: &str) {
        let name = name.trim_start_matches('@');
        self.names.insert(simple_name(name).to_string());
        self.names.insert(name.to_string());
    }

    /// True when the candidate's qualified or simple name is already present
    pub fn contains(&self, candidate: &str) -> bool {
        let candidate = candidate.trim_start_matches('@');
        self.names.contains(candidate) || self.names.contains(simple_name(candidate))
    }

    pub fn contains_any(&self, candidates: &[&str]) -> bool {
        candidates.iter().any(|c| self.contains(c))
    }
}

/// Last `.`-separated segment of a name
pub fn simple_name(qualified_name: &str) -> &str {
    match qualified_name.rfind('.') {
        Some(idx) if idx > 0 => &qualified_name[idx + 1..],
        _ => qualified_name,
    }
}

/// @acp:summary "Check a list of existing annotation names for a candidate"
pub fn has_annotation<S: AsRef<str>>(existing: &[S], candidate: &str) -> bool {
    AnnotationSet::from_names(existing).contains(candidate)
}

/// @acp:summary "Annotation name from its source text"
///
/// Strips the leading `@` and everything from the first `(`. Returns `None`
/// when what remains is not a Java identifier path.
pub fn extract_qualified_name(annotation_text: &str) -> Option<String> {
    let text = annotation_text.trim();
    let text = text.strip_prefix('@').unwrap_or(text);
    let name = match text.find('(') {
        Some(idx) => &text[..idx],
        None => text,
    }
    .trim();

    if QUALIFIED_NAME.is_match(name) {
        Some(name.to_string())
    } else {
        None
    }
}

/// @acp:summary "Append annotation text unless an equally named one exists"
///
/// Host failures are reported to `sink` and never propagate.
pub fn add_if_absent(
    model: &mut dyn ProjectModel,
    decl: DeclId,
    annotation_text: &str,
    sink: &mut dyn DiagnosticSink,
) -> MergeOutcome {
    let Some(name) = extract_qualified_name(annotation_text) else {
        sink.emit(format!("Failed to add annotation: {}", annotation_text));
        return MergeOutcome::Rejected;
    };

    if AnnotationSet::of(model, decl).contains(&name) {
        debug!(
            "{} already carries @{}, skipping",
            model.display_name(decl),
            simple_name(&name)
        );
        return MergeOutcome::AlreadyPresent;
    }

    match model.append_annotation(decl, annotation_text) {
        Ok(()) => {
            debug!("Added {} to {}", annotation_text, model.display_name(decl));
            MergeOutcome::Added
        }
        Err(e) => {
            sink.emit(format!(
                "Failed to add annotation {} to {}: {}",
                annotation_text,
                model.display_name(decl),
                e
            ));
            MergeOutcome::Rejected
        }
    }
}
