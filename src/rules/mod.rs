//! @acp:module "Tag Rule Resolvers"
//! @acp:summary "One rule per mapping concept, each writing through the merge guard"
//! @acp:domain core
//! @acp:layer service
//!
//! Resolvers never fail. A tag without its `name`, or naming a member the
//! class does not declare, is skipped and counted; everything else flows
//! into [`add_if_absent`].

pub mod composite;
pub mod hibernate;
pub mod spring;

use tracing::debug;

use crate::annotation::{add_if_absent, AnnotationSpec, MergeOutcome};
use crate::convert::ConversionReport;
use crate::host::{DeclId, ProjectModel};
use crate::mapping::MappingNode;

/// Qualify a class name written relative to a mapping's default package
pub fn qualify_class_name(package: Option<&str>, name: &str) -> String {
    match package {
        Some(package) if !package.is_empty() && !name.contains('.') => {
            format!("{}.{}", package, name)
        }
        _ => name.to_string(),
    }
}

/// @acp:summary "Host, report and document defaults shared by all rules of a run"
pub struct RuleContext<'a> {
    pub model: &'a mut dyn ProjectModel,
    pub report: &'a mut ConversionReport,
    package: Option<&'a str>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        model: &'a mut dyn ProjectModel,
        report: &'a mut ConversionReport,
        package: Option<&'a str>,
    ) -> Self {
        Self {
            model,
            report,
            package,
        }
    }

    /// Render `spec` and add it to `decl` unless an equally named annotation exists
    pub fn apply(&mut self, decl: DeclId, spec: &AnnotationSpec) -> MergeOutcome {
        let outcome = add_if_absent(&mut *self.model, decl, &spec.render(), &mut *self.report);
        self.report.record(outcome);
        outcome
    }

    /// Field of `owner` named by the tag's `name` attribute
    pub fn field_for(&mut self, owner: DeclId, tag: &MappingNode) -> Option<DeclId> {
        let name = tag.attr("name")?;
        let field = self.model.find_field(owner, name);
        if field.is_none() {
            debug!(
                "No field '{}' on {} for <{}>, skipping",
                name,
                self.model.display_name(owner),
                tag.kind()
            );
            self.report.targets_missed += 1;
        }
        field
    }

    /// Class named by `name`, qualified with the document package
    pub fn class_named(&mut self, name: &str) -> Option<DeclId> {
        let qualified = qualify_class_name(self.package, name);
        let class = self.model.resolve_class(&qualified);
        if class.is_none() {
            debug!("Class {} not found, skipping", qualified);
            self.report.targets_missed += 1;
        }
        class
    }

    /// Record a child tag no rule applies to
    pub fn unrecognized(&mut self, parent: &MappingNode, child: &MappingNode) {
        debug!("No rule for <{}> inside <{}>", child.kind(), parent.kind());
        self.report.unrecognized(parent.kind(), child.kind());
    }
}
