//! @acp:module "Conversion Controller"
//! @acp:summary "Selects unit tags and dispatches them to rule resolvers"
//! @acp:domain core
//! @acp:layer service
//!
//! One run converts the selected units of one document inside a single host
//! write section. A unit that cannot be resolved is recorded and skipped;
//! it never stops the units after it.

mod report;

use tracing::{debug, info};

use crate::error::Result;
use crate::host::{ProjectModel, WriteScope};
use crate::mapping::{DocumentKind, MappingDocument, MappingNode, Span};
use crate::rules::{hibernate, qualify_class_name, spring, RuleContext};

pub use report::{ConversionReport, SkippedUnit};

/// @acp:summary "Unit tags to convert"
///
/// Without a range: the root's immediate children of `unit_kind`. With a
/// range: every `unit_kind` tag anywhere below the root whose span lies
/// inside it, in document order.
pub fn select_units<'a>(
    root: &'a MappingNode,
    unit_kind: &str,
    range: Option<Span>,
) -> Vec<&'a MappingNode> {
    match range {
        None => root
            .children()
            .iter()
            .filter(|node| node.kind() == unit_kind)
            .collect(),
        Some(range) => root
            .descendants()
            .filter(|node| node.kind() == unit_kind && range.contains(node.span()))
            .collect(),
    }
}

/// @acp:summary "Convert a mapping document into annotations on `project`"
///
/// Fails only when the host refuses to open the write section.
pub fn convert<W: WriteScope>(
    document: &MappingDocument,
    range: Option<Span>,
    project: &mut W,
) -> Result<ConversionReport> {
    let kind = document.kind();
    let units = select_units(document.root(), kind.unit_tag(), range);
    let package = match kind {
        DocumentKind::Hibernate => document.root().attr("package"),
        DocumentKind::Spring => None,
    };

    let mut report = ConversionReport::new(kind);
    report.units_selected = units.len();
    match range {
        Some(range) => info!("Converting {} {} units in {}", units.len(), kind.name(), range),
        None => info!("Converting {} {} units", units.len(), kind.name()),
    }

    let label = format!("Convert {} to annotations", kind.name());
    project.write_section(&label, |p| {
        for unit in &units {
            dispatch(&mut *p, kind, package, unit, &mut report);
        }
    })?;

    info!(
        "{} converted, {} skipped, {} annotations added, {} already present",
        report.units_converted,
        report.units_skipped.len(),
        report.annotations_added,
        report.annotations_present
    );
    Ok(report)
}

/// Resolve a unit's class and run its rules
fn dispatch(
    model: &mut dyn ProjectModel,
    kind: DocumentKind,
    package: Option<&str>,
    unit: &MappingNode,
    report: &mut ConversionReport,
) {
    let attr = kind.unit_class_attr();
    let Some(name) = unit.attr(attr) else {
        debug!("<{}> at {} has no {} attribute", unit.kind(), unit.span(), attr);
        report.skip(
            format!("<{}> at {}", unit.kind(), unit.span()),
            format!("missing {} attribute", attr),
        );
        return;
    };

    let qualified = qualify_class_name(package, name);
    let Some(class) = model.resolve_class(&qualified) else {
        debug!("Class {} not found, skipping unit", qualified);
        report.skip(qualified, "class not found");
        return;
    };

    debug!("Dispatching <{}> {}", unit.kind(), qualified);
    let mut ctx = RuleContext::new(model, report, package);
    match kind {
        DocumentKind::Hibernate => hibernate::apply_class(&mut ctx, class, unit),
        DocumentKind::Spring => spring::apply_bean(&mut ctx, class, unit),
    }
    report.units_converted += 1;
}
