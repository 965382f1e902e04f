//! @acp:module "Spring Rules"
//! @acp:summary "Stereotype and injection annotations for Spring bean definitions"
//! @acp:domain core
//! @acp:layer service

use tracing::debug;

use crate::annotation::{literal, AnnotationSet, AnnotationSpec, MergeOutcome};
use crate::host::DeclId;
use crate::mapping::{BeanTag, MappingNode};

use super::RuleContext;

pub const COMPONENT: &str = "org.springframework.stereotype.Component";
pub const AUTOWIRED: &str = "org.springframework.beans.factory.annotation.Autowired";
pub const VALUE: &str = "org.springframework.beans.factory.annotation.Value";

/// Annotations that already make a class a Spring bean
pub const STEREOTYPES: [&str; 5] = [
    COMPONENT,
    "org.springframework.stereotype.Service",
    "org.springframework.stereotype.Repository",
    "org.springframework.stereotype.Controller",
    "org.springframework.web.bind.annotation.RestController",
];

/// @acp:summary "Convert one `<bean>` unit"
pub fn apply_bean(ctx: &mut RuleContext<'_>, class: DeclId, unit: &MappingNode) {
    if AnnotationSet::of(&*ctx.model, class).contains_any(&STEREOTYPES) {
        debug!("{} already has a stereotype", ctx.model.display_name(class));
        ctx.report.record(MergeOutcome::AlreadyPresent);
    } else {
        ctx.apply(class, &AnnotationSpec::new(COMPONENT));
    }

    let mut constructor_args = 0;
    for child in unit.children() {
        match child.kind().parse::<BeanTag>() {
            Ok(BeanTag::Property) => property(ctx, class, child),
            Ok(BeanTag::ConstructorArg) => constructor_args += 1,
            _ => ctx.unrecognized(unit, child),
        }
    }

    if constructor_args > 0 {
        constructor(ctx, class, constructor_args);
    }
}

/// Bean reference of a `<property>`: `ref` attribute or nested `<ref bean>`
fn property_ref(tag: &MappingNode) -> Option<&str> {
    tag.attr("ref").or_else(|| {
        tag.first_child(BeanTag::Ref.as_str())
            .and_then(|r| r.attr("bean"))
    })
}

/// Literal value of a `<property>`: `value` attribute or nested `<value>` text
fn property_value(tag: &MappingNode) -> Option<&str> {
    tag.attr("value").or_else(|| {
        tag.first_child(BeanTag::Value.as_str())
            .map(|v| v.text().unwrap_or_default())
    })
}

fn property(ctx: &mut RuleContext<'_>, class: DeclId, tag: &MappingNode) {
    let Some(field) = ctx.field_for(class, tag) else {
        return;
    };

    if property_ref(tag).is_some() {
        ctx.apply(field, &AnnotationSpec::new(AUTOWIRED));
    }
    if let Some(value) = property_value(tag) {
        ctx.apply(field, &AnnotationSpec::new(VALUE).value(literal::string(value)));
    }
}

/// First constructor declaring exactly `args` parameters gets `Autowired`
fn constructor(ctx: &mut RuleContext<'_>, class: DeclId, args: usize) {
    let matched = ctx
        .model
        .constructors(class)
        .into_iter()
        .find(|c| ctx.model.parameter_count(*c) == Some(args));

    match matched {
        Some(ctor) => {
            ctx.apply(ctor, &AnnotationSpec::new(AUTOWIRED));
        }
        None => {
            debug!(
                "No {}-argument constructor on {}",
                args,
                ctx.model.display_name(class)
            );
            ctx.report.targets_missed += 1;
        }
    }
}
