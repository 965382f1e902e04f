//! @acp:module "Composite Key Rules"
//! @acp:summary "Embedded-id and id-class strategies for `<composite-id>`"
//! @acp:domain core
//! @acp:layer service
//!
//! A nested `<class>` selects the embedded strategy; its absence selects
//! id-class. The two never mix.

use crate::annotation::{literal, AnnotationSpec};
use crate::host::DeclId;
use crate::mapping::{HibernateTag, MappingNode};

use super::hibernate::join_column_name;
use super::RuleContext;

/// Which composite key layout a `<composite-id>` describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeStrategy<'n> {
    /// Key fields live on a separate class named by this nested `<class>` tag
    Embedded(&'n MappingNode),
    /// Key fields live on the owning class
    IdClass,
}

impl<'n> CompositeStrategy<'n> {
    pub fn of(tag: &'n MappingNode) -> Self {
        match tag.first_child(HibernateTag::Class.as_str()) {
            Some(class_tag) => CompositeStrategy::Embedded(class_tag),
            None => CompositeStrategy::IdClass,
        }
    }
}

/// @acp:summary "Convert a `<composite-id>` of the class `owner`"
pub fn apply(ctx: &mut RuleContext<'_>, owner: DeclId, tag: &MappingNode) {
    match CompositeStrategy::of(tag) {
        CompositeStrategy::Embedded(class_tag) => embedded(ctx, owner, tag, class_tag),
        CompositeStrategy::IdClass => id_class(ctx, owner, tag),
    }
}

fn embedded(ctx: &mut RuleContext<'_>, owner: DeclId, tag: &MappingNode, class_tag: &MappingNode) {
    let Some(id_field) = ctx.field_for(owner, tag) else {
        return;
    };
    ctx.apply(id_field, &AnnotationSpec::new("EmbeddedId"));

    for child in tag.children() {
        if !std::ptr::eq(child, class_tag) {
            ctx.unrecognized(tag, child);
        }
    }

    let Some(name) = class_tag.attr("name") else {
        return;
    };
    let Some(key_class) = ctx.class_named(name) else {
        return;
    };
    ctx.apply(key_class, &AnnotationSpec::new("Embeddable"));

    for child in class_tag.children() {
        match child.kind().parse::<HibernateTag>() {
            Ok(HibernateTag::KeyProperty) => {
                if let Some(field) = ctx.field_for(key_class, child) {
                    ctx.apply(field, &embedded_column_spec(child));
                }
            }
            Ok(HibernateTag::KeyManyToOne) => {
                if let Some(field) = ctx.field_for(key_class, child) {
                    key_many_to_one(ctx, field, child);
                }
            }
            _ => ctx.unrecognized(class_tag, child),
        }
    }
}

fn id_class(ctx: &mut RuleContext<'_>, owner: DeclId, tag: &MappingNode) {
    if let Some(class_name) = tag.attr("class") {
        ctx.apply(
            owner,
            &AnnotationSpec::new("IdClass").value(literal::class_literal(class_name)),
        );
    }

    for child in tag.children() {
        match child.kind().parse::<HibernateTag>() {
            Ok(HibernateTag::KeyProperty) => {
                if let Some(field) = ctx.field_for(owner, child) {
                    ctx.apply(field, &AnnotationSpec::new("Id"));
                    ctx.apply(field, &key_column_spec(child));
                }
            }
            Ok(HibernateTag::KeyManyToOne) => {
                if let Some(field) = ctx.field_for(owner, child) {
                    ctx.apply(field, &AnnotationSpec::new("Id"));
                    key_many_to_one(ctx, field, child);
                }
            }
            _ => ctx.unrecognized(tag, child),
        }
    }
}

/// `Column(name?)` for a key field of the owning class; bare `@Column` without a column
fn key_column_spec(tag: &MappingNode) -> AnnotationSpec {
    AnnotationSpec::new("Column").attr_opt("name", join_column_name(tag).map(literal::string))
}

/// `Column(name?, length?)` for a field of the embedded key class
fn embedded_column_spec(tag: &MappingNode) -> AnnotationSpec {
    key_column_spec(tag).attr_opt("length", tag.attr("length").map(str::to_string))
}

fn key_many_to_one(ctx: &mut RuleContext<'_>, field: DeclId, tag: &MappingNode) {
    ctx.apply(field, &AnnotationSpec::new("ManyToOne"));
    if let Some(column) = join_column_name(tag) {
        ctx.apply(
            field,
            &AnnotationSpec::new("JoinColumn").attr("name", literal::string(column)),
        );
    }
}
