//! @acp:module "Hibernate Rules"
//! @acp:summary "JPA annotations for Hibernate class mappings"
//! @acp:domain core
//! @acp:layer service

use crate::annotation::{literal, AnnotationSpec};
use crate::host::DeclId;
use crate::mapping::{HibernateTag, MappingNode};

use super::{composite, RuleContext};

/// @acp:summary "Map a generator class to a `GenerationType` constant"
///
/// Case-insensitive; anything unrecognized (`native`, `uuid`, ...) is `AUTO`.
pub fn generation_type(generator: &str) -> &'static str {
    match generator.to_ascii_lowercase().as_str() {
        "identity" => "IDENTITY",
        "sequence" => "SEQUENCE",
        "table" => "TABLE",
        _ => "AUTO",
    }
}

/// @acp:summary "Convert one `<class>` unit"
pub fn apply_class(ctx: &mut RuleContext<'_>, class: DeclId, unit: &MappingNode) {
    ctx.apply(class, &AnnotationSpec::new("Entity"));
    if let Some(table) = table_spec(unit) {
        ctx.apply(class, &table);
    }

    for child in unit.children() {
        match child.kind().parse::<HibernateTag>() {
            Ok(HibernateTag::Id) => id(ctx, class, child),
            Ok(HibernateTag::Property) => property(ctx, class, child),
            Ok(HibernateTag::ManyToOne) => many_to_one(ctx, class, child),
            Ok(HibernateTag::OneToMany) => one_to_many(ctx, class, child),
            Ok(HibernateTag::ManyToMany) => many_to_many(ctx, class, child),
            Ok(HibernateTag::CompositeId) => composite::apply(ctx, class, child),
            _ => ctx.unrecognized(unit, child),
        }
    }
}

fn table_spec(unit: &MappingNode) -> Option<AnnotationSpec> {
    let table = unit.attr("table")?;
    Some(
        AnnotationSpec::new("Table")
            .attr("name", literal::string(table))
            .attr_opt("schema", unit.attr("schema").map(literal::string))
            .attr_opt("catalog", unit.attr("catalog").map(literal::string)),
    )
}

fn id(ctx: &mut RuleContext<'_>, class: DeclId, tag: &MappingNode) {
    let Some(field) = ctx.field_for(class, tag) else {
        return;
    };
    ctx.apply(field, &AnnotationSpec::new("Id"));

    let generator = tag.attr("generator-class").or_else(|| {
        tag.first_child(HibernateTag::Generator.as_str())
            .and_then(|g| g.attr("class"))
    });
    if let Some(generator) = generator {
        let strategy = format!("GenerationType.{}", generation_type(generator));
        ctx.apply(
            field,
            &AnnotationSpec::new("GeneratedValue").attr("strategy", strategy),
        );
    }

    column_detail(ctx, field, tag);
}

fn property(ctx: &mut RuleContext<'_>, class: DeclId, tag: &MappingNode) {
    let Some(field) = ctx.field_for(class, tag) else {
        return;
    };
    column_detail(ctx, field, tag);

    if tag.attr("type").is_some_and(|t| t.contains("timestamp")) {
        ctx.apply(
            field,
            &AnnotationSpec::new("Temporal").value("TemporalType.TIMESTAMP"),
        );
    }
}

/// @acp:summary "`Column(name, length?, nullable?, unique?)` for a mapped column"
///
/// The column comes from the tag's `column` attribute or, failing that, a
/// nested `<column name="...">`. No column, no annotation. `unique` is
/// copied as written while `not-null` is parsed and negated.
pub fn column_spec(tag: &MappingNode) -> Option<AnnotationSpec> {
    let (source, name) = match tag.attr("column") {
        Some(name) => (tag, name),
        None => {
            let column = tag.first_child(HibernateTag::Column.as_str())?;
            (column, column.attr("name")?)
        }
    };

    Some(
        AnnotationSpec::new("Column")
            .attr("name", literal::string(name))
            .attr_opt("length", source.attr("length").map(str::to_string))
            .attr_opt(
                "nullable",
                source
                    .attr("not-null")
                    .map(|v| (!literal::java_boolean(v)).to_string()),
            )
            .attr_opt("unique", source.attr("unique").map(str::to_string)),
    )
}

fn column_detail(ctx: &mut RuleContext<'_>, field: DeclId, tag: &MappingNode) {
    if let Some(column) = column_spec(tag) {
        ctx.apply(field, &column);
    }
}

/// Join column named by a `column` attribute or nested `<column name>`
pub(crate) fn join_column_name(tag: &MappingNode) -> Option<&str> {
    tag.attr("column").or_else(|| {
        tag.first_child(HibernateTag::Column.as_str())
            .and_then(|c| c.attr("name"))
    })
}

fn fetch_type(tag: &MappingNode) -> Option<String> {
    tag.attr("fetch")
        .map(|fetch| literal::enum_constant("FetchType", fetch))
}

fn many_to_one(ctx: &mut RuleContext<'_>, class: DeclId, tag: &MappingNode) {
    let Some(field) = ctx.field_for(class, tag) else {
        return;
    };
    ctx.apply(
        field,
        &AnnotationSpec::new("ManyToOne").attr_opt("fetch", fetch_type(tag)),
    );

    if let Some(column) = join_column_name(tag) {
        ctx.apply(
            field,
            &AnnotationSpec::new("JoinColumn").attr("name", literal::string(column)),
        );
    }
}

/// `OneToMany(...)` / `ManyToMany(...)`, always in call form
fn collection_spec(name: &str, tag: &MappingNode) -> AnnotationSpec {
    AnnotationSpec::new(name)
        .parenthesized()
        .attr_opt("mappedBy", tag.attr("mapped-by").map(literal::string))
        .attr_opt("fetch", fetch_type(tag))
}

fn one_to_many(ctx: &mut RuleContext<'_>, class: DeclId, tag: &MappingNode) {
    let Some(field) = ctx.field_for(class, tag) else {
        return;
    };
    ctx.apply(field, &collection_spec("OneToMany", tag));
}

fn many_to_many(ctx: &mut RuleContext<'_>, class: DeclId, tag: &MappingNode) {
    let Some(field) = ctx.field_for(class, tag) else {
        return;
    };
    ctx.apply(field, &collection_spec("ManyToMany", tag));

    if let Some(join_table) = tag.first_child(HibernateTag::JoinTable.as_str()) {
        ctx.apply(field, &join_table_spec(join_table));
    }
}

/// @acp:summary "`JoinTable(name?, joinColumns = {...})`"
///
/// `joinColumns` is left out entirely when there are no `<join-column>` tags.
pub fn join_table_spec(tag: &MappingNode) -> AnnotationSpec {
    let join_columns: Vec<String> = tag
        .children_of(HibernateTag::JoinColumn.as_str())
        .map(|column| {
            AnnotationSpec::new("JoinColumn")
                .parenthesized()
                .attr_opt("name", column.attr("name").map(literal::string))
                .attr_opt(
                    "referencedColumnName",
                    column.attr("referenced-column-name").map(literal::string),
                )
                .render()
        })
        .collect();

    let mut spec = AnnotationSpec::new("JoinTable")
        .parenthesized()
        .attr_opt("name", tag.attr("name").map(literal::string));
    if !join_columns.is_empty() {
        spec.push("joinColumns", literal::array(join_columns));
    }
    spec
}
