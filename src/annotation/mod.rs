//! @acp:module "Annotation Synthesizer"
//! @acp:summary "Builds Java annotation source text from names and attributes"
//! @acp:domain core
//! @acp:layer service
//!
//! Values are literal source text: callers quote strings and leave enum
//! constants and class literals bare. The helpers in [`literal`] produce the
//! common forms.

pub mod guard;

use std::fmt;

pub use guard::{
    add_if_absent, extract_qualified_name, has_annotation, simple_name, AnnotationSet,
    MergeOutcome,
};

/// Element name Java lets a sole attribute omit
pub const VALUE_ELEMENT: &str = "value";

/// @acp:summary "Render `@name` or `@name(key = value, ...)`"
///
/// A single attribute named `value` uses the shorthand `@name(v)`.
pub fn build(name: &str, attributes: &[(String, String)]) -> String {
    match attributes {
        [] => return format!("@{}", name),
        [(key, value)] if key == VALUE_ELEMENT => return format!("@{}({})", name, value),
        _ => {}
    }

    let joined = attributes
        .iter()
        .map(|(key, value)| format!("{} = {}", key, value))
        .collect::<Vec<_>>()
        .join(", ");
    format!("@{}({})", name, joined)
}

/// @acp:summary "An annotation to be synthesized"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSpec {
    name: String,
    attributes: Vec<(String, String)>,
    explicit_parens: bool,
}

impl AnnotationSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            explicit_parens: false,
        }
    }

    /// Builder: append an attribute
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// Builder: append an attribute only when a value is present
    pub fn attr_opt(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Builder: set the `value` element
    pub fn value(self, value: impl Into<String>) -> Self {
        self.attr(VALUE_ELEMENT, value)
    }

    /// Builder: render `@Name()` instead of `@Name` when no attributes are set
    pub fn parenthesized(mut self) -> Self {
        self.explicit_parens = true;
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((key.into(), value.into()));
    }

    /// Annotation source text
    pub fn render(&self) -> String {
        if self.attributes.is_empty() && self.explicit_parens {
            return format!("@{}()", self.name);
        }
        build(&self.name, &self.attributes)
    }
}

impl fmt::Display for AnnotationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Literal value formatting for annotation attributes
pub mod literal {
    /// `"value"`, no escaping
    pub fn string(value: &str) -> String {
        format!("\"{}\"", value)
    }

    /// `Type.VALUE`, upper-cased but not checked against the enum
    pub fn enum_constant(type_name: &str, value: &str) -> String {
        format!("{}.{}", type_name, value.to_uppercase())
    }

    /// `Name.class`
    pub fn class_literal(name: &str) -> String {
        format!("{}.class", name)
    }

    /// `{a, b, c}`
    pub fn array<I, S>(items: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = items
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{}}}", joined)
    }

    /// Java `Boolean.parseBoolean`: true only for a case-insensitive `"true"`
    pub fn java_boolean(value: &str) -> bool {
        value.eq_ignore_ascii_case("true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_attributes() {
        assert_eq!(build("Entity", &[]), "@Entity");
        assert_eq!(
            build("org.springframework.stereotype.Component", &[]),
            "@org.springframework.stereotype.Component"
        );
    }

    #[test]
    fn test_build_keeps_insertion_order() {
        let attrs = vec![
            ("name".to_string(), literal::string("orders")),
            ("schema".to_string(), literal::string("sales")),
        ];
        assert_eq!(
            build("Table", &attrs),
            r#"@Table(name = "orders", schema = "sales")"#
        );
    }

    #[test]
    fn test_single_value_shorthand() {
        assert_eq!(
            AnnotationSpec::new("Temporal")
                .value("TemporalType.TIMESTAMP")
                .render(),
            "@Temporal(TemporalType.TIMESTAMP)"
        );
        assert_eq!(
            AnnotationSpec::new("IdClass")
                .value(literal::class_literal("OrderKey"))
                .render(),
            "@IdClass(OrderKey.class)"
        );
        let attrs = vec![
            ("value".to_string(), literal::string("a")),
            ("required".to_string(), "false".to_string()),
        ];
        assert_eq!(build("Value", &attrs), r#"@Value(value = "a", required = false)"#);
    }

    #[test]
    fn test_spec_render() {
        let spec = AnnotationSpec::new("ManyToOne")
            .attr("fetch", literal::enum_constant("FetchType", "lazy"));
        assert_eq!(spec.render(), "@ManyToOne(fetch = FetchType.LAZY)");

        let spec = AnnotationSpec::new("Column")
            .attr("name", literal::string("id"))
            .attr_opt("length", None)
            .attr_opt("unique", Some("true".to_string()));
        assert_eq!(spec.to_string(), r#"@Column(name = "id", unique = true)"#);
    }

    #[test]
    fn test_parenthesized_only_when_empty() {
        assert_eq!(AnnotationSpec::new("OneToMany").parenthesized().render(), "@OneToMany()");
        assert_eq!(AnnotationSpec::new("OneToMany").render(), "@OneToMany");
        assert_eq!(
            AnnotationSpec::new("OneToMany")
                .parenthesized()
                .attr("mappedBy", literal::string("owner"))
                .render(),
            r#"@OneToMany(mappedBy = "owner")"#
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(literal::class_literal("OrderKey"), "OrderKey.class");
        assert_eq!(literal::array(["@A", "@B"]), "{@A, @B}");
        assert_eq!(literal::array(Vec::<String>::new()), "{}");
        assert!(literal::java_boolean("TRUE"));
        assert!(!literal::java_boolean("yes"));
        assert!(!literal::java_boolean(""));
    }
}
