//! @acp:module "Mapping Model"
//! @acp:summary "Read-only tag tree consumed by the conversion rules"
//! @acp:domain core
//! @acp:layer model
//!
//! A [`MappingNode`] is one tag of a mapping document: its kind, ordered
//! attributes, ordered children and the byte span it occupies in the source
//! text. Nodes are built once (by [`xml::MappingDocument`] or by hand in tests)
//! and never mutated by the engine.

pub mod vocabulary;
pub mod xml;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

pub use vocabulary::{BeanTag, DocumentKind, HibernateTag};
pub use xml::{line_span, MappingDocument};

/// Accepts `10..20`, `10:20` and `10-20`
static SPAN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*(?:\.\.|:|-)\s*(\d+)\s*$").unwrap());

/// @acp:summary "Half-open byte range in a source document"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// True when `other` lies entirely inside this span
    pub fn contains(&self, other: Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl FromStr for Span {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = SPAN_PATTERN
            .captures(s)
            .ok_or_else(|| ConvertError::InvalidRange(format!("expected START..END, got '{}'", s)))?;

        let start: usize = caps[1]
            .parse()
            .map_err(|_| ConvertError::InvalidRange(s.to_string()))?;
        let end: usize = caps[2]
            .parse()
            .map_err(|_| ConvertError::InvalidRange(s.to_string()))?;

        if end < start {
            return Err(ConvertError::InvalidRange(format!(
                "end {} is before start {}",
                end, start
            )));
        }
        Ok(Span { start, end })
    }
}

/// @acp:summary "One tag of a mapping document"
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MappingNode {
    kind: String,
    attributes: Vec<(String, String)>,
    children: Vec<MappingNode>,
    text: Option<String>,
    span: Span,
}

impl MappingNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute (later duplicates shadow nothing, first wins on lookup)
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: MappingNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Tag name, e.g. `class`, `many-to-one`, `bean`
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[MappingNode] {
        &self.children
    }

    /// Trimmed character content, if the tag had any
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// First direct child of the given kind
    pub fn first_child(&self, kind: &str) -> Option<&MappingNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// All direct children of the given kind, in document order
    pub fn children_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a MappingNode> + 'a {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// Pre-order walk over every tag below this one (the node itself excluded)
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }
}

/// @acp:summary "Document-order iterator over a subtree"
pub struct Descendants<'a> {
    stack: Vec<&'a MappingNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a MappingNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MappingNode {
        MappingNode::new("root")
            .with_child(
                MappingNode::new("a")
                    .with_child(MappingNode::new("a1"))
                    .with_child(MappingNode::new("a2")),
            )
            .with_child(MappingNode::new("b").with_attr("name", "x"))
    }

    #[test]
    fn test_descendants_document_order() {
        let root = sample();
        let kinds: Vec<&str> = root.descendants().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec!["a", "a1", "a2", "b"]);
    }

    #[test]
    fn test_attribute_lookup() {
        let root = sample();
        let b = root.first_child("b").unwrap();
        assert_eq!(b.attr("name"), Some("x"));
        assert_eq!(b.attr("missing"), None);
        assert!(root.first_child("c").is_none());
    }

    #[test]
    fn test_span_parse_forms() {
        assert_eq!("10..20".parse::<Span>().unwrap(), Span::new(10, 20));
        assert_eq!("10:20".parse::<Span>().unwrap(), Span::new(10, 20));
        assert_eq!(" 3 - 7 ".parse::<Span>().unwrap(), Span::new(3, 7));
        assert!("20..10".parse::<Span>().is_err());
        assert!("abc".parse::<Span>().is_err());
    }

    #[test]
    fn test_span_contains() {
        let outer = Span::new(10, 50);
        assert!(outer.contains(Span::new(10, 50)));
        assert!(outer.contains(Span::new(20, 30)));
        assert!(!outer.contains(Span::new(5, 30)));
        assert!(!outer.contains(Span::new(20, 51)));
    }
}
