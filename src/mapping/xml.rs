//! @acp:module "Mapping Document Loader"
//! @acp:summary "Builds the mapping tag tree from XML text"
//! @acp:domain core
//! @acp:layer service
//!
//! Uses `roxmltree` for parsing. Element spans are byte ranges into the
//! original text so that editor-style selections map directly onto tags.

use std::path::Path;

use super::{DocumentKind, MappingNode, Span};
use crate::error::{ConvertError, Result};

/// @acp:summary "A parsed mapping document with its detected dialect"
#[derive(Debug, Clone)]
pub struct MappingDocument {
    kind: DocumentKind,
    root: MappingNode,
    source: String,
}

impl MappingDocument {
    /// @acp:summary "Parse XML text and detect the dialect from the root tag"
    pub fn parse(text: &str) -> Result<Self> {
        let options = roxmltree::ParsingOptions {
            // Hibernate mappings almost always carry a DOCTYPE
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)?;
        let root = build_node(doc.root_element());

        let mut document = Self::from_root(root)?;
        document.source = text.to_string();
        Ok(document)
    }

    /// Load and parse a mapping file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Wrap an already-built tag tree
    pub fn from_root(root: MappingNode) -> Result<Self> {
        let kind = DocumentKind::from_root_tag(root.kind())
            .ok_or_else(|| ConvertError::UnsupportedDocument(root.kind().to_string()))?;
        Ok(Self {
            kind,
            root,
            source: String::new(),
        })
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn root(&self) -> &MappingNode {
        &self.root
    }

    /// Original XML text (empty for hand-built trees)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// 1-based line number of a byte offset in the source text
    pub fn line_of(&self, offset: usize) -> usize {
        let end = offset.min(self.source.len());
        self.source.as_bytes()[..end]
            .iter()
            .filter(|b| **b == b'\n')
            .count()
            + 1
    }
}

fn build_node(node: roxmltree::Node<'_, '_>) -> MappingNode {
    let range = node.range();
    let mut result =
        MappingNode::new(node.tag_name().name()).with_span(Span::new(range.start, range.end));

    for attribute in node.attributes() {
        result = result.with_attr(attribute.name(), attribute.value());
    }

    let text: String = node
        .children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect();
    let text = text.trim();
    if !text.is_empty() {
        result = result.with_text(text);
    }

    for child in node.children().filter(|c| c.is_element()) {
        result = result.with_child(build_node(child));
    }

    result
}

/// @acp:summary "Convert an inclusive 1-based line range into a byte span"
///
/// The span starts at the first byte of `first_line` and ends after the last
/// byte of `last_line` (including its newline when present).
pub fn line_span(text: &str, first_line: usize, last_line: usize) -> Result<Span> {
    if first_line == 0 || last_line < first_line {
        return Err(ConvertError::InvalidRange(format!(
            "invalid line range {}-{}",
            first_line, last_line
        )));
    }

    let mut line_starts = vec![0usize];
    line_starts.extend(
        text.char_indices()
            .filter(|(_, c)| *c == '\n')
            .map(|(i, _)| i + 1),
    );

    let start = *line_starts.get(first_line - 1).ok_or_else(|| {
        ConvertError::InvalidRange(format!(
            "line {} is past the end of the document ({} lines)",
            first_line,
            line_starts.len()
        ))
    })?;
    let end = line_starts.get(last_line).copied().unwrap_or(text.len());

    Ok(Span::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAPPING: &str = r#"<?xml version="1.0"?>
<!DOCTYPE hibernate-mapping PUBLIC
    "-//Hibernate/Hibernate Mapping DTD 3.0//EN"
    "http://www.hibernate.org/dtd/hibernate-mapping-3.0.dtd">
<hibernate-mapping package="com.shop">
    <class name="Order" table="orders">
        <id name="id" column="order_id"/>
        <property name="note"><column name="note_text" not-null="true"/></property>
    </class>
</hibernate-mapping>
"#;

    #[test]
    fn test_parse_with_doctype() {
        let doc = MappingDocument::parse(MAPPING).unwrap();
        assert_eq!(doc.kind(), DocumentKind::Hibernate);
        assert_eq!(doc.root().attr("package"), Some("com.shop"));

        let class = doc.root().first_child("class").unwrap();
        assert_eq!(class.attr("table"), Some("orders"));
        assert_eq!(class.children().len(), 2);
    }

    #[test]
    fn test_spans_cover_element_text() {
        let doc = MappingDocument::parse(MAPPING).unwrap();
        let class = doc.root().first_child("class").unwrap();
        let span = class.span();
        let text = &MAPPING[span.start..span.end];
        assert!(text.starts_with("<class name=\"Order\""));
        assert!(text.ends_with("</class>"));
    }

    #[test]
    fn test_text_content_is_trimmed() {
        let doc = MappingDocument::parse(
            "<beans><bean class=\"a.B\"><property name=\"p\"><value>\n  42 \n</value></property></bean></beans>",
        )
        .unwrap();
        let value = doc
            .root()
            .first_child("bean")
            .and_then(|b| b.first_child("property"))
            .and_then(|p| p.first_child("value"))
            .unwrap();
        assert_eq!(value.text(), Some("42"));
    }

    #[test]
    fn test_unsupported_root() {
        let err = MappingDocument::parse("<project/>").unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedDocument(tag) if tag == "project"));
    }

    #[test]
    fn test_line_span() {
        let text = "a\nbb\nccc\n";
        assert_eq!(line_span(text, 1, 1).unwrap(), Span::new(0, 2));
        assert_eq!(line_span(text, 2, 3).unwrap(), Span::new(2, 9));
        assert!(line_span(text, 0, 1).is_err());
        assert!(line_span(text, 3, 2).is_err());
        assert!(line_span(text, 9, 9).is_err());
    }

    #[test]
    fn test_line_of() {
        let doc = MappingDocument::parse(MAPPING).unwrap();
        let class = doc.root().first_child("class").unwrap();
        assert_eq!(doc.line_of(class.span().start), 6);
    }
}
