//! @acp:module "Java Syntax Extraction"
//! @acp:summary "Pulls classes, fields, constructors and annotations out of a tree-sitter CST"
//! @acp:domain host
//! @acp:layer service

use tree_sitter::{Node, Parser};

use crate::error::{ConvertError, Result};

/// Where new import lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImportAnchor {
    /// End of the last import declaration
    AfterImports(usize),
    /// End of the package declaration (no imports yet)
    AfterPackage(usize),
    /// Top of the file
    Start,
}

/// Where new annotations for a declaration go
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InsertionPoint {
    pub offset: usize,
    /// Leading whitespace of the declaration's first line
    pub indent: String,
    /// True when `offset` is the end of the declaration's last annotation
    pub after_annotation: bool,
}

/// One field declaration; `int a, b;` declares two names under one modifier list
#[derive(Debug, Clone)]
pub(crate) struct FieldSyntax {
    pub names: Vec<String>,
    pub annotations: Vec<String>,
    pub point: InsertionPoint,
}

#[derive(Debug, Clone)]
pub(crate) struct ConstructorSyntax {
    pub parameter_count: usize,
    pub annotations: Vec<String>,
    pub point: InsertionPoint,
}

#[derive(Debug, Clone)]
pub(crate) struct ClassSyntax {
    /// Package plus enclosing classes, dot separated
    pub qualified_name: String,
    pub annotations: Vec<String>,
    pub point: InsertionPoint,
    pub fields: Vec<FieldSyntax>,
    pub constructors: Vec<ConstructorSyntax>,
}

/// Everything the project index needs from one compilation unit
#[derive(Debug, Clone)]
pub(crate) struct ParsedSource {
    pub package: Option<String>,
    /// Single-type (`a.b.C`) and on-demand (`a.b.*`) imports; static imports excluded
    pub imports: Vec<String>,
    pub import_anchor: ImportAnchor,
    /// Top-level and nested classes, outer before inner
    pub classes: Vec<ClassSyntax>,
    pub has_errors: bool,
}

pub(crate) fn new_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .map_err(|e| ConvertError::JavaParse(format!("failed to load Java grammar: {}", e)))?;
    Ok(parser)
}

/// @acp:summary "Parse a compilation unit and extract its declarations"
pub(crate) fn parse_source(parser: &mut Parser, source: &str) -> Result<ParsedSource> {
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ConvertError::JavaParse("tree-sitter produced no tree".to_string()))?;
    let root = tree.root_node();

    let mut parsed = ParsedSource {
        package: None,
        imports: Vec::new(),
        import_anchor: ImportAnchor::Start,
        classes: Vec::new(),
        has_errors: root.has_error(),
    };

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "package_declaration" => {
                parsed.package = path_child(child, source);
                parsed.import_anchor = ImportAnchor::AfterPackage(child.end_byte());
            }
            "import_declaration" => {
                if let Some(import) = import_path(child, source) {
                    parsed.imports.push(import);
                }
                parsed.import_anchor = ImportAnchor::AfterImports(child.end_byte());
            }
            "class_declaration" => {
                let package = parsed.package.clone();
                collect_class(child, source, package.as_deref(), &mut parsed.classes);
            }
            _ => {}
        }
    }

    Ok(parsed)
}

/// @acp:summary "Check that text parses as a single annotation"
///
/// The text is placed in front of a stub class; any syntax error, or the
/// text spilling into more than the class's modifiers, fails the check.
pub(crate) fn annotation_parses(parser: &mut Parser, text: &str) -> bool {
    let snippet = format!("{}\nclass AnnotationStub {{}}\n", text.trim());
    let Some(tree) = parser.parse(&snippet, None) else {
        return false;
    };
    let root = tree.root_node();
    if root.has_error() || root.named_child_count() != 1 {
        return false;
    }

    let Some(class) = root.named_child(0) else {
        return false;
    };
    let (annotations, _) = modifiers_of(class, &snippet);
    annotations.len() == 1
}

fn collect_class(node: Node<'_>, source: &str, prefix: Option<&str>, out: &mut Vec<ClassSyntax>) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let name = node_text(name_node, source);
    let qualified_name = match prefix {
        Some(p) if !p.is_empty() => format!("{}.{}", p, name),
        _ => name.to_string(),
    };

    let (annotations, point) = modifiers_of(node, source);
    let mut class = ClassSyntax {
        qualified_name: qualified_name.clone(),
        annotations,
        point,
        fields: Vec::new(),
        constructors: Vec::new(),
    };

    let mut nested = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "field_declaration" => {
                    let (annotations, point) = modifiers_of(member, source);
                    let mut declarators = member.walk();
                    let names: Vec<String> = member
                        .children_by_field_name("declarator", &mut declarators)
                        .filter_map(|d| d.child_by_field_name("name"))
                        .map(|n| node_text(n, source).to_string())
                        .collect();
                    if !names.is_empty() {
                        class.fields.push(FieldSyntax {
                            names,
                            annotations,
                            point,
                        });
                    }
                }
                "constructor_declaration" => {
                    let (annotations, point) = modifiers_of(member, source);
                    class.constructors.push(ConstructorSyntax {
                        parameter_count: parameter_count(member),
                        annotations,
                        point,
                    });
                }
                "class_declaration" => nested.push(member),
                _ => {}
            }
        }
    }

    out.push(class);
    for member in nested {
        collect_class(member, source, Some(&qualified_name), out);
    }
}

/// Annotation names and the insertion point of a declaration
fn modifiers_of(decl: Node<'_>, source: &str) -> (Vec<String>, InsertionPoint) {
    let indent = line_indent(source, decl.start_byte());
    let mut annotations = Vec::new();
    let mut last_annotation_end = None;

    let mut cursor = decl.walk();
    for child in decl.children(&mut cursor) {
        if child.kind() != "modifiers" {
            continue;
        }
        let mut inner = child.walk();
        for modifier in child.named_children(&mut inner) {
            if matches!(modifier.kind(), "marker_annotation" | "annotation") {
                if let Some(name) = modifier.child_by_field_name("name") {
                    annotations.push(node_text(name, source).to_string());
                }
                last_annotation_end = Some(modifier.end_byte());
            }
        }
    }

    let point = match last_annotation_end {
        Some(end) => InsertionPoint {
            offset: end,
            indent,
            after_annotation: true,
        },
        None => InsertionPoint {
            offset: decl.start_byte(),
            indent,
            after_annotation: false,
        },
    };
    (annotations, point)
}

fn parameter_count(constructor: Node<'_>) -> usize {
    let Some(params) = constructor.child_by_field_name("parameters") else {
        return 0;
    };
    let mut cursor = params.walk();
    let count = params
        .named_children(&mut cursor)
        .filter(|p| matches!(p.kind(), "formal_parameter" | "spread_parameter"))
        .count();
    count
}

fn import_path(import: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = import.walk();
    let children: Vec<Node<'_>> = import.children(&mut cursor).collect();
    if children.iter().any(|c| c.kind() == "static") {
        return None;
    }

    let path = children
        .iter()
        .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"))
        .map(|c| node_text(*c, source).to_string())?;

    if children.iter().any(|c| c.kind() == "asterisk") {
        Some(format!("{}.*", path))
    } else {
        Some(path)
    }
}

fn path_child(node: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    let path = node
        .named_children(&mut cursor)
        .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"))
        .map(|c| node_text(c, source).to_string());
    path
}

fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    &source[node.byte_range()]
}

/// Whitespace between the start of the line and `offset`, or nothing when
/// the declaration does not start its line
fn line_indent(source: &str, offset: usize) -> String {
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let prefix = &source[line_start..offset];
    if prefix.chars().all(|c| c == ' ' || c == '\t') {
        prefix.to_string()
    } else {
        String::new()
    }
}
