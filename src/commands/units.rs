//! @acp:module "Units Command"
//! @acp:summary "List the convertible units of a mapping document"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `xml2anno units`. Spans and line numbers printed here are what
//! `convert --range` and `convert --lines` take.

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use crate::mapping::MappingDocument;

/// Options for the units command
#[derive(Debug, Clone)]
pub struct UnitsOptions {
    /// Mapping file to inspect
    pub mapping: PathBuf,
    /// Output as JSON
    pub json: bool,
}

/// One unit tag of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitEntry {
    pub name: Option<String>,
    pub start: usize,
    pub end: usize,
    pub first_line: usize,
    pub last_line: usize,
    pub children: usize,
}

/// Every unit tag in the document, nested ones included
pub fn list_units(document: &MappingDocument) -> Vec<UnitEntry> {
    let kind = document.kind();
    document
        .root()
        .descendants()
        .filter(|node| node.kind() == kind.unit_tag())
        .map(|node| {
            let span = node.span();
            UnitEntry {
                name: node.attr(kind.unit_class_attr()).map(str::to_string),
                start: span.start,
                end: span.end,
                first_line: document.line_of(span.start),
                last_line: document.line_of(span.end.saturating_sub(1)),
                children: node.children().len(),
            }
        })
        .collect()
}

/// Execute the units command
pub fn execute_units(options: UnitsOptions) -> Result<()> {
    let document = MappingDocument::load(&options.mapping)
        .with_context(|| format!("Failed to load {}", options.mapping.display()))?;
    let units = list_units(&document);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&units)?);
        return Ok(());
    }

    println!(
        "{} {} ({} units)",
        style("→").cyan(),
        style(document.kind().name()).bold(),
        units.len()
    );
    for unit in &units {
        println!(
            "  {:<40} {:>6}..{:<6} lines {}-{}",
            unit.name.as_deref().unwrap_or("<unnamed>"),
            unit.start,
            unit.end,
            unit.first_line,
            unit.last_line
        );
    }
    Ok(())
}
