//! @acp:module "Convert Command"
//! @acp:summary "Convert a mapping document into annotations on a Java tree"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `xml2anno convert`. Previews by default; `--apply` writes the
//! changed Java files.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use console::style;
use serde::Serialize;

use crate::config::{Config, OutputFormat};
use crate::convert::{convert, ConversionReport};
use crate::host::{FileChange, JavaProject};
use crate::mapping::{line_span, DocumentKind, MappingDocument, Span};

/// Options for the convert command
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Mapping file to convert
    pub mapping: PathBuf,
    /// Java source root (overrides the config)
    pub source: Option<PathBuf>,
    /// Expected dialect; `None` detects it from the root tag
    pub kind: Option<DocumentKind>,
    /// Byte range limiting the converted units
    pub range: Option<Span>,
    /// Inclusive 1-based line range limiting the converted units
    pub lines: Option<Span>,
    /// Output format (overrides the config)
    pub format: Option<OutputFormat>,
    /// Write changed files instead of previewing
    pub apply: bool,
}

/// Everything one convert invocation produced
#[derive(Debug, Clone, Serialize)]
pub struct ConvertRun {
    pub report: ConversionReport,
    pub changes: Vec<FileChange>,
    pub written: Vec<PathBuf>,
}

/// @acp:summary "Load, convert and optionally save, without printing"
pub fn run_convert(options: &ConvertOptions, config: &Config) -> Result<ConvertRun> {
    let document = MappingDocument::load(&options.mapping)
        .with_context(|| format!("Failed to load {}", options.mapping.display()))?;

    if let Some(expected) = options.kind {
        if document.kind() != expected {
            bail!(
                "{} is a {} document, not {}",
                options.mapping.display(),
                document.kind().name(),
                expected.name()
            );
        }
    }

    let range = match (options.range, options.lines) {
        (Some(_), Some(_)) => bail!("--range and --lines are mutually exclusive"),
        (Some(range), None) => Some(range),
        (None, Some(lines)) => Some(line_span(document.source(), lines.start, lines.end)?),
        (None, None) => None,
    };

    let source_root = options
        .source
        .clone()
        .unwrap_or_else(|| config.source_root.clone());
    let mut project = JavaProject::load(&source_root, config)
        .with_context(|| format!("Failed to index {}", source_root.display()))?;
    if project.file_count() == 0 {
        bail!("No Java files found under {}", source_root.display());
    }

    let report = convert(&document, range, &mut project)?;
    let changes = project.changes();
    let written = if options.apply { project.save()? } else { Vec::new() };

    Ok(ConvertRun {
        report,
        changes,
        written,
    })
}

/// Execute the convert command
pub fn execute_convert(options: ConvertOptions, config: Config) -> Result<()> {
    let format = options.format.unwrap_or(config.output.format);
    if format != OutputFormat::Json {
        println!(
            "{} Converting {}...",
            style("→").cyan(),
            options.mapping.display()
        );
    }

    let run = run_convert(&options, &config)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&run)?);
            return Ok(());
        }
        OutputFormat::Diff if !options.apply => {
            for change in &run.changes {
                print_diff(change);
            }
        }
        _ => {}
    }

    print_summary(&run, options.apply);
    Ok(())
}

fn print_diff(change: &FileChange) {
    for line in change.unified_diff().lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", style(line).bold());
        } else if line.starts_with('+') {
            println!("{}", style(line).green());
        } else if line.starts_with('-') {
            println!("{}", style(line).red());
        } else if line.starts_with("@@") {
            println!("{}", style(line).cyan());
        } else {
            println!("{}", line);
        }
    }
}

fn print_summary(run: &ConvertRun, applied: bool) {
    let report = &run.report;

    println!(
        "{} {} of {} units converted ({} annotations added, {} already present)",
        style("✓").green(),
        report.units_converted,
        report.units_selected,
        report.annotations_added,
        report.annotations_present
    );

    for skipped in &report.units_skipped {
        println!(
            "  {} skipped {}: {}",
            style("⚠").yellow(),
            skipped.name,
            skipped.reason
        );
    }
    if report.targets_missed > 0 {
        println!(
            "  {} {} mapped members not found in the Java sources",
            style("⚠").yellow(),
            report.targets_missed
        );
    }
    for (tag, count) in &report.unrecognized_tags {
        println!("  {} no rule for <{}> ({}x)", style("·").dim(), tag, count);
    }
    for diagnostic in &report.diagnostics {
        println!("  {} {}", style("✗").red(), diagnostic);
    }

    if applied {
        println!(
            "{} Wrote {} files",
            style("✓").green(),
            run.written.len()
        );
    } else if !run.changes.is_empty() {
        println!(
            "{} {} files would change. Re-run with {} to write them.",
            style("→").cyan(),
            run.changes.len(),
            style("--apply").cyan()
        );
    }
}
