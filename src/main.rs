#![forbid(unsafe_code)]
//! xml2anno command line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

use xml2anno::commands::{
    execute_convert, execute_init, execute_units, ConvertOptions, InitOptions, UnitsOptions,
};
use xml2anno::config::CONFIG_FILE;
use xml2anno::{Config, DocumentKind, OutputFormat, Span};

#[derive(Parser)]
#[command(name = "xml2anno")]
#[command(about = "Convert Hibernate and Spring XML mappings into Java annotations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, env = "XML2ANNO_CONFIG", default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,

        /// Java source root to record
        #[arg(long)]
        source: Option<PathBuf>,
    },

    /// Convert a mapping file into annotations
    Convert {
        /// Hibernate mapping or Spring beans XML file
        mapping: PathBuf,

        /// Java source root (default: sourceRoot from the config)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Expected document dialect
        #[arg(long, value_enum, default_value = "auto")]
        kind: KindArg,

        /// Only convert units inside this byte range (S..E)
        #[arg(long, conflicts_with = "lines")]
        range: Option<Span>,

        /// Only convert units inside these lines (A-B, 1-based, inclusive)
        #[arg(long)]
        lines: Option<Span>,

        /// Output format (default: from the config)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Write the changed Java files
        #[arg(long)]
        apply: bool,
    },

    /// List the convertible units of a mapping file
    Units {
        /// Hibernate mapping or Spring beans XML file
        mapping: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Auto,
    Hibernate,
    Spring,
}

impl From<KindArg> for Option<DocumentKind> {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Auto => None,
            KindArg::Hibernate => Some(DocumentKind::Hibernate),
            KindArg::Spring => Some(DocumentKind::Spring),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Diff,
    Summary,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Diff => OutputFormat::Diff,
            FormatArg::Summary => OutputFormat::Summary,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("xml2anno=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load config
    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Init { force, source } => execute_init(InitOptions {
            path: cli.config,
            force,
            source_root: source,
        }),
        Commands::Convert {
            mapping,
            source,
            kind,
            range,
            lines,
            format,
            apply,
        } => execute_convert(
            ConvertOptions {
                mapping,
                source,
                kind: kind.into(),
                range,
                lines,
                format: format.map(Into::into),
                apply,
            },
            config,
        ),
        Commands::Units { mapping, json } => execute_units(UnitsOptions { mapping, json }),
    };

    if let Err(e) = &result {
        eprintln!("{} {:#}", style("✗").red(), e);
        std::process::exit(1);
    }
    Ok(())
}
