//! @acp:module "Init Command"
//! @acp:summary "Write a default project configuration"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `xml2anno init`.

use std::path::PathBuf;

use anyhow::{bail, Result};
use console::style;

use crate::config::{Config, CONFIG_FILE};

/// Options for the init command
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Where to write the config
    pub path: PathBuf,
    /// Force overwrite existing config
    pub force: bool,
    /// Java source root to record in the config
    pub source_root: Option<PathBuf>,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(CONFIG_FILE),
            force: false,
            source_root: None,
        }
    }
}

/// Execute the init command
pub fn execute_init(options: InitOptions) -> Result<()> {
    if options.path.exists() && !options.force {
        eprintln!(
            "{} {} already exists. Use --force to overwrite.",
            style("✗").red(),
            options.path.display()
        );
        bail!("config file already exists");
    }

    let mut config = Config::default();
    if let Some(source_root) = options.source_root {
        config.source_root = source_root;
    }
    config.save(&options.path)?;

    println!("{} Created {}", style("✓").green(), options.path.display());
    println!("\n{}", style("Next steps:").bold());
    println!(
        "  1. Run {} to list the units of a mapping file",
        style("xml2anno units <MAPPING>").cyan()
    );
    println!(
        "  2. Run {} to preview, then add {} to write the annotations",
        style("xml2anno convert <MAPPING>").cyan(),
        style("--apply").cyan()
    );

    Ok(())
}
