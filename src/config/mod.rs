//! @acp:module "Configuration"
//! @acp:summary "Project configuration loading and defaults"
//! @acp:domain cli
//! @acp:layer config

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = ".xml2anno.config.json";

fn default_version() -> String {
    "1.0.0".to_string()
}

/// @acp:summary "Main configuration structure"
/// @acp:lock normal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Config format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Root of the Java source tree to annotate
    #[serde(default = "default_source_root", rename = "sourceRoot")]
    pub source_root: PathBuf,

    /// Java file patterns to include (glob syntax, relative to the source root)
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Java file patterns to exclude (glob syntax)
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Import management for inserted annotations
    #[serde(default)]
    pub imports: ImportConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            source_root: default_source_root(),
            include: default_include(),
            exclude: default_exclude(),
            imports: ImportConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// @acp:summary "Load config from a JSON file"
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn default_source_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_include() -> Vec<String> {
    vec!["**/*.java".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec![
        // Build outputs
        "**/target/**".to_string(),
        "**/build/**".to_string(),
        "**/out/**".to_string(),
        "**/bin/**".to_string(),
        // Tooling
        "**/.gradle/**".to_string(),
        "**/.mvn/**".to_string(),
        // VCS
        "**/.git/**".to_string(),
        // IDE
        "**/.idea/**".to_string(),
        "**/.vscode/**".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

fn default_import() -> Option<String> {
    Some("javax.persistence.*".to_string())
}

/// @acp:summary "Import handling for inserted annotations"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Write qualified annotation names in simple form and import the type,
    /// unless another import already binds that simple name
    #[serde(default = "default_true", rename = "shortenQualified")]
    pub shorten_qualified: bool,

    /// Import added to any file that receives an annotation written with a
    /// simple name (the persistence annotations and their enums)
    #[serde(default = "default_import", rename = "defaultImport")]
    pub default_import: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            shorten_qualified: true,
            default_import: default_import(),
        }
    }
}

/// @acp:summary "Output configuration"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Preview format for the convert command
    #[serde(default)]
    pub format: OutputFormat,
}

/// How conversion results are shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Unified diff per changed file
    #[default]
    Diff,
    /// Counts only
    Summary,
    /// Conversion report as JSON
    Json,
}
