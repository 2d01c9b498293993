//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.ecomdash.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".ecomdash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Report page settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Chart colours.
    #[serde(default)]
    pub palette: PaletteConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "dashboard.html".to_string()
}

/// Dataset location and format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path of the order table.
    #[serde(default = "default_dataset_path")]
    pub path: String,

    /// Field delimiter, a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            delimiter: default_delimiter(),
        }
    }
}

impl DatasetConfig {
    /// Reject a delimiter that is not a single ASCII character.
    pub fn validate(&self) -> Result<()> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(()),
            _ => bail!(
                "dataset.delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ),
        }
    }

    /// The delimiter as a byte. Falls back to a comma when the setting is
    /// not a single ASCII character; `validate` rejects that case on load.
    pub fn delimiter_byte(&self) -> u8 {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => *byte,
            _ => b',',
        }
    }
}

fn default_dataset_path() -> String {
    "all_data.csv".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// Report page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Page title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Sidebar heading.
    #[serde(default = "default_sidebar_title")]
    pub sidebar_title: String,

    /// Author name shown in the sidebar. Empty hides the line.
    #[serde(default)]
    pub author: String,

    /// Author email shown in the sidebar. Empty hides the line.
    #[serde(default)]
    pub email: String,

    /// Dicoding ID shown in the sidebar. Empty hides the line.
    #[serde(default)]
    pub dicoding_id: String,

    /// Small print under the sidebar.
    #[serde(default)]
    pub caption: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            sidebar_title: default_sidebar_title(),
            author: String::new(),
            email: String::new(),
            dicoding_id: String::new(),
            caption: String::new(),
        }
    }
}

fn default_title() -> String {
    "Dashboard: E-Commerce Public Data Analysis".to_string()
}

fn default_sidebar_title() -> String {
    "E-Commerce Public Data Analysis".to_string()
}

/// Chart colours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Colour of the emphasised bar.
    #[serde(default = "default_highlight")]
    pub highlight: String,

    /// Colour of every other bar.
    #[serde(default = "default_muted")]
    pub muted: String,

    /// Series colours of the monthly trend, one per year.
    #[serde(default = "default_years")]
    pub years: Vec<String>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            highlight: default_highlight(),
            muted: default_muted(),
            years: default_years(),
        }
    }
}

fn default_highlight() -> String {
    "#102cd4".to_string()
}

fn default_muted() -> String {
    "#D3D3D3".to_string()
}

fn default_years() -> Vec<String> {
    vec!["#0DA6D1".to_string(), "#102cd4".to_string()]
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .dataset
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.ecomdash.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.dataset.path = data.display().to_string();
        }

        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Path of the dataset after merging.
    pub fn dataset_path(&self) -> PathBuf {
        PathBuf::from(&self.dataset.path)
    }

    /// Path of the report after merging.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.general.output)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dataset.path, "all_data.csv");
        assert_eq!(config.general.output, "dashboard.html");
        assert_eq!(config.palette.highlight, "#102cd4");
        assert_eq!(config.palette.years, vec!["#0DA6D1", "#102cd4"]);
        assert_eq!(config.dataset.delimiter_byte(), b',');
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r##"
[general]
output = "report.md"
verbose = true

[dataset]
path = "data/orders.tsv"
delimiter = "\t"

[report]
author = "Jane Doe"

[palette]
highlight = "#ff0000"
"##;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "report.md");
        assert!(config.general.verbose);
        assert_eq!(config.dataset.path, "data/orders.tsv");
        assert_eq!(config.dataset.delimiter_byte(), b'\t');
        assert_eq!(config.report.author, "Jane Doe");
        assert_eq!(config.report.title, "Dashboard: E-Commerce Public Data Analysis");
        assert_eq!(config.palette.highlight, "#ff0000");
        assert_eq!(config.palette.muted, "#D3D3D3");
    }

    #[test]
    fn test_bad_delimiter_falls_back_to_comma() {
        let dataset = DatasetConfig {
            path: "x.csv".to_string(),
            delimiter: "::".to_string(),
        };
        assert_eq!(dataset.delimiter_byte(), b',');
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[dataset]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[palette]"));
    }

    #[test]
    fn test_load_from_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(temp_dir.path()).unwrap().is_none());

        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[dataset]\npath = \"orders.csv\"\n",
        )
        .unwrap();

        let config = Config::load_from_dir(temp_dir.path()).unwrap().unwrap();
        assert_eq!(config.dataset.path, "orders.csv");
    }

    #[test]
    fn test_load_rejects_bad_delimiter() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tab.toml");
        std::fs::write(&path, "[dataset]\ndelimiter = \"tab\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Invalid config file"));
        assert!(message.contains("single ASCII character"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "[dataset\npath = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
