//! CLI configuration file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// Settings read from `--config`; command-line flags take precedence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Graph files loaded into the background store
    pub data: Vec<PathBuf>,
    /// Rule library file
    pub rules: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `info` or `mimizuku_constraints=debug`
    pub log_level: Option<String>,
    pub include_source: Option<bool>,
    pub output: OutputFormat,
}

impl CliConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Config from `path`, or the defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config: CliConfig = serde_json::from_str(
            r#"{"data": ["a.json", "b.json"], "rules": "lib.json", "log_level": "debug",
                "include_source": false, "output": "json-pretty"}"#,
        )
        .unwrap();

        assert_eq!(config.data, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
        assert_eq!(config.rules, Some(PathBuf::from("lib.json")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.include_source, Some(false));
        assert_eq!(config.output, OutputFormat::JsonPretty);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: CliConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn test_load_without_path() {
        assert_eq!(CliConfig::load(None).unwrap(), CliConfig::default());
    }
}
