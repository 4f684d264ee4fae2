//! Options for building and resolving markdown-xref snapshots.
//!
//! A project may carry a `.markdown-xref.toml` file; every key is optional:
//!
//! ```toml
//! [markdown]
//! tables = true
//! strikethrough = true
//! tasklists = true
//! footnotes = false
//! capture_undefined_references = true
//!
//! [anchors]
//! html_anchors = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up by [`Config::discover`].
pub const CONFIG_FILE_NAME: &str = ".markdown-xref.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub markdown: MarkdownOptions,
    pub anchors: AnchorOptions,
}

/// Parser extensions used when mapping source to a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    pub tables: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub footnotes: bool,
    /// Produce link nodes for `[text][label]` even when `label` has no
    /// definition, so the resolver can report them as unresolved.
    pub capture_undefined_references: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: true,
            footnotes: false,
            capture_undefined_references: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorOptions {
    /// Treat `id="..."` and `name="..."` attributes in raw HTML as anchors.
    pub html_anchors: bool,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self { html_anchors: true }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    /// Load the nearest `.markdown-xref.toml` at or above `start_dir`.
    pub fn discover<P: AsRef<Path>>(start_dir: P) -> Result<Option<Self>, ConfigError> {
        match Self::find_config_file(start_dir) {
            Some(path) => Self::load_from_path(path),
            None => Ok(None),
        }
    }

    pub fn find_config_file<P: AsRef<Path>>(start_dir: P) -> Option<PathBuf> {
        start_dir
            .as_ref()
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.markdown.tables);
        assert!(!config.markdown.footnotes);
        assert!(config.markdown.capture_undefined_references);
        assert!(config.anchors.html_anchors);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            markdown: MarkdownOptions {
                footnotes: true,
                ..MarkdownOptions::default()
            },
            anchors: AnchorOptions {
                html_anchors: false,
            },
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str("[anchors]\nhtml_anchors = false\n").unwrap();

        assert!(!config.anchors.html_anchors);
        assert_eq!(config.markdown, MarkdownOptions::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("broken.toml");
        std::fs::write(&config_file, "[markdown\ntables = ").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_wrong_value_type_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("typed.toml");
        std::fs::write(&config_file, "[markdown]\ntables = \"yes\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");
        let test_config = Config {
            markdown: MarkdownOptions {
                tables: false,
                ..MarkdownOptions::default()
            },
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_discover_walks_up_parents() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("docs/guide");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[markdown]\nfootnotes = true\n",
        )
        .unwrap();

        let found = Config::find_config_file(&nested).unwrap();
        assert_eq!(found, temp_dir.path().join(CONFIG_FILE_NAME));

        let config = Config::discover(&nested).unwrap().unwrap();
        assert!(config.markdown.footnotes);
    }

    #[test]
    fn test_discover_prefers_nearest_file() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("sub");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[anchors]\nhtml_anchors = true\n",
        )
        .unwrap();
        std::fs::write(
            nested.join(CONFIG_FILE_NAME),
            "[anchors]\nhtml_anchors = false\n",
        )
        .unwrap();

        let config = Config::discover(&nested).unwrap().unwrap();
        assert!(!config.anchors.html_anchors);
    }
}
