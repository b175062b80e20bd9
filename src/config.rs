//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rshead/rshead.toml`
//! 3. Local config: `<project_dir>/.rshead.toml`
//! 4. Environment variables: `RSHEAD_*` prefix (nested keys use `__`)

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DEFAULT_PLACEHOLDER;

/// Default marker attribute stamped on injected elements.
pub const DEFAULT_MARKER: &str = "data-rshead";

/// How a list of tags is inserted into the live head.
///
/// Every element is inserted as the first child of the head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InsertionOrder {
    /// Insert in list order; the document ends up showing the list reversed.
    #[default]
    Reversed,
    /// Insert back to front so the document shows the list order.
    Preserved,
}

impl fmt::Display for InsertionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertionOrder::Reversed => write!(f, "reversed"),
            InsertionOrder::Preserved => write!(f, "preserved"),
        }
    }
}

/// Output mode for static rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// Concatenated tag strings.
    #[default]
    Markup,
    /// JSON element descriptions.
    Structured,
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderFormat::Markup => write!(f, "markup"),
            RenderFormat::Structured => write!(f, "structured"),
        }
    }
}

/// Static rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    pub format: RenderFormat,
    /// Wrap the title in a `<title>` element in markup output
    pub wrap_title: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: RenderFormat::default(),
            wrap_title: true,
        }
    }
}

/// Raw render config for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderConfig {
    pub format: Option<RenderFormat>,
    pub wrap_title: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub marker_attribute: Option<String>,
    pub title_placeholder: Option<String>,
    pub insertion_order: Option<InsertionOrder>,
    pub render: RawRenderConfig,
}

/// Unified configuration for rshead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Attribute stamped on every injected element
    pub marker_attribute: String,
    /// Placeholder replaced by the title inside a title template
    pub title_placeholder: String,
    pub insertion_order: InsertionOrder,
    pub render: RenderConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            marker_attribute: DEFAULT_MARKER.to_string(),
            title_placeholder: DEFAULT_PLACEHOLDER.to_string(),
            insertion_order: InsertionOrder::default(),
            render: RenderConfig::default(),
        }
    }
}

/// Get the XDG config directory for rshead.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rshead").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rshead.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".rshead.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            marker_attribute: overlay
                .marker_attribute
                .clone()
                .unwrap_or_else(|| self.marker_attribute.clone()),
            title_placeholder: overlay
                .title_placeholder
                .clone()
                .unwrap_or_else(|| self.title_placeholder.clone()),
            insertion_order: overlay.insertion_order.unwrap_or(self.insertion_order),
            render: RenderConfig {
                format: overlay.render.format.unwrap_or(self.render.format),
                wrap_title: overlay.render.wrap_title.unwrap_or(self.render.wrap_title),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Load settings from one explicit file on top of the defaults. No env overrides.
    pub fn from_file(path: &Path) -> Result<Self, ApplicationError> {
        let settings = Self::default().merge_with(&load_raw_settings(path)?);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply RSHEAD_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("RSHEAD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("marker_attribute") {
            settings.marker_attribute = val;
        }
        if let Ok(val) = config.get_string("title_placeholder") {
            settings.title_placeholder = val;
        }
        if let Ok(val) = config.get_string("insertion_order") {
            settings.insertion_order = parse_value(&val, "insertion_order")?;
        }
        if let Ok(val) = config.get_string("render.format") {
            settings.render.format = parse_value(&val, "render.format")?;
        }
        if let Ok(val) = config.get_bool("render.wrap_title") {
            settings.render.wrap_title = val;
        }

        Ok(settings)
    }

    /// Reject settings the services cannot work with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.marker_attribute.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "marker_attribute must not be empty".to_string(),
            });
        }
        if self.marker_attribute.chars().any(char::is_whitespace) {
            return Err(ApplicationError::Config {
                message: format!(
                    "marker_attribute must not contain whitespace: {:?}",
                    self.marker_attribute
                ),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rshead configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rshead/rshead.toml
#   Local:  <project_dir>/.rshead.toml
#   Env:    RSHEAD_* environment variables (e.g. RSHEAD_RENDER__FORMAT=structured)

# Attribute stamped on every element rshead injects
# marker_attribute = "data-rshead"

# Placeholder substituted by the title in a titleTemplate ("" disables templating)
# title_placeholder = "%s"

# "reversed": tags appear in the head in reverse list order
# "preserved": tags appear in list order
# insertion_order = "reversed"

[render]
# "markup" or "structured"
# format = "markup"

# Wrap the title in <title>...</title> in markup output
# wrap_title = true
"#
        .to_string()
    }
}

fn parse_value<T: ValueEnum>(value: &str, key: &str) -> Result<T, ApplicationError> {
    T::from_str(value, true).map_err(|e| ApplicationError::Config {
        message: format!("{key}: {e}"),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_defaults_when_created_then_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.marker_attribute, "data-rshead");
        assert_eq!(settings.title_placeholder, "%s");
        assert_eq!(settings.insertion_order, InsertionOrder::Reversed);
        assert_eq!(settings.render.format, RenderFormat::Markup);
        assert!(settings.render.wrap_title);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_kept() {
        let base = Settings::default();
        let overlay = RawSettings {
            insertion_order: Some(InsertionOrder::Preserved),
            render: RawRenderConfig {
                wrap_title: Some(false),
                ..RawRenderConfig::default()
            },
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.insertion_order, InsertionOrder::Preserved);
        assert!(!merged.render.wrap_title);
        assert_eq!(merged.marker_attribute, "data-rshead");
        assert_eq!(merged.render.format, RenderFormat::Markup);
    }

    #[test]
    fn given_local_file_when_loading_from_file_then_values_applied() {
        let temp = TempDir::new().unwrap();
        let path = local_config_path(temp.path());
        std::fs::write(
            &path,
            "marker_attribute = \"data-head\"\n[render]\nformat = \"structured\"\n",
        )
        .unwrap();

        let settings = Settings::from_file(&path).unwrap();

        assert_eq!(settings.marker_attribute, "data-head");
        assert_eq!(settings.render.format, RenderFormat::Structured);
    }

    #[test]
    fn given_unknown_order_in_file_when_loading_then_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "insertion_order = \"sideways\"\n").unwrap();

        let err = Settings::from_file(&path).unwrap_err();

        assert!(matches!(err, ApplicationError::Config { .. }), "{err}");
    }

    #[test]
    fn given_empty_marker_when_validating_then_rejected() {
        let settings = Settings {
            marker_attribute: "  ".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn given_settings_when_serializing_then_toml_round_trips() {
        let settings = Settings::default();
        let toml = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn given_template_when_parsing_then_yields_defaults() {
        let parsed: Settings = toml::from_str(&Settings::template()).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
