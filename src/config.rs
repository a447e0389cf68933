use crate::view::theme::{Theme, DEFAULT_THEME_NAME};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Color theme name ("night-owl", "night-owl-light" or "high-contrast")
    #[serde(default = "default_theme_name")]
    pub theme: String,

    /// Code block behavior (line numbers, highlighting, copy feedback)
    #[serde(default)]
    pub code_block: CodeBlockConfig,
}

fn default_theme_name() -> String {
    DEFAULT_THEME_NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_copy_reset_ms() -> u64 {
    1800
}

fn default_copy_label() -> String {
    "Copy".to_string()
}

fn default_copied_label() -> String {
    "Copied".to_string()
}

/// Code block configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CodeBlockConfig {
    /// Show line numbers in the gutter
    #[serde(default = "default_true")]
    pub show_line_numbers: bool,

    /// Enable syntax highlighting (plain text when disabled)
    #[serde(default = "default_true")]
    pub syntax_highlighting: bool,

    /// How long the "copied" confirmation stays visible, in milliseconds
    #[serde(default = "default_copy_reset_ms")]
    pub copy_reset_ms: u64,

    /// Label of the copy button
    #[serde(default = "default_copy_label")]
    pub copy_label: String,

    /// Label of the copy button while the confirmation is showing
    #[serde(default = "default_copied_label")]
    pub copied_label: String,
}

impl Default for CodeBlockConfig {
    fn default() -> Self {
        Self {
            show_line_numbers: true,
            syntax_highlighting: true,
            copy_reset_ms: default_copy_reset_ms(),
            copy_label: default_copy_label(),
            copied_label: default_copied_label(),
        }
    }
}

impl CodeBlockConfig {
    pub fn copy_reset_delay(&self) -> Duration {
        Duration::from_millis(self.copy_reset_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            code_block: CodeBlockConfig::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|d| d.join("fresh-codeblock").join("config.json"))
    }

    /// Load configuration from the default location, falling back to defaults if not found
    pub fn load_or_default() -> Self {
        if let Some(config_path) = Self::default_config_path() {
            if config_path.exists() {
                match Self::load_from_file(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!(
                            "Failed to load config from {}: {}, using defaults",
                            config_path.display(),
                            e
                        );
                    }
                }
            }
        }
        Self::default()
    }

    /// Load and validate configuration from a JSON file.
    ///
    /// Fields missing from the file take their default values.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }
        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if Theme::from_name(&self.theme).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "unknown theme '{}' (available: {})",
                self.theme,
                Theme::available_themes().join(", ")
            )));
        }

        if self.code_block.copy_reset_ms == 0 {
            return Err(ConfigError::ValidationError(
                "code_block.copy_reset_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The configured theme, or the default when the name is unknown
    pub fn resolved_theme(&self) -> Theme {
        Theme::from_name(&self.theme).unwrap_or_else(|| {
            tracing::warn!("Unknown theme '{}', using {}", self.theme, DEFAULT_THEME_NAME);
            Theme::default()
        })
    }

    /// JSON Schema describing the configuration file
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Config)).unwrap_or_default()
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
