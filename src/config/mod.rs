use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::buffer::TrailingNewline;

/// Directory name under the platform config dir.
pub const APP_DIR_NAME: &str = "ledit";

/// `<config_dir>/ledit`, falling back to the working directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Editor configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// General editor settings
    #[serde(default)]
    pub editor: EditorConfig,

    /// Per-mode key binding overrides
    #[serde(default)]
    pub keybindings: KeybindingConfig,
}

/// Editor settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EditorConfig {
    /// Show line numbers
    #[serde(default = "default_show_line_numbers")]
    pub show_line_numbers: bool,

    /// Minimum digits reserved for line numbers
    #[serde(default = "default_min_gutter_width")]
    pub min_gutter_width: usize,

    /// Drawn in the gutter on rows past the end of the buffer
    #[serde(default = "default_empty_line_fill")]
    pub empty_line_fill: String,

    /// Whether saved files end with a line terminator
    #[serde(default)]
    pub trailing_newline: TrailingNewline,

    /// Lines moved by PageUp/PageDown; 0 means one screen
    #[serde(default)]
    pub page_size: usize,
}

/// Key name (`"ctrl+q"`, `"alt+d"`, `"up"`) to action name (`"quit"`, `"line_up"`).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct KeybindingConfig {
    #[serde(default)]
    pub navigation: HashMap<String, String>,

    #[serde(default)]
    pub text_entry: HashMap<String, String>,
}

// Default values
fn default_show_line_numbers() -> bool {
    true
}
fn default_min_gutter_width() -> usize {
    2
}
fn default_empty_line_fill() -> String {
    "~".to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            show_line_numbers: default_show_line_numbers(),
            min_gutter_width: default_min_gutter_width(),
            empty_line_fill: default_empty_line_fill(),
            trailing_newline: TrailingNewline::default(),
            page_size: 0,
        }
    }
}

/// Configuration manager
pub struct ConfigManager {
    /// The config
    config: Config,

    /// The path to the config file
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager
    pub fn new(config_dir: &Path) -> Self {
        let config_path = config_dir.join("config.json");

        Self {
            config: Config::default(),
            config_path,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the config, keeping the defaults when no file exists yet
    pub fn load(&mut self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory '{}'", parent.display())
                })?;
            }
        }

        if self.config_path.exists() {
            let config_str = fs::read_to_string(&self.config_path)
                .with_context(|| format!("Failed to read '{}'", self.config_path.display()))?;
            self.config = serde_json::from_str(&config_str)
                .map_err(|e| anyhow!("Failed to parse config: {}", e))?;
            info!(path = %self.config_path.display(), "loaded config");
        } else {
            debug!(path = %self.config_path.display(), "no config file, using defaults");
        }

        Ok(())
    }

    /// Save the config
    pub fn save(&self) -> Result<()> {
        let config_str = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.config_path, config_str)
            .with_context(|| format!("Failed to write '{}'", self.config_path.display()))?;
        Ok(())
    }

    /// Get the config
    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Get a mutable reference to the config
    pub fn get_config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Update a setting
    pub fn update_setting(&mut self, path: &str, value: serde_json::Value) -> Result<()> {
        match path {
            "editor.showLineNumbers" => {
                self.config.editor.show_line_numbers =
                    value.as_bool().ok_or_else(|| anyhow!("Expected boolean"))?;
            }
            "editor.minGutterWidth" => {
                self.config.editor.min_gutter_width =
                    value.as_u64().ok_or_else(|| anyhow!("Expected number"))? as usize;
            }
            "editor.emptyLineFill" => {
                self.config.editor.empty_line_fill = value
                    .as_str()
                    .ok_or_else(|| anyhow!("Expected string"))?
                    .to_string();
            }
            "editor.trailingNewline" => {
                self.config.editor.trailing_newline = serde_json::from_value(value)
                    .map_err(|e| anyhow!("Expected preserve, always or never: {}", e))?;
            }
            "editor.pageSize" => {
                self.config.editor.page_size =
                    value.as_u64().ok_or_else(|| anyhow!("Expected number"))? as usize;
            }
            _ => {
                let (table, key) = self.binding_table_mut(path)?;
                let action = value
                    .as_str()
                    .ok_or_else(|| anyhow!("Expected string"))?
                    .to_string();
                table.insert(key, action);
            }
        }

        Ok(())
    }

    /// Get a setting by path
    pub fn get_setting(&self, path: &str) -> Result<serde_json::Value> {
        let editor = &self.config.editor;
        match path {
            "editor.showLineNumbers" => Ok(serde_json::json!(editor.show_line_numbers)),
            "editor.minGutterWidth" => Ok(serde_json::json!(editor.min_gutter_width)),
            "editor.emptyLineFill" => Ok(serde_json::json!(editor.empty_line_fill)),
            "editor.trailingNewline" => Ok(serde_json::to_value(editor.trailing_newline)?),
            "editor.pageSize" => Ok(serde_json::json!(editor.page_size)),
            _ => {
                let (table, key) = self.binding_table(path)?;
                table
                    .get(&key)
                    .map(|action| serde_json::json!(action))
                    .ok_or_else(|| anyhow!("No binding for '{}'", key))
            }
        }
    }

    // "keybindings.navigation.<key>" and "keybindings.textEntry.<key>"
    fn split_binding_path(path: &str) -> Result<(&str, String)> {
        let rest = path
            .strip_prefix("keybindings.")
            .ok_or_else(|| anyhow!("Unsupported setting path: {}", path))?;
        let (mode, key) = rest
            .split_once('.')
            .ok_or_else(|| anyhow!("Unsupported setting path: {}", path))?;
        if key.is_empty() {
            return Err(anyhow!("Unsupported setting path: {}", path));
        }
        Ok((mode, key.to_string()))
    }

    fn binding_table(&self, path: &str) -> Result<(&HashMap<String, String>, String)> {
        let (mode, key) = Self::split_binding_path(path)?;
        let bindings = &self.config.keybindings;
        match mode {
            "navigation" => Ok((&bindings.navigation, key)),
            "textEntry" => Ok((&bindings.text_entry, key)),
            _ => Err(anyhow!("Unsupported setting path: {}", path)),
        }
    }

    fn binding_table_mut(&mut self, path: &str) -> Result<(&mut HashMap<String, String>, String)> {
        let (mode, key) = Self::split_binding_path(path)?;
        let bindings = &mut self.config.keybindings;
        match mode {
            "navigation" => Ok((&mut bindings.navigation, key)),
            "textEntry" => Ok((&mut bindings.text_entry, key)),
            _ => Err(anyhow!("Unsupported setting path: {}", path)),
        }
    }
}
