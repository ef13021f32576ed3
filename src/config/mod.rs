//! Configuration management for `git-issue`.
//!
//! Layers, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. User config (`~/.config/git-issue/config.yaml`)
//! 3. Project config (`<worktree>/.git-issue.yaml`)
//! 4. Environment (`GIT_ISSUE_<KEY>`)
//! 5. CLI overrides
//!
//! The merged layer is resolved once into an [`IssueConfig`] which commands
//! receive explicitly.

use crate::error::{IssueError, Result};
use crate::git::DEFAULT_NOTES_REF;
use crate::model::Status;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project config file name, relative to the worktree root.
pub const PROJECT_CONFIG_FILE: &str = ".git-issue.yaml";

const ENV_PREFIX: &str = "GIT_ISSUE_";

pub const KEY_NOTES_REF: &str = "notes-ref";
pub const KEY_DEFAULT_STATUS: &str = "default-status";
pub const KEY_EDITOR: &str = "editor";
pub const KEY_PAGER: &str = "pager";
pub const KEY_COLOR: &str = "color";

/// A set of configuration values from one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| IssueError::IoAt {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
            .map_err(|err| IssueError::Config(format!("{}: {err}", path.display())))
    }

    /// Parse a YAML document. Nested mappings flatten to dotted keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(contents)?;
        let mut flat = HashMap::new();
        flatten_yaml(&value, "", &mut flat);

        let mut layer = Self::default();
        for (key, value) in flat {
            layer.set(&key, value);
        }
        Ok(layer)
    }

    /// Build a layer from `GIT_ISSUE_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_vars(env::vars())
    }

    /// Build a layer from an explicit variable list.
    #[must_use]
    pub fn from_env_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut layer = Self::default();
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layer.set(stripped, value);
            }
        }
        layer
    }
}

/// CLI overrides for config loading.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub notes_ref: Option<String>,
    pub no_color: Option<bool>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(notes_ref) = &self.notes_ref {
            layer.set(KEY_NOTES_REF, notes_ref.clone());
        }
        if self.no_color == Some(true) {
            layer.set(KEY_COLOR, "never");
        }

        layer
    }
}

/// Default config layer (lowest precedence).
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    layer.set(KEY_NOTES_REF, DEFAULT_NOTES_REF);
    layer.set(KEY_DEFAULT_STATUS, Status::Open.as_str());
    layer.set(KEY_COLOR, "auto");
    layer
}

/// Path of the user config file, if `HOME` is set.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    let home = env::var_os("HOME")?;
    Some(
        Path::new(&home)
            .join(".config")
            .join("git-issue")
            .join("config.yaml"),
    )
}

/// Load user config (`~/.config/git-issue/config.yaml`).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    user_config_path().map_or_else(|| Ok(ConfigLayer::default()), |path| ConfigLayer::from_yaml(&path))
}

/// Load project config (`<worktree>/.git-issue.yaml`).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(worktree: &Path) -> Result<ConfigLayer> {
    ConfigLayer::from_yaml(&worktree.join(PROJECT_CONFIG_FILE))
}

/// Load and merge every layer.
///
/// `worktree` is `None` outside a working tree (bare repositories), in
/// which case the project layer is skipped.
///
/// # Errors
///
/// Returns an error if any config file cannot be read or parsed.
pub fn load_config(worktree: Option<&Path>, cli: &CliOverrides) -> Result<ConfigLayer> {
    let project = match worktree {
        Some(dir) => load_project_config(dir)?,
        None => ConfigLayer::default(),
    };

    let merged = ConfigLayer::merge_layers(&[
        default_config_layer(),
        load_user_config()?,
        project,
        ConfigLayer::from_env(),
        cli.as_layer(),
    ]);
    debug!(keys = merged.values.len(), "loaded configuration");
    Ok(merged)
}

/// When to emit ANSI color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            other => parse_bool(other).map(|on| if on { Self::Always } else { Self::Never }),
        }
    }
}

/// Resolved settings handed to commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueConfig {
    pub notes_ref: String,
    pub default_status: Status,
    pub editor: Option<String>,
    pub pager: Option<String>,
    pub color: ColorChoice,
}

impl Default for IssueConfig {
    fn default() -> Self {
        Self {
            notes_ref: DEFAULT_NOTES_REF.to_string(),
            default_status: Status::Open,
            editor: None,
            pager: None,
            color: ColorChoice::Auto,
        }
    }
}

impl IssueConfig {
    /// Resolve a merged layer.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::Config`] for a value that does not parse.
    pub fn from_layer(layer: &ConfigLayer) -> Result<Self> {
        let defaults = Self::default();

        let notes_ref = match non_empty(layer.get(KEY_NOTES_REF)) {
            Some(value) if value.starts_with("refs/notes/") => value.to_string(),
            Some(value) if value.contains('/') || value.starts_with('-') => {
                return Err(IssueError::Config(format!(
                    "{KEY_NOTES_REF}: '{value}' must be a name or a ref under refs/notes/"
                )));
            }
            Some(value) => format!("refs/notes/{value}"),
            None => defaults.notes_ref,
        };

        let default_status = match non_empty(layer.get(KEY_DEFAULT_STATUS)) {
            Some(value) => value
                .parse::<Status>()
                .map_err(|err| IssueError::Config(format!("{KEY_DEFAULT_STATUS}: {err}")))?,
            None => defaults.default_status,
        };

        let color = match non_empty(layer.get(KEY_COLOR)) {
            Some(value) => ColorChoice::parse(value).ok_or_else(|| {
                IssueError::Config(format!(
                    "{KEY_COLOR}: expected auto, always, or never, got '{value}'"
                ))
            })?,
            None => defaults.color,
        };

        Ok(Self {
            notes_ref,
            default_status,
            editor: non_empty(layer.get(KEY_EDITOR)).map(str::to_string),
            pager: non_empty(layer.get(KEY_PAGER)).map(str::to_string),
            color,
        })
    }

    /// Whether to color output for a destination that is or is not a
    /// terminal. `NO_COLOR` turns `auto` off.
    #[must_use]
    pub fn use_color(&self, is_terminal: bool) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => is_terminal && env::var_os("NO_COLOR").is_none(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        serde_yaml::Value::Sequence(values) => {
            let joined = values
                .iter()
                .filter_map(yaml_scalar_to_string)
                .collect::<Vec<_>>()
                .join(",");
            out.insert(prefix.to_string(), joined);
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
