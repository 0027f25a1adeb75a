use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Represents the complete configuration for git-tagscope.
///
/// Controls how tags are shaped (prefix, namespace) and whether the version
/// scope is derived from the branch name.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Literal prefix expected in front of the version digits (e.g. "v")
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    /// Optional namespace suffix appended after the version (e.g. "api"
    /// turns "v1.2.3" into "v1.2.3-api"). An empty string means no
    /// namespace.
    #[serde(default)]
    pub namespace: Option<String>,

    /// Whether (and how) to derive the version scope from the branch name:
    /// `false` disables extraction, `true` uses the built-in pattern, and a
    /// string supplies a custom pattern.
    #[serde(default)]
    pub version_from_branch: VersionFromBranch,
}

/// Returns the default tag prefix.
fn default_tag_prefix() -> String {
    "v".to_string()
}

/// Branch version extraction setting: a plain boolean or a pattern string.
///
/// In TOML either form is accepted:
///
/// ```toml
/// version_from_branch = true
/// # or
/// version_from_branch = "/release-([0-9]+\\.[0-9]+)/"
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum VersionFromBranch {
    Enabled(bool),
    Pattern(String),
}

impl Default for VersionFromBranch {
    fn default() -> Self {
        VersionFromBranch::Enabled(false)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag_prefix: default_tag_prefix(),
            namespace: None,
            version_from_branch: VersionFromBranch::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `tagscope.toml` in current directory
/// 3. `~/.config/.tagscope.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./tagscope.toml").exists() {
        fs::read_to_string("./tagscope.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".tagscope.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
