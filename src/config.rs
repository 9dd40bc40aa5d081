use crate::error::{Result, VertagError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "vertag.toml";

/// Name of the configuration file looked up in the user config directory
pub const USER_CONFIG_FILE: &str = "git-vertag.toml";

/// Settings for the tag manager.
///
/// Every field has a default so partial files are accepted. Command-line flags
/// override values read from a file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Literal prepended to the version to form the tag name
    pub prefix: String,

    /// Keep floating `<prefix>MAJOR` and `<prefix>MAJOR.MINOR` tags in sync
    pub ancestors: bool,

    /// Fetch tags from `fetch_remote` before reading the current version
    pub fetch: bool,

    /// Remote used when fetching tags
    pub fetch_remote: String,

    /// Remote to push tag creations and deletions to
    pub push_to: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prefix: "v".to_string(),
            ancestors: false,
            fetch: false,
            fetch_remote: "origin".to_string(),
            push_to: None,
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| VertagError::config(e.to_string()))
    }
}

/// Returns the configuration file that `load_config` would read, if any.
fn locate_config(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }

    let local = Path::new(".").join(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG_FILE))
        .filter(|path| path.exists())
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `vertag.toml` in current directory
/// 3. `git-vertag.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let Some(path) = locate_config(config_path) else {
        return Ok(Config::default());
    };

    let text = fs::read_to_string(&path).map_err(|e| {
        VertagError::config(format!("Cannot read '{}': {}", path.display(), e))
    })?;

    toml::from_str(&text)
        .map_err(|e| VertagError::config(format!("Invalid '{}': {}", path.display(), e)))
}
