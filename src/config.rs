//! Stretch configuration — loads optional ~/.warpstretch/config.yaml.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Settings for invoking the external stretch tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StretchConfig {
    /// Executable name or path of the rubberband command-line tool.
    #[serde(default = "StretchConfig::default_executable")]
    pub executable: String,
    /// Pass `-q` to silence the tool's progress output.
    #[serde(default = "StretchConfig::default_quiet")]
    pub quiet: bool,
    /// Options added to every call unless the call sets them itself,
    /// keyed by flag (e.g. `--crisp: "6"`).
    #[serde(default)]
    pub extra_args: BTreeMap<String, String>,
}

impl StretchConfig {
    fn default_executable() -> String {
        "rubberband".to_string()
    }

    fn default_quiet() -> bool {
        true
    }

    /// Load config from the standard path (~/.warpstretch/config.yaml).
    /// Returns None if the file doesn't exist or can't be parsed.
    pub fn load() -> Option<Self> {
        let path = default_config_path()?;
        let content = std::fs::read_to_string(path).ok()?;
        serde_yaml::from_str(&content).ok()
    }

    /// Load config from an explicit path, reporting any failure.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_yaml::from_str(&content).map_err(|e| {
            Error::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }
}

impl Default for StretchConfig {
    fn default() -> Self {
        Self {
            executable: Self::default_executable(),
            quiet: Self::default_quiet(),
            extra_args: BTreeMap::new(),
        }
    }
}

/// Get the config file path.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".warpstretch").join("config.yaml"))
}
