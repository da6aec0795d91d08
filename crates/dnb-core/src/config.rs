//! Configuration: notebook root, configured notebooks, editor.
//!
//! The config file is YAML, by default at `~/.dnbconf/config.yaml`:
//! ```yaml
//! notebook_root: ~/notebooks
//! notebooks:
//!   - work
//!   - personal
//! editor: nvim      # optional
//! rollover: true    # optional
//! ```
//!
//! A [`Config`] is loaded once at process start and handed to the vault
//! layer. Home-directory lookups go through the [`HomeDir`] capability so
//! tests can substitute a fixed directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Source of the current user's home directory.
pub trait HomeDir {
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Home directory of the user running the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHome;

impl HomeDir for SystemHome {
    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// A fixed home directory.
#[derive(Debug, Clone)]
pub struct FixedHome(pub PathBuf);

impl HomeDir for FixedHome {
    fn home_dir(&self) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// Replace a leading `~` with the home directory. Other paths are returned
/// unchanged.
///
/// # Errors
///
/// Returns [`ConfigError::HomeUnavailable`] if the path starts with `~` and
/// the home directory cannot be resolved.
pub fn expand_home(path: &str, home: &dyn HomeDir) -> Result<PathBuf, ConfigError> {
    let Some(rest) = path.strip_prefix('~') else {
        return Ok(PathBuf::from(path));
    };
    let home = home.home_dir().ok_or(ConfigError::HomeUnavailable)?;
    let rest = rest.trim_start_matches(['/', '\\']);
    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(rest))
    }
}

/// Default location of the config file: `<home>/.dnbconf/config.yaml`.
///
/// # Errors
///
/// Returns [`ConfigError::HomeUnavailable`] if the home directory cannot be resolved.
pub fn default_config_path(home: &dyn HomeDir) -> Result<PathBuf, ConfigError> {
    let home = home.home_dir().ok_or(ConfigError::HomeUnavailable)?;
    Ok(home.join(".dnbconf").join("config.yaml"))
}

/// Parsed config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Directory holding one subdirectory per notebook. May start with `~`.
    pub notebook_root: String,
    /// Names of the notebooks that may be opened.
    #[serde(default)]
    pub notebooks: Vec<String>,
    /// Editor command used to open today's file.
    #[serde(default)]
    pub editor: Option<String>,
    /// Seed new days from the latest earlier day.
    #[serde(default = "default_rollover")]
    pub rollover: bool,
}

fn default_rollover() -> bool {
    true
}

/// A notebook selected from the config, with its root resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notebook {
    pub name: String,
    pub root: PathBuf,
}

impl Config {
    /// Parse a config from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the YAML is malformed or misses
    /// `notebook_root`.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load the config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Whether `name` is one of the configured notebooks.
    #[must_use]
    pub fn has_notebook(&self, name: &str) -> bool {
        self.notebooks.iter().any(|n| n == name)
    }

    /// Select a configured notebook and resolve its root
    /// (`notebook_root/<name>`, with `~` expanded).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNotebook`] if `name` is not configured and
    /// [`ConfigError::HomeUnavailable`] if `~` cannot be expanded.
    pub fn notebook(&self, name: &str, home: &dyn HomeDir) -> Result<Notebook, ConfigError> {
        if !self.has_notebook(name) {
            return Err(ConfigError::UnknownNotebook {
                name: name.to_string(),
                known: self.notebooks.clone(),
            });
        }
        let root = expand_home(&self.notebook_root, home)?.join(name);
        Ok(Notebook {
            name: name.to_string(),
            root,
        })
    }
}
