//! Configuration loading and root folder resolution
//!
//! Values resolve in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line and environment handling live in the binary (clap reads both);
//! this module supplies the TOML layer and the defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "sweettrack.db";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5740;

/// Default admin session lifetime: 12 hours
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 12 * 60 * 60;

pub const DEFAULT_SUGGESTION_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_SUGGESTION_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Contents of `config.toml`; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub admin_passphrase: Option<String>,
    pub session_ttl_seconds: Option<u64>,
    pub suggestions: SuggestionsConfig,
}

/// `[suggestions]` table: external message-suggestion service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionsConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load the first config file found, or defaults when there is none
    ///
    /// A file that exists but does not parse is an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            info!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        match find_config_file() {
            Some(path) => {
                info!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Candidate config file locations, most specific first
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("sweettrack").join("config.toml"));
    }
    if cfg!(unix) {
        candidates.push(PathBuf::from("/etc/sweettrack/config.toml"));
    }
    candidates
}

fn find_config_file() -> Option<PathBuf> {
    config_file_candidates().into_iter().find(|p| p.exists())
}

/// Resolve the root folder holding the database
pub fn resolve_root_folder(cli_or_env: Option<&Path>, toml: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_or_env {
        return path.to_path_buf();
    }
    if let Some(path) = &toml.root_folder {
        return path.clone();
    }
    default_root_folder()
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("sweettrack"))
        .unwrap_or_else(|| {
            warn!("Could not determine local data directory, using ./sweettrack_data");
            PathBuf::from("./sweettrack_data")
        })
}

/// Creates the root folder and locates files inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root)?;
            info!("Created root folder: {}", self.root.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root.join(DATABASE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_root_folder_wins() {
        let toml = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            ..TomlConfig::default()
        };
        let resolved = resolve_root_folder(Some(Path::new("/from/cli")), &toml);
        assert_eq!(resolved, PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_toml_root_folder_used_without_cli() {
        let toml = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            ..TomlConfig::default()
        };
        assert_eq!(resolve_root_folder(None, &toml), PathBuf::from("/from/toml"));
    }

    #[test]
    fn test_default_root_folder_named_for_app() {
        let resolved = resolve_root_folder(None, &TomlConfig::default());
        assert!(resolved.ends_with("sweettrack") || resolved.ends_with("sweettrack_data"));
    }

    #[test]
    fn test_database_path() {
        let init = RootFolderInitializer::new(PathBuf::from("/srv/bakery"));
        assert_eq!(init.database_path(), PathBuf::from("/srv/bakery/sweettrack.db"));
    }
}
