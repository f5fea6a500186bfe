//! Command-line and environment configuration for sweettrack-shop
//!
//! clap reads each option from the command line first and then from its
//! `SWEETTRACK_*` environment variable; anything still unset falls back to
//! the TOML config file and finally to compiled defaults.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use sweettrack_common::auth::DEFAULT_ADMIN_PASSPHRASE;
use sweettrack_common::config::{
    resolve_root_folder, TomlConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SESSION_TTL_SECONDS,
    DEFAULT_SUGGESTION_BASE_URL, DEFAULT_SUGGESTION_MODEL,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "sweettrack-shop", version, about = "Bakery storefront and order back-office")]
pub struct Args {
    /// Folder holding the database
    #[arg(long, env = "SWEETTRACK_ROOT")]
    pub root_folder: Option<PathBuf>,

    /// Explicit config file (otherwise the standard locations are searched)
    #[arg(long, env = "SWEETTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "SWEETTRACK_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "SWEETTRACK_PORT")]
    pub port: Option<u16>,

    /// Shared passphrase for the admin portal
    #[arg(long, env = "SWEETTRACK_ADMIN_PASSPHRASE", hide_env_values = true)]
    pub admin_passphrase: Option<String>,

    #[arg(long, env = "SWEETTRACK_SESSION_TTL_SECONDS")]
    pub session_ttl_seconds: Option<u64>,

    /// API key for the message-suggestion service; suggestions fall back to
    /// a fixed list when unset
    #[arg(long, env = "SWEETTRACK_SUGGESTIONS_API_KEY", hide_env_values = true)]
    pub suggestions_api_key: Option<String>,

    #[arg(long, env = "SWEETTRACK_SUGGESTIONS_MODEL")]
    pub suggestions_model: Option<String>,

    /// Base URL of the generative-language API
    #[arg(long, env = "SWEETTRACK_SUGGESTIONS_BASE_URL")]
    pub suggestions_base_url: Option<String>,
}

/// Fully resolved service settings
#[derive(Debug, Clone, PartialEq)]
pub struct ShopConfig {
    pub root_folder: PathBuf,
    pub host: String,
    pub port: u16,
    pub admin_passphrase: String,
    pub session_ttl: Duration,
    pub suggestions_api_key: Option<String>,
    pub suggestions_model: String,
    pub suggestions_base_url: String,
}

impl ShopConfig {
    pub fn resolve(args: Args, toml: TomlConfig) -> Self {
        let root_folder = resolve_root_folder(args.root_folder.as_deref(), &toml);

        let admin_passphrase = args
            .admin_passphrase
            .or(toml.admin_passphrase)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("No admin passphrase configured, using the default");
                DEFAULT_ADMIN_PASSPHRASE.to_string()
            });

        let suggestions_api_key = args
            .suggestions_api_key
            .or(toml.suggestions.api_key)
            .filter(|k| !k.trim().is_empty());

        Self {
            root_folder,
            host: args.host.or(toml.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            admin_passphrase,
            session_ttl: Duration::from_secs(
                args.session_ttl_seconds
                    .or(toml.session_ttl_seconds)
                    .unwrap_or(DEFAULT_SESSION_TTL_SECONDS),
            ),
            suggestions_api_key,
            suggestions_model: args
                .suggestions_model
                .or(toml.suggestions.model)
                .unwrap_or_else(|| DEFAULT_SUGGESTION_MODEL.to_string()),
            suggestions_base_url: args
                .suggestions_base_url
                .or(toml.suggestions.base_url)
                .unwrap_or_else(|| DEFAULT_SUGGESTION_BASE_URL.to_string()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
