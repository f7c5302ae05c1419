//! Application configuration.

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Site-wide settings.
    #[serde(default)]
    pub site: SiteConfig,
    /// Uploaded media configuration.
    #[serde(default)]
    pub media: MediaConfig,
    /// Security header policies.
    #[serde(default)]
    pub security: SecurityConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of the site, used for sitemap and robots.txt links.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Site-wide settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site name.
    #[serde(default = "default_site_name")]
    pub name: String,
    /// Path segment the editor surface is mounted under.
    #[serde(default = "default_admin_url")]
    pub admin_url: String,
    /// Hostnames the site answers for. Empty means any host.
    #[serde(default)]
    pub allowed_hosts: Vec<String>,
    /// Bearer token required by the editor API. Editor routes are disabled when unset or blank.
    #[serde(default, deserialize_with = "deserialize_token")]
    pub editor_token: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            admin_url: default_admin_url(),
            allowed_hosts: Vec::new(),
            editor_token: None,
        }
    }
}

/// Uploaded media configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Directory uploaded files are written to.
    #[serde(default = "default_media_root")]
    pub root: PathBuf,
    /// URL prefix uploaded files are served from.
    #[serde(default = "default_media_url")]
    pub url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            url: default_media_url(),
        }
    }
}

/// Security header policies.
///
/// Values are sent verbatim; an empty string disables the header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// `Content-Security-Policy` header value.
    #[serde(default)]
    pub content_security_policy: String,
    /// `Referrer-Policy` header value.
    #[serde(default)]
    pub referrer_policy: String,
    /// `Permissions-Policy` header value.
    #[serde(default)]
    pub permissions_policy: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

fn default_site_name() -> String {
    "shiftedblog".to_string()
}

fn deserialize_token<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let token = Option::<String>::deserialize(deserializer)?;
    Ok(token.filter(|t| !t.trim().is_empty()))
}

fn default_admin_url() -> String {
    "mellon".to_string()
}

fn default_media_root() -> PathBuf {
    PathBuf::from("./media")
}

fn default_media_url() -> String {
    "/media".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `SHIFTEDBLOG_ENV`)
    /// 4. Environment variables with `SHIFTEDBLOG__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let env =
            std::env::var("SHIFTEDBLOG_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SHIFTEDBLOG")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("site.allowed_hosts")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("SHIFTEDBLOG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Public site URL without a trailing slash.
    #[must_use]
    pub fn site_url(&self) -> &str {
        self.server.url.trim_end_matches('/')
    }

    /// Whether a request `Host` header value is allowed.
    #[must_use]
    pub fn is_host_allowed(&self, host: &str) -> bool {
        if self.site.allowed_hosts.is_empty() {
            return true;
        }
        let host = host.split(':').next().unwrap_or(host);
        self.site
            .allowed_hosts
            .iter()
            .any(|allowed| allowed == "*" || allowed.eq_ignore_ascii_case(host))
    }
}
