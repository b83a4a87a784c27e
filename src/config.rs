use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;

/// Secrets file used when `DEV_MODE=true`.
pub const DEVELOPMENT_CONFIG: &str = "config/config.development.json";
/// Secrets file used otherwise.
pub const PRODUCTION_CONFIG: &str = "config/config.production.json";

/// Runtime configuration, read from the JSON secrets file and overlaid with
/// `FOLIO_*` environment variables.
///
/// Keys keep the upper-case names of the secrets file; lower-case aliases
/// cover the environment overlay.
#[derive(Clone, Deserialize)]
pub struct Settings {
    #[serde(rename = "GOOGLE_CLIENT_ID", alias = "google_client_id")]
    pub google_client_id: String,
    #[serde(rename = "GOOGLE_CLIENT_SECRET", alias = "google_client_secret")]
    pub google_client_secret: String,
    /// Secret used to encrypt session cookies.
    #[serde(rename = "SESSION_KEY", alias = "session_key")]
    pub session_key: String,
    #[serde(rename = "MONGO_URI", alias = "mongo_uri")]
    pub mongo_uri: String,
    #[serde(rename = "DATABASE_NAME", alias = "database_name")]
    pub database_name: String,
    /// Emails allowed to sign in as admin.
    #[serde(rename = "ADMIN_EMAILS", alias = "admin_emails", default)]
    pub admin_emails: Vec<String>,
    #[serde(rename = "DOMAIN_NAME", alias = "domain_name", default)]
    pub domain_name: String,
    /// Base URL of the backend blog API.
    #[serde(rename = "API_URL", alias = "api_url", default = "default_api_url")]
    pub api_url: String,
    #[serde(rename = "LISTEN_ADDR", alias = "listen_addr", default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(
        rename = "OAUTH_REDIRECT_URL",
        alias = "oauth_redirect_url",
        default = "default_redirect_url"
    )]
    pub oauth_redirect_url: String,
    #[serde(
        rename = "OAUTH_ISSUER_URL",
        alias = "oauth_issuer_url",
        default = "default_issuer_url"
    )]
    pub oauth_issuer_url: String,
    /// Upper bound for upstream fetches, in seconds.
    #[serde(
        rename = "FETCH_TIMEOUT_SECS",
        alias = "fetch_timeout_secs",
        default = "default_fetch_timeout"
    )]
    pub fetch_timeout_secs: u64,
    /// Serve templates from this directory instead of the embedded copies.
    #[serde(rename = "TEMPLATE_DIR", alias = "template_dir", default)]
    pub template_dir: Option<PathBuf>,
    /// Stylesheets and images served for any unmatched path.
    #[serde(rename = "STATIC_DIR", alias = "static_dir", default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_api_url() -> String {
    // docker-compose service name
    "http://api:8080".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_redirect_url() -> String {
    "http://localhost:8080/auth/google/callback".to_string()
}

fn default_issuer_url() -> String {
    "https://accounts.google.com".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Settings {
    /// Load settings from `path`, or from the file selected by `DEV_MODE`.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(is_dev_mode()),
        };
        tracing::info!("Loading configuration from {}", path.display());

        let settings = config::Config::builder()
            .add_source(
                config::File::from(path.clone())
                    .format(config::FileFormat::Json)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("FOLIO")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("admin_emails"),
            )
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to read {}: {e}", path.display())))?;

        settings
            .try_deserialize()
            .map_err(|e| AppError::Internal(format!("Invalid configuration: {e}")))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Case-insensitive admin allow-list check.
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(email))
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("google_client_id", &self.google_client_id)
            .field("database_name", &self.database_name)
            .field("admin_emails", &self.admin_emails)
            .field("domain_name", &self.domain_name)
            .field("api_url", &self.api_url)
            .field("listen_addr", &self.listen_addr)
            .field("oauth_redirect_url", &self.oauth_redirect_url)
            .field("oauth_issuer_url", &self.oauth_issuer_url)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("template_dir", &self.template_dir)
            .field("static_dir", &self.static_dir)
            .finish_non_exhaustive()
    }
}

/// `DEV_MODE=true` selects the development secrets file.
pub fn is_dev_mode() -> bool {
    std::env::var("DEV_MODE").map(|v| v == "true").unwrap_or(false)
}

pub fn default_config_path(dev: bool) -> PathBuf {
    if dev {
        PathBuf::from(DEVELOPMENT_CONFIG)
    } else {
        PathBuf::from(PRODUCTION_CONFIG)
    }
}
