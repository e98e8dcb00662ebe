//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

use super::PropositionId;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Proposition selection and state file location
    #[serde(default)]
    pub watch: WatchConfig,

    /// HTTP client behavior settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Outbound mail settings
    #[serde(default)]
    pub email: EmailConfig,

    /// Base URLs for the legislature site and open-data host
    #[serde(default)]
    pub site: SiteConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Overlay SMTP credentials from the environment.
    ///
    /// `EMAIL_USER` / `EMAIL_APP_PASSWORD` take precedence over the file so
    /// credentials never have to live in the config on disk.
    pub fn overlay_env(mut self) -> Self {
        if let Ok(user) = std::env::var("EMAIL_USER") {
            self.email.username = user;
        }
        if let Ok(password) = std::env::var("EMAIL_APP_PASSWORD") {
            self.email.password = password;
        }
        if let Ok(recipient) = std::env::var("EMAIL_RECIPIENT") {
            self.email.recipient = recipient;
        }
        self
    }

    /// Validate configuration values for basic sanity.
    ///
    /// Called before any network activity so a bad config fails fast.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        if self.fetch.connect_timeout_secs == 0 {
            return Err(AppError::validation(
                "fetch.connect_timeout_secs must be > 0",
            ));
        }
        if self.email.recipient.trim().is_empty() {
            return Err(AppError::validation("email.recipient is empty"));
        }
        if self.email.smtp_host.trim().is_empty() {
            return Err(AppError::validation("email.smtp_host is empty"));
        }
        url::Url::parse(&self.site.page_base_url)?;
        url::Url::parse(&self.site.opendata_base_url)?;
        self.proposition_id()?;
        Ok(())
    }

    /// Resolve the configured proposition identifier.
    ///
    /// The identifier shape must match the selected source mode; a missing
    /// required identifier is a validation error, not a fetch error.
    pub fn proposition_id(&self) -> Result<PropositionId> {
        match self.watch.source {
            SourceMode::Page => {
                let docid = self
                    .watch
                    .docid
                    .clone()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| AppError::validation("watch.docid is required in page mode"))?;
                let tipoprop = self
                    .watch
                    .tipoprop
                    .clone()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::validation("watch.tipoprop is required in page mode")
                    })?;
                Ok(PropositionId::Document { docid, tipoprop })
            }
            SourceMode::Opendata => {
                let categoria = self
                    .watch
                    .proposicao
                    .clone()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::validation("watch.proposicao is required in opendata mode")
                    })?;
                let numero = self
                    .watch
                    .numero
                    .clone()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::validation("watch.numero is required in opendata mode")
                    })?;
                let ano = self
                    .watch
                    .ano
                    .clone()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or_else(|| AppError::validation("watch.ano is required in opendata mode"))?;
                Ok(PropositionId::OpenData {
                    categoria,
                    numero,
                    ano,
                })
            }
        }
    }
}

/// Which source adapter fetches the proposition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Scrape the full-text page by docid/tipoprop
    #[default]
    Page,
    /// Query the open-data JSON API by category/number/year
    Opendata,
}

/// Proposition selection and state file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Source adapter selection
    #[serde(default)]
    pub source: SourceMode,

    /// Document id (page mode)
    #[serde(default)]
    pub docid: Option<String>,

    /// Proposition type code (page mode)
    #[serde(default)]
    pub tipoprop: Option<String>,

    /// Proposition category, e.g. "projetos" (opendata mode)
    #[serde(default)]
    pub proposicao: Option<String>,

    /// Proposition number (opendata mode)
    #[serde(default)]
    pub numero: Option<String>,

    /// Proposition year (opendata mode)
    #[serde(default)]
    pub ano: Option<String>,

    /// Path of the persisted previous-state file
    #[serde(default = "defaults::state_path")]
    pub state_path: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            source: SourceMode::default(),
            docid: None,
            tipoprop: None,
            proposicao: None,
            numero: None,
            ano: None,
            state_path: defaults::state_path(),
        }
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Connect timeout in seconds
    #[serde(default = "defaults::connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Total request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum retries for idempotent GETs (0 disables retrying)
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Base backoff between retries in milliseconds, doubled per attempt
    #[serde(default = "defaults::retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            connect_timeout_secs: defaults::connect_timeout(),
            timeout_secs: defaults::timeout(),
            max_retries: defaults::max_retries(),
            retry_backoff_ms: defaults::retry_backoff(),
        }
    }
}

/// Outbound mail settings.
///
/// Username and password are normally overlaid from the environment, see
/// [`Config::overlay_env`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,

    /// SMTP account username, also used as the sender address
    #[serde(default)]
    pub username: String,

    /// SMTP account password (app password)
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Recipient address
    #[serde(default)]
    pub recipient: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: defaults::smtp_host(),
            username: String::new(),
            password: String::new(),
            recipient: String::new(),
        }
    }
}

/// Base URLs for the two source backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Legislature site serving the full-text proposition page
    #[serde(default = "defaults::page_base_url")]
    pub page_base_url: String,

    /// Open-data API host
    #[serde(default = "defaults::opendata_base_url")]
    pub opendata_base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            page_base_url: defaults::page_base_url(),
            opendata_base_url: defaults::opendata_base_url(),
        }
    }
}

mod defaults {
    // Watch defaults
    pub fn state_path() -> String {
        "state.json".into()
    }

    // Fetch defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; alepe-watch/1.0)".into()
    }
    pub fn connect_timeout() -> u64 {
        10
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn retry_backoff() -> u64 {
        1000
    }

    // Email defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }

    // Site defaults
    pub fn page_base_url() -> String {
        "https://www.alepe.pe.gov.br".into()
    }
    pub fn opendata_base_url() -> String {
        "https://dadosabertos.alepe.pe.gov.br".into()
    }
}
