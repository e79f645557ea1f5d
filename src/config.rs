//! Run configuration
//!
//! Credentials and endpoints are read from the environment here, once, and
//! handed to the clients explicitly. Nothing below this layer looks at the
//! environment.

use crate::error::{SyncError, SyncResult};
use crate::host::LocoClient;
use crate::mt::{DeepLProvider, validate_locale};
use crate::select::SelectOptions;

pub const HOST_KEY_VAR: &str = "LOCO_API_KEY";
pub const TRANSLATOR_KEY_VAR: &str = "DEEPL_API_KEY";
pub const HOST_URL_VAR: &str = "LOCO_API_URL";
pub const TRANSLATOR_URL_VAR: &str = "DEEPL_API_URL";

/// Everything that shapes one run, apart from credentials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOptions {
    pub selection: SelectOptions,
    /// Do not flag written translations as fuzzy
    pub no_fuzzy: bool,
    /// Select and report only; no translator calls, no writes
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn source_locale(&self) -> &str {
        &self.selection.source_locale
    }

    pub fn target_locale(&self) -> &str {
        &self.selection.target_locale
    }

    /// Reject locale codes before they reach a URL
    pub fn validate(&self) -> SyncResult<()> {
        validate_locale(self.source_locale())?;
        validate_locale(self.target_locale())?;
        if self.source_locale().eq_ignore_ascii_case(self.target_locale()) {
            return Err(SyncError::Config(format!(
                "Source and target locale are both '{}'",
                self.source_locale()
            )));
        }
        Ok(())
    }
}

/// API keys for both services
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub host_key: String,
    pub translator_key: String,
}

impl Credentials {
    pub fn from_env() -> SyncResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve keys through `lookup`, failing on missing or blank values
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SyncResult<Self> {
        let require = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| {
                    SyncError::Config(format!("{} environment variable not set", name))
                })
        };
        Ok(Credentials {
            host_key: require(HOST_KEY_VAR)?,
            translator_key: require(TRANSLATOR_KEY_VAR)?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("host_key", &"***")
            .field("translator_key", &"***")
            .finish()
    }
}

/// Base URLs of both services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub host_url: String,
    pub translator_url: String,
}

impl Endpoints {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Endpoints::default();
        Endpoints {
            host_url: lookup(HOST_URL_VAR)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.host_url),
            translator_url: lookup(TRANSLATOR_URL_VAR)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.translator_url),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            host_url: LocoClient::DEFAULT_URL.to_string(),
            translator_url: DeepLProvider::DEFAULT_URL.to_string(),
        }
    }
}
