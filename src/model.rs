//! Data exchanged with the string host and the translator
//!
//! Everything here is transient: assets are fetched at the start of a run,
//! translated, written back and dropped.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Service, SyncError, SyncResult};

/// Review state of a single string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Empty,
    Present,
    Fuzzy,
}

/// A plural form attached to an asset, addressed by its own id
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PluralEntry {
    pub id: String,
    pub translation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PluralInfo {
    pub length: usize,
}

/// Locale metadata the host attaches to a translation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocaleInfo {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub plurals: Option<PluralInfo>,
}

/// One asset in one locale, as returned by `GET translations/{id}/{locale}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub id: String,
    pub translation: String,
    #[serde(default)]
    pub translated: bool,
    #[serde(default)]
    pub flagged: bool,
    #[serde(default)]
    pub plurals: Vec<PluralEntry>,
    #[serde(default)]
    pub locale: Option<LocaleInfo>,
}

impl Asset {
    /// Parse a host response, reporting a shape mismatch against `endpoint`
    pub fn from_value(value: Value, endpoint: &str) -> SyncResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| SyncError::unexpected(Service::StringHost, endpoint, e.to_string()))
    }

    pub fn status(&self) -> EntryStatus {
        if self.translation.is_empty() || !self.translated {
            EntryStatus::Empty
        } else if self.flagged {
            EntryStatus::Fuzzy
        } else {
            EntryStatus::Present
        }
    }

    /// Number of plural slots the host is configured with for this locale.
    ///
    /// Falls back to the singular plus the plural entries actually present
    /// when the host omits locale metadata.
    pub fn host_plural_slots(&self) -> usize {
        self.locale
            .as_ref()
            .and_then(|l| l.plurals.as_ref())
            .map(|p| p.length)
            .unwrap_or(1 + self.plurals.len())
    }
}

/// One exported asset with its strings normalized to a sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedAsset {
    pub id: String,
    pub strings: Vec<String>,
}

/// The target-locale export, in the order the host listed it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Export {
    pub assets: Vec<ExportedAsset>,
    /// Ids whose value was neither a string nor a list of strings
    pub malformed: Vec<String>,
}

impl Export {
    /// Normalize an export document.
    ///
    /// A bare string becomes a one-element sequence and `null` counts as an
    /// empty string. Anything else is recorded as malformed and left out.
    pub fn from_value(value: Value, endpoint: &str) -> SyncResult<Self> {
        let Value::Object(map) = value else {
            return Err(SyncError::unexpected(
                Service::StringHost,
                endpoint,
                "export is not a JSON object",
            ));
        };

        let mut export = Export::default();
        for (id, value) in map {
            match normalize_strings(value) {
                Some(strings) => export.assets.push(ExportedAsset { id, strings }),
                None => export.malformed.push(id),
            }
        }
        Ok(export)
    }
}

fn normalize_strings(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Null => Some(vec![String::new()]),
        Value::String(s) => Some(vec![s]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Null => Some(String::new()),
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

/// A guarded text on its way to the translator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_locale: String,
    pub target_locale: String,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, source_locale: &str, target_locale: &str) -> Self {
        TranslationRequest {
            text: text.into(),
            source_locale: source_locale.to_string(),
            target_locale: target_locale.to_string(),
        }
    }
}
