//! Plural slot requirements per locale and reconciliation against the host
//!
//! The host stores a fixed number of plural forms per locale. When that
//! number is lower than what the language needs, translations for the
//! missing forms have nowhere to go. The reconciler only reports this; it
//! never changes the host configuration.

use std::collections::HashMap;

use icu_locale::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};

use crate::error::{SyncError, SyncResult};
use crate::model::Asset;
use crate::mt::normalize_locale;

/// Plural forms assumed for any locale without an override
pub const DEFAULT_PLURAL_SLOTS: usize = 2;

/// Outcome of comparing an asset's host plural slots with the locale's needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralReport {
    pub asset_id: String,
    pub locale: String,
    pub required: usize,
    pub available: usize,
    pub deficient: bool,
}

/// Locale to plural-form-count table
///
/// Lookup tries the full code first (`pt-br`), then the base language (`pt`).
/// With CLDR lookup enabled, locales absent from the table are resolved from
/// ICU plural rules before falling back to the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralTable {
    default: usize,
    overrides: HashMap<String, usize>,
    use_cldr: bool,
}

impl PluralTable {
    /// An empty table answering `default` for every locale
    pub fn with_default(default: usize) -> Self {
        PluralTable {
            default: default.max(1),
            overrides: HashMap::new(),
            use_cldr: false,
        }
    }

    pub fn with_override(mut self, locale: &str, slots: usize) -> Self {
        self.overrides
            .insert(locale.to_lowercase().replace('_', "-"), slots.max(1));
        self
    }

    pub fn with_cldr(mut self, enabled: bool) -> Self {
        self.use_cldr = enabled;
        self
    }

    /// Apply `LOCALE=N` overrides, as given on the command line
    pub fn with_overrides<I, S>(mut self, entries: I) -> SyncResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in entries {
            let (locale, slots) = parse_override(entry.as_ref())?;
            self = self.with_override(&locale, slots);
        }
        Ok(self)
    }

    /// Number of plural forms `locale` requires
    pub fn required_slots(&self, locale: &str) -> usize {
        let code = locale.to_lowercase().replace('_', "-");
        if let Some(slots) = self.overrides.get(&code) {
            return *slots;
        }
        let base = normalize_locale(&code);
        if let Some(slots) = self.overrides.get(&base) {
            return *slots;
        }
        if self.use_cldr {
            if let Some(slots) = cldr_plural_slots(&code) {
                return slots;
            }
        }
        self.default
    }

    /// Compare the host's configured slots for `asset` with what `locale` needs
    pub fn reconcile(&self, asset: &Asset, locale: &str) -> PluralReport {
        let required = self.required_slots(locale);
        let available = asset.host_plural_slots();
        PluralReport {
            asset_id: asset.id.clone(),
            locale: locale.to_string(),
            required,
            available,
            deficient: available < required,
        }
    }
}

impl Default for PluralTable {
    fn default() -> Self {
        PluralTable::with_default(DEFAULT_PLURAL_SLOTS).with_override("pl", 3)
    }
}

fn parse_override(entry: &str) -> SyncResult<(String, usize)> {
    let invalid = || {
        SyncError::Config(format!(
            "Invalid plural override '{}', expected LOCALE=COUNT",
            entry
        ))
    };
    let (locale, count) = entry.split_once('=').ok_or_else(invalid)?;
    let locale = locale.trim();
    let count: usize = count.trim().parse().map_err(|_| invalid())?;
    if locale.is_empty() || count == 0 {
        return Err(invalid());
    }
    Ok((locale.to_string(), count))
}

/// Count the integer plural categories ICU knows for `locale`
///
/// Fractional-only categories (Polish `other`) are not counted since string
/// hosts store forms for whole numbers.
pub fn cldr_plural_slots(locale: &str) -> Option<usize> {
    let locale: Locale = locale.parse().ok()?;
    let rules = PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into()).ok()?;

    let mut seen: Vec<PluralCategory> = Vec::new();
    for n in 0usize..=200 {
        let category = rules.category_for(n);
        if !seen.contains(&category) {
            seen.push(category);
        }
    }
    Some(seen.len())
}
