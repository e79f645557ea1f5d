//! Machine Translation trait and locale helpers
//!
//! This module defines the `MachineTranslator` trait for provider abstraction,
//! so the synchronization pipeline can run against DeepL or a deterministic
//! mock without knowing which.
//!
//! # Example
//!
//! ```ignore
//! use loco_translate::mt::{DeepLProvider, MachineTranslator};
//! use loco_translate::model::TranslationRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = DeepLProvider::new("your-key".to_string(), DeepLProvider::DEFAULT_URL)?;
//!     let request = TranslationRequest::new("Hello <var>name</var>", "en", "fr");
//!     println!("{}", provider.translate(&request).await?);
//!     Ok(())
//! }
//! ```

use crate::error::{SyncError, SyncResult};
use crate::model::TranslationRequest;
use async_trait::async_trait;

/// Generic trait for machine translation providers
///
/// One call translates one text. Callers never batch across strings.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate `request.text` from its source to its target locale
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text
    /// * `Err(SyncError)` - Transport failures are fatal, a malformed answer
    ///   is `UnexpectedResponse`
    async fn translate(&self, request: &TranslationRequest) -> SyncResult<String>;

    /// Get the name of this translation provider
    ///
    /// Used for logging to identify which provider handled a translation.
    fn provider_name(&self) -> &str;
}

/// Normalize a locale code by stripping region information
///
/// - `en-US` → `en`
/// - `zh-Hans` → `zh`
/// - `pt_BR` → `pt`
pub fn normalize_locale(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
        .to_lowercase()
}

/// Validate that a locale code is in acceptable format
///
/// Checks that the locale code contains only alphanumeric characters,
/// hyphens, and underscores. Locale codes end up in URL paths on the host.
pub fn validate_locale(locale: &str) -> SyncResult<()> {
    if locale.is_empty() {
        return Err(SyncError::InvalidLocale("Locale code is empty".to_string()));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(SyncError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}

/// Source language code in the translator's format: base language, upper case
pub fn source_lang_code(locale: &str) -> String {
    normalize_locale(locale).to_uppercase()
}

/// Target language code in the translator's format
///
/// Regions are kept for the variants DeepL distinguishes (`EN-GB`, `PT-BR`),
/// everything else is reduced to the base language.
pub fn target_lang_code(locale: &str) -> String {
    let code = locale.replace('_', "-").to_uppercase();
    match code.as_str() {
        "EN-GB" | "EN-US" | "PT-BR" | "PT-PT" | "ZH-HANS" | "ZH-HANT" => code,
        _ => normalize_locale(locale).to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_locale_with_region() {
        assert_eq!(normalize_locale("en-US"), "en");
        assert_eq!(normalize_locale("fr-FR"), "fr");
        assert_eq!(normalize_locale("pt_BR"), "pt");
    }

    #[test]
    fn test_normalize_locale_case_insensitive() {
        assert_eq!(normalize_locale("EN"), "en");
        assert_eq!(normalize_locale("EN-US"), "en");
    }

    #[test]
    fn test_validate_locale_valid_codes() {
        assert!(validate_locale("en").is_ok());
        assert!(validate_locale("en-US").is_ok());
        assert!(validate_locale("zh-Hans").is_ok());
        assert!(validate_locale("de_DE").is_ok());
    }

    #[test]
    fn test_validate_locale_invalid_codes() {
        assert!(validate_locale("").is_err());
        assert!(validate_locale("en@invalid").is_err());
        assert!(validate_locale("fr/../x").is_err());
    }

    #[test]
    fn test_validate_locale_error_messages() {
        match validate_locale("en@US") {
            Err(SyncError::InvalidLocale(msg)) => {
                assert!(msg.contains("Invalid characters"));
            }
            _ => panic!("Expected InvalidLocale error"),
        }
    }

    #[test]
    fn test_lang_codes() {
        assert_eq!(source_lang_code("en"), "EN");
        assert_eq!(source_lang_code("en-GB"), "EN");
        assert_eq!(target_lang_code("fr"), "FR");
        assert_eq!(target_lang_code("fr-CA"), "FR");
        assert_eq!(target_lang_code("pt_br"), "PT-BR");
        assert_eq!(target_lang_code("en-gb"), "EN-GB");
    }
}
