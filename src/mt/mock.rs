//! Mock Machine Translator for testing
//!
//! A deterministic, API-free translator for exercising the pipeline without
//! keys or network access. It also counts calls, so tests can assert that a
//! dry run never reaches the translator.
//!
//! # Example
//!
//! ```ignore
//! use loco_translate::mt::{MachineTranslator, MockMode, MockTranslator};
//! use loco_translate::model::TranslationRequest;
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Suffix);
//!     let result = mock.translate(&TranslationRequest::new("hello", "en", "fr")).await.unwrap();
//!     assert_eq!(result, "hello_fr");
//! }
//! ```

use crate::error::{Service, SyncError, SyncResult};
use crate::model::TranslationRequest;
use crate::mt::translator::MachineTranslator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append locale suffix: "hello" → "hello_fr"
    Suffix,

    /// Use predefined mappings: (text, target_locale) → translation,
    /// falling back to `Suffix`
    Mappings(HashMap<(String, String), String>),

    /// Rewrite comma ranges with a decimal point (`[1,2]` → `[1.2]`),
    /// the way translators localize number punctuation
    Decimalize,

    /// Fail every call with a translation error
    Error(String),

    /// Answer `status` for one exact text, `Suffix` for everything else
    Rejected { text: String, status: u16 },

    /// Answer without the expected text field
    Malformed,

    /// Fail every call as if the service were unreachable
    Unreachable,

    /// No-op: return input unchanged
    NoOp,
}

/// Mock translator that simulates various translation scenarios
#[derive(Debug)]
pub struct MockTranslator {
    mode: MockMode,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `translate` calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn apply_translation(&self, request: &TranslationRequest) -> SyncResult<String> {
        let text = request.text.as_str();
        let target = request.target_locale.as_str();

        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target)))
            }
            MockMode::Decimalize => Ok(decimalize_ranges(text)),
            MockMode::Error(msg) => Err(SyncError::Translation(msg.clone())),
            MockMode::Rejected {
                text: rejected,
                status,
            } if rejected == text => Err(SyncError::Http {
                service: Service::Translator,
                endpoint: "mock://translate".to_string(),
                status: *status,
                body: "Bad request".to_string(),
            }),
            MockMode::Rejected { .. } => Ok(format!("{}_{}", text, target)),
            MockMode::Malformed => Err(SyncError::unexpected(
                Service::Translator,
                "mock://translate",
                "missing 'translations[0].text' field",
            )),
            MockMode::Unreachable => Err(SyncError::Transport {
                service: Service::Translator,
                endpoint: "mock://translate".to_string(),
                message: "connection refused".to_string(),
            }),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

// `[1,2]` → `[1.2]`, leaving other commas alone
fn decimalize_ranges(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        let between_digits = i > 0
            && chars.get(i - 1).is_some_and(|p| p.is_ascii_digit())
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
        if *c == ',' && between_digits {
            out.push('.');
        } else {
            out.push(*c);
        }
    }
    out
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(&self, request: &TranslationRequest) -> SyncResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.apply_translation(request)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> TranslationRequest {
        TranslationRequest::new(text, "en", "fr")
    }

    #[tokio::test]
    async fn test_suffix_translation() {
        let mock = MockTranslator::new(MockMode::Suffix);
        assert_eq!(mock.translate(&request("hello")).await.unwrap(), "hello_fr");
    }

    #[tokio::test]
    async fn test_mapping_with_fallback() {
        let mut map = HashMap::new();
        map.insert(
            ("hello".to_string(), "fr".to_string()),
            "bonjour".to_string(),
        );
        let mock = MockTranslator::new(MockMode::Mappings(map));
        assert_eq!(mock.translate(&request("hello")).await.unwrap(), "bonjour");
        assert_eq!(mock.translate(&request("bye")).await.unwrap(), "bye_fr");
    }

    #[tokio::test]
    async fn test_decimalize_ranges() {
        let mock = MockTranslator::new(MockMode::Decimalize);
        assert_eq!(
            mock.translate(&request("[1,2] a, b")).await.unwrap(),
            "[1.2] a, b"
        );
    }

    #[tokio::test]
    async fn test_error_modes() {
        let mock = MockTranslator::new(MockMode::Error("API unavailable".to_string()));
        match mock.translate(&request("hello")).await {
            Err(SyncError::Translation(msg)) => assert_eq!(msg, "API unavailable"),
            _ => panic!("Expected Translation error"),
        }

        let mock = MockTranslator::new(MockMode::Malformed);
        let err = mock.translate(&request("hello")).await.unwrap_err();
        assert!(!err.is_fatal());

        let mock = MockTranslator::new(MockMode::Unreachable);
        let err = mock.translate(&request("hello")).await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_rejects_only_the_given_text() {
        let mock = MockTranslator::new(MockMode::Rejected {
            text: "hello".to_string(),
            status: 400,
        });
        match mock.translate(&request("hello")).await {
            Err(err @ SyncError::Http { status: 400, .. }) => assert!(!err.is_fatal()),
            other => panic!("Expected 400, got {other:?}"),
        }
        assert_eq!(mock.translate(&request("bye")).await.unwrap(), "bye_fr");
    }

    #[tokio::test]
    async fn test_noop_and_call_count() {
        let mock = MockTranslator::new(MockMode::NoOp);
        assert_eq!(mock.calls(), 0);
        assert_eq!(mock.translate(&request("Hello")).await.unwrap(), "Hello");
        assert_eq!(mock.translate(&request("World")).await.unwrap(), "World");
        assert_eq!(mock.calls(), 2);
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(
            MockTranslator::new(MockMode::Suffix).provider_name(),
            "Mock Translator"
        );
    }
}
