//! Error types shared by the string host client, the translator and the
//! synchronization pipeline.

use thiserror::Error;

/// Remote side an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    StringHost,
    Translator,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::StringHost => write!(f, "string host"),
            Service::Translator => write!(f, "translator"),
        }
    }
}

/// Error types for the synchronization pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Missing or unusable configuration (credentials, endpoints, plural table)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Locale code that cannot be sent to either service
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// The request never produced a response (DNS, TLS, timeout, ...)
    #[error("{service} request to {endpoint} failed: {message}")]
    Transport {
        service: Service,
        endpoint: String,
        message: String,
    },

    /// The service answered with a non-success status
    #[error("{service} returned {status} for {endpoint}: {body}")]
    Http {
        service: Service,
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response arrived but did not have the expected shape
    #[error("Unexpected {service} response from {endpoint}: {message}")]
    UnexpectedResponse {
        service: Service,
        endpoint: String,
        message: String,
    },

    /// The translator refused or could not handle one text
    #[error("Translation error: {0}")]
    Translation(String),
}

impl SyncError {
    /// Whether this error should abort the whole run.
    ///
    /// Transport failures and rejected credentials mean every following call
    /// would fail the same way. Any other status, like a 404 for one asset or a
    /// 400 for one text, only concerns the item being processed.
    pub fn is_fatal(&self) -> bool {
        match self {
            SyncError::Config(_) | SyncError::InvalidLocale(_) | SyncError::Transport { .. } => {
                true
            }
            SyncError::Http { status, .. } => is_fatal_status(*status),
            SyncError::UnexpectedResponse { .. } | SyncError::Translation(_) => false,
        }
    }

    pub(crate) fn unexpected(
        service: Service,
        endpoint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SyncError::UnexpectedResponse {
            service,
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}

/// Statuses that end the run: bad credentials (401, 403) and DeepL's
/// exhausted quota (456)
pub fn is_fatal_status(status: u16) -> bool {
    matches!(status, 401 | 403 | 456)
}

/// Result type for synchronization operations
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_names_service_and_endpoint() {
        let err = SyncError::Transport {
            service: Service::Translator,
            endpoint: "https://api.deepl.com/v2/translate".to_string(),
            message: "connection refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("translator"));
        assert!(msg.contains("/v2/translate"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_http_error_is_fatal() {
        let err = SyncError::Http {
            service: Service::StringHost,
            endpoint: "export/locale/fr.json".to_string(),
            status: 401,
            body: "Invalid API key".to_string(),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("string host returned 401"));
    }

    #[test]
    fn test_item_level_statuses_are_not_fatal() {
        for status in [400, 404, 413, 422, 500] {
            let err = SyncError::Http {
                service: Service::Translator,
                endpoint: "https://api.deepl.com/v2/translate".to_string(),
                status,
                body: "Bad request".to_string(),
            };
            assert!(!err.is_fatal(), "status {status}");
        }
        assert!(is_fatal_status(403));
        assert!(is_fatal_status(456));
    }

    #[test]
    fn test_item_errors_are_not_fatal() {
        assert!(!SyncError::unexpected(Service::Translator, "translate", "no text").is_fatal());
        assert!(!SyncError::Translation("too long".to_string()).is_fatal());
    }
}
