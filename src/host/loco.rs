//! HTTP client for the Loco string host
//!
//! Every request carries the project key as a bearer token. Asset ids are
//! percent-encoded as path segments, so ids containing `/` or spaces are safe.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use serde_json::Value;

use crate::error::{Service, SyncError, SyncResult};
use crate::host::{Payload, Resource, StringHost};
use crate::mt::CLIENT_USER_AGENT;

/// Loco REST API client
#[derive(Clone)]
pub struct LocoClient {
    api_key: String,
    client: reqwest::Client,
    base_url: Url,
}

impl LocoClient {
    pub const DEFAULT_URL: &'static str = "https://localise.biz/api/";

    /// Create a client for the API rooted at `base_url`
    pub fn new(api_key: String, base_url: &str) -> SyncResult<Self> {
        if api_key.trim().is_empty() {
            return Err(SyncError::Config(
                "String host API key cannot be empty".to_string(),
            ));
        }

        let base_url = Url::parse(base_url)
            .map_err(|e| SyncError::Config(format!("Invalid string host URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SyncError::Config(format!(
                "String host URL '{}' cannot be used as a base",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(CLIENT_USER_AGENT)
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            base_url,
        })
    }

    /// Absolute URL of `resource`, query included
    pub fn url_for(&self, resource: &Resource) -> SyncResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                SyncError::Config(format!("String host URL '{}' cannot be a base", self.base_url))
            })?;
            segments.pop_if_empty().extend(resource.path_segments());
        }
        let query = resource.query();
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn execute(&self, resource: &Resource, request: RequestBuilder) -> SyncResult<Value> {
        let endpoint = resource.to_string();
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| SyncError::Transport {
                service: Service::StringHost,
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SyncError::Http {
                service: Service::StringHost,
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|e| {
            SyncError::unexpected(
                Service::StringHost,
                endpoint.as_str(),
                format!("Failed to parse response: {}", e),
            )
        })
    }
}

impl std::fmt::Debug for LocoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocoClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[async_trait]
impl StringHost for LocoClient {
    async fn fetch(&self, resource: &Resource) -> SyncResult<Value> {
        let url = self.url_for(resource)?;
        self.execute(resource, self.client.get(url)).await
    }

    async fn submit(&self, resource: &Resource, payload: Payload) -> SyncResult<Value> {
        let url = self.url_for(resource)?;
        let request = match payload {
            Payload::Text(text) => self
                .client
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(text),
            Payload::Form(fields) => self.client.post(url).form(&fields),
        };
        self.execute(resource, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> LocoClient {
        LocoClient::new("loco-key".to_string(), base).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let err = LocoClient::new(" ".to_string(), LocoClient::DEFAULT_URL).unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(LocoClient::new("k".to_string(), "not a url").is_err());
        assert!(LocoClient::new("k".to_string(), "mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_export_url() {
        let url = client(LocoClient::DEFAULT_URL)
            .url_for(&Resource::export("fr"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://localise.biz/api/export/locale/fr.json?no-folding=1"
        );
    }

    #[test]
    fn test_base_without_trailing_slash() {
        let url = client("https://localise.biz/api")
            .url_for(&Resource::flag("greeting", "fr"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://localise.biz/api/translations/greeting/fr/flag"
        );
    }

    #[test]
    fn test_asset_id_is_encoded() {
        let url = client(LocoClient::DEFAULT_URL)
            .url_for(&Resource::translation("menu/file open", "fr"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://localise.biz/api/translations/menu%2Ffile%20open/fr"
        );
    }

    #[test]
    fn test_debug_output_masks_key() {
        let debug_str = format!("{:?}", client(LocoClient::DEFAULT_URL));
        assert!(debug_str.contains("***"));
        assert!(!debug_str.contains("loco-key"));
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test -- --ignored
    async fn test_real_api_export() {
        let Ok(key) = std::env::var("LOCO_API_KEY") else {
            eprintln!("Skipping: LOCO_API_KEY not set");
            return;
        };
        let client = LocoClient::new(key, LocoClient::DEFAULT_URL).unwrap();
        let export = client.fetch(&Resource::export("en")).await.unwrap();
        assert!(export.is_object());
    }
}
