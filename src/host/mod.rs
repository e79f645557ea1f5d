//! String host access
//!
//! The pipeline talks to the string host through two capabilities only:
//! `fetch` a resource as JSON and `submit` a payload to a resource. `Resource`
//! names the four endpoints the tool uses so neither the client nor the mock
//! has to parse paths.

pub mod loco;
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SyncResult;

pub use loco::LocoClient;
pub use mock::{MockStringHost, RecordedWrite};

/// An endpoint on the string host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    /// `export/locale/{locale}.json?no-folding=1`, optionally filtered by status
    Export {
        locale: String,
        status: Option<String>,
    },
    /// `translations/{asset_id}/{locale}`
    Translation { asset_id: String, locale: String },
    /// `translations/{asset_id}/{locale}/flag`
    Flag { asset_id: String, locale: String },
}

impl Resource {
    pub fn export(locale: &str) -> Self {
        Resource::Export {
            locale: locale.to_string(),
            status: None,
        }
    }

    pub fn translation(asset_id: &str, locale: &str) -> Self {
        Resource::Translation {
            asset_id: asset_id.to_string(),
            locale: locale.to_string(),
        }
    }

    pub fn flag(asset_id: &str, locale: &str) -> Self {
        Resource::Flag {
            asset_id: asset_id.to_string(),
            locale: locale.to_string(),
        }
    }

    /// Unencoded path segments below the API root
    pub fn path_segments(&self) -> Vec<String> {
        match self {
            Resource::Export { locale, .. } => {
                vec!["export".into(), "locale".into(), format!("{locale}.json")]
            }
            Resource::Translation { asset_id, locale } => {
                vec!["translations".into(), asset_id.clone(), locale.clone()]
            }
            Resource::Flag { asset_id, locale } => vec![
                "translations".into(),
                asset_id.clone(),
                locale.clone(),
                "flag".into(),
            ],
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Resource::Export { status, .. } => {
                let mut query = vec![("no-folding", "1".to_string())];
                if let Some(status) = status {
                    query.push(("status", status.clone()));
                }
                query
            }
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path_segments().join("/"))?;
        let query = self.query();
        if !query.is_empty() {
            let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            write!(f, "?{}", pairs.join("&"))?;
        }
        Ok(())
    }
}

/// Body of a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Raw text body, used for translations
    Text(String),
    /// Form-encoded fields, used for flags
    Form(Vec<(String, String)>),
}

impl Payload {
    /// The `flag=fuzzy` form marking an entry for review
    pub fn fuzzy_flag() -> Self {
        Payload::Form(vec![("flag".to_string(), "fuzzy".to_string())])
    }
}

/// Read/write access to the string host
#[async_trait]
pub trait StringHost: Send + Sync {
    /// Read `resource` as JSON
    async fn fetch(&self, resource: &Resource) -> SyncResult<Value>;

    /// Write `payload` to `resource`, returning the host's JSON answer
    async fn submit(&self, resource: &Resource, payload: Payload) -> SyncResult<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_display() {
        assert_eq!(
            Resource::export("fr").to_string(),
            "export/locale/fr.json?no-folding=1"
        );
        let fuzzy = Resource::Export {
            locale: "fr".to_string(),
            status: Some("fuzzy".to_string()),
        };
        assert_eq!(
            fuzzy.to_string(),
            "export/locale/fr.json?no-folding=1&status=fuzzy"
        );
    }

    #[test]
    fn test_translation_and_flag_paths() {
        assert_eq!(
            Resource::translation("greeting", "fr").to_string(),
            "translations/greeting/fr"
        );
        assert_eq!(
            Resource::flag("greeting", "fr").path_segments(),
            vec!["translations", "greeting", "fr", "flag"]
        );
        assert!(Resource::flag("greeting", "fr").query().is_empty());
    }

    #[test]
    fn test_fuzzy_flag_payload() {
        assert_eq!(
            Payload::fuzzy_flag(),
            Payload::Form(vec![("flag".to_string(), "fuzzy".to_string())])
        );
    }
}
