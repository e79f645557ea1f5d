//! In-memory string host for tests
//!
//! Serves registered JSON documents and records every write in order, so
//! tests can assert exactly which submissions and flags a run produced.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::{Service, SyncError, SyncResult};
use crate::host::{Payload, Resource, StringHost};

/// A write the mock received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    pub resource: Resource,
    pub payload: Payload,
}

#[derive(Debug, Default)]
pub struct MockStringHost {
    documents: HashMap<Resource, Value>,
    failures: HashMap<Resource, SyncError>,
    reads: Mutex<Vec<Resource>>,
    writes: Mutex<Vec<RecordedWrite>>,
}

impl MockStringHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `export` for the target-locale export of `locale`
    pub fn with_export(self, locale: &str, export: Value) -> Self {
        self.with_document(Resource::export(locale), export)
    }

    /// Serve `asset` for `translations/{asset_id}/{locale}`
    pub fn with_asset(self, asset_id: &str, locale: &str, asset: Value) -> Self {
        self.with_document(Resource::translation(asset_id, locale), asset)
    }

    pub fn with_document(mut self, resource: Resource, document: Value) -> Self {
        self.documents.insert(resource, document);
        self
    }

    /// Answer any call on `resource` with `error`
    pub fn with_failure(mut self, resource: Resource, error: SyncError) -> Self {
        self.failures.insert(resource, error);
        self
    }

    pub fn reads(&self) -> Vec<Resource> {
        lock(&self.reads).clone()
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        lock(&self.writes).clone()
    }

    /// Texts submitted as translations, in order
    pub fn submitted_texts(&self) -> Vec<(Resource, String)> {
        self.writes()
            .into_iter()
            .filter_map(|w| match w.payload {
                Payload::Text(text) => Some((w.resource, text)),
                Payload::Form(_) => None,
            })
            .collect()
    }

    /// Flag resources written, in order
    pub fn flagged(&self) -> Vec<Resource> {
        self.writes()
            .into_iter()
            .filter(|w| matches!(w.resource, Resource::Flag { .. }))
            .map(|w| w.resource)
            .collect()
    }

    fn failure(&self, resource: &Resource) -> SyncResult<()> {
        match self.failures.get(resource) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl StringHost for MockStringHost {
    async fn fetch(&self, resource: &Resource) -> SyncResult<Value> {
        lock(&self.reads).push(resource.clone());
        self.failure(resource)?;
        self.documents
            .get(resource)
            .cloned()
            .ok_or_else(|| SyncError::Http {
                service: Service::StringHost,
                endpoint: resource.to_string(),
                status: 404,
                body: "Not found".to_string(),
            })
    }

    async fn submit(&self, resource: &Resource, payload: Payload) -> SyncResult<Value> {
        lock(&self.writes).push(RecordedWrite {
            resource: resource.clone(),
            payload: payload.clone(),
        });
        self.failure(resource)?;
        Ok(match (resource, payload) {
            (Resource::Translation { asset_id, .. }, Payload::Text(text)) => {
                json!({"id": asset_id, "translation": text, "translated": true})
            }
            _ => json!({"status": 200, "message": "OK"}),
        })
    }
}
