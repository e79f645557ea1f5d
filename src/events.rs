//! Structured progress events
//!
//! The orchestrator reports what it does through an `EventSink` instead of
//! printing. `TracingSink` turns events into log lines; how much of it an
//! operator sees is decided by the tracing filter.

use std::sync::Mutex;

use tracing::{debug, info, warn};

/// Something worth reporting during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Selection finished
    Selected {
        examined: usize,
        selected: usize,
        source_locale: String,
        target_locale: String,
    },
    /// A string is about to be sent to the translator
    Translating {
        asset_id: String,
        entry_id: String,
        text: String,
    },
    /// A restored translation was written back
    Submitted {
        asset_id: String,
        entry_id: String,
        text: String,
    },
    /// An entry was marked fuzzy for review
    Flagged { asset_id: String, entry_id: String },
    /// Non-fatal inconsistency, such as missing plural slots
    Warning { asset_id: String, message: String },
    /// An item was left untranslated
    Skipped { asset_id: String, reason: String },
    /// The run completed
    Finished {
        assets: usize,
        submitted: usize,
        flagged: usize,
        skipped: usize,
        deficient: usize,
    },
}

/// Receiver of `SyncEvent`s
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &SyncEvent);
}

/// Logs events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &SyncEvent) {
        match event {
            SyncEvent::Selected {
                examined,
                selected,
                source_locale,
                target_locale,
            } => info!(
                examined,
                selected,
                "{} of {} assets need translation ({} → {})",
                selected,
                examined,
                source_locale,
                target_locale
            ),
            SyncEvent::Translating {
                asset_id,
                entry_id,
                text,
            } => debug!(asset = %asset_id, entry = %entry_id, "translating \"{}\"", text),
            SyncEvent::Submitted {
                asset_id,
                entry_id,
                text,
            } => debug!(asset = %asset_id, entry = %entry_id, "submitted \"{}\"", text),
            SyncEvent::Flagged { asset_id, entry_id } => {
                debug!(asset = %asset_id, entry = %entry_id, "flagged fuzzy")
            }
            SyncEvent::Warning { asset_id, message } => warn!(asset = %asset_id, "{}", message),
            SyncEvent::Skipped { asset_id, reason } => {
                warn!(asset = %asset_id, "skipped: {}", reason)
            }
            SyncEvent::Finished {
                assets,
                submitted,
                flagged,
                skipped,
                deficient,
            } => info!(
                assets,
                submitted, flagged, skipped, deficient, "translation run finished"
            ),
        }
    }
}

/// Keeps every event, for assertions in tests
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SyncEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn warnings(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SyncEvent::Warning { asset_id, message } => Some((asset_id, message)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &SyncEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}
