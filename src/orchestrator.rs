//! Translation run driver
//!
//! A run reads the target-locale export once, selects assets, then handles
//! them one at a time:
//!
//! 1. fetch the source-language asset
//! 2. for the singular and each plural form: guard, translate, unguard, submit
//! 3. reconcile plural slots (plural assets only)
//! 4. flag every submitted entry fuzzy, unless disabled
//!
//! Fatal errors (transport, rejected credentials, configuration) end the run.
//! Any other error, including a 404 or 400 for one item, skips the string or
//! asset it concerns and the run goes on.

use std::sync::Arc;

use crate::config::{Credentials, Endpoints, SyncOptions};
use crate::error::{SyncError, SyncResult};
use crate::events::{EventSink, SyncEvent, TracingSink};
use crate::guard::TokenGuard;
use crate::host::{LocoClient, Payload, Resource, StringHost};
use crate::model::{Asset, Export, TranslationRequest};
use crate::mt::{DeepLProvider, MachineTranslator};
use crate::plural::PluralTable;
use crate::select::{Selection, select};

/// What happened to one asset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetOutcome {
    /// Entry ids whose translation was written, singular first
    pub submitted: Vec<String>,
    pub flagged: usize,
    pub skipped: usize,
    pub deficient: bool,
}

impl AssetOutcome {
    /// Number of entries translated and written back
    pub fn translated(&self) -> usize {
        self.submitted.len()
    }
}

/// Totals for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub examined: usize,
    pub selected: usize,
    pub assets: usize,
    pub submitted: usize,
    pub flagged: usize,
    pub skipped: usize,
    pub deficient: usize,
    pub dry_run: bool,
}

impl RunSummary {
    fn record(&mut self, outcome: &AssetOutcome) {
        self.assets += 1;
        self.submitted += outcome.translated();
        self.flagged += outcome.flagged;
        self.skipped += outcome.skipped;
        if outcome.deficient {
            self.deficient += 1;
        }
    }
}

pub struct Orchestrator {
    host: Arc<dyn StringHost>,
    translator: Arc<dyn MachineTranslator>,
    events: Arc<dyn EventSink>,
    guard: TokenGuard,
    plurals: PluralTable,
    options: SyncOptions,
}

impl Orchestrator {
    pub fn new(
        host: Arc<dyn StringHost>,
        translator: Arc<dyn MachineTranslator>,
        options: SyncOptions,
    ) -> Self {
        Orchestrator {
            host,
            translator,
            events: Arc::new(TracingSink),
            guard: TokenGuard::default(),
            plurals: PluralTable::default(),
            options,
        }
    }

    /// Build an orchestrator talking to Loco and DeepL
    pub fn from_config(
        credentials: &Credentials,
        endpoints: &Endpoints,
        options: SyncOptions,
    ) -> SyncResult<Self> {
        let host = LocoClient::new(credentials.host_key.clone(), &endpoints.host_url)?;
        let translator =
            DeepLProvider::new(credentials.translator_key.clone(), &endpoints.translator_url)?;
        Ok(Self::new(Arc::new(host), Arc::new(translator), options))
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_plural_table(mut self, plurals: PluralTable) -> Self {
        self.plurals = plurals;
        self
    }

    pub fn with_guard(mut self, guard: TokenGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    fn emit(&self, event: SyncEvent) {
        self.events.emit(&event);
    }

    fn skip(&self, asset_id: &str, reason: String) {
        self.emit(SyncEvent::Skipped {
            asset_id: asset_id.to_string(),
            reason,
        });
    }

    /// Fetch the export and pick the assets to translate
    pub async fn select(&self) -> SyncResult<Selection> {
        let resource = self.options.selection.export_resource();
        let value = self.host.fetch(&resource).await?;
        let export = Export::from_value(value, &resource.to_string())?;

        for id in &export.malformed {
            self.skip(id, "export value is neither a string nor a list of strings".to_string());
        }

        let selection = select(&export, &self.options.selection);
        self.emit(SyncEvent::Selected {
            examined: selection.examined,
            selected: selection.len(),
            source_locale: self.options.source_locale().to_string(),
            target_locale: self.options.target_locale().to_string(),
        });
        Ok(selection)
    }

    /// Run the whole synchronization
    pub async fn run(&self) -> SyncResult<RunSummary> {
        self.options.validate()?;

        let selection = self.select().await?;
        let mut summary = RunSummary {
            examined: selection.examined,
            selected: selection.len(),
            dry_run: self.options.dry_run,
            ..RunSummary::default()
        };

        if self.options.dry_run {
            return Ok(summary);
        }

        tracing::debug!(
            provider = self.translator.provider_name(),
            "translating {} assets",
            selection.len()
        );

        for asset_id in &selection.asset_ids {
            match self.translate_one(asset_id).await {
                Ok(outcome) => summary.record(&outcome),
                Err(e) if !e.is_fatal() => {
                    self.skip(asset_id, e.to_string());
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        self.emit(SyncEvent::Finished {
            assets: summary.assets,
            submitted: summary.submitted,
            flagged: summary.flagged,
            skipped: summary.skipped,
            deficient: summary.deficient,
        });
        Ok(summary)
    }

    /// Translate, write back and flag every string of one asset
    pub async fn translate_one(&self, asset_id: &str) -> SyncResult<AssetOutcome> {
        let source = Resource::translation(asset_id, self.options.source_locale());
        let value = self.host.fetch(&source).await?;
        let asset = Asset::from_value(value, &source.to_string())?;
        tracing::debug!(
            asset_id,
            status = ?asset.status(),
            plurals = asset.plurals.len(),
            "fetched source asset"
        );

        let mut outcome = AssetOutcome::default();
        let entries = std::iter::once((asset_id.to_string(), asset.translation.clone())).chain(
            asset
                .plurals
                .iter()
                .map(|p| (p.id.clone(), p.translation.clone())),
        );

        for (entry_id, text) in entries {
            if text.trim().is_empty() {
                self.skip(asset_id, format!("{}: source text is empty", entry_id));
                outcome.skipped += 1;
                continue;
            }
            match self.translate_entry(asset_id, &entry_id, &text).await {
                Ok(_) => outcome.submitted.push(entry_id),
                Err(e) if !e.is_fatal() => {
                    self.skip(asset_id, format!("{}: {}", entry_id, e));
                    outcome.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if !asset.plurals.is_empty() {
            outcome.deficient = self.reconcile(asset_id).await?;
        }

        if !self.options.no_fuzzy {
            for entry_id in &outcome.submitted {
                let flag = Resource::flag(entry_id, self.options.target_locale());
                match self.host.submit(&flag, Payload::fuzzy_flag()).await {
                    Ok(_) => {
                        self.emit(SyncEvent::Flagged {
                            asset_id: asset_id.to_string(),
                            entry_id: entry_id.clone(),
                        });
                        outcome.flagged += 1;
                    }
                    Err(e) if !e.is_fatal() => self.emit(SyncEvent::Warning {
                        asset_id: asset_id.to_string(),
                        message: format!("could not flag {}: {}", entry_id, e),
                    }),
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(outcome)
    }

    /// Guard, translate, restore and submit one string; returns the text written
    async fn translate_entry(
        &self,
        asset_id: &str,
        entry_id: &str,
        text: &str,
    ) -> SyncResult<String> {
        let guarded = self.guard.guard(text);
        self.emit(SyncEvent::Translating {
            asset_id: asset_id.to_string(),
            entry_id: entry_id.to_string(),
            text: guarded.clone(),
        });

        let request = TranslationRequest::new(
            guarded,
            self.options.source_locale(),
            self.options.target_locale(),
        );
        let translated = self.translator.translate(&request).await?;
        if translated.trim().is_empty() {
            return Err(SyncError::Translation(
                "translator returned an empty text".to_string(),
            ));
        }

        let restored = self.guard.unguard(&translated);
        let target = Resource::translation(entry_id, self.options.target_locale());
        self.host
            .submit(&target, Payload::Text(restored.clone()))
            .await?;

        self.emit(SyncEvent::Submitted {
            asset_id: asset_id.to_string(),
            entry_id: entry_id.to_string(),
            text: restored.clone(),
        });
        Ok(restored)
    }

    /// Check the host's plural slots for the target locale; true when short
    async fn reconcile(&self, asset_id: &str) -> SyncResult<bool> {
        let locale = self.options.target_locale();
        let resource = Resource::translation(asset_id, locale);
        let target = match self.host.fetch(&resource).await {
            Ok(value) => Asset::from_value(value, &resource.to_string()),
            Err(e) => Err(e),
        };

        match target {
            Ok(target) => {
                let report = self.plurals.reconcile(&target, locale);
                if report.deficient {
                    self.emit(SyncEvent::Warning {
                        asset_id: asset_id.to_string(),
                        message: format!(
                            "asset '{}' has {} plural forms for locale '{}', {} required",
                            report.asset_id, report.available, report.locale, report.required
                        ),
                    });
                }
                Ok(report.deficient)
            }
            Err(e) if !e.is_fatal() => {
                self.emit(SyncEvent::Warning {
                    asset_id: asset_id.to_string(),
                    message: format!("could not check plural forms for '{}': {}", locale, e),
                });
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
