//! Fill missing Loco translations with DeepL
//!
//! The crate reads a target-locale export from the Loco string host, picks the
//! assets whose strings are missing or left over from an interrupted run,
//! translates their source text with placeholders and plural syntax protected,
//! writes the results back and flags them fuzzy for review.
//!
//! # Workflow Example
//!
//! ```ignore
//! use loco_translate::{Credentials, Endpoints, Orchestrator, SyncOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = Orchestrator::from_config(
//!         &Credentials::from_env()?,
//!         &Endpoints::from_env(),
//!         SyncOptions::default(),
//!     )?;
//!     let summary = orchestrator.run().await?;
//!     println!("{} strings written", summary.submitted);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod guard;
pub mod host;
pub mod model;
pub mod mt;
pub mod orchestrator;
pub mod plural;
pub mod select;


pub use config::{Credentials, Endpoints, SyncOptions};
pub use error::{Service, SyncError, SyncResult};
pub use events::{EventSink, RecordingSink, SyncEvent, TracingSink};
pub use guard::{IGNORE_TAGS, TokenGuard, contains_guard_markers};
pub use host::{LocoClient, MockStringHost, Payload, Resource, StringHost};
pub use model::{Asset, EntryStatus, Export, ExportedAsset, TranslationRequest};
pub use mt::{DeepLProvider, MachineTranslator, MockMode, MockTranslator};
pub use orchestrator::{AssetOutcome, Orchestrator, RunSummary};
pub use plural::{PluralReport, PluralTable};
pub use select::{SelectOptions, Selection, select};
