/// Machine Translation Module
///
/// Provider abstraction for the translator side of the synchronization:
/// the `MachineTranslator` trait, the DeepL provider used in production, and
/// a mock for tests. Providers receive text that has already been through the
/// token guard and return it translated, wrappers intact.
///
/// # Example
///
/// ```ignore
/// use loco_translate::guard::TokenGuard;
/// use loco_translate::model::TranslationRequest;
/// use loco_translate::mt::{DeepLProvider, MachineTranslator};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let guard = TokenGuard::default();
///     let provider = DeepLProvider::new(std::env::var("DEEPL_API_KEY")?, DeepLProvider::DEFAULT_URL)?;
///
///     let request = TranslationRequest::new(guard.guard("Hello %name%"), "en", "fr");
///     let translated = provider.translate(&request).await?;
///     println!("{}", guard.unguard(&translated));
///     Ok(())
/// }
/// ```
pub mod deepl;
pub mod mock;
pub mod translator;

pub use deepl::{CLIENT_USER_AGENT, DeepLProvider};
pub use mock::{MockMode, MockTranslator};
pub use translator::{
    MachineTranslator, normalize_locale, source_lang_code, target_lang_code, validate_locale,
};
