//! Selection of the assets that need (re)translation
//!
//! Works on the target-locale export. An asset is picked when one of its
//! strings is empty, when a string still carries guard wrappers from an
//! interrupted run, or unconditionally when forced.

use std::collections::HashSet;

use crate::guard::contains_guard_markers;
use crate::host::Resource;
use crate::model::Export;

/// What to select and for which locale pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOptions {
    pub source_locale: String,
    pub target_locale: String,
    /// Retranslate everything, even existing translations
    pub force_all: bool,
    /// Only consider asset ids starting with this
    pub prefix: Option<String>,
    /// Only empty strings trigger selection; leftover wrappers are ignored
    pub empty_only: bool,
    /// Only assets flagged fuzzy in the target locale
    pub fuzzy_only: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        SelectOptions {
            source_locale: "en".to_string(),
            target_locale: "fr".to_string(),
            force_all: false,
            prefix: None,
            empty_only: false,
            fuzzy_only: false,
        }
    }
}

impl SelectOptions {
    /// The export to select from
    ///
    /// With `fuzzy_only` the host filters the export down to fuzzy entries.
    pub fn export_resource(&self) -> Resource {
        Resource::Export {
            locale: self.target_locale.clone(),
            status: self.fuzzy_only.then(|| "fuzzy".to_string()),
        }
    }

    fn accepts_id(&self, id: &str) -> bool {
        match &self.prefix {
            Some(prefix) => id.starts_with(prefix.as_str()),
            None => true,
        }
    }

    fn needs_translation(&self, strings: &[String]) -> bool {
        if self.force_all || self.fuzzy_only {
            return true;
        }
        strings
            .iter()
            .any(|s| s.is_empty() || (!self.empty_only && contains_guard_markers(s)))
    }
}

/// Assets picked for translation, in export order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub asset_ids: Vec<String>,
    /// Assets that passed the prefix filter and were checked
    pub examined: usize,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.asset_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.asset_ids.is_empty()
    }
}

/// Pick the assets of `export` that need translation
///
/// Ids appear once, in the order the export first lists them.
pub fn select(export: &Export, options: &SelectOptions) -> Selection {
    let mut seen = HashSet::new();
    let mut selection = Selection::default();

    for asset in &export.assets {
        if !options.accepts_id(&asset.id) {
            continue;
        }
        selection.examined += 1;
        if options.needs_translation(&asset.strings) && seen.insert(asset.id.as_str()) {
            selection.asset_ids.push(asset.id.clone());
        }
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExportedAsset;
    use serde_json::json;

    fn export(value: serde_json::Value) -> Export {
        Export::from_value(value, "export/locale/fr.json").unwrap()
    }

    #[test]
    fn test_selects_empty_strings() {
        let export = export(json!({"greeting": "", "farewell": "Bye %name%"}));
        let selection = select(&export, &SelectOptions::default());
        assert_eq!(selection.asset_ids, vec!["greeting"]);
        assert_eq!(selection.examined, 2);
    }

    #[test]
    fn test_force_selects_everything_in_order() {
        let export = export(json!({"greeting": "", "farewell": "Bye %name%"}));
        let options = SelectOptions {
            force_all: true,
            ..SelectOptions::default()
        };
        assert_eq!(
            select(&export, &options).asset_ids,
            vec!["greeting", "farewell"]
        );
    }

    #[test]
    fn test_plural_with_one_empty_form() {
        let export = export(json!({
            "apples": ["une pomme", ""],
            "pears": ["une poire", "%n% poires"]
        }));
        assert_eq!(
            select(&export, &SelectOptions::default()).asset_ids,
            vec!["apples"]
        );
    }

    #[test]
    fn test_residual_markers_trigger_redo() {
        let export = export(json!({
            "stale": "Bonjour <var>name</var>",
            "stale_syntax": ["<syntax>{0}</syntax> rien", "tout"],
            "clean": "Bonjour %name%"
        }));
        assert_eq!(
            select(&export, &SelectOptions::default()).asset_ids,
            vec!["stale", "stale_syntax"]
        );

        let empty_only = SelectOptions {
            empty_only: true,
            ..SelectOptions::default()
        };
        assert!(select(&export, &empty_only).is_empty());
    }

    #[test]
    fn test_prefix_filter() {
        let export = export(json!({
            "menu.file": "",
            "menu.edit": "",
            "dialog.ok": "",
            "menu": ""
        }));
        let options = SelectOptions {
            prefix: Some("menu.".to_string()),
            force_all: true,
            ..SelectOptions::default()
        };
        let selection = select(&export, &options);
        assert_eq!(selection.asset_ids, vec!["menu.file", "menu.edit"]);
        assert_eq!(selection.examined, 2);
        assert!(selection.asset_ids.iter().all(|id| id.starts_with("menu.")));
    }

    #[test]
    fn test_never_returns_duplicates() {
        // Hosts should not repeat keys, but a hand-built export can
        let export = Export {
            assets: vec![
                ExportedAsset {
                    id: "dup".to_string(),
                    strings: vec!["".to_string(), "".to_string()],
                },
                ExportedAsset {
                    id: "other".to_string(),
                    strings: vec!["".to_string()],
                },
                ExportedAsset {
                    id: "dup".to_string(),
                    strings: vec!["".to_string()],
                },
            ],
            malformed: Vec::new(),
        };
        let options = SelectOptions {
            force_all: true,
            ..SelectOptions::default()
        };
        assert_eq!(select(&export, &options).asset_ids, vec!["dup", "other"]);
    }

    #[test]
    fn test_fuzzy_only_selects_whole_filtered_export() {
        let options = SelectOptions {
            fuzzy_only: true,
            ..SelectOptions::default()
        };
        assert_eq!(
            options.export_resource().to_string(),
            "export/locale/fr.json?no-folding=1&status=fuzzy"
        );
        let export = export(json!({"reviewed": "Bonjour", "other": "Salut"}));
        assert_eq!(select(&export, &options).len(), 2);
    }

    #[test]
    fn test_export_resource_uses_target_locale() {
        let options = SelectOptions {
            target_locale: "pl".to_string(),
            ..SelectOptions::default()
        };
        assert_eq!(options.export_resource(), Resource::export("pl"));
    }
}
