//! Command-line interface

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::config::SyncOptions;
use crate::error::SyncResult;
use crate::plural::PluralTable;
use crate::select::SelectOptions;

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub options: SyncOptions,
    pub plurals: PluralTable,
    pub verbose: bool,
}

pub fn build_command() -> Command {
    Command::new("loco-translate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Machine-translate missing Loco strings with DeepL")
        .arg(
            Arg::new("from")
                .long("from")
                .help("Source locale")
                .default_value("en"),
        )
        .arg(
            Arg::new("to")
                .long("to")
                .help("Target locale")
                .default_value("fr"),
        )
        .arg(
            Arg::new("no-fuzzy")
                .long("no-fuzzy")
                .help("Do not flag machine translations as fuzzy")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("force")
                .long("force")
                .short('f')
                .help("Retranslate every asset, including translated ones")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .help("Only handle asset ids starting with this prefix"),
        )
        .arg(
            Arg::new("empty-only")
                .long("empty-only")
                .help("Only translate empty strings, ignore leftovers of interrupted runs")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("fuzzy-only")
                .long("fuzzy-only")
                .help("Only retranslate entries flagged fuzzy in the target locale")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Report what would be translated without translating or writing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("plural-slots")
                .long("plural-slots")
                .value_name("LOCALE=COUNT")
                .help("Plural forms required for a locale (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("cldr-plurals")
                .long("cldr-plurals")
                .help("Derive plural counts from CLDR for locales without an explicit count")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show every string as it is translated")
                .action(ArgAction::SetTrue),
        )
}

impl CliArgs {
    pub fn from_matches(matches: &ArgMatches) -> SyncResult<Self> {
        let string = |id: &str| matches.get_one::<String>(id).cloned().unwrap_or_default();

        let selection = SelectOptions {
            source_locale: string("from"),
            target_locale: string("to"),
            force_all: matches.get_flag("force"),
            prefix: matches
                .get_one::<String>("prefix")
                .filter(|p| !p.is_empty())
                .cloned(),
            empty_only: matches.get_flag("empty-only"),
            fuzzy_only: matches.get_flag("fuzzy-only"),
        };

        let overrides: Vec<String> = matches
            .get_many::<String>("plural-slots")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let plurals = PluralTable::default()
            .with_overrides(overrides)?
            .with_cldr(matches.get_flag("cldr-plurals"));

        Ok(CliArgs {
            options: SyncOptions {
                selection,
                no_fuzzy: matches.get_flag("no-fuzzy"),
                dry_run: matches.get_flag("dry-run"),
            },
            plurals,
            verbose: matches.get_flag("verbose"),
        })
    }
}
