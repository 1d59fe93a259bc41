//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use versebook_core::Language;

/// Read scripture verses, keep favorites, and download books for offline reading.
///
/// Verses come from the bolls.life verse service. Preferences, favorites and
/// downloaded books are kept in a local SQLite database.
#[derive(Parser, Debug)]
#[command(name = "versebook")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Database file (default: $XDG_DATA_HOME/versebook/versebook.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Verse service base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Minimum delay between verse requests in milliseconds (0 to disable, max 60000)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub request_delay: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a random verse
    Random {
        #[command(flatten)]
        translation: TranslationArg,
        /// Print the verse formatted for sharing
        #[arg(long)]
        share: bool,
    },
    /// Show one verse
    Verse {
        #[command(flatten)]
        reference: ReferenceArgs,
        #[command(flatten)]
        translation: TranslationArg,
        /// Print the verse formatted for sharing
        #[arg(long)]
        share: bool,
    },
    /// Download a whole book for offline reading
    Download {
        /// Book name (English or Spanish) or number (1-66)
        book: String,
        #[command(flatten)]
        translation: TranslationArg,
    },
    /// List downloaded books
    Books,
    /// Print a downloaded book
    Read {
        /// Book name (English or Spanish) or number (1-66)
        book: String,
        #[command(flatten)]
        translation: TranslationArg,
    },
    /// Delete a downloaded book
    Delete {
        /// Book name (English or Spanish) or number (1-66)
        book: String,
        #[command(flatten)]
        translation: TranslationArg,
    },
    /// List favorite verses
    Favorites,
    /// Toggle a verse in favorites
    Favorite {
        #[command(flatten)]
        reference: ReferenceArgs,
        #[command(flatten)]
        translation: TranslationArg,
    },
    /// Remove a favorite by id (as printed by `favorites`)
    Unfavorite {
        /// Favorite id, e.g. "John 3:16-KJV"
        id: String,
    },
    /// Show or change preferences
    Prefs {
        #[command(subcommand)]
        command: Option<PrefsCommand>,
    },
    /// List translations available for each language
    Versions,
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Verse coordinates.
#[derive(Args, Debug, Clone)]
pub struct ReferenceArgs {
    /// Book name (English or Spanish) or number (1-66)
    pub book: String,
    /// Chapter number
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub chapter: u32,
    /// Verse number
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub verse: u32,
}

/// Translation override shared by verse and book commands.
#[derive(Args, Debug, Clone, Default)]
pub struct TranslationArg {
    /// Translation code (default: the version selected for the current language)
    #[arg(short, long = "translation")]
    pub translation: Option<String>,
}

/// `prefs` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum PrefsCommand {
    /// Show current preferences
    Show,
    /// Set the interface language
    Language {
        #[arg(value_parser = parse_language)]
        language: Language,
    },
    /// Select the translation for the current language
    Version {
        /// Translation code, e.g. KJV
        code: String,
    },
    /// Switch between light and dark theme
    Theme,
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
}

fn parse_language(value: &str) -> Result<Language, String> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_random_with_defaults() {
        let cli = Cli::try_parse_from(["versebook", "random"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(cli.request_delay.is_none());
        assert!(matches!(
            cli.command,
            Command::Random { translation: TranslationArg { translation: None }, share: false }
        ));
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let cli = Cli::try_parse_from(["versebook", "-v", "books"]).unwrap();
        assert_eq!(cli.verbose, 1);

        let cli = Cli::try_parse_from(["versebook", "books", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let cli = Cli::try_parse_from(["versebook", "--quiet", "favorites"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Cli::try_parse_from(["versebook", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Cli::try_parse_from(["versebook", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["versebook"]).is_err());
    }

    #[test]
    fn test_cli_verse_reference_and_translation() {
        let cli =
            Cli::try_parse_from(["versebook", "verse", "John", "3", "16", "-t", "KJV", "--share"])
                .unwrap();
        let Command::Verse {
            reference,
            translation,
            share,
        } = cli.command
        else {
            panic!("expected verse command");
        };
        assert_eq!(reference.book, "John");
        assert_eq!(reference.chapter, 3);
        assert_eq!(reference.verse, 16);
        assert_eq!(translation.translation.as_deref(), Some("KJV"));
        assert!(share);
    }

    #[test]
    fn test_cli_verse_zero_chapter_rejected() {
        let err = Cli::try_parse_from(["versebook", "verse", "John", "0", "1"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_download_with_global_options() {
        let cli = Cli::try_parse_from([
            "versebook",
            "download",
            "Ruth",
            "--translation",
            "WEB",
            "--request-delay",
            "0",
            "--base-url",
            "http://localhost:9000",
            "--db",
            "/tmp/test.db",
        ])
        .unwrap();
        assert_eq!(cli.request_delay, Some(0));
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/test.db")));
        assert!(matches!(cli.command, Command::Download { ref book, .. } if book == "Ruth"));
    }

    #[test]
    fn test_cli_request_delay_over_max_rejected() {
        let err = Cli::try_parse_from(["versebook", "--request-delay", "60001", "books"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_prefs_language_parses() {
        let cli = Cli::try_parse_from(["versebook", "prefs", "language", "es"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Prefs {
                command: Some(PrefsCommand::Language {
                    language: Language::Es
                })
            }
        ));
    }

    #[test]
    fn test_cli_prefs_language_rejects_unknown() {
        let err = Cli::try_parse_from(["versebook", "prefs", "language", "fr"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_prefs_without_subcommand_is_show() {
        let cli = Cli::try_parse_from(["versebook", "prefs"]).unwrap();
        assert!(matches!(cli.command, Command::Prefs { command: None }));
    }

    #[test]
    fn test_cli_config_show() {
        let cli = Cli::try_parse_from(["versebook", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config {
                command: ConfigCommand::Show
            }
        ));
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Cli::try_parse_from(["versebook", "books", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
