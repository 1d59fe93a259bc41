//! Effective runtime settings: CLI flags layered over the config file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use versebook_core::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_BASE_URL, DEFAULT_REQUEST_DELAY, READ_TIMEOUT_SECS,
};

use crate::app_config::{FileConfig, VerbositySetting, resolve_default_db_path};
use crate::cli::Cli;

/// Settings every command runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) base_url: String,
    pub(crate) db_path: PathBuf,
    pub(crate) request_delay: Duration,
    pub(crate) connect_timeout_secs: u64,
    pub(crate) read_timeout_secs: u64,
    pub(crate) verbose: u8,
    pub(crate) quiet: bool,
}

impl Settings {
    /// Merges CLI flags over file values over built-in defaults.
    pub(crate) fn resolve(cli: &Cli, file_config: Option<&FileConfig>) -> Result<Self> {
        let file = file_config.cloned().unwrap_or_default();
        file.validate()?;

        let (mut verbose, mut quiet) = (cli.verbose, cli.quiet);
        if verbose == 0
            && !quiet
            && let Some(verbosity) = file.verbosity
        {
            (verbose, quiet) = match verbosity {
                VerbositySetting::Default => (0, false),
                VerbositySetting::Verbose => (1, false),
                VerbositySetting::Debug => (2, false),
                VerbositySetting::Quiet => (0, true),
            };
        }

        Ok(Self {
            base_url: cli
                .base_url
                .clone()
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            db_path: cli
                .db
                .clone()
                .or(file.db_path)
                .unwrap_or_else(resolve_default_db_path),
            request_delay: cli
                .request_delay
                .or(file.request_delay_ms)
                .map_or(DEFAULT_REQUEST_DELAY, Duration::from_millis),
            connect_timeout_secs: file.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS),
            read_timeout_secs: file.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS),
            verbose,
            quiet,
        })
    }

    /// Default tracing level. `RUST_LOG` still takes priority.
    pub(crate) fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    pub(crate) fn verbosity_label(&self) -> &'static str {
        if self.quiet {
            VerbositySetting::Quiet.as_str()
        } else {
            match self.verbose {
                0 => VerbositySetting::Default.as_str(),
                1 => VerbositySetting::Verbose.as_str(),
                _ => VerbositySetting::Debug.as_str(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["versebook"];
        argv.extend_from_slice(args);
        argv.push("books");
        Cli::try_parse_from(argv).expect("test args should parse")
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = Settings::resolve(&cli(&["--db", "x.db"]), None).unwrap();
        assert_eq!(settings.base_url, "https://bolls.life");
        assert_eq!(settings.db_path, PathBuf::from("x.db"));
        assert_eq!(settings.request_delay, Duration::from_millis(50));
        assert_eq!(settings.connect_timeout_secs, 10);
        assert_eq!(settings.read_timeout_secs, 30);
        assert_eq!(settings.log_level(), "info");
    }

    #[test]
    fn test_file_values_apply_when_cli_silent() {
        let file = FileConfig {
            base_url: Some("http://mirror.test".to_string()),
            request_delay_ms: Some(0),
            read_timeout_secs: Some(90),
            verbosity: Some(VerbositySetting::Quiet),
            ..FileConfig::default()
        };
        let settings = Settings::resolve(&cli(&[]), Some(&file)).unwrap();
        assert_eq!(settings.base_url, "http://mirror.test");
        assert_eq!(settings.request_delay, Duration::ZERO);
        assert_eq!(settings.read_timeout_secs, 90);
        assert!(settings.quiet);
        assert_eq!(settings.log_level(), "error");
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig {
            base_url: Some("http://mirror.test".to_string()),
            request_delay_ms: Some(500),
            verbosity: Some(VerbositySetting::Quiet),
            ..FileConfig::default()
        };
        let settings = Settings::resolve(
            &cli(&["--base-url", "http://cli.test", "--request-delay", "5", "-v"]),
            Some(&file),
        )
        .unwrap();
        assert_eq!(settings.base_url, "http://cli.test");
        assert_eq!(settings.request_delay, Duration::from_millis(5));
        assert!(!settings.quiet);
        assert_eq!(settings.log_level(), "debug");
        assert_eq!(settings.verbosity_label(), "verbose");
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        let file = FileConfig {
            request_delay_ms: Some(70_000),
            ..FileConfig::default()
        };
        assert!(Settings::resolve(&cli(&[]), Some(&file)).is_err());
    }
}
