//! CLI entry point for versebook.

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

mod app;
mod app_config;
mod cli;
mod commands;

use app::{AppContext, Settings, terminal};
use cli::{Cli, Command, ConfigCommand, PrefsCommand};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    let loaded_config = app_config::load_default_file_config()?;
    let settings = Settings::resolve(&cli, loaded_config.config.as_ref())?;

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config file > default (info)
    terminal::init_tracing(settings.log_level());

    debug!(?cli, "CLI arguments parsed");

    if let Command::Config {
        command: ConfigCommand::Show,
    } = &cli.command
    {
        commands::run_config_show_command(&settings, &loaded_config);
        return Ok(());
    }

    info!(db = %settings.db_path.display(), "versebook starting");
    let ctx = AppContext::open(settings).await?;
    let result = dispatch(&ctx, cli.command).await;
    ctx.close().await;
    result
}

async fn dispatch(ctx: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::Random { translation, share } => {
            commands::run_random_command(ctx, translation.translation.as_deref(), share).await
        }
        Command::Verse {
            reference,
            translation,
            share,
        } => {
            commands::run_verse_command(ctx, &reference, translation.translation.as_deref(), share)
                .await
        }
        Command::Download { book, translation } => {
            commands::run_download_command(ctx, &book, translation.translation.as_deref()).await
        }
        Command::Books => commands::run_books_command(ctx).await,
        Command::Read { book, translation } => {
            commands::run_read_command(ctx, &book, translation.translation.as_deref()).await
        }
        Command::Delete { book, translation } => {
            commands::run_delete_command(ctx, &book, translation.translation.as_deref()).await
        }
        Command::Favorites => commands::run_favorites_command(ctx).await,
        Command::Favorite {
            reference,
            translation,
        } => {
            commands::run_favorite_command(ctx, &reference, translation.translation.as_deref())
                .await
        }
        Command::Unfavorite { id } => commands::run_unfavorite_command(ctx, &id).await,
        Command::Prefs { command } => match command.unwrap_or(PrefsCommand::Show) {
            PrefsCommand::Show => {
                commands::run_prefs_show_command(ctx);
                Ok(())
            }
            PrefsCommand::Language { language } => {
                commands::run_prefs_language_command(ctx, language).await;
                Ok(())
            }
            PrefsCommand::Version { code } => commands::run_prefs_version_command(ctx, &code).await,
            PrefsCommand::Theme => {
                commands::run_prefs_theme_command(ctx).await;
                Ok(())
            }
        },
        Command::Versions => {
            commands::run_versions_command(ctx);
            Ok(())
        }
        // Handled before the context is opened.
        Command::Config { .. } => Ok(()),
    }
}
