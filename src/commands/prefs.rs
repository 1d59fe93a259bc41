//! Preference commands and the translation list.

use anyhow::{Result, bail};
use versebook_core::{Language, available_versions};

use super::report_durability;
use crate::app::AppContext;

pub(crate) fn run_prefs_show_command(ctx: &AppContext) {
    let prefs = ctx.preferences.snapshot();
    println!("language = {}", prefs.language);
    println!("version_en = {}", prefs.versions.en);
    println!("version_es = {}", prefs.versions.es);
    println!("theme = {}", prefs.theme);
}

pub(crate) async fn run_prefs_language_command(ctx: &AppContext, language: Language) {
    let durability = ctx.preferences.change_language(language).await;
    println!(
        "Language set to {language} (version {})",
        ctx.preferences.selected_version()
    );
    report_durability(durability);
}

/// Selects `code` for the current language. Only codes offered for that language are accepted.
pub(crate) async fn run_prefs_version_command(ctx: &AppContext, code: &str) -> Result<()> {
    let language = ctx.preferences.language();
    let versions = available_versions(language);
    let Some(version) = versions
        .iter()
        .find(|version| version.code.eq_ignore_ascii_case(code))
    else {
        let offered: Vec<_> = versions.iter().map(|version| version.code).collect();
        bail!(
            "Version '{code}' is not offered for language {language}. Choose one of: {}",
            offered.join(", ")
        );
    };

    let durability = ctx.preferences.change_version(version.code).await;
    println!("Version for {language} set to {} ({})", version.code, version.name);
    report_durability(durability);
    Ok(())
}

pub(crate) async fn run_prefs_theme_command(ctx: &AppContext) {
    let (theme, durability) = ctx.preferences.cycle_theme().await;
    println!("Theme set to {theme}");
    report_durability(durability);
}

/// Prints the translations per language, marking the selected ones.
pub(crate) fn run_versions_command(ctx: &AppContext) {
    for language in Language::ALL {
        let current = ctx.preferences.version_for(language);
        println!("[{language}]");
        for version in available_versions(language) {
            let marker = if current == version.code {
                "*"
            } else {
                " "
            };
            println!("{marker} {:<7} {}", version.code, version.name);
        }
    }
}
