//! Verse commands: random verse and lookup by reference.

use anyhow::{Context, Result, bail};
use versebook_core::lookup::{lookup_verse, random_verse};

use super::{render_verse, resolve_book};
use crate::app::AppContext;
use crate::cli::ReferenceArgs;

pub(crate) async fn run_random_command(
    ctx: &AppContext,
    translation: Option<&str>,
    share: bool,
) -> Result<()> {
    let language = ctx.preferences.language();
    let translation =
        translation.map_or_else(|| ctx.preferences.selected_version(), str::to_string);

    let verse = random_verse(ctx.source.as_ref(), language, &translation)
        .await
        .context("Failed to fetch a random verse")?;
    let favorite = ctx.favorites.is_favorite(&verse).await;
    println!("{}", render_verse(&verse, favorite, share));
    Ok(())
}

pub(crate) async fn run_verse_command(
    ctx: &AppContext,
    reference: &ReferenceArgs,
    translation: Option<&str>,
    share: bool,
) -> Result<()> {
    let book = resolve_book(&reference.book)?;
    let language = ctx.preferences.language();
    let translation =
        translation.map_or_else(|| ctx.preferences.selected_version(), str::to_string);

    let Some(verse) = lookup_verse(
        ctx.source.as_ref(),
        language,
        &translation,
        book.numeric_id,
        reference.chapter,
        reference.verse,
    )
    .await
    .with_context(|| {
        format!(
            "Failed to fetch {} {}:{}",
            book.name, reference.chapter, reference.verse
        )
    })?
    else {
        bail!(
            "{} {}:{} does not exist in {translation}",
            book.localized_name(language),
            reference.chapter,
            reference.verse
        );
    };

    let favorite = ctx.favorites.is_favorite(&verse).await;
    println!("{}", render_verse(&verse, favorite, share));
    Ok(())
}
