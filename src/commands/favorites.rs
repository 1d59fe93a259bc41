//! Favorites commands.

use anyhow::{Context, Result, bail};
use versebook_core::FavoriteToggle;
use versebook_core::lookup::lookup_verse;

use super::{report_durability, resolve_book};
use crate::app::AppContext;
use crate::cli::ReferenceArgs;

pub(crate) async fn run_favorites_command(ctx: &AppContext) -> Result<()> {
    let favorites = ctx.favorites.list().await;
    if favorites.is_empty() {
        println!("No favorites yet");
        return Ok(());
    }
    for favorite in favorites {
        println!("[{}]", favorite.id);
        println!("{}", favorite.verse.text);
        println!();
    }
    Ok(())
}

/// Fetches the verse and toggles it in favorites.
pub(crate) async fn run_favorite_command(
    ctx: &AppContext,
    reference: &ReferenceArgs,
    translation: Option<&str>,
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
    .context("Failed to fetch verse")?
    else {
        bail!(
            "{} {}:{} does not exist in {translation}",
            book.localized_name(language),
            reference.chapter,
            reference.verse
        );
    };

    let (toggle, durability) = ctx.favorites.toggle(&verse).await;
    match toggle {
        FavoriteToggle::Added => println!("Added to favorites: {}", verse.favorite_id()),
        FavoriteToggle::Removed => println!("Removed from favorites: {}", verse.favorite_id()),
    }
    report_durability(durability);
    Ok(())
}

pub(crate) async fn run_unfavorite_command(ctx: &AppContext, id: &str) -> Result<()> {
    let Some(durability) = ctx.favorites.remove(id).await else {
        bail!("No favorite with id '{id}'");
    };
    println!("Removed from favorites: {id}");
    report_durability(durability);
    Ok(())
}
