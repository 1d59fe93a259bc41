//! Downloaded book commands: download, list, read, delete.

use anyhow::{Context, Result, bail};
use tokio::sync::mpsc;
use versebook_core::{
    BookCatalogEntry, DownloadEvent, DownloadOutcome, DownloadRequest, DownloadedBook,
};

use super::{report_durability, resolve_book};
use crate::app::{AppContext, terminal};

pub(crate) async fn run_download_command(
    ctx: &AppContext,
    book: &str,
    translation: Option<&str>,
) -> Result<()> {
    let entry = resolve_book(book)?;
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let bar = terminal::download_progress_bar(ctx.settings.quiet);

    let ui = {
        let bar = bar.clone();
        tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                match event {
                    DownloadEvent::Started { key, chapters } => {
                        bar.set_message(format!("{key}: {chapters} chapters"));
                    }
                    DownloadEvent::ChapterCompleted { chapter, progress } => {
                        bar.set_position(u64::from(progress));
                        bar.set_message(format!("chapter {chapter}"));
                    }
                    DownloadEvent::Completed { .. } | DownloadEvent::Failed { .. } => {
                        bar.finish_and_clear();
                    }
                }
            }
        })
    };

    let mut request = DownloadRequest::new(entry).events(events_tx);
    if let Some(translation) = translation {
        request = request.translation(translation);
    }
    let result = ctx.engine.download_book(request).await;
    let _ = ui.await;
    bar.finish_and_clear();

    match result.with_context(|| format!("Failed to download {}", entry.name))? {
        DownloadOutcome::Completed {
            key,
            verse_count,
            durability,
        } => {
            println!("Downloaded {key}: {verse_count} verses");
            report_durability(durability);
        }
        DownloadOutcome::AlreadyInProgress { key } => {
            println!("{key} is already downloading");
        }
        DownloadOutcome::AlreadyDownloaded { key } => {
            println!("{key} is already downloaded");
        }
    }
    Ok(())
}

pub(crate) async fn run_books_command(ctx: &AppContext) -> Result<()> {
    let books = ctx.library.completed().await;
    if books.is_empty() {
        println!("No downloaded books");
        return Ok(());
    }
    for book in books {
        println!(
            "{} ({}) - {} verses",
            book.book_name,
            book.translation,
            book.verses.len()
        );
    }
    Ok(())
}

pub(crate) async fn run_read_command(
    ctx: &AppContext,
    book: &str,
    translation: Option<&str>,
) -> Result<()> {
    let entry = resolve_book(book)?;
    let Some(book) = find_downloaded_book(ctx, entry, translation).await else {
        let key = ctx.engine.key_for(entry, translation);
        bail!("{key} is not downloaded. Run `versebook download {}` first", entry.name);
    };
    let key = book.key();

    if book.verses.is_empty() {
        println!("{key} has no verses");
    }
    for verse in &book.verses {
        println!("{}  {}", verse.reference, verse.text);
    }
    Ok(())
}

pub(crate) async fn run_delete_command(
    ctx: &AppContext,
    book: &str,
    translation: Option<&str>,
) -> Result<()> {
    let entry = resolve_book(book)?;
    let key = match ctx.engine.find_downloaded(entry, translation).await {
        Some(key) => key,
        None => bail!("{} is not downloaded", ctx.engine.key_for(entry, translation)),
    };
    let durability = ctx
        .engine
        .delete_book(&key)
        .await
        .with_context(|| format!("{key} is not downloaded"))?;
    println!("Deleted {key}");
    report_durability(durability);
    Ok(())
}

async fn find_downloaded_book(
    ctx: &AppContext,
    entry: &BookCatalogEntry,
    translation: Option<&str>,
) -> Option<DownloadedBook> {
    let key = ctx.engine.find_downloaded(entry, translation).await?;
    ctx.library.find_complete(&key).await
}
