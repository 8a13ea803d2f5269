use crate::app::{AppContext, Result};
use crate::notify::{NotificationSink, ReleaseNote};
use crate::reconcile::{acknowledge, reconcile};
use crate::store::Store;

/// Scan every configured work, reconcile against the store, and push each
/// unseen chapter through the sink. Per-work failures are reported and
/// skipped.
pub async fn scan(ctx: &AppContext, sink: &dyn NotificationSink) -> Result<usize> {
    let library = ctx.config.library_entries();

    if library.is_empty() {
        println!("No works configured; add entries to the [library] section");
        return Ok(0);
    }

    println!("Scanning {} works...", library.len());

    let results = ctx.orchestrator.scrape_all(&library).await;

    let mut unseen_total = 0;
    let mut errors = 0;

    for (title, result) in results {
        match result {
            Ok(artifact) => {
                let unseen = reconcile(ctx.store.as_ref(), &artifact)?;
                for chapter in &unseen {
                    if let Some(note) = ReleaseNote::from_chapter(chapter) {
                        sink.notify(&note)?;
                        unseen_total += 1;
                    }
                }
            }
            Err(e) => {
                errors += 1;
                eprintln!("  Error scanning {}: {}", title, e);
            }
        }
    }

    if unseen_total == 0 {
        println!("No new chapters");
    }
    println!(
        "Scan complete: {} unseen chapters, {} errors",
        unseen_total, errors
    );

    Ok(unseen_total)
}

pub fn ack(ctx: &AppContext, id: i64) -> Result<()> {
    match acknowledge(ctx.store.as_ref(), id)? {
        Some(chapter) => println!("Marked as read: {}", chapter.label()),
        None => println!("No stored chapter has id {}", id),
    }
    Ok(())
}

pub fn list_works(ctx: &AppContext) -> Result<()> {
    let collections = ctx.store.list_collection_names()?;

    if collections.is_empty() {
        println!("Nothing stored yet; run `shinkan scan` first");
        return Ok(());
    }

    for collection in collections {
        let unread = ctx.store.unread_count(&collection)?;
        println!("{} ({} unread)", collection, unread);
    }

    Ok(())
}

pub fn list_chapters(ctx: &AppContext) -> Result<()> {
    let collections = ctx.store.list_collection_names()?;

    if collections.is_empty() {
        println!("Nothing stored yet; run `shinkan scan` first");
        return Ok(());
    }

    for collection in collections {
        for chapter in ctx.store.find_all(&collection)? {
            let marker = if chapter.is_read { " " } else { "●" };
            println!(
                "{} {} {}",
                marker,
                chapter.release_date.format("%Y-%m-%d"),
                chapter.label()
            );
        }
    }

    Ok(())
}

/// First-run backfill. Scrapes the whole library, persists everything, then
/// acknowledges all but the newest chapter of each work so only genuinely
/// new releases surface on later scans.
pub async fn seed(ctx: &AppContext) -> Result<()> {
    let library = ctx.config.library_entries();

    if library.is_empty() {
        println!("No works configured; add entries to the [library] section");
        return Ok(());
    }

    let results = ctx.orchestrator.scrape_all(&library).await;

    for (title, result) in results {
        match result {
            Ok(artifact) => {
                let unseen = reconcile(ctx.store.as_ref(), &artifact)?;
                let mut backfilled = 0;
                for chapter in unseen.iter().skip(1) {
                    if let Some(id) = chapter.id {
                        acknowledge(ctx.store.as_ref(), id)?;
                        backfilled += 1;
                    }
                }
                tracing::info!(work = %title, backfilled, "seeded");
                println!("{}: kept newest, marked {} chapters read", title, backfilled);
            }
            Err(e) => {
                eprintln!("  Error seeding {}: {}", title, e);
            }
        }
    }

    Ok(())
}
