use std::path::PathBuf;

use crate::app::{AppContext, Result};
use crate::digest;
use crate::store::Store;

/// Outcome of one fetch-and-merge pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Entries in the fetched feed.
    pub fetched: usize,
    /// Entries that were new to the archive.
    pub added: usize,
    /// Archive size after the merge.
    pub total: usize,
}

impl UpdateSummary {
    pub fn changed(&self) -> bool {
        self.added > 0
    }
}

/// Fetches the feed and merges it into the archive.
///
/// The archive is only written when something new was added or it took the
/// feed's title; a fetch or parse failure leaves it untouched.
pub async fn update_archive(ctx: &AppContext) -> Result<UpdateSummary> {
    let url = ctx.config.feed_url()?;
    let mut archive = ctx.store.load()?;

    let body = ctx.fetcher.fetch(url).await?;
    let feed = ctx.normalizer.parse_feed(&body)?;
    let fetched = feed.entries.len();

    let before = archive.len();
    let retitled = archive.adopt_title(feed.title.as_deref());
    let changed = archive.merge(feed.entries);

    if changed || retitled {
        ctx.store.save(&archive)?;
    }

    let summary = UpdateSummary {
        fetched,
        added: archive.len() - before,
        total: archive.len(),
    };
    tracing::info!(
        url,
        fetched = summary.fetched,
        added = summary.added,
        total = summary.total,
        "Archive updated"
    );
    Ok(summary)
}

/// Regenerates every document from the persisted archive.
pub fn render_digest(ctx: &AppContext) -> Result<Vec<PathBuf>> {
    let archive = ctx.store.load()?;
    let documents = digest::generate(
        &archive,
        ctx.config.digest.week_offset_hours,
        &ctx.config.digest.user_name,
        &ctx.renderer,
    )?;
    ctx.writer.write(&documents)
}

pub async fn run(ctx: &AppContext) -> Result<()> {
    let summary = update_archive(ctx).await?;
    if summary.changed() {
        println!(
            "Added {} new items ({} total)",
            summary.added, summary.total
        );
    } else {
        println!("No new items ({} total)", summary.total);
    }

    let paths = render_digest(ctx)?;
    println!(
        "Wrote {} documents to {}",
        paths.len(),
        ctx.writer.base_dir().display()
    );
    Ok(())
}
