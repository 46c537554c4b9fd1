//! Listing command handler.

use super::commands::OutputFormat;
use imgbed::{
    CatalogStats, ImgbedConfig, ListingCursor, SortMode, StoredObject, search_objects,
    sort_objects,
};
use tracing::{debug, instrument};

/// List images, one revealed batch per page.
#[instrument(skip(config, search))]
pub async fn handle_list(
    config: &ImgbedConfig,
    page: usize,
    all: bool,
    sort: Option<SortMode>,
    search: Option<&str>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let manager = config.manager()?;
    let target = config.repository();

    let mut objects = manager.list_images(target).await?;
    if let Some(term) = search {
        objects = search_objects(&objects, term).into_iter().cloned().collect();
    }
    if let Some(mode) = sort {
        sort_objects(&mut objects, mode);
    }

    let stats = CatalogStats::of(&objects);
    let mut cursor = manager.cursor(objects);
    let shown = select_page(&mut cursor, page, all);
    debug!(
        shown = shown.len(),
        revealed = cursor.revealed_count(),
        total = cursor.total(),
        "Selected listing page"
    );

    match format {
        OutputFormat::Human => {
            if shown.is_empty() {
                println!("{}", empty_page_message(&cursor, page));
                return Ok(());
            }
            for object in &shown {
                println!("{:<40} {}", object.path(), object.display_url());
            }
            println!("\n{}", stats_line(&stats));
            if !cursor.is_exhausted() {
                println!(
                    "Showing {} of {} images. Next page: --page {}",
                    cursor.revealed_count(),
                    cursor.total(),
                    page.max(1) + 1
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
        OutputFormat::Markdown => {
            for object in &shown {
                println!("{}", object.markdown());
            }
        }
    }

    Ok(())
}

/// Reveals up to `page` batches and returns batch number `page`, or everything for `all`.
///
/// A cursor that starts with entries revealed (incremental reveal disabled) is shown
/// whole.
fn select_page(cursor: &mut ListingCursor, page: usize, all: bool) -> Vec<StoredObject> {
    if all {
        while !cursor.is_exhausted() {
            cursor.reveal_next();
        }
        return cursor.revealed().to_vec();
    }
    if cursor.revealed_count() > 0 {
        return cursor.revealed().to_vec();
    }

    let page = page.max(1);
    for current in 1..=page {
        let (revealed, exhausted) = cursor.reveal_next();
        if current == page {
            return revealed.to_vec();
        }
        if exhausted {
            break;
        }
    }
    Vec::new()
}

/// Explains an empty page: nothing listed, or a page past the end.
fn empty_page_message(cursor: &ListingCursor, page: usize) -> String {
    match cursor.total() {
        0 => "No images found.".to_string(),
        total => format!(
            "Page {} is past the end: {} images on {} pages.",
            page.max(1),
            total,
            total.div_ceil(cursor.batch_size())
        ),
    }
}

/// Image count and latest listing time.
fn stats_line(stats: &CatalogStats) -> String {
    match stats.latest() {
        Some(latest) => format!(
            "{} images, latest {}",
            stats.count(),
            latest.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => format!("{} images", stats.count()),
    }
}
