//! Rename, delete, download and resolve command handlers.

use imgbed::{ImgbedConfig, RenameOutcome, resolve_path, to_display_url};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Rename an image addressed by URL or path.
#[instrument(skip(config))]
pub async fn handle_rename(
    config: &ImgbedConfig,
    image: &str,
    new_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let manager = config.manager()?;
    let target = config.repository();
    let object = manager.locate(target, image)?;

    match manager.rename_image(target, &object, new_name).await {
        RenameOutcome::Done(renamed) => {
            println!("Renamed {} -> {}", object.path(), renamed.path());
            println!("{}", renamed.display_url());
            Ok(())
        }
        RenameOutcome::OrphanWarning {
            object: renamed,
            orphan_path,
            error,
        } => {
            warn!(orphan = %orphan_path, "Rename left the old image behind");
            println!("Created {}", renamed.display_url());
            println!(
                "Warning: could not delete the old image {} ({}). Delete it manually.",
                orphan_path,
                error.kind()
            );
            Ok(())
        }
        RenameOutcome::Failed(failure) => {
            Err(format!("Rename of {} failed: {}", object.path(), failure).into())
        }
    }
}

/// Delete an image addressed by URL or path.
#[instrument(skip(config))]
pub async fn handle_delete(
    config: &ImgbedConfig,
    image: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let manager = config.manager()?;
    let target = config.repository();
    let object = manager.locate(target, image)?;

    manager.delete_image(target, &object).await?;
    println!("Deleted {}", object.path());
    Ok(())
}

/// Download an image addressed by URL or path.
#[instrument(skip(config))]
pub async fn handle_download(
    config: &ImgbedConfig,
    image: &str,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let manager = config.manager()?;
    let target = config.repository();
    let object = manager.locate(target, image)?;

    let bytes = manager.download_image(target, &object).await?;
    let output = output.unwrap_or_else(|| PathBuf::from(object.name()));
    tokio::fs::write(&output, &bytes).await?;

    info!(path = %output.display(), size = bytes.len(), "Saved image");
    println!("Saved {} bytes to {}", bytes.len(), output.display());
    Ok(())
}

/// Print the canonical path and display URL for a URL.
#[instrument(skip(config))]
pub fn handle_resolve(config: &ImgbedConfig, url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let target = config.repository();
    let path = resolve_path(url, target)?;

    println!("path: {}", path);
    println!("url:  {}", to_display_url(&path, target));
    Ok(())
}
