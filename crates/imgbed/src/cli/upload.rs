//! Batch upload command handler.

use imgbed::{ImgbedConfig, UploadOutcome, UploadProgress};
use std::path::PathBuf;
use tracing::instrument;

/// Upload files in parallel, printing progress as each finishes.
#[instrument(skip(config, files), fields(files = files.len()))]
pub async fn handle_upload(
    config: ImgbedConfig,
    files: Vec<PathBuf>,
    max_concurrent: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match max_concurrent {
        Some(n) => config.with_max_concurrent(n),
        None => config,
    };
    let manager = config.manager()?;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<UploadProgress>();
    let printer = tokio::spawn(async move {
        while let Some(progress) = rx.recv().await {
            eprintln!(
                "[{}/{}] {:.2} files/s",
                progress.completed, progress.total, progress.throughput_per_second
            );
        }
    });

    let report = manager
        .upload_batch(config.repository(), files, Some(tx))
        .await;
    printer.await?;

    for task in report.tasks() {
        match task.outcome() {
            UploadOutcome::Succeeded(object) => {
                println!("✓ {} -> {}", task.source().display(), object.display_url());
            }
            UploadOutcome::Failed(e) => {
                println!("✗ {}: {}", task.source().display(), e.kind());
            }
            UploadOutcome::Pending => {}
        }
    }

    let failed = report.failed().len();
    println!(
        "\n{} uploaded, {} failed in {:.1}s ({:.2} files/s)",
        report.tasks().len() - failed,
        failed,
        report.elapsed().as_secs_f64(),
        report.throughput_per_second()
    );

    if failed > 0 {
        return Err(format!("{} of {} uploads failed", failed, report.tasks().len()).into());
    }
    Ok(())
}
