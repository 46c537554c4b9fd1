//! imgbed CLI binary.
//!
//! This binary provides command-line access to a repository used as an image host:
//! - List, search and page through stored images
//! - Upload files in parallel
//! - Rename, delete and download images by URL or path

use clap::Parser;
use imgbed::{ImgbedConfig, init_tracing};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, handle_delete, handle_download, handle_list, handle_rename,
        handle_resolve, handle_upload,
    };

    // Parse command-line arguments
    let cli = Cli::parse();

    // Pick up IMGBED_* overrides from a .env file
    dotenvy::dotenv().ok();

    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => ImgbedConfig::from_file(path)?,
        None => ImgbedConfig::load()?,
    };

    // Execute the requested command
    match cli.command {
        Commands::List {
            page,
            all,
            sort,
            search,
            format,
        } => {
            handle_list(&config, page, all, sort, search.as_deref(), format).await?;
        }

        Commands::Upload {
            files,
            max_concurrent,
        } => {
            handle_upload(config, files, max_concurrent).await?;
        }

        Commands::Rename { image, new_name } => {
            handle_rename(&config, &image, &new_name).await?;
        }

        Commands::Delete { image } => {
            handle_delete(&config, &image).await?;
        }

        Commands::Download { image, output } => {
            handle_download(&config, &image, output).await?;
        }

        Commands::Resolve { url } => {
            handle_resolve(&config, &url)?;
        }
    }

    Ok(())
}
