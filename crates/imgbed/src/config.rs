//! Configuration for the imgbed client.
//!
//! Loads configuration from multiple sources with precedence:
//! 1. Bundled defaults (include_str! from imgbed.toml)
//! 2. `~/.config/imgbed/imgbed.toml`
//! 3. `./imgbed.toml`
//! 4. `IMGBED_*` environment variables (`IMGBED_REPOSITORY__TOKEN`, `IMGBED_LISTING__BATCH_SIZE`)

use config::{Config, Environment, File, FileFormat};
use imgbed_core::RepositoryTarget;
use imgbed_error::{ConfigError, ImgbedError, ImgbedResult};
use imgbed_manager::{ImageManager, ListingOptions, UploadOptions};
use imgbed_store::GitHubStore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../imgbed.toml");

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "IMGBED";

/// Complete client configuration.
///
/// # TOML Format
///
/// ```toml
/// [repository]
/// repo = "octocat/images"
/// branch = "main"
/// path = "blog"
/// token = "ghp_..."
/// custom_domain = "https://img.example.com"
///
/// [listing]
/// incremental = true
/// batch_size = 30
/// images_only = true
///
/// [upload]
/// max_concurrent = 4
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct ImgbedConfig {
    /// Repository, branch, root prefix, credential and display domain
    repository: RepositoryTarget,
    /// Listing filter and reveal settings
    listing: ListingOptions,
    /// Batch upload settings
    upload: UploadOptions,
}

impl ImgbedConfig {
    /// Load configuration from a single TOML file.
    ///
    /// Sections and keys missing from the file take their built-in defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> ImgbedResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ImgbedError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ImgbedError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml_str(toml: &str) -> ImgbedResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .map_err(|e| {
                ImgbedError::from(ConfigError::new(format!(
                    "Failed to read configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ImgbedError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled
    /// defaults.
    #[instrument]
    pub fn load() -> ImgbedResult<Self> {
        debug!(
            "Loading configuration with precedence: environment > current dir > home dir > bundled defaults"
        );

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::home_dir().map(|home| home.join(".config/imgbed")) {
            builder =
                builder.add_source(File::from(config_dir.join("imgbed.toml")).required(false));
        }

        builder = builder
            .add_source(File::with_name("imgbed").required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder
            .build()
            .map_err(|e| {
                ImgbedError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ImgbedError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that deserialization cannot express.
    pub fn validate(&self) -> ImgbedResult<()> {
        if *self.listing.batch_size() == 0 {
            return Err(ConfigError::new("listing.batch_size must be at least 1").into());
        }
        Ok(())
    }

    /// Replace the upload concurrency bound.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.upload = UploadOptions::new(max_concurrent);
        self
    }

    /// Build an image manager over the GitHub content API using this configuration.
    ///
    /// The repository target is not validated here; every store operation checks it
    /// before sending anything.
    pub fn manager(&self) -> ImgbedResult<ImageManager<GitHubStore>> {
        let store = GitHubStore::new()?;
        Ok(ImageManager::new(Arc::new(store))
            .with_listing(self.listing.clone())
            .with_upload(self.upload.clone()))
    }
}
