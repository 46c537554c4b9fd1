//! GitHub content API implementation of [`ImageStore`].

use crate::dto::{
    ApiErrorBody, ContentEntry, DeleteContentBody, FileRecord, PutContentBody, PutContentResponse,
};
use crate::{
    ContentMethod, ContentRequest, ContentResponse, ContentTransport, ImageStore, ObjectMetadata,
    ReqwestTransport,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use imgbed_core::{RepositoryTarget, StoredObject, file_name, join_path, resolve_path};
use imgbed_error::{StoreError, StoreErrorKind, StoreResult};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

/// Default API root.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Image store backed by the GitHub repository contents API.
///
/// Maps each operation onto one HTTP exchange (a second one for reading files too large to
/// be inlined) and classifies failures:
///
/// | Response                 | Error                 |
/// |--------------------------|-----------------------|
/// | no response              | `RemoteUnavailable`   |
/// | 404 on read/delete       | `NotFound`            |
/// | other 4xx                | `RemoteRejected`      |
/// | 5xx, non-200 listing     | `RemoteUnavailable`   |
/// | unparseable 2xx body     | `UnexpectedShape`     |
#[derive(Debug, Clone)]
pub struct GitHubStore<T = ReqwestTransport> {
    transport: T,
    api_base: String,
}

impl GitHubStore<ReqwestTransport> {
    /// Creates a store talking to api.github.com over reqwest.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> StoreResult<Self> {
        Ok(Self::with_transport(ReqwestTransport::new()?))
    }
}

impl<T: ContentTransport> GitHubStore<T> {
    /// Creates a store over an arbitrary transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            api_base: GITHUB_API_BASE.to_string(),
        }
    }

    /// Points the store at a different API root (GitHub Enterprise, test servers).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Contents endpoint for `path` (the repository root when empty).
    fn contents_url(&self, target: &RepositoryTarget, path: &str) -> StoreResult<String> {
        let (owner, repo) = target.owner_and_repo().ok_or_else(|| {
            StoreError::new(StoreErrorKind::MisconfiguredTarget(format!(
                "repository must be given as owner/repo, got '{}'",
                target.repo()
            )))
        })?;

        let path = path.trim_matches('/');
        let mut url = format!("{}/repos/{}/{}/contents", self.api_base, owner, repo);
        if !path.is_empty() {
            url.push('/');
            url.push_str(
                &path
                    .split('/')
                    .map(|segment| urlencoding::encode(segment).into_owned())
                    .collect::<Vec<_>>()
                    .join("/"),
            );
        }
        Ok(url)
    }

    /// Builds the stored object for a listing entry.
    ///
    /// The entry's `path` is canonical; older responses without it fall back to resolving
    /// the download URL, then to the root prefix plus the entry name.
    fn object_from_entry(
        &self,
        target: &RepositoryTarget,
        entry: ContentEntry,
    ) -> StoreResult<StoredObject> {
        let path = match (entry.path, entry.download_url, entry.name) {
            (Some(path), _, _) => path,
            (None, Some(url), _) => resolve_path(&url, target)?,
            (None, None, Some(name)) => join_path(target.root_path(), &name),
            (None, None, None) => {
                return Err(StoreError::new(StoreErrorKind::UnexpectedShape(
                    "listing entry has neither path, download_url nor name".to_string(),
                )));
            }
        };
        Ok(StoredObject::new(path, entry.sha, target))
    }

    /// Reads the bytes of a file through the raw media type.
    async fn fetch_raw(&self, target: &RepositoryTarget, path: &str) -> StoreResult<Vec<u8>> {
        let request = ContentRequest::new(
            ContentMethod::Get,
            self.contents_url(target, path)?,
            target.token(),
        )
        .with_query("ref", target.branch())
        .raw();

        let response = self.transport.send(request).await?;
        match response.status {
            200 => Ok(response.body),
            404 => Err(StoreError::new(StoreErrorKind::NotFound(path.to_string()))),
            _ => Err(classify_failure(&response)),
        }
    }
}

#[async_trait]
impl<T: ContentTransport> ImageStore for GitHubStore<T> {
    #[instrument(skip(self, target, bytes), fields(repo = %target.repo(), size = bytes.len(), overwrite = overwrite_hash.is_some()))]
    async fn put_object(
        &self,
        target: &RepositoryTarget,
        path: &str,
        bytes: &[u8],
        overwrite_hash: Option<&str>,
    ) -> StoreResult<StoredObject> {
        target.ensure_remote_ready()?;

        let name = file_name(path);
        let verb = if overwrite_hash.is_some() { "update" } else { "upload" };
        let body = PutContentBody {
            message: format!("{} {}", verb, name),
            content: BASE64.encode(bytes),
            branch: target.branch(),
            sha: overwrite_hash,
        };
        let request = ContentRequest::new(
            ContentMethod::Put,
            self.contents_url(target, path)?,
            target.token(),
        )
        .with_body(to_json(&body)?);

        debug!("Sending create-or-update request");
        let response = self.transport.send(request).await?;

        if !matches!(response.status, 200 | 201) {
            let err = classify_failure(&response);
            error!(status = response.status, error = %err, "Upload rejected");
            return Err(err);
        }

        let parsed: PutContentResponse = parse_body(&response)?;
        let stored_path = parsed.content.path.unwrap_or_else(|| path.trim_matches('/').to_string());
        info!(path = %stored_path, "Uploaded object");
        Ok(StoredObject::new(stored_path, parsed.content.sha, target))
    }

    #[instrument(skip(self, target), fields(repo = %target.repo(), root = %target.root_path()))]
    async fn list(&self, target: &RepositoryTarget) -> StoreResult<Vec<StoredObject>> {
        target.ensure_remote_ready()?;

        let request = ContentRequest::new(
            ContentMethod::Get,
            self.contents_url(target, target.root_path())?,
            target.token(),
        )
        .with_query("ref", target.branch());

        let response = self.transport.send(request).await?;
        if response.status != 200 {
            let message = store_message(&response);
            error!(status = response.status, message = %message, "Listing failed");
            return Err(StoreError::new(StoreErrorKind::RemoteUnavailable {
                status: Some(response.status),
                message,
            }));
        }

        let value: serde_json::Value = parse_body(&response)?;
        if !value.is_array() {
            return Err(StoreError::new(StoreErrorKind::UnexpectedShape(
                "expected a directory listing (JSON array)".to_string(),
            )));
        }
        let entries: Vec<ContentEntry> = serde_json::from_value(value).map_err(|e| {
            StoreError::new(StoreErrorKind::UnexpectedShape(format!(
                "malformed listing entry: {}",
                e
            )))
        })?;

        let total = entries.len();
        let objects = entries
            .into_iter()
            .filter(ContentEntry::is_file)
            .map(|entry| self.object_from_entry(target, entry))
            .collect::<StoreResult<Vec<_>>>()?;

        debug!(total, files = objects.len(), "Listed directory");
        Ok(objects)
    }

    #[instrument(skip(self, target), fields(repo = %target.repo()))]
    async fn fetch_metadata(
        &self,
        target: &RepositoryTarget,
        path: &str,
    ) -> StoreResult<ObjectMetadata> {
        target.ensure_remote_ready()?;

        let request = ContentRequest::new(
            ContentMethod::Get,
            self.contents_url(target, path)?,
            target.token(),
        )
        .with_query("ref", target.branch());

        let response = self.transport.send(request).await?;
        match response.status {
            200 => {}
            404 => {
                warn!("Object vanished before it could be read");
                return Err(StoreError::new(StoreErrorKind::NotFound(path.to_string())));
            }
            _ => return Err(classify_failure(&response)),
        }

        let value: serde_json::Value = parse_body(&response)?;
        if value.is_array() {
            return Err(StoreError::new(StoreErrorKind::UnexpectedShape(format!(
                "{} is a directory",
                path
            ))));
        }
        let record: FileRecord = serde_json::from_value(value).map_err(|e| {
            StoreError::new(StoreErrorKind::UnexpectedShape(format!(
                "malformed file record: {}",
                e
            )))
        })?;

        let bytes = match (record.encoding.as_deref(), record.content.as_deref()) {
            (Some("base64"), Some(content)) if !content.trim().is_empty() => {
                // The API wraps base64 content at fixed line widths.
                let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
                BASE64.decode(compact).map_err(|e| {
                    StoreError::new(StoreErrorKind::UnexpectedShape(format!(
                        "content is not valid base64: {}",
                        e
                    )))
                })?
            }
            // Files over 1 MB come back without inline content.
            (Some("base64") | Some("none") | None, _) => {
                debug!("Content not inlined, fetching raw bytes");
                self.fetch_raw(target, path).await?
            }
            (Some(encoding), _) => {
                return Err(StoreError::new(StoreErrorKind::UnexpectedShape(format!(
                    "unsupported content encoding: {}",
                    encoding
                ))));
            }
        };

        debug!(size = bytes.len(), "Fetched object metadata");
        Ok(ObjectMetadata::new(path, record.sha, bytes))
    }

    #[instrument(skip(self, target, content_hash), fields(repo = %target.repo()))]
    async fn delete(
        &self,
        target: &RepositoryTarget,
        path: &str,
        content_hash: &str,
    ) -> StoreResult<()> {
        target.ensure_remote_ready()?;

        let body = DeleteContentBody {
            message: format!("delete {}", file_name(path)),
            sha: content_hash,
            branch: target.branch(),
        };
        let request = ContentRequest::new(
            ContentMethod::Delete,
            self.contents_url(target, path)?,
            target.token(),
        )
        .with_body(to_json(&body)?);

        let response = self.transport.send(request).await?;
        match response.status {
            200 | 204 => {
                info!("Deleted object");
                Ok(())
            }
            404 => Err(StoreError::new(StoreErrorKind::NotFound(path.to_string()))),
            _ => {
                let err = classify_failure(&response);
                error!(status = response.status, error = %err, "Delete failed");
                Err(err)
            }
        }
    }
}

/// Maps an unsuccessful response onto the error taxonomy.
#[track_caller]
fn classify_failure(response: &ContentResponse) -> StoreError {
    let message = store_message(response);
    match response.status {
        400..=499 => StoreError::new(StoreErrorKind::RemoteRejected {
            status: response.status,
            message,
        }),
        status => StoreError::new(StoreErrorKind::RemoteUnavailable {
            status: Some(status),
            message,
        }),
    }
}

/// The store's own error text, falling back to the raw body.
fn store_message(response: &ContentResponse) -> String {
    match serde_json::from_slice::<ApiErrorBody>(&response.body) {
        Ok(body) => body.display_message(),
        Err(_) => match response.text().trim() {
            "" => format!("HTTP {}", response.status),
            text => text.to_string(),
        },
    }
}

fn parse_body<R: serde::de::DeserializeOwned>(response: &ContentResponse) -> StoreResult<R> {
    serde_json::from_slice(&response.body).map_err(|e| {
        StoreError::new(StoreErrorKind::UnexpectedShape(format!(
            "invalid JSON response: {}",
            e
        )))
    })
}

fn to_json<B: Serialize>(body: &B) -> StoreResult<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| {
        StoreError::new(StoreErrorKind::UnexpectedShape(format!(
            "failed to encode request body: {}",
            e
        )))
    })
}
