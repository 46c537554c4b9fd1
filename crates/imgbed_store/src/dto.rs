//! Wire formats of the content API.

use serde::{Deserialize, Serialize};

/// Body of a create-or-update request.
#[derive(Debug, Serialize)]
pub(crate) struct PutContentBody<'a> {
    pub message: String,
    /// Base64 of the file bytes
    pub content: String,
    pub branch: &'a str,
    /// Current revision, only when overwriting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

/// Body of a delete request.
#[derive(Debug, Serialize)]
pub(crate) struct DeleteContentBody<'a> {
    pub message: String,
    pub sha: &'a str,
    pub branch: &'a str,
}

/// Successful create-or-update response.
#[derive(Debug, Deserialize)]
pub(crate) struct PutContentResponse {
    pub content: ContentEntry,
}

/// One entry of a directory listing, also the `content` of a write response.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub sha: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ContentEntry {
    pub fn is_file(&self) -> bool {
        self.kind.as_deref() == Some("file")
    }
}

/// Single-file read response.
#[derive(Debug, Deserialize)]
pub(crate) struct FileRecord {
    pub sha: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// Error body returned with 4xx/5xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Store message with the first detail appended, as the store phrased them.
    pub fn display_message(&self) -> String {
        match self.errors.first().and_then(|e| e.message.as_deref()) {
            Some(detail) => format!("{} ({})", self.message, detail),
            None => self.message.clone(),
        }
    }
}
