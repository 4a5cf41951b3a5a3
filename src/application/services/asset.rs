//! Asset upload through the management API

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument};

use crate::application::services::api::{parse_body, send_checked};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::infrastructure::traits::{ApiRequest, FileSystem, HttpTransport, RequestBody};

const UPLOAD_ASSET: &str = "upload asset";

/// Upload response; `filename` is what stories reference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedAsset {
    #[serde(default)]
    pub id: Option<u64>,
    pub filename: String,
    #[serde(default)]
    pub pretty_url: Option<String>,
}

/// MIME type from the file extension.
pub fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}

pub struct AssetService {
    settings: Arc<Settings>,
    fs: Arc<dyn FileSystem>,
    http: Arc<dyn HttpTransport>,
}

impl AssetService {
    pub fn new(
        settings: Arc<Settings>,
        fs: Arc<dyn FileSystem>,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        Self { settings, fs, http }
    }

    /// POST `{management}/spaces/{id}/assets` as multipart field `file`.
    ///
    /// A missing file fails before any request is sent.
    #[instrument(level = "debug", skip(self))]
    pub fn upload(&self, path: &Path) -> ApplicationResult<UploadedAsset> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::AssetNotFound(path.to_path_buf()));
        }
        let resolved = self
            .fs
            .canonicalize(path)
            .with_path_context("resolve asset", path)?;
        let token = self.settings.require_management_token()?;

        let bytes = self
            .fs
            .read(&resolved)
            .with_path_context("read asset", &resolved)?;
        // Name the upload after the path as given, not a symlink target.
        let filename = path
            .file_name()
            .or_else(|| resolved.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ApplicationError::AssetNotFound(resolved.clone()))?;

        let url = format!(
            "{}/spaces/{}/assets",
            self.settings.management_base()?,
            self.settings.space_id
        );
        let body = RequestBody::Multipart {
            field: "file".to_string(),
            content_type: guess_content_type(Path::new(&filename)).to_string(),
            filename,
            bytes,
        };

        let request = ApiRequest::post(url, body).bearer(token);
        let response = send_checked(self.http.as_ref(), UPLOAD_ASSET, &request)?;
        let asset: UploadedAsset = parse_body(UPLOAD_ASSET, &response)?;

        info!(filename = %asset.filename, id = ?asset.id, "asset uploaded");
        Ok(asset)
    }
}
