//! Edited image returned by the provider.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{Engine as _, engine::general_purpose};
use tracing::info;

use crate::error::{RecolorError, RecolorResult};

/// Mime type assumed when the provider does not declare one.
pub const DEFAULT_RESULT_MIME: &str = "image/png";

/// Prefix of every downloaded result file name.
pub const DOWNLOAD_PREFIX: &str = "recolored-accessory";

/// An edited image. Only created from a successful provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    encoded_data: String,
    mime_type: String,
}

impl EditResult {
    pub fn new(encoded_data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            encoded_data: encoded_data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn encoded_data(&self) -> &str {
        &self.encoded_data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.encoded_data)
    }

    /// Raw image bytes.
    pub fn decode(&self) -> RecolorResult<Vec<u8>> {
        Ok(general_purpose::STANDARD.decode(self.encoded_data.as_bytes())?)
    }

    /// File extension matching the declared mime type, `png` when unknown.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        }
    }

    /// `recolored-accessory-<millis>.<ext>`
    pub fn download_file_name(&self, unix_millis: u128) -> String {
        format!("{}-{}.{}", DOWNLOAD_PREFIX, unix_millis, self.extension())
    }

    /// Write the decoded image into `dir` under a timestamped name.
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> RecolorResult<PathBuf> {
        let bytes = self.decode()?;
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let path = dir.as_ref().join(self.download_file_name(millis));

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| RecolorError::io("download", Some(path.display().to_string()), e))?;

        info!(path = %path.display(), bytes = bytes.len(), "result saved");
        Ok(path)
    }
}
