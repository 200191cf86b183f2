//! Intake input and output types.

use std::path::Path;

use image::ImageFormat;

use crate::error::{RecolorError, RecolorResult};

/// Media type reported for files whose extension is not a known image type.
const UNKNOWN_TYPE: &str = "application/octet-stream";

/// Image media types accepted by intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedMime {
    Jpeg,
    Png,
    Webp,
}

impl SupportedMime {
    /// Parse an exact declared media type. Anything outside the allow-list is `None`.
    pub fn from_declared(declared: &str) -> Option<Self> {
        match declared {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Guess from a file extension, the way a browser fills in `File.type`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    pub(crate) fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Webp => ImageFormat::WebP,
        }
    }
}

/// A file handed to intake: its name, declared media type and raw bytes.
#[derive(Debug, Clone)]
pub struct IntakeFile {
    pub name: String,
    pub declared_type: String,
    pub bytes: Vec<u8>,
}

impl IntakeFile {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its type from the extension.
    ///
    /// Unknown extensions are declared as `application/octet-stream` so that
    /// intake rejects them with `UnsupportedFormat` rather than here.
    pub async fn from_path(path: impl AsRef<Path>) -> RecolorResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            RecolorError::read_failure(format!("{}: {}", path.display(), e))
                .with_operation("read_upload")
        })?;

        let declared_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(SupportedMime::from_extension)
            .map(SupportedMime::as_str)
            .unwrap_or(UNKNOWN_TYPE);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(name, declared_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// A validated upload. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    encoded_data: String,
    mime_type: SupportedMime,
    width: u32,
    height: u32,
}

impl SourceImage {
    /// Build a source image from already-encoded base64 data.
    ///
    /// Both dimensions must be positive.
    pub fn new(
        encoded_data: String,
        mime_type: SupportedMime,
        width: u32,
        height: u32,
    ) -> RecolorResult<Self> {
        if width == 0 || height == 0 {
            return Err(RecolorError::read_failure(format!(
                "image reports empty dimensions {}x{}",
                width, height
            )));
        }
        Ok(Self {
            encoded_data,
            mime_type,
            width,
            height,
        })
    }

    /// Base64 payload without a data-URL prefix.
    pub fn encoded_data(&self) -> &str {
        &self.encoded_data
    }

    pub fn mime_type(&self) -> SupportedMime {
        self.mime_type
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size of the original file, derived from the base64 payload.
    pub fn byte_len(&self) -> usize {
        let padding = self.encoded_data.bytes().rev().take_while(|&b| b == b'=').count();
        ((self.encoded_data.len() / 4) * 3).saturating_sub(padding)
    }

    /// `data:<mime>;base64,<payload>` form for display surfaces.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type.as_str(), self.encoded_data)
    }
}
