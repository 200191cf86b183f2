//! # Image Intake
//!
//! Validates user-supplied photos and turns them into immutable
//! [`SourceImage`] values ready for the edit request.
//!
//! ## Pipeline
//!
//! 1. **Type check**: the declared media type must be JPEG, PNG or WebP
//! 2. **Size check**: at most [`MAX_FILE_SIZE`] bytes (5 MiB)
//! 3. **Encode**: the payload becomes base64 text
//! 4. **Probe**: intrinsic width/height are read from the image header on a
//!    blocking worker
//!
//! Steps 1 and 2 run before any decoding. A failure at any step produces no
//! `SourceImage`, so callers can keep whatever they already had.

mod source;

pub use source::{IntakeFile, SourceImage, SupportedMime};

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};
use image::ImageReader;
use tracing::debug;

use crate::error::{RecolorError, RecolorResult};

/// Largest accepted upload, in bytes.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Media types accepted by intake, in display order.
pub const ALLOWED_FILE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Validate a file and decode it into a [`SourceImage`].
///
/// The declared type is checked first, then the size. Only then is the payload
/// encoded and its dimensions probed. Probing is a suspend point: the returned
/// future resolves once the header has been read on a blocking worker.
///
/// # Errors
///
/// - `UnsupportedFormat` if the declared type is not in [`ALLOWED_FILE_TYPES`]
/// - `FileTooLarge` if the payload exceeds [`MAX_FILE_SIZE`]
/// - `ReadFailure` if the header cannot be decoded or reports a zero dimension
pub async fn validate_and_decode(file: IntakeFile) -> RecolorResult<SourceImage> {
    let mime = SupportedMime::from_declared(&file.declared_type)
        .ok_or_else(|| RecolorError::unsupported_format(&file.declared_type))?;

    let size = file.bytes.len() as u64;
    if size > MAX_FILE_SIZE {
        return Err(RecolorError::file_too_large(size, MAX_FILE_SIZE));
    }

    let encoded = general_purpose::STANDARD.encode(&file.bytes);
    let (width, height) = probe_dimensions(file.bytes, mime).await?;

    debug!(
        name = %file.name,
        mime = mime.as_str(),
        bytes = size,
        width,
        height,
        "image accepted"
    );

    SourceImage::new(encoded, mime, width, height)
}

/// Read intrinsic dimensions from the image header.
pub async fn probe_dimensions(bytes: Vec<u8>, mime: SupportedMime) -> RecolorResult<(u32, u32)> {
    let probed = tokio::task::spawn_blocking(move || {
        ImageReader::with_format(Cursor::new(bytes), mime.image_format()).into_dimensions()
    })
    .await
    .map_err(|e| RecolorError::read_failure(format!("dimension probe aborted: {}", e)))?;

    probed.map_err(|e| RecolorError::read_failure(e.to_string()))
}
