//! Common test utilities and helpers for the recolor library tests
//!
//! Stub providers that never touch the network, and small in-memory image
//! fixtures.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use accessory_recolor::intake::SourceImage;
use accessory_recolor::provider::{EditProvider, EditResult};
use accessory_recolor::{AspectRatio, RecolorError, RecolorResult};
use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};

/// Base64 of the bytes `hello`.
pub const HELLO_B64: &str = "aGVsbG8=";

/// What a [`StubProvider`] answers with.
#[derive(Debug, Clone)]
pub enum StubOutcome {
    Image(EditResult),
    HttpFailure(u16),
    NoImage,
}

/// Provider stub recording every call it receives.
#[derive(Debug)]
pub struct StubProvider {
    outcome: StubOutcome,
    calls: AtomicUsize,
    last_request: Mutex<Option<(String, AspectRatio)>>,
}

impl StubProvider {
    pub fn new(outcome: StubOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Answers every request with a PNG whose bytes are `hello`.
    pub fn succeeding() -> Self {
        Self::new(StubOutcome::Image(EditResult::new(HELLO_B64, "image/png")))
    }

    pub fn failing(status: u16) -> Self {
        Self::new(StubOutcome::HttpFailure(status))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Color prompt and aspect ratio of the latest call.
    pub fn last_request(&self) -> Option<(String, AspectRatio)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl EditProvider for StubProvider {
    async fn submit_edit(
        &self,
        _image: &SourceImage,
        color_prompt: &str,
        aspect: AspectRatio,
    ) -> RecolorResult<EditResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((color_prompt.to_string(), aspect));

        match &self.outcome {
            StubOutcome::Image(result) => Ok(result.clone()),
            StubOutcome::HttpFailure(status) => {
                Err(RecolorError::provider(Some(*status), "stubbed failure"))
            }
            StubOutcome::NoImage => Err(RecolorError::no_image("stub returned text only")),
        }
    }
}

/// Test image helpers
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encoded_image(width, height, ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encoded_image(width, height, ImageFormat::Jpeg)
}

/// Write `bytes` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Names of all files in `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
