//! # Accessory Recolor Library
//!
//! Recolors the hair accessory in a photo through a generative image editing
//! service, keeping material, shape and background intact.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `intake`: Upload validation, base64 encoding and dimension probing
//! - `color`: Preset catalog, hex validation and the color selection state
//! - `provider`: The `EditProvider` seam and the Gemini HTTP client
//! - `controller`: The session state machine tying everything together
//! - `config`: Configuration management and validation
//! - `error`: Error taxonomy with context and user-facing messages
//!
//! Aspect ratio classification lives in the `recolor-aspect` workspace crate
//! and is re-exported here.
//!
//! ## Example
//!
//! ```rust,no_run
//! use accessory_recolor::{recolor_file, ColorChoice, RecolorRequest};
//! use accessory_recolor::config::RecolorConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RecolorConfig::from_env();
//! let request = RecolorRequest {
//!     image: "portrait.jpg".into(),
//!     color: ColorChoice::Text("dusty rose".to_string()),
//!     aspect: None,
//! };
//!
//! let saved = recolor_file(&config, request).await?;
//! println!("saved {}", saved.display());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod color;
pub mod config;
pub mod controller;
pub mod error;
pub mod intake;
pub mod provider;

/// Re-export error types for convenience
pub use error::{HasRecoverySuggestion, RecolorError, RecolorResult};

/// Re-export aspect classification from the workspace crate
pub use recolor_aspect::{AspectRatio, Size, classify};

pub use color::{ColorPreset, HexColor};
pub use config::RecolorConfig;
pub use controller::{AppController, ProcessState};

/// Classify raw pixel dimensions into the nearest supported aspect ratio.
pub fn classify_dimensions(width: u32, height: u32) -> AspectRatio {
    classify(Size { w: width, h: height })
}

/// How the target color is chosen for a one-shot recolor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorChoice {
    /// A built-in swatch
    Preset(&'static ColorPreset),
    /// Free text, sent as typed
    Text(String),
    /// A color-wheel pick
    Picker(HexColor),
}

/// Parameters for [`recolor_file`].
#[derive(Debug, Clone)]
pub struct RecolorRequest {
    /// Path of the source photo.
    ///
    /// The media type is guessed from the extension and must be JPEG, PNG or
    /// WebP. Files over 5 MiB are rejected.
    pub image: PathBuf,

    /// Target color for the accessory.
    pub color: ColorChoice,

    /// Output aspect ratio.
    ///
    /// `None` keeps the ratio classified from the source dimensions.
    pub aspect: Option<AspectRatio>,
}

/// Upload, recolor and download in one call.
///
/// Drives an [`AppController`] backed by the Gemini client built from
/// `config`, and writes the result into `config.output_dir`.
///
/// # Returns
///
/// Path of the written `recolored-accessory-<millis>.<ext>` file.
///
/// # Errors
///
/// - `Config` if `config` does not validate
/// - Intake errors if the file cannot be accepted
/// - `State` if the color choice produces an empty prompt
/// - The provider failure if the edit did not succeed
/// - `Io` if the result cannot be written
pub async fn recolor_file(config: &RecolorConfig, request: RecolorRequest) -> RecolorResult<PathBuf> {
    config
        .validate()
        .map_err(|reason| RecolorError::config("config", reason))?;

    let mut controller = AppController::from_config(config);
    controller.upload_path(&request.image).await?;

    match request.color {
        ColorChoice::Preset(preset) => controller.select_preset(preset)?,
        ColorChoice::Text(text) => controller.type_custom(text)?,
        ColorChoice::Picker(hex) => controller.pick_color(hex)?,
    }
    if let Some(aspect) = request.aspect {
        controller.override_aspect_ratio(aspect)?;
    }

    if !controller.submit().await? {
        return Err(RecolorError::state("submit", "no target color was given")
            .with_recovery_suggestion("Pass --preset, --color or --pick"));
    }

    match controller.state() {
        ProcessState::Success => controller.download(&config.output_dir).await,
        _ => Err(controller
            .into_last_error()
            .unwrap_or_else(|| RecolorError::state("submit", "edit did not complete"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_dimensions() {
        assert_eq!(classify_dimensions(1920, 1080), AspectRatio::Wide);
        assert_eq!(classify_dimensions(600, 800), AspectRatio::Portrait);
        assert_eq!(classify_dimensions(0, 800), AspectRatio::Square);
    }

    #[tokio::test]
    async fn test_recolor_file_rejects_invalid_config() {
        let config = RecolorConfig::default().with_api_base("ftp://example.com");
        let request = RecolorRequest {
            image: "unused.png".into(),
            color: ColorChoice::Text("red".to_string()),
            aspect: None,
        };
        let err = recolor_file(&config, request).await.unwrap_err();
        assert_eq!(err.category(), "config");
    }
}
