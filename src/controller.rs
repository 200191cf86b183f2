//! # Application Controller
//!
//! Top-level orchestration of a recolor session: upload, color choice, submit,
//! result, reset.
//!
//! ## State Machine
//!
//! ```text
//!            submit (image + prompt)          provider ok
//!   Idle ───────────────────────────▶ Processing ──────────▶ Success
//!    ▲                                     │                    │
//!    │ reset / upload                      │ provider error     │ submit again
//!    │                                     ▼                    ▼
//!    └──────────────────────────────── Error ◀──────────── Processing
//! ```
//!
//! - Submitting without an image or with an empty prompt is a no-op
//! - Intake failures leave every field untouched
//! - While `Processing`, uploads, color changes and further submits are
//!   rejected with `Busy`; only `reset` goes through
//! - A provider outcome that arrives after a reset belongs to a discarded
//!   session and is dropped

use std::path::{Path, PathBuf};

use recolor_aspect::{AspectRatio, Size, classify};
use tracing::{debug, error, info, warn};

use crate::color::{ColorPreset, ColorSelectionState, HexColor};
use crate::config::RecolorConfig;
use crate::error::{RecolorError, RecolorResult};
use crate::intake::{self, IntakeFile, SourceImage};
use crate::provider::{EditProvider, EditResult, GeminiClient};

/// What the presentation layer should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProcessState {
    #[default]
    Idle,
    Processing,
    Success,
    Error,
}

/// Everything one provider call needs, detached from the controller.
#[derive(Debug, Clone)]
pub struct EditJob {
    pub image: SourceImage,
    pub color_prompt: String,
    pub aspect: AspectRatio,
    session: u64,
}

/// Session state plus the provider used to run edits.
pub struct AppController<P: EditProvider> {
    provider: P,
    state: ProcessState,
    source: Option<SourceImage>,
    aspect: AspectRatio,
    colors: ColorSelectionState,
    result: Option<EditResult>,
    error_message: Option<String>,
    last_error: Option<RecolorError>,
    session: u64,
}

impl AppController<GeminiClient> {
    /// Controller backed by the HTTP provider, with the key injected from `config`.
    pub fn from_config(config: &RecolorConfig) -> Self {
        Self::new(GeminiClient::from_config(config))
    }
}

impl<P: EditProvider> AppController<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            state: ProcessState::Idle,
            source: None,
            aspect: AspectRatio::default(),
            colors: ColorSelectionState::new(),
            result: None,
            error_message: None,
            last_error: None,
            session: 0,
        }
    }

    fn ensure_not_processing(&self, operation: &str) -> RecolorResult<()> {
        if self.state == ProcessState::Processing {
            return Err(RecolorError::busy(operation));
        }
        Ok(())
    }

    /// Validate and adopt a new source image.
    ///
    /// On success the previous result is discarded, the aspect ratio is
    /// re-derived, the color target is cleared and the state returns to
    /// `Idle`. On failure nothing changes.
    pub async fn upload(&mut self, file: IntakeFile) -> RecolorResult<()> {
        self.ensure_not_processing("upload")?;

        let image = match intake::validate_and_decode(file).await {
            Ok(image) => image,
            Err(e) => {
                warn!(category = e.category(), "upload rejected: {}", e);
                return Err(e.with_operation("upload"));
            }
        };

        let aspect = classify(Size {
            w: image.width(),
            h: image.height(),
        });
        info!(
            width = image.width(),
            height = image.height(),
            aspect = %aspect,
            "source image loaded"
        );

        self.source = Some(image);
        self.aspect = aspect;
        self.result = None;
        self.error_message = None;
        self.last_error = None;
        self.colors.clear_target();
        self.state = ProcessState::Idle;
        self.session += 1;
        Ok(())
    }

    /// Read `path` from disk and upload it.
    pub async fn upload_path(&mut self, path: impl AsRef<Path>) -> RecolorResult<()> {
        self.ensure_not_processing("upload")?;
        let file = IntakeFile::from_path(path).await?;
        self.upload(file).await
    }

    pub fn select_preset(&mut self, preset: &'static ColorPreset) -> RecolorResult<()> {
        self.ensure_not_processing("change color")?;
        self.colors.select_preset(preset);
        Ok(())
    }

    pub fn type_custom(&mut self, raw: impl Into<String>) -> RecolorResult<()> {
        self.ensure_not_processing("change color")?;
        self.colors.type_custom(raw);
        Ok(())
    }

    pub fn pick_color(&mut self, hex: HexColor) -> RecolorResult<()> {
        self.ensure_not_processing("change color")?;
        self.colors.pick_color(hex);
        Ok(())
    }

    /// Replace the classified aspect ratio with an explicit one.
    pub fn override_aspect_ratio(&mut self, aspect: AspectRatio) -> RecolorResult<()> {
        self.ensure_not_processing("change aspect ratio")?;
        debug!(from = %self.aspect, to = %aspect, "aspect ratio overridden");
        self.aspect = aspect;
        Ok(())
    }

    /// True when `submit` would send a request.
    pub fn can_submit(&self) -> bool {
        self.state != ProcessState::Processing
            && self.source.is_some()
            && self.colors.can_submit()
    }

    /// Enter `Processing` and hand out the job to run.
    ///
    /// Returns `Ok(None)` without touching state when there is no image or
    /// the prompt is empty.
    pub fn begin_submit(&mut self) -> RecolorResult<Option<EditJob>> {
        self.ensure_not_processing("submit")?;

        let Some(image) = self.source.clone() else {
            debug!("submit ignored: no source image");
            return Ok(None);
        };
        if !self.colors.can_submit() {
            debug!("submit ignored: empty color prompt");
            return Ok(None);
        }

        let job = EditJob {
            image,
            color_prompt: self.colors.prompt_text().to_string(),
            aspect: self.aspect,
            session: self.session,
        };

        self.result = None;
        self.error_message = None;
        self.last_error = None;
        self.state = ProcessState::Processing;
        info!(prompt = %job.color_prompt, aspect = %job.aspect, "edit submitted");
        Ok(Some(job))
    }

    /// Apply the provider outcome for `job` and return the new state.
    pub fn finish_submit(
        &mut self,
        job: EditJob,
        outcome: RecolorResult<EditResult>,
    ) -> ProcessState {
        if job.session != self.session || self.state != ProcessState::Processing {
            debug!("discarding outcome of a superseded edit");
            return self.state;
        }

        match outcome {
            Ok(result) => {
                info!(mime = result.mime_type(), "edit succeeded");
                self.result = Some(result);
                self.state = ProcessState::Success;
            }
            Err(e) => {
                error!(category = e.category(), "edit failed: {}", e);
                self.error_message = Some(e.user_message());
                self.last_error = Some(e);
                self.state = ProcessState::Error;
            }
        }
        self.state
    }

    /// Run one edit end to end.
    ///
    /// Returns `Ok(false)` when there was nothing to submit. Provider failures
    /// are not returned here: they move the controller to `Error`.
    pub async fn submit(&mut self) -> RecolorResult<bool> {
        let Some(job) = self.begin_submit()? else {
            return Ok(false);
        };

        let outcome = self
            .provider
            .submit_edit(&job.image, &job.color_prompt, job.aspect)
            .await;
        self.finish_submit(job, outcome);
        Ok(true)
    }

    /// Back to a blank session from any state.
    pub fn reset(&mut self) {
        self.state = ProcessState::Idle;
        self.source = None;
        self.aspect = AspectRatio::default();
        self.colors.reset();
        self.result = None;
        self.error_message = None;
        self.last_error = None;
        self.session += 1;
        info!("session reset");
    }

    /// Write the edited image to `dir` with a timestamped name.
    pub async fn download(&self, dir: impl AsRef<Path>) -> RecolorResult<PathBuf> {
        let result = self
            .result
            .as_ref()
            .ok_or_else(|| RecolorError::state("download", "no edited image available"))?;
        result.save_to(dir).await
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn source_image(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect
    }

    pub fn colors(&self) -> &ColorSelectionState {
        &self.colors
    }

    pub fn result(&self) -> Option<&EditResult> {
        self.result.as_ref()
    }

    /// Message for the user after a failed edit.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Full detail of the last failed edit, for diagnostics.
    pub fn last_error(&self) -> Option<&RecolorError> {
        self.last_error.as_ref()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Consume the controller, keeping only the last edit failure.
    pub fn into_last_error(self) -> Option<RecolorError> {
        self.last_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::find_preset;
    use crate::intake::SupportedMime;
    use async_trait::async_trait;

    struct FixedProvider;

    #[async_trait]
    impl EditProvider for FixedProvider {
        async fn submit_edit(
            &self,
            _image: &SourceImage,
            _color_prompt: &str,
            _aspect: AspectRatio,
        ) -> RecolorResult<EditResult> {
            Ok(EditResult::new("aGVsbG8=", "image/png"))
        }
    }

    fn loaded_controller() -> AppController<FixedProvider> {
        let mut controller = AppController::new(FixedProvider);
        controller.source = Some(SourceImage::new("QUJD".into(), SupportedMime::Png, 10, 10).unwrap());
        controller
    }

    #[test]
    fn test_begin_submit_without_prompt_is_noop() {
        let mut controller = loaded_controller();
        assert!(controller.begin_submit().unwrap().is_none());
        assert_eq!(controller.state(), ProcessState::Idle);
    }

    #[test]
    fn test_busy_while_processing() {
        let mut controller = loaded_controller();
        controller.select_preset(find_preset("Gold").unwrap()).unwrap();
        let job = controller.begin_submit().unwrap().unwrap();
        assert_eq!(controller.state(), ProcessState::Processing);
        assert!(!controller.can_submit());

        assert_eq!(controller.type_custom("red").unwrap_err().category(), "busy");
        assert_eq!(controller.begin_submit().unwrap_err().category(), "busy");
        assert_eq!(controller.colors().prompt_text(), "metallic gold");

        let state = controller.finish_submit(job, Ok(EditResult::new("AA==", "image/png")));
        assert_eq!(state, ProcessState::Success);
    }

    #[test]
    fn test_outcome_after_reset_is_dropped() {
        let mut controller = loaded_controller();
        controller.type_custom("teal").unwrap();
        let job = controller.begin_submit().unwrap().unwrap();

        controller.reset();
        let state = controller.finish_submit(job, Ok(EditResult::new("AA==", "image/png")));
        assert_eq!(state, ProcessState::Idle);
        assert!(controller.result().is_none());
    }

    #[test]
    fn test_failure_stores_generic_message_and_keeps_image() {
        let mut controller = loaded_controller();
        controller.type_custom("teal").unwrap();
        let job = controller.begin_submit().unwrap().unwrap();

        let state = controller.finish_submit(job, Err(RecolorError::provider(Some(500), "boom")));
        assert_eq!(state, ProcessState::Error);
        assert_eq!(
            controller.error_message(),
            Some(crate::error::GENERIC_EDIT_FAILURE)
        );
        assert_eq!(controller.last_error().unwrap().category(), "provider_error");
        assert!(controller.source_image().is_some());
    }

    #[tokio::test]
    async fn test_resubmit_from_success() {
        let mut controller = loaded_controller();
        controller.type_custom("teal").unwrap();
        assert!(controller.submit().await.unwrap());
        assert_eq!(controller.state(), ProcessState::Success);

        controller.type_custom("navy").unwrap();
        assert!(controller.submit().await.unwrap());
        assert_eq!(controller.state(), ProcessState::Success);
    }

    #[tokio::test]
    async fn test_download_without_result_is_state_error() {
        let controller = loaded_controller();
        let dir = tempfile::tempdir().unwrap();
        let err = controller.download(dir.path()).await.unwrap_err();
        assert_eq!(err.category(), "state");
    }

    #[test]
    fn test_override_aspect_ratio() {
        let mut controller = loaded_controller();
        controller.override_aspect_ratio(AspectRatio::Tall).unwrap();
        assert_eq!(controller.aspect_ratio(), AspectRatio::Tall);
        controller.reset();
        assert_eq!(controller.aspect_ratio(), AspectRatio::Square);
    }
}
