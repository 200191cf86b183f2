//! # Edit Request Provider
//!
//! The boundary between the recolor workflow and the generative image service.
//!
//! ## Architecture
//!
//! 1. **EditProvider Trait**: the single `submit_edit` operation the controller depends on
//! 2. **GeminiClient**: HTTP implementation against the `generateContent` endpoint
//! 3. **Instruction**: the fixed recolor prompt, parameterized by color only
//! 4. **EditResult**: the first inline image found in the response
//!
//! Each submit is one request. There is no client-side retry and no timeout;
//! any failure is reported once and the user decides whether to resubmit.

mod gemini;
mod instruction;
mod result;

pub use gemini::GeminiClient;
pub use instruction::build_instruction;
pub use result::{DEFAULT_RESULT_MIME, DOWNLOAD_PREFIX, EditResult};

use async_trait::async_trait;
use recolor_aspect::AspectRatio;

use crate::error::RecolorResult;
use crate::intake::SourceImage;

/// Connection settings for a provider client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
}

/// Abstract edit provider interface.
/// Implement this trait to plug a different service, or a stub in tests.
#[async_trait]
pub trait EditProvider: Send + Sync {
    /// Recolor the accessory in `image` to `color_prompt`.
    ///
    /// # Arguments
    /// * `image` - Validated source photo
    /// * `color_prompt` - Target color description, sent verbatim
    /// * `aspect` - Requested output aspect ratio
    ///
    /// # Returns
    /// The first image the provider sends back
    async fn submit_edit(
        &self,
        image: &SourceImage,
        color_prompt: &str,
        aspect: AspectRatio,
    ) -> RecolorResult<EditResult>;
}

#[async_trait]
impl<P: EditProvider + ?Sized> EditProvider for Box<P> {
    async fn submit_edit(
        &self,
        image: &SourceImage,
        color_prompt: &str,
        aspect: AspectRatio,
    ) -> RecolorResult<EditResult> {
        (**self).submit_edit(image, color_prompt, aspect).await
    }
}
