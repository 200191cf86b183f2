//! Gemini `generateContent` client.

use async_trait::async_trait;
use recolor_aspect::AspectRatio;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    DEFAULT_RESULT_MIME, EditProvider, EditResult, ProviderSettings, build_instruction,
};
use crate::config::RecolorConfig;
use crate::error::{RecolorError, RecolorResult};
use crate::intake::SourceImage;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Longest slice of an error body kept in a `ProviderError`.
const ERROR_BODY_LIMIT: usize = 512;

/// HTTP client for the Gemini image editing endpoint.
pub struct GeminiClient {
    http: Client,
    settings: ProviderSettings,
}

impl GeminiClient {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            http: Client::new(),
            settings,
        }
    }

    pub fn from_config(config: &RecolorConfig) -> Self {
        Self::new(config.to_provider_settings())
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    /// `{api_base}/models/{model}:generateContent`
    pub fn endpoint(&self) -> String {
        let model = self.settings.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!(
            "{}/{}:generateContent",
            self.settings.api_base.trim_end_matches('/'),
            model_path
        )
    }

    fn api_key(&self) -> RecolorResult<&str> {
        self.settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(RecolorError::missing_credentials)
    }
}

#[async_trait]
impl EditProvider for GeminiClient {
    async fn submit_edit(
        &self,
        image: &SourceImage,
        color_prompt: &str,
        aspect: AspectRatio,
    ) -> RecolorResult<EditResult> {
        // Fail before any network I/O
        let api_key = self
            .api_key()
            .map_err(|e| e.with_operation("submit_edit"))?;

        let instruction = build_instruction(color_prompt);
        let body = GenerateContentRequest::new(image, &instruction, aspect);
        let endpoint = self.endpoint();

        info!(
            model = %self.settings.model,
            aspect = %aspect,
            mime = image.mime_type().as_str(),
            "sending edit request"
        );

        let response = self
            .http
            .post(&endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RecolorError::provider(None, e.to_string()).with_operation("submit_edit"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RecolorError::provider(
                Some(status.as_u16()),
                truncate(&text, ERROR_BODY_LIMIT),
            )
            .with_operation("submit_edit"));
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|e| {
            RecolorError::provider(Some(status.as_u16()), format!("malformed response: {}", e))
                .with_operation("submit_edit")
        })?;

        let result = extract_image(payload)?;
        debug!(mime = result.mime_type(), "edit response contained an image");
        Ok(result)
    }
}

/// Pick the first inline image out of a response.
///
/// Only the first candidate is inspected. No candidate, no content or an empty
/// part list means the provider returned nothing; parts without image data
/// (text, refusals) are skipped.
pub fn extract_image(response: GenerateContentResponse) -> RecolorResult<EditResult> {
    let block_reason = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.clone());

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(RecolorError::no_image(match block_reason {
            Some(reason) => format!("no content returned (blocked: {})", reason),
            None => "no content returned".to_string(),
        }));
    };

    let finish_reason = candidate.finish_reason;
    let parts = candidate.content.map(|content| content.parts).unwrap_or_default();
    if parts.is_empty() {
        return Err(RecolorError::no_image(match finish_reason {
            Some(reason) => format!("no content returned (finish reason: {})", reason),
            None => "no content returned".to_string(),
        }));
    }

    let mut reply = None;
    for part in parts {
        if let Some(inline) = part.inline_data.filter(|inline| !inline.data.is_empty()) {
            let mime = inline
                .mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_RESULT_MIME.to_string());
            return Ok(EditResult::new(inline.data, mime));
        }
        if reply.is_none() {
            reply = part.text.filter(|text| !text.trim().is_empty());
        }
    }

    Err(RecolorError::no_image(match reply {
        Some(text) => format!(
            "no image data found in the response (model replied: {})",
            truncate(text.trim(), ERROR_BODY_LIMIT)
        ),
        None => "no image data found in the response".to_string(),
    }))
}

/// Remove a `data:<mime>;base64,` prefix if one is present.
pub fn strip_data_url(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((head, data)) if head.starts_with("data:") => data,
        _ => payload,
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &text[..end])
}

/// Request body for `generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<RequestContent<'a>>,
    pub generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    /// Image part first, then the instruction text.
    pub fn new(image: &'a SourceImage, instruction: &'a str, aspect: AspectRatio) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Inline {
                        inline_data: InlineDataRef {
                            mime_type: image.mime_type().as_str(),
                            data: strip_data_url(image.encoded_data()),
                        },
                    },
                    RequestPart::Text { text: instruction },
                ],
            }],
            generation_config: GenerationConfig {
                image_config: ImageConfig {
                    aspect_ratio: aspect.as_str(),
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RequestContent<'a> {
    pub parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RequestPart<'a> {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataRef<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineDataRef<'a> {
    pub mime_type: &'static str,
    pub data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: &'static str,
}

/// Response body of `generateContent`. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, alias = "prompt_feedback")]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default, alias = "finish_reason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default, alias = "inline_data")]
    pub inline_data: Option<InlineData>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, alias = "mime_type")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default, alias = "block_reason")]
    pub block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::SupportedMime;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    fn sample_image() -> SourceImage {
        SourceImage::new("QUJD".into(), SupportedMime::Jpeg, 4, 3).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let image = sample_image();
        let body = GenerateContentRequest::new(&image, "make it gold", AspectRatio::Landscape);
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        { "inlineData": { "mimeType": "image/jpeg", "data": "QUJD" } },
                        { "text": "make it gold" }
                    ]
                }],
                "generationConfig": { "imageConfig": { "aspectRatio": "4:3" } }
            })
        );
    }

    #[test]
    fn test_endpoint_building() {
        let mut settings = ProviderSettings {
            api_key: Some("k".into()),
            api_base: "http://localhost:1234/v1beta/".into(),
            model: "gemini-2.5-flash-image".into(),
        };
        let client = GeminiClient::new(settings.clone());
        assert_eq!(
            client.endpoint(),
            "http://localhost:1234/v1beta/models/gemini-2.5-flash-image:generateContent"
        );

        settings.model = "models/custom".into();
        let client = GeminiClient::new(settings);
        assert_eq!(
            client.endpoint(),
            "http://localhost:1234/v1beta/models/custom:generateContent"
        );
    }

    #[test]
    fn test_extract_first_image_part() {
        let response = parse(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here is your image" },
                    { "inlineData": { "mimeType": "image/jpeg", "data": "Zmlyc3Q=" } },
                    { "inlineData": { "mimeType": "image/png", "data": "c2Vjb25k" } }
                ]}
            }]
        }));
        let result = extract_image(response).unwrap();
        assert_eq!(result.encoded_data(), "Zmlyc3Q=");
        assert_eq!(result.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_extract_defaults_mime_and_accepts_snake_case() {
        let response = parse(json!({
            "candidates": [{
                "content": { "parts": [ { "inline_data": { "data": "aW1n" } } ] }
            }]
        }));
        let result = extract_image(response).unwrap();
        assert_eq!(result.mime_type(), DEFAULT_RESULT_MIME);
    }

    #[test]
    fn test_extract_no_candidates() {
        let err = extract_image(parse(json!({}))).unwrap_err();
        assert_eq!(err.category(), "no_image_returned");

        let err = extract_image(parse(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_extract_empty_parts() {
        let err = extract_image(parse(json!({
            "candidates": [{ "content": { "parts": [] }, "finishReason": "IMAGE_SAFETY" }]
        })))
        .unwrap_err();
        assert_eq!(err.category(), "no_image_returned");
        assert!(err.to_string().contains("IMAGE_SAFETY"));
    }

    #[test]
    fn test_extract_text_only() {
        let err = extract_image(parse(json!({
            "candidates": [{ "content": { "parts": [ { "text": "I can't do that" } ] } }]
        })))
        .unwrap_err();
        assert_eq!(err.category(), "no_image_returned");
        assert!(err.to_string().contains("model replied: I can't do that"));

        let err = extract_image(parse(json!({
            "candidates": [{ "content": { "parts": [ { "text": "   " } ] } }]
        })))
        .unwrap_err();
        assert!(!err.to_string().contains("model replied"));
    }

    #[test]
    fn test_extract_skips_empty_inline_data() {
        let response = parse(json!({
            "candidates": [{
                "content": { "parts": [
                    { "inlineData": { "mimeType": "image/png", "data": "" } },
                    { "inlineData": { "mimeType": "image/webp", "data": "d2VicA==" } }
                ]}
            }]
        }));
        assert_eq!(extract_image(response).unwrap().mime_type(), "image/webp");
    }

    #[test]
    fn test_strip_data_url() {
        assert_eq!(strip_data_url("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_url("QUJD"), "QUJD");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        let long = "é".repeat(10);
        let cut = truncate(&long, 3);
        assert!(cut.ends_with('…'));
        assert!(cut.starts_with('é'));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = GeminiClient::new(ProviderSettings {
            api_key: Some("   ".into()),
            // Unroutable: reaching the network would error differently
            api_base: "http://127.0.0.1:9".into(),
            model: "m".into(),
        });
        let err = client
            .submit_edit(&sample_image(), "gold", AspectRatio::Square)
            .await
            .unwrap_err();
        assert_eq!(err.category(), "missing_credentials");
    }
}
