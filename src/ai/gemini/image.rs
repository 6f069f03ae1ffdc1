use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentResponse, SafetySetting, BLOCK_LOW_AND_ABOVE, BLOCK_MEDIUM_AND_ABOVE,
    HARM_DANGEROUS_CONTENT, HARM_HARASSMENT, HARM_HATE_SPEECH, HARM_SEXUALLY_EXPLICIT,
};
use crate::ai::{mime, ImageGenerationService};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

// Image output is held to a stricter sexual-content threshold than text.
const IMAGE_SAFETY_SETTINGS: [SafetySetting; 4] = [
    SafetySetting::new(HARM_SEXUALLY_EXPLICIT, BLOCK_LOW_AND_ABOVE),
    SafetySetting::new(HARM_HATE_SPEECH, BLOCK_MEDIUM_AND_ABOVE),
    SafetySetting::new(HARM_DANGEROUS_CONTENT, BLOCK_MEDIUM_AND_ABOVE),
    SafetySetting::new(HARM_HARASSMENT, BLOCK_MEDIUM_AND_ABOVE),
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageRequest {
    contents: Vec<Content>,
    generation_config: ImageGenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageGenerationConfig {
    response_modalities: Vec<String>,
}

pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(120),
                client,
            ),
        }
    }
}

#[cfg(test)]
super::impl_with_gemini_base_url!(GeminiImageClient);

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>> {
        let request = ImageRequest {
            contents: vec![Content::text(Some("user"), prompt.to_string())],
            // The image model rejects IMAGE without TEXT.
            generation_config: ImageGenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
            safety_settings: IMAGE_SAFETY_SETTINGS.to_vec(),
        };

        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let Some(inline) = response.first_inline_data() else {
            tracing::debug!(
                "Gemini returned no image (finish reason: {})",
                response.finish_reason().unwrap_or("unknown")
            );
            return Ok(None);
        };

        use base64::Engine as _;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&inline.data)
            .map_err(|e| Error::AiProvider(format!("Failed to decode Gemini base64 image: {}", e)))?;

        if bytes.is_empty() {
            return Ok(None);
        }

        let mime_type = mime::resolve_image_mime(&inline.mime_type, &bytes);
        tracing::debug!(
            "Gemini returned image with mime_type: {} ({} bytes)",
            mime_type,
            bytes.len()
        );

        Ok(Some(format!("data:{};base64,{}", mime_type, inline.data)))
    }
}
