use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentResponse, SafetySetting, BLOCK_MEDIUM_AND_ABOVE,
    HARM_DANGEROUS_CONTENT, HARM_HARASSMENT, HARM_HATE_SPEECH, HARM_SEXUALLY_EXPLICIT,
};
use crate::ai::IdeaService;
use crate::models::{ArtIdea, FourPillarChart, ARTWORK_COUNT};
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const IDEA_SAFETY_SETTINGS: [SafetySetting; 4] = [
    SafetySetting::new(HARM_HATE_SPEECH, BLOCK_MEDIUM_AND_ABOVE),
    SafetySetting::new(HARM_DANGEROUS_CONTENT, BLOCK_MEDIUM_AND_ABOVE),
    SafetySetting::new(HARM_HARASSMENT, BLOCK_MEDIUM_AND_ABOVE),
    SafetySetting::new(HARM_SEXUALLY_EXPLICIT, BLOCK_MEDIUM_AND_ABOVE),
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdeasRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: IdeasGenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IdeasGenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

/// Structured-output schema: an array of `{description, imagePrompt}`.
fn ideas_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "description": "Three Feng Shui painting options, each with a description and a detailed image generation prompt.",
        "minItems": ARTWORK_COUNT,
        "maxItems": ARTWORK_COUNT,
        "items": {
            "type": "OBJECT",
            "properties": {
                "description": {
                    "type": "STRING",
                    "description": "The symbolism of the painting and how it benefits the owner of the Ba Zi chart."
                },
                "imagePrompt": {
                    "type": "STRING",
                    "description": "A rich prompt for an image model covering style, colors, subjects, mood and composition."
                }
            },
            "required": ["description", "imagePrompt"]
        }
    })
}

pub struct GeminiIdeaClient {
    http: GeminiHttpClient,
}

impl GeminiIdeaClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(30),
                client,
            ),
        }
    }

    fn build_request(chart: &FourPillarChart) -> IdeasRequest {
        IdeasRequest {
            system_instruction: Content::text(None, prompts::IDEAS_SYSTEM.to_string()),
            contents: vec![Content::text(Some("user"), prompts::ideas_user(chart))],
            generation_config: IdeasGenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: ideas_schema(),
            },
            safety_settings: IDEA_SAFETY_SETTINGS.to_vec(),
        }
    }
}

/// Strip a Markdown code fence some models wrap JSON answers in.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
super::impl_with_gemini_base_url!(GeminiIdeaClient);

#[async_trait]
impl IdeaService for GeminiIdeaClient {
    async fn generate_ideas(&self, chart: &FourPillarChart) -> Result<Vec<ArtIdea>> {
        let request = Self::build_request(chart);

        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let text = response.first_text().ok_or_else(|| {
            Error::AiProvider(format!(
                "No text in Gemini ideas response (finish reason: {})",
                response.finish_reason().unwrap_or("unknown")
            ))
        })?;

        let ideas: Vec<ArtIdea> = serde_json::from_str(strip_code_fence(text)).map_err(|e| {
            tracing::error!("Art ideas did not match the expected shape: {}\nText: {}", e, text);
            Error::AiProvider(format!("Failed to parse art ideas: {}", e))
        })?;

        tracing::debug!(
            "Gemini model {} returned {} art ideas",
            self.http.model(),
            ideas.len()
        );
        Ok(ideas)
    }
}
