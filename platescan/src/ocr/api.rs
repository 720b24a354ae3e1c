use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::DynamicImage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::detector::{Detection, TextDetector};
use super::preprocessing::encode_png;
use crate::config::{parse_ocr_provider_model, OcrConfig};
use crate::error::{PlateScanError, Result};

const MAX_RETRIES: u32 = 3;

const EXTRACTION_PROMPT: &str = "Extract every piece of text visible in this image, such as \
license plate characters. Return one text region per line, top to bottom, left to right. \
Return only the extracted text without any explanations or formatting.";

fn default_base_url(provider: &str) -> &'static str {
    match provider {
        "mistral" => "https://api.mistral.ai/v1",
        "deepseek" => "https://api.deepseek.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        _ => "https://api.openai.com/v1",
    }
}

/// Remote OCR through an OpenAI-compatible chat completions endpoint.
#[derive(Clone, Debug)]
pub struct VisionApiDetector {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

impl VisionApiDetector {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let (provider, model) = parse_ocr_provider_model(&config.model);
        let provider = provider.to_lowercase();

        let api_key = config.api_key.clone().ok_or_else(|| {
            PlateScanError::Ocr(format!("API key required for {provider} OCR"))
        })?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(&provider).to_string())
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PlateScanError::Ocr(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url,
            model: model.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn ocr(&self, image_png: &[u8]) -> Result<String> {
        let data_url = format!("data:image/png;base64,{}", STANDARD.encode(image_png));

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: EXTRACTION_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
            max_tokens: 1024,
        };

        self.make_request(&request).await
    }

    async fn make_request(&self, request: &ChatRequest) -> Result<String> {
        let mut retries = 0;

        loop {
            let response = self
                .client
                .post(format!("{}/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(request)
                .send()
                .await;

            let retry_reason = match response {
                Ok(resp) if resp.status().is_success() => {
                    let chat_response: ChatResponse = resp.json().await.map_err(|e| {
                        PlateScanError::Ocr(format!("Failed to parse response: {e}"))
                    })?;

                    return chat_response
                        .choices
                        .into_iter()
                        .next()
                        .map(|c| c.message.content.unwrap_or_default())
                        .ok_or_else(|| PlateScanError::Ocr("No response from API".to_string()));
                }
                Ok(resp)
                    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS
                        || resp.status().is_server_error() =>
                {
                    resp.status().to_string()
                }
                Ok(resp) => {
                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    return Err(PlateScanError::Ocr(format!(
                        "API request failed: {status} - {body}"
                    )));
                }
                Err(e) => e.to_string(),
            };

            retries += 1;
            if retries >= MAX_RETRIES {
                return Err(PlateScanError::Ocr(format!(
                    "API request failed after {MAX_RETRIES} retries: {retry_reason}"
                )));
            }
            tracing::debug!(retries, reason = %retry_reason, "Retrying OCR API request");
            tokio::time::sleep(Duration::from_millis(100 * 2_u64.pow(retries))).await;
        }
    }
}

/// Split a model reply into one detection per non-empty line.
fn reply_to_detections(reply: &str) -> Vec<Detection> {
    reply
        .lines()
        .map(|line| line.trim().trim_matches('`').trim())
        .filter(|line| !line.is_empty())
        .map(Detection::text_only)
        .collect()
}

#[async_trait]
impl TextDetector for VisionApiDetector {
    fn name(&self) -> &str {
        "vision-api"
    }

    async fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let png = encode_png(image)?;
        let reply = self.ocr(&png).await?;
        Ok(reply_to_detections(&reply))
    }
}
