use std::time::Duration;

use log::{debug, info, warn};

use super::wire::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};
use crate::config::Settings;
use crate::error::GenerationError;
use crate::state::EncodedImage;

/// Client for the external multimodal generation API
///
/// Stateless apart from its configuration: every call is one independent
/// HTTP request, with no retries and no caching. Cloning is cheap (the
/// underlying connection pool is shared).
#[derive(Clone, Debug)]
pub struct GenerationClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GenerationClient {
    pub fn new(settings: &Settings) -> Result<Self, GenerationError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL of the generateContent call for the configured model
    pub fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Generate (or edit) one image from a prompt
    ///
    /// The prompt must already be validated as non-empty by the caller.
    pub async fn generate(
        &self,
        prompt: &str,
        base_image: Option<&EncodedImage>,
    ) -> Result<EncodedImage, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::failed("no API key configured (set GEMINI_API_KEY)"))?;

        let request = build_request(prompt, base_image);
        debug!(
            "POST {} ({} parts)",
            self.url(),
            request.contents.first().map_or(0, |content| content.parts.len())
        );

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    debug!("Could not read the {} response body: {}", status, err);
                    String::new()
                }
            };
            return Err(GenerationError::failed(api_error_message(status, &body)));
        }

        let body: GenerateContentResponse = response.json().await?;
        let image = extract_image(body)?;
        info!("📷 Received {} ({} bytes)", image.mime_type, image.byte_len());
        Ok(image)
    }
}

/// Build the request body: optional inline image first, then the prompt
pub fn build_request(prompt: &str, base_image: Option<&EncodedImage>) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(2);
    if let Some(image) = base_image {
        parts.push(Part::inline(image.mime_type.clone(), image.to_base64()));
    }
    parts.push(Part::text(prompt));

    GenerateContentRequest {
        contents: vec![Content { role: None, parts }],
        generation_config: GenerationConfig {
            response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
        },
    }
}

/// Pull the first inline image out of the first candidate
pub fn extract_image(response: GenerateContentResponse) -> Result<EncodedImage, GenerationError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            warn!("Prompt blocked by the model: {}", reason);
        }
        return Err(GenerationError::NoCandidates);
    };

    let inline = candidate
        .content
        .into_iter()
        .flat_map(|content| content.parts)
        .find_map(|part| part.inline_data);

    match inline {
        Some(data) => EncodedImage::from_base64(data.mime_type, &data.data)
            .map_err(|err| GenerationError::failed(format!("malformed image payload: {err}"))),
        None => {
            if let Some(reason) = candidate.finish_reason {
                debug!("Candidate finished without an image ({})", reason);
            }
            Err(GenerationError::NoImageInResponse)
        }
    }
}

/// Human-readable message for a non-2xx response
fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => match parsed.error.status {
            Some(api_status) => format!("{} ({}, {})", parsed.error.message, status, api_status),
            None => format!("{} ({})", parsed.error.message, status),
        },
        _ if body.trim().is_empty() => status.to_string(),
        _ => format!("{}: {}", status, body.trim()),
    }
}
