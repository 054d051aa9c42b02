/// Request and response bodies for the `generateContent` endpoint
///
/// Only the fields this application reads or writes are modelled; serde
/// ignores the rest of the response.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a content block: text or inline binary data
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
            ..Self::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 payload
    pub data: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uses_camel_case_fields() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::inline("image/png", "AQID"), Part::text("Add plants")],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".into(), "TEXT".into()],
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "AQID" } },
                        { "text": "Add plants" }
                    ]
                }],
                "generationConfig": { "responseModalities": ["IMAGE", "TEXT"] }
            })
        );
    }

    #[test]
    fn test_response_parsing_ignores_unknown_fields() {
        let body = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Here is your edited image." },
                        { "inlineData": { "mimeType": "image/png", "data": "AQID" } }
                    ]
                },
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": { "totalTokenCount": 1290 },
            "modelVersion": "gemini-2.5-flash-image-preview"
        });

        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.candidates.len(), 1);
        let candidate = &response.candidates[0];
        assert_eq!(candidate.finish_reason.as_deref(), Some("STOP"));
        let parts = &candidate.content.as_ref().unwrap().parts;
        assert_eq!(parts[0].text.as_deref(), Some("Here is your edited image."));
        assert_eq!(parts[1].inline_data.as_ref().unwrap().mime_type, "image/png");
    }

    #[test]
    fn test_blocked_response_has_no_candidates() {
        let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        assert!(response.candidates.is_empty());
        assert_eq!(
            response.prompt_feedback.and_then(|f| f.block_reason).as_deref(),
            Some("SAFETY")
        );
    }

    #[test]
    fn test_api_error_body() {
        let body = json!({
            "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
        });
        let parsed: ApiErrorBody = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.error.status.as_deref(), Some("INVALID_ARGUMENT"));
        assert_eq!(parsed.error.message, "API key not valid.");
    }
}
