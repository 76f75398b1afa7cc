//! Wire types for the provider REST API.
//!
//! Request and response bodies for the `generateContent` (text, vision,
//! speech) and `predict` (image) endpoints, plus the response schemas
//! declared for structured JSON outputs.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// A plain text request with no generation config.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
            generation_config: None,
        }
    }

    /// A text request constrained to a structured JSON response.
    pub fn structured(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema),
                ..GenerationConfig::default()
            }),
        }
    }

    /// A speech request for the given prebuilt voice.
    pub fn speech(text: impl Into<String>, voice_name: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::text(text)],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice_name.into(),
                        },
                    },
                }),
                ..GenerationConfig::default()
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64-carried binary payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline binary payload of the first candidate.
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.inline_data.as_ref())
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PredictRequest {
    pub instances: Vec<ImageInstance>,
    pub parameters: ImageParameters,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ImageInstance {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageParameters {
    pub sample_count: u32,
    pub aspect_ratio: String,
    pub output_mime_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Prediction {
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Schema for the title batch: array of {title, trendScore}.
pub(crate) fn title_batch_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "trendScore": { "type": "NUMBER" }
            },
            "required": ["title", "trendScore"]
        }
    })
}

/// Schema for SEO metadata: object of {description, hashtags, tags}.
pub(crate) fn seo_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "description": { "type": "STRING" },
            "hashtags": { "type": "STRING" },
            "tags": { "type": "STRING" }
        },
        "required": ["description", "hashtags", "tags"]
    })
}

/// Schema for image prompts: a single array of strings.
pub(crate) fn string_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

/// Extract the outermost JSON slice delimited by `open`/`close`.
///
/// Models occasionally wrap structured output in prose or code fences;
/// the slice between the first opening and last closing delimiter is the
/// best parse candidate. Falls back to the whole text.
pub(crate) fn extract_json(response: &str, open: char, close: char) -> &str {
    let start = response.find(open);
    let end = response.rfind(close);
    match (start, end) {
        (Some(start), Some(end)) if end > start => &response[start..=end],
        _ => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_fenced_response() {
        let response = "Here you go:\n```json\n[\"a\", \"b\"]\n```\nEnjoy.";
        assert_eq!(extract_json(response, '[', ']'), "[\"a\", \"b\"]");
    }

    #[test]
    fn test_extract_json_passthrough_when_no_delimiters() {
        assert_eq!(extract_json("plain text", '{', '}'), "plain text");
    }

    #[test]
    fn test_first_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_first_inline_data() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"audio/pcm","data":"AAAA"}}]}}]}"#,
        )
        .unwrap();
        let inline = response.first_inline_data().unwrap();
        assert_eq!(inline.mime_type, "audio/pcm");
        assert_eq!(inline.data, "AAAA");
    }

    #[test]
    fn test_empty_candidates() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(response.first_text().is_none());
        assert!(response.first_inline_data().is_none());
    }

    #[test]
    fn test_speech_request_shape() {
        let request = GenerateContentRequest::speech("Hello", "Kore");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["generationConfig"]["responseModalities"][0],
            "AUDIO"
        );
        assert_eq!(
            value["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Kore"
        );
    }

    #[test]
    fn test_structured_request_declares_schema() {
        let request = GenerateContentRequest::structured("prompt", title_batch_schema());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "ARRAY");
    }
}
