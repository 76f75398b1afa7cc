//! Provider-backed generation gateway.
//!
//! Each operation builds a prompt from its typed request, performs one
//! REST round trip, and normalizes the response into a strict output
//! type. Structured outputs declare a response schema; the raw text is
//! still repaired (outermost JSON slice) before parsing.

use super::wire::{
    extract_json, seo_schema, string_list_schema, title_batch_schema, Content,
    GenerateContentRequest, GenerateContentResponse, ImageInstance, ImageParameters, Part,
    PredictRequest, PredictResponse,
};
use super::{
    Generator, ImagePromptRequest, ScriptRequest, SeoRequest, ThumbnailRequest, TitleRequest,
    VoiceRequest,
};
use crate::audio::{decode_pcm16, PcmBuffer, TTS_SAMPLE_RATE};
use crate::config::{Prompts, ProviderSettings, Voice};
use crate::error::{Result, SkrivError};
use crate::gemini::{api_key, create_client_with_timeout};
use crate::session::{ReferenceImage, SeoRecord, ThumbnailAsset, TitleCandidate};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Gateway to the generative provider's REST API.
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    text_model: String,
    fast_model: String,
    image_model: String,
    tts_model: String,
    prompts: Prompts,
}

impl GeminiGenerator {
    /// Create a gateway from provider settings; resolves the API key
    /// from the environment.
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(Duration::from_secs(settings.timeout_seconds))?,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key: api_key()?,
            text_model: settings.text_model.clone(),
            fast_model: settings.fast_model.clone(),
            image_model: settings.image_model.clone(),
            tts_model: settings.tts_model.clone(),
            prompts: Prompts::default(),
        })
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    async fn post<B: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
        operation: &str,
    ) -> Result<R> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| SkrivError::Generation(format!("{}: {}", operation, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SkrivError::Generation(format!(
                "{}: provider returned HTTP {}: {}",
                operation,
                status,
                preview(&body, 500)
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| SkrivError::Generation(format!("{}: {}", operation, e)))
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
        operation: &str,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}/models/{}:generateContent", self.api_base, model);
        self.post(&url, request, operation).await
    }

    async fn predict(
        &self,
        model: &str,
        request: &PredictRequest,
        operation: &str,
    ) -> Result<PredictResponse> {
        let url = format!("{}/models/{}:predict", self.api_base, model);
        self.post(&url, request, operation).await
    }

    /// Secondary vision round trip: describe the reference image so the
    /// image model can replicate its style.
    async fn describe_reference_image(&self, image: &ReferenceImage) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::inline(image.media_type.clone(), BASE64.encode(&image.bytes)),
                    Part::text(self.prompts.thumbnail.vision.clone()),
                ],
            }],
            generation_config: None,
        };

        let response = self
            .generate_content(&self.fast_model, &request, "reference image analysis")
            .await?;

        response.first_text().ok_or_else(|| {
            SkrivError::Parse("reference image analysis returned no text".to_string())
        })
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    #[instrument(skip(self, request), fields(count = request.count))]
    async fn generate_titles(&self, request: &TitleRequest) -> Result<Vec<TitleCandidate>> {
        let prompt = build_title_prompt(&self.prompts, request);
        let wire_request = GenerateContentRequest::structured(prompt, title_batch_schema());

        let response = self
            .generate_content(&self.text_model, &wire_request, "title generation")
            .await?;
        let text = response
            .first_text()
            .ok_or_else(|| SkrivError::Parse("title generation returned no text".to_string()))?;

        let titles: Vec<TitleCandidate> = serde_json::from_str(extract_json(&text, '[', ']'))
            .map_err(|e| {
                SkrivError::Parse(format!(
                    "title batch: {}. Response was: {}",
                    e,
                    preview(&text, 500)
                ))
            })?;

        debug!("Generated {} title candidates", titles.len());
        Ok(titles)
    }

    #[instrument(skip(self, request), fields(sections = request.section_count))]
    async fn generate_script(&self, request: &ScriptRequest) -> Result<String> {
        let prompt = build_script_prompt(&self.prompts, request);
        let wire_request = GenerateContentRequest::text(prompt);

        let response = self
            .generate_content(&self.text_model, &wire_request, "script generation")
            .await?;
        let text = response
            .first_text()
            .ok_or_else(|| SkrivError::Parse("script generation returned no text".to_string()))?;

        Ok(text.trim().to_string())
    }

    #[instrument(skip(self, request))]
    async fn generate_seo(&self, request: &SeoRequest) -> Result<SeoRecord> {
        let prompt = build_seo_prompt(&self.prompts, request);
        let wire_request = GenerateContentRequest::structured(prompt, seo_schema());

        let response = self
            .generate_content(&self.fast_model, &wire_request, "SEO generation")
            .await?;
        let text = response
            .first_text()
            .ok_or_else(|| SkrivError::Parse("SEO generation returned no text".to_string()))?;

        serde_json::from_str(extract_json(&text, '{', '}')).map_err(|e| {
            SkrivError::Parse(format!(
                "SEO metadata: {}. Response was: {}",
                e,
                preview(&text, 500)
            ))
        })
    }

    #[instrument(skip(self, request), fields(per_section = request.prompts_per_section))]
    async fn generate_image_prompts(&self, request: &ImagePromptRequest) -> Result<Vec<String>> {
        let prompt = build_image_prompt_prompt(&self.prompts, request);
        let wire_request = GenerateContentRequest::structured(prompt, string_list_schema());

        let response = self
            .generate_content(&self.fast_model, &wire_request, "image prompt generation")
            .await?;
        let text = response.first_text().ok_or_else(|| {
            SkrivError::Parse("image prompt generation returned no text".to_string())
        })?;

        let prompts: Vec<String> =
            serde_json::from_str(extract_json(&text, '[', ']')).map_err(|e| {
                SkrivError::Parse(format!(
                    "image prompt list: {}. Response was: {}",
                    e,
                    preview(&text, 500)
                ))
            })?;

        debug!("Generated {} image prompts", prompts.len());
        Ok(prompts)
    }

    #[instrument(skip(self, request))]
    async fn generate_thumbnail(
        &self,
        request: &ThumbnailRequest,
    ) -> Result<Option<ThumbnailAsset>> {
        let style_guidance = match &request.reference {
            None => {
                let mut vars = HashMap::new();
                vars.insert("style".to_string(), request.style.to_string());
                self.prompts
                    .render_with_custom(&self.prompts.thumbnail.style_default, &vars)
            }
            Some(image) => match self.describe_reference_image(image).await {
                Ok(description) => {
                    let mut vars = HashMap::new();
                    vars.insert("style_description".to_string(), description);
                    self.prompts
                        .render_with_custom(&self.prompts.thumbnail.style_replicate, &vars)
                }
                Err(e) => {
                    warn!("Reference image analysis failed, using file-name hint: {}", e);
                    let mut vars = HashMap::new();
                    vars.insert("file_name".to_string(), image.name.clone());
                    vars.insert("style".to_string(), request.style.to_string());
                    self.prompts
                        .render_with_custom(&self.prompts.thumbnail.style_fallback, &vars)
                }
            },
        };

        let prompt = build_thumbnail_prompt(&self.prompts, request, &style_guidance);
        let wire_request = PredictRequest {
            instances: vec![ImageInstance { prompt }],
            parameters: ImageParameters {
                sample_count: 1,
                aspect_ratio: request.size.aspect_ratio().as_str().to_string(),
                output_mime_type: "image/jpeg".to_string(),
            },
        };

        let response = self
            .predict(&self.image_model, &wire_request, "thumbnail generation")
            .await?;

        let Some(prediction) = response
            .predictions
            .into_iter()
            .find(|p| p.bytes_base64_encoded.is_some())
        else {
            warn!("Image generation returned no image");
            return Ok(None);
        };

        let payload = prediction.bytes_base64_encoded.unwrap_or_default();
        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| SkrivError::Parse(format!("thumbnail payload: {}", e)))?;
        let media_type = prediction
            .mime_type
            .unwrap_or_else(|| "image/jpeg".to_string());

        info!("Generated thumbnail ({} bytes)", bytes.len());
        Ok(Some(ThumbnailAsset::new(bytes, media_type, request.size)))
    }

    #[instrument(skip(self, request), fields(voice = %request.voice))]
    async fn generate_voice(&self, request: &VoiceRequest) -> Result<Option<PcmBuffer>> {
        self.synthesize(&request.text, request.voice, "voice generation")
            .await
    }

    #[instrument(skip(self), fields(voice = %voice))]
    async fn generate_demo_voice(&self, voice: Voice) -> Result<Option<PcmBuffer>> {
        let demo_text = self.prompts.voice.demo_text.clone();
        self.synthesize(&demo_text, voice, "demo voice generation")
            .await
    }
}

impl GeminiGenerator {
    async fn synthesize(
        &self,
        text: &str,
        voice: Voice,
        operation: &str,
    ) -> Result<Option<PcmBuffer>> {
        let wire_request = GenerateContentRequest::speech(text, voice.provider_name());

        let response = self
            .generate_content(&self.tts_model, &wire_request, operation)
            .await?;

        let Some(inline) = response.first_inline_data() else {
            warn!("{} returned no audio payload", operation);
            return Ok(None);
        };

        let bytes = BASE64
            .decode(inline.data.trim())
            .map_err(|e| SkrivError::Parse(format!("audio payload: {}", e)))?;
        let buffer = decode_pcm16(&bytes, TTS_SAMPLE_RATE, 1)?;

        info!(
            "Synthesized {:.1}s of audio with voice {}",
            buffer.duration_seconds(),
            voice
        );
        Ok(Some(buffer))
    }
}

/// Build the title generation prompt.
pub(crate) fn build_title_prompt(prompts: &Prompts, request: &TitleRequest) -> String {
    let mut vars = HashMap::new();
    vars.insert("content".to_string(), request.content.clone());
    vars.insert("language".to_string(), request.language.to_string());
    vars.insert("topic".to_string(), request.topic.to_string());
    vars.insert("count".to_string(), request.count.to_string());
    prompts.render_with_custom(&prompts.titles.user, &vars)
}

/// Build the script generation prompt, branching on whether the script
/// is derived from original content or generated freely.
pub(crate) fn build_script_prompt(prompts: &Prompts, request: &ScriptRequest) -> String {
    let mut vars = HashMap::new();
    vars.insert("title".to_string(), request.title.clone());
    vars.insert("language".to_string(), request.language.to_string());
    vars.insert(
        "section_count".to_string(),
        request.section_count.to_string(),
    );
    vars.insert(
        "words_per_section".to_string(),
        request.words_per_section.to_string(),
    );
    vars.insert("mode".to_string(), request.mode.prompt_label().to_string());

    let guidance_template = match &request.original_content {
        Some(content) => {
            vars.insert("original_content".to_string(), content.clone());
            &prompts.script.derived_guidance
        }
        None => &prompts.script.free_guidance,
    };
    let guidance = prompts.render_with_custom(guidance_template, &vars);

    vars.insert("content_guidance".to_string(), guidance);
    prompts.render_with_custom(&prompts.script.user, &vars)
}

/// Build the SEO generation prompt.
pub(crate) fn build_seo_prompt(prompts: &Prompts, request: &SeoRequest) -> String {
    let mut vars = HashMap::new();
    vars.insert("title".to_string(), request.title.clone());
    vars.insert(
        "script_excerpt".to_string(),
        request.script_excerpt.clone(),
    );
    vars.insert("language".to_string(), request.language.to_string());
    prompts.render_with_custom(&prompts.seo.user, &vars)
}

/// Build the image prompt generation prompt.
pub(crate) fn build_image_prompt_prompt(
    prompts: &Prompts,
    request: &ImagePromptRequest,
) -> String {
    let mut vars = HashMap::new();
    vars.insert("script".to_string(), request.script.clone());
    vars.insert(
        "prompts_per_section".to_string(),
        request.prompts_per_section.to_string(),
    );
    vars.insert("language".to_string(), request.language.to_string());
    vars.insert("style".to_string(), request.style.to_string());
    prompts.render_with_custom(&prompts.image_prompts.user, &vars)
}

/// Build the thumbnail generation prompt from resolved style guidance.
pub(crate) fn build_thumbnail_prompt(
    prompts: &Prompts,
    request: &ThumbnailRequest,
    style_guidance: &str,
) -> String {
    let watermark_block = match &request.watermark {
        Some(text) => {
            let mut vars = HashMap::new();
            vars.insert("watermark_text".to_string(), text.clone());
            prompts.render_with_custom(&prompts.thumbnail.watermark, &vars)
        }
        None => String::new(),
    };

    let mut vars = HashMap::new();
    vars.insert("title".to_string(), request.title.clone());
    vars.insert(
        "script_excerpt".to_string(),
        request.script_excerpt.clone(),
    );
    vars.insert("language".to_string(), request.language.to_string());
    vars.insert("style_guidance".to_string(), style_guidance.to_string());
    vars.insert("watermark_block".to_string(), watermark_block);
    prompts.render_with_custom(&prompts.thumbnail.user, &vars)
}

/// Character-bounded preview of a response body for error messages.
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomizationMode, ImageStyle, Language, ThumbnailSize, Topic};

    fn script_request(mode: CustomizationMode, original: Option<&str>) -> ScriptRequest {
        ScriptRequest {
            title: "The Forgotten Kingdom".to_string(),
            section_count: 5,
            words_per_section: 500,
            language: Language::English,
            mode,
            original_content: original.map(str::to_string),
        }
    }

    #[test]
    fn test_title_prompt_embeds_parameters() {
        let request = TitleRequest {
            content: "ancient trade routes".to_string(),
            language: Language::English,
            topic: Topic::History,
            count: 7,
        };
        let prompt = build_title_prompt(&Prompts::default(), &request);
        assert!(prompt.contains("ancient trade routes"));
        assert!(prompt.contains("\"History\""));
        assert!(prompt.contains("create 7 compelling YouTube titles"));
    }

    #[test]
    fn test_script_prompt_branches_on_original_content() {
        let prompts = Prompts::default();
        let derived = build_script_prompt(
            &prompts,
            &script_request(CustomizationMode::Expand, Some("source material here")),
        );
        let free = build_script_prompt(&prompts, &script_request(CustomizationMode::Expand, None));

        assert!(derived.contains("ORIGINAL CONTENT"));
        assert!(derived.contains("source material here"));
        assert!(!free.contains("ORIGINAL CONTENT"));
        assert!(free.contains("Create the content freely"));
    }

    #[test]
    fn test_script_prompt_distinct_per_mode() {
        let prompts = Prompts::default();
        let rendered: Vec<String> = CustomizationMode::ALL
            .iter()
            .map(|mode| build_script_prompt(&prompts, &script_request(*mode, Some("src"))))
            .collect();

        assert_ne!(rendered[0], rendered[1]);
        assert_ne!(rendered[1], rendered[2]);
        assert_ne!(rendered[0], rendered[2]);
        assert!(rendered[1].contains("\"Retain 70%\""));
    }

    #[test]
    fn test_thumbnail_prompt_watermark_block() {
        let prompts = Prompts::default();
        let mut request = ThumbnailRequest {
            title: "T".to_string(),
            script_excerpt: "summary".to_string(),
            size: ThumbnailSize::Wide720,
            language: Language::English,
            style: ImageStyle::Cinematic,
            reference: None,
            watermark: Some("ND Studio".to_string()),
        };

        let with = build_thumbnail_prompt(&prompts, &request, "style block");
        assert!(with.contains("Watermark Requirement"));
        assert!(with.contains("ND Studio"));

        request.watermark = None;
        let without = build_thumbnail_prompt(&prompts, &request, "style block");
        assert!(!without.contains("Watermark Requirement"));
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let text = "x".repeat(600);
        let shortened = preview(&text, 500);
        assert!(shortened.ends_with("..."));
        assert_eq!(shortened.chars().count(), 503);
        assert_eq!(preview("short", 500), "short");
    }
}
