//! Generation gateway for the external generative-AI provider.
//!
//! One operation per content kind, each a single request/normalize round
//! trip. The [`Generator`] trait is the narrow capability boundary the
//! pipeline depends on; [`GeminiGenerator`] is the real implementation and
//! [`FakeGenerator`] a deterministic substitute for tests and offline
//! dry runs.

mod fake;
mod gemini;
mod wire;

pub use fake::FakeGenerator;
pub use gemini::GeminiGenerator;

use crate::audio::PcmBuffer;
use crate::config::{CustomizationMode, ImageStyle, Language, ThumbnailSize, Topic, Voice};
use crate::error::Result;
use crate::session::{ReferenceImage, SeoRecord, ThumbnailAsset, TitleCandidate};
use async_trait::async_trait;

/// Parameters for title batch generation.
#[derive(Debug, Clone)]
pub struct TitleRequest {
    pub content: String,
    pub language: Language,
    pub topic: Topic,
    pub count: u8,
}

/// Parameters for script generation.
#[derive(Debug, Clone)]
pub struct ScriptRequest {
    pub title: String,
    pub section_count: u8,
    pub words_per_section: u32,
    pub language: Language,
    pub mode: CustomizationMode,
    /// Source material to derive the script from; `None` requests free
    /// generation from the title alone.
    pub original_content: Option<String>,
}

/// Parameters for SEO metadata generation.
#[derive(Debug, Clone)]
pub struct SeoRequest {
    pub title: String,
    /// Character-bounded script prefix; a bound on prompt size.
    pub script_excerpt: String,
    pub language: Language,
}

/// Parameters for image prompt generation.
#[derive(Debug, Clone)]
pub struct ImagePromptRequest {
    pub script: String,
    pub prompts_per_section: u8,
    pub language: Language,
    pub style: ImageStyle,
}

/// Parameters for thumbnail generation.
#[derive(Debug, Clone)]
pub struct ThumbnailRequest {
    pub title: String,
    pub script_excerpt: String,
    pub size: ThumbnailSize,
    pub language: Language,
    pub style: ImageStyle,
    pub reference: Option<ReferenceImage>,
    /// Watermark text rendered into the image by the provider; `None`
    /// when the watermark is disabled or empty.
    pub watermark: Option<String>,
}

/// Parameters for narration synthesis.
#[derive(Debug, Clone)]
pub struct VoiceRequest {
    pub text: String,
    pub voice: Voice,
}

/// The external generative capability, one operation per content kind.
///
/// All operations are fallible and single-shot. Transport and provider
/// errors surface as [`crate::SkrivError::Generation`]; malformed
/// structured responses as [`crate::SkrivError::Parse`]. Implementations
/// never touch pipeline state.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate_titles(&self, request: &TitleRequest) -> Result<Vec<TitleCandidate>>;

    async fn generate_script(&self, request: &ScriptRequest) -> Result<String>;

    async fn generate_seo(&self, request: &SeoRequest) -> Result<SeoRecord>;

    async fn generate_image_prompts(&self, request: &ImagePromptRequest) -> Result<Vec<String>>;

    /// Returns `None` when the provider yields no image.
    async fn generate_thumbnail(&self, request: &ThumbnailRequest)
        -> Result<Option<ThumbnailAsset>>;

    /// Returns `None` when the provider yields no audio.
    async fn generate_voice(&self, request: &VoiceRequest) -> Result<Option<PcmBuffer>>;

    /// Synthesize the fixed demo sentence with the given voice.
    async fn generate_demo_voice(&self, voice: Voice) -> Result<Option<PcmBuffer>>;
}
