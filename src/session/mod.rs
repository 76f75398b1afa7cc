//! Production session state and stage entities.
//!
//! A [`ProductionSession`] aggregates the committed output and chosen
//! configuration of every pipeline stage. It lives for one production run
//! and is never persisted. Each stage owns a disjoint slice of the
//! session; commits replace a slice wholesale.

mod script;

pub use script::{ScriptDocument, ScriptSection};

use crate::audio::PcmBuffer;
use crate::config::{
    AspectRatio, CustomizationMode, ImageStyle, Language, ProductionDefaults, ThumbnailSize,
    Topic, Voice,
};
use crate::error::{Result, SkrivError};
use serde::{Deserialize, Serialize};

/// Source inputs above this word count unlock customization and are sent
/// to the provider as original content for the script.
pub const CUSTOMIZATION_WORD_THRESHOLD: usize = 50;

/// Count whitespace-separated words in a text.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A generated title candidate with its predicted trend score (0-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleCandidate {
    pub title: String,
    #[serde(rename = "trendScore")]
    pub trend_score: f32,
}

/// SEO metadata derived from a committed script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoRecord {
    pub description: String,
    /// Space-separated tokens, each prefixed with `#`.
    pub hashtags: String,
    /// Comma-separated keywords.
    pub tags: String,
}

/// An uploaded reference image used to steer thumbnail style.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceImage {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// A generated thumbnail: raw encoded image bytes plus the requested
/// dimensions and aspect class.
///
/// Binary assets are held as raw bytes internally; base64 encoding only
/// happens at the provider wire boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailAsset {
    bytes: Vec<u8>,
    media_type: String,
    width: u32,
    height: u32,
    aspect: AspectRatio,
}

impl ThumbnailAsset {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>, size: ThumbnailSize) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            width: size.width(),
            height: size.height(),
            aspect: size.aspect_ratio(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> AspectRatio {
        self.aspect
    }
}

/// Stage 1 state: source material and title generation.
#[derive(Debug, Clone)]
pub struct SourceState {
    /// Free text or uploaded-file contents used as source material.
    pub input: String,
    /// Name of the uploaded source file, if any.
    pub file_name: Option<String>,
    pub language: Language,
    pub topic: Topic,
    pub title_count: u8,
    /// Most recently generated title batch.
    pub titles: Vec<TitleCandidate>,
    /// Title chosen by the user; always an element of a generated batch.
    pub selected: Option<TitleCandidate>,
}

/// Stage 2 state: script configuration and document.
#[derive(Debug, Clone)]
pub struct ScriptState {
    pub section_count: u8,
    pub words_per_section: u32,
    pub customization: CustomizationMode,
    pub document: ScriptDocument,
}

/// Stage 3 state: SEO metadata.
#[derive(Debug, Clone, Default)]
pub struct SeoState {
    pub record: Option<SeoRecord>,
}

/// Stage 4 state: image prompt configuration and output.
#[derive(Debug, Clone)]
pub struct ImagePromptState {
    pub prompts_per_section: u8,
    pub style: ImageStyle,
    pub prompts: Vec<String>,
}

/// Stage 5 state: thumbnail configuration and asset.
#[derive(Debug, Clone)]
pub struct ThumbnailState {
    pub size: ThumbnailSize,
    pub reference: Option<ReferenceImage>,
    pub watermark_enabled: bool,
    pub watermark_text: String,
    pub asset: Option<ThumbnailAsset>,
}

/// Stage 6 state: narration voice and track.
#[derive(Debug, Clone)]
pub struct VoiceState {
    pub voice: Voice,
    pub track: Option<PcmBuffer>,
}

/// In-memory aggregate of all stage state for one production run.
#[derive(Debug, Clone)]
pub struct ProductionSession {
    pub source: SourceState,
    pub script: ScriptState,
    pub seo: SeoState,
    pub image_prompts: ImagePromptState,
    pub thumbnail: ThumbnailState,
    pub voice: VoiceState,
}

impl ProductionSession {
    /// Create a fresh session seeded with configured defaults.
    pub fn new(defaults: &ProductionDefaults) -> Self {
        Self {
            source: SourceState {
                input: String::new(),
                file_name: None,
                language: defaults.language,
                topic: defaults.topic,
                title_count: defaults.title_count,
                titles: Vec::new(),
                selected: None,
            },
            script: ScriptState {
                section_count: defaults.section_count,
                words_per_section: defaults.words_per_section,
                customization: defaults.customization,
                document: ScriptDocument::default(),
            },
            seo: SeoState::default(),
            image_prompts: ImagePromptState {
                prompts_per_section: defaults.prompts_per_section,
                style: defaults.image_style,
                prompts: Vec::new(),
            },
            thumbnail: ThumbnailState {
                size: defaults.thumbnail_size,
                reference: None,
                watermark_enabled: false,
                watermark_text: String::new(),
                asset: None,
            },
            voice: VoiceState {
                voice: defaults.voice,
                track: None,
            },
        }
    }

    /// Whether the source input unlocks the customization selector.
    pub fn customization_enabled(&self) -> bool {
        word_count(&self.source.input) > CUSTOMIZATION_WORD_THRESHOLD
    }

    /// The customization mode actually sent to the provider.
    ///
    /// Below the word threshold the selector is inert and the default
    /// mode is used regardless of any prior selection.
    pub fn effective_customization(&self) -> CustomizationMode {
        if self.customization_enabled() {
            self.script.customization
        } else {
            CustomizationMode::default()
        }
    }

    /// Source text to derive the script from, when long enough.
    pub fn original_content(&self) -> Option<String> {
        if self.customization_enabled() {
            Some(self.source.input.clone())
        } else {
            None
        }
    }

    /// Select a title from the current batch by index.
    pub fn select_title(&mut self, index: usize) -> Result<&TitleCandidate> {
        if self.source.titles.is_empty() {
            return Err(SkrivError::Validation(
                "no title batch has been generated yet".to_string(),
            ));
        }
        let candidate = self
            .source
            .titles
            .get(index)
            .ok_or_else(|| {
                SkrivError::Validation(format!(
                    "title index {} out of range (batch has {} candidates)",
                    index,
                    self.source.titles.len()
                ))
            })?
            .clone();
        Ok(&*self.source.selected.insert(candidate))
    }

    /// Title text of the current selection, if any.
    pub fn selected_title(&self) -> Option<&str> {
        self.source.selected.as_ref().map(|t| t.title.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ProductionSession {
        ProductionSession::new(&ProductionDefaults::default())
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_customization_gate() {
        let mut s = session();
        s.script.customization = CustomizationMode::Deepen;

        s.source.input = words(50);
        assert!(!s.customization_enabled());
        assert_eq!(s.effective_customization(), CustomizationMode::Expand);
        assert!(s.original_content().is_none());

        s.source.input = words(51);
        assert!(s.customization_enabled());
        assert_eq!(s.effective_customization(), CustomizationMode::Deepen);
        assert!(s.original_content().is_some());
    }

    #[test]
    fn test_select_title_requires_batch() {
        let mut s = session();
        assert!(matches!(
            s.select_title(0),
            Err(SkrivError::Validation(_))
        ));
    }

    #[test]
    fn test_select_title_by_index() {
        let mut s = session();
        s.source.titles = vec![
            TitleCandidate {
                title: "First".to_string(),
                trend_score: 70.0,
            },
            TitleCandidate {
                title: "Second".to_string(),
                trend_score: 90.0,
            },
        ];

        assert!(s.select_title(2).is_err());
        let picked = s.select_title(1).unwrap();
        assert_eq!(picked.title, "Second");
        assert_eq!(s.selected_title(), Some("Second"));
    }
}
