//! Deterministic generation gateway.
//!
//! Useful for tests and offline dry runs: every operation returns stable
//! canned output shaped like real provider responses, with no network
//! access.

use super::{
    Generator, ImagePromptRequest, ScriptRequest, SeoRequest, ThumbnailRequest, TitleRequest,
    VoiceRequest,
};
use crate::audio::{PcmBuffer, TTS_SAMPLE_RATE};
use crate::config::Voice;
use crate::error::Result;
use crate::session::{ScriptDocument, SeoRecord, ThumbnailAsset, TitleCandidate};
use async_trait::async_trait;

/// Section headings cycled through generated scripts.
const HEADINGS: [&str; 10] = [
    "The Hidden Beginning",
    "What Everyone Overlooked",
    "A Turning Point Nobody Expected",
    "The Price of Silence",
    "Voices From the Archive",
    "When the Evidence Surfaced",
    "The Pattern Behind the Chaos",
    "An Uncomfortable Truth",
    "What Happens Next",
    "The Lesson That Remains",
];

/// Minimal JPEG stream (SOI + EOI) standing in for a generated image.
const FAKE_JPEG: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xD9];

/// Deterministic in-process generator.
#[derive(Debug, Clone, Default)]
pub struct FakeGenerator;

impl FakeGenerator {
    pub fn new() -> Self {
        Self
    }

    fn tone(frames: usize) -> PcmBuffer {
        let samples: Vec<f32> = (0..frames)
            .map(|i| {
                let t = i as f32 / TTS_SAMPLE_RATE as f32;
                (t * 220.0 * 2.0 * std::f32::consts::PI).sin() * 0.3
            })
            .collect();
        PcmBuffer::new(TTS_SAMPLE_RATE, vec![samples]).expect("tone buffer is well formed")
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate_titles(&self, request: &TitleRequest) -> Result<Vec<TitleCandidate>> {
        let titles = (0..request.count)
            .map(|i| TitleCandidate {
                title: format!(
                    "{} Secrets of {} Nobody Talks About ({})",
                    [3, 5, 7][i as usize % 3],
                    request.topic,
                    request.language
                ),
                trend_score: (95 - i as i32 * 3) as f32,
            })
            .collect();
        Ok(titles)
    }

    async fn generate_script(&self, request: &ScriptRequest) -> Result<String> {
        let mut script = String::new();
        script.push_str(&request.title);
        script.push('\n');

        for section in 0..request.section_count as usize {
            script.push('\n');
            script.push_str(HEADINGS[section % HEADINGS.len()]);
            script.push('\n');
            script.push_str(&format!(
                "The {} account opens here, told in {} at a target of {} words.\n",
                request.mode.prompt_label(),
                request.language,
                request.words_per_section
            ));
            script.push('\n');
            script.push_str("A second paragraph carries the section to its close.\n");
        }

        Ok(script)
    }

    async fn generate_seo(&self, request: &SeoRequest) -> Result<SeoRecord> {
        Ok(SeoRecord {
            description: format!(
                "{}\n\nWatch until the end.\n\nSubscribe for more.",
                request.title
            ),
            hashtags: "#history #documentary #mystery".to_string(),
            tags: "history, documentary, mystery".to_string(),
        })
    }

    async fn generate_image_prompts(&self, request: &ImagePromptRequest) -> Result<Vec<String>> {
        let document = ScriptDocument::new(request.script.clone());
        let sections = document.sections();
        let mut prompts = Vec::new();
        for section in &sections {
            for shot in 0..request.prompts_per_section {
                prompts.push(format!(
                    "{} shot {} of \"{}\" with a high-contrast text overlay in {}",
                    request.style,
                    shot + 1,
                    section.heading,
                    request.language
                ));
            }
        }
        Ok(prompts)
    }

    async fn generate_thumbnail(
        &self,
        request: &ThumbnailRequest,
    ) -> Result<Option<ThumbnailAsset>> {
        Ok(Some(ThumbnailAsset::new(
            FAKE_JPEG.to_vec(),
            "image/jpeg",
            request.size,
        )))
    }

    async fn generate_voice(&self, request: &VoiceRequest) -> Result<Option<PcmBuffer>> {
        // Quarter second per thousand characters, at least half a second.
        let frames = (TTS_SAMPLE_RATE as usize / 4)
            .saturating_mul(1 + request.text.chars().count() / 1000)
            .max(TTS_SAMPLE_RATE as usize / 2);
        Ok(Some(Self::tone(frames)))
    }

    async fn generate_demo_voice(&self, _voice: Voice) -> Result<Option<PcmBuffer>> {
        Ok(Some(Self::tone(TTS_SAMPLE_RATE as usize / 4)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CustomizationMode, ImageStyle, Language, Topic};

    #[tokio::test]
    async fn test_titles_are_deterministic() {
        let generator = FakeGenerator::new();
        let request = TitleRequest {
            content: "anything".to_string(),
            language: Language::English,
            topic: Topic::History,
            count: 5,
        };

        let first = generator.generate_titles(&request).await.unwrap();
        let second = generator.generate_titles(&request).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
        assert!(first[0].trend_score > first[4].trend_score);
    }

    #[tokio::test]
    async fn test_script_has_requested_sections() {
        let generator = FakeGenerator::new();
        let request = ScriptRequest {
            title: "A Title".to_string(),
            section_count: 7,
            words_per_section: 500,
            language: Language::English,
            mode: CustomizationMode::Expand,
            original_content: None,
        };

        let script = generator.generate_script(&request).await.unwrap();
        let document = ScriptDocument::new(script);
        assert_eq!(document.title_line(), Some("A Title"));
        assert_eq!(document.section_count(), 7);
    }

    #[tokio::test]
    async fn test_image_prompts_scale_with_sections() {
        let generator = FakeGenerator::new();
        let script = generator
            .generate_script(&ScriptRequest {
                title: "A Title".to_string(),
                section_count: 5,
                words_per_section: 500,
                language: Language::English,
                mode: CustomizationMode::Expand,
                original_content: None,
            })
            .await
            .unwrap();

        let prompts = generator
            .generate_image_prompts(&ImagePromptRequest {
                script,
                prompts_per_section: 2,
                language: Language::English,
                style: ImageStyle::Cinematic,
            })
            .await
            .unwrap();

        assert_eq!(prompts.len(), 10);
    }

    #[tokio::test]
    async fn test_voice_is_mono_at_tts_rate() {
        let generator = FakeGenerator::new();
        let buffer = generator
            .generate_voice(&VoiceRequest {
                text: "Hello there.".to_string(),
                voice: Voice::Kore,
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(buffer.sample_rate(), TTS_SAMPLE_RATE);
        assert_eq!(buffer.channel_count(), 1);
        assert!(buffer.frames() >= TTS_SAMPLE_RATE as usize / 2);
    }
}
