//! Recognized option sets for the production stages.
//!
//! Every stage option is a closed enumeration; free-form values are
//! rejected at the CLI and configuration boundaries.

use serde::{Deserialize, Serialize};

/// Output language for all generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Vietnamese,
    English,
    Spanish,
    French,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Vietnamese,
        Language::English,
        Language::Spanish,
        Language::French,
    ];
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vietnamese" | "vi" => Ok(Language::Vietnamese),
            "english" | "en" => Ok(Language::English),
            "spanish" | "es" => Ok(Language::Spanish),
            "french" | "fr" => Ok(Language::French),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Vietnamese => write!(f, "Vietnamese"),
            Language::English => write!(f, "English"),
            Language::Spanish => write!(f, "Spanish"),
            Language::French => write!(f, "French"),
        }
    }
}

/// Content category used to steer title generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    #[default]
    History,
    Finance,
    Health,
    Technology,
    Science,
    Entertainment,
    Sports,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::History,
        Topic::Finance,
        Topic::Health,
        Topic::Technology,
        Topic::Science,
        Topic::Entertainment,
        Topic::Sports,
    ];
}

impl std::str::FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "history" => Ok(Topic::History),
            "finance" => Ok(Topic::Finance),
            "health" => Ok(Topic::Health),
            "technology" | "tech" => Ok(Topic::Technology),
            "science" => Ok(Topic::Science),
            "entertainment" => Ok(Topic::Entertainment),
            "sports" => Ok(Topic::Sports),
            _ => Err(format!("Unknown topic: {}", s)),
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topic::History => write!(f, "History"),
            Topic::Finance => write!(f, "Finance"),
            Topic::Health => write!(f, "Health"),
            Topic::Technology => write!(f, "Technology"),
            Topic::Science => write!(f, "Science"),
            Topic::Entertainment => write!(f, "Entertainment"),
            Topic::Sports => write!(f, "Sports"),
        }
    }
}

/// How script generation transforms its source material.
///
/// Only honored when the source input exceeds the word threshold; below
/// it the default mode is forced (the selector is inert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomizationMode {
    /// Expand the main ideas with examples and supporting detail.
    #[default]
    Expand,
    /// Distill the source, keeping roughly 70% of the core ideas.
    #[serde(rename = "retain-70")]
    RetainCore,
    /// Analyze in depth with expert-level terminology and arguments.
    Deepen,
}

impl CustomizationMode {
    pub const ALL: [CustomizationMode; 3] = [
        CustomizationMode::Expand,
        CustomizationMode::RetainCore,
        CustomizationMode::Deepen,
    ];

    /// Human-readable name embedded in provider prompts.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            CustomizationMode::Expand => "Expand",
            CustomizationMode::RetainCore => "Retain 70%",
            CustomizationMode::Deepen => "Deepen",
        }
    }
}

impl std::str::FromStr for CustomizationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expand" => Ok(CustomizationMode::Expand),
            "retain-70" | "retain70" | "retain" => Ok(CustomizationMode::RetainCore),
            "deepen" => Ok(CustomizationMode::Deepen),
            _ => Err(format!("Unknown customization mode: {}", s)),
        }
    }
}

impl std::fmt::Display for CustomizationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomizationMode::Expand => write!(f, "expand"),
            CustomizationMode::RetainCore => write!(f, "retain-70"),
            CustomizationMode::Deepen => write!(f, "deepen"),
        }
    }
}

/// Visual style applied to image prompts and thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    #[default]
    Cinematic,
    Photorealistic,
    Anime,
    #[serde(rename = "fantasy-art")]
    FantasyArt,
    #[serde(rename = "3d-render")]
    Render3d,
    Minimalist,
    Watercolor,
}

impl ImageStyle {
    pub const ALL: [ImageStyle; 7] = [
        ImageStyle::Cinematic,
        ImageStyle::Photorealistic,
        ImageStyle::Anime,
        ImageStyle::FantasyArt,
        ImageStyle::Render3d,
        ImageStyle::Minimalist,
        ImageStyle::Watercolor,
    ];
}

impl std::str::FromStr for ImageStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cinematic" => Ok(ImageStyle::Cinematic),
            "photorealistic" => Ok(ImageStyle::Photorealistic),
            "anime" => Ok(ImageStyle::Anime),
            "fantasy-art" | "fantasy art" => Ok(ImageStyle::FantasyArt),
            "3d-render" | "3d render" => Ok(ImageStyle::Render3d),
            "minimalist" => Ok(ImageStyle::Minimalist),
            "watercolor" => Ok(ImageStyle::Watercolor),
            _ => Err(format!("Unknown image style: {}", s)),
        }
    }
}

impl std::fmt::Display for ImageStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageStyle::Cinematic => write!(f, "Cinematic"),
            ImageStyle::Photorealistic => write!(f, "Photorealistic"),
            ImageStyle::Anime => write!(f, "Anime"),
            ImageStyle::FantasyArt => write!(f, "Fantasy Art"),
            ImageStyle::Render3d => write!(f, "3D Render"),
            ImageStyle::Minimalist => write!(f, "Minimalist"),
            ImageStyle::Watercolor => write!(f, "Watercolor"),
        }
    }
}

/// Aspect ratio class requested from the image model.
///
/// Mapped from the thumbnail dimensions by comparison, not by exact
/// ratio: wider than tall is 16:9, taller than wide is 9:16, square is
/// 1:1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Wide,
    Tall,
    Square,
}

impl AspectRatio {
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width > height {
            AspectRatio::Wide
        } else if width < height {
            AspectRatio::Tall
        } else {
            AspectRatio::Square
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Wide => "16:9",
            AspectRatio::Tall => "9:16",
            AspectRatio::Square => "1:1",
        }
    }
}

/// Requested thumbnail pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThumbnailSize {
    #[default]
    #[serde(rename = "1280x720")]
    Wide720,
    #[serde(rename = "1920x1080")]
    Wide1080,
    #[serde(rename = "1080x1920")]
    Portrait1080,
    #[serde(rename = "1080x1080")]
    Square1080,
}

impl ThumbnailSize {
    pub const ALL: [ThumbnailSize; 4] = [
        ThumbnailSize::Wide720,
        ThumbnailSize::Wide1080,
        ThumbnailSize::Portrait1080,
        ThumbnailSize::Square1080,
    ];

    pub fn width(&self) -> u32 {
        match self {
            ThumbnailSize::Wide720 => 1280,
            ThumbnailSize::Wide1080 => 1920,
            ThumbnailSize::Portrait1080 => 1080,
            ThumbnailSize::Square1080 => 1080,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            ThumbnailSize::Wide720 => 720,
            ThumbnailSize::Wide1080 => 1080,
            ThumbnailSize::Portrait1080 => 1920,
            ThumbnailSize::Square1080 => 1080,
        }
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        AspectRatio::from_dimensions(self.width(), self.height())
    }
}

impl std::str::FromStr for ThumbnailSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1280x720" => Ok(ThumbnailSize::Wide720),
            "1920x1080" => Ok(ThumbnailSize::Wide1080),
            "1080x1920" => Ok(ThumbnailSize::Portrait1080),
            "1080x1080" => Ok(ThumbnailSize::Square1080),
            _ => Err(format!(
                "Unknown thumbnail size: {} (expected one of 1280x720, 1920x1080, 1080x1920, 1080x1080)",
                s
            )),
        }
    }
}

impl std::fmt::Display for ThumbnailSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width(), self.height())
    }
}

/// Prebuilt narration voices offered by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    #[default]
    Kore,
    Puck,
    Charon,
    Fenrir,
    Zephyr,
}

impl Voice {
    pub const ALL: [Voice; 5] = [
        Voice::Kore,
        Voice::Puck,
        Voice::Charon,
        Voice::Fenrir,
        Voice::Zephyr,
    ];

    /// Provider-side voice identifier.
    pub fn provider_name(&self) -> &'static str {
        match self {
            Voice::Kore => "Kore",
            Voice::Puck => "Puck",
            Voice::Charon => "Charon",
            Voice::Fenrir => "Fenrir",
            Voice::Zephyr => "Zephyr",
        }
    }
}

impl std::str::FromStr for Voice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kore" => Ok(Voice::Kore),
            "puck" => Ok(Voice::Puck),
            "charon" => Ok(Voice::Charon),
            "fenrir" => Ok(Voice::Fenrir),
            "zephyr" => Ok(Voice::Zephyr),
            _ => Err(format!("Unknown voice: {}", s)),
        }
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.provider_name())
    }
}

/// Recognized title batch sizes.
pub const TITLE_COUNTS: [u8; 4] = [3, 5, 7, 10];

/// Recognized script section counts.
pub const SECTION_COUNT_RANGE: std::ops::RangeInclusive<u8> = 5..=20;

/// Recognized words-per-section targets.
pub const WORDS_PER_SECTION: [u32; 4] = [500, 700, 1000, 1500];

/// Validate a title batch size against the recognized set.
pub fn validate_title_count(count: u8) -> std::result::Result<u8, String> {
    if TITLE_COUNTS.contains(&count) {
        Ok(count)
    } else {
        Err(format!(
            "title count must be one of {:?}, got {}",
            TITLE_COUNTS, count
        ))
    }
}

/// Validate a section count against the recognized range.
pub fn validate_section_count(count: u8) -> std::result::Result<u8, String> {
    if SECTION_COUNT_RANGE.contains(&count) {
        Ok(count)
    } else {
        Err(format!(
            "section count must be in {}..={}, got {}",
            SECTION_COUNT_RANGE.start(),
            SECTION_COUNT_RANGE.end(),
            count
        ))
    }
}

/// Validate a words-per-section target against the recognized set.
pub fn validate_words_per_section(words: u32) -> std::result::Result<u32, String> {
    if WORDS_PER_SECTION.contains(&words) {
        Ok(words)
    } else {
        Err(format!(
            "words per section must be one of {:?}, got {}",
            WORDS_PER_SECTION, words
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_round_trip() {
        for language in Language::ALL {
            let parsed: Language = language.to_string().parse().unwrap();
            assert_eq!(parsed, language);
        }
    }

    #[test]
    fn test_mode_parses_aliases() {
        assert_eq!(
            "retain-70".parse::<CustomizationMode>().unwrap(),
            CustomizationMode::RetainCore
        );
        assert_eq!(
            "Expand".parse::<CustomizationMode>().unwrap(),
            CustomizationMode::Expand
        );
        assert!("condense".parse::<CustomizationMode>().is_err());
    }

    #[test]
    fn test_aspect_ratio_mapping() {
        assert_eq!(ThumbnailSize::Wide720.aspect_ratio().as_str(), "16:9");
        assert_eq!(ThumbnailSize::Wide1080.aspect_ratio().as_str(), "16:9");
        assert_eq!(ThumbnailSize::Portrait1080.aspect_ratio().as_str(), "9:16");
        assert_eq!(ThumbnailSize::Square1080.aspect_ratio().as_str(), "1:1");
    }

    #[test]
    fn test_thumbnail_size_rejects_unlisted_dimensions() {
        assert!("640x480".parse::<ThumbnailSize>().is_err());
        assert_eq!(
            "1080x1920".parse::<ThumbnailSize>().unwrap(),
            ThumbnailSize::Portrait1080
        );
    }

    #[test]
    fn test_numeric_option_validation() {
        assert!(validate_title_count(5).is_ok());
        assert!(validate_title_count(4).is_err());
        assert!(validate_section_count(5).is_ok());
        assert!(validate_section_count(21).is_err());
        assert!(validate_words_per_section(700).is_ok());
        assert!(validate_words_per_section(800).is_err());
    }
}
