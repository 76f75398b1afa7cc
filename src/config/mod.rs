//! Configuration module for Skriv.
//!
//! Handles loading and managing application settings, stage option
//! enumerations, and prompt templates.

mod options;
mod prompts;
mod settings;

pub use options::{
    validate_section_count, validate_title_count, validate_words_per_section, AspectRatio,
    CustomizationMode, ImageStyle, Language, ThumbnailSize, Topic, Voice, SECTION_COUNT_RANGE,
    TITLE_COUNTS, WORDS_PER_SECTION,
};
pub use prompts::{
    ImagePromptPrompts, Prompts, ScriptPrompts, SeoPrompts, ThumbnailPrompts, TitlePrompts,
    VoicePrompts,
};
pub use settings::{
    GeneralSettings, ProductionDefaults, PromptSettings, ProviderSettings, Settings,
};
