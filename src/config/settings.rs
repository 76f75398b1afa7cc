//! Configuration settings for Skriv.

use super::options::{
    validate_section_count, validate_title_count, validate_words_per_section, CustomizationMode,
    ImageStyle, Language, ThumbnailSize, Topic, Voice,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub provider: ProviderSettings,
    pub production: ProductionDefaults,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Directory where finished archives are written.
    pub output_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.skriv".to_string(),
            output_dir: ".".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Generative provider settings: model selection per modality.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Base URL of the provider REST API.
    pub api_base: String,
    /// Model for long-form text generation (titles, scripts).
    pub text_model: String,
    /// Model for lighter structured calls (SEO, image prompts, vision).
    pub fast_model: String,
    /// Image generation model.
    pub image_model: String,
    /// Speech synthesis model.
    pub tts_model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            text_model: "gemini-2.5-pro".to_string(),
            fast_model: "gemini-2.5-flash".to_string(),
            image_model: "imagen-4.0-generate-001".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            timeout_seconds: 300,
        }
    }
}

/// Default stage options for a new production session.
///
/// Every field can be overridden per run from the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionDefaults {
    pub language: Language,
    pub topic: Topic,
    /// Title candidates per batch (3, 5, 7 or 10).
    pub title_count: u8,
    /// Script sections (5..=20).
    pub section_count: u8,
    /// Target words per section (500, 700, 1000 or 1500).
    pub words_per_section: u32,
    pub customization: CustomizationMode,
    /// Image prompts generated per script section.
    pub prompts_per_section: u8,
    pub image_style: ImageStyle,
    pub thumbnail_size: ThumbnailSize,
    pub voice: Voice,
}

impl Default for ProductionDefaults {
    fn default() -> Self {
        Self {
            language: Language::Vietnamese,
            topic: Topic::History,
            title_count: 5,
            section_count: 5,
            words_per_section: 500,
            customization: CustomizationMode::Expand,
            prompts_per_section: 1,
            image_style: ImageStyle::Cinematic,
            thumbnail_size: ThumbnailSize::Wide720,
            voice: Voice::Kore,
        }
    }
}

impl ProductionDefaults {
    /// Check numeric options against the recognized sets.
    pub fn validate(&self) -> crate::error::Result<()> {
        validate_title_count(self.title_count)
            .map_err(crate::error::SkrivError::Config)?;
        validate_section_count(self.section_count)
            .map_err(crate::error::SkrivError::Config)?;
        validate_words_per_section(self.words_per_section)
            .map_err(crate::error::SkrivError::Config)?;
        if self.prompts_per_section == 0 {
            return Err(crate::error::SkrivError::Config(
                "prompts_per_section must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.production.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SkrivError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skriv")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded archive output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.production.validate().is_ok());
        assert_eq!(settings.production.title_count, 5);
        assert_eq!(settings.production.words_per_section, 500);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.production.language, settings.production.language);
        assert_eq!(parsed.provider.text_model, settings.provider.text_model);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[production]\nlanguage = \"english\"\ntitle_count = 7\n",
        )
        .unwrap();

        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.production.language, Language::English);
        assert_eq!(settings.production.title_count, 7);
        // Untouched sections keep their defaults
        assert_eq!(settings.production.section_count, 5);
    }

    #[test]
    fn test_load_rejects_unrecognized_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[production]\ntitle_count = 4\n").unwrap();
        assert!(Settings::load_from(Some(&path)).is_err());
    }
}
