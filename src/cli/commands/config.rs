//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            let mut settings = settings;
            set_key(&mut settings, key, value)?;
            settings.production.validate()?;
            settings.save()?;
            Output::success(&format!("Set {} = {}", key, value));
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save()?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(&config_path)
                .status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Apply a single `key = value` assignment to the settings.
fn set_key(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "general.data_dir" => settings.general.data_dir = value.to_string(),
        "general.output_dir" => settings.general.output_dir = value.to_string(),
        "general.log_level" => settings.general.log_level = value.to_string(),
        "provider.api_base" => settings.provider.api_base = value.to_string(),
        "provider.text_model" => settings.provider.text_model = value.to_string(),
        "provider.fast_model" => settings.provider.fast_model = value.to_string(),
        "provider.image_model" => settings.provider.image_model = value.to_string(),
        "provider.tts_model" => settings.provider.tts_model = value.to_string(),
        "provider.timeout_seconds" => settings.provider.timeout_seconds = value.parse()?,
        "production.language" => {
            settings.production.language = value.parse().map_err(anyhow::Error::msg)?
        }
        "production.topic" => {
            settings.production.topic = value.parse().map_err(anyhow::Error::msg)?
        }
        "production.title_count" => settings.production.title_count = value.parse()?,
        "production.section_count" => settings.production.section_count = value.parse()?,
        "production.words_per_section" => {
            settings.production.words_per_section = value.parse()?
        }
        "production.customization" => {
            settings.production.customization = value.parse().map_err(anyhow::Error::msg)?
        }
        "production.prompts_per_section" => {
            settings.production.prompts_per_section = value.parse()?
        }
        "production.image_style" => {
            settings.production.image_style = value.parse().map_err(anyhow::Error::msg)?
        }
        "production.thumbnail_size" => {
            settings.production.thumbnail_size = value.parse().map_err(anyhow::Error::msg)?
        }
        "production.voice" => {
            settings.production.voice = value.parse().map_err(anyhow::Error::msg)?
        }
        _ => anyhow::bail!(
            "unknown configuration key: {} (see 'skriv config show' for the available keys)",
            key
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Language, Voice};

    #[test]
    fn test_set_key_enum_values() {
        let mut settings = Settings::default();
        set_key(&mut settings, "production.language", "english").unwrap();
        set_key(&mut settings, "production.voice", "zephyr").unwrap();
        assert_eq!(settings.production.language, Language::English);
        assert_eq!(settings.production.voice, Voice::Zephyr);
    }

    #[test]
    fn test_set_key_rejects_unknown() {
        let mut settings = Settings::default();
        assert!(set_key(&mut settings, "production.unknown", "x").is_err());
        assert!(set_key(&mut settings, "production.language", "klingon").is_err());
    }
}
