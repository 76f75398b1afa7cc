//! Voices command implementation: list voices or synthesize a demo.

use crate::audio::encode_wav;
use crate::cli::Output;
use crate::config::{Prompts, Settings, Voice};
use crate::gemini;
use crate::provider::{GeminiGenerator, Generator};
use anyhow::Result;
use std::path::PathBuf;

/// Run the voices command.
pub async fn run_voices(
    demo: Option<Voice>,
    output: Option<PathBuf>,
    settings: Settings,
) -> Result<()> {
    let Some(voice) = demo else {
        Output::header("Available voices");
        for voice in Voice::ALL {
            if voice == settings.production.voice {
                Output::list_item(&format!("{} (default)", voice));
            } else {
                Output::list_item(&voice.to_string());
            }
        }
        Output::info("Synthesize a sample with: skriv voices --demo <voice>");
        return Ok(());
    };

    if !gemini::is_api_key_configured() {
        Output::error(&format!("{} is not set.", gemini::API_KEY_ENV));
        anyhow::bail!("missing API key");
    }

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let provider = GeminiGenerator::new(&settings.provider)?.with_prompts(prompts);

    let spinner = Output::spinner(&format!("Synthesizing demo with voice {}...", voice));
    let result = provider.generate_demo_voice(voice).await;
    spinner.finish_and_clear();

    match result? {
        Some(buffer) => {
            let wav = encode_wav(&buffer)?;
            let path = output.unwrap_or_else(|| {
                PathBuf::from(format!("demo_{}.wav", voice.to_string().to_lowercase()))
            });
            std::fs::write(&path, &wav)?;
            Output::success(&format!(
                "Wrote {} ({:.1}s of audio)",
                path.display(),
                buffer.duration_seconds()
            ));
        }
        None => {
            Output::error("The provider returned no demo audio.");
        }
    }

    Ok(())
}
