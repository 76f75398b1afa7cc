//! Titles command implementation: one-shot title generation.

use super::read_source;
use crate::cli::Output;
use crate::config::{Language, Prompts, Settings, Topic};
use crate::gemini;
use crate::provider::{GeminiGenerator, Generator, TitleRequest};
use anyhow::Result;
use std::path::Path;

/// Run the titles command.
pub async fn run_titles(
    input: Option<&str>,
    file: Option<&Path>,
    language: Option<Language>,
    topic: Option<Topic>,
    count: Option<u8>,
    settings: Settings,
) -> Result<()> {
    let source = read_source(input, file)?;
    if source.text.trim().is_empty() {
        Output::error("Source content is empty.");
        anyhow::bail!("empty source content");
    }

    if !gemini::is_api_key_configured() {
        Output::error(&format!("{} is not set.", gemini::API_KEY_ENV));
        Output::info("Run 'skriv doctor' for diagnostics.");
        anyhow::bail!("missing API key");
    }

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let provider = GeminiGenerator::new(&settings.provider)?.with_prompts(prompts);

    let request = TitleRequest {
        content: source.text,
        language: language.unwrap_or(settings.production.language),
        topic: topic.unwrap_or(settings.production.topic),
        count: count.unwrap_or(settings.production.title_count),
    };

    let spinner = Output::spinner("Generating titles...");
    let result = provider.generate_titles(&request).await;
    spinner.finish_and_clear();

    let titles = result?;
    if titles.is_empty() {
        Output::warning("The provider returned no title candidates.");
        return Ok(());
    }

    Output::header("Title candidates");
    for (i, candidate) in titles.iter().enumerate() {
        Output::title_candidate(i + 1, &candidate.title, candidate.trend_score);
    }

    Ok(())
}
