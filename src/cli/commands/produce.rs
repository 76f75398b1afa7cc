//! Produce command implementation: the full production pipeline.

use super::read_source;
use crate::cli::{Output, ProduceArgs};
use crate::config::{Prompts, Settings};
use crate::gemini;
use crate::packager;
use crate::pipeline::Pipeline;
use crate::provider::{FakeGenerator, GeminiGenerator, Generator};
use crate::session::{word_count, ProductionSession, ReferenceImage, TitleCandidate};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// Run the produce command.
pub async fn run_produce(args: ProduceArgs, settings: Settings) -> Result<()> {
    let source = read_source(args.input.as_deref(), args.file.as_deref())?;

    if !args.offline && !gemini::is_api_key_configured() {
        Output::error(&format!("{} is not set.", gemini::API_KEY_ENV));
        Output::info("Run 'skriv doctor' for diagnostics, or pass --offline for a dry run.");
        anyhow::bail!("missing API key");
    }

    let provider: Arc<dyn Generator> = if args.offline {
        Output::info("Running offline against the deterministic generator.");
        Arc::new(FakeGenerator::new())
    } else {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;
        Arc::new(GeminiGenerator::new(&settings.provider)?.with_prompts(prompts))
    };

    let mut session = ProductionSession::new(&settings.production);
    session.source.input = source.text;
    session.source.file_name = source.file_name;
    apply_overrides(&mut session, &args)?;

    let mut pipeline = Pipeline::new(provider, session);

    // Stage 1: titles
    let spinner = Output::spinner("Generating titles...");
    let result = pipeline.generate_titles().await;
    spinner.finish_and_clear();
    let batch_len = {
        let titles = result?;
        if titles.is_empty() {
            Output::error("The provider returned no title candidates.");
            anyhow::bail!("empty title batch");
        }
        Output::header("Title candidates");
        for (i, candidate) in titles.iter().enumerate() {
            Output::title_candidate(i + 1, &candidate.title, candidate.trend_score);
        }
        titles.len()
    };

    let index = match args.select {
        Some(n) if (1..=batch_len).contains(&n) => n - 1,
        Some(n) => {
            anyhow::bail!("--select {} is out of range (1..={})", n, batch_len)
        }
        None => default_selection(&pipeline.session().source.titles),
    };
    pipeline.select_title(index)?;
    Output::success(&format!(
        "Selected title #{}: {}",
        index + 1,
        pipeline.session().selected_title().unwrap_or("")
    ));

    // Stage 2: script
    let spinner = Output::spinner("Generating script...");
    let result = pipeline.generate_script().await;
    spinner.finish_and_clear();
    let document = result?;
    Output::success(&format!(
        "Script generated ({} sections detected, {} words)",
        document.section_count(),
        word_count(document.text())
    ));

    // Stages 3-6 are independent given a committed script and title, so
    // the provider calls are issued concurrently; each commits (or is
    // reported failed) on its own.
    let pending_seo = (!args.skip_seo)
        .then(|| pipeline.begin_seo())
        .transpose()?;
    let pending_prompts = (!args.skip_prompts)
        .then(|| pipeline.begin_image_prompts())
        .transpose()?;
    let pending_thumbnail = (!args.skip_thumbnail)
        .then(|| pipeline.begin_thumbnail())
        .transpose()?;
    let pending_voice = (!args.skip_voice)
        .then(|| pipeline.begin_voice())
        .transpose()?;

    let provider = pipeline.provider();
    let spinner = Output::spinner("Generating SEO, image prompts, thumbnail and narration...");

    let seo_future = async {
        match &pending_seo {
            Some(p) => Some(provider.generate_seo(&p.request).await),
            None => None,
        }
    };
    let prompts_future = async {
        match &pending_prompts {
            Some(p) => Some(provider.generate_image_prompts(&p.request).await),
            None => None,
        }
    };
    let thumbnail_future = async {
        match &pending_thumbnail {
            Some(p) => Some(provider.generate_thumbnail(&p.request).await),
            None => None,
        }
    };
    let voice_future = async {
        match &pending_voice {
            Some(p) => Some(provider.generate_voice(&p.request).await),
            None => None,
        }
    };

    let (seo_out, prompts_out, thumbnail_out, voice_out) =
        futures::join!(seo_future, prompts_future, thumbnail_future, voice_future);
    spinner.finish_and_clear();

    let mut failures = 0;

    if let (Some(pending), Some(outcome)) = (pending_seo, seo_out) {
        match outcome {
            Ok(record) => {
                let _ = pipeline.commit_seo(pending.ticket, record);
                Output::success("SEO metadata generated.");
            }
            Err(e) => {
                failures += 1;
                Output::error(&format!("SEO generation failed: {}", e));
            }
        }
    }

    if let (Some(pending), Some(outcome)) = (pending_prompts, prompts_out) {
        match outcome {
            Ok(prompts) => {
                let count = prompts.len();
                let _ = pipeline.commit_image_prompts(pending.ticket, prompts);
                Output::success(&format!("{} image prompts generated.", count));
            }
            Err(e) => {
                failures += 1;
                Output::error(&format!("Image prompt generation failed: {}", e));
            }
        }
    }

    if let (Some(pending), Some(outcome)) = (pending_thumbnail, thumbnail_out) {
        match outcome {
            Ok(asset) => {
                if asset.is_none() {
                    Output::warning("The provider returned no thumbnail image.");
                } else {
                    Output::success("Thumbnail generated.");
                }
                let _ = pipeline.commit_thumbnail(pending.ticket, asset);
            }
            Err(e) => {
                failures += 1;
                Output::error(&format!("Thumbnail generation failed: {}", e));
            }
        }
    }

    if let (Some(pending), Some(outcome)) = (pending_voice, voice_out) {
        match outcome {
            Ok(track) => {
                match &track {
                    Some(buffer) => Output::success(&format!(
                        "Narration generated ({:.1}s of audio).",
                        buffer.duration_seconds()
                    )),
                    None => Output::warning("The provider returned no narration audio."),
                }
                let _ = pipeline.commit_voice(pending.ticket, track);
            }
            Err(e) => {
                failures += 1;
                Output::error(&format!("Voice generation failed: {}", e));
            }
        }
    }

    // Stage 7: package everything that committed
    let package = packager::package(pipeline.session())?;
    let out_dir = args.output.unwrap_or_else(|| settings.output_dir());
    std::fs::create_dir_all(&out_dir)?;
    let path = out_dir.join(&package.filename);
    std::fs::write(&path, &package.bytes)?;

    let entries = package.entry_names()?;
    Output::success(&format!(
        "Wrote {} ({} entries)",
        path.display(),
        entries.len()
    ));
    for name in &entries {
        Output::list_item(name);
    }
    if failures > 0 {
        Output::warning(&format!(
            "{} stage(s) failed; rerun to regenerate them.",
            failures
        ));
    }

    Ok(())
}

/// Apply CLI overrides on top of configured defaults.
fn apply_overrides(session: &mut ProductionSession, args: &ProduceArgs) -> Result<()> {
    if let Some(language) = args.language {
        session.source.language = language;
    }
    if let Some(topic) = args.topic {
        session.source.topic = topic;
    }
    if let Some(titles) = args.titles {
        session.source.title_count = titles;
    }
    if let Some(sections) = args.sections {
        session.script.section_count = sections;
    }
    if let Some(words) = args.words {
        session.script.words_per_section = words;
    }
    if let Some(mode) = args.mode {
        session.script.customization = mode;
    }
    if let Some(prompts_per_section) = args.prompts_per_section {
        if prompts_per_section == 0 {
            anyhow::bail!("--prompts-per-section must be at least 1");
        }
        session.image_prompts.prompts_per_section = prompts_per_section;
    }
    if let Some(style) = args.style {
        session.image_prompts.style = style;
    }
    if let Some(size) = args.thumbnail_size {
        session.thumbnail.size = size;
    }
    if let Some(path) = &args.reference_image {
        let bytes = std::fs::read(path)?;
        session.thumbnail.reference = Some(ReferenceImage {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "reference".to_string()),
            media_type: media_type_for(path)?,
            bytes,
        });
    }
    if let Some(text) = &args.watermark {
        session.thumbnail.watermark_enabled = true;
        session.thumbnail.watermark_text = text.clone();
    }
    if let Some(voice) = args.voice {
        session.voice.voice = voice;
    }
    Ok(())
}

/// Index of the candidate with the highest trend score.
fn default_selection(titles: &[TitleCandidate]) -> usize {
    titles
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            a.trend_score
                .partial_cmp(&b.trend_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Media type of a reference image, from its extension.
fn media_type_for(path: &Path) -> Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let media_type = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => anyhow::bail!(
            "unsupported reference image type: {} (expected jpg, png, webp or gif)",
            path.display()
        ),
    };
    Ok(media_type.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, trend_score: f32) -> TitleCandidate {
        TitleCandidate {
            title: title.to_string(),
            trend_score,
        }
    }

    #[test]
    fn test_default_selection_picks_highest_trend() {
        let titles = vec![
            candidate("a", 70.0),
            candidate("b", 92.0),
            candidate("c", 85.0),
        ];
        assert_eq!(default_selection(&titles), 1);
    }

    #[test]
    fn test_default_selection_empty_batch() {
        assert_eq!(default_selection(&[]), 0);
    }

    #[test]
    fn test_media_type_for_known_extensions() {
        assert_eq!(
            media_type_for(Path::new("sample.JPG")).unwrap(),
            "image/jpeg"
        );
        assert_eq!(media_type_for(Path::new("s.png")).unwrap(), "image/png");
        assert!(media_type_for(Path::new("s.tiff")).is_err());
        assert!(media_type_for(Path::new("noext")).is_err());
    }
}
