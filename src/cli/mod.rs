//! CLI module for Skriv.

pub mod commands;
mod output;

pub use output::Output;

use crate::config::{
    validate_section_count, validate_title_count, validate_words_per_section, CustomizationMode,
    ImageStyle, Language, ThumbnailSize, Topic, Voice,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Skriv - AI Video Content Production
///
/// A CLI production studio that turns source material into a complete
/// YouTube video package: titles, script, SEO metadata, image prompts,
/// thumbnail and narration, bundled into a ZIP archive.
/// The name "Skriv" comes from the Norwegian/Scandinavian word for "write."
#[derive(Parser, Debug)]
#[command(name = "skriv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Skriv and verify the environment
    Init,

    /// Check configuration and API key
    Doctor,

    /// Run the full production pipeline and package the results
    Produce(ProduceArgs),

    /// Generate a batch of title candidates for source content
    Titles {
        /// Source content (or use --file)
        input: Option<String>,

        /// Read source content from a text file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output language
        #[arg(short, long)]
        language: Option<Language>,

        /// Content topic
        #[arg(short, long)]
        topic: Option<Topic>,

        /// Number of candidates (3, 5, 7 or 10)
        #[arg(short = 'n', long, value_parser = parse_title_count)]
        count: Option<u8>,
    },

    /// List narration voices, or synthesize a demo sample
    Voices {
        /// Generate a demo WAV for this voice
        #[arg(long)]
        demo: Option<Voice>,

        /// Where to write the demo WAV (default: ./demo_<voice>.wav)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for the produce command.
#[derive(Args, Debug)]
pub struct ProduceArgs {
    /// Source content used to generate titles (or use --file)
    pub input: Option<String>,

    /// Read source content from a text file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Directory where the archive is written (default: config output_dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output language for all generated content
    #[arg(long)]
    pub language: Option<Language>,

    /// Content topic
    #[arg(long)]
    pub topic: Option<Topic>,

    /// Title candidates to generate (3, 5, 7 or 10)
    #[arg(long, value_parser = parse_title_count)]
    pub titles: Option<u8>,

    /// Select the Nth candidate, 1-based (default: highest trend score)
    #[arg(long)]
    pub select: Option<usize>,

    /// Script sections (5-20)
    #[arg(long, value_parser = parse_section_count)]
    pub sections: Option<u8>,

    /// Target words per section (500, 700, 1000 or 1500)
    #[arg(long, value_parser = parse_words_per_section)]
    pub words: Option<u32>,

    /// Customization mode (expand, retain-70, deepen); active only when
    /// the source exceeds 50 words
    #[arg(long)]
    pub mode: Option<CustomizationMode>,

    /// Image prompts per script section
    #[arg(long)]
    pub prompts_per_section: Option<u8>,

    /// Visual style for image prompts and the thumbnail
    #[arg(long)]
    pub style: Option<ImageStyle>,

    /// Thumbnail size (1280x720, 1920x1080, 1080x1920 or 1080x1080)
    #[arg(long)]
    pub thumbnail_size: Option<ThumbnailSize>,

    /// Style reference image for the thumbnail
    #[arg(long)]
    pub reference_image: Option<PathBuf>,

    /// Watermark text baked into the thumbnail
    #[arg(long)]
    pub watermark: Option<String>,

    /// Narration voice
    #[arg(long)]
    pub voice: Option<Voice>,

    /// Skip SEO metadata generation
    #[arg(long)]
    pub skip_seo: bool,

    /// Skip image prompt generation
    #[arg(long)]
    pub skip_prompts: bool,

    /// Skip thumbnail generation
    #[arg(long)]
    pub skip_thumbnail: bool,

    /// Skip narration generation
    #[arg(long)]
    pub skip_voice: bool,

    /// Run against the deterministic offline generator (no API calls)
    #[arg(long)]
    pub offline: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "production.language")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

fn parse_title_count(s: &str) -> std::result::Result<u8, String> {
    let count: u8 = s.parse().map_err(|_| format!("invalid number: {}", s))?;
    validate_title_count(count)
}

fn parse_section_count(s: &str) -> std::result::Result<u8, String> {
    let count: u8 = s.parse().map_err(|_| format!("invalid number: {}", s))?;
    validate_section_count(count)
}

fn parse_words_per_section(s: &str) -> std::result::Result<u32, String> {
    let words: u32 = s.parse().map_err(|_| format!("invalid number: {}", s))?;
    validate_words_per_section(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validated_numbers() {
        assert_eq!(parse_title_count("7"), Ok(7));
        assert!(parse_title_count("8").is_err());
        assert!(parse_title_count("many").is_err());
        assert_eq!(parse_section_count("20"), Ok(20));
        assert!(parse_section_count("4").is_err());
        assert_eq!(parse_words_per_section("1500"), Ok(1500));
        assert!(parse_words_per_section("1200").is_err());
    }
}
