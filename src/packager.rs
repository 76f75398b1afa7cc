//! Archive assembly for completed production stages.
//!
//! Builds a ZIP with one fixed-name entry per populated stage; stages
//! without committed data are omitted entirely. The archive filename is
//! derived from the selected title via a diacritic-stripping slug.

use crate::audio::encode_wav;
use crate::error::Result;
use crate::session::{ProductionSession, SeoRecord};
use std::io::{Cursor, Write};
use tracing::{debug, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const TITLE_ENTRY: &str = "01_title.txt";
const SCRIPT_ENTRY: &str = "02_script.txt";
const SEO_ENTRY: &str = "03_seo.txt";
const IMAGE_PROMPTS_ENTRY: &str = "04_image_prompts.txt";
const THUMBNAIL_ENTRY: &str = "05_thumbnail.jpg";
const VOICE_ENTRY: &str = "06_voice.wav";

/// Slug used when no title is selected or the slug collapses to nothing.
const FALLBACK_SLUG: &str = "content";

/// A finished archive: bytes plus the derived filename.
#[derive(Debug, Clone)]
pub struct Package {
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl Package {
    /// Names of the entries in the archive, in order.
    pub fn entry_names(&self) -> Result<Vec<String>> {
        let mut archive = zip::ZipArchive::new(Cursor::new(&self.bytes))?;
        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            names.push(archive.by_index(i)?.name().to_string());
        }
        Ok(names)
    }
}

/// Assemble the archive from every populated stage of the session.
pub fn package(session: &ProductionSession) -> Result<Package> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    if let Some(selected) = &session.source.selected {
        writer.start_file(TITLE_ENTRY, options)?;
        writer.write_all(selected.title.as_bytes())?;
    }

    if !session.script.document.is_empty() {
        writer.start_file(SCRIPT_ENTRY, options)?;
        writer.write_all(session.script.document.text().as_bytes())?;
    }

    if let Some(seo) = &session.seo.record {
        writer.start_file(SEO_ENTRY, options)?;
        writer.write_all(seo_text_block(seo).as_bytes())?;
    }

    if !session.image_prompts.prompts.is_empty() {
        writer.start_file(IMAGE_PROMPTS_ENTRY, options)?;
        writer.write_all(session.image_prompts.prompts.join("\n\n").as_bytes())?;
    }

    if let Some(asset) = &session.thumbnail.asset {
        writer.start_file(THUMBNAIL_ENTRY, options)?;
        writer.write_all(asset.bytes())?;
    }

    if let Some(track) = &session.voice.track {
        // A malformed buffer loses only this entry; the rest still package.
        match encode_wav(track) {
            Ok(wav) => {
                writer.start_file(VOICE_ENTRY, options)?;
                writer.write_all(&wav)?;
            }
            Err(e) => warn!("Skipping voice entry: {}", e),
        }
    }

    let cursor = writer.finish()?;
    let filename = archive_filename(session.selected_title());
    debug!("Packaged archive {}", filename);

    Ok(Package {
        bytes: cursor.into_inner(),
        filename,
    })
}

/// Derive the archive filename from the selected title.
pub fn archive_filename(title: Option<&str>) -> String {
    let slug = title
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_SLUG.to_string());
    format!("ND_AllS_{}.zip", slug)
}

/// Filesystem-safe slug: strip diacritics, lowercase, map đ to d,
/// hyphenate whitespace, drop everything outside `[a-z0-9_-]`, collapse
/// and trim hyphens.
fn slugify(title: &str) -> String {
    let stripped: String = title.nfd().filter(|c| !is_combining_mark(*c)).collect();
    // U+0111 does not decompose, so it needs an explicit mapping.
    let lowered = stripped.to_lowercase().replace('đ', "d");

    let hyphenated = lowered.split_whitespace().collect::<Vec<_>>().join("-");
    let filtered: String = hyphenated
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    let mut slug = String::with_capacity(filtered.len());
    for c in filtered.chars() {
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_string()
}

fn seo_text_block(seo: &SeoRecord) -> String {
    format!(
        "Description:\n{}\n\nHashtags:\n{}\n\nTags:\n{}",
        seo.description, seo.hashtags, seo.tags
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::PcmBuffer;
    use crate::config::{ProductionDefaults, ThumbnailSize};
    use crate::session::{ScriptDocument, ThumbnailAsset, TitleCandidate};

    fn session() -> ProductionSession {
        ProductionSession::new(&ProductionDefaults::default())
    }

    fn select(session: &mut ProductionSession, title: &str) {
        session.source.titles = vec![TitleCandidate {
            title: title.to_string(),
            trend_score: 80.0,
        }];
        session.select_title(0).unwrap();
    }

    #[test]
    fn test_slug_strips_diacritics_and_punctuation() {
        assert_eq!(slugify("Bí Mật Đáng Sợ!"), "bi-mat-dang-so");
    }

    #[test]
    fn test_slug_collapses_and_trims_hyphens() {
        assert_eq!(slugify("  --spaced   out--  "), "spaced-out");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_archive_filename_fallback() {
        assert_eq!(archive_filename(None), "ND_AllS_content.zip");
        assert_eq!(archive_filename(Some("???")), "ND_AllS_content.zip");
        assert_eq!(
            archive_filename(Some("Bí Mật Đáng Sợ!")),
            "ND_AllS_bi-mat-dang-so.zip"
        );
    }

    #[test]
    fn test_empty_session_produces_empty_archive() {
        let package = package(&session()).unwrap();
        assert_eq!(package.filename, "ND_AllS_content.zip");
        assert!(package.entry_names().unwrap().is_empty());
    }

    #[test]
    fn test_entry_set_matches_populated_stages() {
        let mut s = session();
        select(&mut s, "Every Title Counts");
        s.script.document = ScriptDocument::new("Every Title Counts\n\nHeading\nBody text.");
        s.image_prompts.prompts = vec!["prompt one".to_string(), "prompt two".to_string()];

        let package = package(&s).unwrap();
        assert_eq!(
            package.entry_names().unwrap(),
            vec![
                TITLE_ENTRY.to_string(),
                SCRIPT_ENTRY.to_string(),
                IMAGE_PROMPTS_ENTRY.to_string(),
            ]
        );
    }

    #[test]
    fn test_all_six_entries_when_fully_populated() {
        let mut s = session();
        select(&mut s, "Full Production");
        s.script.document = ScriptDocument::new("Full Production\n\nHeading\nBody text.");
        s.seo.record = Some(SeoRecord {
            description: "desc".to_string(),
            hashtags: "#a #b".to_string(),
            tags: "a, b".to_string(),
        });
        s.image_prompts.prompts = vec!["prompt".to_string()];
        s.thumbnail.asset = Some(ThumbnailAsset::new(
            vec![0xFF, 0xD8, 0xFF, 0xD9],
            "image/jpeg",
            ThumbnailSize::Wide720,
        ));
        s.voice.track = Some(PcmBuffer::new(24_000, vec![vec![0.0; 240]]).unwrap());

        let package = package(&s).unwrap();
        assert_eq!(
            package.entry_names().unwrap(),
            vec![
                TITLE_ENTRY.to_string(),
                SCRIPT_ENTRY.to_string(),
                SEO_ENTRY.to_string(),
                IMAGE_PROMPTS_ENTRY.to_string(),
                THUMBNAIL_ENTRY.to_string(),
                VOICE_ENTRY.to_string(),
            ]
        );
    }

    #[test]
    fn test_seo_entry_layout() {
        let block = seo_text_block(&SeoRecord {
            description: "A description".to_string(),
            hashtags: "#one #two".to_string(),
            tags: "one, two".to_string(),
        });
        assert_eq!(
            block,
            "Description:\nA description\n\nHashtags:\n#one #two\n\nTags:\none, two"
        );
    }

    #[test]
    fn test_voice_entry_is_valid_wav() {
        let mut s = session();
        s.voice.track = Some(PcmBuffer::new(24_000, vec![vec![0.25; 480]]).unwrap());

        let package = package(&s).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(&package.bytes)).unwrap();
        let mut entry = archive.by_name(VOICE_ENTRY).unwrap();
        let mut bytes = Vec::new();
        std::io::Read::read_to_end(&mut entry, &mut bytes).unwrap();

        let decoded = crate::audio::decode_wav(&bytes).unwrap();
        assert_eq!(decoded.sample_rate(), 24_000);
        assert_eq!(decoded.frames(), 480);
    }
}
