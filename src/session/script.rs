//! Script document parsing.
//!
//! A script is plain text: the first line is the video title, then
//! blank-line-separated blocks. Each section starts with a short heading
//! line followed directly by its first paragraph; further paragraphs are
//! separate blocks.

/// A committed script document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptDocument {
    text: String,
}

/// One detected section: a heading and its paragraphs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptSection<'a> {
    pub heading: &'a str,
    pub paragraphs: Vec<String>,
}

/// A heading is a single line at most this many characters long.
const MAX_HEADING_CHARS: usize = 120;

impl ScriptDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The first non-empty line: the video title.
    pub fn title_line(&self) -> Option<&str> {
        self.text.lines().map(str::trim).find(|l| !l.is_empty())
    }

    /// Prefix of at most `max_chars` characters, cut on a char boundary.
    pub fn excerpt(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }

    /// Detected sections, in document order.
    ///
    /// The title block is skipped. A block whose first line is
    /// heading-shaped (short, not ending a sentence) starts a new
    /// section; its remaining lines form the first paragraph. Blocks
    /// that do not open a section are further paragraphs of the current
    /// one.
    pub fn sections(&self) -> Vec<ScriptSection<'_>> {
        let mut sections: Vec<ScriptSection<'_>> = Vec::new();

        for block in self.blocks().into_iter().skip(1) {
            if looks_like_heading(block[0]) {
                let mut section = ScriptSection {
                    heading: block[0],
                    paragraphs: Vec::new(),
                };
                if block.len() > 1 {
                    section.paragraphs.push(block[1..].join(" "));
                }
                sections.push(section);
            } else if let Some(current) = sections.last_mut() {
                current.paragraphs.push(block.join(" "));
            }
        }

        sections
    }

    /// Number of detected section headings.
    pub fn section_count(&self) -> usize {
        self.sections().len()
    }

    /// Non-empty line groups separated by blank lines.
    fn blocks(&self) -> Vec<Vec<&str>> {
        let mut blocks: Vec<Vec<&str>> = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in self.text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
            } else {
                current.push(trimmed);
            }
        }
        if !current.is_empty() {
            blocks.push(current);
        }

        blocks
    }
}

fn looks_like_heading(line: &str) -> bool {
    line.chars().count() <= MAX_HEADING_CHARS && !line.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "\
The Forgotten Kingdom

Ruins Beneath the Jungle
Deep in the valley, archaeologists uncovered walls older than any record.

Carbon dating pushed the site back another thousand years.

Voices in the Stone
The inscriptions resisted translation for decades.";

    #[test]
    fn test_title_line() {
        let doc = ScriptDocument::new(SCRIPT);
        assert_eq!(doc.title_line(), Some("The Forgotten Kingdom"));
    }

    #[test]
    fn test_section_detection() {
        let doc = ScriptDocument::new(SCRIPT);
        let sections = doc.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, "Ruins Beneath the Jungle");
        assert_eq!(sections[0].paragraphs.len(), 2);
        assert!(sections[0].paragraphs[1].starts_with("Carbon dating"));
        assert_eq!(sections[1].heading, "Voices in the Stone");
        assert_eq!(sections[1].paragraphs.len(), 1);
    }

    #[test]
    fn test_standalone_heading_block() {
        let doc = ScriptDocument::new(
            "Title\n\nA Lone Heading\n\nA paragraph that follows it, ending with a period.",
        );
        let sections = doc.sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, "A Lone Heading");
        assert_eq!(sections[0].paragraphs.len(), 1);
    }

    #[test]
    fn test_empty_document() {
        let doc = ScriptDocument::default();
        assert!(doc.is_empty());
        assert_eq!(doc.section_count(), 0);
        assert_eq!(doc.title_line(), None);
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let doc = ScriptDocument::new("Bí mật đáng sợ của lịch sử");
        let excerpt = doc.excerpt(9);
        assert_eq!(excerpt.chars().count(), 9);
        assert_eq!(excerpt, "Bí mật đá");
    }

    #[test]
    fn test_excerpt_shorter_than_limit() {
        let doc = ScriptDocument::new("short");
        assert_eq!(doc.excerpt(4000), "short");
    }
}
