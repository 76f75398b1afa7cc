//! CLI command implementations.

mod config;
mod doctor;
mod init;
mod produce;
mod titles;
mod voices;

pub use config::run_config;
pub use doctor::run_doctor;
pub use init::run_init;
pub use produce::run_produce;
pub use titles::run_titles;
pub use voices::run_voices;

use anyhow::Result;
use std::path::Path;

/// Source content resolved from an inline argument or a file.
pub(crate) struct SourceInput {
    pub text: String,
    pub file_name: Option<String>,
}

/// Read source content from the positional argument or --file.
pub(crate) fn read_source(input: Option<&str>, file: Option<&Path>) -> Result<SourceInput> {
    match (input, file) {
        (Some(_), Some(_)) => {
            anyhow::bail!("provide source content either inline or with --file, not both")
        }
        (Some(text), None) => Ok(SourceInput {
            text: text.to_string(),
            file_name: None,
        }),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)?;
            Ok(SourceInput {
                text,
                file_name: path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned()),
            })
        }
        (None, None) => {
            anyhow::bail!("no source content; pass it as an argument or with --file")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_source_inline() {
        let source = read_source(Some("some text"), None).unwrap();
        assert_eq!(source.text, "some text");
        assert!(source.file_name.is_none());
    }

    #[test]
    fn test_read_source_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "file contents").unwrap();

        let source = read_source(None, Some(&path)).unwrap();
        assert_eq!(source.text, "file contents");
        assert_eq!(source.file_name.as_deref(), Some("notes.txt"));
    }

    #[test]
    fn test_read_source_rejects_both_and_neither() {
        assert!(read_source(Some("text"), Some(Path::new("x.txt"))).is_err());
        assert!(read_source(None, None).is_err());
    }
}
