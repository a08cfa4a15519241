//! Document export: markdown on disk plus a converted rich document.
//!
//! The markdown file is the primary artifact and is written atomically
//! (temp file, then rename). Conversion runs an external program afterwards;
//! a conversion failure is logged and never touches the markdown file.

use std::path::{Path, PathBuf};
use std::process::Command;

use scribe_shared::{Result, ScribeError, WritingConfig};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

/// Where and how documents are exported.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Directory receiving every exported file.
    pub output_dir: PathBuf,
    /// Converter program (invoked as `<converter> <input> -o <output>`).
    pub converter: String,
    /// Rich document extension, also the converter's target format.
    pub rich_format: String,
}

impl From<&WritingConfig> for ExportSettings {
    fn from(config: &WritingConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&config.output_dir),
            converter: config.converter.clone(),
            rich_format: config.rich_format.clone(),
        }
    }
}

/// Metadata for one exported document.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub markdown_path: PathBuf,
    /// Present only when conversion succeeded.
    pub rich_path: Option<PathBuf>,
    pub size_bytes: usize,
    pub sha256: String,
}

/// Writes documents as `<output_dir>/<base>_<subject>.md` and converts them.
#[derive(Debug, Clone)]
pub struct Exporter {
    settings: ExportSettings,
}

impl Exporter {
    pub fn new(settings: ExportSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Path of the markdown file for a base name and subject.
    pub fn markdown_path(&self, base_name: &str, subject: &str) -> PathBuf {
        self.settings
            .output_dir
            .join(format!("{base_name}_{}.md", sanitize_subject(subject)))
    }

    /// Write `content` and convert it. Fails only if the markdown write fails.
    #[instrument(skip_all, fields(base_name = base_name, subject = subject))]
    pub fn save(&self, base_name: &str, subject: &str, content: &str) -> Result<ExportedDocument> {
        std::fs::create_dir_all(&self.settings.output_dir)
            .map_err(|e| ScribeError::io(&self.settings.output_dir, e))?;

        let markdown_path = self.markdown_path(base_name, subject);
        write_atomic(&markdown_path, content)?;

        let sha256 = {
            let mut hasher = Sha256::new();
            hasher.update(content.as_bytes());
            format!("{:x}", hasher.finalize())
        };

        info!(path = %markdown_path.display(), size = content.len(), "markdown document saved");

        let rich_path = markdown_path.with_extension(&self.settings.rich_format);
        let rich_path = match self.convert(&markdown_path, &rich_path) {
            Ok(()) => {
                info!(path = %rich_path.display(), "rich document saved");
                Some(rich_path)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    converter = %self.settings.converter,
                    "conversion failed, markdown file kept (is the converter installed?)"
                );
                None
            }
        };

        Ok(ExportedDocument {
            markdown_path,
            rich_path,
            size_bytes: content.len(),
            sha256,
        })
    }

    /// Run the external converter.
    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        debug!(input = %input.display(), output = %output.display(), "running converter");

        let result = Command::new(&self.settings.converter)
            .arg(input)
            .arg("-o")
            .arg(output)
            .output()
            .map_err(|e| {
                ScribeError::Export(format!("failed to run `{}`: {e}", self.settings.converter))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ScribeError::Export(format!(
                "`{}` exited with {}: {}",
                self.settings.converter,
                result.status,
                stderr.trim()
            )));
        }

        if !output.exists() {
            return Err(ScribeError::Export(format!(
                "`{}` reported success but produced no {}",
                self.settings.converter,
                output.display()
            )));
        }

        Ok(())
    }
}

/// Filesystem-safe form of a subject: alphanumerics, spaces, `_` and `-`
/// kept, trailing whitespace dropped, spaces to underscores, lowercased.
pub fn sanitize_subject(subject: &str) -> String {
    let kept: String = subject
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();

    kept.trim_end().replace(' ', "_").to_lowercase()
}

/// Write to a sibling temp file, then rename over the target.
fn write_atomic(target: &Path, content: &str) -> Result<()> {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = target.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| ScribeError::io(&temp, e))?;
    std::fs::rename(&temp, target).map_err(|e| ScribeError::io(target, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exporter(dir: &Path, converter: &str) -> Exporter {
        Exporter::new(ExportSettings {
            output_dir: dir.to_path_buf(),
            converter: converter.into(),
            rich_format: "docx".into(),
        })
    }

    #[test]
    fn sanitize_rules() {
        assert_eq!(sanitize_subject("Acme Corp!"), "acme_corp");
        assert_eq!(sanitize_subject("Rust: a guide / 2024  "), "rust_a_guide__2024");
        assert_eq!(sanitize_subject("snake_case-and-kebab"), "snake_case-and-kebab");
        assert_eq!(sanitize_subject("Café Brasil"), "café_brasil");
        assert_eq!(sanitize_subject("???"), "");
    }

    #[test]
    fn save_writes_markdown_even_when_converter_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path(), "scribe-test-converter-that-does-not-exist");

        let doc = exporter
            .save("website_copy_partial", "Acme Corp", "# Website Copy: Acme Corp\n")
            .expect("save");

        assert_eq!(
            doc.markdown_path,
            dir.path().join("website_copy_partial_acme_corp.md")
        );
        assert_eq!(
            std::fs::read_to_string(&doc.markdown_path).unwrap(),
            "# Website Copy: Acme Corp\n"
        );
        assert!(doc.rich_path.is_none());
        assert_eq!(doc.size_bytes, 26);
        assert_eq!(doc.sha256.len(), 64);
    }

    #[test]
    fn save_rewrites_checkpoint_in_full() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path(), "scribe-test-converter-that-does-not-exist");

        exporter.save("doc_partial", "topic", "first version, longer").unwrap();
        let doc = exporter.save("doc_partial", "topic", "second").unwrap();

        assert_eq!(std::fs::read_to_string(&doc.markdown_path).unwrap(), "second");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn save_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("docs");
        let exporter = exporter(&nested, "scribe-test-converter-that-does-not-exist");

        let doc = exporter.save("doc_final", "Topic", "body").unwrap();
        assert!(doc.markdown_path.starts_with(&nested));
        assert!(doc.markdown_path.exists());
    }

    #[test]
    fn unwritable_target_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();
        let exporter = exporter(&file, "scribe-test-converter-that-does-not-exist");

        assert!(exporter.save("doc", "topic", "body").is_err());
    }
}
