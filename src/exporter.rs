/*!
 * File content export
 *
 * Walks the project once per category and turns every matched file into an
 * export section: a fenced code block with the file's verbatim content, or an
 * image reference for image files in image-aware categories.
 */

use std::fs;
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{DocDumpError, Result};
use crate::matcher::is_image_file;
use crate::types::{Category, ExportSection, SectionBody};
use crate::utils::file_name_of;

/// Sections and counters produced by one export pass
#[derive(Debug, Clone, Default)]
pub struct ExportOutcome {
    /// Sections in walk order
    pub sections: Vec<ExportSection>,
    /// Files embedded as code blocks
    pub exported: usize,
    /// Files emitted as image references
    pub images: usize,
    /// Matched files that could not be read
    pub skipped: usize,
    /// Bytes of file content embedded
    pub bytes_read: u64,
}

impl ExportOutcome {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Flatten all sections into document lines
    pub fn into_lines(self) -> Vec<String> {
        self.sections
            .into_iter()
            .flat_map(ExportSection::into_lines)
            .collect()
    }
}

/// Exports matched files below a root directory
pub struct ContentExporter<'a> {
    config: &'a Config,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl<'a> ContentExporter<'a> {
    /// Create a new exporter
    pub fn new(config: &'a Config, progress: Arc<ProgressBar>) -> Self {
        Self { config, progress }
    }

    /// Walk `root` and export every file the category matches
    pub fn export(&self, root: &Path, category: &Category) -> ExportOutcome {
        let mut outcome = ExportOutcome::default();
        let ignore = &self.config.ignore;

        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .max_depth(self.config.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let skip = entry.depth() > 0
                    && entry.file_type().is_dir()
                    && ignore.is_ignored_directory(&entry.file_name().to_string_lossy());
                if skip {
                    log::debug!("Ignoring directory: {}", entry.path().display());
                }
                !skip
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if let Some(ancestor) = e.loop_ancestor() {
                        log::warn!(
                            "Skipping directory cycle back to {}",
                            ancestor.display()
                        );
                    } else {
                        log::warn!("Error accessing path: {}", e);
                    }
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !category.rule.matches(&name) {
                continue;
            }

            log::debug!("Documenting {}: {}", category.label, entry.path().display());
            self.progress.inc(1);
            self.progress
                .set_message(format!("{}: {}", category.label, name));

            if let Some(section) = self.export_file(entry.path(), category, &mut outcome) {
                outcome.sections.push(section);
            }
        }

        outcome
    }

    /// Build the section for one matched file, updating counters
    fn export_file(
        &self,
        path: &Path,
        category: &Category,
        outcome: &mut ExportOutcome,
    ) -> Option<ExportSection> {
        let name = file_name_of(path);

        if category.image_aware && is_image_file(&name) {
            outcome.images += 1;
            return Some(ExportSection {
                path: path.to_path_buf(),
                body: SectionBody::Image { name },
            });
        }

        match read_text(path) {
            Ok(content) => {
                outcome.exported += 1;
                outcome.bytes_read += content.len() as u64;
                Some(ExportSection {
                    path: path.to_path_buf(),
                    body: SectionBody::Code {
                        language: self.config.languages.language_for(&name).to_string(),
                        content,
                    },
                })
            }
            Err(e) => {
                log::warn!("{}", e);
                outcome.skipped += 1;
                // Binary content always leaves a note, read failures only on request
                let note = matches!(e, DocDumpError::NotText { .. }) || self.config.note_skipped;
                note.then(|| ExportSection {
                    path: path.to_path_buf(),
                    body: SectionBody::Skipped {
                        reason: e.to_string(),
                    },
                })
            }
        }
    }
}

/// Read a whole file as UTF-8 text
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| DocDumpError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    String::from_utf8(bytes).map_err(|source| DocDumpError::NotText {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchRule;
    use crate::types::{CategoryPreset, Profile};
    use tempfile::tempdir;

    fn write(path: &Path, content: &[u8]) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn exporter(config: &Config) -> ContentExporter<'_> {
        ContentExporter::new(config, Arc::new(ProgressBar::hidden()))
    }

    #[test]
    fn test_code_section_is_verbatim() {
        let temp = tempdir().unwrap();
        let content = "{\n  \"Logging\": { \"Level\": \"Info\" }\n}\n";
        write(&temp.path().join("appsettings.JSON"), content.as_bytes());

        let config = Config::for_profile(Profile::Configuration, temp.path(), temp.path());
        let outcome = exporter(&config).export(temp.path(), &CategoryPreset::Config.category());

        assert_eq!(outcome.exported, 1);
        assert_eq!(
            outcome.sections[0].body,
            SectionBody::Code {
                language: "json".to_string(),
                content: content.to_string(),
            }
        );
        assert_eq!(outcome.sections[0].path, temp.path().join("appsettings.JSON"));
    }

    #[test]
    fn test_images_are_referenced_not_read() {
        let temp = tempdir().unwrap();
        // Invalid UTF-8 would be reported if the file were read
        write(&temp.path().join("docs/flow.png"), &[0x89, 0x50, 0xff, 0xfe]);
        write(&temp.path().join("docs/flow.drawio"), b"<mxfile/>");

        let config = Config::for_profile(Profile::Diagrams, temp.path(), temp.path());
        let outcome = exporter(&config).export(temp.path(), &CategoryPreset::Diagrams.category());

        assert_eq!(outcome.images, 1);
        assert_eq!(outcome.exported, 1);
        assert_eq!(outcome.bytes_read, "<mxfile/>".len() as u64);
        assert!(outcome.sections.iter().any(|s| s.body
            == SectionBody::Image {
                name: "flow.png".to_string()
            }));
    }

    #[test]
    fn test_images_in_plain_categories_are_embedded() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("logo.svg"), b"<svg/>");

        let config = Config::for_profile(Profile::Project, temp.path(), temp.path());
        let category = Category::new("Vectors", "VECTORS", MatchRule::extensions([".svg"]), false);
        let outcome = exporter(&config).export(temp.path(), &category);

        assert_eq!(outcome.images, 0);
        assert!(matches!(
            &outcome.sections[0].body,
            SectionBody::Code { content, .. } if content == "<svg/>"
        ));
    }

    #[test]
    fn test_ignored_subtree_is_not_walked() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("app/config.json"), b"{\"a\":1}");
        write(&temp.path().join("app/bin/ignored.json"), b"{}");
        write(&temp.path().join("app/bin/nested/deeper.json"), b"{}");

        let config = Config::for_profile(Profile::Configuration, temp.path(), temp.path());
        let outcome = exporter(&config).export(temp.path(), &CategoryPreset::Config.category());

        let paths: Vec<_> = outcome.sections.iter().map(|s| s.path.clone()).collect();
        assert_eq!(paths, vec![temp.path().join("app").join("config.json")]);
    }

    #[test]
    fn test_exact_names_and_generic_language() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("Dockerfile"), b"FROM scratch\n");
        write(&temp.path().join(".dockerignore"), b"bin/\n");

        let config = Config::for_profile(Profile::Diagrams, temp.path(), temp.path());
        let outcome = exporter(&config).export(temp.path(), &CategoryPreset::Docker.category());

        let languages: Vec<_> = outcome
            .sections
            .iter()
            .map(|s| match &s.body {
                SectionBody::Code { language, .. } => language.clone(),
                other => panic!("unexpected section {:?}", other),
            })
            .collect();
        assert_eq!(languages, vec!["text", "dockerfile"]);
    }

    #[test]
    fn test_non_utf8_content_leaves_a_note() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("data.json"), &[b'{', 0xff, b'}']);
        write(&temp.path().join("ok.json"), b"{}");

        let config = Config::for_profile(Profile::Configuration, temp.path(), temp.path());
        assert!(!config.note_skipped);
        let outcome = exporter(&config).export(temp.path(), &CategoryPreset::Config.category());

        assert_eq!(outcome.exported, 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.bytes_read, 2);
        assert!(matches!(
            &outcome.sections[0].body,
            SectionBody::Skipped { reason } if reason.contains("data.json") && reason.contains("UTF-8")
        ));

        // Nothing is embedded for the binary file, not even replaced bytes
        let lines = outcome.into_lines();
        assert!(lines.iter().all(|l| !l.contains('\u{FFFD}')));
    }

    #[test]
    fn test_read_text_rejects_invalid_utf8() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("blob.json");
        write(&path, &[0xc3, 0x28]);

        let err = read_text(&path).unwrap_err();
        assert!(matches!(err, DocDumpError::NotText { path: ref p, .. } if *p == path));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_files_are_skipped() {
        let temp = tempdir().unwrap();
        // A dangling link matches by name but cannot be read
        std::os::unix::fs::symlink(temp.path().join("missing"), temp.path().join("gone.json"))
            .unwrap();
        write(&temp.path().join("ok.json"), b"{}");

        let mut config = Config::for_profile(Profile::Configuration, temp.path(), temp.path());
        let category = CategoryPreset::Config.category();

        let outcome = exporter(&config).export(temp.path(), &category);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.exported, 1);
        assert_eq!(outcome.sections.len(), 1);

        config.note_skipped = true;
        let outcome = exporter(&config).export(temp.path(), &category);
        assert_eq!(outcome.sections.len(), 2);
        assert!(matches!(
            &outcome.sections[0].body,
            SectionBody::Skipped { reason } if reason.contains("gone.json")
        ));
    }

    #[test]
    fn test_empty_root_exports_nothing() {
        let temp = tempdir().unwrap();
        let config = Config::for_profile(Profile::Project, temp.path(), temp.path());
        let outcome = exporter(&config).export(temp.path(), &CategoryPreset::Source.category());
        assert!(outcome.is_empty());
        assert!(outcome.into_lines().is_empty());
    }
}
