/*!
 * ASCII directory tree rendering
 */

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Config;
use crate::matcher::{IgnoreSet, MatchRule};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const CONTINUATION: &str = "|   ";
const LAST_CONTINUATION: &str = "    ";

/// An immediate child of a listed directory
#[derive(Debug)]
struct Child {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Renders a directory as tree lines, showing only files some rule matches
pub struct TreeRenderer<'a> {
    ignore: &'a IgnoreSet,
    rules: Vec<&'a MatchRule>,
    follow_links: bool,
    max_depth: usize,
}

impl<'a> TreeRenderer<'a> {
    /// Renderer showing files matched by the tree rule, or by any category
    /// when no tree rule is configured
    pub fn new(config: &'a Config) -> Self {
        let rules = match &config.tree_rule {
            Some(rule) => vec![rule],
            None => config.categories.iter().map(|c| &c.rule).collect(),
        };
        Self {
            ignore: &config.ignore,
            rules,
            follow_links: config.follow_links,
            max_depth: config.max_depth,
        }
    }

    /// Renderer with explicit rules
    pub fn with_rules(ignore: &'a IgnoreSet, rules: Vec<&'a MatchRule>) -> Self {
        Self {
            ignore,
            rules,
            follow_links: false,
            max_depth: crate::config::DEFAULT_MAX_DEPTH,
        }
    }

    /// Render the tree below `root`, the root itself gets no line
    pub fn render(&self, root: &Path) -> Vec<String> {
        let mut lines = Vec::new();
        let mut ancestors = Vec::new();
        if self.follow_links {
            if let Ok(canonical) = fs::canonicalize(root) {
                ancestors.push(canonical);
            }
        }

        self.render_directory(root, "", 1, &mut ancestors, &mut lines);
        lines
    }

    fn file_matches(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(name))
    }

    /// List a directory's children, directories first, each group by name
    fn list_children(&self, dir: &Path) -> Vec<Child> {
        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Error reading directory {}: {}", dir.display(), e);
                    None
                }
            })
            .map(|entry| Child {
                name: entry.file_name().to_string_lossy().to_string(),
                is_dir: entry.file_type().is_dir(),
                path: entry.into_path(),
            });

        let (dirs, files): (Vec<_>, Vec<_>) = entries.partition(|child| child.is_dir);
        dirs.into_iter().chain(files).collect()
    }

    fn render_directory(
        &self,
        dir: &Path,
        indent: &str,
        depth: usize,
        ancestors: &mut Vec<PathBuf>,
        lines: &mut Vec<String>,
    ) {
        let children = self.list_children(dir);
        let count = children.len();

        // Markers are computed over every child, including the ones that end
        // up filtered out below.
        for (i, child) in children.into_iter().enumerate() {
            let (marker, continuation) = if i + 1 == count {
                (LAST_BRANCH, LAST_CONTINUATION)
            } else {
                (BRANCH, CONTINUATION)
            };
            let line = format!("{}{}{}", indent, marker, child.name);

            if !child.is_dir {
                if self.file_matches(&child.name) {
                    lines.push(line);
                }
                continue;
            }

            if self.ignore.is_ignored_directory(&child.name) {
                log::debug!("Ignoring directory: {}", child.path.display());
                continue;
            }

            lines.push(line);

            if depth >= self.max_depth {
                log::debug!(
                    "Not descending into {}: max depth {} reached",
                    child.path.display(),
                    self.max_depth
                );
                continue;
            }

            let canonical = if self.follow_links {
                match fs::canonicalize(&child.path) {
                    Ok(path) => Some(path),
                    Err(e) => {
                        log::warn!("Error resolving {}: {}", child.path.display(), e);
                        continue;
                    }
                }
            } else {
                None
            };

            if let Some(canonical) = &canonical {
                if ancestors.contains(canonical) {
                    log::warn!(
                        "Skipping directory cycle at {} (links back to {})",
                        child.path.display(),
                        canonical.display()
                    );
                    continue;
                }
                ancestors.push(canonical.clone());
            }

            let next_indent = format!("{}{}", indent, continuation);
            self.render_directory(&child.path, &next_indent, depth + 1, ancestors, lines);

            if canonical.is_some() {
                ancestors.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Profile;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        File::create(path).unwrap();
    }

    #[test]
    fn test_directories_before_files() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("a.json"));
        touch(&temp.path().join("zeta/b.json"));
        touch(&temp.path().join("alpha/c.json"));

        let ignore = IgnoreSet::default();
        let rule = MatchRule::extensions([".json"]);
        let lines = TreeRenderer::with_rules(&ignore, vec![&rule]).render(temp.path());

        assert_eq!(
            lines,
            vec![
                "├── alpha",
                "|   └── c.json",
                "├── zeta",
                "|   └── b.json",
                "└── a.json",
            ]
        );
    }

    #[test]
    fn test_ignored_directories_are_skipped_with_descendants() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("app/config.json"));
        touch(&temp.path().join("app/bin/ignored.json"));
        touch(&temp.path().join("BIN/also.json"));

        let ignore = IgnoreSet::new(["bin"]);
        let rule = MatchRule::extensions([".json"]);
        let lines = TreeRenderer::with_rules(&ignore, vec![&rule]).render(temp.path());

        assert!(lines.iter().all(|l| !l.contains("bin") && !l.contains("BIN")));
        assert!(lines.iter().all(|l| !l.contains("ignored.json")));
        assert!(lines.iter().all(|l| !l.contains("also.json")));
        assert!(lines.iter().any(|l| l.ends_with("config.json")));
    }

    #[test]
    fn test_unmatched_files_are_hidden_but_directories_shown() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("docs/readme.txt"));
        touch(&temp.path().join("Program.CS"));

        let ignore = IgnoreSet::default();
        let rule = MatchRule::extensions([".cs"]);
        let lines = TreeRenderer::with_rules(&ignore, vec![&rule]).render(temp.path());

        assert_eq!(lines, vec!["├── docs", "└── Program.CS"]);
    }

    #[test]
    fn test_markers_count_filtered_siblings() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("a.json"));
        touch(&temp.path().join("b.txt"));

        let ignore = IgnoreSet::default();
        let rule = MatchRule::extensions([".json"]);
        let lines = TreeRenderer::with_rules(&ignore, vec![&rule]).render(temp.path());

        assert_eq!(lines, vec!["├── a.json"]);
    }

    #[test]
    fn test_tree_rule_overrides_category_rules() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("Catalog.sln"));
        touch(&temp.path().join("Program.cs"));
        touch(&temp.path().join("notes.txt"));

        let mut config = Config::for_profile(Profile::Project, temp.path(), temp.path());
        assert_eq!(
            TreeRenderer::new(&config).render(temp.path()),
            vec!["├── Catalog.sln", "├── Program.cs"]
        );

        config.tree_rule = None;
        assert_eq!(
            TreeRenderer::new(&config).render(temp.path()),
            vec!["├── Program.cs"]
        );
    }

    #[test]
    fn test_empty_root_renders_nothing() {
        let temp = tempdir().unwrap();
        let ignore = IgnoreSet::default();
        let rule = MatchRule::extensions([".json"]);
        let lines = TreeRenderer::with_rules(&ignore, vec![&rule]).render(temp.path());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_max_depth_stops_descent() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("one/two/deep.json"));

        let ignore = IgnoreSet::default();
        let rule = MatchRule::extensions([".json"]);
        let mut renderer = TreeRenderer::with_rules(&ignore, vec![&rule]);
        renderer.max_depth = 1;
        let lines = renderer.render(temp.path());

        assert_eq!(lines, vec!["└── one"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_not_followed_forever() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("loop/a.json"));
        std::os::unix::fs::symlink(temp.path(), temp.path().join("loop/back")).unwrap();

        let ignore = IgnoreSet::default();
        let rule = MatchRule::extensions([".json"]);
        let mut renderer = TreeRenderer::with_rules(&ignore, vec![&rule]);
        renderer.follow_links = true;
        let lines = renderer.render(temp.path());

        assert_eq!(
            lines,
            vec!["└── loop", "    ├── back", "    └── a.json"]
        );
    }
}
