/*!
 * Name predicates used by the tree renderer and the exporter
 *
 * All comparisons are case-insensitive: extensions, exact file names and
 * ignored directory names are lowercased once when a rule is built.
 */

use std::collections::BTreeSet;

use glob_match::glob_match;

/// Extensions rendered as image references instead of code blocks
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".svg", ".gif", ".bmp"];

/// Extension of a file name, starting at the last dot and including it
///
/// A name that starts with a dot and has no other dot (`.dockerignore`) is its
/// own extension. Names without a dot have none.
pub fn extension_of(name: &str) -> Option<&str> {
    name.rfind('.').map(|idx| &name[idx..])
}

fn is_glob(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

/// Set of extensions and exact file names selecting files for a category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchRule {
    extensions: BTreeSet<String>,
    names: BTreeSet<String>,
}

impl MatchRule {
    /// Build a rule from extension and name lists
    pub fn new<E, N>(extensions: E, names: N) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().to_lowercase())
                .collect(),
            names: names
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Rule matching only by extension
    pub fn extensions<E>(extensions: E) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self::new(extensions, std::iter::empty::<&str>())
    }

    /// Rule matching only by exact file name
    pub fn names<N>(names: N) -> Self
    where
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        Self::new(std::iter::empty::<&str>(), names)
    }

    /// Normalized extensions of this rule
    pub fn extension_set(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    /// Normalized names of this rule
    pub fn name_set(&self) -> &BTreeSet<String> {
        &self.names
    }

    /// True when the rule can never match anything
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty() && self.names.is_empty()
    }

    /// Check the file's extension against the rule
    pub fn matches_extension(&self, name: &str) -> bool {
        extension_of(name)
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    /// Check the file's full name against the rule's names or name patterns
    pub fn matches_exact_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.names.iter().any(|entry| {
            if is_glob(entry) {
                glob_match(entry, &name)
            } else {
                *entry == name
            }
        })
    }

    /// A file matches if either its extension or its name is in the rule
    pub fn matches(&self, name: &str) -> bool {
        self.matches_extension(name) || self.matches_exact_name(name)
    }
}

/// Directory names excluded from every traversal along with their contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    names: BTreeSet<String>,
}

impl IgnoreSet {
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_ignored_directory(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Whether a file is rendered as an image reference
pub fn is_image_file(name: &str) -> bool {
    extension_of(name)
        .map(|ext| {
            let ext = ext.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
