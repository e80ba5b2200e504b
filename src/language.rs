//! Code fence language tags

use std::collections::HashMap;

use crate::matcher::extension_of;

/// Tag used when nothing in the map applies
pub const GENERIC_LANGUAGE: &str = "text";

/// Maps file extensions and exact file names to code fence tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageMap {
    entries: HashMap<String, String>,
}

impl Default for LanguageMap {
    fn default() -> Self {
        let defaults = [
            (".json", "json"),
            (".csproj", "xml"),
            (".config", "xml"),
            (".xml", "xml"),
            (".sln", "ini"),
            (".yml", "yaml"),
            (".yaml", "yaml"),
            (".cs", "csharp"),
            (".cshtml", "cshtml"),
            (".js", "javascript"),
            (".ts", "typescript"),
            (".rs", "rust"),
            (".go", "go"),
            (".py", "python"),
            (".java", "java"),
            (".toml", "toml"),
            (".md", "markdown"),
            (".sh", "bash"),
            (".sql", "sql"),
            ("dockerfile", "dockerfile"),
        ];

        Self {
            entries: defaults
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl LanguageMap {
    /// Add or replace mappings, keys are extensions (`.proto`) or file names
    pub fn extend<I, K, V>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in overrides {
            self.entries.insert(key.as_ref().to_lowercase(), value.into());
        }
    }

    /// Tag for a file name, exact names win over extensions
    pub fn language_for(&self, name: &str) -> &str {
        let lower = name.to_lowercase();
        if let Some(tag) = self.entries.get(&lower) {
            return tag;
        }

        extension_of(&lower)
            .and_then(|ext| self.entries.get(ext))
            .map(String::as_str)
            .unwrap_or(GENERIC_LANGUAGE)
    }
}
