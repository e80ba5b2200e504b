/*!
 * Core types and data structures for docdump
 */

use std::path::PathBuf;

use clap::ValueEnum;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::matcher::MatchRule;

/// Separator line used between sections
pub const SEPARATOR: &str = "---";

/// Code fence delimiter
pub const FENCE: &str = "```";

/// One labeled export pass with its own match rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Short label used in logs and the run report
    pub label: String,
    /// Section heading written to the document
    pub heading: String,
    /// Files selected by this category
    pub rule: MatchRule,
    /// Whether image files become image references
    pub image_aware: bool,
}

impl Category {
    pub fn new(label: &str, heading: &str, rule: MatchRule, image_aware: bool) -> Self {
        Self {
            label: label.to_string(),
            heading: heading.to_string(),
            rule,
            image_aware,
        }
    }
}

/// Built-in category presets
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, ValueEnum,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CategoryPreset {
    /// Project and solution configuration files
    Config,
    /// Diagrams and images
    Diagrams,
    /// CI workflows and pipelines
    Workflows,
    /// Docker build and compose files
    Docker,
    /// Source code
    Source,
    /// C# sources only
    #[value(name = "csharp")]
    CSharp,
}

impl CategoryPreset {
    /// Build the category this preset stands for
    pub fn category(self) -> Category {
        match self {
            CategoryPreset::Config => Category::new(
                "Configuration",
                "CONFIGURATION FILES",
                MatchRule::extensions([".json", ".csproj", ".sln", ".config"]),
                false,
            ),
            CategoryPreset::Diagrams => Category::new(
                "Diagram",
                "DIAGRAMS",
                MatchRule::extensions([
                    ".drawio", ".vsdx", ".xml", ".png", ".jpg", ".jpeg", ".svg",
                ]),
                true,
            ),
            CategoryPreset::Workflows => Category::new(
                "Workflow",
                "WORKFLOWS AND PIPELINES",
                MatchRule::extensions([".yml", ".yaml", ".json"]),
                false,
            ),
            CategoryPreset::Docker => Category::new(
                "Docker",
                "DOCKER CONFIGURATION",
                MatchRule::names([
                    "Dockerfile",
                    "docker-compose.yml",
                    "docker-compose.yaml",
                    ".dockerignore",
                ]),
                false,
            ),
            CategoryPreset::Source => Category::new(
                "Source",
                "SOURCE CODE",
                MatchRule::extensions([
                    ".cs", ".cshtml", ".js", ".ts", ".rs", ".go", ".py", ".java",
                ]),
                false,
            ),
            CategoryPreset::CSharp => Category::new(
                "C#",
                "SOURCE CODE EXTRACTION",
                MatchRule::extensions([".cs"]),
                false,
            ),
        }
    }

    /// Names of all presets, for error messages
    pub fn names() -> Vec<String> {
        CategoryPreset::iter().map(|p| p.to_string()).collect()
    }
}

/// Built-in report profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, ValueEnum)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Profile {
    /// Configuration summary without a tree
    Configuration,
    /// Tree plus diagrams, workflows and Docker files
    Diagrams,
    /// Tree plus source code
    #[default]
    Project,
}

impl Profile {
    pub fn title(self) -> &'static str {
        match self {
            Profile::Configuration => "IMPORTANT CONFIGURATION DOCUMENTATION",
            Profile::Diagrams => "DIAGRAMS, WORKFLOWS AND DOCKER DOCUMENTATION",
            Profile::Project => "PROJECT STRUCTURE DIAGRAM",
        }
    }

    pub fn file_prefix(self) -> &'static str {
        match self {
            Profile::Configuration => "Configuration_Summary",
            Profile::Diagrams => "Diagram_Documentation",
            Profile::Project => "Project_Summary",
        }
    }

    pub fn include_tree(self) -> bool {
        !matches!(self, Profile::Configuration)
    }

    pub fn categories(self) -> Vec<CategoryPreset> {
        match self {
            Profile::Configuration => vec![CategoryPreset::Config],
            Profile::Diagrams => vec![
                CategoryPreset::Diagrams,
                CategoryPreset::Workflows,
                CategoryPreset::Docker,
            ],
            Profile::Project => vec![CategoryPreset::CSharp],
        }
    }

    /// Files shown in the tree, `None` means whatever the categories match
    pub fn tree_rule(self) -> Option<MatchRule> {
        match self {
            Profile::Project => Some(MatchRule::extensions([
                ".sln", ".csproj", ".yml", ".cs", ".cshtml", ".js",
            ])),
            Profile::Configuration | Profile::Diagrams => None,
        }
    }

    /// Directory names this profile skips unless defaults are disabled
    pub fn ignored_directories(self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = crate::utils::DEFAULT_IGNORE.to_vec();
        let extra: &[&'static str] = match self {
            Profile::Configuration => &[
                "ClientApp",
                "angularui",
                "wwwroot",
                "product-catalog-ui",
            ],
            Profile::Diagrams => &[".git", "TestResults", "__pycache__", "coverage-report"],
            Profile::Project => &[],
        };
        names.extend_from_slice(extra);
        names
    }
}

/// Body of one export section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    /// Fenced code block with the file's verbatim content
    Code { language: String, content: String },
    /// Markdown image reference, the file is never read
    Image { name: String },
    /// Placeholder for a file that could not be read
    Skipped { reason: String },
}

/// One heading-plus-body unit for a single matched file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSection {
    /// Path of the exported file as walked from the root
    pub path: PathBuf,
    pub body: SectionBody,
}

impl ExportSection {
    /// Flatten the section into document lines
    pub fn into_lines(self) -> Vec<String> {
        let path = self.path.display().to_string();
        let mut lines = vec![format!("### File: `{}`", path), String::new()];

        match self.body {
            SectionBody::Code { language, content } => {
                lines.push(format!("{}{}", FENCE, language));
                lines.push(content);
                lines.push(FENCE.to_string());
            }
            SectionBody::Image { name } => {
                lines.push(format!("![{}]({})", name, path));
            }
            SectionBody::Skipped { reason } => {
                lines.push(format!("> Skipped: {}", reason));
            }
        }

        lines.push(String::new());
        lines.push(SEPARATOR.to_string());
        lines.push(String::new());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parsing() {
        assert_eq!(
            "docker".parse::<CategoryPreset>().unwrap(),
            CategoryPreset::Docker
        );
        assert_eq!(
            "Workflows".parse::<CategoryPreset>().unwrap(),
            CategoryPreset::Workflows
        );
        assert_eq!(
            "csharp".parse::<CategoryPreset>().unwrap(),
            CategoryPreset::CSharp
        );
        assert!("images".parse::<CategoryPreset>().is_err());
        assert_eq!(CategoryPreset::names().len(), 6);
    }

    #[test]
    fn test_diagram_preset_is_image_aware() {
        let category = CategoryPreset::Diagrams.category();
        assert!(category.image_aware);
        assert!(category.rule.matches("flow.PNG"));
        assert!(!CategoryPreset::Config.category().image_aware);
    }

    #[test]
    fn test_profiles() {
        assert!(!Profile::Configuration.include_tree());
        assert!(Profile::Project.include_tree());
        assert_eq!(Profile::default(), Profile::Project);
        assert_eq!(Profile::Diagrams.categories().len(), 3);
        assert!(Profile::Diagrams.ignored_directories().contains(&".git"));
        assert!(Profile::Project.ignored_directories().contains(&"bin"));
    }

    #[test]
    fn test_project_tree_is_wider_than_its_export() {
        let tree = Profile::Project.tree_rule().unwrap();
        for name in ["Catalog.sln", "Api.csproj", "ci.yml", "Index.cshtml", "site.js"] {
            assert!(tree.matches(name), "{} should be in the tree", name);
        }

        let export = CategoryPreset::CSharp.category();
        assert!(export.rule.matches("Program.cs"));
        assert!(!export.rule.matches("Api.csproj"));
        assert!(!export.rule.matches("site.js"));

        assert!(Profile::Diagrams.tree_rule().is_none());
        assert!(Profile::Configuration.tree_rule().is_none());
    }

    #[test]
    fn test_code_section_lines() {
        let section = ExportSection {
            path: PathBuf::from("app/config.json"),
            body: SectionBody::Code {
                language: "json".to_string(),
                content: "{\"a\":1}".to_string(),
            },
        };

        assert_eq!(
            section.into_lines(),
            vec![
                "### File: `app/config.json`",
                "",
                "```json",
                "{\"a\":1}",
                "```",
                "",
                "---",
                "",
            ]
        );
    }

    #[test]
    fn test_image_section_lines() {
        let section = ExportSection {
            path: PathBuf::from("docs/flow.png"),
            body: SectionBody::Image {
                name: "flow.png".to_string(),
            },
        };
        let lines = section.into_lines();
        assert_eq!(lines[2], "![flow.png](docs/flow.png)");
        assert!(!lines.iter().any(|l| l.starts_with(FENCE)));
    }
}
