/*!
 * Configuration handling for docdump
 *
 * Settings are layered: profile defaults, then the TOML config file, then
 * command-line flags.
 */

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;
use serde::Deserialize;

use crate::error::Result;
use crate::language::LanguageMap;
use crate::matcher::{IgnoreSet, MatchRule};
use crate::types::{Category, CategoryPreset, Profile};
use crate::{bail, ensure};

/// Default recursion bound for the tree and the exporter
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Heading of the tree block
pub const DEFAULT_TREE_HEADING: &str = "PROJECT STRUCTURE";

/// Command-line arguments for docdump
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "docdump",
    version = env!("CARGO_PKG_VERSION"),
    about = "Export a project's directory tree and selected files into a Markdown report",
    long_about = "Walks a project directory, skips ignored directories, and writes the matched files (or image references to them) into a single timestamped Markdown document."
)]
pub struct Args {
    /// Project directory to document
    #[clap(long)]
    pub root: Option<PathBuf>,

    /// Directory the report is written to (created if missing)
    #[clap(long)]
    pub out: Option<PathBuf>,

    /// Comma-separated directory names to skip, added to the defaults
    #[clap(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Do not skip the built-in directory names
    #[clap(long)]
    pub no_default_ignore: bool,

    /// Comma-separated category presets to export
    #[clap(long, value_delimiter = ',', value_enum)]
    pub categories: Vec<CategoryPreset>,

    /// Report profile providing title, file prefix and default categories
    #[clap(long, value_enum)]
    pub profile: Option<Profile>,

    /// Document title
    #[clap(long)]
    pub title: Option<String>,

    /// Output file name prefix
    #[clap(long)]
    pub prefix: Option<String>,

    /// Leave the directory tree out of the report
    #[clap(long)]
    pub no_tree: bool,

    /// Comma-separated extensions of files shown in the tree
    #[clap(long, value_delimiter = ',')]
    pub tree_ext: Vec<String>,

    /// Follow symbolic links while walking
    #[clap(long)]
    pub follow_links: bool,

    /// Maximum directory depth to descend into
    #[clap(long)]
    pub max_depth: Option<usize>,

    /// Write a note for files that could not be read
    #[clap(long)]
    pub note_skipped: bool,

    /// Path to a TOML config file
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress logs, progress and the run summary
    #[clap(short, long)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// A category defined in the config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryConfig {
    pub label: String,
    pub heading: Option<String>,
    pub extensions: Vec<String>,
    pub names: Vec<String>,
    pub image_aware: bool,
}

impl CategoryConfig {
    fn into_category(self) -> Category {
        let heading = self
            .heading
            .unwrap_or_else(|| self.label.to_uppercase());
        Category {
            rule: MatchRule::new(&self.extensions, &self.names),
            label: self.label,
            heading,
            image_aware: self.image_aware,
        }
    }
}

/// Contents of a TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub root: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub profile: Option<String>,
    pub title: Option<String>,
    pub prefix: Option<String>,
    pub tree: Option<bool>,
    pub tree_heading: Option<String>,
    /// Extensions of files shown in the tree
    pub tree_extensions: Vec<String>,
    /// File names shown in the tree
    pub tree_names: Vec<String>,
    pub ignore: Vec<String>,
    pub default_ignore: Option<bool>,
    /// Preset names to export
    pub categories: Vec<String>,
    /// Custom categories
    #[serde(rename = "category")]
    pub custom_categories: Vec<CategoryConfig>,
    /// Extension or file name to fence tag overrides
    pub languages: HashMap<String, String>,
    pub follow_links: Option<bool>,
    pub max_depth: Option<usize>,
    pub note_skipped: Option<bool>,
}

impl FileConfig {
    /// Parse a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            crate::error!(Config, "cannot read config file {}: {}", path.display(), e)
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// Location checked when no `--config` is given
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docdump").join("config.toml"))
    }

    fn profile(&self) -> Result<Option<Profile>> {
        match &self.profile {
            Some(name) => match name.parse::<Profile>() {
                Ok(profile) => Ok(Some(profile)),
                Err(_) => bail!(Config, "unknown profile '{}' in config file", name),
            },
            None => Ok(None),
        }
    }

    fn presets(&self) -> Result<Vec<CategoryPreset>> {
        self.categories
            .iter()
            .map(|name| {
                name.parse::<CategoryPreset>().map_err(|_| {
                    crate::error!(
                        Config,
                        "unknown category '{}', expected one of: {}",
                        name,
                        CategoryPreset::names().join(", ")
                    )
                })
            })
            .collect()
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Project directory to document
    pub root: PathBuf,

    /// Directory the report is written to
    pub out_dir: PathBuf,

    /// Document title
    pub title: String,

    /// Output file name prefix
    pub prefix: String,

    /// Whether the directory tree is rendered
    pub include_tree: bool,

    /// Heading of the tree block
    pub tree_heading: String,

    /// Files shown in the tree, falls back to the category rules
    pub tree_rule: Option<MatchRule>,

    /// Directory names excluded from traversal
    pub ignore: IgnoreSet,

    /// Export passes, in document order
    pub categories: Vec<Category>,

    /// Fence tags for exported files
    pub languages: LanguageMap,

    /// Whether symbolic links are followed
    pub follow_links: bool,

    /// Maximum directory depth below the root
    pub max_depth: usize,

    /// Whether unreadable files leave a note in the document
    pub note_skipped: bool,
}

impl Config {
    /// Configuration reproducing one of the built-in profiles
    pub fn for_profile(profile: Profile, root: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            out_dir: out_dir.into(),
            title: profile.title().to_string(),
            prefix: profile.file_prefix().to_string(),
            include_tree: profile.include_tree(),
            tree_heading: DEFAULT_TREE_HEADING.to_string(),
            tree_rule: profile.tree_rule(),
            ignore: IgnoreSet::new(profile.ignored_directories()),
            categories: profile
                .categories()
                .into_iter()
                .map(CategoryPreset::category)
                .collect(),
            languages: LanguageMap::default(),
            follow_links: false,
            max_depth: DEFAULT_MAX_DEPTH,
            note_skipped: false,
        }
    }

    /// Create configuration from command-line arguments
    ///
    /// Reads `--config` when given, otherwise the default config file if it
    /// exists.
    pub fn from_args(args: Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => match FileConfig::default_path().filter(|p| p.is_file()) {
                Some(path) => {
                    log::debug!("Using config file {}", path.display());
                    FileConfig::load(&path)?
                }
                None => FileConfig::default(),
            },
        };

        Self::from_layers(args, file)
    }

    /// Merge profile defaults, config file and arguments
    pub fn from_layers(args: Args, file: FileConfig) -> Result<Self> {
        let profile = match args.profile {
            Some(profile) => profile,
            None => file.profile()?.unwrap_or_default(),
        };

        let root = args
            .root
            .or_else(|| file.root.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let out_dir = args
            .out
            .or_else(|| file.out.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        let mut config = Self::for_profile(profile, root, out_dir);

        if let Some(title) = args.title.or_else(|| file.title.clone()) {
            config.title = title;
        }
        if let Some(prefix) = args.prefix.or_else(|| file.prefix.clone()) {
            config.prefix = prefix;
        }
        if let Some(heading) = &file.tree_heading {
            config.tree_heading = heading.clone();
        }
        if let Some(tree) = file.tree {
            config.include_tree = tree;
        }
        if args.no_tree {
            config.include_tree = false;
        }

        let use_defaults = !args.no_default_ignore && file.default_ignore.unwrap_or(true);
        let mut ignored: Vec<String> = if use_defaults {
            profile
                .ignored_directories()
                .into_iter()
                .map(str::to_string)
                .collect()
        } else {
            Vec::new()
        };
        ignored.extend(file.ignore.iter().cloned());
        ignored.extend(args.ignore.iter().cloned());
        config.ignore = IgnoreSet::new(ignored);

        // Presets from the CLI replace everything else; otherwise the file's
        // presets and custom categories replace the profile's list.
        if !args.categories.is_empty() {
            config.categories = args
                .categories
                .iter()
                .map(|preset| preset.category())
                .collect();
        } else if !file.categories.is_empty() || !file.custom_categories.is_empty() {
            let mut categories: Vec<Category> = file
                .presets()?
                .into_iter()
                .map(CategoryPreset::category)
                .collect();
            categories.extend(
                file.custom_categories
                    .iter()
                    .cloned()
                    .map(CategoryConfig::into_category),
            );
            config.categories = categories;
        }

        // A replaced category list also replaces the profile's tree rule
        if !args.categories.is_empty()
            || !file.categories.is_empty()
            || !file.custom_categories.is_empty()
        {
            config.tree_rule = None;
        }
        if !args.tree_ext.is_empty() {
            config.tree_rule = Some(MatchRule::extensions(&args.tree_ext));
        } else if !file.tree_extensions.is_empty() || !file.tree_names.is_empty() {
            config.tree_rule = Some(MatchRule::new(&file.tree_extensions, &file.tree_names));
        }

        config.languages.extend(file.languages.iter());
        config.follow_links = args.follow_links || file.follow_links.unwrap_or(false);
        if let Some(depth) = args.max_depth.or(file.max_depth) {
            config.max_depth = depth;
        }
        config.note_skipped = args.note_skipped || file.note_skipped.unwrap_or(false);

        Ok(config)
    }

    /// Validate the configuration before any traversal starts
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.root.is_dir(),
            Config,
            "root directory not found: {}",
            self.root.display()
        );

        if self.out_dir.exists() && !self.out_dir.is_dir() {
            bail!(
                Config,
                "output path exists and is not a directory: {}",
                self.out_dir.display()
            );
        }

        ensure!(
            !self.prefix.trim().is_empty(),
            Config,
            "output file prefix must not be empty"
        );
        ensure!(
            !self.prefix.contains(['/', '\\']),
            Config,
            "output file prefix must not contain path separators: {}",
            self.prefix
        );

        ensure!(
            !self.categories.is_empty(),
            Config,
            "no categories to export"
        );
        for category in &self.categories {
            ensure!(
                !category.label.trim().is_empty(),
                Config,
                "category label must not be empty"
            );
            ensure!(
                !category.rule.is_empty(),
                Config,
                "category '{}' has no extensions or names to match",
                category.label
            );
            if let Some(ext) = category
                .rule
                .extension_set()
                .iter()
                .find(|ext| !ext.starts_with('.'))
            {
                bail!(
                    Config,
                    "extension '{}' of category '{}' must start with a dot",
                    ext,
                    category.label
                );
            }
        }

        if let Some(rule) = &self.tree_rule {
            if let Some(ext) = rule.extension_set().iter().find(|ext| !ext.starts_with('.')) {
                bail!(Config, "tree extension '{}' must start with a dot", ext);
            }
        }

        ensure!(self.max_depth > 0, Config, "max depth must be at least 1");

        Ok(())
    }
}
