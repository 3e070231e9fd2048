use serde::{Deserialize, Serialize};
use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
};

use crate::{align::AlignMode, error::KoineError, stream::StreamFormat};

/// Robinson-Pierpont book abbreviations in canonical order.
pub const RP_BOOK_ORDER: [&str; 27] = [
    "MAT", "MAR", "LUK", "JOH", "ACT", "ROM", "1CO", "2CO", "GAL", "EPH", "PHP", "COL", "1TH",
    "2TH", "1TI", "2TI", "TIT", "PHM", "HEB", "JAM", "1PE", "2PE", "1JO", "2JO", "3JO", "JUD",
    "REV",
];

fn default_books() -> Vec<String> {
    RP_BOOK_ORDER.iter().map(|b| b.to_string()).collect()
}

/// Where one edition's word stream comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSource {
    pub path: PathBuf,
    #[serde(default)]
    pub format: StreamFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignSettings {
    #[serde(default)]
    pub mode: AlignMode,
    /// Bound on how far identity alignment looks ahead for a resync. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_lookahead: Option<usize>,
    /// Positional mode only: match words even when their accents or breathings differ.
    #[serde(default)]
    pub ignore_accents: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub jsonl: PathBuf,
    /// SQLite database receiving the `word_classification` table. Requires the `db` feature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqlite: Option<PathBuf>,
}

/// Everything a `classify` run needs.
///
/// ```toml
/// tables = "rp_traits.toml"      # optional, built-in tables otherwise
/// threads = 4                    # optional, rayon default otherwise
///
/// [base]
/// path = "rp_with_parsing.txt"
/// format = "verse_text"
///
/// [overlay]
/// path = "critical.jsonl"
/// format = "jsonl"
///
/// [align]
/// mode = "identity"
///
/// [output]
/// jsonl = "classified.jsonl"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<PathBuf>,
    #[serde(default = "default_books")]
    pub books: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    pub base: StreamSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<StreamSource>,
    #[serde(default)]
    pub align: AlignSettings,
    pub output: OutputSettings,
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> Result<PipelineConfig, KoineError> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), KoineError> {
        if self.books.is_empty() {
            return Err(KoineError::Config("book order may not be empty".to_string()));
        }
        if self.threads == Some(0) {
            return Err(KoineError::Config("threads must be at least 1".to_string()));
        }
        if self.align.max_lookahead == Some(0) {
            return Err(KoineError::Config(
                "max_lookahead must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Rewrite relative paths so they are relative to `root` (normally the config file's
    /// directory).
    pub fn resolve_paths(&mut self, root: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = root.join(&*p);
            }
        };
        if let Some(tables) = self.tables.as_mut() {
            rebase(tables);
        }
        rebase(&mut self.base.path);
        if let Some(overlay) = self.overlay.as_mut() {
            rebase(&mut overlay.path);
        }
        rebase(&mut self.output.jsonl);
        if let Some(sqlite) = self.output.sqlite.as_mut() {
            rebase(sqlite);
        }
    }

    /// Position of `book` in the configured canonical order. Unknown books sort last.
    pub fn book_rank(&self, book: &str) -> usize {
        self.books
            .iter()
            .position(|b| b == book)
            .unwrap_or(self.books.len())
    }
}

pub trait ConfigProvider: Send + Sync {
    fn get_pipeline(&self) -> Result<PipelineConfig, KoineError>;
    fn set_pipeline(&self, config: &PipelineConfig) -> Result<(), KoineError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TomlConfigProvider {
    path: PathBuf,
}

impl TomlConfigProvider {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigProvider { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn get_pipeline(&self) -> Result<PipelineConfig, KoineError> {
        tracing::debug!("Attempting to read pipeline config from: {:?}", &self.path);
        if !self.path.exists() {
            return Err(KoineError::NotFound(format!(
                "pipeline config {} does not exist",
                self.path.display()
            )));
        }
        let content = get_content(&self.path)?;
        let mut config = PipelineConfig::from_toml_str(&content)?;
        if let Some(root) = self.path.parent() {
            config.resolve_paths(root);
        }
        Ok(config)
    }

    fn set_pipeline(&self, config: &PipelineConfig) -> Result<(), KoineError> {
        tracing::debug!("Attempting to write pipeline config to: {:?}", &self.path);
        config.validate()?;
        let toml_string = toml::to_string(config)?;
        set_content(&self.path, toml_string)
    }
}

pub fn get_content<P: AsRef<Path>>(path: P) -> Result<String, KoineError> {
    tracing::debug!("Reading {:?}", path.as_ref());
    Ok(read_to_string(path)?)
}

pub fn set_content<P: AsRef<Path>>(path: P, text: String) -> Result<(), KoineError> {
    Ok(write(path, text)?)
}
