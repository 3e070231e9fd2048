//! The batch `classify` run: load tables and streams, align, decode, assemble, export.

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
};

use crate::{
    align::{align_corpus, AlignConfig},
    assemble::{assemble, write_rows_to_path, Assembly, ReviewEntry},
    config::{ConfigProvider, PipelineConfig},
    decode::{CodeCensus, DecodeStatus, Decoder},
    error::KoineError,
    stream::{read_stream, Edition, WordToken},
    traits::TraitStore,
};

/// Summary of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub base_words: usize,
    pub overlay_words: usize,
    pub rows: usize,
    pub status_counts: BTreeMap<DecodeStatus, usize>,
    pub review: Vec<ReviewEntry>,
    /// POS abbreviations found in the streams with no schema entry.
    pub unknown_pos: BTreeSet<String>,
    pub jsonl: PathBuf,
    pub sqlite_rows: Option<usize>,
}

impl PipelineReport {
    pub fn count(&self, status: DecodeStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}

pub fn census_of<'t, I: IntoIterator<Item = &'t WordToken>>(tokens: I) -> CodeCensus {
    let mut census = CodeCensus::new();
    for token in tokens {
        census.extend(token.codes.iter().map(String::as_str));
    }
    census
}

fn log_review(review: &[ReviewEntry]) {
    for entry in review {
        tracing::warn!(
            "[review] {} {} word {} '{}' code {}: {}",
            entry.location,
            entry.edition,
            entry.word_index,
            entry.surface,
            entry.code,
            entry.status
        );
    }
}

#[cfg(feature = "db")]
fn export_sqlite(
    path: &std::path::Path,
    assembly: &Assembly,
    census: &CodeCensus,
) -> Result<usize, KoineError> {
    crate::db::export_sqlite(path, &assembly.rows, census)
}

#[cfg(not(feature = "db"))]
fn export_sqlite(
    path: &std::path::Path,
    _assembly: &Assembly,
    _census: &CodeCensus,
) -> Result<usize, KoineError> {
    Err(KoineError::Config(format!(
        "sqlite output {path:?} requested but koine-core was built without the `db` feature"
    )))
}

/// Run the whole pipeline described by `config`.
pub fn run(config: &PipelineConfig) -> Result<PipelineReport, KoineError> {
    config.validate()?;
    let store = TraitStore::load(config.tables.as_deref())?;
    let decoder = Decoder::new(&store);

    let base = read_stream(&config.base.path, config.base.format, Edition::Base)?;
    let overlay = match &config.overlay {
        Some(source) => read_stream(&source.path, source.format, Edition::Overlay)?,
        None => Vec::new(),
    };

    let census = census_of(base.iter().chain(overlay.iter()));
    let unknown_pos = census.unknown_pos(store.schema());
    if !unknown_pos.is_empty() {
        tracing::warn!(
            "[pipeline] POS abbreviations without a schema entry: {:?}",
            unknown_pos
        );
    }

    let mut report = PipelineReport {
        base_words: base.len(),
        overlay_words: overlay.len(),
        unknown_pos,
        jsonl: config.output.jsonl.clone(),
        ..Default::default()
    };

    let align_config = AlignConfig::new(config.align.mode)
        .with_max_lookahead(config.align.max_lookahead)
        .with_ignore_accents(config.align.ignore_accents);
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = config.threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder
        .build()
        .map_err(|e| KoineError::Config(format!("could not start worker pool: {e}")))?;
    let assembly = pool.install(|| {
        let aligned = align_corpus(&align_config, base, overlay);
        assemble(aligned, &decoder, |book| config.book_rank(book))
    });

    log_review(&assembly.review);
    write_rows_to_path(&config.output.jsonl, &assembly.rows)?;
    if let Some(sqlite) = &config.output.sqlite {
        report.sqlite_rows = Some(export_sqlite(sqlite, &assembly, &census)?);
    }

    report.rows = assembly.rows.len();
    report.status_counts = assembly.status_counts;
    report.review = assembly.review;
    tracing::info!(
        "[pipeline] {} rows: {} resolved, {} partial, {} unresolved, {} unrecognized",
        report.rows,
        report.count(DecodeStatus::Resolved),
        report.count(DecodeStatus::Partial),
        report.count(DecodeStatus::Unresolved),
        report.count(DecodeStatus::Unrecognized)
    );
    Ok(report)
}

pub fn run_with_provider(provider: &dyn ConfigProvider) -> Result<PipelineReport, KoineError> {
    let config = provider.get_pipeline()?;
    run(&config)
}
