//! # koine-core
//!
//! Morphological code decoding and cross-edition word alignment for the Greek New Testament.
//!
//! koine-core annotates every word of a corpus with the grammatical traits spelled out by its
//! Robinson-Pierpont style parsing code. It also reconciles the word order of two independently
//! edited editions, such as a majority text and a critical text, which disagree on word count,
//! word order, and which verses are present.
//!
//! ## Overview
//!
//! The crate is a batch pipeline made of small, pure stages:
//!
//! - [`traits`]: the trait tables. Abbreviation tables per [`traits::TraitCategory`] plus the
//!   schema of which categories each part of speech carries, loaded once into an immutable
//!   [`traits::TraitStore`].
//! - [`decode`]: turns `V-2AAP-NSM` into `Verb` plus named traits. Total: bad input degrades to
//!   blank traits and a [`decode::DecodeStatus`], never an error.
//! - [`stream`]: word tokens, verse references, the `verse_text`, JSONL and Beta Code readers,
//!   and surface normalization.
//! - [`align`]: places two editions of a verse on one timeline of
//!   [`align::OrderAssignment`]s, either by surface form or by shared lexical ids.
//! - [`assemble`]: joins alignment and decoding into flat [`assemble::ClassifiedWord`] rows.
//! - [`pipeline`]: the `classify` batch run driven by a [`config::PipelineConfig`].
//!
//! ## Quick Start
//!
//! ### Decoding a code
//!
//! ```rust
//! use koine_core::{decode::{DecodeStatus, Decoder}, traits::{TraitCategory, TraitStore}};
//!
//! let store = TraitStore::builtin()?;
//! let decoder = Decoder::new(&store);
//!
//! let participle = decoder.decode("V-2AAP-NSM");
//! assert_eq!(participle.status, DecodeStatus::Resolved);
//! assert_eq!(participle.trait_value(TraitCategory::TenseType), "Second");
//! assert_eq!(participle.trait_value(TraitCategory::Mood), "Participle");
//!
//! // unknown parts of speech degrade instead of failing
//! let unknown = decoder.decode("ZZ-NSF");
//! assert_eq!(unknown.status, DecodeStatus::Unrecognized);
//! # Ok::<(), koine_core::KoineError>(())
//! ```
//!
//! ### Aligning two editions of a verse
//!
//! ```rust
//! use koine_core::{
//!     align::{align_verse, AlignConfig, AlignMode, OrderAssignment},
//!     stream::{Edition, VerseRef, WordToken},
//! };
//!
//! let verse = VerseRef::new("JOH", 1, 1);
//! let word = |edition, idx, id| WordToken::new(edition, verse.clone(), idx, "").with_lex_ids([id]);
//! let base = vec![word(Edition::Base, 1, 10), word(Edition::Base, 2, 20), word(Edition::Base, 3, 30)];
//! let overlay = vec![word(Edition::Overlay, 1, 10), word(Edition::Overlay, 2, 30)];
//!
//! let aligned = align_verse(&AlignConfig::new(AlignMode::Identity), &base, &overlay);
//! assert_eq!(aligned.overlay[1], OrderAssignment::new(3, 1));
//! assert_eq!(aligned.matches, vec![Some(0), Some(2)]);
//! ```
//!
//! ### Running the pipeline
//!
//! ```rust,no_run
//! use koine_core::{config::TomlConfigProvider, pipeline::run_with_provider};
//! # use std::path::PathBuf;
//!
//! let provider = TomlConfigProvider::new(PathBuf::from("./koine.toml"));
//! let report = run_with_provider(&provider)?;
//! println!("{} rows, {} for review", report.rows, report.review.len());
//! # Ok::<(), koine_core::KoineError>(())
//! ```
//!
//! A minimal `koine.toml`:
//!
//! ```toml
//! [base]
//! path = "rp_byz.txt"
//! format = "verse_text"
//!
//! [overlay]
//! path = "critical.jsonl"
//! format = "jsonl"
//!
//! [align]
//! mode = "identity"
//!
//! [output]
//! jsonl = "classified.jsonl"
//! ```
//!
//! ## Features
//!
//! - `bin`: the `koine` command line tool (`decode`, `align`, `census`, `classify`).
//! - `db`: SQLite export of the classification table through `sqlx`.
//!
//! ## Logging
//!
//! All stages log through `tracing`. Set `RUST_LOG=koine_core=debug` to see rejected decode
//! candidates; codes that did not resolve are always reported at `warn` by the pipeline.

pub mod align;
pub mod assemble;
pub mod config;
#[cfg(feature = "db")]
pub mod db;
pub mod decode;
pub mod error;
pub mod pipeline;
pub mod stream;
#[cfg(test)]
mod tests;
pub mod traits;

pub use error::*;
