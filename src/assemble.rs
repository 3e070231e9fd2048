//! Joins decoded codes with the alignment into the final per-word classification rows.

use enumset::EnumSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    align::AlignedToken,
    decode::{DecodeStatus, DecodedCode, Decoder},
    error::KoineError,
    stream::{mono_uc_form, std_poly_form, Edition, VerseRef},
    traits::TraitCategory,
};

/// `why_indeclinable` value marking a proper noun.
pub const PROPER_NOUN: &str = "proper noun";

/// One exported word.
///
/// Every trait category has a column, plus an `alt_` column for the value of a second recorded
/// code; missing values are blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedWord {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub edition: Edition,
    pub word_index: usize,
    pub word_order: u32,
    pub secondary_word_order: u32,
    pub joined_index: Option<usize>,
    pub surface: String,
    pub normalized: String,
    pub std_poly_form: String,
    pub mono_uc_form: String,
    pub lex_ids: Vec<u32>,
    pub code: String,
    pub alt_code: String,
    pub pos: String,
    /// `None` for words with neither a code of their own nor a joined base word to inherit from.
    pub status: Option<DecodeStatus>,
    /// Morphology was taken from the joined base word.
    pub inherited: bool,
    pub in_disputed_pericope: bool,
    #[serde(flatten)]
    pub traits: BTreeMap<String, String>,
}

impl ClassifiedWord {
    pub fn trait_value(&self, category: TraitCategory) -> &str {
        self.traits
            .get(category.as_str())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn alt_value(&self, category: TraitCategory) -> &str {
        self.traits
            .get(&category.alt_name())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Trait and alternate column names, in export order.
    pub fn trait_columns() -> Vec<String> {
        let categories = EnumSet::<TraitCategory>::all();
        categories
            .iter()
            .map(|c| c.as_str().to_string())
            .chain(categories.iter().map(|c| c.alt_name()))
            .collect()
    }
}

fn trait_columns(decoded: Option<&DecodedCode>) -> BTreeMap<String, String> {
    let mut columns = BTreeMap::new();
    for category in EnumSet::<TraitCategory>::all() {
        let (value, alt) = decoded
            .map(|d| (d.trait_value(category), d.alt_value(category)))
            .unwrap_or(("", ""));
        columns.insert(category.as_str().to_string(), value.to_string());
        columns.insert(category.alt_name(), alt.to_string());
    }
    columns
}

/// A decoding that needs a human look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub location: VerseRef,
    pub edition: Edition,
    pub word_index: usize,
    pub surface: String,
    pub code: String,
    pub status: DecodeStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assembly {
    pub rows: Vec<ClassifiedWord>,
    pub status_counts: BTreeMap<DecodeStatus, usize>,
    pub review: Vec<ReviewEntry>,
}

fn decode_token(decoder: &Decoder, aligned: &AlignedToken) -> Option<DecodedCode> {
    aligned
        .token
        .primary_code()
        .map(|first| decoder.decode_pair(first, aligned.token.alternate_code()))
}

/// Decode every word, join the alignment, and sort into export order.
///
/// `book_rank` gives each book's canonical position. Overlay words without a code of their own
/// take the decoding of the base word they are joined to.
pub fn assemble<F>(aligned: Vec<AlignedToken>, decoder: &Decoder, book_rank: F) -> Assembly
where
    F: Fn(&str) -> usize + Sync,
{
    let decoded: Vec<Option<DecodedCode>> = aligned
        .par_iter()
        .map(|a| decode_token(decoder, a))
        .collect();

    let base_decodings: HashMap<(&VerseRef, usize), &DecodedCode> = aligned
        .iter()
        .zip(decoded.iter())
        .filter(|(a, _)| a.token.edition == Edition::Base)
        .filter_map(|(a, d)| d.as_ref().map(|d| ((&a.token.location, a.token.index), d)))
        .collect();

    let mut assembly = Assembly::default();
    for (aligned_token, own) in aligned.iter().zip(decoded.iter()) {
        let token = &aligned_token.token;
        if let Some(own) = own {
            *assembly.status_counts.entry(own.status).or_default() += 1;
            if !own.is_resolved() {
                assembly.review.push(ReviewEntry {
                    location: token.location.clone(),
                    edition: token.edition,
                    word_index: token.index,
                    surface: token.surface.clone(),
                    code: own.code.clone(),
                    status: own.status,
                });
            }
        }

        let inherited = match (own, token.edition, aligned_token.joined_index) {
            (None, Edition::Overlay, Some(base_index)) => base_decodings
                .get(&(&token.location, base_index))
                .copied(),
            _ => None,
        };
        let decoding = own.as_ref().or(inherited);
        let proper_noun = decoding
            .map(|d| d.trait_value(TraitCategory::WhyIndeclinable) == PROPER_NOUN)
            .unwrap_or(false);

        assembly.rows.push(ClassifiedWord {
            book: token.location.book.clone(),
            chapter: token.location.chapter,
            verse: token.location.verse,
            edition: token.edition,
            word_index: token.index,
            word_order: aligned_token.order.word_order,
            secondary_word_order: aligned_token.order.secondary_word_order,
            joined_index: aligned_token.joined_index,
            surface: token.surface.clone(),
            normalized: token.normalized.clone(),
            std_poly_form: std_poly_form(&token.surface, proper_noun),
            mono_uc_form: mono_uc_form(&token.surface),
            lex_ids: token.lex_ids.as_slice().to_vec(),
            code: decoding.map(|d| d.code.clone()).unwrap_or_default(),
            alt_code: decoding
                .and_then(|d| d.alt_code.clone())
                .unwrap_or_default(),
            pos: decoding.map(|d| d.pos_label()).unwrap_or_default(),
            status: decoding.map(|d| d.status),
            inherited: inherited.is_some(),
            in_disputed_pericope: token.location.in_disputed_pericope(),
            traits: trait_columns(decoding),
        });
    }

    assembly.rows.sort_by(|a, b| {
        book_rank(&a.book)
            .cmp(&book_rank(&b.book))
            .then_with(|| a.book.cmp(&b.book))
            .then_with(|| a.chapter.cmp(&b.chapter))
            .then_with(|| a.verse.cmp(&b.verse))
            .then_with(|| a.word_order.cmp(&b.word_order))
            .then_with(|| a.secondary_word_order.cmp(&b.secondary_word_order))
            .then_with(|| a.edition.cmp(&b.edition))
            .then_with(|| a.word_index.cmp(&b.word_index))
    });
    assembly
}

pub fn write_rows<W: Write>(writer: &mut W, rows: &[ClassifiedWord]) -> Result<(), KoineError> {
    for row in rows {
        serde_json::to_writer(&mut *writer, row)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Write `rows` as JSON Lines, replacing any existing file.
pub fn write_rows_to_path<P: AsRef<Path>>(path: P, rows: &[ClassifiedWord]) -> Result<(), KoineError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_rows(&mut writer, rows)?;
    writer.flush()?;
    tracing::info!(
        "[assemble] wrote {} rows to {:?}",
        rows.len(),
        path.as_ref()
    );
    Ok(())
}
