use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    align::{align_verse, AlignConfig, OrderAssignment},
    stream::{VerseRef, WordToken},
};

/// A token with its place on the verse timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedToken {
    pub token: WordToken,
    pub order: OrderAssignment,
    /// 1-based index of the other edition's token joined to this one.
    pub joined_index: Option<usize>,
}

/// Bucket tokens by verse, each bucket in word-index order.
pub fn group_by_verse(tokens: Vec<WordToken>) -> BTreeMap<VerseRef, Vec<WordToken>> {
    let mut verses: BTreeMap<VerseRef, Vec<WordToken>> = BTreeMap::new();
    for token in tokens {
        verses.entry(token.location.clone()).or_default().push(token);
    }
    for words in verses.values_mut() {
        words.sort_by_key(|t| t.index);
    }
    verses
}

fn align_group(config: &AlignConfig, base: Vec<WordToken>, overlay: Vec<WordToken>) -> Vec<AlignedToken> {
    let alignment = align_verse(config, &base, &overlay);
    let base_joins = alignment.base_matches();

    let mut aligned = Vec::with_capacity(base.len() + overlay.len());
    for ((token, order), joined) in base.into_iter().zip(alignment.base).zip(base_joins) {
        let joined_index = joined.map(|idx| overlay[idx].index);
        aligned.push(AlignedToken {
            token,
            order,
            joined_index,
        });
    }
    let base_indices: Vec<usize> = aligned.iter().map(|a| a.token.index).collect();
    for ((token, order), joined) in overlay
        .into_iter()
        .zip(alignment.overlay)
        .zip(alignment.matches)
    {
        aligned.push(AlignedToken {
            token,
            order,
            joined_index: joined.map(|idx| base_indices[idx]),
        });
    }
    aligned.sort_by(|a, b| {
        a.order
            .cmp(&b.order)
            .then_with(|| a.token.edition.cmp(&b.token.edition))
            .then_with(|| a.token.index.cmp(&b.token.index))
    });
    aligned
}

/// Align two whole streams verse by verse.
///
/// A verse present in only one stream is aligned against an empty one. Verses are processed in
/// parallel on the current rayon pool; the output is ordered by verse, then timeline position,
/// then edition, then word index.
pub fn align_corpus(
    config: &AlignConfig,
    base: Vec<WordToken>,
    overlay: Vec<WordToken>,
) -> Vec<AlignedToken> {
    let mut base_verses = group_by_verse(base);
    let mut overlay_verses = group_by_verse(overlay);

    let mut verses: Vec<VerseRef> = base_verses.keys().cloned().collect();
    verses.extend(overlay_verses.keys().cloned());
    verses.sort();
    verses.dedup();

    let groups: Vec<(Vec<WordToken>, Vec<WordToken>)> = verses
        .iter()
        .map(|verse| {
            (
                base_verses.remove(verse).unwrap_or_default(),
                overlay_verses.remove(verse).unwrap_or_default(),
            )
        })
        .collect();

    let only_one_side = groups
        .iter()
        .filter(|(b, o)| b.is_empty() || o.is_empty())
        .count();
    tracing::info!(
        "[align] aligning {} verses in {} mode ({} present in one stream only)",
        groups.len(),
        config.mode,
        only_one_side
    );

    groups
        .into_par_iter()
        .map(|(base, overlay)| align_group(config, base, overlay))
        .flatten()
        .collect()
}
