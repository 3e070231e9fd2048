//! Cross-edition word alignment.
//!
//! Two word streams for the same verse are placed on one timeline of [`OrderAssignment`]s so that
//! every word of either edition can be joined to its counterpart, or to nothing.
//!
//! - [`AlignMode::Positional`] folds an overlay onto a base by matching surface forms left to
//!   right ([`match_positional`]). Case is ignored; accents and breathings are not, unless
//!   [`AlignConfig::ignore_accents`] asks for [`NormalizedMatcher`]. Used for variant readings of
//!   a passage.
//! - [`AlignMode::Identity`] walks both editions by shared lexical ids with a bounded lookahead
//!   ([`match_by_identity`]). Used for aligning two full editions.
//!
//! Both modes go through [`align_verse`]; [`align_corpus`] runs it over every verse in parallel.

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::{error::KoineError, stream::WordToken};

pub mod corpus;
pub mod identity;
pub mod matcher;
pub mod positional;

pub use corpus::{align_corpus, group_by_verse, AlignedToken};
pub use identity::match_by_identity;
pub use matcher::{IdentityMatcher, NormalizedMatcher, SurfaceMatcher, TokenMatcher};
pub use positional::{match_positional, positional_orders};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignMode {
    #[default]
    Positional,
    Identity,
}

impl Display for AlignMode {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            AlignMode::Positional => write!(f, "positional"),
            AlignMode::Identity => write!(f, "identity"),
        }
    }
}

impl FromStr for AlignMode {
    type Err = KoineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positional" | "surface" => Ok(AlignMode::Positional),
            "identity" | "lexical" => Ok(AlignMode::Identity),
            other => Err(KoineError::Config(format!("unknown alignment mode '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignConfig {
    pub mode: AlignMode,
    /// Identity mode only: how far past a cursor to look for a resync point.
    pub max_lookahead: Option<usize>,
    /// Positional mode only: compare diacritic-free forms instead of accented surfaces.
    pub ignore_accents: bool,
}

impl AlignConfig {
    pub fn new(mode: AlignMode) -> Self {
        AlignConfig {
            mode,
            max_lookahead: None,
            ignore_accents: false,
        }
    }

    pub fn with_max_lookahead(mut self, max_lookahead: Option<usize>) -> Self {
        self.max_lookahead = max_lookahead;
        self
    }

    pub fn with_ignore_accents(mut self, ignore_accents: bool) -> Self {
        self.ignore_accents = ignore_accents;
        self
    }
}

/// Position of one token on a verse's shared timeline. Ordered by `word_order`, then
/// `secondary_word_order`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct OrderAssignment {
    pub word_order: u32,
    pub secondary_word_order: u32,
}

impl OrderAssignment {
    /// `word_order` of tokens placed before the first match of a verse.
    pub const UNSET: u32 = 0;

    pub fn new(word_order: u32, secondary_word_order: u32) -> Self {
        OrderAssignment {
            word_order,
            secondary_word_order,
        }
    }
}

/// Result of aligning one verse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerseAlignment {
    /// One assignment per base token, in stream order.
    pub base: Vec<OrderAssignment>,
    /// One assignment per overlay token, in stream order.
    pub overlay: Vec<OrderAssignment>,
    /// Per overlay token, the 0-based index of the base token it joins.
    pub matches: Vec<Option<usize>>,
}

impl VerseAlignment {
    /// Per base token, the 0-based index of the overlay token joined to it.
    pub fn base_matches(&self) -> Vec<Option<usize>> {
        let mut joined = vec![None; self.base.len()];
        for (overlay_idx, base_idx) in self.matches.iter().enumerate() {
            if let Some(slot) = base_idx.and_then(|b| joined.get_mut(b)) {
                *slot = Some(overlay_idx);
            }
        }
        joined
    }
}

/// Align the two streams of one verse. `base` and `overlay` must be in surface order.
pub fn align_verse(config: &AlignConfig, base: &[WordToken], overlay: &[WordToken]) -> VerseAlignment {
    match config.mode {
        AlignMode::Positional => {
            let matcher: &dyn TokenMatcher = if config.ignore_accents {
                &NormalizedMatcher
            } else {
                &SurfaceMatcher
            };
            let matches = match_positional(base, overlay, matcher);
            let (base_orders, overlay_orders) = positional_orders(base.len(), &matches);
            VerseAlignment {
                base: base_orders,
                overlay: overlay_orders,
                matches,
            }
        }
        AlignMode::Identity => {
            match_by_identity(base, overlay, &IdentityMatcher, config.max_lookahead)
        }
    }
}
