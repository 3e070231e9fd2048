use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::{error::KoineError, stream::normalize::normalize};

/// Which of the two streams of an alignment run a token belongs to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Edition {
    /// The reference stream, normally the majority text with parsings.
    #[default]
    Base,
    /// The stream folded onto the base, e.g. the critical text or a pericope variant list.
    Overlay,
}

impl Display for Edition {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Edition::Base => write!(f, "base"),
            Edition::Overlay => write!(f, "overlay"),
        }
    }
}

/// `BOOK chapter:verse`, e.g. `JOH 1:1`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VerseRef {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseRef {
    pub fn new<S: Into<String>>(book: S, chapter: u32, verse: u32) -> Self {
        VerseRef {
            book: book.into(),
            chapter,
            verse,
        }
    }

    /// Disputed passages carried by the majority text but bracketed or omitted by critical
    /// editions: John 7:53-8:11 and Acts 24:6b-8a.
    pub fn in_disputed_pericope(&self) -> bool {
        match self.book.as_str() {
            "JOH" => {
                (self.chapter == 7 && self.verse == 53) || (self.chapter == 8 && self.verse <= 11)
            }
            "ACT" => self.chapter == 24 && (6..=8).contains(&self.verse),
            _ => false,
        }
    }
}

impl Display for VerseRef {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

impl FromStr for VerseRef {
    type Err = KoineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || KoineError::Serialization(format!("'{s}' is not a BOOK C:V reference"));
        let (book, cv) = s.trim().split_once(' ').ok_or_else(bad)?;
        let (chapter, verse) = cv.trim().split_once(':').ok_or_else(bad)?;
        Ok(VerseRef {
            book: book.to_string(),
            chapter: chapter.parse().map_err(|_| bad())?,
            verse: verse.parse().map_err(|_| bad())?,
        })
    }
}

/// Up to three distinct lexical reference numbers for one word, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct LexIds(Vec<u32>);

impl LexIds {
    pub const MAX: usize = 3;

    pub fn new() -> Self {
        LexIds::default()
    }

    /// Add `id` unless it is already present or the set is full. Returns whether it was added.
    pub fn push(&mut self, id: u32) -> bool {
        if self.0.len() >= LexIds::MAX || self.0.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    pub fn contains(&self, id: u32) -> bool {
        self.0.contains(&id)
    }

    pub fn intersects(&self, other: &LexIds) -> bool {
        self.0.iter().any(|id| other.contains(*id))
    }

    pub fn first(&self) -> Option<u32> {
        self.0.first().copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<u32> for LexIds {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut ids = LexIds::new();
        for id in iter {
            ids.push(id);
        }
        ids
    }
}

impl From<Vec<u32>> for LexIds {
    fn from(ids: Vec<u32>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<LexIds> for Vec<u32> {
    fn from(ids: LexIds) -> Self {
        ids.0
    }
}

/// One word of one edition's stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordToken {
    #[serde(default)]
    pub edition: Edition,
    #[serde(flatten)]
    pub location: VerseRef,
    /// 1-based position within the verse.
    pub index: usize,
    pub surface: String,
    #[serde(default)]
    pub normalized: String,
    #[serde(default)]
    pub lex_ids: LexIds,
    /// Morphological codes recorded for the word: none, one, or a primary and an alternate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub codes: Vec<String>,
}

impl WordToken {
    pub fn new<S: Into<String>>(edition: Edition, location: VerseRef, index: usize, surface: S) -> Self {
        let surface = surface.into();
        let normalized = normalize(&surface);
        WordToken {
            edition,
            location,
            index,
            surface,
            normalized,
            lex_ids: LexIds::new(),
            codes: Vec::new(),
        }
    }

    pub fn with_lex_ids<I: IntoIterator<Item = u32>>(mut self, ids: I) -> Self {
        self.lex_ids = ids.into_iter().collect();
        self
    }

    pub fn with_codes<I: IntoIterator<Item = S>, S: Into<String>>(mut self, codes: I) -> Self {
        self.codes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Fill in the normalized form if the source did not provide one.
    pub fn ensure_normalized(&mut self) {
        if self.normalized.is_empty() {
            self.normalized = normalize(&self.surface);
        }
    }

    pub fn primary_code(&self) -> Option<&str> {
        self.codes.first().map(String::as_str)
    }

    pub fn alternate_code(&self) -> Option<&str> {
        self.codes.get(1).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_ids_capped_and_deduplicated() {
        let ids: LexIds = vec![1093, 1093, 3588, 846, 2316].into();
        assert_eq!(ids.as_slice(), &[1093, 3588, 846]);
        assert!(ids.intersects(&LexIds::from(vec![846])));
        assert!(!ids.intersects(&LexIds::new()));
    }

    #[test]
    fn test_verse_ref_parse_and_display() {
        let verse: VerseRef = "JOH 1:14".parse().unwrap();
        assert_eq!(verse, VerseRef::new("JOH", 1, 14));
        assert_eq!(verse.to_string(), "JOH 1:14");
        assert!("JOH 1".parse::<VerseRef>().is_err());
    }

    #[test]
    fn test_disputed_pericopes() {
        assert!(VerseRef::new("JOH", 7, 53).in_disputed_pericope());
        assert!(VerseRef::new("JOH", 8, 11).in_disputed_pericope());
        assert!(!VerseRef::new("JOH", 8, 12).in_disputed_pericope());
        assert!(VerseRef::new("ACT", 24, 7).in_disputed_pericope());
        assert!(!VerseRef::new("MAT", 8, 1).in_disputed_pericope());
    }

    #[test]
    fn test_token_json_normalizes_when_missing() {
        let json = r#"{"book":"JOH","chapter":1,"verse":1,"index":2,"surface":"Ἐν","lex_ids":[1722]}"#;
        let mut token: WordToken = serde_json::from_str(json).unwrap();
        token.ensure_normalized();
        assert_eq!(token.normalized, "εν");
        assert_eq!(token.edition, Edition::Base);
        assert_eq!(token.lex_ids.first(), Some(1722));
    }
}
