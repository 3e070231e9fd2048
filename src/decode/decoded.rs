use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
};

use crate::traits::TraitCategory;

/// Part of speech of a decoded code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pos {
    Known(String),
    /// The POS abbreviation matched no schema entry.
    Unrecognized,
}

impl Pos {
    pub fn name(&self) -> Option<&str> {
        match self {
            Pos::Known(name) => Some(name),
            Pos::Unrecognized => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Pos::Known(_))
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Pos::Known(name) => write!(f, "{name}"),
            Pos::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// How completely a code was decoded. Ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeStatus {
    /// A schema entry matched the slot count and every slot resolved.
    Resolved,
    /// A schema entry matched the slot count but some slots are blank.
    Partial,
    /// The POS is known but no schema entry matched the slot count. No traits.
    Unresolved,
    /// The POS abbreviation is unknown. No traits.
    Unrecognized,
}

impl DecodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeStatus::Resolved => "resolved",
            DecodeStatus::Partial => "partial",
            DecodeStatus::Unresolved => "unresolved",
            DecodeStatus::Unrecognized => "unrecognized",
        }
    }
}

impl Display for DecodeStatus {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait category to display name. Categories without a value read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitValues(BTreeMap<TraitCategory, String>);

impl TraitValues {
    pub fn new() -> Self {
        TraitValues::default()
    }

    pub fn get(&self, category: TraitCategory) -> &str {
        self.0.get(&category).map(String::as_str).unwrap_or("")
    }

    /// Record `name` for `category`. Empty names are not stored.
    pub fn insert<S: Into<String>>(&mut self, category: TraitCategory, name: S) {
        let name = name.into();
        if name.is_empty() {
            self.0.remove(&category);
        } else {
            self.0.insert(category, name);
        }
    }

    pub fn contains(&self, category: TraitCategory) -> bool {
        self.0.contains_key(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TraitCategory, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(TraitCategory, String)> for TraitValues {
    fn from_iter<I: IntoIterator<Item = (TraitCategory, String)>>(iter: I) -> Self {
        let mut values = TraitValues::new();
        for (category, name) in iter {
            values.insert(category, name);
        }
        values
    }
}

/// The structured reading of one morphological code, optionally merged with a second code recorded
/// for the same word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedCode {
    pub code: String,
    pub pos_abbreviation: String,
    pub pos: Pos,
    pub traits: TraitValues,
    pub status: DecodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_code: Option<String>,
    /// POS of the second code when it differs from the first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_pos: Option<String>,
    /// Values of the second code that differ from the first.
    #[serde(default, skip_serializing_if = "TraitValues::is_empty")]
    pub alt: TraitValues,
}

impl DecodedCode {
    pub fn unrecognized(code: &str, pos_abbreviation: &str) -> Self {
        DecodedCode {
            code: code.to_string(),
            pos_abbreviation: pos_abbreviation.to_string(),
            pos: Pos::Unrecognized,
            traits: TraitValues::new(),
            status: DecodeStatus::Unrecognized,
            alt_code: None,
            alt_pos: None,
            alt: TraitValues::new(),
        }
    }

    pub fn trait_value(&self, category: TraitCategory) -> &str {
        self.traits.get(category)
    }

    pub fn alt_value(&self, category: TraitCategory) -> &str {
        self.alt.get(category)
    }

    /// Fold the decoding of a second code for the same word into this one.
    ///
    /// Values of `second` that differ from ours are kept under `alt`, a differing POS under
    /// `alt_pos`. The merged status is the worse of the two.
    pub fn merge(mut self, second: DecodedCode) -> DecodedCode {
        let mut categories: Vec<TraitCategory> = self.traits.iter().map(|(c, _)| c).collect();
        categories.extend(second.traits.iter().map(|(c, _)| c));
        categories.sort();
        categories.dedup();

        for category in categories {
            let ours = self.traits.get(category);
            let theirs = second.traits.get(category);
            if ours != theirs && !theirs.is_empty() {
                self.alt.insert(category, theirs);
            }
        }

        if self.pos != second.pos {
            self.alt_pos = Some(second.pos.to_string());
        }
        self.status = self.status.max(second.status);
        self.alt_code = Some(second.code);
        self
    }

    /// POS name for display and export. Two differing POS are joined as `"A / B"`; an
    /// unrecognized POS is blank.
    pub fn pos_label(&self) -> String {
        let first = self.pos.name().unwrap_or("");
        match &self.alt_pos {
            Some(alt) => format!("{first} / {alt}"),
            None => first.to_string(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == DecodeStatus::Resolved
    }
}
