use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::error::KoineError;

/// [TraitCategory] enumerates every grammatical trait a morphological code slot can carry. The set
/// is closed: trait tables naming any other category are rejected at load time.
///
/// The serialized names double as the export column names (`alt_` prefixed for alternates).
#[derive(Debug, Serialize, Deserialize, PartialOrd, Ord, Hash, EnumSetType)]
#[enumset(repr = "u32")]
#[serde(rename_all = "snake_case")]
pub enum TraitCategory {
    Gender,
    Number,
    #[serde(alias = "case")]
    WordCase,
    Tense,
    /// Tense variant marker, e.g. the `2` of a second aorist
    #[serde(rename = "type")]
    TenseType,
    Voice,
    Mood,
    Person,
    Indeclinable,
    #[serde(alias = "description")]
    WhyIndeclinable,
    #[serde(alias = "kai_incrasis")]
    KaiCrasis,
    #[serde(alias = "extra")]
    AtticGreekForm,
    /// Comparative/superlative suffix of adjectives and adverbs
    Degree,
    /// Number of the possessor in possessive pronouns
    PossessorNumber,
    /// Interrogative or negative suffix of particles, adverbs and adjectives
    Sense,
}

pub type CategorySet = EnumSet<TraitCategory>;

impl TraitCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraitCategory::Gender => "gender",
            TraitCategory::Number => "number",
            TraitCategory::WordCase => "word_case",
            TraitCategory::Tense => "tense",
            TraitCategory::TenseType => "type",
            TraitCategory::Voice => "voice",
            TraitCategory::Mood => "mood",
            TraitCategory::Person => "person",
            TraitCategory::Indeclinable => "indeclinable",
            TraitCategory::WhyIndeclinable => "why_indeclinable",
            TraitCategory::KaiCrasis => "kai_crasis",
            TraitCategory::AtticGreekForm => "attic_greek_form",
            TraitCategory::Degree => "degree",
            TraitCategory::PossessorNumber => "possessor_number",
            TraitCategory::Sense => "sense",
        }
    }

    /// Column name used for the value recorded from a second, disagreeing code.
    pub fn alt_name(&self) -> String {
        format!("alt_{}", self.as_str())
    }
}

impl Display for TraitCategory {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TraitCategory {
    type Err = KoineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s.trim().to_lowercase().as_str() {
            "gender" => TraitCategory::Gender,
            "number" => TraitCategory::Number,
            "word_case" | "case" => TraitCategory::WordCase,
            "tense" => TraitCategory::Tense,
            "type" | "tense_type" => TraitCategory::TenseType,
            "voice" => TraitCategory::Voice,
            "mood" => TraitCategory::Mood,
            "person" => TraitCategory::Person,
            "indeclinable" => TraitCategory::Indeclinable,
            "why_indeclinable" | "description" => TraitCategory::WhyIndeclinable,
            "kai_crasis" | "kai_incrasis" => TraitCategory::KaiCrasis,
            "attic_greek_form" | "extra" => TraitCategory::AtticGreekForm,
            "degree" => TraitCategory::Degree,
            "possessor_number" => TraitCategory::PossessorNumber,
            "sense" => TraitCategory::Sense,
            other => {
                return Err(KoineError::Schema(format!(
                    "unknown trait category '{other}'"
                )))
            }
        };
        Ok(category)
    }
}
