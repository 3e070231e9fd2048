use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::{
    error::KoineError,
    traits::category::{CategorySet, TraitCategory},
};

/// One row of an abbreviation table: the short code as it appears inside a morphological code, and
/// the display name it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbbrevRow {
    pub abbreviation: String,
    pub name: String,
}

/// Maps short trait codes of a single [TraitCategory] to display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbrevTable {
    category: TraitCategory,
    names: BTreeMap<String, String>,
}

impl AbbrevTable {
    /// Build a table from its rows. Empty abbreviations and abbreviations that appear twice are
    /// rejected, since either would make the lookup ambiguous.
    pub fn from_rows(category: TraitCategory, rows: Vec<AbbrevRow>) -> Result<Self, KoineError> {
        let mut names = BTreeMap::new();
        for row in rows {
            let abbreviation = row.abbreviation.trim().to_string();
            if abbreviation.is_empty() {
                return Err(KoineError::Schema(format!(
                    "empty abbreviation for '{}' in {category} table",
                    row.name
                )));
            }
            if let Some(existing) = names.insert(abbreviation.clone(), row.name.clone()) {
                return Err(KoineError::Schema(format!(
                    "abbreviation '{abbreviation}' appears twice in {category} table ('{existing}' and '{}')",
                    row.name
                )));
            }
        }
        Ok(AbbrevTable { category, names })
    }

    pub fn category(&self) -> TraitCategory {
        self.category
    }

    pub fn lookup(&self, abbreviation: &str) -> Option<&str> {
        self.names.get(abbreviation).map(String::as_str)
    }

    /// Abbreviations longer than one character. These must be known before a code can be
    /// tokenized.
    pub fn long_codes(&self) -> impl Iterator<Item = &str> {
        self.names
            .keys()
            .filter(|abbrev| abbrev.chars().count() > 1)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Serialized form of a [SchemaEntry].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRow {
    pub abbreviation: String,
    pub pos: String,
    #[serde(default)]
    pub traits: Vec<String>,
    /// Exact number of trait slots. Defaults to the length of `traits`.
    #[serde(default)]
    pub slots: Option<usize>,
}

/// One structural reading of a part-of-speech abbreviation: which trait categories its code
/// carries, in slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub abbreviation: String,
    pub pos: String,
    pub categories: Vec<TraitCategory>,
    pub slot_count: usize,
    pub category_set: CategorySet,
    /// Long codes of every category in `categories`, longest first. Filled in by
    /// [crate::traits::TraitStore] once all abbreviation tables are known.
    pub(crate) long_codes: Vec<String>,
}

impl SchemaEntry {
    pub fn new(
        abbreviation: &str,
        pos: &str,
        categories: Vec<TraitCategory>,
    ) -> Result<Self, KoineError> {
        let slot_count = categories.len();
        SchemaEntry::with_slots(abbreviation, pos, categories, slot_count)
    }

    /// Create an entry that only uses the first `slot_count` categories. Category lists shorter
    /// than the slot count, or repeating a category, are rejected.
    pub fn with_slots(
        abbreviation: &str,
        pos: &str,
        mut categories: Vec<TraitCategory>,
        slot_count: usize,
    ) -> Result<Self, KoineError> {
        let abbreviation = abbreviation.trim();
        if abbreviation.is_empty() {
            return Err(KoineError::Schema(format!(
                "schema entry for '{pos}' has an empty abbreviation"
            )));
        }
        if categories.len() < slot_count {
            return Err(KoineError::Schema(format!(
                "schema entry {abbreviation} ({pos}) declares {slot_count} slots but names only {} categories",
                categories.len()
            )));
        }
        if categories.len() > slot_count {
            tracing::debug!(
                "[SchemaEntry] {} ({}) uses the first {} of {} listed categories",
                abbreviation,
                pos,
                slot_count,
                categories.len()
            );
            categories.truncate(slot_count);
        }
        let mut category_set = CategorySet::new();
        for category in categories.iter() {
            if !category_set.insert(*category) {
                return Err(KoineError::Schema(format!(
                    "schema entry {abbreviation} ({pos}) repeats category {category}"
                )));
            }
        }
        Ok(SchemaEntry {
            abbreviation: abbreviation.to_string(),
            pos: pos.to_string(),
            categories,
            slot_count,
            category_set,
            long_codes: Vec::new(),
        })
    }

    pub fn long_codes(&self) -> &[String] {
        &self.long_codes
    }
}

impl TryFrom<SchemaRow> for SchemaEntry {
    type Error = KoineError;

    fn try_from(row: SchemaRow) -> Result<Self, Self::Error> {
        let categories = row
            .traits
            .iter()
            .map(|name| name.parse::<TraitCategory>())
            .collect::<Result<Vec<_>, _>>()?;
        let slots = row.slots.unwrap_or(categories.len());
        SchemaEntry::with_slots(&row.abbreviation, &row.pos, categories, slots)
    }
}

/// The ordered schema entries, indexed by abbreviation. Entry order is the input order and is the
/// tie-break between candidates that share an abbreviation.
#[derive(Debug, Clone, Default)]
pub struct TraitSchemaTable {
    entries: Vec<SchemaEntry>,
    by_abbreviation: HashMap<String, Vec<usize>>,
}

impl TraitSchemaTable {
    pub fn new(entries: Vec<SchemaEntry>) -> Self {
        let mut by_abbreviation: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_abbreviation
                .entry(entry.abbreviation.clone())
                .or_default()
                .push(idx);
        }
        TraitSchemaTable {
            entries,
            by_abbreviation,
        }
    }

    /// Every entry sharing `abbreviation`, in table order.
    pub fn candidates<'a>(&'a self, abbreviation: &str) -> impl Iterator<Item = &'a SchemaEntry> {
        self.by_abbreviation
            .get(abbreviation)
            .into_iter()
            .flatten()
            .map(move |idx| &self.entries[*idx])
    }

    pub fn contains(&self, abbreviation: &str) -> bool {
        self.by_abbreviation.contains_key(abbreviation)
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [SchemaEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(abbreviation: &str, name: &str) -> AbbrevRow {
        AbbrevRow {
            abbreviation: abbreviation.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_duplicate_abbreviation_rejected() {
        let res = AbbrevTable::from_rows(
            TraitCategory::Gender,
            vec![row("M", "Masculine"), row("M", "Middle")],
        );
        assert!(matches!(res, Err(KoineError::Schema(_))));
    }

    #[test]
    fn test_long_codes_only_multi_char() {
        let table = AbbrevTable::from_rows(
            TraitCategory::AtticGreekForm,
            vec![row("ATT", "Attic form"), row("A", "Other")],
        )
        .unwrap();
        assert_eq!(table.long_codes().collect::<Vec<_>>(), vec!["ATT"]);
        assert_eq!(table.lookup("A"), Some("Other"));
        assert_eq!(table.lookup("B"), None);
    }

    #[test]
    fn test_schema_entry_slot_validation() {
        let short = SchemaEntry::with_slots("N", "Noun", vec![TraitCategory::Gender], 2);
        assert!(short.is_err());

        let repeated = SchemaEntry::new(
            "N",
            "Noun",
            vec![TraitCategory::Gender, TraitCategory::Gender],
        );
        assert!(repeated.is_err());

        let truncated = SchemaEntry::with_slots(
            "N",
            "Noun",
            vec![TraitCategory::WordCase, TraitCategory::Number, TraitCategory::Gender],
            2,
        )
        .unwrap();
        assert_eq!(
            truncated.categories,
            vec![TraitCategory::WordCase, TraitCategory::Number]
        );
        assert!(!truncated.category_set.contains(TraitCategory::Gender));
    }

    #[test]
    fn test_candidates_keep_table_order() {
        let table = TraitSchemaTable::new(vec![
            SchemaEntry::new("P", "Personal Pronoun", vec![TraitCategory::Person]).unwrap(),
            SchemaEntry::new("N", "Noun", vec![]).unwrap(),
            SchemaEntry::new("P", "Personal Pronoun", vec![TraitCategory::WordCase]).unwrap(),
        ]);
        let cats = table
            .candidates("P")
            .map(|e| e.categories.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            cats,
            vec![vec![TraitCategory::Person], vec![TraitCategory::WordCase]]
        );
        assert_eq!(table.candidates("X").count(), 0);
    }
}
