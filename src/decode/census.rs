use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::{decode::tokenize::split_code, traits::TraitSchemaTable};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub count: usize,
    pub example_code: String,
}

impl Tally {
    fn record(&mut self, code: &str) {
        if self.count == 0 {
            self.example_code = code.to_string();
        }
        self.count += 1;
    }

    fn absorb(&mut self, other: &Tally) {
        if self.count == 0 {
            self.example_code = other.example_code.clone();
        }
        self.count += other.count;
    }
}

/// One `(pos, info_length)` shape seen in a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeRow {
    pub pos: String,
    pub info_length: usize,
    pub example_code: String,
    pub count: usize,
}

/// Survey of the codes in a corpus, used to draft and check trait tables.
///
/// Counts codes per POS abbreviation and per `(pos, info_length)` shape, keeping the first code
/// seen as an example of each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeCensus {
    by_pos: BTreeMap<String, Tally>,
    by_shape: BTreeMap<String, BTreeMap<usize, Tally>>,
    total: usize,
}

impl CodeCensus {
    pub fn new() -> Self {
        CodeCensus::default()
    }

    pub fn record(&mut self, code: &str) {
        let (pos, info) = split_code(code);
        if pos.is_empty() {
            return;
        }
        let info_length = info.chars().count();
        self.by_pos.entry(pos.clone()).or_default().record(code);
        self.by_shape
            .entry(pos)
            .or_default()
            .entry(info_length)
            .or_default()
            .record(code);
        self.total += 1;
    }

    pub fn extend<'c, I: IntoIterator<Item = &'c str>>(&mut self, codes: I) {
        for code in codes {
            self.record(code);
        }
    }

    /// Fold another census into this one. Examples already present are kept.
    pub fn merge(&mut self, other: &CodeCensus) {
        for (pos, tally) in other.by_pos.iter() {
            self.by_pos.entry(pos.clone()).or_default().absorb(tally);
        }
        for (pos, shapes) in other.by_shape.iter() {
            let ours = self.by_shape.entry(pos.clone()).or_default();
            for (len, tally) in shapes.iter() {
                ours.entry(*len).or_default().absorb(tally);
            }
        }
        self.total += other.total;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn pos_counts(&self) -> impl Iterator<Item = (&str, &Tally)> {
        self.by_pos.iter().map(|(pos, tally)| (pos.as_str(), tally))
    }

    /// Every shape, ordered by POS abbreviation then info length.
    pub fn shapes(&self) -> Vec<ShapeRow> {
        self.by_shape
            .iter()
            .flat_map(|(pos, shapes)| {
                shapes.iter().map(move |(len, tally)| ShapeRow {
                    pos: pos.clone(),
                    info_length: *len,
                    example_code: tally.example_code.clone(),
                    count: tally.count,
                })
            })
            .collect()
    }

    /// POS abbreviations seen in the corpus that have no schema entry.
    pub fn unknown_pos(&self, schema: &TraitSchemaTable) -> BTreeSet<String> {
        self.by_pos
            .keys()
            .filter(|pos| !schema.contains(pos))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::TraitStore;

    #[test]
    fn test_shapes_count_and_example() {
        let mut census = CodeCensus::new();
        census.extend(["N-NSF", "N-GSM", "N-PRI", "V-PAI-3S", "CONJ", "N-ASN"]);

        assert_eq!(census.total(), 6);
        let shapes = census.shapes();
        let noun3 = shapes
            .iter()
            .find(|s| s.pos == "N" && s.info_length == 3)
            .unwrap();
        assert_eq!(noun3.count, 4);
        assert_eq!(noun3.example_code, "N-NSF");

        let conj = shapes.iter().find(|s| s.pos == "CONJ").unwrap();
        assert_eq!(conj.info_length, 0);
        assert_eq!(shapes.first().unwrap().pos, "CONJ");
    }

    #[test]
    fn test_unknown_pos_against_schema() {
        let store = TraitStore::builtin().unwrap();
        let mut census = CodeCensus::new();
        census.extend(["N-NSF", "ZZ-Q", "YY"]);
        let unknown = census.unknown_pos(store.schema());
        assert_eq!(
            unknown.into_iter().collect::<Vec<_>>(),
            vec!["YY".to_string(), "ZZ".to_string()]
        );
    }

    #[test]
    fn test_merge_keeps_first_example() {
        let mut left = CodeCensus::new();
        left.record("N-NSF");
        let mut right = CodeCensus::new();
        right.extend(["N-GSM", "V-PAN"]);
        left.merge(&right);

        assert_eq!(left.total(), 3);
        let noun = left.pos_counts().find(|(pos, _)| *pos == "N").unwrap().1;
        assert_eq!(noun.count, 2);
        assert_eq!(noun.example_code, "N-NSF");
    }
}
