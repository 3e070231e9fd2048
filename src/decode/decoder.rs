use crate::{
    decode::{
        decoded::{DecodeStatus, DecodedCode, Pos, TraitValues},
        tokenize::{split_code, tokenize_info},
    },
    traits::{SchemaEntry, TraitStore},
};

/// Decodes morphological codes against a [TraitStore].
///
/// Decoding is total: every input yields a [DecodedCode], with problems reported through
/// [DecodedCode::status] rather than as errors.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    store: &'a TraitStore,
}

/// Outcome of trying one schema entry against the trait letters.
struct Attempt {
    traits: TraitValues,
    valid: bool,
}

impl<'a> Decoder<'a> {
    pub fn new(store: &'a TraitStore) -> Self {
        Decoder { store }
    }

    pub fn store(&self) -> &'a TraitStore {
        self.store
    }

    /// Decode a single code such as `V-2AAP-NSM` or `{N-NSF}`.
    ///
    /// Candidates sharing the POS abbreviation are tried in table order. Candidates whose token
    /// count differs from their slot count are skipped; the first remaining candidate whose every
    /// slot resolves wins. Failing that, the last candidate that passed the count check is returned
    /// with its unresolved slots left blank.
    pub fn decode(&self, code: &str) -> DecodedCode {
        let (pos_abbreviation, info) = split_code(code);
        let mut candidates = self.store.schema().candidates(&pos_abbreviation).peekable();

        let Some(first_entry) = candidates.peek().copied() else {
            tracing::debug!("[Decoder] '{}': no schema entry for '{}'", code, pos_abbreviation);
            return DecodedCode::unrecognized(code, &pos_abbreviation);
        };

        let mut best_effort: Option<(&SchemaEntry, TraitValues)> = None;
        for entry in candidates {
            let Some(attempt) = self.attempt(entry, &info) else {
                continue;
            };
            if attempt.valid {
                return DecodedCode {
                    code: code.to_string(),
                    pos_abbreviation,
                    pos: Pos::Known(entry.pos.clone()),
                    traits: attempt.traits,
                    status: DecodeStatus::Resolved,
                    alt_code: None,
                    alt_pos: None,
                    alt: TraitValues::new(),
                };
            }
            best_effort = Some((entry, attempt.traits));
        }

        let (entry, traits, status) = match best_effort {
            Some((entry, traits)) => (entry, traits, DecodeStatus::Partial),
            None => (first_entry, TraitValues::new(), DecodeStatus::Unresolved),
        };
        tracing::debug!(
            "[Decoder] '{}' decoded as {} ({})",
            code,
            entry.pos,
            status
        );
        DecodedCode {
            code: code.to_string(),
            pos_abbreviation,
            pos: Pos::Known(entry.pos.clone()),
            traits,
            status,
            alt_code: None,
            alt_pos: None,
            alt: TraitValues::new(),
        }
    }

    /// Decode the first code of a word and, when present, merge in the second.
    pub fn decode_pair(&self, first: &str, second: Option<&str>) -> DecodedCode {
        let decoded = self.decode(first);
        match second {
            Some(second) => decoded.merge(self.decode(second)),
            None => decoded,
        }
    }

    /// `None` when the token count does not match the entry's slot count.
    fn attempt(&self, entry: &SchemaEntry, info: &str) -> Option<Attempt> {
        let tokens = tokenize_info(info, entry.long_codes());
        if tokens.len() != entry.slot_count {
            return None;
        }
        assert_eq!(
            tokens.len(),
            entry.categories.len(),
            "schema entry {} ({}) declares {} slots but lists {} categories",
            entry.abbreviation,
            entry.pos,
            entry.slot_count,
            entry.categories.len()
        );

        let mut traits = TraitValues::new();
        let mut valid = true;
        for (category, token) in entry.categories.iter().zip(tokens) {
            match self.store.lookup(*category, token) {
                Some(name) => traits.insert(*category, name),
                None => valid = false,
            }
        }
        Some(Attempt { traits, valid })
    }
}
