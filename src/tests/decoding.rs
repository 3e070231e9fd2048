//! Decoding against the built-in Robinson-Pierpont tables

use super::helpers::*;
use crate::{
    decode::{DecodeStatus, Decoder, Pos},
    traits::TraitCategory,
};
use test_log::test;

#[test]
fn test_common_codes_resolve() {
    let store = builtin_store();
    let decoder = Decoder::new(&store);
    let codes = [
        "N-NSF", "N-GPM", "N-PRI", "N-LI", "A-NUI", "A-NSN-C", "A-ASM-S", "A-NSM-N", "T-DSN",
        "P-1NS", "P-2GP", "P-GSM", "P-1DS-K", "D-NSM-K", "R-ASF", "C-APM", "K-NPM", "I-NSN",
        "X-NSM", "Q-APN", "F-3GSM", "S-1SNSM", "V-PAN", "V-2AAN", "V-PAI-3S", "V-2AAI-3P",
        "V-RPP-NSM", "V-2AAP-NSM", "V-PAI-3S-ATT", "V-2AAI-3S-ATT", "V-AAP-GPM-ATT", "ADV",
        "ADV-C", "ADV-I", "ADV-K", "CONJ", "CONJ-N", "COND", "COND-K", "PREP", "PRT", "PRT-N",
        "PRT-I", "INJ", "HEB", "ARAM",
    ];
    for code in codes {
        let decoded = decoder.decode(code);
        assert_eq!(decoded.status, DecodeStatus::Resolved, "{code} -> {decoded:?}");
        assert!(decoded.pos.is_recognized());
    }
}

#[test]
fn test_verb_slots_named() {
    let store = builtin_store();
    let decoded = Decoder::new(&store).decode("V-RPP-NSM");
    assert_eq!(decoded.pos, Pos::Known("Verb".to_string()));
    assert_eq!(decoded.trait_value(TraitCategory::Tense), "Perfect");
    assert_eq!(decoded.trait_value(TraitCategory::Voice), "Passive");
    assert_eq!(decoded.trait_value(TraitCategory::Mood), "Participle");
    assert_eq!(decoded.trait_value(TraitCategory::WordCase), "Nominative");
    assert_eq!(decoded.trait_value(TraitCategory::Number), "Singular");
    assert_eq!(decoded.trait_value(TraitCategory::Gender), "Masculine");
    assert_eq!(decoded.trait_value(TraitCategory::Person), "");
    assert_eq!(decoded.trait_value(TraitCategory::TenseType), "");
}

#[test]
fn test_suffix_categories_disambiguate() {
    let store = builtin_store();
    let decoder = Decoder::new(&store);

    let comparative = decoder.decode("A-NSN-C");
    assert_eq!(comparative.trait_value(TraitCategory::Degree), "Comparative");
    assert_eq!(comparative.trait_value(TraitCategory::Sense), "");

    let negative = decoder.decode("A-NSM-N");
    assert_eq!(negative.trait_value(TraitCategory::Sense), "Negative");
    assert_eq!(negative.trait_value(TraitCategory::Degree), "");

    let crasis = decoder.decode("ADV-K");
    assert_eq!(crasis.trait_value(TraitCategory::KaiCrasis), "Kai crasis");
}

#[test]
fn test_indeclinable_long_codes() {
    let store = builtin_store();
    let decoder = Decoder::new(&store);

    let name = decoder.decode("N-PRI");
    assert_eq!(name.trait_value(TraitCategory::WhyIndeclinable), "proper noun");
    assert_eq!(name.trait_value(TraitCategory::Indeclinable), "Indeclinable");

    let number = decoder.decode("A-NUI");
    assert_eq!(number.pos_label(), "Adjective");
    assert_eq!(number.trait_value(TraitCategory::WhyIndeclinable), "cardinal number");

    let letter = decoder.decode("N-LI");
    assert_eq!(letter.trait_value(TraitCategory::WhyIndeclinable), "letter");
}

#[test]
fn test_possessive_pronoun_has_two_numbers() {
    let store = builtin_store();
    let decoded = Decoder::new(&store).decode("S-1PGSF");
    assert_eq!(decoded.status, DecodeStatus::Resolved);
    assert_eq!(decoded.trait_value(TraitCategory::Person), "First");
    assert_eq!(decoded.trait_value(TraitCategory::PossessorNumber), "Plural");
    assert_eq!(decoded.trait_value(TraitCategory::Number), "Singular");
}

#[test]
fn test_every_decoding_is_total() {
    let store = builtin_store();
    let decoder = Decoder::new(&store);
    for code in ["", "-", "{}", "N-", "-NSF", "V--", "N-NSF-XYZ", "PREP-Q", "ΑΒΓ-NSF"] {
        let decoded = decoder.decode(code);
        // every value present must come from a table
        for (category, value) in decoded.traits.iter() {
            assert!(!value.is_empty(), "{code}: empty value stored for {category}");
        }
        assert_eq!(decoded, decoder.decode(code));
    }
}
