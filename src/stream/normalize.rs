use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

const COMBINING_GRAVE: char = '\u{0300}';
const COMBINING_ACUTE: char = '\u{0301}';

/// Superscripts, subscripts and spacing modifier letters that editions use for footnote and
/// variant markers.
fn is_marker_letter(c: char) -> bool {
    matches!(c,
        '\u{00AA}' | '\u{00B2}' | '\u{00B3}' | '\u{00B9}' | '\u{00BA}'
        | '\u{02B0}'..='\u{02FF}'
        | '\u{1D2C}'..='\u{1D6A}'
        | '\u{1D9B}'..='\u{1DBF}'
        | '\u{2070}'..='\u{209F}')
}

fn final_sigma(word: String) -> String {
    match word.strip_suffix('σ') {
        Some(stem) => format!("{stem}ς"),
        None => word,
    }
}

/// Matching form of a word: no diacritics, no punctuation or markers, lowercase, final sigma.
///
/// `Ἐν` and `ἐν,` both normalize to `εν`.
pub fn normalize(word: &str) -> String {
    let letters: String = word
        .nfd()
        .filter(|c| !is_combining_mark(*c) && !is_marker_letter(*c))
        .nfc()
        .filter(|c| c.is_alphabetic())
        .collect();
    final_sigma(letters.to_lowercase())
}

/// Standard polytonic form: accents and breathings kept, graves written as acutes, punctuation
/// dropped, lowercase except for the initial of a proper noun.
pub fn std_poly_form(word: &str, proper_noun: bool) -> String {
    let decomposed: String = word
        .nfd()
        .filter(|c| !is_marker_letter(*c) && (c.is_alphabetic() || is_combining_mark(*c)))
        .map(|c| if c == COMBINING_GRAVE { COMBINING_ACUTE } else { c })
        .collect();
    let lowered = final_sigma(decomposed.to_lowercase());
    let cased = if proper_noun {
        let mut chars = lowered.chars();
        match chars.next() {
            Some(initial) => initial.to_uppercase().chain(chars).collect(),
            None => lowered,
        }
    } else {
        lowered
    };
    cased.nfc().collect()
}

/// Monotonic uppercase form: no diacritics, uppercase, sigma written as lunate `C`.
pub fn mono_uc_form(word: &str) -> String {
    normalize(word)
        .to_uppercase()
        .chars()
        .map(|c| if c == 'Σ' { 'C' } else { c })
        .collect()
}
