//! Beta Code, the ASCII transliteration of Greek used by the CCAT majority text files.
//!
//! A file holds one book. `CC:VV` items open a verse, `?` marks a paragraph and `{...}` spans hold
//! variant readings; the last two are dropped. Capitals are written `*` + diacritics + letter, so
//! `*)IHSOU=S` is `Ἰησοῦς`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::{io::BufRead, path::Path};
use unicode_normalization::UnicodeNormalization;

use crate::{
    error::KoineError,
    stream::token::{Edition, LexIds, VerseRef, WordToken},
};

static VERSE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<chapter>\d{1,3}):(?P<verse>\d{1,3})$").expect("verse marker pattern is valid")
});

const PARAGRAPH_MARK: char = '?';
const CAPITAL: char = '*';

fn letter(c: char) -> Option<char> {
    let lower = match c.to_ascii_uppercase() {
        'A' => 'α',
        'B' => 'β',
        'G' => 'γ',
        'D' => 'δ',
        'E' => 'ε',
        'V' => 'ϝ',
        'Z' => 'ζ',
        'H' => 'η',
        'Q' => 'θ',
        'I' => 'ι',
        'K' => 'κ',
        'L' => 'λ',
        'M' => 'μ',
        'N' => 'ν',
        'C' => 'ξ',
        'O' => 'ο',
        'P' => 'π',
        'R' => 'ρ',
        'S' => 'σ',
        'T' => 'τ',
        'U' => 'υ',
        'F' => 'φ',
        'X' => 'χ',
        'Y' => 'ψ',
        'W' => 'ω',
        _ => return None,
    };
    Some(lower)
}

fn diacritic(c: char) -> Option<char> {
    match c {
        ')' => Some('\u{0313}'),
        '(' => Some('\u{0314}'),
        '/' => Some('\u{0301}'),
        '\\' => Some('\u{0300}'),
        '=' => Some('\u{0342}'),
        '+' => Some('\u{0308}'),
        '|' => Some('\u{0345}'),
        _ => None,
    }
}

fn punctuation(c: char) -> Option<char> {
    match c {
        '.' => Some('.'),
        ',' => Some(','),
        ':' => Some('\u{0387}'),
        ';' => Some('\u{037E}'),
        '\'' => Some('\u{2019}'),
        '-' => Some('-'),
        '_' => Some('\u{2014}'),
        _ => None,
    }
}

fn is_last_letter(chars: &[char], idx: usize) -> bool {
    chars[idx + 1..].iter().all(|c| letter(*c).is_none())
}

/// Sigma at `idx`: `S1` medial, `S2` final, `S3` lunate, otherwise final when no letter follows.
/// Returns the letter and how many input characters it used.
fn sigma(chars: &[char], idx: usize) -> (char, usize) {
    match chars.get(idx + 1) {
        Some('1') => ('σ', 2),
        Some('2') => ('ς', 2),
        Some('3') => ('ϲ', 2),
        _ if is_last_letter(chars, idx) => ('ς', 1),
        _ => ('σ', 1),
    }
}

fn transliterate(word: &str) -> Result<String, String> {
    let chars: Vec<char> = word.chars().collect();
    let mut out = String::with_capacity(word.len() * 2);
    let mut idx = 0;
    while idx < chars.len() {
        let c = chars[idx];
        if c == CAPITAL {
            let marks_start = idx + 1;
            let mut marks_end = marks_start;
            while chars.get(marks_end).is_some_and(|m| diacritic(*m).is_some()) {
                marks_end += 1;
            }
            let capital = chars
                .get(marks_end)
                .and_then(|l| letter(*l))
                .ok_or_else(|| format!("'{CAPITAL}' is not followed by a letter in '{word}'"))?;
            out.extend(capital.to_uppercase());
            out.extend(chars[marks_start..marks_end].iter().filter_map(|m| diacritic(*m)));
            idx = marks_end + 1;
            if capital == 'σ' && chars.get(idx).is_some_and(|d| matches!(d, '1' | '2' | '3')) {
                idx += 1;
            }
            continue;
        }
        match letter(c) {
            Some('σ') => {
                let (form, used) = sigma(&chars, idx);
                out.push(form);
                idx += used;
                continue;
            }
            Some(lower) => out.push(lower),
            None => {
                let mark = diacritic(c)
                    .or_else(|| punctuation(c))
                    .ok_or_else(|| format!("unknown Beta Code character '{c}' in '{word}'"))?;
                out.push(mark);
            }
        }
        idx += 1;
    }
    Ok(out.nfc().collect())
}

/// Transliterate one Beta Code word to NFC Unicode Greek.
///
/// ```rust
/// use koine_core::stream::betacode_to_unicode;
///
/// assert_eq!(betacode_to_unicode("LO/GOS")?, "λόγος");
/// # Ok::<(), koine_core::KoineError>(())
/// ```
pub fn betacode_to_unicode(word: &str) -> Result<String, KoineError> {
    transliterate(word).map_err(KoineError::Serialization)
}

/// Book abbreviation from a CCAT file name: `04_JOH.TXT` and `JOH.txt` both give `JOH`.
pub fn book_from_file_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let book = stem
        .split_once('_')
        .map(|(_, book)| book)
        .unwrap_or(stem)
        .trim()
        .to_uppercase();
    (!book.is_empty() && book.chars().all(|c| c.is_ascii_alphanumeric())).then_some(book)
}

/// Drop paragraph marks and `{...}` spans. `in_variant` carries an open span across lines.
fn strip_variants(line: &str, in_variant: &mut bool, dropped: &mut usize) -> String {
    let mut kept = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '{' => {
                *in_variant = true;
                *dropped += 1;
            }
            '}' if *in_variant => {
                *in_variant = false;
                // keep words on either side of the span apart
                kept.push(' ');
            }
            _ if *in_variant || c == PARAGRAPH_MARK => {}
            _ => kept.push(c),
        }
    }
    kept
}

/// Read one book of Beta Code. Words before the first `CC:VV` marker belong to 1:1; numbers after a
/// word are its lexical ids.
pub fn read_betacode<R: BufRead>(
    reader: R,
    book: &str,
    edition: Edition,
    source_name: &str,
) -> Result<Vec<WordToken>, KoineError> {
    let mut location = VerseRef::new(book, 1, 1);
    let mut index = 0;
    let mut in_variant = false;
    let mut variants = 0;
    let mut tokens: Vec<WordToken> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        for item in strip_variants(&line, &mut in_variant, &mut variants).split_whitespace() {
            if let Some(caps) = VERSE_MARKER.captures(item) {
                let chapter = caps["chapter"].parse::<u32>().map_err(|e| {
                    KoineError::stream(source_name, line_no, format!("bad chapter: {e}"))
                })?;
                let verse = caps["verse"].parse::<u32>().map_err(|e| {
                    KoineError::stream(source_name, line_no, format!("bad verse: {e}"))
                })?;
                let next = VerseRef::new(book, chapter, verse);
                if next != location {
                    location = next;
                    index = 0;
                }
                continue;
            }

            if let Ok(id) = item.parse::<u32>() {
                let current = tokens.last_mut().filter(|_| index > 0).ok_or_else(|| {
                    KoineError::stream(source_name, line_no, format!("number {item} precedes any word"))
                })?;
                if !current.lex_ids.push(id) && !current.lex_ids.contains(id) {
                    tracing::debug!(
                        "[betacode] {}:{} word '{}' has more than {} lexical ids, dropping {}",
                        source_name,
                        line_no,
                        current.surface,
                        LexIds::MAX,
                        id
                    );
                }
                continue;
            }

            let surface = transliterate(item)
                .map_err(|message| KoineError::stream(source_name, line_no, message))?;
            if !surface.chars().any(char::is_alphabetic) {
                continue;
            }
            index += 1;
            tokens.push(WordToken::new(edition, location.clone(), index, surface));
        }
    }

    if in_variant {
        tracing::warn!("[betacode] {}: variant reading left open at end of file", source_name);
    }
    tracing::debug!("[betacode] {}: {} variant readings dropped", source_name, variants);
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn nfc(s: &str) -> String {
        s.nfc().collect()
    }

    fn uni(word: &str) -> String {
        betacode_to_unicode(word).unwrap()
    }

    #[test]
    fn test_letters_and_diacritics() {
        assert_eq!(uni("E)N"), nfc("ἐν"));
        assert_eq!(uni("A)RXH=|"), nfc("ἀρχῇ"));
        assert_eq!(uni("H)=N"), nfc("ἦν"));
        assert_eq!(uni("QEO\\S"), nfc("θεὸς"));
        assert_eq!(uni("DII+"), nfc("διϊ"));
        assert_eq!(uni("e)n"), nfc("ἐν"));
    }

    #[test]
    fn test_capitals_carry_leading_diacritics() {
        assert_eq!(uni("*)IHSOU=S"), nfc("Ἰησοῦς"));
        assert_eq!(uni("*(H"), nfc("Ἡ"));
        assert_eq!(uni("*XRISTO/S"), nfc("Χριστός"));
        assert_eq!(uni("*SI/MWN"), nfc("Σίμων"));
    }

    #[test]
    fn test_sigma_forms() {
        assert_eq!(uni("LO/GOS"), nfc("λόγος"));
        assert_eq!(uni("LO/GOS,"), nfc("λόγος,"));
        assert_eq!(uni("SWTH/R"), nfc("σωτήρ"));
        assert_eq!(uni("PROS1"), "προσ");
        assert_eq!(uni("S2"), "ς");
        assert_eq!(uni("S3"), "ϲ");
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(uni("KO/SMOU:"), nfc("κόσμου\u{0387}"));
        assert_eq!(uni("TI/;"), nfc("τί\u{037E}"));
        assert_eq!(uni("A)LL'"), nfc("ἀλλ\u{2019}"));
    }

    #[test]
    fn test_bad_words_rejected() {
        assert!(matches!(betacode_to_unicode("*"), Err(KoineError::Serialization(_))));
        assert!(betacode_to_unicode("*/").is_err());
        assert!(betacode_to_unicode("LO#GOS").is_err());
    }

    #[test]
    fn test_book_from_file_name() {
        assert_eq!(book_from_file_name(Path::new("ccat/04_JOH.TXT")).as_deref(), Some("JOH"));
        assert_eq!(book_from_file_name(Path::new("07_1CO.TXT")).as_deref(), Some("1CO"));
        assert_eq!(book_from_file_name(Path::new("rev.txt")).as_deref(), Some("REV"));
        assert_eq!(book_from_file_name(Path::new("04_J.O.H")), None);
    }

    #[test]
    fn test_read_book_resets_index_per_verse() {
        let text = "01:01 *)EN A)RXH=| H)=N O( LO/GOS, ?\n\
                    KAI\\ O( LO/GOS {VAR1: KAI\\ O( LO/GOS} H)=N\n\
                    01:02 OU(=TOS H)=N\n";
        let tokens = read_betacode(Cursor::new(text), "JOH", Edition::Base, "04_JOH.TXT").unwrap();
        assert_eq!(tokens.len(), 11);

        let first = &tokens[0];
        assert_eq!(first.location, VerseRef::new("JOH", 1, 1));
        assert_eq!(first.surface, nfc("Ἐν"));
        assert_eq!(first.normalized, "εν");
        assert_eq!(tokens[8].index, 9);
        assert_eq!(tokens[8].surface, nfc("ἦν"));

        let second = &tokens[9];
        assert_eq!(second.location, VerseRef::new("JOH", 1, 2));
        assert_eq!(second.index, 1);
        assert_eq!(second.surface, nfc("οὗτος"));
    }

    #[test]
    fn test_variant_spans_cross_lines() {
        let text = "03:16 OU(/TWS {VAR1: OU(/TWS\nGA\\R} GA\\R H)GA/PHSEN\n";
        let tokens = read_betacode(Cursor::new(text), "JOH", Edition::Overlay, "mem").unwrap();
        let surfaces: Vec<&str> = tokens.iter().map(|t| t.surface.as_str()).collect();
        assert_eq!(surfaces, vec![nfc("οὕτως"), nfc("γὰρ"), nfc("ἠγάπησεν")]);
        assert!(tokens.iter().all(|t| t.edition == Edition::Overlay));
    }

    #[test]
    fn test_numbers_become_lexical_ids() {
        let text = "01:01 *)EN 1722 A)RXH=| 746\n";
        let tokens = read_betacode(Cursor::new(text), "JOH", Edition::Base, "mem").unwrap();
        assert_eq!(tokens[0].lex_ids.as_slice(), &[1722]);
        assert_eq!(tokens[1].lex_ids.first(), Some(746));

        let err = read_betacode(Cursor::new("01:01 1722 *)EN"), "JOH", Edition::Base, "mem")
            .unwrap_err();
        assert!(matches!(err, KoineError::Stream { line: 1, .. }));
    }

    #[test]
    fn test_unknown_character_reports_line() {
        let text = "01:01 *)EN\n01:02 LO#GOS\n";
        let err = read_betacode(Cursor::new(text), "JOH", Edition::Base, "04_JOH.TXT").unwrap_err();
        assert!(matches!(err, KoineError::Stream { line: 2, .. }));
    }
}
