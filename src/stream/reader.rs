use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
    str::FromStr,
};

use crate::{
    error::KoineError,
    stream::{
        betacode::{book_from_file_name, read_betacode},
        token::{Edition, LexIds, VerseRef, WordToken},
    },
};

static VERSE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<book>[1-3]?[A-Z]{2,4})\s+(?P<chapter>\d+):(?P<verse>\d+)(?:\s+(?P<rest>.*))?$")
        .expect("verse header pattern is valid")
});

const DROPPED_MARKS: [char; 2] = ['¶', '•'];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamFormat {
    /// `BOOK C:V word strongs {CODE} word strongs {CODE} ...`, one verse per line.
    #[default]
    VerseText,
    /// One JSON [WordToken] per line.
    Jsonl,
    /// One book of CCAT Beta Code per file, the book taken from a file name like `04_JOH.TXT`.
    Betacode,
}

impl Display for StreamFormat {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            StreamFormat::VerseText => write!(f, "verse_text"),
            StreamFormat::Jsonl => write!(f, "jsonl"),
            StreamFormat::Betacode => write!(f, "betacode"),
        }
    }
}

impl FromStr for StreamFormat {
    type Err = KoineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "verse_text" | "text" | "txt" => Ok(StreamFormat::VerseText),
            "jsonl" | "json" => Ok(StreamFormat::Jsonl),
            "betacode" | "beta_code" | "ccat" => Ok(StreamFormat::Betacode),
            other => Err(KoineError::Config(format!("unknown stream format '{other}'"))),
        }
    }
}

fn is_code(item: &str) -> bool {
    item.starts_with('{') && item.ends_with('}') && item.len() > 2
}

/// Parse one `verse_text` line. Blank lines and `#` comments give `Ok(None)`.
///
/// Numbers following a word are its lexical ids (at most three distinct ones are kept), `{...}`
/// items are its morphological codes (at most two: the parsing and a recorded alternate).
pub fn parse_verse_line(
    line: &str,
    edition: Edition,
    source_name: &str,
    line_no: usize,
) -> Result<Option<Vec<WordToken>>, KoineError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let caps = VERSE_HEADER.captures(trimmed).ok_or_else(|| {
        KoineError::stream(source_name, line_no, "expected a `BOOK C:V` verse header")
    })?;
    let chapter = caps["chapter"]
        .parse::<u32>()
        .map_err(|e| KoineError::stream(source_name, line_no, format!("bad chapter: {e}")))?;
    let verse = caps["verse"]
        .parse::<u32>()
        .map_err(|e| KoineError::stream(source_name, line_no, format!("bad verse: {e}")))?;
    let location = VerseRef::new(&caps["book"], chapter, verse);

    let mut words: Vec<WordToken> = Vec::new();
    let rest = caps.name("rest").map(|m| m.as_str()).unwrap_or("");
    for item in rest.split_whitespace() {
        if is_code(item) {
            let current = words.last_mut().ok_or_else(|| {
                KoineError::stream(source_name, line_no, format!("code {item} precedes any word"))
            })?;
            if current.codes.len() >= 2 {
                return Err(KoineError::stream(
                    source_name,
                    line_no,
                    format!("word '{}' carries more than two codes", current.surface),
                ));
            }
            current
                .codes
                .push(item.trim_matches(|c| c == '{' || c == '}').to_string());
        } else if let Ok(id) = item.parse::<u32>() {
            let current = words.last_mut().ok_or_else(|| {
                KoineError::stream(source_name, line_no, format!("number {item} precedes any word"))
            })?;
            if !current.lex_ids.push(id) && !current.lex_ids.contains(id) {
                tracing::debug!(
                    "[reader] {}:{} word '{}' has more than {} lexical ids, dropping {}",
                    source_name,
                    line_no,
                    current.surface,
                    LexIds::MAX,
                    id
                );
            }
        } else {
            let surface: String = item.chars().filter(|c| !DROPPED_MARKS.contains(c)).collect();
            if surface.is_empty() {
                continue;
            }
            let index = words.len() + 1;
            words.push(WordToken::new(edition, location.clone(), index, surface));
        }
    }
    Ok(Some(words))
}

pub fn read_verse_text<R: BufRead>(
    reader: R,
    edition: Edition,
    source_name: &str,
) -> Result<Vec<WordToken>, KoineError> {
    let mut tokens = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(words) = parse_verse_line(&line, edition, source_name, idx + 1)? {
            tokens.extend(words);
        }
    }
    Ok(tokens)
}

pub fn read_jsonl<R: BufRead>(
    reader: R,
    edition: Edition,
    source_name: &str,
) -> Result<Vec<WordToken>, KoineError> {
    let mut tokens = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut token: WordToken = serde_json::from_str(&line)
            .map_err(|e| KoineError::stream(source_name, idx + 1, e.to_string()))?;
        if token.index == 0 {
            return Err(KoineError::stream(
                source_name,
                idx + 1,
                "word index is 1-based",
            ));
        }
        token.edition = edition;
        token.ensure_normalized();
        tokens.push(token);
    }
    Ok(tokens)
}

/// Read a whole stream file, tagging every token with `edition`.
pub fn read_stream<P: AsRef<Path>>(
    path: P,
    format: StreamFormat,
    edition: Edition,
) -> Result<Vec<WordToken>, KoineError> {
    let path = path.as_ref();
    tracing::debug!("[reader] reading {} stream {:?} as {}", edition, path, format);
    let source_name = path.display().to_string();
    let reader = BufReader::new(File::open(path)?);
    let tokens = match format {
        StreamFormat::VerseText => read_verse_text(reader, edition, &source_name)?,
        StreamFormat::Jsonl => read_jsonl(reader, edition, &source_name)?,
        StreamFormat::Betacode => {
            let book = book_from_file_name(path).ok_or_else(|| {
                KoineError::Config(format!(
                    "cannot tell the book of Beta Code file {source_name}; name it like 04_JOH.TXT"
                ))
            })?;
            read_betacode(reader, &book, edition, &source_name)?
        }
    };
    tracing::info!("[reader] {} words read from {}", tokens.len(), source_name);
    Ok(tokens)
}

pub fn write_jsonl<'t, W, I>(writer: &mut W, tokens: I) -> Result<(), KoineError>
where
    W: Write,
    I: IntoIterator<Item = &'t WordToken>,
{
    for token in tokens {
        serde_json::to_writer(&mut *writer, token)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
