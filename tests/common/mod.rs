//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use koine_core::stream::{Edition, VerseRef, WordToken};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times; subsequent calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// A majority-text style stream: John 1:1 and 1:2, the pericope verse John 7:53, and a word with a
/// recorded second parsing.
#[allow(dead_code)]
pub const BASE_VERSE_TEXT: &str = "\
# book chapter:verse then word strongs {CODE}
JOH 1:1 Ἐν 1722 {PREP} ἀρχῇ 746 {N-DSF} ἦν 1510 {V-IAI-3S} ὁ 3588 {T-NSM} λόγος 3056 {N-NSM}
JOH 1:2 Οὗτος 3778 {D-NSM} ἦν 1510 {V-IAI-3S} ἐν 1722 {PREP} ἀρχῇ 746 {N-DSF} πρὸς 4314 {PREP} τὸν 3588 {T-ASM} θεόν 2316 {N-ASM}

JOH 7:53 ¶ Καὶ 2532 {CONJ} ἐπορεύθη 4198 {V-AOI-3S} ἕκαστος 1538 {A-NSM} εἰς 1519 {PREP} τὸν 3588 {T-ASM} οἶκον 3624 {N-ASM} αὐτοῦ 846 {P-GSM}
MAR 1:1 Ἀρχὴ 746 {N-NSF} τοῦ 3588 {T-GSN} εὐαγγελίου 2098 {N-GSN} Ἰησοῦ 2424 {N-GSM} χριστοῦ 5547 {N-GSM}
";

/// The matching overlay: no John 7:53, `ἦν` dropped from 1:2, and `υἱοῦ θεοῦ` added to Mark 1:1
/// without codes.
#[allow(dead_code)]
pub const OVERLAY_JSONL: &str = r#"{"book":"JOH","chapter":1,"verse":1,"index":1,"surface":"Ἐν","lex_ids":[1722],"codes":["PREP"]}
{"book":"JOH","chapter":1,"verse":1,"index":2,"surface":"ἀρχῇ","lex_ids":[746],"codes":["N-DSF"]}
{"book":"JOH","chapter":1,"verse":1,"index":3,"surface":"ἦν","lex_ids":[1510],"codes":["V-IAI-3S"]}
{"book":"JOH","chapter":1,"verse":1,"index":4,"surface":"ὁ","lex_ids":[3588],"codes":["T-NSM"]}
{"book":"JOH","chapter":1,"verse":1,"index":5,"surface":"λόγος","lex_ids":[3056],"codes":["N-NSM"]}
{"book":"JOH","chapter":1,"verse":2,"index":1,"surface":"οὗτος","lex_ids":[3778],"codes":["D-NSM"]}
{"book":"JOH","chapter":1,"verse":2,"index":2,"surface":"ἐν","lex_ids":[1722],"codes":["PREP"]}
{"book":"JOH","chapter":1,"verse":2,"index":3,"surface":"ἀρχῇ","lex_ids":[746],"codes":["N-DSF"]}
{"book":"JOH","chapter":1,"verse":2,"index":4,"surface":"πρὸς","lex_ids":[4314],"codes":["PREP"]}
{"book":"JOH","chapter":1,"verse":2,"index":5,"surface":"τὸν","lex_ids":[3588],"codes":["T-ASM"]}
{"book":"JOH","chapter":1,"verse":2,"index":6,"surface":"θεόν","lex_ids":[2316]}
{"book":"MAR","chapter":1,"verse":1,"index":1,"surface":"Ἀρχὴ","lex_ids":[746],"codes":["N-NSF"]}
{"book":"MAR","chapter":1,"verse":1,"index":2,"surface":"τοῦ","lex_ids":[3588],"codes":["T-GSN"]}
{"book":"MAR","chapter":1,"verse":1,"index":3,"surface":"εὐαγγελίου","lex_ids":[2098],"codes":["N-GSN"]}
{"book":"MAR","chapter":1,"verse":1,"index":4,"surface":"Ἰησοῦ","lex_ids":[2424],"codes":["N-GSM"]}
{"book":"MAR","chapter":1,"verse":1,"index":5,"surface":"χριστοῦ","lex_ids":[5547],"codes":["N-GSM"]}
{"book":"MAR","chapter":1,"verse":1,"index":6,"surface":"υἱοῦ","lex_ids":[5207]}
{"book":"MAR","chapter":1,"verse":1,"index":7,"surface":"θεοῦ","lex_ids":[2316]}
"#;

/// Write both fixture streams and a pipeline config into `dir`, returning the config path.
#[allow(dead_code)]
pub fn write_fixture(dir: &TempDir, mode: &str) -> PathBuf {
    std::fs::write(dir.path().join("base.txt"), BASE_VERSE_TEXT).unwrap();
    std::fs::write(dir.path().join("overlay.jsonl"), OVERLAY_JSONL).unwrap();
    let config = format!(
        r#"
threads = 2

[base]
path = "base.txt"
format = "verse_text"

[overlay]
path = "overlay.jsonl"
format = "jsonl"

[align]
mode = "{mode}"

[output]
jsonl = "out/classified.jsonl"
"#
    );
    std::fs::create_dir_all(dir.path().join("out")).unwrap();
    let path = dir.path().join("koine.toml");
    std::fs::write(&path, config).unwrap();
    path
}

/// Read a JSON Lines file into values.
#[allow(dead_code)]
pub fn read_json_lines(path: &Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

/// One token per lexical id, indexed from 1.
#[allow(dead_code)]
pub fn id_words(edition: Edition, location: &VerseRef, ids: &[u32]) -> Vec<WordToken> {
    ids.iter()
        .enumerate()
        .map(|(idx, id)| {
            WordToken::new(edition, location.clone(), idx + 1, format!("w{id}")).with_lex_ids([*id])
        })
        .collect()
}

/// One token per surface form, indexed from 1.
#[allow(dead_code)]
pub fn surface_words(edition: Edition, location: &VerseRef, words: &[&str]) -> Vec<WordToken> {
    words
        .iter()
        .enumerate()
        .map(|(idx, word)| WordToken::new(edition, location.clone(), idx + 1, *word))
        .collect()
}
