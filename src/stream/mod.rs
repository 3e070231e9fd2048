//! Word streams: the per-edition sequences of [`WordToken`]s the aligner consumes, their readers
//! (`verse_text`, JSONL and CCAT Beta Code), and the normalization used to compare surface forms.

pub mod betacode;
pub mod normalize;
pub mod reader;
pub mod token;

pub use betacode::{betacode_to_unicode, book_from_file_name, read_betacode};
pub use normalize::{mono_uc_form, normalize, std_poly_form};
pub use reader::{
    parse_verse_line, read_jsonl, read_stream, read_verse_text, write_jsonl, StreamFormat,
};
pub use token::{Edition, LexIds, VerseRef, WordToken};
