//! Morphological code decoding.
//!
//! A code such as `V-2AAP-NSM` is a POS abbreviation followed by trait letters. The [`Decoder`]
//! tries each schema entry registered for the abbreviation and returns a [`DecodedCode`] whose
//! [`DecodeStatus`] says how far it got. Decoding never fails: unknown abbreviations, wrong slot
//! counts and unknown letters all degrade to blank traits.
//!
//! ```rust
//! use koine_core::{decode::Decoder, traits::{TraitCategory, TraitStore}};
//!
//! let store = TraitStore::builtin().unwrap();
//! let decoded = Decoder::new(&store).decode("N-NSF");
//! assert_eq!(decoded.pos_label(), "Noun");
//! assert_eq!(decoded.trait_value(TraitCategory::Gender), "Feminine");
//! ```

pub mod census;
pub mod decoded;
pub mod decoder;
pub mod tokenize;

pub use census::{CodeCensus, ShapeRow, Tally};
pub use decoded::{DecodeStatus, DecodedCode, Pos, TraitValues};
pub use decoder::Decoder;
pub use tokenize::{split_code, tokenize_info};
