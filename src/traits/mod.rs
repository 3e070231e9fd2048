//! Trait tables: the closed set of grammatical trait categories, the per-category abbreviation
//! tables, and the schema describing which categories each part-of-speech code carries.
//!
//! ## Key Components
//!
//! - [`TraitCategory`] - One grammatical trait (gender, tense, ...) a code slot can carry
//! - [`AbbrevTable`] - Short code to display name, for one category
//! - [`SchemaEntry`] - One structural reading of a POS abbreviation
//! - [`TraitStore`] - The immutable bundle the [`Decoder`](crate::decode::Decoder) reads
//!
//! Tables are TOML:
//!
//! ```toml
//! [[schema]]
//! abbreviation = "N"
//! pos = "Noun"
//! traits = ["word_case", "number", "gender"]
//!
//! [categories]
//! gender = [{ abbreviation = "M", name = "Masculine" }]
//! ```
//!
//! [`TraitStore::builtin`] loads the Robinson-Pierpont tables that ship with the crate.

pub mod category;
pub mod store;
pub mod table;

pub use category::{CategorySet, TraitCategory};
pub use store::{TraitStore, BUILTIN_RP_TRAITS};
pub use table::{AbbrevRow, AbbrevTable, SchemaEntry, SchemaRow, TraitSchemaTable};
