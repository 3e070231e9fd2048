use serde::Deserialize;
use std::{collections::BTreeMap, path::Path};

use crate::{
    config::get_content,
    error::KoineError,
    traits::{
        category::TraitCategory,
        table::{AbbrevRow, AbbrevTable, SchemaEntry, SchemaRow, TraitSchemaTable},
    },
};

/// Robinson-Pierpont code tables shipped with the crate.
pub const BUILTIN_RP_TRAITS: &str = include_str!("../../assets/rp_traits.toml");

#[derive(Debug, Default, Deserialize)]
struct TraitTableFile {
    #[serde(default)]
    schema: Vec<SchemaRow>,
    #[serde(default)]
    categories: BTreeMap<String, Vec<AbbrevRow>>,
}

/// The immutable lookup data the decoder runs against: the code schema plus one abbreviation table
/// per trait category.
///
/// Built once before decoding starts and shared by reference (it is `Sync`, so rayon workers can
/// read it concurrently).
#[derive(Debug, Clone)]
pub struct TraitStore {
    schema: TraitSchemaTable,
    tables: BTreeMap<TraitCategory, AbbrevTable>,
}

impl TraitStore {
    /// Assemble a store, checking that every schema entry has one category per slot and that every
    /// category it names has an abbreviation table, and precomputing each entry's long-code list.
    pub fn new(
        entries: Vec<SchemaEntry>,
        tables: Vec<AbbrevTable>,
    ) -> Result<TraitStore, KoineError> {
        let mut table_map = BTreeMap::new();
        for table in tables {
            let category = table.category();
            if table_map.insert(category, table).is_some() {
                return Err(KoineError::Schema(format!(
                    "abbreviation table for {category} given twice"
                )));
            }
        }

        let mut schema = TraitSchemaTable::new(entries);
        for entry in schema.entries_mut() {
            if entry.slot_count != entry.categories.len() {
                return Err(KoineError::Schema(format!(
                    "schema entry {} ({}) declares {} slots but lists {} categories",
                    entry.abbreviation,
                    entry.pos,
                    entry.slot_count,
                    entry.categories.len()
                )));
            }
            let mut long_codes = Vec::new();
            for category in entry.categories.iter() {
                let table = table_map.get(category).ok_or_else(|| {
                    KoineError::Schema(format!(
                        "schema entry {} ({}) uses category {} which has no abbreviation table",
                        entry.abbreviation, entry.pos, category
                    ))
                })?;
                long_codes.extend(table.long_codes().map(str::to_string));
            }
            // longest first, then lexicographic
            long_codes.sort_by(|a, b| {
                b.chars()
                    .count()
                    .cmp(&a.chars().count())
                    .then_with(|| a.cmp(b))
            });
            long_codes.dedup();
            entry.long_codes = long_codes;
        }

        tracing::debug!(
            "[TraitStore] loaded {} schema entries across {} trait tables",
            schema.len(),
            table_map.len()
        );

        Ok(TraitStore {
            schema,
            tables: table_map,
        })
    }

    #[cfg(test)]
    pub(crate) fn entries_mut(&mut self) -> &mut [SchemaEntry] {
        self.schema.entries_mut()
    }

    pub fn builtin() -> Result<TraitStore, KoineError> {
        TraitStore::from_toml_str(BUILTIN_RP_TRAITS)
    }

    pub fn from_toml_str(content: &str) -> Result<TraitStore, KoineError> {
        let file: TraitTableFile = toml::from_str(content)?;
        let entries = file
            .schema
            .into_iter()
            .map(SchemaEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let tables = file
            .categories
            .into_iter()
            .map(|(name, rows)| AbbrevTable::from_rows(name.parse()?, rows))
            .collect::<Result<Vec<_>, _>>()?;
        TraitStore::new(entries, tables)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<TraitStore, KoineError> {
        let content = get_content(path)?;
        TraitStore::from_toml_str(&content)
    }

    /// Load from `path` if one is given, otherwise use the built-in tables.
    pub fn load(path: Option<&Path>) -> Result<TraitStore, KoineError> {
        match path {
            Some(path) => TraitStore::from_path(path),
            None => TraitStore::builtin(),
        }
    }

    pub fn schema(&self) -> &TraitSchemaTable {
        &self.schema
    }

    pub fn table(&self, category: TraitCategory) -> Option<&AbbrevTable> {
        self.tables.get(&category)
    }

    pub fn lookup(&self, category: TraitCategory, abbreviation: &str) -> Option<&str> {
        self.tables
            .get(&category)
            .and_then(|table| table.lookup(abbreviation))
    }
}
