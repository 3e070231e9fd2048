use sqlx::{
    sqlite::{Sqlite, SqliteConnectOptions, SqlitePoolOptions},
    Pool, QueryBuilder,
};
use std::path::Path;

use crate::{assemble::ClassifiedWord, decode::CodeCensus, error::KoineError};

pub const CLASSIFICATION_TABLE: &str = "word_classification";
pub const POS_COMBOS_TABLE: &str = "rp_pos_combos";

/// Rows per INSERT statement, keeping bound parameters under SQLite's limit.
const INSERT_CHUNK: usize = 200;

const FIXED_COLUMNS: [&str; 19] = [
    "book",
    "chapter",
    "verse",
    "edition",
    "word_index",
    "word_order",
    "secondary_word_order",
    "joined_index",
    "surface",
    "normalized",
    "std_poly_form",
    "mono_uc_form",
    "lex_ids",
    "code",
    "alt_code",
    "pos",
    "status",
    "inherited",
    "in_disputed_pericope",
];

fn quoted(column: &str) -> String {
    format!("\"{column}\"")
}

pub async fn db_init(db_path: &Path) -> Result<Pool<Sqlite>, KoineError> {
    tracing::debug!("Opening export db: {:?}", db_path);
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Rebuild the classification table from `rows`. Returns the number of rows written.
pub async fn write_classification(
    pool: &Pool<Sqlite>,
    rows: &[ClassifiedWord],
) -> Result<usize, KoineError> {
    let trait_columns = ClassifiedWord::trait_columns();
    let columns: Vec<String> = FIXED_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(trait_columns.iter().cloned())
        .collect();

    let create = format!(
        "CREATE TABLE {CLASSIFICATION_TABLE} (\
         id INTEGER PRIMARY KEY AUTOINCREMENT, \
         book TEXT NOT NULL, chapter INTEGER NOT NULL, verse INTEGER NOT NULL, \
         edition TEXT NOT NULL, word_index INTEGER NOT NULL, \
         word_order INTEGER NOT NULL, secondary_word_order INTEGER NOT NULL, \
         joined_index INTEGER, surface TEXT NOT NULL, normalized TEXT NOT NULL, \
         std_poly_form TEXT NOT NULL, mono_uc_form TEXT NOT NULL, lex_ids TEXT NOT NULL, \
         code TEXT NOT NULL, alt_code TEXT NOT NULL, pos TEXT NOT NULL, status TEXT, \
         inherited BOOLEAN NOT NULL, in_disputed_pericope BOOLEAN NOT NULL, {})",
        trait_columns
            .iter()
            .map(|c| format!("{} TEXT NOT NULL DEFAULT ''", quoted(c)))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut tx = pool.begin().await?;
    sqlx::query(&format!("DROP TABLE IF EXISTS {CLASSIFICATION_TABLE}"))
        .execute(&mut *tx)
        .await?;
    sqlx::query(&create).execute(&mut *tx).await?;

    let insert_head = format!(
        "INSERT INTO {CLASSIFICATION_TABLE} ({}) ",
        columns
            .iter()
            .map(|c| quoted(c))
            .collect::<Vec<_>>()
            .join(", ")
    );
    for chunk in rows.chunks(INSERT_CHUNK) {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(&insert_head);
        qb.push_values(chunk, |mut b, row| {
            b.push_bind(row.book.clone())
                .push_bind(row.chapter)
                .push_bind(row.verse)
                .push_bind(row.edition.to_string())
                .push_bind(row.word_index as i64)
                .push_bind(row.word_order)
                .push_bind(row.secondary_word_order)
                .push_bind(row.joined_index.map(|i| i as i64))
                .push_bind(row.surface.clone())
                .push_bind(row.normalized.clone())
                .push_bind(row.std_poly_form.clone())
                .push_bind(row.mono_uc_form.clone())
                .push_bind(
                    row.lex_ids
                        .iter()
                        .map(|id| id.to_string())
                        .collect::<Vec<_>>()
                        .join(" "),
                )
                .push_bind(row.code.clone())
                .push_bind(row.alt_code.clone())
                .push_bind(row.pos.clone())
                .push_bind(row.status.map(|s| s.to_string()))
                .push_bind(row.inherited)
                .push_bind(row.in_disputed_pericope);
            for column in trait_columns.iter() {
                b.push_bind(row.traits.get(column).cloned().unwrap_or_default());
            }
        });
        qb.build().execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!(
        "[db] {} rebuilt with {} rows",
        CLASSIFICATION_TABLE,
        rows.len()
    );
    Ok(rows.len())
}

/// Rebuild the `(pos, info_length)` census table.
pub async fn write_census(pool: &Pool<Sqlite>, census: &CodeCensus) -> Result<usize, KoineError> {
    let shapes = census.shapes();
    let mut tx = pool.begin().await?;
    sqlx::query(&format!("DROP TABLE IF EXISTS {POS_COMBOS_TABLE}"))
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!(
        "CREATE TABLE {POS_COMBOS_TABLE} (\
         pos TEXT NOT NULL, info_length INTEGER NOT NULL, example_code TEXT, \
         count INTEGER NOT NULL DEFAULT 1, PRIMARY KEY (pos, info_length))"
    ))
    .execute(&mut *tx)
    .await?;
    for chunk in shapes.chunks(INSERT_CHUNK) {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "INSERT INTO {POS_COMBOS_TABLE} (pos, info_length, example_code, count) "
        ));
        qb.push_values(chunk, |mut b, shape| {
            b.push_bind(shape.pos.clone())
                .push_bind(shape.info_length as i64)
                .push_bind(shape.example_code.clone())
                .push_bind(shape.count as i64);
        });
        qb.build().execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(shapes.len())
}

/// Blocking wrapper for callers without a runtime: rebuilds both tables in the database at
/// `db_path`.
pub fn export_sqlite(
    db_path: &Path,
    rows: &[ClassifiedWord],
    census: &CodeCensus,
) -> Result<usize, KoineError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let pool = db_init(db_path).await?;
        let written = write_classification(&pool, rows).await?;
        write_census(&pool, census).await?;
        pool.close().await;
        Ok::<usize, KoineError>(written)
    })
}
