use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::{Postgres, Transaction};

use crate::error::AppError;
use crate::models::word::{Word, WordEntry, WordFields};
use crate::Result;

/// Parameters for the paginated word listing. Pages are 1-indexed.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: i64,
    pub limit: i64,
    pub sort_by: String,
    pub filter: String,
}

#[derive(Debug)]
pub struct WordPage {
    pub items: Vec<WordEntry>,
    pub total_count: i64,
}

#[async_trait]
pub trait WordStore: Send + Sync {
    /// Exact-match lookup, no normalization.
    async fn find_by_word(&self, word: &str) -> Result<Option<WordEntry>>;

    /// Insert the word and all of its field rows as one transaction.
    /// Fails with `DuplicateWord` when the word is already cached.
    async fn create(&self, word: &str, fields: &WordFields) -> Result<WordEntry>;

    /// Filtered, sorted, paginated listing. `total_count` covers the whole
    /// filtered set regardless of the requested page.
    async fn list(&self, query: &ListQuery) -> Result<WordPage>;

    /// Remove the word and every field row it owns, atomically.
    async fn delete(&self, word: &str) -> Result<()>;
}

// child tables and their value columns, in collection order
const FIELD_TABLES: [(&str, &str); 4] = [
    ("definitions", "definition"),
    ("synonyms", "synonym"),
    ("translations", "translation"),
    ("examples", "example"),
];

pub struct PgWordRepository {
    pool: PgPool,
}

impl PgWordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the tables on startup if they are not there yet.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS words (
                id SERIAL PRIMARY KEY,
                word TEXT NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        for (table, column) in FIELD_TABLES {
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id SERIAL PRIMARY KEY,
                    word_id INTEGER NOT NULL REFERENCES words(id),
                    {column} TEXT NOT NULL
                )"
            ))
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn field_values(&self, table: &str, column: &str, word_id: i32) -> Result<Vec<String>> {
        let sql = format!("SELECT {column} FROM {table} WHERE word_id = $1 ORDER BY id");
        let values: Vec<String> = sqlx::query_scalar(&sql)
            .bind(word_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(values)
    }

    async fn load_fields(&self, word_id: i32) -> Result<WordFields> {
        Ok(WordFields {
            definitions: self.field_values("definitions", "definition", word_id).await?,
            synonyms: self.field_values("synonyms", "synonym", word_id).await?,
            translations: self
                .field_values("translations", "translation", word_id)
                .await?,
            examples: self.field_values("examples", "example", word_id).await?,
        })
    }
}

#[async_trait]
impl WordStore for PgWordRepository {
    async fn find_by_word(&self, word: &str) -> Result<Option<WordEntry>> {
        let row = sqlx::query_as::<_, Word>("SELECT id, word, created_at FROM words WHERE word = $1")
            .bind(word)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let fields = self.load_fields(row.id).await?;
                Ok(Some(WordEntry {
                    word: row.word,
                    fields,
                }))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, word: &str, fields: &WordFields) -> Result<WordEntry> {
        let mut tx = self.pool.begin().await?;

        let row =
            sqlx::query_as::<_, Word>("INSERT INTO words (word) VALUES ($1) RETURNING id, word, created_at")
                .bind(word)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        AppError::DuplicateWord(word.to_string())
                    } else {
                        AppError::Database(e)
                    }
                })?;

        insert_field_rows(&mut tx, "definitions", "definition", row.id, &fields.definitions).await?;
        insert_field_rows(&mut tx, "synonyms", "synonym", row.id, &fields.synonyms).await?;
        insert_field_rows(&mut tx, "translations", "translation", row.id, &fields.translations)
            .await?;
        insert_field_rows(&mut tx, "examples", "example", row.id, &fields.examples).await?;

        tx.commit().await?;

        Ok(WordEntry {
            word: row.word,
            fields: fields.clone(),
        })
    }

    async fn list(&self, query: &ListQuery) -> Result<WordPage> {
        let pattern = format!("%{}%", query.filter);

        let total_count: i64 = sqlx::query_scalar("SELECT count(*) FROM words WHERE word ILIKE $1")
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT id, word, created_at FROM words WHERE word ILIKE $1 \
             ORDER BY {} LIMIT $2 OFFSET $3",
            sort_column(&query.sort_by)
        );
        let rows = sqlx::query_as::<_, Word>(&sql)
            .bind(&pattern)
            .bind(query.limit)
            .bind(page_offset(query.page, query.limit))
            .fetch_all(&self.pool)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let fields = self.load_fields(row.id).await?;
            items.push(WordEntry {
                word: row.word,
                fields,
            });
        }

        Ok(WordPage { items, total_count })
    }

    async fn delete(&self, word: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let id: Option<i32> = sqlx::query_scalar("SELECT id FROM words WHERE word = $1")
            .bind(word)
            .fetch_optional(&mut *tx)
            .await?;
        let id = id.ok_or(AppError::WordNotFound)?;

        for (table, _) in FIELD_TABLES {
            sqlx::query(&format!("DELETE FROM {table} WHERE word_id = $1"))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query("DELETE FROM words WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

async fn insert_field_rows(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    column: &str,
    word_id: i32,
    values: &[String],
) -> Result<()> {
    let sql = format!("INSERT INTO {table} (word_id, {column}) VALUES ($1, $2)");
    for value in values {
        sqlx::query(&sql)
            .bind(word_id)
            .bind(value)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

// sort_by is interpolated into the query, so only known columns pass
fn sort_column(requested: &str) -> &'static str {
    match requested {
        "id" => "id",
        "created_at" => "created_at",
        _ => "word",
    }
}

// pages are 1-indexed; anything below 1 reads from the start
fn page_offset(page: i64, limit: i64) -> i64 {
    (page - 1).max(0) * limit
}
