use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `words` table.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Word {
    pub id: i32,
    pub word: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// The four scraped collections for one word, before or after storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordFields {
    pub definitions: Vec<String>,
    pub synonyms: Vec<String>,
    pub translations: Vec<String>,
    pub examples: Vec<String>,
}

/// A cached word together with everything scraped for it.
#[derive(Debug, Clone, PartialEq)]
pub struct WordEntry {
    pub word: String,
    pub fields: WordFields,
}

/// Which optional field groups the caller asked for.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldSelection {
    pub definitions: bool,
    pub synonyms: bool,
    pub translations: bool,
}

/// Single-word response. The optional keys are always present and null
/// unless their include flag was set; `examples` is always a list. The key
/// for definitions is the singular `definition` on the wire.
#[derive(Debug, Serialize)]
pub struct WordResponse {
    pub word: String,
    pub definition: Option<Vec<String>>,
    pub synonyms: Option<Vec<String>>,
    pub translations: Option<Vec<String>>,
    pub examples: Vec<String>,
}
