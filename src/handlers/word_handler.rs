use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::word::{FieldSelection, WordEntry, WordResponse};
use crate::repository::ListQuery;
use crate::{AppState, Result};

#[derive(Debug, Default, Deserialize)]
pub struct IncludeParams {
    #[serde(default)]
    pub include_definitions: bool,
    #[serde(default)]
    pub include_synonyms: bool,
    #[serde(default)]
    pub include_translations: bool,
}

impl From<&IncludeParams> for FieldSelection {
    fn from(params: &IncludeParams) -> Self {
        Self {
            definitions: params.include_definitions,
            synonyms: params.include_synonyms,
            translations: params.include_translations,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub include_definitions: bool,
    #[serde(default)]
    pub include_synonyms: bool,
    #[serde(default)]
    pub include_translations: bool,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            sort_by: default_sort_by(),
            filter: String::new(),
            include_definitions: false,
            include_synonyms: false,
            include_translations: false,
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

fn default_sort_by() -> String {
    "word".to_string()
}

/// Listing entry. Unlike the single-word endpoint, unrequested groups are
/// left off the object entirely rather than sent as nulls.
#[derive(Debug, Serialize)]
pub struct WordSummary {
    pub word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct WordListResponse {
    pub page: i64,
    pub limit: i64,
    pub total_count: i64,
    pub words: Vec<WordSummary>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// 1. Look a word up, scraping and caching it on a miss
pub async fn get_word(
    State(state): State<Arc<AppState>>,
    Path(word): Path<String>,
    Query(params): Query<IncludeParams>,
) -> Result<Json<WordResponse>> {
    let response = state.lookup.get(&word, FieldSelection::from(&params)).await?;
    Ok(Json(response))
}

/// 2. List cached words with paging, filtering and sorting
pub async fn list_words(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<WordListResponse>> {
    let query = ListQuery {
        page: params.page,
        limit: params.limit,
        sort_by: params.sort_by.clone(),
        filter: params.filter.clone(),
    };
    let page = state.repo.list(&query).await?;

    let words = page
        .items
        .into_iter()
        .map(|entry| summarize(entry, &params))
        .collect();

    Ok(Json(WordListResponse {
        page: params.page,
        limit: params.limit,
        total_count: page.total_count,
        words,
    }))
}

/// 3. Drop a cached word and everything scraped for it
pub async fn delete_word(
    State(state): State<Arc<AppState>>,
    Path(word): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.repo.delete(&word).await?;
    tracing::info!(">>> deleted cached word: {word}");

    Ok(Json(MessageResponse {
        message: "Word deleted successfully".to_string(),
    }))
}

fn summarize(entry: WordEntry, params: &ListParams) -> WordSummary {
    let WordEntry { word, fields } = entry;
    WordSummary {
        word,
        definition: params.include_definitions.then_some(fields.definitions),
        synonyms: params.include_synonyms.then_some(fields.synonyms),
        translations: params.include_translations.then_some(fields.translations),
    }
}
