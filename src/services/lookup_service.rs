use std::sync::Arc;

use crate::error::AppError;
use crate::extractor::WordSource;
use crate::models::word::{FieldSelection, WordEntry, WordResponse};
use crate::repository::WordStore;
use crate::Result;

/// Cache-or-scrape orchestration for single-word lookups.
pub struct LookupService {
    store: Arc<dyn WordStore>,
    source: Arc<dyn WordSource>,
}

impl LookupService {
    pub fn new(store: Arc<dyn WordStore>, source: Arc<dyn WordSource>) -> Self {
        Self { store, source }
    }

    pub async fn get(&self, word: &str, want: FieldSelection) -> Result<WordResponse> {
        let entry = match self.store.find_by_word(word).await? {
            Some(entry) => entry,
            None => self.scrape_and_store(word).await?,
        };

        Ok(shape(entry, want))
    }

    async fn scrape_and_store(&self, word: &str) -> Result<WordEntry> {
        tracing::info!(">>> cache miss, scraping: {word}");
        let fields = self.source.fetch(word).await?;

        match self.store.create(word, &fields).await {
            Ok(entry) => Ok(entry),
            // a concurrent request won the insert race; its row is canonical
            Err(AppError::DuplicateWord(_)) => self
                .store
                .find_by_word(word)
                .await?
                .ok_or(AppError::Internal("word vanished after losing the insert race")),
            Err(e) => Err(e),
        }
    }
}

fn shape(entry: WordEntry, want: FieldSelection) -> WordResponse {
    let WordEntry { word, fields } = entry;
    WordResponse {
        word,
        definition: want.definitions.then_some(fields.definitions),
        synonyms: want.synonyms.then_some(fields.synonyms),
        translations: want.translations.then_some(fields.translations),
        examples: fields.examples,
    }
}
