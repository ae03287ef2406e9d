//! In-memory doubles for the store and the scrape source, shared by the
//! service and handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AppError;
use crate::extractor::WordSource;
use crate::models::word::{WordEntry, WordFields};
use crate::repository::{ListQuery, WordPage, WordStore};
use crate::Result;

/// In-memory store with the same contract as the Postgres repository.
pub struct MemoryStore {
    words: Mutex<HashMap<String, WordFields>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            words: Mutex::new(HashMap::new()),
        }
    }

    pub fn seeded(word: &str, fields: WordFields) -> Self {
        let store = Self::new();
        store.insert(word, fields);
        store
    }

    pub fn insert(&self, word: &str, fields: WordFields) {
        self.words
            .lock()
            .unwrap()
            .insert(word.to_string(), fields);
    }

    pub fn len(&self) -> usize {
        self.words.lock().unwrap().len()
    }
}

#[async_trait]
impl WordStore for MemoryStore {
    async fn find_by_word(&self, word: &str) -> Result<Option<WordEntry>> {
        Ok(self.words.lock().unwrap().get(word).map(|fields| WordEntry {
            word: word.to_string(),
            fields: fields.clone(),
        }))
    }

    async fn create(&self, word: &str, fields: &WordFields) -> Result<WordEntry> {
        let mut words = self.words.lock().unwrap();
        if words.contains_key(word) {
            return Err(AppError::DuplicateWord(word.to_string()));
        }
        words.insert(word.to_string(), fields.clone());
        Ok(WordEntry {
            word: word.to_string(),
            fields: fields.clone(),
        })
    }

    async fn list(&self, query: &ListQuery) -> Result<WordPage> {
        let words = self.words.lock().unwrap();
        let needle = query.filter.to_lowercase();
        let mut matched: Vec<WordEntry> = words
            .iter()
            .filter(|(word, _)| word.to_lowercase().contains(&needle))
            .map(|(word, fields)| WordEntry {
                word: word.clone(),
                fields: fields.clone(),
            })
            .collect();
        matched.sort_by(|a, b| a.word.cmp(&b.word));
        let total_count = matched.len() as i64;

        let offset = ((query.page - 1).max(0) * query.limit) as usize;
        let items = matched
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .collect();

        Ok(WordPage { items, total_count })
    }

    async fn delete(&self, word: &str) -> Result<()> {
        match self.words.lock().unwrap().remove(word) {
            Some(_) => Ok(()),
            None => Err(AppError::WordNotFound),
        }
    }
}

/// Scrape source returning fixed fields and counting invocations.
pub struct StubSource {
    fields: WordFields,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn new(fields: WordFields) -> Self {
        Self {
            fields,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WordSource for StubSource {
    async fn fetch(&self, _word: &str) -> Result<WordFields> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // give an overlapping lookup the chance to interleave here, the way
        // a real page navigation would
        tokio::task::yield_now().await;
        Ok(self.fields.clone())
    }
}

/// Scrape source that always fails, as a crashed driver would.
pub struct FailingSource;

#[async_trait]
impl WordSource for FailingSource {
    async fn fetch(&self, _word: &str) -> Result<WordFields> {
        Err(AppError::Scrape("session not created".to_string()))
    }
}

pub fn sample_fields() -> WordFields {
    WordFields {
        definitions: vec!["move at a speed faster than a walk".to_string()],
        synonyms: vec!["sprint".to_string(), "dash".to_string()],
        translations: vec!["бежать".to_string(), "бегать".to_string()],
        examples: vec!["the dog ran across the road".to_string()],
    }
}
