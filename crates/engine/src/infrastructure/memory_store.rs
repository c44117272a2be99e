//! In-memory document store.
//!
//! Used for tests and for running the engine without a database. Contents
//! are lost when the process exits.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::infrastructure::ports::{Collection, DocumentStore, RepoError};

#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: DashMap<(Collection, String), Value>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub fn count(&self, collection: Collection) -> usize {
        self.documents
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .count()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, RepoError> {
        Ok(self
            .documents
            .get(&(collection, id.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn put(&self, collection: Collection, id: &str, document: Value) -> Result<(), RepoError> {
        self.documents.insert((collection, id.to_string()), document);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), RepoError> {
        self.documents.remove(&(collection, id.to_string()));
        Ok(())
    }

    async fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>, RepoError> {
        let mut documents: Vec<(String, Value)> = self
            .documents
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .map(|entry| (entry.key().1.clone(), entry.value().clone()))
            .collect();
        documents.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(documents)
    }
}
