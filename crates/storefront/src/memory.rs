//! In-process document store.
//!
//! Keeps documents per collection, stamps them with the local clock and
//! records every insert call in order. A store built with
//! [`MemoryStore::failing_on`] rejects the k-th call, which makes it the
//! fixture for exercising partial seeding.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    errors::StoreError,
    models::ProductRecord,
    store::{DocumentId, DocumentStore},
};

/// A document as persisted by [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub record: ProductRecord,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// One call to [`DocumentStore::insert`], successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertCall {
    pub collection: String,
    pub name: String,
}

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<StoredDocument>>>,
    calls: Mutex<Vec<InsertCall>>,
    /// 1-based index of the call that fails.
    fail_on: Option<usize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects its `call`-th insert (1-based) and accepts the rest.
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Self::default()
        }
    }

    /// Documents in `collection`, in insertion order.
    pub fn documents(&self, collection: &str) -> Vec<StoredDocument> {
        lock(&self.collections)
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of documents in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        lock(&self.collections).get(collection).map_or(0, Vec::len)
    }

    /// Every insert call received so far, in order.
    pub fn calls(&self) -> Vec<InsertCall> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(
        &self,
        collection: &str,
        record: &ProductRecord,
    ) -> Result<DocumentId, StoreError> {
        let call_number = {
            let mut calls = lock(&self.calls);
            calls.push(InsertCall {
                collection: collection.to_string(),
                name: record.name.clone(),
            });
            calls.len()
        };

        if self.fail_on == Some(call_number) {
            return Err(StoreError::Unavailable(format!(
                "insert #{call_number} into {collection} rejected"
            )));
        }

        let now = OffsetDateTime::now_utc();
        let id = DocumentId(Uuid::new_v4().simple().to_string());
        lock(&self.collections)
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                record: record.clone(),
                created_at: now,
                updated_at: now,
            });

        Ok(id)
    }
}
