//! The document store seam.

use std::fmt;

use async_trait::async_trait;

use crate::{errors::StoreError, models::ProductRecord};

/// Identifier the store assigned to a newly created document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(pub String);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A database of semi-structured documents grouped in named collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates a new document in `collection` holding `record`.
    ///
    /// The store stamps `createdAt` and `updatedAt` with its own clock and
    /// returns the generated document id. Inserting the same record twice
    /// creates two documents.
    async fn insert(
        &self,
        collection: &str,
        record: &ProductRecord,
    ) -> Result<DocumentId, StoreError>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    async fn insert(
        &self,
        collection: &str,
        record: &ProductRecord,
    ) -> Result<DocumentId, StoreError> {
        (**self).insert(collection, record).await
    }
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Box<S> {
    async fn insert(
        &self,
        collection: &str,
        record: &ProductRecord,
    ) -> Result<DocumentId, StoreError> {
        (**self).insert(collection, record).await
    }
}
