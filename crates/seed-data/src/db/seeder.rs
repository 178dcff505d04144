//! Catalogue seeding.

use storefront::{DocumentId, DocumentStore, ProductRecord, StoreError};
use thiserror::Error;
use tracing::{error, info};

/// Collection the sample catalogue is written to.
pub const DEFAULT_COLLECTION: &str = "products";

#[derive(Debug, Error)]
pub enum SeedError {
    /// An insert failed. Documents written before it are left in place.
    #[error("Failed to add product {name:?} (record {position}): {source}")]
    Insert {
        name: String,
        /// 1-based position of the failed record.
        position: usize,
        /// Ids of the documents written before the failure, in order.
        inserted: Vec<DocumentId>,
        source: StoreError,
    },
}

/// Outcome of a run in which every record was written.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    /// Generated ids, in input order.
    pub inserted: Vec<DocumentId>,
}

impl SeedReport {
    pub fn len(&self) -> usize {
        self.inserted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty()
    }
}

/// Process exit status for a finished run: 0 when it succeeded, 1 otherwise.
pub fn exit_status<T, E>(result: &Result<T, E>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Writes products into a document store, one at a time.
pub struct Seeder<S> {
    store: S,
    collection: String,
}

impl<S: DocumentStore> Seeder<S> {
    /// Creates a seeder writing to the `products` collection.
    pub fn new(store: S) -> Self {
        Self {
            store,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    /// Sets the target collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Inserts `records` in order, awaiting each write before issuing the next.
    ///
    /// Stops at the first failing insert. There are no retries and no
    /// rollback: whatever was written before the failure stays written and
    /// is listed in [`SeedError::Insert`]. Running twice creates every
    /// document twice.
    pub async fn run(&self, records: &[ProductRecord]) -> Result<SeedReport, SeedError> {
        let mut inserted = Vec::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            match self.store.insert(&self.collection, record).await {
                Ok(id) => {
                    info!("Added product: {}", record.name);
                    inserted.push(id);
                }
                Err(source) => {
                    let err = SeedError::Insert {
                        name: record.name.clone(),
                        position: i + 1,
                        inserted,
                        source,
                    };
                    error!("Error adding products: {err}");
                    return Err(err);
                }
            }
        }

        info!("All products have been added successfully");
        Ok(SeedReport { inserted })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns a reference to the store for advanced usage.
    pub fn store(&self) -> &S {
        &self.store
    }
}
