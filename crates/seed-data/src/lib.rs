//! Sample catalogue seeding for storefront.
//!
//! This crate loads the sample product list and writes it, record by record,
//! into a document store. The [`Seeder`](db::Seeder) stops at the first
//! failed insert and leaves earlier writes in place.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let store = MemoryStore::new();
//! let dataset = Dataset::bundled()?;
//! let report = Seeder::new(&store).run(&dataset.products).await?;
//! assert_eq!(report.len(), dataset.len());
//! ```

pub mod config;
pub mod dataset;
pub mod db;
pub mod generators;

pub use storefront::{DocumentId, DocumentStore, ProductRecord, StoreError};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::SeedConfig;
    pub use crate::dataset::{Dataset, DatasetError};
    pub use crate::db::{SeedError, SeedReport, Seeder, exit_status};
    pub use crate::generators::{ProductGenConfig, ProductGenerator};
    pub use storefront::{DocumentId, DocumentStore, FirestoreStore, MemoryStore, ProductRecord};
}
