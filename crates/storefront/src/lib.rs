//! Storefront catalog model and document store clients.
//!
//! [`ProductRecord`] is the catalogue entry; [`DocumentStore`] is the seam
//! every writer goes through. [`FirestoreStore`] talks to Cloud Firestore
//! (or its emulator) over REST, [`MemoryStore`] keeps everything in process.

pub mod config;
pub mod credentials;
pub mod errors;
pub mod firestore;
pub mod memory;
pub mod models;
pub mod store;

pub use config::StoreConfig;
pub use credentials::CredentialSource;
pub use errors::StoreError;
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use models::ProductRecord;
pub use store::{DocumentId, DocumentStore};
