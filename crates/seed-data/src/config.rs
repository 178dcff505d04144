//! Configuration for seeding runs.

use std::path::PathBuf;

use storefront::{
    CredentialSource, StoreConfig, config::DEFAULT_PROJECT_ID,
    credentials::well_known_credentials_file,
};

use crate::db::DEFAULT_COLLECTION;

/// Everything a seeding run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Store connection settings.
    pub store: StoreConfig,

    /// External dataset file. The bundled catalogue is used when unset.
    pub dataset_path: Option<PathBuf>,

    /// Target collection.
    pub collection: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            dataset_path: None,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl SeedConfig {
    /// Reads the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Credentials are picked in order: emulator host, explicit access token,
    /// `GOOGLE_APPLICATION_CREDENTIALS`, the gcloud application-default file
    /// under `HOME` if it exists, and finally the metadata server.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let project_id = var("FIRESTORE_PROJECT_ID")
            .or_else(|| var("GOOGLE_CLOUD_PROJECT"))
            .unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string());

        let mut store = StoreConfig::new(project_id);
        if let Some(database_id) = var("FIRESTORE_DATABASE_ID") {
            store = store.with_database(database_id);
        }
        if let Some(token) = var("GOOGLE_OAUTH_ACCESS_TOKEN") {
            store = store.with_credentials(CredentialSource::AccessToken(token));
        } else if let Some(path) = var("GOOGLE_APPLICATION_CREDENTIALS") {
            store = store.with_credentials(CredentialSource::KeyFile(PathBuf::from(path)));
        } else if let Some(path) = var("HOME")
            .map(well_known_credentials_file)
            .filter(|p| p.is_file())
        {
            store = store.with_credentials(CredentialSource::KeyFile(path));
        }
        if let Some(host) = var("FIRESTORE_EMULATOR_HOST") {
            store = store.with_emulator(host);
        }

        Self {
            store,
            dataset_path: var("SEED_PRODUCTS_PATH").map(PathBuf::from),
            collection: var("SEED_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        }
    }
}
