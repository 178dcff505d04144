//! Connection settings for the document store.

use crate::credentials::CredentialSource;

/// Project the sample catalogue is seeded into unless overridden.
pub const DEFAULT_PROJECT_ID: &str = "e-commerce-app-firbase";

/// Firestore's name for a project's primary database.
pub const DEFAULT_DATABASE_ID: &str = "(default)";

const PRODUCTION_ENDPOINT: &str = "https://firestore.googleapis.com";

/// Where the store lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub project_id: String,
    pub database_id: String,
    /// `host:port` of a Firestore emulator. Requests go over plain http.
    pub emulator_host: Option<String>,
    pub credentials: CredentialSource,
}

impl StoreConfig {
    /// Production settings for `project_id` using application default credentials.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: DEFAULT_DATABASE_ID.to_string(),
            emulator_host: None,
            credentials: CredentialSource::MetadataServer,
        }
    }

    /// Sets the database id.
    pub fn with_database(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }

    /// Points the connection at an emulator and switches to emulator credentials.
    pub fn with_emulator(mut self, host: impl Into<String>) -> Self {
        self.emulator_host = Some(host.into());
        self.credentials = CredentialSource::Emulator;
        self
    }

    /// Sets the credential source.
    pub fn with_credentials(mut self, credentials: CredentialSource) -> Self {
        self.credentials = credentials;
        self
    }

    /// Base URL of the REST endpoint, without a trailing slash.
    pub fn endpoint(&self) -> String {
        match &self.emulator_host {
            Some(host) if host.starts_with("http://") || host.starts_with("https://") => {
                host.trim_end_matches('/').to_string()
            }
            Some(host) => format!("http://{}", host.trim_end_matches('/')),
            None => PRODUCTION_ENDPOINT.to_string(),
        }
    }

    /// Resource name of the database's document root.
    pub fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database_id
        )
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT_ID)
    }
}

/// Summary of a config suitable for logging; never carries tokens.
#[derive(Debug, Clone)]
pub struct StoreTarget {
    pub project_id: String,
    pub database_id: String,
    pub endpoint: String,
}

impl From<&StoreConfig> for StoreTarget {
    fn from(config: &StoreConfig) -> Self {
        Self {
            project_id: config.project_id.clone(),
            database_id: config.database_id.clone(),
            endpoint: config.endpoint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_production() {
        let config = StoreConfig::default();
        assert_eq!(config.endpoint(), "https://firestore.googleapis.com");
        assert_eq!(
            config.documents_root(),
            "projects/e-commerce-app-firbase/databases/(default)/documents"
        );
        assert_eq!(config.credentials, CredentialSource::MetadataServer);
    }

    #[test]
    fn test_emulator_endpoint() {
        let config = StoreConfig::new("demo").with_emulator("localhost:8080");
        assert_eq!(config.endpoint(), "http://localhost:8080");
        assert_eq!(config.credentials, CredentialSource::Emulator);

        let config = StoreConfig::new("demo").with_emulator("http://127.0.0.1:8080/");
        assert_eq!(config.endpoint(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_target_summary() {
        let config = StoreConfig::new("shop")
            .with_database("staging")
            .with_credentials(CredentialSource::AccessToken("secret".to_string()));
        let target = StoreTarget::from(&config);
        assert_eq!(target.project_id, "shop");
        assert_eq!(target.database_id, "staging");
        assert!(!format!("{target:?}").contains("secret"));
    }
}
