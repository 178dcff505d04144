//! Bearer token acquisition for the Firestore REST API.

use std::path::{Path, PathBuf};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::errors::StoreError;

/// Token endpoint of the Google Cloud compute metadata server.
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// OAuth2 token endpoint used when a credentials file names none.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scope granting read/write access to Firestore.
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Google caps signed assertions at one hour.
const ASSERTION_LIFETIME: Duration = Duration::hours(1);

/// Token the Firestore emulator accepts as an administrative credential.
const EMULATOR_TOKEN: &str = "owner";

/// Where the store connection gets its access token from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// An OAuth2 access token obtained out of band.
    AccessToken(String),
    /// A `service_account` key or `authorized_user` file, as pointed to by
    /// `GOOGLE_APPLICATION_CREDENTIALS` or written by `gcloud auth
    /// application-default login`.
    KeyFile(PathBuf),
    /// Application default credentials served by the compute metadata server.
    MetadataServer,
    /// The local emulator, which needs no real credentials.
    Emulator,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl CredentialSource {
    /// Resolves the source into a bearer token. Called once per connection.
    pub async fn bearer_token(&self, client: &Client) -> Result<String, StoreError> {
        match self {
            CredentialSource::AccessToken(token) if token.trim().is_empty() => Err(
                StoreError::Credentials("access token is empty".to_string()),
            ),
            CredentialSource::AccessToken(token) => Ok(token.trim().to_string()),
            CredentialSource::KeyFile(path) => {
                let file = CredentialsFile::load(path)?;
                file.exchange(client, OffsetDateTime::now_utc()).await
            }
            CredentialSource::Emulator => Ok(EMULATOR_TOKEN.to_string()),
            CredentialSource::MetadataServer => fetch_metadata_token(client).await,
        }
    }
}

/// Location of the file `gcloud auth application-default login` writes.
pub fn well_known_credentials_file(home: impl AsRef<Path>) -> PathBuf {
    home.as_ref()
        .join(".config")
        .join("gcloud")
        .join("application_default_credentials.json")
}

/// Contents of a Google credentials file.
#[derive(Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialsFile {
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUser),
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// A downloaded service account key.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

/// End-user credentials holding a long-lived refresh token.
#[derive(Clone, Deserialize)]
pub struct AuthorizedUser {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

/// Claims of the self-signed assertion a service account trades for a token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl ServiceAccountKey {
    /// Signs an RS256 assertion for the datastore scope, valid from `now`.
    pub fn assertion(&self, now: OffsetDateTime) -> Result<String, StoreError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: DATASTORE_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now.unix_timestamp(),
            exp: (now + ASSERTION_LIFETIME).unix_timestamp(),
        };

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| StoreError::Credentials(format!("invalid private key: {e}")))?;
        encode(&header, &claims, &key)
            .map_err(|e| StoreError::Credentials(format!("failed to sign assertion: {e}")))
    }
}

impl CredentialsFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Credentials(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json)
            .map_err(|e| StoreError::Credentials(format!("invalid credentials file: {e}")))
    }

    pub fn token_uri(&self) -> &str {
        match self {
            CredentialsFile::ServiceAccount(key) => &key.token_uri,
            CredentialsFile::AuthorizedUser(user) => &user.token_uri,
        }
    }

    /// Form fields of the token request.
    pub fn token_request(
        &self,
        now: OffsetDateTime,
    ) -> Result<Vec<(&'static str, String)>, StoreError> {
        match self {
            CredentialsFile::ServiceAccount(key) => Ok(vec![
                ("grant_type", JWT_BEARER_GRANT.to_string()),
                ("assertion", key.assertion(now)?),
            ]),
            CredentialsFile::AuthorizedUser(user) => Ok(vec![
                ("grant_type", "refresh_token".to_string()),
                ("client_id", user.client_id.clone()),
                ("client_secret", user.client_secret.clone()),
                ("refresh_token", user.refresh_token.clone()),
            ]),
        }
    }

    /// Trades the credentials for an access token at the file's token endpoint.
    pub async fn exchange(&self, client: &Client, now: OffsetDateTime) -> Result<String, StoreError> {
        let form = self.token_request(now)?;
        debug!("Requesting access token from {}", self.token_uri());

        let resp = client
            .post(self.token_uri())
            .form(&form)
            .send()
            .await
            .map_err(|e| StoreError::Credentials(format!("token endpoint not reachable: {e}")))?;

        read_token(resp, "token endpoint").await
    }
}

async fn fetch_metadata_token(client: &Client) -> Result<String, StoreError> {
    debug!("Requesting access token from metadata server");

    let resp = client
        .get(METADATA_TOKEN_URL)
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .map_err(|e| StoreError::Credentials(format!("metadata server not reachable: {e}")))?;

    read_token(resp, "metadata server").await
}

async fn read_token(resp: Response, issuer: &str) -> Result<String, StoreError> {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(StoreError::Credentials(format!(
            "{issuer} returned status {status}: {body}"
        )));
    }

    let token: TokenResponse = resp
        .json()
        .await
        .map_err(|e| StoreError::Credentials(format!("invalid {issuer} token response: {e}")))?;
    Ok(token.access_token)
}
