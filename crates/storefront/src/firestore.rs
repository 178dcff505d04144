//! Cloud Firestore REST v1 client.
//!
//! Each insert is a single-write `documents:commit` request: the document is
//! created under a client-generated auto-id with a `exists: false`
//! precondition, and `createdAt`/`updatedAt` are filled in by the server via
//! `REQUEST_TIME` field transforms.

use async_trait::async_trait;
use rand::{Rng, distributions::Alphanumeric};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::{
    config::{StoreConfig, StoreTarget},
    errors::StoreError,
    models::{CREATED_AT, ProductRecord, UPDATED_AT},
    store::{DocumentId, DocumentStore},
};

/// Length of Firestore auto-generated document ids.
const AUTO_ID_LEN: usize = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitResponse {
    #[serde(default)]
    commit_time: Option<String>,
}

/// A connected Firestore database.
pub struct FirestoreStore {
    client: Client,
    config: StoreConfig,
    token: String,
}

impl FirestoreStore {
    /// Resolves credentials and returns a store bound to `config`'s database.
    pub async fn connect(config: StoreConfig) -> Result<Self, StoreError> {
        let client = Client::new();
        let token = config.credentials.bearer_token(&client).await?;

        debug!(store = ?StoreTarget::from(&config), "Firestore connection ready");

        Ok(Self {
            client,
            config,
            token,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn commit_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/{}/documents:commit",
            self.config.endpoint(),
            self.config.project_id,
            self.config.database_id
        )
    }

    /// Full resource name of a document.
    fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/{id}", self.config.documents_root())
    }

    /// Builds the commit request creating one document.
    pub fn commit_body(
        &self,
        collection: &str,
        id: &str,
        record: &ProductRecord,
    ) -> Result<Value, StoreError> {
        let fields = encode_fields(&serde_json::to_value(record)?)?;

        Ok(json!({
            "writes": [{
                "update": {
                    "name": self.document_name(collection, id),
                    "fields": fields,
                },
                "currentDocument": { "exists": false },
                "updateTransforms": [
                    { "fieldPath": CREATED_AT, "setToServerValue": "REQUEST_TIME" },
                    { "fieldPath": UPDATED_AT, "setToServerValue": "REQUEST_TIME" },
                ],
            }]
        }))
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn insert(
        &self,
        collection: &str,
        record: &ProductRecord,
    ) -> Result<DocumentId, StoreError> {
        let id = auto_id();
        let body = self.commit_body(collection, &id, record)?;

        debug!("Committing {}/{} ({})", collection, id, record.name);

        let resp = self
            .client
            .post(self.commit_url())
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::from_response(status, &body));
        }

        let commit: CommitResponse = resp.json().await?;
        debug!(
            "Committed {}/{} at {}",
            collection,
            id,
            commit.commit_time.as_deref().unwrap_or("unknown time")
        );

        Ok(DocumentId(id))
    }
}

/// Generates a 20-character alphanumeric document id.
pub fn auto_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(AUTO_ID_LEN)
        .map(char::from)
        .collect()
}

/// Encodes a JSON object as a Firestore `fields` map.
pub fn encode_fields(value: &Value) -> Result<Map<String, Value>, StoreError> {
    match value {
        Value::Object(map) => Ok(map
            .iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect()),
        other => Err(StoreError::InvalidArgument(format!(
            "document must be an object, got {other}"
        ))),
    }
}

/// Encodes a JSON value as a Firestore typed `Value`.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            // integerValue is a decimal string on the wire
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else if let Some(u) = n.as_u64() {
                json!({ "integerValue": u.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), encode_value(v)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}
