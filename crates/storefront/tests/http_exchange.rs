//! Wire-level tests for the Firestore store and credential exchange.
//!
//! Each test stands up a one-shot HTTP responder on a local port, points the
//! client at it and inspects both the raw request and the mapped result.

use std::path::PathBuf;

use reqwest::Client;
use storefront::{
    CredentialSource, DocumentStore, FirestoreStore, ProductRecord, StoreConfig, StoreError,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use uuid::Uuid;

const SERVICE_ACCOUNT: &str = include_str!("fixtures/service_account.json");

/// Serves a single response and hands back the raw request it received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });

    (addr, handle)
}

/// Reads headers plus a `content-length` body.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn teddy_bear() -> ProductRecord {
    ProductRecord {
        name: "Teddy Bear".to_string(),
        description: "Super soft and huggable.".to_string(),
        price: 24.99,
        original_price: Some(29.99),
        image_url: "https://images.unsplash.com/photo-1585155770447-2f66e2a397b5".to_string(),
        category: "toys".to_string(),
        rating: 4.9,
        reviews: 112,
        sizes: vec!["Small".to_string(), "Medium".to_string()],
        colors: vec!["Brown".to_string()],
        is_available: true,
    }
}

/// Writes `contents` to a unique file under the temp dir.
fn write_temp_file(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("storefront-creds-{}.json", Uuid::new_v4()));
    std::fs::write(&path, contents).unwrap();
    path
}

async fn emulator_store(addr: &str) -> FirestoreStore {
    FirestoreStore::connect(StoreConfig::new("demo").with_emulator(addr))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_insert_maps_permission_denied() {
    let (addr, server) = serve_once(
        "403 Forbidden",
        r#"{"error":{"code":403,"message":"Missing or insufficient permissions.","status":"PERMISSION_DENIED"}}"#,
    )
    .await;
    let store = emulator_store(&addr).await;

    let result = store.insert("products", &teddy_bear()).await;

    assert!(matches!(result, Err(StoreError::PermissionDenied(ref m)) if m.contains("insufficient")));

    let request = server.await.unwrap();
    let lowered = request.to_lowercase();
    assert!(request.starts_with("POST /v1/projects/demo/databases/(default)/documents:commit"));
    assert!(lowered.contains("authorization: bearer owner"));
    assert!(request.contains(r#"{"stringValue":"Teddy Bear"}"#));
    assert!(request.contains(r#""setToServerValue":"REQUEST_TIME""#));
}

#[tokio::test]
async fn test_insert_maps_quota_failure() {
    let (addr, server) = serve_once(
        "429 Too Many Requests",
        r#"{"error":{"code":429,"message":"Quota exceeded.","status":"RESOURCE_EXHAUSTED"}}"#,
    )
    .await;
    let store = emulator_store(&addr).await;

    let result = store.insert("products", &teddy_bear()).await;

    assert!(matches!(result, Err(StoreError::ResourceExhausted(_))));
    server.await.unwrap();
}

#[tokio::test]
async fn test_insert_returns_generated_id() {
    let (addr, server) = serve_once(
        "200 OK",
        r#"{"writeResults":[{"updateTime":"2026-10-19T12:00:00.000000Z"}],"commitTime":"2026-10-19T12:00:00.000000Z"}"#,
    )
    .await;
    let store = emulator_store(&addr).await;

    let id = store.insert("products", &teddy_bear()).await.unwrap();

    assert_eq!(id.to_string().len(), 20);
    let request = server.await.unwrap();
    assert!(request.contains(&format!(
        "projects/demo/databases/(default)/documents/products/{id}"
    )));
}

#[tokio::test]
async fn test_authorized_user_refresh() {
    let (addr, server) = serve_once(
        "200 OK",
        r#"{"access_token":"ya29.refreshed","expires_in":3599,"token_type":"Bearer"}"#,
    )
    .await;
    let path = write_temp_file(&format!(
        r#"{{"type":"authorized_user","client_id":"cid","client_secret":"secret","refresh_token":"1//refresh","token_uri":"http://{addr}/token"}}"#
    ));

    let token = CredentialSource::KeyFile(path.clone())
        .bearer_token(&Client::new())
        .await
        .unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(token, "ya29.refreshed");
    let request = server.await.unwrap();
    assert!(request.starts_with("POST /token"));
    assert!(request.contains("grant_type=refresh_token"));
    assert!(request.contains("refresh_token=1%2F%2Frefresh"));
}

#[tokio::test]
async fn test_service_account_exchange_then_insert() {
    let (token_addr, token_server) = serve_once(
        "200 OK",
        r#"{"access_token":"ya29.service","expires_in":3599,"token_type":"Bearer"}"#,
    )
    .await;
    let (store_addr, store_server) = serve_once(
        "200 OK",
        r#"{"writeResults":[{}],"commitTime":"2026-10-19T12:00:00Z"}"#,
    )
    .await;

    let mut key: serde_json::Value = serde_json::from_str(SERVICE_ACCOUNT).unwrap();
    key["token_uri"] = serde_json::Value::String(format!("http://{token_addr}/token"));
    let path = write_temp_file(&key.to_string());

    // emulator endpoint, real key file credentials
    let config = StoreConfig::new("demo")
        .with_emulator(store_addr)
        .with_credentials(CredentialSource::KeyFile(path.clone()));
    let store = FirestoreStore::connect(config).await.unwrap();
    let _ = std::fs::remove_file(&path);

    store.insert("products", &teddy_bear()).await.unwrap();

    let token_request = token_server.await.unwrap();
    assert!(token_request.contains(
        "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"
    ));
    assert!(token_request.contains("assertion=ey"));

    let store_request = store_server.await.unwrap().to_lowercase();
    assert!(store_request.contains("authorization: bearer ya29.service"));
}

#[tokio::test]
async fn test_token_endpoint_rejection() {
    let (addr, server) = serve_once(
        "400 Bad Request",
        r#"{"error":"invalid_grant","error_description":"Token has been expired or revoked."}"#,
    )
    .await;
    let path = write_temp_file(&format!(
        r#"{{"type":"authorized_user","client_id":"cid","client_secret":"secret","refresh_token":"stale","token_uri":"http://{addr}/token"}}"#
    ));

    let result = FirestoreStore::connect(
        StoreConfig::new("demo").with_credentials(CredentialSource::KeyFile(path.clone())),
    )
    .await;
    let _ = std::fs::remove_file(&path);

    assert!(matches!(result, Err(StoreError::Credentials(ref m)) if m.contains("invalid_grant")));
    server.await.unwrap();
}
