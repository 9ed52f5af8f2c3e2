use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::{keyed_hash_hex, PersistenceError};
use http_body_util::BodyExt;
use mockall::mock;
use nonce_api::{
    api::types::NonceResponse,
    config::Config,
    credentials::{CredentialRecord, CredentialStore, InMemoryCredentialStore, SqliteCredentialStore},
    error::{ErrorResponse, UNAUTHORIZED_MESSAGE},
    nonce::{NonceGenerator, TickNonceGenerator, STORE_API_ACTION},
    server::{AppState, Server},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const CONSUMER_KEY: &str = "abc123";
const CONSUMER_SECRET: &str = "topsecret";
const USER_ID: i64 = 17;
const NONCE_SECRET: &str = "integration-nonce-secret";

const SHA1_SIGNATURE: &str = "TUd7t8IKEpDz5+pGqHCwbjCKigA=";
const SHA256_SIGNATURE: &str = "80wwtANpVFjvpFAKlCN1vsB/5qrh5Go1Hm9FH8HzIXE=";

mock! {
    pub Store {}

    #[async_trait]
    impl CredentialStore for Store {
        async fn find_by_consumer_key(
            &self,
            hashed_key: &str,
        ) -> Result<Option<CredentialRecord>, PersistenceError>;

        async fn health_check(&self) -> Result<(), PersistenceError>;
    }
}

fn record() -> CredentialRecord {
    CredentialRecord {
        key_id: 3,
        user_id: USER_ID,
        permissions: "read".to_string(),
        consumer_key: keyed_hash_hex("wc-api", CONSUMER_KEY).unwrap(),
        consumer_secret: CONSUMER_SECRET.to_string(),
        nonces: None,
    }
}

fn nonces() -> TickNonceGenerator {
    TickNonceGenerator::new(NONCE_SECRET, 86_400)
}

fn app_with(config: Config, store: Arc<dyn CredentialStore>) -> Router {
    let state = AppState::new(Arc::new(config), store, Arc::new(nonces())).unwrap();
    Server::build_router(state)
}

fn app() -> Router {
    app_with(
        Config::default(),
        Arc::new(InMemoryCredentialStore::new([record()])),
    )
}

fn encode(value: &str) -> String {
    nonce_api::oauth::rfc3986_encode(value)
}

fn signed_query(method: &str, signature: &str) -> String {
    format!(
        "oauth_consumer_key={CONSUMER_KEY}&oauth_signature_method={method}&oauth_timestamp=1690000000&oauth_nonce=xyz&oauth_signature={}",
        encode(signature)
    )
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::HOST, "shop.test")
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Result<Value> {
    let body = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&body)?)
}

async fn assert_unauthorized(app: Router, request: Request<Body>) -> Result<()> {
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response.into_body().collect().await?.to_bytes();
    let error: ErrorResponse = serde_json::from_slice(&body)?;
    assert_eq!(error.error.code, "NONCEGATE_AUTH_ERROR");
    assert_eq!(error.error.message, UNAUTHORIZED_MESSAGE);
    Ok(())
}

#[tokio::test]
async fn test_signed_query_returns_nonce() -> Result<()> {
    let uri = format!("/nonce-request/get?{}", signed_query("HMAC-SHA1", SHA1_SIGNATURE));
    let response = app().oneshot(get(&uri)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    let nonce = body["response"]["nonce"].as_str().unwrap().to_string();
    assert_eq!(nonce.len(), 10);

    let parsed: NonceResponse = serde_json::from_value(body)?;
    assert!(nonces()
        .verify(&parsed.response.nonce, STORE_API_ACTION, USER_ID)
        .is_some());
    Ok(())
}

#[tokio::test]
async fn test_hmac_sha256_accepted() -> Result<()> {
    let uri = format!(
        "/nonce-request/get?{}",
        signed_query("HMAC-SHA256", SHA256_SIGNATURE)
    );
    let response = app().oneshot(get(&uri)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_signed_authorization_header_returns_nonce() -> Result<()> {
    let authorization = format!(
        r#"OAuth realm="shop", oauth_consumer_key="{CONSUMER_KEY}", oauth_signature_method="HMAC-SHA1", oauth_timestamp="1690000000", oauth_nonce="xyz", oauth_signature="{}""#,
        encode(SHA1_SIGNATURE)
    );
    let request = Request::builder()
        .uri("/nonce-request/get")
        .header(header::HOST, "shop.test")
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())?;

    let response = app().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_form_decoded_plus_in_signature_accepted() -> Result<()> {
    // A client that forgot to encode `+` sends it raw; form decoding turns it into a space
    let uri = format!(
        "/nonce-request/get?oauth_consumer_key={CONSUMER_KEY}&oauth_signature_method=HMAC-SHA1&oauth_timestamp=1690000000&oauth_nonce=xyz&oauth_signature={SHA1_SIGNATURE}"
    );
    let response = app().oneshot(get(&uri)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_nested_parameters_behind_prefix() -> Result<()> {
    let mut config = Config::default();
    config.oauth.site_url = Some("https://shop.test/blog/".to_string());
    let app = app_with(config, Arc::new(InMemoryCredentialStore::new([record()])));

    let uri = format!(
        "/nonce-request/get?filter%5Bstatus%5D=on+hold&filter%5Btag%5D=a%26b&page=2&{}",
        signed_query("HMAC-SHA1", "ERBnW3OJdU4WLgsbdbLRJhYGb+4=")
    );
    let response = app.oneshot(get(&uri)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_wrong_signature_rejected() -> Result<()> {
    let uri = format!(
        "/nonce-request/get?{}",
        signed_query("HMAC-SHA1", "AAAAAAAAAAAAAAAAAAAAAAAAAAA=")
    );
    assert_unauthorized(app(), get(&uri)).await
}

#[tokio::test]
async fn test_unsigned_extra_parameter_rejected() -> Result<()> {
    let uri = format!(
        "/nonce-request/get?page=2&{}",
        signed_query("HMAC-SHA1", SHA1_SIGNATURE)
    );
    assert_unauthorized(app(), get(&uri)).await
}

#[tokio::test]
async fn test_signature_bound_to_host_and_scheme() -> Result<()> {
    let uri = format!("/nonce-request/get?{}", signed_query("HMAC-SHA1", SHA1_SIGNATURE));
    let request = Request::builder()
        .uri(&uri)
        .header(header::HOST, "other.test")
        .body(Body::empty())?;
    assert_unauthorized(app(), request).await?;

    let mut config = Config::default();
    config.oauth.public_scheme = "https".to_string();
    let app = app_with(config, Arc::new(InMemoryCredentialStore::new([record()])));
    assert_unauthorized(app, get(&uri)).await
}

#[tokio::test]
async fn test_unsupported_signature_methods_rejected() -> Result<()> {
    for method in ["PLAINTEXT", "HMAC-MD5", "hmac-sha1"] {
        let uri = format!("/nonce-request/get?{}", signed_query(method, SHA1_SIGNATURE));
        assert_unauthorized(app(), get(&uri)).await?;
    }
    Ok(())
}

#[tokio::test]
async fn test_unknown_consumer_rejected() -> Result<()> {
    let uri = format!(
        "/nonce-request/get?{}",
        signed_query("HMAC-SHA1", SHA1_SIGNATURE).replace(CONSUMER_KEY, "ck_unknown")
    );
    assert_unauthorized(app(), get(&uri)).await
}

#[tokio::test]
async fn test_missing_parameters_rejected() -> Result<()> {
    assert_unauthorized(app(), get("/nonce-request/get")).await?;
    assert_unauthorized(
        app(),
        get("/nonce-request/get?oauth_consumer_key=abc123&oauth_nonce=xyz"),
    )
    .await
}

#[tokio::test]
async fn test_missing_parameters_skip_credential_lookup() -> Result<()> {
    for uri in [
        "/nonce-request/get",
        "/nonce-request/get?oauth_consumer_key=abc123&oauth_signature_method=HMAC-SHA1",
    ] {
        let mut store = MockStore::new();
        store.expect_find_by_consumer_key().never();
        assert_unauthorized(app_with(Config::default(), Arc::new(store)), get(uri)).await?;
    }
    Ok(())
}

#[tokio::test]
async fn test_store_failure_is_server_error() -> Result<()> {
    let mut store = MockStore::new();
    store.expect_find_by_consumer_key().returning(|_| {
        Err(PersistenceError::DeserializationFailed {
            details: "corrupt row".to_string(),
        })
    });

    let app = app_with(Config::default(), Arc::new(store));
    let uri = format!("/nonce-request/get?{}", signed_query("HMAC-SHA1", SHA1_SIGNATURE));
    let response = app.oneshot(get(&uri)).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await?;
    assert_eq!(body["error"]["code"], "NONCEGATE_STORE_ERROR");
    Ok(())
}

#[tokio::test]
async fn test_sqlite_backed_flow() -> Result<()> {
    let temp_dir = tempfile::TempDir::new()?;
    let mut config = Config::default();
    config.database.url = format!("sqlite:{}", temp_dir.path().join("keys.db").display());
    config.database.bootstrap_schema = true;

    let store = SqliteCredentialStore::connect(&config.database).await?;
    store.insert(&record()).await?;

    let app = app_with(config, Arc::new(store));
    let uri = format!("/nonce-request/get?{}", signed_query("HMAC-SHA1", SHA1_SIGNATURE));
    let response = app.oneshot(get(&uri)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_health_needs_no_signature() -> Result<()> {
    let response = app().oneshot(get("/health")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["credential_store_reachable"], true);
    Ok(())
}

#[tokio::test]
async fn test_health_reports_unreachable_store() -> Result<()> {
    let mut store = MockStore::new();
    store.expect_health_check().returning(|| {
        Err(PersistenceError::DeserializationFailed {
            details: "down".to_string(),
        })
    });

    let app = app_with(Config::default(), Arc::new(store));
    let body = body_json(app.oneshot(get("/health")).await?).await?;
    assert_eq!(body["status"], "degraded");
    Ok(())
}

#[tokio::test]
async fn test_openapi_document_served() -> Result<()> {
    let response = app().oneshot(get("/api-docs/openapi.json")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert!(body["paths"]["/nonce-request/get"].is_object());
    Ok(())
}

#[tokio::test]
async fn test_post_not_allowed() -> Result<()> {
    let uri = format!("/nonce-request/get?{}", signed_query("HMAC-SHA1", SHA1_SIGNATURE));
    let request = Request::builder()
        .method("POST")
        .uri(&uri)
        .header(header::HOST, "shop.test")
        .body(Body::empty())?;

    let response = app().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}
