#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use keyed_shortener::config::{Config, Environment};
use keyed_shortener::domain::entities::{ApiKey, NewApiKey, NewShortUrl, ShortUrl, ShortUrlPatch};
use keyed_shortener::domain::repositories::{ApiKeyRepository, ShortUrlRepository};
use keyed_shortener::error::AppError;
use keyed_shortener::routes;
use keyed_shortener::state::AppState;

pub const ADMIN_TOKEN: &str = "test-admin-token-0123456789";
pub const BASE_URL: &str = "https://sho.rt";
pub const REDIRECT_URL: &str = "https://example.org/home";

pub fn test_config(environment: Environment) -> Config {
    Config {
        environment,
        database_url: "postgres://localhost/unused".to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: None,
        log_format: "text".to_string(),
        base_url: BASE_URL.to_string(),
        redirect_url: REDIRECT_URL.to_string(),
        short_code_length: 6,
        secret_key: "test-secret-key".to_string(),
        admin_token: ADMIN_TOKEN.to_string(),
        db_max_connections: 1,
        db_connect_timeout: 1,
        db_idle_timeout: 60,
        db_max_lifetime: 60,
    }
}

// ─── In-memory repositories ──────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryApiKeyRepository {
    keys: Mutex<Vec<ApiKey>>,
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn create(&self, new_key: NewApiKey) -> Result<ApiKey, AppError> {
        let mut keys = self.keys.lock().unwrap();
        if keys.iter().any(|k| k.key_hash == new_key.key_hash) {
            return Err(AppError::conflict("Duplicate key hash", json!({})));
        }

        let now = Utc::now();
        let key = ApiKey {
            id: keys.len() as i64 + 1,
            name: new_key.name,
            key_hash: new_key.key_hash,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        keys.push(key.clone());
        Ok(key)
    }

    async fn find_active_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, AppError> {
        let keys = self.keys.lock().unwrap();
        Ok(keys
            .iter()
            .find(|k| k.key_hash == key_hash && k.is_active)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiKey>, AppError> {
        let keys = self.keys.lock().unwrap();
        Ok(keys.iter().find(|k| k.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiKey>, AppError> {
        let keys = self.keys.lock().unwrap();
        Ok(keys.iter().find(|k| k.name == name).cloned())
    }

    async fn list(&self) -> Result<Vec<ApiKey>, AppError> {
        let keys = self.keys.lock().unwrap();
        Ok(keys.iter().rev().cloned().collect())
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<Option<ApiKey>, AppError> {
        let mut keys = self.keys.lock().unwrap();
        Ok(keys.iter_mut().find(|k| k.id == id).map(|k| {
            k.is_active = is_active;
            k.updated_at = Utc::now();
            k.clone()
        }))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.keys.lock().unwrap().len() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryShortUrlRepository {
    urls: Mutex<Vec<ShortUrl>>,
    next_id: Mutex<i64>,
    offline: AtomicBool,
}

impl InMemoryShortUrlRepository {
    /// Makes `ping` fail, as if the database went away.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    /// Rewrites a stored URL in place; lets tests plant expired rows.
    pub fn modify(&self, code: &str, f: impl FnOnce(&mut ShortUrl)) {
        let mut urls = self.urls.lock().unwrap();
        if let Some(url) = urls.iter_mut().find(|u| u.code == code) {
            f(url);
        }
    }
}

#[async_trait]
impl ShortUrlRepository for InMemoryShortUrlRepository {
    async fn insert(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let mut urls = self.urls.lock().unwrap();
        if urls.iter().any(|u| u.code == new_url.code) {
            return Err(AppError::conflict(
                "Short code already exists",
                json!({ "code": new_url.code }),
            ));
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;

        let now = Utc::now();
        let url = ShortUrl {
            id: *next_id,
            code: new_url.code,
            original_url: new_url.original_url,
            expires_at: new_url.expires_at,
            api_key_id: new_url.api_key_id,
            created_at: now,
            updated_at: now,
        };
        urls.push(url.clone());
        Ok(url)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError> {
        let urls = self.urls.lock().unwrap();
        Ok(urls.iter().find(|u| u.code == code).cloned())
    }

    async fn find_owned_by_id(
        &self,
        id: i64,
        api_key_id: i64,
    ) -> Result<Option<ShortUrl>, AppError> {
        let urls = self.urls.lock().unwrap();
        Ok(urls
            .iter()
            .find(|u| u.id == id && u.is_owned_by(api_key_id))
            .cloned())
    }

    async fn find_owned_by_code(
        &self,
        code: &str,
        api_key_id: i64,
    ) -> Result<Option<ShortUrl>, AppError> {
        let urls = self.urls.lock().unwrap();
        Ok(urls
            .iter()
            .find(|u| u.code == code && u.is_owned_by(api_key_id))
            .cloned())
    }

    async fn list_by_owner(
        &self,
        api_key_id: i64,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<ShortUrl>, AppError> {
        let urls = self.urls.lock().unwrap();
        Ok(urls
            .iter()
            .rev()
            .filter(|u| u.is_owned_by(api_key_id))
            .skip(((page - 1) * page_size) as usize)
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn count_by_owner(&self, api_key_id: i64) -> Result<i64, AppError> {
        let urls = self.urls.lock().unwrap();
        Ok(urls.iter().filter(|u| u.is_owned_by(api_key_id)).count() as i64)
    }

    async fn update_owned(
        &self,
        id: i64,
        api_key_id: i64,
        patch: ShortUrlPatch,
    ) -> Result<Option<ShortUrl>, AppError> {
        let mut urls = self.urls.lock().unwrap();
        Ok(urls
            .iter_mut()
            .find(|u| u.id == id && u.is_owned_by(api_key_id))
            .map(|u| {
                patch.apply_to(u);
                u.updated_at = Utc::now();
                u.clone()
            }))
    }

    async fn delete_owned(&self, id: i64, api_key_id: i64) -> Result<bool, AppError> {
        let mut urls = self.urls.lock().unwrap();
        let before = urls.len();
        urls.retain(|u| !(u.id == id && u.is_owned_by(api_key_id)));
        Ok(urls.len() < before)
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::internal("connection refused", json!({})));
        }
        Ok(())
    }
}

// ─── Test harness ────────────────────────────────────────────────────────────

pub struct TestApp {
    pub server: TestServer,
    pub urls: Arc<InMemoryShortUrlRepository>,
    pub keys: Arc<InMemoryApiKeyRepository>,
}

pub fn spawn_app() -> TestApp {
    spawn_app_in(Environment::Development)
}

pub fn spawn_app_in(environment: Environment) -> TestApp {
    let urls = Arc::new(InMemoryShortUrlRepository::default());
    let keys = Arc::new(InMemoryApiKeyRepository::default());

    let state = AppState::from_repositories(
        keys.clone(),
        urls.clone(),
        Arc::new(test_config(environment)),
    );

    let server = TestServer::new(routes::router(state)).unwrap();

    TestApp { server, urls, keys }
}

impl TestApp {
    /// Issues a key through the admin API and returns `(id, plaintext)`.
    pub async fn issue_key(&self, name: &str) -> (i64, String) {
        let response = self
            .server
            .post("/api/admin/keys")
            .add_header("X-Admin-Token", ADMIN_TOKEN)
            .json(&json!({ "name": name }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: Value = response.json();
        (
            body["id"].as_i64().unwrap(),
            body["key"].as_str().unwrap().to_string(),
        )
    }

    /// Creates a short URL with `key` and returns the response body.
    pub async fn create_url(&self, key: &str, body: Value) -> Value {
        let response = self
            .server
            .post("/api/urls")
            .add_header("X-API-Key", key)
            .json(&body)
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
