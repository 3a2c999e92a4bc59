use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, ensure, Result};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use jobdesk::auth::jwt::JwtService;
use jobdesk::auth::password::hash_password;
use jobdesk::auth::Role;
use jobdesk::config::{AppConfig, DuplicatePolicy};
use jobdesk::models::Account;
use jobdesk::routes;
use jobdesk::state::AppState;
use jobdesk::store::{DocumentStore, MemoryStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower::util::ServiceExt;
use uuid::Uuid;

pub const TEST_HASH_COST: u32 = 4;

pub fn test_config(policy: DuplicatePolicy) -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".to_string(),
        database_max_pool_size: 1,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        jwt_secret: "test-secret".to_string(),
        jwt_issuer: "test-issuer".to_string(),
        jwt_access_expiry_minutes: 60,
        jwt_refresh_expiry_hours: 24,
        password_hash_cost: TEST_HASH_COST,
        duplicate_policy: policy,
        store_read_timeout: Duration::from_secs(5),
        store_auth_timeout: Duration::from_secs(30),
        cors_allowed_origin: None,
    }
}

/// Account fields echoed by signup, login and refresh responses.
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct AccountBody {
    pub id: Uuid,
    pub user_id: String,
    pub role: String,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub company: String,
    pub token: String,
    pub refresh_token: String,
}

pub struct TestApp {
    #[allow(dead_code)]
    pub state: AppState,
    router: Router,
    store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::Either)
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self::with_config(test_config(policy))
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let store_for_state: Arc<dyn DocumentStore> = store.clone();
        let jwt = JwtService::from_config(&config);
        let state = AppState::new(config, store_for_state, jwt);
        let router = routes::create_router(state.clone());

        Self {
            state,
            router,
            store,
        }
    }

    #[allow(dead_code)]
    pub fn store(&self) -> Arc<MemoryStore> {
        self.store.clone()
    }

    /// Stores an admin directly, standing in for the seed binary.
    #[allow(dead_code)]
    pub async fn insert_admin(&self, email: &str, password: &str) -> Result<Uuid> {
        let password_hash = hash_password(password, TEST_HASH_COST)?;
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.store
            .insert_account(Account {
                id,
                user_id: id.to_string(),
                role: Role::Admin.as_str().to_string(),
                name: "Root Admin".to_string(),
                email: email.to_string(),
                contact: format!("admin-{id}"),
                company: "Jobdesk".to_string(),
                password_hash,
                token: String::new(),
                refresh_token: String::new(),
                created_at: now,
                updated_at: now,
            })
            .await?;
        Ok(id)
    }

    #[allow(dead_code)]
    pub async fn admin_token(&self) -> Result<String> {
        let email = format!("admin-{}@example.com", Uuid::new_v4().simple());
        self.insert_admin(&email, "admin-pass").await?;
        let admin = self.login("/admin/login", "admin", &email, "admin-pass").await?;
        Ok(admin.token)
    }

    #[allow(dead_code)]
    pub async fn signup_client(&self, email: &str, contact: &str, password: &str) -> Result<AccountBody> {
        let response = self
            .post_json(
                "/client/signup",
                &serde_json::json!({
                    "name": "Ada Lovelace",
                    "email": email,
                    "contact": contact,
                    "company": "Analytical Engines",
                    "password": password,
                }),
                None,
            )
            .await?;
        let status = response.status();
        let body = body_to_vec(response.into_body()).await?;
        ensure!(
            status == StatusCode::CREATED,
            "client signup failed with status {status}: {}",
            String::from_utf8_lossy(&body)
        );
        account_from(&body, "client")
    }

    #[allow(dead_code)]
    pub async fn login(&self, path: &str, key: &str, email: &str, password: &str) -> Result<AccountBody> {
        #[derive(Serialize)]
        struct LoginPayload<'a> {
            email: &'a str,
            password: &'a str,
        }

        let response = self
            .post_json(path, &LoginPayload { email, password }, None)
            .await?;
        let status = response.status();
        let body = body_to_vec(response.into_body()).await?;
        ensure!(
            status == StatusCode::OK,
            "login failed with status {status}: {}",
            String::from_utf8_lossy(&body)
        );
        account_from(&body, key)
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Body,
        content_type: Option<&str>,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        self.oneshot(builder.body(body)?).await
    }

    pub async fn oneshot(&self, request: Request<Body>) -> Result<hyper::Response<Body>> {
        Ok(self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible response"))
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        let body = Body::from(serde_json::to_vec(payload)?);
        self.send(Method::POST, path, body, Some("application/json"), token)
            .await
    }

    #[allow(dead_code)]
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        let body = Body::from(serde_json::to_vec(payload)?);
        self.send(Method::PUT, path, body, Some("application/json"), token)
            .await
    }

    #[allow(dead_code)]
    pub async fn patch_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> Result<hyper::Response<Body>> {
        let body = Body::from(serde_json::to_vec(payload)?);
        self.send(Method::PATCH, path, body, Some("application/json"), token)
            .await
    }

    #[allow(dead_code)]
    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<hyper::Response<Body>> {
        self.send(Method::GET, path, Body::empty(), None, token).await
    }

    #[allow(dead_code)]
    pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<hyper::Response<Body>> {
        self.send(Method::DELETE, path, Body::empty(), None, token)
            .await
    }

    #[allow(dead_code)]
    pub async fn upload_pdf(
        &self,
        filename: &str,
        data: &[u8],
        title: Option<&str>,
        user_email: Option<&str>,
        token: &str,
    ) -> Result<hyper::Response<Body>> {
        let boundary = format!("boundary-{}", Uuid::new_v4());
        let mut body = Vec::new();
        body.extend(format!("--{boundary}\r\n").as_bytes());
        body.extend(
            format!(
                "Content-Disposition: form-data; name=\"pdf_file\"; filename=\"{}\"\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend(b"Content-Type: application/pdf\r\n\r\n");
        body.extend(data);
        body.extend(b"\r\n");

        for (name, value) in [("title", title), ("user_email", user_email)] {
            if let Some(value) = value {
                body.extend(format!("--{boundary}\r\n").as_bytes());
                body.extend(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend(value.as_bytes());
                body.extend(b"\r\n");
            }
        }

        body.extend(format!("--{boundary}--\r\n").as_bytes());

        let content_type = format!("multipart/form-data; boundary={boundary}");
        self.send(
            Method::POST,
            "/client/uploadPdf",
            Body::from(body),
            Some(&content_type),
            Some(token),
        )
        .await
    }
}

pub async fn body_to_vec(body: Body) -> Result<Vec<u8>> {
    let collected = body
        .collect()
        .await
        .map_err(|err| anyhow!("failed to read response body: {err}"))?;
    Ok(collected.to_bytes().to_vec())
}

#[allow(dead_code)]
pub async fn body_json(response: hyper::Response<Body>) -> Result<Value> {
    let body = body_to_vec(response.into_body()).await?;
    Ok(serde_json::from_slice(&body)?)
}

fn account_from(body: &[u8], key: &str) -> Result<AccountBody> {
    let value: Value = serde_json::from_slice(body)?;
    let account = value
        .get(key)
        .cloned()
        .ok_or_else(|| anyhow!("response has no `{key}` object"))?;
    Ok(serde_json::from_value(account)?)
}
