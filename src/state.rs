use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    auth::jwt::JwtService,
    config::AppConfig,
    error::{AppError, AppResult},
    store::{DocumentStore, StoreError},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub jwt: JwtService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>, jwt: JwtService) -> Self {
        Self {
            config: Arc::new(config),
            store,
            jwt,
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Runs a single store operation under the read budget.
    pub async fn bounded<T, E, F>(&self, operation: F) -> AppResult<T>
    where
        F: Future<Output = Result<T, E>>,
        AppError: From<E>,
    {
        within(self.config.store_read_timeout, operation).await
    }

    /// Runs a registration/login sequence under the longer auth budget.
    pub async fn bounded_auth<T, F>(&self, sequence: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        within(self.config.store_auth_timeout, sequence).await
    }
}

async fn within<T, E, F>(budget: Duration, operation: F) -> AppResult<T>
where
    F: Future<Output = Result<T, E>>,
    AppError: From<E>,
{
    match tokio::time::timeout(budget, operation).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => Err(AppError::internal(StoreError::Timeout)),
    }
}
