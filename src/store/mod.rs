//! Document store adapter.
//!
//! Handlers never open collections themselves; they receive an
//! `Arc<dyn DocumentStore>` through [`crate::state::AppState`]. The Postgres
//! implementation keeps one table per collection, the in-memory one backs
//! tests and local experiments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{jwt::TokenPair, Role};
use crate::models::{
    Account, AccountChanges, AdminRequest, JobListing, JobListingPatch, PdfSummary, PdfUpload,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(String),
    #[error("store task failed: {0}")]
    Task(String),
    #[error("store operation timed out")]
    Timeout,
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    async fn count_accounts_by_email(&self, role: Role, email: &str) -> StoreResult<u64>;

    async fn count_accounts_by_contact(&self, role: Role, contact: &str) -> StoreResult<u64>;

    async fn insert_account(&self, account: Account) -> StoreResult<()>;

    async fn find_account(&self, role: Role, id: Uuid) -> StoreResult<Option<Account>>;

    async fn find_account_by_email(&self, role: Role, email: &str)
        -> StoreResult<Option<Account>>;

    async fn list_accounts(&self, role: Role) -> StoreResult<Vec<Account>>;

    /// Writes a fresh token pair onto the account. Returns `false` when no
    /// account matched.
    async fn update_account_tokens(
        &self,
        role: Role,
        id: Uuid,
        tokens: &TokenPair,
    ) -> StoreResult<bool>;

    async fn update_account_profile(
        &self,
        role: Role,
        id: Uuid,
        changes: AccountChanges,
    ) -> StoreResult<Option<Account>>;

    async fn insert_request(&self, request: AdminRequest) -> StoreResult<()>;

    async fn list_requests(&self) -> StoreResult<Vec<AdminRequest>>;

    /// Overwrites the request status unconditionally and records the reviewer.
    async fn set_request_status(
        &self,
        id: Uuid,
        status: &str,
        reviewer: Uuid,
        reviewed_at: DateTime<Utc>,
    ) -> StoreResult<Option<AdminRequest>>;

    async fn insert_job_listing(&self, listing: JobListing) -> StoreResult<()>;

    async fn list_job_listings(&self) -> StoreResult<Vec<JobListing>>;

    async fn find_job_listing(&self, id: Uuid) -> StoreResult<Option<JobListing>>;

    async fn update_job_listing(
        &self,
        id: Uuid,
        patch: JobListingPatch,
    ) -> StoreResult<Option<JobListing>>;

    /// Returns the number of removed listings; zero is not an error.
    async fn delete_job_listing(&self, id: Uuid) -> StoreResult<u64>;

    async fn insert_pdf(&self, upload: PdfUpload) -> StoreResult<()>;

    async fn find_pdf(&self, id: Uuid) -> StoreResult<Option<PdfUpload>>;

    async fn find_pdfs_by_owner(&self, user_email: &str) -> StoreResult<Vec<PdfSummary>>;

    async fn list_pdfs(&self) -> StoreResult<Vec<PdfSummary>>;
}
