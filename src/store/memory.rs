use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, StoreResult};
use crate::auth::{jwt::TokenPair, Role};
use crate::models::{
    Account, AccountChanges, AdminRequest, JobListing, JobListingPatch, PdfSummary, PdfUpload,
};

#[derive(Default)]
struct Collections {
    accounts: Vec<Account>,
    requests: Vec<AdminRequest>,
    job_listings: Vec<JobListing>,
    pdf_uploads: Vec<PdfUpload>,
}

/// Process-local store keeping every collection in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn pdf_count(&self) -> usize {
        self.collections.read().await.pdf_uploads.len()
    }

    pub async fn account_count(&self, role: Role) -> usize {
        let guard = self.collections.read().await;
        guard
            .accounts
            .iter()
            .filter(|account| account.role == role.as_str())
            .count()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn count_accounts_by_email(&self, role: Role, email: &str) -> StoreResult<u64> {
        let guard = self.collections.read().await;
        Ok(guard
            .accounts
            .iter()
            .filter(|account| account.role == role.as_str() && account.email == email)
            .count() as u64)
    }

    async fn count_accounts_by_contact(&self, role: Role, contact: &str) -> StoreResult<u64> {
        let guard = self.collections.read().await;
        Ok(guard
            .accounts
            .iter()
            .filter(|account| account.role == role.as_str() && account.contact == contact)
            .count() as u64)
    }

    async fn insert_account(&self, account: Account) -> StoreResult<()> {
        self.collections.write().await.accounts.push(account);
        Ok(())
    }

    async fn find_account(&self, role: Role, id: Uuid) -> StoreResult<Option<Account>> {
        let guard = self.collections.read().await;
        Ok(guard
            .accounts
            .iter()
            .find(|account| account.id == id && account.role == role.as_str())
            .cloned())
    }

    async fn find_account_by_email(
        &self,
        role: Role,
        email: &str,
    ) -> StoreResult<Option<Account>> {
        let guard = self.collections.read().await;
        Ok(guard
            .accounts
            .iter()
            .find(|account| account.email == email && account.role == role.as_str())
            .cloned())
    }

    async fn list_accounts(&self, role: Role) -> StoreResult<Vec<Account>> {
        let guard = self.collections.read().await;
        Ok(guard
            .accounts
            .iter()
            .filter(|account| account.role == role.as_str())
            .cloned()
            .collect())
    }

    async fn update_account_tokens(
        &self,
        role: Role,
        id: Uuid,
        tokens: &TokenPair,
    ) -> StoreResult<bool> {
        let mut guard = self.collections.write().await;
        let Some(account) = guard
            .accounts
            .iter_mut()
            .find(|account| account.id == id && account.role == role.as_str())
        else {
            return Ok(false);
        };
        account.token = tokens.token.clone();
        account.refresh_token = tokens.refresh_token.clone();
        account.updated_at = Utc::now();
        Ok(true)
    }

    async fn update_account_profile(
        &self,
        role: Role,
        id: Uuid,
        changes: AccountChanges,
    ) -> StoreResult<Option<Account>> {
        let mut guard = self.collections.write().await;
        let Some(account) = guard
            .accounts
            .iter_mut()
            .find(|account| account.id == id && account.role == role.as_str())
        else {
            return Ok(None);
        };
        changes.apply(account);
        account.updated_at = Utc::now();
        Ok(Some(account.clone()))
    }

    async fn insert_request(&self, request: AdminRequest) -> StoreResult<()> {
        self.collections.write().await.requests.push(request);
        Ok(())
    }

    async fn list_requests(&self) -> StoreResult<Vec<AdminRequest>> {
        Ok(self.collections.read().await.requests.clone())
    }

    async fn set_request_status(
        &self,
        id: Uuid,
        status: &str,
        reviewer: Uuid,
        reviewed_at: DateTime<Utc>,
    ) -> StoreResult<Option<AdminRequest>> {
        let mut guard = self.collections.write().await;
        let Some(request) = guard.requests.iter_mut().find(|request| request.id == id) else {
            return Ok(None);
        };
        request.status = status.to_owned();
        request.reviewed_by = Some(reviewer);
        request.reviewed_at = Some(reviewed_at);
        Ok(Some(request.clone()))
    }

    async fn insert_job_listing(&self, listing: JobListing) -> StoreResult<()> {
        self.collections.write().await.job_listings.push(listing);
        Ok(())
    }

    async fn list_job_listings(&self) -> StoreResult<Vec<JobListing>> {
        Ok(self.collections.read().await.job_listings.clone())
    }

    async fn find_job_listing(&self, id: Uuid) -> StoreResult<Option<JobListing>> {
        let guard = self.collections.read().await;
        Ok(guard
            .job_listings
            .iter()
            .find(|listing| listing.id == id)
            .cloned())
    }

    async fn update_job_listing(
        &self,
        id: Uuid,
        patch: JobListingPatch,
    ) -> StoreResult<Option<JobListing>> {
        let mut guard = self.collections.write().await;
        let Some(listing) = guard.job_listings.iter_mut().find(|listing| listing.id == id) else {
            return Ok(None);
        };
        patch.apply(listing, Utc::now());
        Ok(Some(listing.clone()))
    }

    async fn delete_job_listing(&self, id: Uuid) -> StoreResult<u64> {
        let mut guard = self.collections.write().await;
        let before = guard.job_listings.len();
        guard.job_listings.retain(|listing| listing.id != id);
        Ok((before - guard.job_listings.len()) as u64)
    }

    async fn insert_pdf(&self, upload: PdfUpload) -> StoreResult<()> {
        self.collections.write().await.pdf_uploads.push(upload);
        Ok(())
    }

    async fn find_pdf(&self, id: Uuid) -> StoreResult<Option<PdfUpload>> {
        let guard = self.collections.read().await;
        Ok(guard
            .pdf_uploads
            .iter()
            .find(|upload| upload.id == id)
            .cloned())
    }

    async fn find_pdfs_by_owner(&self, user_email: &str) -> StoreResult<Vec<PdfSummary>> {
        let guard = self.collections.read().await;
        Ok(guard
            .pdf_uploads
            .iter()
            .filter(|upload| upload.user_email == user_email)
            .map(PdfSummary::from)
            .collect())
    }

    async fn list_pdfs(&self) -> StoreResult<Vec<PdfSummary>> {
        let guard = self.collections.read().await;
        Ok(guard.pdf_uploads.iter().map(PdfSummary::from).collect())
    }
}
