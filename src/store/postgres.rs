use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use super::{DocumentStore, StoreError, StoreResult};
use crate::auth::{jwt::TokenPair, Role};
use crate::db::PgPool;
use crate::models::{
    Account, AccountChanges, AdminRequest, JobListing, JobListingPatch, PdfSummary, PdfUpload,
};
use crate::schema::{accounts, admin_requests, job_listings, pdf_uploads};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn run<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|err| StoreError::Pool(err.to_string()))?;
            f(&mut conn).map_err(StoreError::from)
        })
        .await
        .map_err(|err| StoreError::Task(err.to_string()))?
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn count_accounts_by_email(&self, role: Role, email: &str) -> StoreResult<u64> {
        let email = email.to_owned();
        let count: i64 = self
            .run(move |conn| {
                accounts::table
                    .filter(accounts::role.eq(role.as_str()))
                    .filter(accounts::email.eq(email))
                    .count()
                    .get_result(conn)
            })
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn count_accounts_by_contact(&self, role: Role, contact: &str) -> StoreResult<u64> {
        let contact = contact.to_owned();
        let count: i64 = self
            .run(move |conn| {
                accounts::table
                    .filter(accounts::role.eq(role.as_str()))
                    .filter(accounts::contact.eq(contact))
                    .count()
                    .get_result(conn)
            })
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn insert_account(&self, account: Account) -> StoreResult<()> {
        self.run(move |conn| {
            diesel::insert_into(accounts::table)
                .values(&account)
                .execute(conn)
                .map(|_| ())
        })
        .await
    }

    async fn find_account(&self, role: Role, id: Uuid) -> StoreResult<Option<Account>> {
        self.run(move |conn| {
            accounts::table
                .find(id)
                .filter(accounts::role.eq(role.as_str()))
                .select(Account::as_select())
                .first(conn)
                .optional()
        })
        .await
    }

    async fn find_account_by_email(
        &self,
        role: Role,
        email: &str,
    ) -> StoreResult<Option<Account>> {
        let email = email.to_owned();
        self.run(move |conn| {
            accounts::table
                .filter(accounts::role.eq(role.as_str()))
                .filter(accounts::email.eq(email))
                .order(accounts::created_at.asc())
                .select(Account::as_select())
                .first(conn)
                .optional()
        })
        .await
    }

    async fn list_accounts(&self, role: Role) -> StoreResult<Vec<Account>> {
        self.run(move |conn| {
            accounts::table
                .filter(accounts::role.eq(role.as_str()))
                .order(accounts::created_at.asc())
                .select(Account::as_select())
                .load(conn)
        })
        .await
    }

    async fn update_account_tokens(
        &self,
        role: Role,
        id: Uuid,
        tokens: &TokenPair,
    ) -> StoreResult<bool> {
        let tokens = tokens.clone();
        let updated = self
            .run(move |conn| {
                diesel::update(
                    accounts::table
                        .find(id)
                        .filter(accounts::role.eq(role.as_str())),
                )
                .set((
                    accounts::token.eq(tokens.token),
                    accounts::refresh_token.eq(tokens.refresh_token),
                    accounts::updated_at.eq(Utc::now()),
                ))
                .execute(conn)
            })
            .await?;
        Ok(updated > 0)
    }

    async fn update_account_profile(
        &self,
        role: Role,
        id: Uuid,
        changes: AccountChanges,
    ) -> StoreResult<Option<Account>> {
        self.run(move |conn| {
            conn.transaction(|conn| {
                let updated = diesel::update(
                    accounts::table
                        .find(id)
                        .filter(accounts::role.eq(role.as_str())),
                )
                .set((&changes, accounts::updated_at.eq(Utc::now())))
                .execute(conn)?;
                if updated == 0 {
                    return Ok(None);
                }
                accounts::table
                    .find(id)
                    .select(Account::as_select())
                    .first(conn)
                    .optional()
            })
        })
        .await
    }

    async fn insert_request(&self, request: AdminRequest) -> StoreResult<()> {
        self.run(move |conn| {
            diesel::insert_into(admin_requests::table)
                .values(&request)
                .execute(conn)
                .map(|_| ())
        })
        .await
    }

    async fn list_requests(&self) -> StoreResult<Vec<AdminRequest>> {
        self.run(|conn| {
            admin_requests::table
                .order(admin_requests::sent_at.asc())
                .select(AdminRequest::as_select())
                .load(conn)
        })
        .await
    }

    async fn set_request_status(
        &self,
        id: Uuid,
        status: &str,
        reviewer: Uuid,
        reviewed_at: DateTime<Utc>,
    ) -> StoreResult<Option<AdminRequest>> {
        let status = status.to_owned();
        self.run(move |conn| {
            conn.transaction(|conn| {
                let updated = diesel::update(admin_requests::table.find(id))
                    .set((
                        admin_requests::status.eq(status),
                        admin_requests::reviewed_by.eq(Some(reviewer)),
                        admin_requests::reviewed_at.eq(Some(reviewed_at)),
                    ))
                    .execute(conn)?;
                if updated == 0 {
                    return Ok(None);
                }
                admin_requests::table
                    .find(id)
                    .select(AdminRequest::as_select())
                    .first(conn)
                    .optional()
            })
        })
        .await
    }

    async fn insert_job_listing(&self, listing: JobListing) -> StoreResult<()> {
        self.run(move |conn| {
            diesel::insert_into(job_listings::table)
                .values(&listing)
                .execute(conn)
                .map(|_| ())
        })
        .await
    }

    async fn list_job_listings(&self) -> StoreResult<Vec<JobListing>> {
        self.run(|conn| {
            job_listings::table
                .order(job_listings::created_at.asc())
                .select(JobListing::as_select())
                .load(conn)
        })
        .await
    }

    async fn find_job_listing(&self, id: Uuid) -> StoreResult<Option<JobListing>> {
        self.run(move |conn| {
            job_listings::table
                .find(id)
                .select(JobListing::as_select())
                .first(conn)
                .optional()
        })
        .await
    }

    async fn update_job_listing(
        &self,
        id: Uuid,
        patch: JobListingPatch,
    ) -> StoreResult<Option<JobListing>> {
        self.run(move |conn| {
            conn.transaction(|conn| {
                let existing = job_listings::table
                    .find(id)
                    .for_update()
                    .select(JobListing::as_select())
                    .first(conn)
                    .optional()?;
                let Some(mut listing) = existing else {
                    return Ok(None);
                };
                patch.apply(&mut listing, Utc::now());
                diesel::update(job_listings::table.find(id))
                    .set((
                        job_listings::role.eq(&listing.role),
                        job_listings::location.eq(&listing.location),
                        job_listings::link.eq(&listing.link),
                        job_listings::company.eq(&listing.company),
                        job_listings::description.eq(&listing.description),
                        job_listings::requirements.eq(&listing.requirements),
                        job_listings::active.eq(listing.active),
                        job_listings::updated_at.eq(listing.updated_at),
                    ))
                    .execute(conn)?;
                Ok(Some(listing))
            })
        })
        .await
    }

    async fn delete_job_listing(&self, id: Uuid) -> StoreResult<u64> {
        let deleted = self
            .run(move |conn| diesel::delete(job_listings::table.find(id)).execute(conn))
            .await?;
        Ok(deleted as u64)
    }

    async fn insert_pdf(&self, upload: PdfUpload) -> StoreResult<()> {
        self.run(move |conn| {
            diesel::insert_into(pdf_uploads::table)
                .values(&upload)
                .execute(conn)
                .map(|_| ())
        })
        .await
    }

    async fn find_pdf(&self, id: Uuid) -> StoreResult<Option<PdfUpload>> {
        self.run(move |conn| {
            pdf_uploads::table
                .find(id)
                .select(PdfUpload::as_select())
                .first(conn)
                .optional()
        })
        .await
    }

    async fn find_pdfs_by_owner(&self, user_email: &str) -> StoreResult<Vec<PdfSummary>> {
        let user_email = user_email.to_owned();
        self.run(move |conn| {
            pdf_uploads::table
                .filter(pdf_uploads::user_email.eq(user_email))
                .order(pdf_uploads::uploaded_at.asc())
                .select(PdfSummary::as_select())
                .load(conn)
        })
        .await
    }

    async fn list_pdfs(&self) -> StoreResult<Vec<PdfSummary>> {
        self.run(|conn| {
            pdf_uploads::table
                .order(pdf_uploads::uploaded_at.asc())
                .select(PdfSummary::as_select())
                .load(conn)
        })
        .await
    }
}
