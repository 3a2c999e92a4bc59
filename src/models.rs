use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::schema::*;
use crate::utils::json::Patch;

/// A client or admin identity record. `role` holds [`crate::auth::Role`] as text.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable, Serialize)]
#[diesel(table_name = accounts)]
pub struct Account {
    pub id: Uuid,
    pub user_id: String,
    pub role: String,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub company: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub token: String,
    pub refresh_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile fields an admin may change on an account.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = accounts)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub company: Option<String>,
    pub contact: Option<String>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.company.is_none() && self.contact.is_none()
    }

    pub fn apply(&self, account: &mut Account) {
        if let Some(name) = &self.name {
            account.name = name.clone();
        }
        if let Some(company) = &self.company {
            account.company = company.clone();
        }
        if let Some(contact) = &self.contact {
            account.contact = contact.clone();
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable, Serialize)]
#[diesel(table_name = admin_requests)]
pub struct AdminRequest {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub sent_at: DateTime<Utc>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable, Serialize)]
#[diesel(table_name = job_listings)]
pub struct JobListing {
    pub id: Uuid,
    pub role: String,
    pub location: String,
    pub link: String,
    pub company: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sparse update of a job listing. `active` is written whenever it is present.
#[derive(Debug, Clone, Default)]
pub struct JobListingPatch {
    pub role: Patch<String>,
    pub location: Patch<String>,
    pub link: Patch<String>,
    pub company: Patch<String>,
    pub description: Patch<String>,
    pub requirements: Patch<Vec<String>>,
    pub active: Option<bool>,
}

impl JobListingPatch {
    pub fn apply(self, listing: &mut JobListing, now: DateTime<Utc>) {
        self.role.apply_to(&mut listing.role);
        self.location.apply_to(&mut listing.location);
        self.link.apply_to(&mut listing.link);
        self.company.apply_to(&mut listing.company);
        self.description.apply_to(&mut listing.description);
        self.requirements.apply_to(&mut listing.requirements);
        if let Some(active) = self.active {
            listing.active = active;
        }
        listing.updated_at = now;
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable, Serialize)]
#[diesel(table_name = pdf_uploads)]
pub struct PdfUpload {
    pub id: Uuid,
    pub title: String,
    pub user_email: String,
    #[serde(serialize_with = "serialize_base64")]
    pub pdf_file: Vec<u8>,
    pub size_bytes: i64,
    pub checksum: String,
    pub uploaded_at: DateTime<Utc>,
}

/// A PDF upload without its payload, as returned by listing queries.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize)]
#[diesel(table_name = pdf_uploads)]
pub struct PdfSummary {
    pub id: Uuid,
    pub title: String,
    pub user_email: String,
    pub size_bytes: i64,
    pub checksum: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&PdfUpload> for PdfSummary {
    fn from(upload: &PdfUpload) -> Self {
        Self {
            id: upload.id,
            title: upload.title.clone(),
            user_email: upload.user_email.clone(),
            size_bytes: upload.size_bytes,
            checksum: upload.checksum.clone(),
            uploaded_at: upload.uploaded_at,
        }
    }
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}
