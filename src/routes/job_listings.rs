use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::{parse_id, JsonBody};
use crate::error::{AppError, AppResult};
use crate::models::{JobListing, JobListingPatch};
use crate::state::AppState;
use crate::utils::json::{classify_patch, Patch};

#[derive(Deserialize)]
pub struct CreateJobListingRequest {
    pub role: Option<String>,
    pub location: Option<String>,
    pub link: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub active: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListingResponse {
    pub message: &'static str,
    pub job_listing: JobListing,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListingEnvelope<T> {
    pub job_listing: T,
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_owned()).unwrap_or_default()
}

pub async fn create_job_listing(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateJobListingRequest>,
) -> AppResult<(StatusCode, Json<JobListingResponse>)> {
    let role = trimmed(payload.role);
    let company = trimmed(payload.company);
    if role.is_empty() || company.is_empty() {
        return Err(AppError::bad_request("role and company are required"));
    }

    let now = Utc::now();
    let listing = JobListing {
        id: Uuid::new_v4(),
        role,
        location: trimmed(payload.location),
        link: trimmed(payload.link),
        company,
        description: trimmed(payload.description),
        requirements: payload
            .requirements
            .into_iter()
            .map(|item| item.trim().to_owned())
            .filter(|item| !item.is_empty())
            .collect(),
        active: payload.active.unwrap_or(true),
        created_at: now,
        updated_at: now,
    };
    state
        .bounded(state.store().insert_job_listing(listing.clone()))
        .await?;
    info!(listing_id = %listing.id, company = %listing.company, "job listing created");

    Ok((
        StatusCode::CREATED,
        Json(JobListingResponse {
            message: "job listing created",
            job_listing: listing,
        }),
    ))
}

pub async fn list_job_listings(
    State(state): State<AppState>,
) -> AppResult<Json<JobListingEnvelope<Vec<JobListing>>>> {
    let listings = state.bounded(state.store().list_job_listings()).await?;
    Ok(Json(JobListingEnvelope {
        job_listing: listings,
    }))
}

pub async fn get_job_listing(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<JobListingEnvelope<JobListing>>> {
    let id = parse_id(&raw_id, "job listing")?;
    let listing = state
        .bounded(state.store().find_job_listing(id))
        .await?
        .ok_or_else(|| AppError::not_found("job listing not found"))?;
    Ok(Json(JobListingEnvelope {
        job_listing: listing,
    }))
}

pub async fn update_job_listing(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    JsonBody(body): JsonBody<Value>,
) -> AppResult<Json<JobListingResponse>> {
    let id = parse_id(&raw_id, "job listing")?;
    let patch = parse_listing_patch(&body)?;

    let listing = state
        .bounded(state.store().update_job_listing(id, patch))
        .await?
        .ok_or_else(|| AppError::not_found("job listing not found"))?;
    info!(listing_id = %listing.id, active = listing.active, "job listing updated");

    Ok(Json(JobListingResponse {
        message: "job listing updated",
        job_listing: listing,
    }))
}

pub async fn delete_job_listing(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&raw_id, "job listing")?;
    let removed = state.bounded(state.store().delete_job_listing(id)).await?;
    info!(listing_id = %id, removed, "job listing delete requested");
    Ok(Json(serde_json::json!({ "message": "job listing deleted" })))
}

/// Builds the sparse update from a raw body. `role` and `company` may not be
/// cleared; `active` may not be null.
fn parse_listing_patch(body: &Value) -> AppResult<JobListingPatch> {
    if !body.is_object() {
        return Err(AppError::bad_request("request body must be a JSON object"));
    }

    let text = |field: &str| -> AppResult<Patch<String>> {
        let patch = classify_patch::<String>(field, body.get(field))
            .map_err(AppError::bad_request)?
            .ignore_if(|value| value.trim().is_empty());
        Ok(match patch {
            Patch::Set(value) => Patch::Set(value.trim().to_owned()),
            other => other,
        })
    };
    let required_text = |field: &str| -> AppResult<Patch<String>> {
        match text(field)? {
            Patch::Clear => Err(AppError::bad_request(format!("{field} cannot be null"))),
            other => Ok(other),
        }
    };

    let requirements = classify_patch::<Vec<String>>("requirements", body.get("requirements"))
        .map_err(AppError::bad_request)?
        .ignore_if(|items| items.is_empty());

    let active = match body.get("active") {
        None => None,
        Some(Value::Bool(flag)) => Some(*flag),
        Some(Value::Null) => return Err(AppError::bad_request("active cannot be null")),
        Some(_) => return Err(AppError::bad_request("active must be a boolean")),
    };

    Ok(JobListingPatch {
        role: required_text("role")?,
        location: text("location")?,
        link: text("link")?,
        company: required_text("company")?,
        description: text("description")?,
        requirements,
        active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_strings_and_lists_are_ignored() {
        let patch = parse_listing_patch(&json!({
            "role": "",
            "requirements": [],
            "location": "  Lisbon "
        }))
        .unwrap();
        assert!(patch.role.is_omitted());
        assert!(patch.requirements.is_omitted());
        assert_eq!(patch.location, Patch::Set("Lisbon".to_string()));
        assert_eq!(patch.active, None);
    }

    #[test]
    fn null_clears_optional_text_only() {
        let patch = parse_listing_patch(&json!({ "link": null })).unwrap();
        assert_eq!(patch.link, Patch::Clear);

        let err = parse_listing_patch(&json!({ "company": null })).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn active_must_be_boolean() {
        let patch = parse_listing_patch(&json!({ "active": false })).unwrap();
        assert_eq!(patch.active, Some(false));
        assert!(parse_listing_patch(&json!({ "active": null })).is_err());
        assert!(parse_listing_patch(&json!({ "active": "no" })).is_err());
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert!(parse_listing_patch(&json!(["role"])).is_err());
    }
}
