use std::fmt;
use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{parse_id, JsonBody};
use crate::auth::Principal;
use crate::error::{AppError, AppResult};
use crate::models::AdminRequest;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            other => Err(format!(
                "unknown request status `{other}`; expected pending, approved or rejected"
            )),
        }
    }
}

#[derive(Deserialize)]
pub struct SendRequestBody {
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct ModifyRequestBody {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct RequestResponse {
    pub message: &'static str,
    pub request: AdminRequest,
}

#[derive(Serialize)]
pub struct RequestList {
    pub requests: Vec<AdminRequest>,
}

pub async fn send_request(
    State(state): State<AppState>,
    client: Principal,
    JsonBody(body): JsonBody<SendRequestBody>,
) -> AppResult<(StatusCode, Json<RequestResponse>)> {
    let message = body
        .message
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::bad_request("message is required"))?;
    let subject = body
        .subject
        .map(|value| value.trim().to_owned())
        .unwrap_or_default();

    let request = AdminRequest {
        id: Uuid::new_v4(),
        client_id: client.id,
        client_email: client.email,
        subject,
        message,
        status: RequestStatus::Pending.as_str().to_owned(),
        sent_at: Utc::now(),
        reviewed_by: None,
        reviewed_at: None,
    };
    state.bounded(state.store().insert_request(request.clone())).await?;
    info!(request_id = %request.id, client_id = %request.client_id, "request sent to admins");

    Ok((
        StatusCode::CREATED,
        Json(RequestResponse {
            message: "request sent",
            request,
        }),
    ))
}

pub async fn list_requests(State(state): State<AppState>) -> AppResult<Json<RequestList>> {
    let requests = state.bounded(state.store().list_requests()).await?;
    Ok(Json(RequestList { requests }))
}

pub async fn modify_request(
    State(state): State<AppState>,
    admin: Principal,
    Path(raw_id): Path<String>,
    JsonBody(body): JsonBody<ModifyRequestBody>,
) -> AppResult<Json<RequestResponse>> {
    let id = parse_id(&raw_id, "request")?;
    let status: RequestStatus = body
        .status
        .ok_or_else(|| AppError::bad_request("status is required"))?
        .parse()
        .map_err(AppError::bad_request)?;

    let request = state
        .bounded(
            state
                .store()
                .set_request_status(id, status.as_str(), admin.id, Utc::now()),
        )
        .await?
        .ok_or_else(|| AppError::not_found("request not found"))?;
    info!(request_id = %request.id, %status, reviewed_by = %admin.id, "request status changed");

    Ok(Json(RequestResponse {
        message: "request updated",
        request,
    }))
}
