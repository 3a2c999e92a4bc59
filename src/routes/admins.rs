use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{parse_id, JsonBody};
use crate::accounts::{self, LoginRequest, RefreshRequest, RegistrationRequest};
use crate::auth::{Principal, Role};
use crate::error::{AppError, AppResult};
use crate::models::{Account, AccountChanges};
use crate::state::AppState;

#[derive(Serialize)]
pub struct AdminResponse {
    pub message: &'static str,
    pub admin: Account,
}

#[derive(Serialize)]
pub struct AdminList {
    pub admins: Vec<Account>,
}

#[derive(Serialize)]
pub struct ClientList {
    pub clients: Vec<Account>,
}

#[derive(Deserialize)]
pub struct EditDetailsRequest {
    pub name: Option<String>,
    pub company: Option<String>,
    pub contact: Option<String>,
}

impl EditDetailsRequest {
    fn into_changes(self) -> AppResult<AccountChanges> {
        fn field(name: &str, value: Option<String>) -> AppResult<Option<String>> {
            match value.map(|v| v.trim().to_owned()) {
                Some(v) if v.is_empty() => Err(AppError::bad_request(format!(
                    "{name} must not be empty"
                ))),
                other => Ok(other),
            }
        }

        let changes = AccountChanges {
            name: field("name", self.name)?,
            company: field("company", self.company)?,
            contact: field("contact", self.contact)?,
        };
        if changes.is_empty() {
            return Err(AppError::bad_request("no details to update"));
        }
        Ok(changes)
    }
}

pub async fn register(
    State(state): State<AppState>,
    creator: Principal,
    JsonBody(payload): JsonBody<RegistrationRequest>,
) -> AppResult<(StatusCode, Json<AdminResponse>)> {
    let admin = accounts::register(&state, Role::Admin, payload).await?;
    tracing::info!(created_by = %creator.id, admin_id = %admin.id, "admin account created");
    Ok((
        StatusCode::CREATED,
        Json(AdminResponse {
            message: "admin registered successfully",
            admin,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<AdminResponse>> {
    let admin = accounts::login(&state, Role::Admin, payload).await?;
    Ok(Json(AdminResponse {
        message: "Login successful",
        admin,
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RefreshRequest>,
) -> AppResult<Json<AdminResponse>> {
    let admin = accounts::refresh(&state, Role::Admin, payload).await?;
    Ok(Json(AdminResponse {
        message: "tokens refreshed",
        admin,
    }))
}

pub async fn list_admins(State(state): State<AppState>) -> AppResult<Json<AdminList>> {
    let admins = state.bounded(state.store().list_accounts(Role::Admin)).await?;
    Ok(Json(AdminList { admins }))
}

pub async fn admin_info(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<AdminResponse>> {
    let admin = state
        .bounded(state.store().find_account(Role::Admin, principal.id))
        .await?
        .ok_or_else(|| AppError::not_found("admin not found"))?;
    Ok(Json(AdminResponse {
        message: "admin details",
        admin,
    }))
}

pub async fn admin_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<AdminResponse>> {
    let id = parse_id(&raw_id, "admin")?;
    let admin = state
        .bounded(state.store().find_account(Role::Admin, id))
        .await?
        .ok_or_else(|| AppError::not_found("admin not found"))?;
    Ok(Json(AdminResponse {
        message: "admin details",
        admin,
    }))
}

pub async fn edit_details(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    JsonBody(payload): JsonBody<EditDetailsRequest>,
) -> AppResult<Json<AdminResponse>> {
    let id = parse_id(&raw_id, "admin")?;
    let changes = payload.into_changes()?;
    let admin = state
        .bounded(state.store().update_account_profile(Role::Admin, id, changes))
        .await?
        .ok_or_else(|| AppError::not_found("admin not found"))?;
    Ok(Json(AdminResponse {
        message: "admin details updated",
        admin,
    }))
}

pub async fn list_clients(State(state): State<AppState>) -> AppResult<Json<ClientList>> {
    let clients = state.bounded(state.store().list_accounts(Role::Client)).await?;
    Ok(Json(ClientList { clients }))
}

pub async fn client_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let id = parse_id(&raw_id, "client")?;
    let client = state
        .bounded(state.store().find_account(Role::Client, id))
        .await?
        .ok_or_else(|| AppError::not_found("client not found"))?;
    Ok(Json(serde_json::json!({ "client": client })))
}
