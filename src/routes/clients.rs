use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use super::JsonBody;
use crate::accounts::{self, LoginRequest, RefreshRequest, RegistrationRequest};
use crate::auth::Role;
use crate::error::AppResult;
use crate::models::Account;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ClientResponse {
    pub message: &'static str,
    pub client: Account,
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegistrationRequest>,
) -> AppResult<(StatusCode, Json<ClientResponse>)> {
    let client = accounts::register(&state, Role::Client, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ClientResponse {
            message: "client registered successfully",
            client,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<ClientResponse>> {
    let client = accounts::login(&state, Role::Client, payload).await?;
    Ok(Json(ClientResponse {
        message: "Login successful",
        client,
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RefreshRequest>,
) -> AppResult<Json<ClientResponse>> {
    let client = accounts::refresh(&state, Role::Client, payload).await?;
    Ok(Json(ClientResponse {
        message: "tokens refreshed",
        client,
    }))
}
