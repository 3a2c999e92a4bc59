//! Registration, login and token refresh shared by clients and admins.

use axum::http::StatusCode;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::jwt::TokenSubject;
use crate::auth::password::{self, MISMATCH_MESSAGE};
use crate::auth::Role;
use crate::error::{AppError, AppResult};
use crate::models::Account;
use crate::state::AppState;
use crate::utils::email::{is_valid_email, normalize_email};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Deserialize)]
pub struct RegistrationRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub company: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

struct Registration {
    name: String,
    email: String,
    contact: String,
    company: String,
    password: String,
}

impl RegistrationRequest {
    fn validate(self) -> AppResult<Registration> {
        let mut missing = Vec::new();
        let mut take = |field: &'static str, value: Option<String>| -> String {
            let value = value.map(|v| v.trim().to_owned()).unwrap_or_default();
            if value.is_empty() {
                missing.push(field);
            }
            value
        };
        let name = take("name", self.name);
        let email = take("email", self.email);
        let contact = take("contact", self.contact);
        let company = take("company", self.company);
        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            missing.push("password");
        }

        if !missing.is_empty() {
            return Err(AppError::bad_request(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let email = normalize_email(&email);
        if !is_valid_email(&email) {
            return Err(AppError::bad_request("email is not a valid address"));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::bad_request(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        Ok(Registration {
            name,
            email,
            contact,
            company,
            password,
        })
    }
}

pub async fn register(
    state: &AppState,
    role: Role,
    request: RegistrationRequest,
) -> AppResult<Account> {
    let registration = request.validate()?;
    state
        .bounded_auth(register_validated(state, role, registration))
        .await
}

async fn register_validated(
    state: &AppState,
    role: Role,
    registration: Registration,
) -> AppResult<Account> {
    let store = state.store();
    let email_matches = store
        .count_accounts_by_email(role, &registration.email)
        .await?;
    let contact_matches = store
        .count_accounts_by_contact(role, &registration.contact)
        .await?;

    if state
        .config
        .duplicate_policy
        .rejects(email_matches, contact_matches)
    {
        warn!(
            %role,
            email_matches,
            contact_matches,
            policy = ?state.config.duplicate_policy,
            "registration rejected as duplicate"
        );
        return Err(AppError::conflict("this email or contact already exists"));
    }

    let password_hash = hash_off_thread(registration.password, state.config.password_hash_cost)
        .await?;

    let id = Uuid::new_v4();
    let now = Utc::now();
    let mut account = Account {
        id,
        user_id: id.to_string(),
        role: role.as_str().to_owned(),
        name: registration.name,
        email: registration.email,
        contact: registration.contact,
        company: registration.company,
        password_hash,
        token: String::new(),
        refresh_token: String::new(),
        created_at: now,
        updated_at: now,
    };
    ensure_complete(&account)?;

    let tokens = state.jwt.issue(&TokenSubject::of(&account, role))?;
    account.token = tokens.token;
    account.refresh_token = tokens.refresh_token;

    store.insert_account(account.clone()).await.map_err(|err| {
        tracing::error!(error = %err, %role, "failed to insert account");
        AppError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{role} item was not created"),
        )
    })?;

    info!(%role, account_id = %account.id, "account registered");
    Ok(account)
}

pub async fn login(state: &AppState, role: Role, request: LoginRequest) -> AppResult<Account> {
    let email = request
        .email
        .map(|value| normalize_email(&value))
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::bad_request("email is required"))?;
    let password = request
        .password
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::bad_request("password is required"))?;

    state
        .bounded_auth(async {
            let found = state
                .store()
                .find_account_by_email(role, &email)
                .await?
                .ok_or_else(|| AppError::unauthenticated(MISMATCH_MESSAGE))?;

            let stored_hash = found.password_hash.clone();
            let verified =
                tokio::task::spawn_blocking(move || password::verify_password(&stored_hash, &password))
                    .await?;
            if let Err(mismatch) = verified {
                info!(%role, account_id = %found.id, "login rejected");
                return Err(AppError::unauthenticated(mismatch.to_string()));
            }

            let refreshed = reissue_tokens(state, role, &found).await?;
            info!(%role, account_id = %refreshed.id, "login succeeded");
            Ok(refreshed)
        })
        .await
}

/// Rotates a token pair. The presented refresh token must be the one
/// currently stored on the account.
pub async fn refresh(state: &AppState, role: Role, request: RefreshRequest) -> AppResult<Account> {
    let presented = request
        .refresh_token
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::bad_request("refresh_token is required"))?;

    let claims = state.jwt.verify_refresh(&presented).map_err(|err| {
        tracing::debug!(error = %err, "rejected refresh token");
        AppError::unauthorized()
    })?;
    if claims.role != role {
        return Err(AppError::unauthorized());
    }

    state
        .bounded_auth(async {
            let found = state
                .store()
                .find_account(role, claims.sub)
                .await?
                .ok_or_else(AppError::unauthorized)?;
            if found.refresh_token != presented {
                warn!(%role, account_id = %found.id, "stale refresh token presented");
                return Err(AppError::unauthorized());
            }
            reissue_tokens(state, role, &found).await
        })
        .await
}

async fn reissue_tokens(state: &AppState, role: Role, account: &Account) -> AppResult<Account> {
    let tokens = state.jwt.issue(&TokenSubject::of(account, role))?;
    let store = state.store();
    if !store.update_account_tokens(role, account.id, &tokens).await? {
        return Err(AppError::internal(format!(
            "account {} vanished while refreshing tokens",
            account.id
        )));
    }

    store
        .find_account(role, account.id)
        .await?
        .ok_or_else(|| AppError::internal(format!("account {} missing after token update", account.id)))
}

async fn hash_off_thread(password: String, cost: u32) -> AppResult<String> {
    let hash = tokio::task::spawn_blocking(move || password::hash_password(&password, cost)).await??;
    Ok(hash)
}

fn ensure_complete(account: &Account) -> AppResult<()> {
    let fields = [
        &account.name,
        &account.email,
        &account.contact,
        &account.company,
        &account.password_hash,
        &account.user_id,
    ];
    if fields.iter().any(|value| value.is_empty()) {
        return Err(AppError::bad_request("missing required fields"));
    }
    Ok(())
}
