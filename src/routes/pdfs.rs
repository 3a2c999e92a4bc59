use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{parse_id, JsonBody, MAX_PDF_FORM_BYTES};
use crate::auth::Principal;
use crate::error::{AppError, AppResult};
use crate::models::{PdfSummary, PdfUpload};
use crate::state::AppState;
use crate::utils::email::{is_valid_email, normalize_email};

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub document: PdfSummary,
}

#[derive(Serialize)]
pub struct DocumentList {
    pub documents: Vec<PdfSummary>,
}

#[derive(Serialize)]
pub struct DocumentResponse {
    pub document: PdfUpload,
}

#[derive(Deserialize)]
pub struct OwnerQuery {
    pub useremail: Option<String>,
}

fn multipart_error(context: &str, err: MultipartError) -> AppError {
    let status = err.status();
    warn!(error = %err, %status, "{context}");
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::new(status, "pdf upload exceeds the 10 MiB limit");
    }
    AppError::new(status, format!("{context}: {}", err.body_text()))
}

/// Clients act only on their own address; admins on any.
fn ensure_owner(principal: &Principal, email: &str) -> AppResult<()> {
    if principal.is_admin() || normalize_email(&principal.email) == email {
        return Ok(());
    }
    warn!(account_id = %principal.id, "client tried to access another owner's documents");
    Err(AppError::forbidden())
}

pub async fn upload_pdf(
    State(state): State<AppState>,
    principal: Principal,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let mut file_bytes: Option<Bytes> = None;
    let mut title: Option<String> = None;
    let mut user_email: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| multipart_error("invalid multipart data", err))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("pdf_file") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|err| multipart_error("failed to read pdf_file", err))?;
                file_bytes = Some(data);
            }
            Some("title") => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| multipart_error("invalid title", err))?;
                title = Some(value.trim().to_owned()).filter(|v| !v.is_empty());
            }
            Some("user_email") => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| multipart_error("invalid user_email", err))?;
                user_email = Some(normalize_email(&value)).filter(|v| !v.is_empty());
            }
            _ => {}
        }
    }

    let file_bytes = file_bytes.ok_or_else(|| AppError::bad_request("pdf_file field is required"))?;
    if file_bytes.is_empty() {
        return Err(AppError::bad_request("pdf_file must not be empty"));
    }
    if file_bytes.len() > MAX_PDF_FORM_BYTES {
        return Err(AppError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            "pdf upload exceeds the 10 MiB limit",
        ));
    }
    if !file_bytes.starts_with(PDF_MAGIC) {
        return Err(AppError::bad_request("pdf_file is not a PDF document"));
    }

    let title = title.ok_or_else(|| AppError::bad_request("title field is required"))?;
    let user_email =
        user_email.ok_or_else(|| AppError::bad_request("user_email field is required"))?;
    if !is_valid_email(&user_email) {
        return Err(AppError::bad_request("user_email is not a valid address"));
    }
    ensure_owner(&principal, &user_email)?;

    let checksum = hex::encode(Sha256::digest(&file_bytes));
    let upload = PdfUpload {
        id: Uuid::new_v4(),
        title,
        user_email,
        size_bytes: file_bytes.len() as i64,
        pdf_file: file_bytes.to_vec(),
        checksum,
        uploaded_at: Utc::now(),
    };
    let summary = PdfSummary::from(&upload);

    if let Err(err) = state.bounded(state.store().insert_pdf(upload)).await {
        error!(status = %err.status(), owner = %summary.user_email, "pdf upload failed");
        return Err(err);
    }
    info!(
        document_id = %summary.id,
        owner = %summary.user_email,
        size_bytes = summary.size_bytes,
        "pdf uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "pdf uploaded",
            document: summary,
        }),
    ))
}

pub async fn pdfs_by_owner(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(query): JsonBody<OwnerQuery>,
) -> AppResult<Json<DocumentList>> {
    let email = query
        .useremail
        .map(|value| normalize_email(&value))
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::bad_request("useremail is required"))?;
    ensure_owner(&principal, &email)?;

    let documents = state
        .bounded(state.store().find_pdfs_by_owner(&email))
        .await?;
    Ok(Json(DocumentList { documents }))
}

pub async fn all_pdfs(State(state): State<AppState>) -> AppResult<Json<DocumentList>> {
    let documents = state.bounded(state.store().list_pdfs()).await?;
    Ok(Json(DocumentList { documents }))
}

async fn load_owned(state: &AppState, principal: &Principal, raw_id: &str) -> AppResult<PdfUpload> {
    let id = parse_id(raw_id, "document")?;
    let upload = state
        .bounded(state.store().find_pdf(id))
        .await?
        .ok_or_else(|| AppError::not_found("document not found"))?;
    ensure_owner(principal, &upload.user_email)?;
    Ok(upload)
}

pub async fn pdf_by_id(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_id): Path<String>,
) -> AppResult<Json<DocumentResponse>> {
    let document = load_owned(&state, &principal, &raw_id).await?;
    Ok(Json(DocumentResponse { document }))
}

pub async fn pdf_raw(
    State(state): State<AppState>,
    principal: Principal,
    Path(raw_id): Path<String>,
) -> AppResult<Response> {
    let document = load_owned(&state, &principal, &raw_id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}.pdf\"", document.id),
            ),
        ],
        document.pdf_file,
    )
        .into_response())
}
