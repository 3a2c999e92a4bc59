use axum::http::{header, HeaderValue, Method};
use axum::{
    async_trait,
    extract::{DefaultBodyLimit, FromRequest, Request},
    routing::{delete, get, patch, post, put, MethodRouter},
    Json, Router,
};
use serde::de::DeserializeOwned;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{
    auth::{gate::RequireCapability, Capability},
    error::{AppError, AppResult},
    state::AppState,
};

pub mod admins;
pub mod clients;
pub mod health;
pub mod job_listings;
pub mod pdfs;
pub mod requests;

pub const MAX_PDF_FORM_BYTES: usize = 10 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router<()> {
    use Capability::{Admin, Authenticated, Client, Public};

    let routes: Vec<(&str, MethodRouter<AppState>, Capability)> = vec![
        ("/health", get(health::health_check), Public),
        // client accounts
        ("/client/signup", post(clients::register), Public),
        ("/client/login", post(clients::login), Public),
        ("/client/refresh", post(clients::refresh), Public),
        // admin accounts
        ("/admin/login", post(admins::login), Public),
        ("/admin/refresh", post(admins::refresh), Public),
        ("/admin/signup", post(admins::register), Admin),
        ("/admin/allAdmins", get(admins::list_admins), Admin),
        ("/admin/adminInfo", get(admins::admin_info), Admin),
        ("/admin/adminByID/:id", get(admins::admin_by_id), Admin),
        ("/admin/edit-details/:id", put(admins::edit_details), Admin),
        ("/admin/client/all-clients", get(admins::list_clients), Admin),
        ("/admin/client/:id", get(admins::client_by_id), Admin),
        // requests to admins
        ("/admin/sendRequest", post(requests::send_request), Client),
        ("/admin/all-requests", get(requests::list_requests), Admin),
        ("/admin/modify-request/:id", put(requests::modify_request), Admin),
        // pdf documents
        (
            "/client/uploadPdf",
            post(pdfs::upload_pdf).layer(DefaultBodyLimit::max(MAX_PDF_FORM_BYTES)),
            Authenticated,
        ),
        ("/client/getPdfByEmail", post(pdfs::pdfs_by_owner), Authenticated),
        ("/client/all-documents", get(pdfs::all_pdfs), Admin),
        ("/client/document/:id", get(pdfs::pdf_by_id), Authenticated),
        ("/client/document/:id/raw", get(pdfs::pdf_raw), Authenticated),
        // job listings
        ("/job-listings", get(job_listings::list_job_listings), Public),
        ("/job-listings", post(job_listings::create_job_listing), Admin),
        ("/job-listings/:id", get(job_listings::get_job_listing), Public),
        ("/job-listings/:id", patch(job_listings::update_job_listing), Admin),
        ("/job-listings/:id", delete(job_listings::delete_job_listing), Admin),
    ];

    let router = routes
        .into_iter()
        .fold(Router::new(), |router, (path, method_router, capability)| {
            router.route(path, method_router.require(capability, &state.jwt))
        });

    router
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allow_origin = match state.config.cors_allowed_origin.as_deref() {
        Some(origins) if origins.split(',').any(|value| value.trim() == "*") => AllowOrigin::any(),
        Some(origins) => {
            let headers: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|value| {
                    let trimmed = value.trim();
                    if trimmed.is_empty() {
                        return None;
                    }
                    match trimmed.parse::<HeaderValue>() {
                        Ok(origin) => Some(origin),
                        Err(err) => {
                            tracing::warn!(origin = %trimmed, error = %err, "ignoring invalid CORS origin");
                            None
                        }
                    }
                })
                .collect();
            AllowOrigin::list(headers)
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// JSON body whose rejections answer with the crate's error shape.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

pub(crate) fn parse_id(raw: &str, entity: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::bad_request(format!("invalid {entity} id")))
}
