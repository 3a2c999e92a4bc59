//! Per-route authorization.
//!
//! Routes declare a [`Capability`] next to their handler; anything other than
//! `Public` gets a route layer that verifies the bearer access token, checks
//! the role, and stores the resulting [`Principal`] in request extensions.

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;

use super::{jwt::JwtService, Capability, Principal};
use crate::error::AppError;

#[derive(Clone)]
pub struct Gate {
    jwt: JwtService,
    capability: Capability,
}

pub async fn authorize(
    State(gate): State<Gate>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or_else(AppError::unauthorized)?;

    let claims = gate.jwt.verify_access(bearer.token()).map_err(|err| {
        tracing::debug!(error = %err, "rejected bearer token");
        AppError::unauthorized()
    })?;

    let principal = Principal::from(claims);
    if !gate.capability.admits(principal.role) {
        tracing::debug!(
            subject = %principal.id,
            role = %principal.role,
            required = ?gate.capability,
            "principal lacks route capability"
        );
        return Err(AppError::forbidden());
    }

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

pub trait RequireCapability {
    fn require(self, capability: Capability, jwt: &JwtService) -> Self;
}

impl<S> RequireCapability for MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn require(self, capability: Capability, jwt: &JwtService) -> Self {
        if capability == Capability::Public {
            return self;
        }
        let gate = Gate {
            jwt: jwt.clone(),
            capability,
        };
        self.route_layer(middleware::from_fn_with_state(gate, authorize))
    }
}
