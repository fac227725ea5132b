//! JWT authentication middleware.
//!
//! A valid bearer token is resolved into a [`Principal`] (account plus
//! company) and stored in the request extensions.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::Principal;
use crate::errors::{AppError, AppResult};

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
}

async fn resolve_principal(state: &AppState, token: &str) -> AppResult<Principal> {
    let auth = state.services.auth();
    let claims = auth.verify_token(token)?;
    match auth.principal(claims.sub).await {
        Ok(principal) => Ok(principal),
        // Token for an account that no longer exists
        Err(AppError::NotFound) => Err(AppError::Unauthorized),
        Err(e) => Err(e),
    }
}

/// JWT authentication middleware.
///
/// Rejects the request with 401 unless a valid token is present.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::Unauthorized)?;
    let principal = resolve_principal(&state, token).await?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Injects the principal when a valid token is present and lets
/// anonymous requests through untouched.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = match bearer_token(&request) {
        Some(token) => match resolve_principal(&state, token).await {
            Ok(principal) => Some(principal),
            Err(AppError::Unauthorized | AppError::Jwt(_)) => None,
            Err(e) => return Err(e),
        },
        None => None,
    };

    if let Some(principal) = principal {
        request.extensions_mut().insert(principal);
    }

    Ok(next.run(request).await)
}
