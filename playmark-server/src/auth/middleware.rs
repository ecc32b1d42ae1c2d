use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use playmark_model::UserId;
use tracing::debug;

use crate::infra::{app_state::AppState, errors::AppError};

/// Identity placed in request extensions by [`auth_middleware`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;

    let user_id = state.tokens.verify(&token).map_err(|err| {
        debug!(error = %err, "rejected bearer token");
        AppError::unauthorized("Invalid or expired token")
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id });

    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Result<String, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::unauthorized("Authentication required")),
    }
}
