use crate::models::ErrorResponse;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use config::AdminConfig;
use std::sync::Arc;
use tracing::{debug, warn};

/// Marker placed in request extensions once the admin token checked out
#[derive(Clone, Debug)]
pub struct AdminUser;

#[derive(Clone)]
pub struct AuthState {
    pub admin_config: Arc<AdminConfig>,
}

impl AuthState {
    pub fn new(admin_config: AdminConfig) -> Self {
        Self {
            admin_config: Arc::new(admin_config),
        }
    }
}

fn unauthorized(message: &str) -> (StatusCode, axum::Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        axum::Json(ErrorResponse::new(
            message.to_string(),
            "unauthorized".to_string(),
        )),
    )
}

/// Admin authentication middleware - requires `Authorization: Bearer <ADMIN_TOKEN>`
///
/// Every request is rejected when no admin token is configured.
pub async fn admin_middleware(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, axum::Json<ErrorResponse>)> {
    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok());

    let Some(auth_value) = auth_header else {
        debug!(path = %request.uri().path(), "Admin request without authorization");
        return Err(unauthorized("Missing authorization"));
    };

    let Some(token) = auth_value.strip_prefix("Bearer ") else {
        debug!("Authorization header does not start with 'Bearer '");
        return Err(unauthorized(
            "Authorization header does not start with 'Bearer '",
        ));
    };

    if state.admin_config.token.is_none() {
        warn!("Admin request rejected: no admin token configured");
        return Err(unauthorized("Admin access is not configured"));
    }

    if !state.admin_config.is_valid_token(token.trim()) {
        debug!(path = %request.uri().path(), "Invalid admin token");
        return Err(unauthorized("Invalid admin token"));
    }

    request.extensions_mut().insert(AdminUser);
    Ok(next.run(request).await)
}
