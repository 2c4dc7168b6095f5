// SPDX-License-Identifier: MIT

//! Shared-secret authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

const API_KEY_HEADER: &str = "x-api-key";

/// Require a matching `x-api-key` header on mutating routes.
///
/// Missing or mismatched keys are rejected before the handler runs, so
/// no side effects can occur.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    match provided {
        Some(key) if bool::from(key.as_bytes().ct_eq(state.config.api_key.as_bytes())) => {
            Ok(next.run(request).await)
        }
        _ => {
            tracing::warn!(path = %request.uri().path(), "Rejected request with bad API key");
            Err(AppError::Unauthorized)
        }
    }
}
