use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::infra::{app_state::AppState, errors::AppError};

pub const MISSING_AUTHORIZATION: &str = "Missing or malformed authorization header";
pub const ACCOUNT_DELETED: &str = "User was deleted";

/// Id of the account that presented a valid token; inserted by
/// [`require_account`] and scoped to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedAccount(pub Uuid);

/// Gate in front of every protected route. The first failing step answers
/// 401 with its own reason.
pub async fn require_account(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;

    let account_id = state
        .tokens
        .verify(token)
        .map_err(|err| AppError::unauthorized(err.to_string()))?;

    let account = state.accounts.get_by_id(account_id).await.map_err(|err| {
        debug!(%account_id, error = %err, "token subject could not be loaded");
        AppError::unauthorized(err.to_string())
    })?;

    if !account.is_active() {
        return Err(AppError::unauthorized(ACCOUNT_DELETED));
    }

    request
        .extensions_mut()
        .insert(AuthenticatedAccount(account.id));
    Ok(next.run(request).await)
}

fn extract_bearer_token(request: &Request) -> Result<&str, AppError> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized(MISSING_AUTHORIZATION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(header_value: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/test/auth");
        if let Some(value) = header_value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        let request = request_with(Some("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&request).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_or_foreign_schemes_are_rejected() {
        for header_value in [None, Some("Basic dXNlcjpwYXNz"), Some("Bearer "), Some("abc")] {
            let err = extract_bearer_token(&request_with(header_value)).unwrap_err();
            assert_eq!(err.message, MISSING_AUTHORIZATION);
        }
    }
}
