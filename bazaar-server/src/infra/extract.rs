use axum::extract::FromRequest;

use super::errors::AppError;

/// `Json` whose rejection answers with the generic bind error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
