//! Outermost request boundary: turns a panic anywhere below it into a
//! generic 500 so the serving loop keeps going.

use std::any::Any;

use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

use super::errors::AppError;

pub type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(recover as PanicHandler)
}

fn recover(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else {
        "non-string panic payload"
    };

    error!(panic = %detail, "request handler panicked");
    AppError::panic().into_response()
}
