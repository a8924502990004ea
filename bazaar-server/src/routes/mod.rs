use axum::{
    Json, Router, middleware,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::countries::handlers::list_countries;
use crate::infra::{app_state::AppState, boundary::catch_panic_layer, response::ApiResponse};
use crate::users::{
    account_handlers::{delete_account, update_account, update_password},
    auth::{
        handlers::{login, signup},
        middleware::require_account,
    },
};

pub const ALIVE: &str = "We are ok!";

async fn alive() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success(ALIVE))
}

/// Full application router. Layer order, outermost first: panic boundary,
/// request tracing, then the bearer-token gate on protected routes only.
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/test/alive", get(alive))
        .route("/user/signup", post(signup))
        .route("/user/login", post(login))
        .route("/country/list", get(list_countries));

    let protected = Router::new()
        .route("/test/auth", get(alive))
        .route("/user/update", put(update_account))
        .route("/user/update/password", put(update_password))
        .route("/user/delete", delete(delete_account))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_account,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(catch_panic_layer())
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}
