//! # REST API Interface Layer
//!
//! HTTP endpoints for the savings-group application. Handlers translate the
//! DTOs from `shared` into domain commands, call one service, and map the
//! result (or a [`RoscaError`](crate::domain::RoscaError)) back to JSON.
//!
//! All routes live under `/api`:
//!
//! - `/session`: login, logout, current user
//! - `/users`: registration and lookup
//! - `/groups`: formation, contributions, rounds, details
//! - `/dashboard`, `/transactions`, `/notifications`: per-user read models
//! - `/admin`, `/snapshot`: administrator tools

pub mod admin_apis;
pub mod dashboard_apis;
pub mod error;
pub mod group_apis;
pub mod mappers;
pub mod notification_apis;
pub mod session_apis;
pub mod snapshot_apis;
pub mod transaction_apis;
pub mod user_apis;

use axum::Router;

use crate::domain::RoscaResult;
use crate::storage::Connection;
use crate::AppState;

/// Every API router, nested under its resource path.
pub fn api_router<C: Connection>() -> Router<AppState<C>> {
    Router::new()
        .nest("/session", session_apis::router())
        .nest("/users", user_apis::router())
        .nest("/groups", group_apis::router())
        .nest("/dashboard", dashboard_apis::router())
        .nest("/transactions", transaction_apis::router())
        .nest("/notifications", notification_apis::router())
        .nest("/admin", admin_apis::router())
        .nest("/snapshot", snapshot_apis::router())
}

/// Id of the logged-in user, or `NotAuthenticated`.
pub(crate) fn current_user_id<C: Connection>(state: &AppState<C>) -> RoscaResult<String> {
    Ok(state.session_service.require_current_user()?.id)
}
