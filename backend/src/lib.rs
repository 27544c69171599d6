//! # ROSCA Backend
//!
//! Non-UI logic for rotating savings groups: members pool a fixed
//! contribution every period and each round one member, in a randomly drawn
//! order, receives the whole pot.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers, mappers)
//!     ↓
//! Domain Layer (services, rules, schedule)
//!     ↓
//! Storage Layer (unit of work, memory and file backends)
//! ```
//!
//! [`AppState`] wires one service of each kind to a shared storage
//! [`Connection`]; [`create_router`] exposes them over HTTP.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::domain::{
    AdminService, ContributionService, DashboardService, GroupService, NotificationService,
    RoundService, SessionService, SnapshotService, TransactionService, UserService,
};
use crate::storage::Connection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState<C: Connection> {
    pub session_service: SessionService<C>,
    pub user_service: UserService<C>,
    pub group_service: GroupService<C>,
    pub contribution_service: ContributionService<C>,
    pub round_service: RoundService<C>,
    pub dashboard_service: DashboardService<C>,
    pub transaction_service: TransactionService<C>,
    pub notification_service: NotificationService<C>,
    pub admin_service: AdminService<C>,
    pub snapshot_service: SnapshotService<C>,
}

impl<C: Connection> AppState<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self::with_group_service(connection.clone(), GroupService::new(connection))
    }

    /// Deterministic payout orders, for tests and reproducible demos.
    pub fn with_rng_seed(connection: Arc<C>, seed: u64) -> Self {
        Self::with_group_service(
            connection.clone(),
            GroupService::with_rng_seed(connection, seed),
        )
    }

    fn with_group_service(connection: Arc<C>, group_service: GroupService<C>) -> Self {
        Self {
            session_service: SessionService::new(connection.clone()),
            user_service: UserService::new(connection.clone()),
            group_service,
            contribution_service: ContributionService::new(connection.clone()),
            round_service: RoundService::new(connection.clone()),
            dashboard_service: DashboardService::new(connection.clone()),
            transaction_service: TransactionService::new(connection.clone()),
            notification_service: NotificationService::new(connection.clone()),
            admin_service: AdminService::new(connection.clone()),
            snapshot_service: SnapshotService::new(connection),
        }
    }
}

/// Create the Axum router with all routes under `/api`. Any origin is
/// allowed when `allowed_origin` is `None`.
pub fn create_router<C: Connection>(
    app_state: AppState<C>,
    allowed_origin: Option<&str>,
) -> Result<Router> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);
    let cors = match allowed_origin {
        Some(origin) => {
            info!("Allowing cross-origin requests from {}", origin);
            cors.allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid allowed origin '{}'", origin))?,
            )
        }
        None => cors.allow_origin(Any),
    };

    Ok(Router::new()
        .nest("/api", io::api_router())
        .layer(cors)
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed::demo_ledger;
    use crate::storage::MemoryConnection;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::util::ServiceExt;

    fn app() -> Router {
        let state = AppState::with_rng_seed(Arc::new(MemoryConnection::with_data(demo_ledger())), 1);
        create_router(state, Some("http://localhost:8080")).unwrap()
    }

    #[tokio::test]
    async fn test_routes_are_nested_under_api() {
        let response = app()
            .oneshot(Request::builder().uri("/api/groups").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app()
            .oneshot(Request::builder().uri("/groups").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_header_for_allowed_origin() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/session")
                    .header("origin", "http://localhost:8080")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let state = AppState::new(Arc::new(MemoryConnection::new()));
        assert!(create_router(state, Some("bad\norigin")).is_err());
    }
}
