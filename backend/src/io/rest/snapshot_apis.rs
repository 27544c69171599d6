//! # REST API for Snapshots
//!
//! Whole-ledger export and import in the single-document snapshot layout.
//! Administrators only.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;
use shared::SnapshotImportResponse;

use super::current_user_id;
use super::error::error_response;
use crate::storage::{Connection, LedgerSnapshot};
use crate::AppState;

pub fn router<C: Connection>() -> Router<AppState<C>> {
    Router::new().route("/", get(export_snapshot::<C>).post(import_snapshot::<C>))
}

pub async fn export_snapshot<C: Connection>(State(state): State<AppState<C>>) -> impl IntoResponse {
    info!("GET /api/snapshot");

    let result = current_user_id(&state).and_then(|id| state.snapshot_service.export(&id));
    match result {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => error_response("Export snapshot", e),
    }
}

pub async fn import_snapshot<C: Connection>(
    State(state): State<AppState<C>>,
    Json(snapshot): Json<LedgerSnapshot>,
) -> impl IntoResponse {
    info!(
        "POST /api/snapshot - {} users, {} groups, {} transactions, {} notifications",
        snapshot.users.len(),
        snapshot.groups.len(),
        snapshot.transactions.len(),
        snapshot.notifications.len()
    );

    let result = current_user_id(&state).and_then(|id| state.snapshot_service.import(&id, snapshot));
    match result {
        Ok(summary) => {
            let response = SnapshotImportResponse {
                success_message: format!(
                    "Imported {} users, {} groups, {} transactions and {} notifications",
                    summary.users, summary.groups, summary.transactions, summary.notifications
                ),
                users: summary.users,
                groups: summary.groups,
                transactions: summary.transactions,
                notifications: summary.notifications,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Import snapshot", e),
    }
}
