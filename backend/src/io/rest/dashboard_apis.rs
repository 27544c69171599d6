use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;
use shared::DashboardResponse;

use super::current_user_id;
use super::error::error_response;
use crate::storage::Connection;
use crate::AppState;

pub fn router<C: Connection>() -> Router<AppState<C>> {
    Router::new().route("/", get(get_dashboard::<C>))
}

pub async fn get_dashboard<C: Connection>(State(state): State<AppState<C>>) -> impl IntoResponse {
    info!("GET /api/dashboard");

    let result = current_user_id(&state).and_then(|id| state.dashboard_service.summary(&id));
    match result {
        Ok(summary) => {
            let response = DashboardResponse {
                balance: summary.balance,
                total_groups: summary.total_groups,
                total_contributions: summary.total_contributions,
                total_payouts: summary.total_payouts,
                next_payout_date: summary.next_payout_date.map(|d| d.to_rfc3339()),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Dashboard", e),
    }
}
