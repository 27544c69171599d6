//! # REST API for the Transaction History
//!
//! `GET /api/transactions?transaction_type=payout&status=completed`, both
//! filters optional.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;
use shared::{TransactionListRequest, TransactionListResponse};

use super::current_user_id;
use super::error::error_response;
use super::mappers::TransactionMapper;
use crate::storage::Connection;
use crate::AppState;

pub fn router<C: Connection>() -> Router<AppState<C>> {
    Router::new().route("/", get(list_transactions::<C>))
}

pub async fn list_transactions<C: Connection>(
    State(state): State<AppState<C>>,
    Query(request): Query<TransactionListRequest>,
) -> impl IntoResponse {
    info!("GET /api/transactions - query: {:?}", request);

    let query = TransactionMapper::to_query(request);
    let result = current_user_id(&state)
        .and_then(|id| state.transaction_service.list_for_user(&id, query));
    match result {
        Ok(entries) => {
            let response = TransactionListResponse {
                transactions: entries.into_iter().map(TransactionMapper::to_entry).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("List transactions", e),
    }
}
