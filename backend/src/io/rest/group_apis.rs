//! # REST API for Groups
//!
//! Group formation, contributions and round advancement. Every mutating
//! endpoint acts for the logged-in user.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;
use shared::{
    AdvanceRoundRequest, AdvanceRoundResponse, ContributionResponse, CreateGroupRequest,
    GroupListResponse, GroupResponse, JoinGroupResponse,
};

use super::current_user_id;
use super::error::error_response;
use super::mappers::{GroupMapper, TransactionMapper};
use crate::domain::commands::rounds::AdvanceRoundCommand;
use crate::storage::Connection;
use crate::AppState;

pub fn router<C: Connection>() -> Router<AppState<C>> {
    Router::new()
        .route("/", get(list_groups::<C>).post(create_group::<C>))
        .route("/mine", get(my_groups::<C>))
        .route("/available", get(available_groups::<C>))
        .route("/:group_id", get(group_details::<C>))
        .route("/:group_id/join", post(join_group::<C>))
        .route("/:group_id/contributions", post(contribute::<C>))
        .route("/:group_id/advance", post(advance_round::<C>))
        .route("/:group_id/progress", get(round_progress::<C>))
        .route("/:group_id/transactions", get(group_transactions::<C>))
}

pub async fn list_groups<C: Connection>(State(state): State<AppState<C>>) -> impl IntoResponse {
    info!("GET /api/groups");

    match state.group_service.list_groups() {
        Ok(groups) => {
            let response = GroupListResponse {
                groups: GroupMapper::to_dto_list(groups),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("List groups", e),
    }
}

pub async fn my_groups<C: Connection>(State(state): State<AppState<C>>) -> impl IntoResponse {
    info!("GET /api/groups/mine");

    let result = current_user_id(&state).and_then(|id| state.group_service.groups_for_user(&id));
    match result {
        Ok(groups) => {
            let response = GroupListResponse {
                groups: GroupMapper::to_dto_list(groups),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("List my groups", e),
    }
}

pub async fn available_groups<C: Connection>(
    State(state): State<AppState<C>>,
) -> impl IntoResponse {
    info!("GET /api/groups/available");

    let result =
        current_user_id(&state).and_then(|id| state.group_service.available_groups(&id));
    match result {
        Ok(groups) => {
            let response = GroupListResponse {
                groups: GroupMapper::to_dto_list(groups),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("List available groups", e),
    }
}

pub async fn create_group<C: Connection>(
    State(state): State<AppState<C>>,
    Json(request): Json<CreateGroupRequest>,
) -> impl IntoResponse {
    info!("POST /api/groups - request: {:?}", request);

    let command = GroupMapper::to_create_command(request);
    let result =
        current_user_id(&state).and_then(|id| state.group_service.create_group(&id, command));
    match result {
        Ok(group) => {
            let response = GroupResponse {
                success_message: format!("Group \"{}\" created. Waiting for members.", group.name),
                group: GroupMapper::to_dto(group),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("Create group", e),
    }
}

pub async fn group_details<C: Connection>(
    State(state): State<AppState<C>>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/groups/{}", group_id);

    match state.group_service.group_details(&group_id) {
        Ok(details) => {
            (StatusCode::OK, Json(GroupMapper::to_details_response(details))).into_response()
        }
        Err(e) => error_response("Group details", e),
    }
}

pub async fn join_group<C: Connection>(
    State(state): State<AppState<C>>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/groups/{}/join", group_id);

    let result =
        current_user_id(&state).and_then(|id| state.group_service.join_group(&group_id, &id));
    match result {
        Ok(result) => {
            let response = JoinGroupResponse {
                group: GroupMapper::to_dto(result.group),
                activated: result.activated,
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Join group", e),
    }
}

pub async fn contribute<C: Connection>(
    State(state): State<AppState<C>>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/groups/{}/contributions", group_id);

    let result = current_user_id(&state)
        .and_then(|id| state.contribution_service.contribute(&group_id, &id));
    match result {
        Ok(result) => {
            let response = ContributionResponse {
                transaction: TransactionMapper::to_dto(result.transaction),
                new_balance: result.new_balance,
                success_message: result.success_message,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("Contribute", e),
    }
}

/// An empty body means no override.
pub async fn advance_round<C: Connection>(
    State(state): State<AppState<C>>,
    Path(group_id): Path<String>,
    request: Option<Json<AdvanceRoundRequest>>,
) -> impl IntoResponse {
    let request = request.map(|Json(body)| body).unwrap_or_default();
    info!("POST /api/groups/{}/advance - request: {:?}", group_id, request);

    let command = AdvanceRoundCommand {
        group_id,
        allow_missing_contributions: request.allow_missing_contributions,
    };
    let result =
        current_user_id(&state).and_then(|id| state.round_service.advance_round(&id, command));
    match result {
        Ok(result) => {
            let response = AdvanceRoundResponse {
                group: GroupMapper::to_dto(result.group),
                payout: TransactionMapper::to_dto(result.payout),
                recipient_name: result.recipient_name,
                completed_round: result.completed_round,
                warning: result.warning,
                success_message: result.success_message,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Advance round", e),
    }
}

pub async fn round_progress<C: Connection>(
    State(state): State<AppState<C>>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/groups/{}/progress", group_id);

    match state.round_service.round_progress(&group_id) {
        Ok(progress) => {
            (StatusCode::OK, Json(GroupMapper::to_progress_response(progress))).into_response()
        }
        Err(e) => error_response("Round progress", e),
    }
}

pub async fn group_transactions<C: Connection>(
    State(state): State<AppState<C>>,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/groups/{}/transactions", group_id);

    match state.transaction_service.list_for_group(&group_id) {
        Ok(transactions) => {
            (StatusCode::OK, Json(TransactionMapper::to_dto_list(transactions))).into_response()
        }
        Err(e) => error_response("Group transactions", e),
    }
}
