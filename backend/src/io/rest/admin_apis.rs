use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use log::info;
use shared::{AdminOverviewResponse, AdminUserRow};

use super::current_user_id;
use super::error::error_response;
use super::mappers::{GroupMapper, UserMapper};
use crate::storage::Connection;
use crate::AppState;

pub fn router<C: Connection>() -> Router<AppState<C>> {
    Router::new().route("/overview", get(overview::<C>))
}

pub async fn overview<C: Connection>(State(state): State<AppState<C>>) -> impl IntoResponse {
    info!("GET /api/admin/overview");

    let result = current_user_id(&state).and_then(|id| state.admin_service.overview(&id));
    match result {
        Ok(overview) => {
            let response = AdminOverviewResponse {
                total_users: overview.total_users,
                total_groups: overview.total_groups,
                total_transactions: overview.total_transactions,
                users: overview
                    .users
                    .into_iter()
                    .map(|row| AdminUserRow {
                        id: row.user.id,
                        name: row.user.name,
                        email: row.user.email,
                        role: UserMapper::role_to_dto(row.user.role),
                        balance: row.user.balance,
                        joined_group_count: row.joined_group_count,
                    })
                    .collect(),
                groups: GroupMapper::to_dto_list(overview.groups),
                active_groups: GroupMapper::to_dto_list(overview.active_groups),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Admin overview", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{body_json, demo_state, get_request, log_in};
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_overview_for_admin_only() {
        let state = demo_state();
        log_in(&state, "anna@example.com", "pass123");
        let response = router()
            .with_state(state.clone())
            .oneshot(get_request("/overview"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        log_in(&state, "admin@rosca.app", "admin123");
        let response = router()
            .with_state(state)
            .oneshot(get_request("/overview"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let overview: AdminOverviewResponse = body_json(response).await;
        assert_eq!(overview.total_users, 6);
        assert_eq!(overview.total_transactions, 6);
        assert_eq!(overview.active_groups.len(), 1);
    }
}
