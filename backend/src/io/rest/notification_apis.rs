use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;
use shared::NotificationListResponse;

use super::current_user_id;
use super::error::error_response;
use super::mappers::NotificationMapper;
use crate::domain::RoscaResult;
use crate::storage::Connection;
use crate::AppState;

pub fn router<C: Connection>() -> Router<AppState<C>> {
    Router::new()
        .route("/", get(list_notifications::<C>))
        .route("/:notification_id/read", post(mark_read::<C>))
}

/// Derived reminders and stored notifications, listed separately.
pub async fn list_notifications<C: Connection>(
    State(state): State<AppState<C>>,
) -> impl IntoResponse {
    info!("GET /api/notifications");

    let result = current_user_id(&state).and_then(|id| -> RoscaResult<_> {
        let reminders = state.notification_service.reminders_for(&id)?;
        let notifications = state.notification_service.list_for_user(&id)?;
        Ok(NotificationListResponse {
            reminders: NotificationMapper::to_dto_list(reminders),
            notifications: NotificationMapper::to_dto_list(notifications),
        })
    });
    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("List notifications", e),
    }
}

pub async fn mark_read<C: Connection>(
    State(state): State<AppState<C>>,
    Path(notification_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/notifications/{}/read", notification_id);

    let result = current_user_id(&state)
        .and_then(|id| state.notification_service.mark_read(&id, &notification_id));
    match result {
        Ok(notification) => {
            (StatusCode::OK, Json(NotificationMapper::to_dto(notification))).into_response()
        }
        Err(e) => error_response("Mark notification read", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{body_json, demo_state, get_request, json_request, log_in};
    use serde_json::json;
    use shared::{Notification, NotificationKind};
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_reminders_and_mark_read() {
        let state = demo_state();
        log_in(&state, "admin@rosca.app", "admin123");
        state
            .round_service
            .advance_round(
                "user-admin-001",
                crate::domain::commands::rounds::AdvanceRoundCommand {
                    group_id: "group-001".into(),
                    allow_missing_contributions: false,
                },
            )
            .unwrap();

        log_in(&state, "ivan@example.com", "pass123");
        let app = router().with_state(state);
        let response = app.clone().oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed: NotificationListResponse = body_json(response).await;
        assert_eq!(listed.reminders.len(), 1);
        assert_eq!(listed.reminders[0].kind, NotificationKind::ContributionReminder);
        assert_eq!(listed.notifications.len(), 1);
        assert_eq!(listed.notifications[0].kind, NotificationKind::PayoutReceived);

        let uri = format!("/{}/read", listed.notifications[0].id);
        let response = app.clone().oneshot(json_request("POST", &uri, json!({}))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let read: Notification = body_json(response).await;
        assert!(read.is_read);

        let response = app
            .oneshot(json_request("POST", "/notif-404/read", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
