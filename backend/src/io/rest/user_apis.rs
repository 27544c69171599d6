//! # REST API for Accounts
//!
//! Open registration for members, who start with a zero balance. Creating an
//! administrator or funding an opening balance requires an administrator to
//! be logged in.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;
use shared::{CreateUserRequest, UserResponse, UserRole};

use super::error::error_response;
use super::mappers::UserMapper;
use crate::domain::commands::users::CreateUserCommand;
use crate::domain::models::user::User;
use crate::domain::{RoscaError, RoscaResult};
use crate::storage::Connection;
use crate::AppState;

pub fn router<C: Connection>() -> Router<AppState<C>> {
    Router::new()
        .route("/", post(create_user::<C>))
        .route("/:user_id", get(get_user::<C>))
}

pub async fn create_user<C: Connection>(
    State(state): State<AppState<C>>,
    Json(request): Json<CreateUserRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/users - name: {}, email: {}, role: {:?}",
        request.name, request.email, request.role
    );

    match register(&state, request) {
        Ok(user) => {
            let response = UserResponse {
                success_message: format!("Account created for {}", user.name),
                user: UserMapper::to_dto(user),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("Create user", e),
    }
}

fn register<C: Connection>(
    state: &AppState<C>,
    request: CreateUserRequest,
) -> RoscaResult<User> {
    let role = request.role.unwrap_or(UserRole::User);
    if role == UserRole::Admin && !state.session_service.require_current_user()?.is_admin() {
        return Err(RoscaError::AdminRequired);
    }
    if request.opening_balance != 0 {
        let is_admin = state
            .session_service
            .current_user()?
            .map_or(false, |user| user.is_admin());
        if !is_admin {
            return Err(RoscaError::AdminRequired);
        }
    }
    state.user_service.create_user(CreateUserCommand {
        name: request.name,
        email: request.email,
        password: request.password,
        opening_balance: request.opening_balance,
        role: UserMapper::role_to_domain(role),
    })
}

pub async fn get_user<C: Connection>(
    State(state): State<AppState<C>>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}", user_id);

    match state.user_service.get_user(&user_id) {
        Ok(user) => (StatusCode::OK, Json(UserMapper::to_dto(user))).into_response(),
        Err(e) => error_response("Get user", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{body_json, demo_state, get_request, json_request, log_in};
    use serde_json::json;
    use shared::User;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_register_member() {
        let response = router()
            .with_state(demo_state())
            .oneshot(json_request(
                "POST",
                "/",
                json!({"name": "Oleg", "email": "oleg@example.com", "password": "pw"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: UserResponse = body_json(response).await;
        assert_eq!(created.user.balance, 0);
        assert_eq!(created.user.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_opening_balance_needs_admin_session() {
        let state = demo_state();
        let body = json!({"name": "Oleg", "email": "oleg@example.com", "password": "pw", "opening_balance": 3000});

        let response = router()
            .with_state(state.clone())
            .oneshot(json_request("POST", "/", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        log_in(&state, "ivan@example.com", "pass123");
        let response = router()
            .with_state(state.clone())
            .oneshot(json_request("POST", "/", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(state
            .user_service
            .list_users()
            .unwrap()
            .iter()
            .all(|user| user.email != "oleg@example.com"));

        log_in(&state, "admin@rosca.app", "admin123");
        let response = router()
            .with_state(state)
            .oneshot(json_request("POST", "/", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: UserResponse = body_json(response).await;
        assert_eq!(created.user.balance, 3000);
    }

    #[tokio::test]
    async fn test_admin_creation_needs_admin_session() {
        let state = demo_state();
        let body = json!({"name": "Root", "email": "root@example.com", "password": "pw", "role": "admin"});

        let response = router()
            .with_state(state.clone())
            .oneshot(json_request("POST", "/", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        log_in(&state, "ivan@example.com", "pass123");
        let response = router()
            .with_state(state.clone())
            .oneshot(json_request("POST", "/", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        log_in(&state, "admin@rosca.app", "admin123");
        let response = router()
            .with_state(state)
            .oneshot(json_request("POST", "/", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let response = router()
            .with_state(demo_state())
            .oneshot(json_request(
                "POST",
                "/",
                json!({"name": "Ivan 2", "email": "ivan@example.com", "password": "pw"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_get_user() {
        let app = router().with_state(demo_state());
        let response = app.clone().oneshot(get_request("/user-003")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let user: User = body_json(response).await;
        assert_eq!(user.name, "Alisa Kuznetsova");

        let response = app.oneshot(get_request("/user-404")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
