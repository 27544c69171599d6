//! # REST API for the Session
//!
//! Login, logout and "who am I". The server keeps a single session slot, so
//! every other endpoint acts for whoever logged in last.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use log::info;
use shared::{LoginRequest, LoginResponse, SessionResponse};

use super::error::error_response;
use super::mappers::UserMapper;
use crate::domain::commands::session::LoginCommand;
use crate::storage::Connection;
use crate::AppState;

pub fn router<C: Connection>() -> Router<AppState<C>> {
    Router::new()
        .route("/", get(current_session::<C>))
        .route("/login", post(login::<C>))
        .route("/logout", post(logout::<C>))
}

pub async fn login<C: Connection>(
    State(state): State<AppState<C>>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    // The request carries a password, so only the email is logged
    info!("POST /api/session/login - email: {}", request.email);

    let command = LoginCommand {
        email: request.email,
        password: request.password,
    };
    match state.session_service.login(command) {
        Ok(user) => {
            let response = LoginResponse {
                success_message: format!("Welcome back, {}!", user.name),
                user: UserMapper::to_dto(user),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Login", e),
    }
}

pub async fn logout<C: Connection>(State(state): State<AppState<C>>) -> impl IntoResponse {
    info!("POST /api/session/logout");

    match state.session_service.logout() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("Logout", e),
    }
}

pub async fn current_session<C: Connection>(State(state): State<AppState<C>>) -> impl IntoResponse {
    info!("GET /api/session");

    match state.session_service.current_user() {
        Ok(user) => {
            let response = SessionResponse {
                user: user.map(UserMapper::to_dto),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Session lookup", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{body_json, demo_state, json_request};
    use axum::{body::Body, http::Request};
    use serde_json::json;
    use shared::ErrorResponse;
    use tower::util::ServiceExt; // for `oneshot`

    #[tokio::test]
    async fn test_login_then_session() {
        let state = demo_state();

        let response = router()
            .with_state(state.clone())
            .oneshot(json_request(
                "POST",
                "/login",
                json!({"email": "anna@example.com", "password": "pass123"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let login: LoginResponse = body_json(response).await;
        assert_eq!(login.user.id, "user-002");

        let response = router()
            .with_state(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let session: SessionResponse = body_json(response).await;
        assert_eq!(session.user.unwrap().email, "anna@example.com");
    }

    #[tokio::test]
    async fn test_bad_credentials_are_unauthorized() {
        let response = router()
            .with_state(demo_state())
            .oneshot(json_request(
                "POST",
                "/login",
                json!({"email": "anna@example.com", "password": "wrong"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.error, "Invalid email or password");
    }

    #[tokio::test]
    async fn test_logout() {
        let state = demo_state();
        state
            .session_service
            .login(LoginCommand {
                email: "anna@example.com".into(),
                password: "pass123".into(),
            })
            .unwrap();

        let response = router()
            .with_state(state.clone())
            .oneshot(json_request("POST", "/logout", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(state.session_service.current_user().unwrap().is_none());
    }
}
