mod common;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use mediclerk_api::auth::{AuthClient, RegistrationForm, is_valid_email};
use mediclerk_api::error::AuthError;
use mediclerk_api::session::SessionProvider;
use serde_json::{Value, json};

fn backend() -> Router {
    Router::new()
        .route(
            "/api/auth/login",
            post(|Json(body): Json<Value>| async move {
                match body["password"].as_str() {
                    Some("correct-horse") => (
                        StatusCode::OK,
                        Json(json!({
                            "access_token": "jwt-abc",
                            "user": { "email": body["email"], "first_name": "Ade", "last_name": "Bello" },
                        })),
                    ),
                    Some("no-token") => (StatusCode::OK, Json(json!({ "user": {} }))),
                    _ => (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Invalid credentials" }))),
                }
            }),
        )
        .route(
            "/api/auth/register",
            post(|Json(body): Json<Value>| async move {
                if body["email"] == "taken@example.com" {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "email": ["A user with this email already exists."] })),
                    )
                } else {
                    (StatusCode::CREATED, Json(json!({ "id": 5 })))
                }
            }),
        )
}

async fn client(provider: SessionProvider) -> AuthClient {
    let base = common::serve(backend()).await;
    AuthClient::new(common::http(), base, provider)
}

fn form(email: &str, password: &str) -> RegistrationForm {
    RegistrationForm {
        first_name: "Ade".into(),
        last_name: "Bello".into(),
        email: email.into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn login_installs_session_visible_to_contexts() {
    let provider = SessionProvider::new();
    let context = provider.context();
    assert!(!context.is_authenticated());

    let auth = client(provider.clone()).await;
    let session = auth.login("ade@example.com", "correct-horse").await.unwrap();

    assert_eq!(session.access_token, "jwt-abc");
    assert_eq!(context.bearer_token().as_deref(), Some("jwt-abc"));
    assert_eq!(context.user().unwrap().display_name(), "Ade Bello");

    auth.logout();
    assert!(!context.is_authenticated());
}

#[tokio::test]
async fn rejected_credentials_leave_session_empty() {
    let provider = SessionProvider::new();
    let auth = client(provider.clone()).await;

    let err = auth.login("ade@example.com", "wrong-password").await.unwrap_err();
    match err {
        AuthError::LoginFailed(msg) => assert_eq!(msg, "Login failed. Please check your credentials."),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(provider.current().is_none());
}

#[tokio::test]
async fn login_response_without_token_is_rejected() {
    let provider = SessionProvider::new();
    let auth = client(provider.clone()).await;

    let err = auth.login("ade@example.com", "no-token").await.unwrap_err();
    assert!(matches!(err, AuthError::LoginFailed(ref m) if m == "Invalid response from server"));
    assert!(provider.current().is_none());
}

#[tokio::test]
async fn login_checks_fields_locally() {
    let auth = client(SessionProvider::new()).await;

    let Err(AuthError::Invalid(errors)) = auth.login("not-an-email", "").await else {
        panic!("expected local validation failure");
    };
    assert!(errors.contains_key("email"));
    assert!(errors.contains_key("password"));
}

#[tokio::test]
async fn registration_validates_before_sending() {
    let auth = client(SessionProvider::new()).await;

    let mut short = form("ade@example.com", "short");
    short.first_name = "  ".into();
    let Err(AuthError::Invalid(errors)) = auth.register(&short).await else {
        panic!("expected local validation failure");
    };
    assert_eq!(
        errors.get("password").map(String::as_str),
        Some("Password must be at least 8 characters long")
    );
    assert!(errors.contains_key("first_name"));
    assert!(!errors.contains_key("email"));

    auth.register(&form("new@example.com", "long-enough")).await.unwrap();
}

#[tokio::test]
async fn server_field_rejections_surface_per_field() {
    let auth = client(SessionProvider::new()).await;

    let Err(AuthError::Invalid(errors)) = auth.register(&form("taken@example.com", "long-enough")).await
    else {
        panic!("expected server-side field errors");
    };
    assert_eq!(errors["email"], "A user with this email already exists.");
}

#[test]
fn email_shape() {
    assert!(is_valid_email("a@b.co"));
    assert!(is_valid_email(" dr.ade@hospital.ng "));
    assert!(!is_valid_email("a@b"));
    assert!(!is_valid_email("@b.co"));
    assert!(!is_valid_email("a b@c.co"));
    assert!(!is_valid_email("a@@b.co"));
}
