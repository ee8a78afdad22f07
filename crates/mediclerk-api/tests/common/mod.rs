#![allow(dead_code)]

use axum::Router;
use mediclerk_api::session::{Session, SessionProvider};
use mediclerk_core::models::user::UserProfile;

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

pub fn signed_in(token: &str) -> SessionProvider {
    SessionProvider::with_session(Session {
        access_token: token.to_string(),
        user: UserProfile {
            email: Some("dr.ade@example.com".into()),
            first_name: Some("Ade".into()),
            last_name: Some("Bello".into()),
        },
    })
}

pub fn http() -> reqwest::Client {
    mediclerk_api::client::build_client(None).unwrap()
}
