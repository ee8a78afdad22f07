//! Account login, registration and logout.

use mediclerk_core::endpoints;
use mediclerk_core::models::user::UserProfile;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ApiError, AuthError, FieldErrors};
use crate::response::{classify, field_errors, transport};
use crate::session::{Session, SessionProvider};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.first_name.trim().is_empty() {
            errors.insert("first_name".into(), "First name is required".into());
        }
        if self.last_name.trim().is_empty() {
            errors.insert("last_name".into(), "Last name is required".into());
        }
        if !is_valid_email(&self.email) {
            errors.insert("email".into(), "Please enter a valid email address".into());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(
                "password".into(),
                "Password must be at least 8 characters long".into(),
            );
        }
        errors
    }
}

pub fn validate_login(email: &str, password: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !is_valid_email(email) {
        errors.insert("email".into(), "Please enter a valid email address".into());
    }
    if password.is_empty() {
        errors.insert("password".into(), "Password is required".into());
    }
    errors
}

/// `local@domain.tld` with no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, _)| !host.is_empty())
        && !domain.ends_with('.')
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    user: UserProfile,
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    sessions: SessionProvider,
}

impl AuthClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, sessions: SessionProvider) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            sessions,
        }
    }

    /// Authenticate and install the resulting session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let errors = validate_login(email, password);
        if !errors.is_empty() {
            return Err(AuthError::Invalid(errors));
        }

        info!(email = email.trim(), "logging in");
        let response = self
            .http
            .post(endpoints::join(&self.base_url, endpoints::LOGIN))
            .json(&LoginRequest {
                email: email.trim(),
                password,
            })
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::BAD_REQUEST) {
            warn!(status = status.as_u16(), "login rejected");
            return Err(AuthError::LoginFailed(
                "Login failed. Please check your credentials.".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(classify(status, &body, "login").into());
        }

        let parsed: LoginResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        if parsed.access_token.is_empty() {
            return Err(AuthError::LoginFailed("Invalid response from server".to_string()));
        }

        let session = Session {
            access_token: parsed.access_token,
            user: parsed.user,
        };
        self.sessions.install(session.clone());
        info!(user = %session.user.display_name(), "logged in");
        Ok(session)
    }

    /// Create an account. The caller logs in separately afterwards.
    pub async fn register(&self, form: &RegistrationForm) -> Result<(), AuthError> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Err(AuthError::Invalid(errors));
        }

        let response = self
            .http
            .post(endpoints::join(&self.base_url, endpoints::REGISTER))
            .json(form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        if status == StatusCode::BAD_REQUEST {
            let rejected = field_errors(&body);
            if !rejected.is_empty() {
                return Err(AuthError::Invalid(rejected));
            }
        }
        if !status.is_success() {
            return Err(classify(status, &body, "registration").into());
        }

        info!(email = form.email.trim(), "account registered");
        Ok(())
    }

    pub fn logout(&self) {
        self.sessions.clear();
        info!("logged out");
    }
}
