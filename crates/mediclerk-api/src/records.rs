//! Clerking record CRUD against the REST backend.

use async_trait::async_trait;
use mediclerk_core::endpoints;
use mediclerk_core::models::payload::{SubmissionPayload, UpdatePayload};
use mediclerk_core::models::record::{ClerkingNote, ClerkingRecord, RecordId};
use reqwest::RequestBuilder;
use tracing::info;

use crate::error::ApiError;
use crate::response::{checked_body, json_body, transport};
use crate::session::SessionContext;

/// Persistence operations the form screens depend on.
#[async_trait]
pub trait RecordService: Send + Sync {
    async fn create(&self, specialty: &str, form_data: ClerkingNote) -> Result<ClerkingRecord, ApiError>;

    /// All records owned by the signed-in account.
    async fn list(&self) -> Result<Vec<ClerkingRecord>, ApiError>;

    async fn retrieve(&self, id: &RecordId) -> Result<ClerkingRecord, ApiError>;

    /// Replace the whole clerking note of a record.
    async fn update(&self, id: &RecordId, form_data: ClerkingNote) -> Result<ClerkingRecord, ApiError>;

    async fn delete(&self, id: &RecordId) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct RecordClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

impl RecordClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, session: SessionContext) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        endpoints::join(&self.base_url, path)
    }

    /// Attach the bearer token, failing locally when there is none.
    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.session.bearer_token().ok_or(ApiError::Unauthorized)?;
        Ok(request.bearer_auth(token))
    }
}

#[async_trait]
impl RecordService for RecordClient {
    async fn create(&self, specialty: &str, form_data: ClerkingNote) -> Result<ClerkingRecord, ApiError> {
        let payload = SubmissionPayload {
            specialty: specialty.to_string(),
            form_data,
        };
        let request = self.authorize(self.http.post(self.url(endpoints::CREATE_RECORD)))?;
        let response = request.json(&payload).send().await.map_err(transport)?;
        let record: ClerkingRecord = json_body(response, "clerking note").await?;

        info!(record_id = %record.id, specialty, "clerking note created");
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<ClerkingRecord>, ApiError> {
        let request = self.authorize(self.http.get(self.url(endpoints::LIST_RECORDS)))?;
        let response = request.send().await.map_err(transport)?;

        match json_body(response, "clerking notes").await {
            // The backend answers 404 when the account has no notes yet.
            Err(ApiError::NotFound(_)) => Ok(Vec::new()),
            other => other,
        }
    }

    async fn retrieve(&self, id: &RecordId) -> Result<ClerkingRecord, ApiError> {
        let request = self.authorize(self.http.get(self.url(&endpoints::retrieve_record(id))))?;
        let response = request.send().await.map_err(transport)?;
        json_body(response, &format!("clerking note {id}")).await
    }

    async fn update(&self, id: &RecordId, form_data: ClerkingNote) -> Result<ClerkingRecord, ApiError> {
        let payload = UpdatePayload { form_data };
        let request = self.authorize(self.http.put(self.url(&endpoints::update_record(id))))?;
        let response = request.json(&payload).send().await.map_err(transport)?;
        let record: ClerkingRecord = json_body(response, &format!("clerking note {id}")).await?;

        info!(record_id = %record.id, "clerking note updated");
        Ok(record)
    }

    async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        let request = self.authorize(self.http.delete(self.url(&endpoints::delete_record(id))))?;
        let response = request.send().await.map_err(transport)?;
        checked_body(response, &format!("clerking note {id}")).await?;

        info!(record_id = %id, "clerking note deleted");
        Ok(())
    }
}
