//! Client for the activities API

use std::sync::Arc;

use crate::activity::{ActivityCatalog, ErrorResponse, SignupResponse};
use crate::io::{HttpClient, HttpResponse};
use crate::BoardError;

/// Talks to the backend that owns activities and rosters
pub struct SignupClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for SignupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl SignupClient {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created SignupClient for {}", base_url);
        Self { base_url, http }
    }

    pub fn activities_url(&self) -> String {
        format!("{}/activities", self.base_url)
    }

    pub fn signup_url(&self, activity: &str, email: &str) -> String {
        self.roster_url(activity, "signup", email)
    }

    pub fn unregister_url(&self, activity: &str, email: &str) -> String {
        self.roster_url(activity, "unregister", email)
    }

    fn roster_url(&self, activity: &str, action: &str, email: &str) -> String {
        format!(
            "{}/activities/{}/{}?email={}",
            self.base_url,
            urlencoding::encode(activity),
            action,
            urlencoding::encode(email)
        )
    }

    /// Fetch the full activity collection
    pub async fn list_activities(&self) -> crate::Result<ActivityCatalog> {
        let response = self.http.get(&self.activities_url()).await?;
        let response = reject_failure(response)?;
        let catalog: ActivityCatalog = serde_json::from_str(&response.body)?;
        tracing::debug!("Fetched {} activities", catalog.len());
        Ok(catalog)
    }

    /// Register `email` for `activity`, returning the server's message
    pub async fn signup(&self, activity: &str, email: &str) -> crate::Result<String> {
        let response = self.http.post(&self.signup_url(activity, email)).await?;
        let response = reject_failure(response)?;
        let message = serde_json::from_str::<SignupResponse>(&response.body)
            .ok()
            .and_then(|r| r.message)
            .unwrap_or_else(|| format!("Signed up {} for {}", email, activity));
        Ok(message)
    }

    /// Remove `email` from `activity`. Success is the status code alone.
    pub async fn unregister(&self, activity: &str, email: &str) -> crate::Result<()> {
        let response = self.http.post(&self.unregister_url(activity, email)).await?;
        reject_failure(response)?;
        Ok(())
    }
}

fn reject_failure(response: HttpResponse) -> crate::Result<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }
    let detail = serde_json::from_str::<ErrorResponse>(&response.body)
        .ok()
        .and_then(|e| e.detail().map(str::to_string));
    tracing::debug!(
        "Request rejected with status {}: {:?}",
        response.status,
        detail
    );
    Err(BoardError::Api {
        status: response.status,
        detail,
    })
}
