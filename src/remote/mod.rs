use anyhow::{Context, Result};
use serde_json::Value;

use crate::form::RegistrationDraft;

/// Default create-user endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://reqres.in/api/users";

/// Failure of one create-user request. Carries a diagnostic message only;
/// the form surfaces nothing for it.
#[derive(Debug, Clone)]
pub struct SubmitError {
    pub message: String,
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SubmitError {}

impl From<reqwest::Error> for SubmitError {
    fn from(err: reqwest::Error) -> Self {
        SubmitError {
            message: err.to_string(),
        }
    }
}

/// The remote create-user endpoint, as the form controller sees it: one
/// call, a JSON record in, the created record (or a failure) out.
pub trait CreateUser: Send + Sync {
    fn create(&self, draft: &RegistrationDraft) -> Result<Value, SubmitError>;
}

/// HTTP implementation posting the draft as a JSON body.
pub struct HttpCreateUser {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpCreateUser {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CreateUser for HttpCreateUser {
    fn create(&self, draft: &RegistrationDraft) -> Result<Value, SubmitError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(draft)
            .send()?
            .error_for_status()?;
        let record = response.json::<Value>()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_error_displays_its_message() {
        let err = SubmitError {
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn http_client_keeps_the_configured_endpoint() {
        let client = HttpCreateUser::new("http://localhost:9999/api/users").expect("client");
        assert_eq!(client.endpoint(), "http://localhost:9999/api/users");
    }
}
