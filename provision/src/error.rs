use thiserror::Error;

pub type ProvisionResult<T> = Result<T, ProvisionError>;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Authentication against {endpoint} failed: {reason}")]
    AuthenticationError { endpoint: String, reason: String },
}

impl ProvisionError {
    pub fn authentication(endpoint: &str, reason: impl ToString) -> Self {
        Self::AuthenticationError {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::AuthenticationError { .. })
    }
}
