//! The narrow seam between the gateway and the hosted payment provider.

use crate::types::{ClientSecret, SessionStatus};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// A checkout session the provider has just opened.
#[derive(Debug, Clone)]
pub struct CreatedSession {
    pub id: String,
    pub client_secret: ClientSecret,
}

/// What the provider currently reports for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub id: String,
    pub status: Option<SessionStatus>,
    pub customer_email: Option<String>,
    pub subscription: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with an error body; `message` is its own text.
    #[error("{message}")]
    Api {
        status: u16,
        kind: Option<String>,
        code: Option<String>,
        message: String,
    },
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    #[error("Request to payment provider timed out after {0:?}")]
    Timeout(Duration),
    #[error("Unexpected response from payment provider: {0}")]
    Decode(String),
}

impl ProviderError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ProviderError::Api {
            status,
            kind: None,
            code: None,
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Opens an embedded-mode subscription session for one unit of `price_id`.
    /// `return_url` carries the provider's session id placeholder verbatim.
    async fn create_embedded_subscription_session(
        &self,
        price_id: &str,
        return_url: &str,
    ) -> Result<CreatedSession, ProviderError>;

    async fn get_session(&self, session_id: &str) -> Result<SessionSnapshot, ProviderError>;
}
