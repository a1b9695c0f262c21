use crate::provider::ProviderError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::{io, path::PathBuf};
use thiserror::Error;

/// A server-side setting is missing or unusable. Only an operator can fix these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Stripe publishable key is not configured.")]
    MissingPublishableKey,
    #[error("STRIPE_PRICE_ID must be configured.")]
    MissingPriceId,
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("All CORS lines failed validation in {}", .0.display())]
    CorsOrigins(PathBuf),
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    /// A required caller input was absent; names the field.
    #[error("{0} query parameter is required.")]
    Validation(&'static str),
    #[error(transparent)]
    Upstream(#[from] ProviderError),
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Configuration(ConfigError::MissingPriceId) => StatusCode::BAD_REQUEST,
            GatewayError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
