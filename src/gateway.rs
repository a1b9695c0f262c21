//! The three checkout operations, independent of HTTP plumbing.

use crate::{
    config::GatewayConfig,
    error::{ConfigError, GatewayError},
    provider::{CheckoutProvider, ProviderError},
    types::{CheckoutSessionCreated, PublicConfig, SessionStatusReply},
};
use log::{error, info};
use std::{future::Future, sync::Arc};

/// Stripe replaces this with the real session id when redirecting back.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";
pub const RETURN_PAGE: &str = "return.html";

/// Scheme and host the browser used to reach us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    pub scheme: String,
    pub host: String,
}

impl RequestOrigin {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
        }
    }

    pub fn return_url(&self) -> String {
        format!(
            "{}://{}/{}?session_id={}",
            self.scheme, self.host, RETURN_PAGE, SESSION_ID_PLACEHOLDER
        )
    }
}

#[derive(Clone)]
pub struct CheckoutGateway {
    config: Arc<GatewayConfig>,
    provider: Arc<dyn CheckoutProvider>,
}

impl CheckoutGateway {
    pub fn new(config: Arc<GatewayConfig>, provider: Arc<dyn CheckoutProvider>) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn public_config(&self) -> Result<PublicConfig, GatewayError> {
        match &self.config.publishable_key {
            Some(key) => Ok(PublicConfig {
                publishable_key: key.clone(),
            }),
            None => {
                let err = GatewayError::from(ConfigError::MissingPublishableKey);
                error!("Config error: {}", err);
                Err(err)
            }
        }
    }

    /// Opens one embedded subscription session for the configured price.
    /// A provider failure is returned as is; the browser decides whether to retry.
    pub async fn create_checkout_session(
        &self,
        origin: &RequestOrigin,
    ) -> Result<CheckoutSessionCreated, GatewayError> {
        let Some(price_id) = self.config.price_id.as_deref() else {
            let err = GatewayError::from(ConfigError::MissingPriceId);
            error!("Config error: {}", err);
            return Err(err);
        };

        let return_url = origin.return_url();
        let created = self
            .bounded(
                self.provider
                    .create_embedded_subscription_session(price_id, &return_url),
            )
            .await
            .map_err(|e| {
                error!("Stripe error: {}", e);
                GatewayError::from(e)
            })?;

        info!("Checkout session {} created for {}", created.id, price_id);
        Ok(CheckoutSessionCreated {
            client_secret: created.client_secret,
        })
    }

    pub async fn session_status(
        &self,
        session_id: Option<&str>,
    ) -> Result<SessionStatusReply, GatewayError> {
        // Blank ids are rejected, anything else goes to the provider untouched.
        let session_id = match session_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                let err = GatewayError::Validation("session_id");
                error!("Session status error: {}", err);
                return Err(err);
            }
        };

        let snapshot = self
            .bounded(self.provider.get_session(session_id))
            .await
            .map_err(|e| {
                error!("Session status error: {}", e);
                GatewayError::from(e)
            })?;

        Ok(SessionStatusReply {
            status: snapshot.status,
            customer_email: snapshot.customer_email,
            subscription: snapshot.subscription,
        })
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        let limit = self.config.provider_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(limit)),
        }
    }
}
