use crate::{
    config::GatewayConfig,
    provider::{CheckoutProvider, CreatedSession, ProviderError, SessionSnapshot},
    stripe::{CheckoutSession, CreateCheckoutSession, StripeErrorEnvelope},
    USER_AGENT,
};
use async_trait::async_trait;
use log::debug;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::{fmt, time::Duration};

/// Stripe REST client. Holds one pooled connection set for the process.
#[derive(Clone)]
pub struct StripeClient {
    api_key: String,
    api_base: String,
    http: reqwest::Client,
}

impl fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl StripeClient {
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_owned(),
            http,
        })
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, ProviderError> {
        Self::new(
            config.secret_key.clone(),
            config.api_base.clone(),
            config.provider_timeout,
        )
    }

    fn sessions_url(&self) -> Result<Url, ProviderError> {
        let raw = format!("{}/v1/checkout/sessions", self.api_base);
        Url::parse(&raw).map_err(|e| ProviderError::Decode(format!("bad API base {}: {}", raw, e)))
    }

    fn session_url(&self, session_id: &str) -> Result<Url, ProviderError> {
        let mut url = self.sessions_url()?;
        // Pushed as one segment so the id is percent-encoded, never a path.
        url.path_segments_mut()
            .map_err(|_| ProviderError::Decode("API base cannot hold a path".to_owned()))?
            .push(session_id);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()));
        }

        match serde_json::from_str::<StripeErrorEnvelope>(&body) {
            Ok(envelope) => Err(ProviderError::Api {
                status: status.as_u16(),
                message: envelope
                    .error
                    .message
                    .unwrap_or_else(|| format!("Stripe returned HTTP {}", status.as_u16())),
                kind: envelope.error.kind,
                code: envelope.error.code,
            }),
            Err(_) => Err(ProviderError::api(
                status.as_u16(),
                format!("Stripe returned HTTP {}", status.as_u16()),
            )),
        }
    }
}

#[async_trait]
impl CheckoutProvider for StripeClient {
    async fn create_embedded_subscription_session(
        &self,
        price_id: &str,
        return_url: &str,
    ) -> Result<CreatedSession, ProviderError> {
        let params = CreateCheckoutSession::embedded_subscription(price_id, return_url).to_params();
        let response = self
            .http
            .post(self.sessions_url()?)
            .basic_auth(&self.api_key, None::<&str>)
            .form(&params)
            .send()
            .await?;
        let session: CheckoutSession = Self::decode(response).await?;
        debug!("Stripe created checkout session {}", session.id);

        let client_secret = session.client_secret.ok_or_else(|| {
            ProviderError::Decode("checkout session has no client_secret".to_owned())
        })?;
        Ok(CreatedSession {
            id: session.id,
            client_secret,
        })
    }

    async fn get_session(&self, session_id: &str) -> Result<SessionSnapshot, ProviderError> {
        let response = self
            .http
            .get(self.session_url(session_id)?)
            .basic_auth(&self.api_key, None::<&str>)
            .send()
            .await?;
        let session: CheckoutSession = Self::decode(response).await?;
        debug!("Stripe returned checkout session {}", session.id);

        let customer_email = session.collected_email().map(str::to_owned);
        Ok(SessionSnapshot {
            id: session.id,
            status: session.status,
            customer_email,
            subscription: session.subscription.map(|sub| sub.into_id()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> StripeClient {
        StripeClient::new("sk_test_123", base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn session_id_is_a_single_encoded_segment() {
        let url = client("https://api.stripe.com/").session_url("cs_test_1").unwrap();
        assert_eq!(url.as_str(), "https://api.stripe.com/v1/checkout/sessions/cs_test_1");

        let url = client("https://api.stripe.com").session_url("../customers").unwrap();
        assert_eq!(url.as_str(), "https://api.stripe.com/v1/checkout/sessions/..%2Fcustomers");
    }

    #[test]
    fn debug_hides_the_key() {
        assert!(!format!("{:?}", client("https://api.stripe.com")).contains("sk_test_123"));
    }
}
