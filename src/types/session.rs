use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state Stripe reports for a checkout session.
///
/// Only observed, never driven from here. Values Stripe may add later are
/// kept verbatim in `Other` so `/session-status` still passes them through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SessionStatus {
    Open,
    Complete,
    Expired,
    Other(String),
}

impl SessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::Open => "open",
            SessionStatus::Complete => "complete",
            SessionStatus::Expired => "expired",
            SessionStatus::Other(s) => s,
        }
    }
}

impl From<String> for SessionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "open" => SessionStatus::Open,
            "complete" => SessionStatus::Complete,
            "expired" => SessionStatus::Expired,
            _ => SessionStatus::Other(value),
        }
    }
}

impl From<SessionStatus> for String {
    fn from(value: SessionStatus) -> Self {
        match value {
            SessionStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bearer credential for exactly one checkout session.
///
/// Handed to the browser once and dropped. `Debug` is redacted so the
/// value cannot leak through logging.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(**redacted**)")
    }
}

/// Body of `GET /config`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicConfig {
    #[serde(rename = "publishableKey")]
    pub publishable_key: String,
}

/// Body of `POST /create-checkout-session`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutSessionCreated {
    #[serde(rename = "clientSecret")]
    pub client_secret: ClientSecret,
}

/// Body of `GET /session-status`. Field names are what the return page reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionStatusReply {
    pub status: Option<SessionStatus>,
    pub customer_email: Option<String>,
    pub subscription: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_passes_through() {
        let status: SessionStatus = serde_json::from_str("\"processing\"").unwrap();
        assert_eq!(status, SessionStatus::Other("processing".into()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"processing\"");
    }

    #[test]
    fn known_status_round_trips_as_lowercase() {
        let status: SessionStatus = serde_json::from_str("\"complete\"").unwrap();
        assert_eq!(status, SessionStatus::Complete);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"complete\"");
    }

    #[test]
    fn client_secret_debug_is_redacted() {
        let created = CheckoutSessionCreated {
            client_secret: ClientSecret::new("cs_test_secret_abc"),
        };
        let debug = format!("{:?}", created);
        assert!(!debug.contains("cs_test_secret_abc"));
        assert_eq!(
            serde_json::to_string(&created).unwrap(),
            r#"{"clientSecret":"cs_test_secret_abc"}"#
        );
    }

    #[test]
    fn missing_optional_fields_serialize_as_null() {
        let reply = SessionStatusReply {
            status: Some(SessionStatus::Open),
            customer_email: None,
            subscription: None,
        };
        assert_eq!(
            serde_json::to_string(&reply).unwrap(),
            r#"{"status":"open","customer_email":null,"subscription":null}"#
        );
    }
}
