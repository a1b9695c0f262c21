use crate::types::{ClientSecret, SessionStatus, SubscriptionRef};
use serde::Deserialize;

/// Parameters for `POST /v1/checkout/sessions`, sent form-encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCheckoutSession {
    pub ui_mode: &'static str,
    pub mode: &'static str,
    pub line_items: Vec<LineItem>,
    pub return_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub price: String,
    pub quantity: u32,
}

impl CreateCheckoutSession {
    pub fn embedded_subscription(price_id: &str, return_url: &str) -> Self {
        CreateCheckoutSession {
            ui_mode: "embedded",
            mode: "subscription",
            line_items: vec![LineItem {
                price: price_id.to_owned(),
                quantity: 1,
            }],
            return_url: return_url.to_owned(),
        }
    }

    /// Stripe wants nested arrays flattened into bracketed keys.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("ui_mode".to_owned(), self.ui_mode.to_owned()),
            ("mode".to_owned(), self.mode.to_owned()),
        ];
        for (i, item) in self.line_items.iter().enumerate() {
            params.push((format!("line_items[{}][price]", i), item.price.clone()));
            params.push((format!("line_items[{}][quantity]", i), item.quantity.to_string()));
        }
        params.push(("return_url".to_owned(), self.return_url.clone()));
        params
    }
}

/// The subset of a Stripe checkout session object this server reads.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub client_secret: Option<ClientSecret>,
    pub status: Option<SessionStatus>,
    pub customer_details: Option<CustomerDetails>,
    pub subscription: Option<SubscriptionRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerDetails {
    pub email: Option<String>,
}

impl CheckoutSession {
    /// Email collected during checkout; not the prefilled `customer_email`.
    pub fn collected_email(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|details| details.email.as_deref())
    }
}
