//! Embedded Stripe subscription checkout, served over actix-web.
//!
//! The browser asks `/config` for the publishable key, `POST`s to
//! `/create-checkout-session` for a client secret to mount the embedded
//! checkout widget with, and polls `/session-status` once Stripe redirects
//! back to `return.html`. Session state lives in Stripe; nothing is stored
//! locally.

pub mod client;
pub mod config;
pub mod cors;
pub mod error;
pub mod gateway;
pub mod logger;
pub mod provider;
pub mod server;
pub mod stripe;
pub mod types;

pub use client::StripeClient;
pub use config::GatewayConfig;
pub use error::{ConfigError, GatewayError};
pub use gateway::{CheckoutGateway, RequestOrigin};
pub use provider::{CheckoutProvider, CreatedSession, ProviderError, SessionSnapshot};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const USER_AGENT: &str = env!("CHECKOUT_USER_AGENT");
