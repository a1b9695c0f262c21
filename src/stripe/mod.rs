//! Stripe REST wire formats.

pub mod checkout_session;
pub mod response;

pub use checkout_session::{CheckoutSession, CreateCheckoutSession, CustomerDetails, LineItem};
pub use response::{StripeApiError, StripeErrorEnvelope};
