pub mod session;
pub mod subscription;

pub use session::{
    CheckoutSessionCreated, ClientSecret, PublicConfig, SessionStatus, SessionStatusReply,
};
pub use subscription::{StripeSubscription, SubscriptionRef};
