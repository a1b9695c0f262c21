use serde::Deserialize;

/// `subscription` on a checkout session is an id unless the caller asked
/// Stripe to expand it, in which case the whole object comes back.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SubscriptionRef {
    Id(String),
    Expanded(StripeSubscription),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StripeSubscription {
    pub id: String,
}

impl SubscriptionRef {
    pub fn id(&self) -> &str {
        match self {
            SubscriptionRef::Id(id) => id,
            SubscriptionRef::Expanded(sub) => &sub.id,
        }
    }

    pub fn into_id(self) -> String {
        match self {
            SubscriptionRef::Id(id) => id,
            SubscriptionRef::Expanded(sub) => sub.id,
        }
    }
}
