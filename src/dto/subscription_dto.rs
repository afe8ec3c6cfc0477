use chrono::NaiveDate;
use serde::Serialize;

use crate::models::subscription::Subscription;

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub currently_valid: bool,
}

impl SubscriptionResponse {
    pub fn new(subscription: Subscription, today: NaiveDate) -> Self {
        Self {
            currently_valid: subscription.is_currently_valid(today),
            subscription,
        }
    }
}
