//! Modelo de Subscription
//!
//! Abono recurrente entre dos estaciones durante un periodo de validez.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::utils::validation::validate_date_range;

/// Subscription principal - mapea a la tabla subscriptions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Subscription {
    pub id: i32,
    pub user_id: i32,
    pub subscription_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
    pub station_start: String,
    pub station_end: String,
    pub is_valid: bool,
}

impl Subscription {
    /// Vigente sólo si está marcada como válida y no ha expirado
    pub fn is_currently_valid(&self, today: NaiveDate) -> bool {
        self.is_valid && self.end_date >= today
    }
}

/// Request para crear un abono
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_subscription_dates"))]
pub struct CreateSubscriptionRequest {
    #[serde(default)]
    pub user_id: i32,

    #[validate(length(min = 1, max = 20))]
    pub subscription_type: String,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,

    #[validate(length(min = 2, max = 100))]
    pub station_start: String,

    #[validate(length(min = 2, max = 100))]
    pub station_end: String,
}

fn validate_subscription_dates(request: &CreateSubscriptionRequest) -> Result<(), ValidationError> {
    validate_date_range(request.start_date, request.end_date)?;
    if request.price.is_sign_negative() {
        return Err(ValidationError::new("negative_price"));
    }
    Ok(())
}
