//! Modelo de Payment
//!
//! Pago de un abono. El número de tarjeta completo y el CVV nunca se
//! persisten: sólo se guardan los cuatro últimos dígitos y la expiración.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Payment principal - mapea a la tabla payments
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Payment {
    pub id: i32,
    pub subscription_id: i32,
    pub payer_name: String,
    pub payer_email: String,
    pub payer_phone: Option<String>,
    pub card_last_four: String,
    pub card_expiry: String,
    pub amount: Decimal,
    pub paid_at: DateTime<Utc>,
}

/// Request de pago tal y como llega del cliente
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentRequest {
    #[validate(length(min = 2, max = 100))]
    pub payer_name: String,

    #[validate(email)]
    pub payer_email: String,

    #[validate(custom = "crate::utils::validation::validate_phone")]
    pub payer_phone: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_card_number")]
    pub card_number: String,

    #[validate(custom = "crate::utils::validation::validate_card_expiry")]
    pub card_expiry: String,

    #[validate(length(min = 3, max = 4))]
    pub cvv: String,
}

/// Datos de pago ya enmascarados, listos para persistir
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub subscription_id: i32,
    pub payer_name: String,
    pub payer_email: String,
    pub payer_phone: Option<String>,
    pub card_last_four: String,
    pub card_expiry: String,
    pub amount: Decimal,
}

impl PaymentRequest {
    /// Enmascarar la tarjeta y descartar el CVV
    pub fn into_masked(self, subscription_id: i32, amount: Decimal) -> NewPayment {
        let digits: String = self.card_number.chars().filter(|c| c.is_ascii_digit()).collect();
        let card_last_four = digits[digits.len().saturating_sub(4)..].to_string();
        NewPayment {
            subscription_id,
            payer_name: self.payer_name,
            payer_email: self.payer_email,
            payer_phone: self.payer_phone,
            card_last_four,
            card_expiry: self.card_expiry,
            amount,
        }
    }
}
