use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod{
    #[serde(rename = "COD")]
    CashOnDelivery,
    #[serde(rename = "STRIPE")]
    Stripe
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "COD",
            PaymentMethod::Stripe => "STRIPE"
        }
    }

    pub fn parse(value: &str) -> Option<PaymentMethod> {
        match value.trim().to_uppercase().as_str() {
            "COD" => Some(PaymentMethod::CashOnDelivery),
            "STRIPE" => Some(PaymentMethod::Stripe),
            _ => None
        }
    }
}
