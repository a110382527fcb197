use std::collections::HashMap;

use serde::Deserialize;
use uuid::Uuid;

use crate::models::Product;

use super::{payment_method::PaymentMethod, receiver};

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem{
    pub product_id: Uuid,
    pub quantity: i32,
    // Unit price the client saw; must still be the catalog price
    pub price: Option<i64>,
    #[serde(default)]
    pub attributes: serde_json::Value,
    pub image: Option<String>
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest{
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub receiver_name: String,
    #[serde(default)]
    pub receiver_phone: String,
    pub receiver_note: Option<String>,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub products: Vec<NewOrderItem>,
    pub total_amount: Option<i64>,
    #[serde(default)]
    pub payment_method: String
}

// Line item priced from the catalog, ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct PricedItem{
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub price: i64,
    pub attributes: serde_json::Value,
    pub image: Option<String>
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum OrderValidationError{
    #[error("{0}")]
    Invalid(String),
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),
    #[error("Not enough stock for product: {0}")]
    NotEnoughStock(String),
    #[error("Total amount does not match product prices")]
    TotalMismatch,
    #[error("Other function are not supported")]
    UnsupportedPaymentMethod
}

impl NewOrderRequest {
    /// Checks the request body on its own: receiver fields, then line items.
    /// Errors are reported in that order and the first one wins.
    pub fn validate_shape(&self) -> Result<(), OrderValidationError>{
        receiver::validate_receiver_name(&self.receiver_name)
            .and_then(|_| receiver::validate_shipping_address(&self.shipping_address))
            .and_then(|_| receiver::validate_receiver_note(self.receiver_note.as_deref()))
            .and_then(|_| receiver::validate_receiver_phone(&self.receiver_phone))
            .map_err(OrderValidationError::Invalid)?;

        if self.products.is_empty() {
            return Err(OrderValidationError::Invalid("Products are required".into()))
        }

        if self.products.iter().any(|item| item.quantity <= 0) {
            return Err(OrderValidationError::Invalid("Quantity must be greater than 0".into()))
        }

        Ok(())
    }

    /// Checks the items against current catalog rows: existence, stock,
    /// declared total and line prices, then payment method.
    pub fn price_items(
        &self,
        catalog: &HashMap<Uuid, Product>
    ) -> Result<(PaymentMethod, Vec<PricedItem>), OrderValidationError>{
        let mut priced = Vec::with_capacity(self.products.len());
        for item in self.products.iter() {
            let product = catalog.get(&item.product_id)
                            .ok_or(OrderValidationError::ProductNotFound(item.product_id))?;

            priced.push(PricedItem{
                product_id: product.product_id,
                name: product.name.clone(),
                quantity: item.quantity,
                price: product.price,
                attributes: match &item.attributes {
                    serde_json::Value::Null => serde_json::json!({}),
                    other => other.clone()
                },
                image: item.image.clone().or_else(|| product.image.clone())
            });
        }

        for (product_id, requested) in requested_quantities(&priced) {
            let product = &catalog[&product_id];
            if requested > i64::from(product.stock) {
                return Err(OrderValidationError::NotEnoughStock(product.name.clone()))
            }
        }

        let stale_price = self.products.iter()
                            .zip(priced.iter())
                            .any(|(item, line)| item.price.is_some_and(|price| price != line.price));
        match (self.total_amount, items_total(&priced)) {
            (Some(declared), Some(computed)) if declared == computed && !stale_price => {},
            _ => return Err(OrderValidationError::TotalMismatch)
        }

        match PaymentMethod::parse(&self.payment_method) {
            Some(PaymentMethod::CashOnDelivery) => Ok((PaymentMethod::CashOnDelivery, priced)),
            _ => Err(OrderValidationError::UnsupportedPaymentMethod)
        }
    }
}

// Same product may appear on several lines with different attributes
pub fn requested_quantities(items: &[PricedItem]) -> HashMap<Uuid, i64>{
    let mut requested: HashMap<Uuid, i64> = HashMap::new();
    for item in items {
        *requested.entry(item.product_id).or_default() += i64::from(item.quantity);
    }
    requested
}

/// Σ price × quantity, `None` on overflow.
pub fn items_total(items: &[PricedItem]) -> Option<i64>{
    items.iter().try_fold(0_i64, |acc, item| {
        item.price
            .checked_mul(i64::from(item.quantity))
            .and_then(|line| acc.checked_add(line))
    })
}
