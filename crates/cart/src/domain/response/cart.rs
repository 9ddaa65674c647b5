use crate::domain::coupon::{DiscountDescriptor, DiscountType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricedCartItem {
    pub item_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
    /// The unit price could not be refreshed from the catalog.
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppliedCouponView {
    pub code: String,
    pub discount_type: Option<DiscountType>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub discount_value: Option<Decimal>,
    pub active: bool,
    pub reason: Option<String>,
}

impl AppliedCouponView {
    pub fn active(descriptor: &DiscountDescriptor) -> Self {
        Self {
            code: descriptor.code.clone(),
            discount_type: Some(descriptor.discount_type),
            discount_value: Some(descriptor.value),
            active: true,
            reason: None,
        }
    }

    pub fn inactive(code: &str, reason: String) -> Self {
        Self {
            code: code.to_string(),
            discount_type: None,
            discount_value: None,
            active: false,
            reason: Some(reason),
        }
    }
}

/// Derived view of a cart; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricedCart {
    pub owner_id: i32,
    pub items: Vec<PricedCartItem>,
    pub coupon: Option<AppliedCouponView>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub price_stale: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    pub status: String,
    pub message: String,
    pub cart: PricedCart,
}

impl CartResponse {
    pub fn success(message: impl Into<String>, cart: PricedCart) -> Self {
        Self {
            status: "success".into(),
            message: message.into(),
            cart,
        }
    }
}
