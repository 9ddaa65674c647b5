use crate::domain::coupon::{Coupon, DiscountType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    pub code: String,
    pub discount_type: DiscountType,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_value: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub minimum_spend: Option<Decimal>,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_redemptions: Option<i32>,
    pub redemption_count: i32,
}

impl From<Coupon> for CouponResponse {
    fn from(value: Coupon) -> Self {
        CouponResponse {
            code: value.code,
            discount_type: value.discount_type,
            discount_value: value.discount_value,
            minimum_spend: value.minimum_spend,
            expires_at: value.expires_at,
            max_redemptions: value.max_redemptions,
            redemption_count: value.redemption_count,
        }
    }
}
