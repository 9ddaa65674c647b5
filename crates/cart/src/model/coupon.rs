use crate::domain::coupon::{Coupon, DiscountType};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use shared::errors::RepositoryError;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct CouponRecord {
    pub coupon_id: i32,
    pub code: String,
    pub discount_type: String,
    pub discount_value: Decimal,
    pub minimum_spend: Option<Decimal>,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_redemptions: Option<i32>,
    pub redemption_count: i32,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl TryFrom<CouponRecord> for Coupon {
    type Error = RepositoryError;

    fn try_from(value: CouponRecord) -> Result<Self, Self::Error> {
        let discount_type = value
            .discount_type
            .parse::<DiscountType>()
            .map_err(RepositoryError::Custom)?;

        Ok(Coupon {
            code: value.code,
            discount_type,
            discount_value: value.discount_value,
            minimum_spend: value.minimum_spend,
            expires_at: value.expires_at,
            max_redemptions: value.max_redemptions,
            redemption_count: value.redemption_count,
        })
    }
}
