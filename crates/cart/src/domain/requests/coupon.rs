use crate::domain::coupon::DiscountType;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCouponRequest {
    #[validate(length(min = 1, max = 64, message = "Coupon code is required"))]
    pub coupon_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_discount"))]
pub struct CreateCouponRequest {
    #[validate(length(min = 3, max = 32, message = "Code must be 3 to 32 characters"))]
    pub code: String,

    pub discount_type: DiscountType,

    pub discount_value: Decimal,

    pub minimum_spend: Option<Decimal>,

    pub expires_at: Option<DateTime<Utc>>,

    #[validate(range(min = 1))]
    pub max_redemptions: Option<i32>,
}

/// Coupon amounts are stored as `NUMERIC(12, 2)`.
const MONEY_SCALE: u32 = 2;
const MAX_MONEY: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

fn fits_money_column(value: Decimal) -> bool {
    value.normalize().scale() <= MONEY_SCALE && value.abs() <= MAX_MONEY
}

fn validate_discount(req: &CreateCouponRequest) -> Result<(), ValidationError> {
    if req.discount_value <= Decimal::ZERO {
        return Err(ValidationError::new("discount_value")
            .with_message("Discount value must be greater than zero".into()));
    }

    if !fits_money_column(req.discount_value) {
        return Err(ValidationError::new("discount_value").with_message(
            "Discount value must have at most 2 decimals and not exceed 9999999999.99".into(),
        ));
    }

    if req.discount_type == DiscountType::Percentage && req.discount_value > Decimal::ONE_HUNDRED
    {
        return Err(ValidationError::new("discount_value")
            .with_message("Percentage discount cannot exceed 100".into()));
    }

    if req.minimum_spend.is_some_and(|m| m < Decimal::ZERO) {
        return Err(ValidationError::new("minimum_spend")
            .with_message("Minimum spend cannot be negative".into()));
    }

    if req.minimum_spend.is_some_and(|m| !fits_money_column(m)) {
        return Err(ValidationError::new("minimum_spend").with_message(
            "Minimum spend must have at most 2 decimals and not exceed 9999999999.99".into(),
        ));
    }

    Ok(())
}

/// Normalized form handed to the coupon repository.
#[derive(Debug, Clone)]
pub struct CreateCouponRecordRequest {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub minimum_spend: Option<Decimal>,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_redemptions: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(discount_type: DiscountType, value: Decimal) -> CreateCouponRequest {
        CreateCouponRequest {
            code: "SAVE10".into(),
            discount_type,
            discount_value: value,
            minimum_spend: None,
            expires_at: None,
            max_redemptions: None,
        }
    }

    #[test]
    fn accepts_reasonable_coupons() {
        assert!(request(DiscountType::Percentage, dec!(10)).validate().is_ok());
        assert!(request(DiscountType::FixedAmount, dec!(250)).validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(request(DiscountType::Percentage, dec!(0)).validate().is_err());
        assert!(request(DiscountType::Percentage, dec!(101)).validate().is_err());
        assert!(request(DiscountType::FixedAmount, dec!(-1)).validate().is_err());

        let mut negative_spend = request(DiscountType::FixedAmount, dec!(5));
        negative_spend.minimum_spend = Some(dec!(-1));
        assert!(negative_spend.validate().is_err());

        let mut zero_max = request(DiscountType::FixedAmount, dec!(5));
        zero_max.max_redemptions = Some(0);
        assert!(zero_max.validate().is_err());

        let mut short_code = request(DiscountType::FixedAmount, dec!(5));
        short_code.code = "AB".into();
        assert!(short_code.validate().is_err());
    }

    #[test]
    fn amounts_must_fit_two_decimal_storage() {
        assert_eq!(MAX_MONEY, dec!(9999999999.99));

        assert!(request(DiscountType::FixedAmount, dec!(10.555)).validate().is_err());
        assert!(request(DiscountType::FixedAmount, dec!(10.550)).validate().is_ok());
        assert!(request(DiscountType::FixedAmount, dec!(9999999999.99)).validate().is_ok());
        assert!(request(DiscountType::FixedAmount, dec!(10000000000)).validate().is_err());
        assert!(request(DiscountType::FixedAmount, dec!(10000000000000)).validate().is_err());

        let mut fine_spend = request(DiscountType::FixedAmount, dec!(5));
        fine_spend.minimum_spend = Some(dec!(0.001));
        assert!(fine_spend.validate().is_err());

        fine_spend.minimum_spend = Some(dec!(20000000000));
        assert!(fine_spend.validate().is_err());
    }

    #[test]
    fn reads_camel_case_bodies() {
        let req: ApplyCouponRequest = serde_json::from_str(r#"{"couponCode":"save10"}"#).unwrap();
        assert_eq!(req.coupon_code, "save10");

        let req: CreateCouponRequest = serde_json::from_str(
            r#"{"code":"FLAT5","discountType":"fixed_amount","discountValue":5,"maxRedemptions":10}"#,
        )
        .unwrap();
        assert_eq!(req.discount_type, DiscountType::FixedAmount);
        assert_eq!(req.discount_value, dec!(5));
        assert_eq!(req.max_redemptions, Some(10));
    }
}
