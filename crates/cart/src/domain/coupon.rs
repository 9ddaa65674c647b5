use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::errors::ServiceError;
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    FixedAmount,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::FixedAmount => "fixed_amount",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed_amount" => Ok(DiscountType::FixedAmount),
            other => Err(format!("unknown discount type '{other}'")),
        }
    }
}

/// What a validated coupon contributes to pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountDescriptor {
    pub code: String,
    pub discount_type: DiscountType,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub minimum_spend: Option<Decimal>,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_redemptions: Option<i32>,
    pub redemption_count: i32,
}

/// Codes are matched case-insensitively, ignoring surrounding whitespace.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

impl Coupon {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_redemptions
            .is_some_and(|max| self.redemption_count >= max)
    }

    pub fn descriptor(&self) -> DiscountDescriptor {
        DiscountDescriptor {
            code: self.code.clone(),
            discount_type: self.discount_type,
            value: self.discount_value,
        }
    }

    /// Applies the usage rules in order: expiry, redemption limit, minimum spend.
    pub fn check(
        &self,
        subtotal: Decimal,
        now: DateTime<Utc>,
    ) -> Result<DiscountDescriptor, ServiceError> {
        if self.is_expired(now) {
            return Err(ServiceError::CouponExpired(self.code.clone()));
        }

        if self.is_exhausted() {
            return Err(ServiceError::CouponExhausted(self.code.clone()));
        }

        if let Some(minimum) = self.minimum_spend
            && subtotal < minimum
        {
            return Err(ServiceError::MinimumSpendNotMet {
                code: self.code.clone(),
                minimum,
                subtotal,
            });
        }

        Ok(self.descriptor())
    }
}
