use crate::domain::coupon::DiscountDescriptor;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynCouponValidator = Arc<dyn CouponValidatorTrait + Send + Sync>;

#[async_trait]
pub trait CouponValidatorTrait {
    /// Read-only check of a code against a subtotal. Never counts a redemption.
    async fn validate(
        &self,
        code: &str,
        subtotal: Decimal,
        now: DateTime<Utc>,
    ) -> Result<DiscountDescriptor, ServiceError>;
}
