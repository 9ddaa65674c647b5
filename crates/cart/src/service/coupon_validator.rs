use crate::{
    abstract_trait::coupon::{CouponValidatorTrait, DynCouponRepository},
    domain::coupon::{DiscountDescriptor, normalize_code},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::errors::ServiceError;
use tracing::info;

#[derive(Clone)]
pub struct CouponValidator {
    repo: DynCouponRepository,
}

impl CouponValidator {
    pub fn new(repo: DynCouponRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CouponValidatorTrait for CouponValidator {
    async fn validate(
        &self,
        code: &str,
        subtotal: Decimal,
        now: DateTime<Utc>,
    ) -> Result<DiscountDescriptor, ServiceError> {
        let code = normalize_code(code);

        let coupon = self
            .repo
            .find_by_code(&code)
            .await?
            .ok_or_else(|| ServiceError::CouponNotFound(code.clone()))?;

        let descriptor = coupon.check(subtotal, now)?;

        info!("🎟️ Coupon {code} valid for subtotal {subtotal}");

        Ok(descriptor)
    }
}
