use crate::domain::{coupon::Coupon, requests::coupon::CreateCouponRecordRequest};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynCouponRepository = Arc<dyn CouponRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait CouponRepositoryTrait {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError>;
    async fn create_coupon(
        &self,
        req: &CreateCouponRecordRequest,
    ) -> Result<Coupon, RepositoryError>;

    /// Atomically counts one redemption. `None` when the coupon is missing or
    /// already at its limit.
    async fn redeem(&self, code: &str) -> Result<Option<Coupon>, RepositoryError>;

    /// Gives back one redemption, never going below zero.
    async fn release(&self, code: &str) -> Result<(), RepositoryError>;
}
