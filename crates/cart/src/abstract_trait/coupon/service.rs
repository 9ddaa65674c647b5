use crate::domain::{
    requests::coupon::CreateCouponRequest,
    response::{api::ApiResponse, coupon::CouponResponse},
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynCouponService = Arc<dyn CouponServiceTrait + Send + Sync>;

#[async_trait]
pub trait CouponServiceTrait {
    async fn create_coupon(
        &self,
        req: &CreateCouponRequest,
    ) -> Result<ApiResponse<CouponResponse>, ServiceError>;
    async fn find_coupon(&self, code: &str) -> Result<ApiResponse<CouponResponse>, ServiceError>;
}
