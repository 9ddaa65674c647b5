use crate::domain::response::cart::PricedCart;
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynCartService = Arc<dyn CartServiceTrait + Send + Sync>;

#[async_trait]
pub trait CartServiceTrait {
    async fn get_cart(&self, owner_id: i32) -> Result<PricedCart, ServiceError>;
    async fn add_item(
        &self,
        owner_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<PricedCart, ServiceError>;
    async fn update_quantity(
        &self,
        owner_id: i32,
        item_id: i32,
        quantity: i32,
    ) -> Result<PricedCart, ServiceError>;
    async fn remove_item(&self, owner_id: i32, item_id: i32) -> Result<PricedCart, ServiceError>;
    async fn clear_cart(&self, owner_id: i32) -> Result<PricedCart, ServiceError>;
    async fn apply_coupon(&self, owner_id: i32, code: &str) -> Result<PricedCart, ServiceError>;
    async fn remove_coupon(&self, owner_id: i32) -> Result<PricedCart, ServiceError>;
    async fn checkout(&self, owner_id: i32) -> Result<PricedCart, ServiceError>;
}
