use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynProductCatalog = Arc<dyn ProductCatalogTrait + Send + Sync>;

/// Current unit prices of products.
///
/// Implementations return `ProductNotFound` for unknown or deleted products
/// and `CatalogUnavailable` when the lookup itself fails.
#[async_trait]
pub trait ProductCatalogTrait {
    async fn get_price(&self, product_id: i32) -> Result<Decimal, ServiceError>;
}
