use crate::abstract_trait::catalog::{DynProductCatalog, ProductCatalogTrait};
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{cache::CacheStore, errors::ServiceError};
use std::{sync::Arc, time::Duration};
use tracing::info;

/// Read-through redis cache in front of another catalog.
pub struct CachedProductCatalog {
    inner: DynProductCatalog,
    cache: Arc<CacheStore>,
    ttl: Duration,
}

impl CachedProductCatalog {
    pub fn new(inner: DynProductCatalog, cache: Arc<CacheStore>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait]
impl ProductCatalogTrait for CachedProductCatalog {
    async fn get_price(&self, product_id: i32) -> Result<Decimal, ServiceError> {
        let key = product_id.to_string();

        if let Some(price) = self.cache.get::<Decimal>(&key).await {
            info!("✅ Found price of product {product_id} in cache");
            return Ok(price);
        }

        let price = self.inner.get_price(product_id).await?;

        self.cache.set(&key, &price, self.ttl).await;

        Ok(price)
    }
}
