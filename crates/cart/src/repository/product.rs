use crate::{abstract_trait::catalog::ProductCatalogTrait, model::product::ProductPrice};
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{config::ConnectionPool, errors::ServiceError};
use tracing::error;

/// Reads prices straight from the product service's table.
pub struct ProductCatalogRepository {
    db: ConnectionPool,
}

impl ProductCatalogRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCatalogTrait for ProductCatalogRepository {
    async fn get_price(&self, product_id: i32) -> Result<Decimal, ServiceError> {
        let row = sqlx::query_as::<_, ProductPrice>(
            r#"
            SELECT product_id, price
            FROM products
            WHERE product_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|err| {
            error!("❌ Price lookup failed for product {product_id}: {err:?}");
            ServiceError::CatalogUnavailable(err.to_string())
        })?;

        row.map(|p| Decimal::from(p.price))
            .ok_or(ServiceError::ProductNotFound(product_id))
    }
}
