use crate::{abstract_trait::cart::CartRepositoryTrait, domain::cart::Cart, model::cart::CartRecord};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::types::Json;
use tracing::{error, info, warn};

pub struct CartRepository {
    db: ConnectionPool,
}

impl CartRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepositoryTrait for CartRepository {
    async fn find_by_owner(&self, owner_id: i32) -> Result<Option<Cart>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let record = sqlx::query_as::<_, CartRecord>(
            r#"
            SELECT owner_id, items, applied_coupon, next_item_id, version, created_at, updated_at
            FROM carts
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to load cart for owner {owner_id}: {err:?}");
            RepositoryError::from(err)
        })?;

        Ok(record.map(Cart::from))
    }

    async fn save(&self, cart: &Cart) -> Result<Cart, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = if cart.version == 0 {
            r#"
            INSERT INTO carts (owner_id, items, applied_coupon, next_item_id, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 1, current_timestamp, current_timestamp)
            ON CONFLICT (owner_id) DO NOTHING
            RETURNING owner_id, items, applied_coupon, next_item_id, version, created_at, updated_at
            "#
        } else {
            r#"
            UPDATE carts
            SET items          = $2,
                applied_coupon = $3,
                next_item_id   = $4,
                version        = version + 1,
                updated_at     = current_timestamp
            WHERE owner_id = $1 AND version = $5
            RETURNING owner_id, items, applied_coupon, next_item_id, version, created_at, updated_at
            "#
        };

        let mut query = sqlx::query_as::<_, CartRecord>(sql)
            .bind(cart.owner_id)
            .bind(Json(cart.items.clone()))
            .bind(cart.applied_coupon.clone())
            .bind(cart.next_item_id);

        if cart.version != 0 {
            query = query.bind(cart.version);
        }

        let record = query
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to save cart for owner {}: {err:?}", cart.owner_id);
                RepositoryError::from(err)
            })?;

        match record {
            Some(record) => {
                info!(
                    "✅ Saved cart for owner {} at version {}",
                    record.owner_id, record.version
                );
                Ok(Cart::from(record))
            }
            None => {
                warn!(
                    "⚠️ Cart for owner {} changed since version {}",
                    cart.owner_id, cart.version
                );
                Err(RepositoryError::Conflict(format!(
                    "cart {} is no longer at version {}",
                    cart.owner_id, cart.version
                )))
            }
        }
    }
}
