use crate::{
    abstract_trait::coupon::CouponRepositoryTrait,
    domain::{coupon::Coupon, requests::coupon::CreateCouponRecordRequest},
    model::coupon::CouponRecord,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info, warn};

const COUPON_COLUMNS: &str = "coupon_id, code, discount_type, discount_value, minimum_spend, \
     expires_at, max_redemptions, redemption_count, created_at, updated_at";

pub struct CouponRepository {
    db: ConnectionPool,
}

impl CouponRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CouponRepositoryTrait for CouponRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {COUPON_COLUMNS} FROM coupons WHERE code = $1");

        let record = sqlx::query_as::<_, CouponRecord>(&sql)
            .bind(code)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to fetch coupon {code}: {err:?}");
                RepositoryError::from(err)
            })?;

        record.map(Coupon::try_from).transpose()
    }

    async fn create_coupon(
        &self,
        req: &CreateCouponRecordRequest,
    ) -> Result<Coupon, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            INSERT INTO coupons (code, discount_type, discount_value, minimum_spend, expires_at,
                                 max_redemptions, redemption_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 0, current_timestamp, current_timestamp)
            RETURNING {COUPON_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, CouponRecord>(&sql)
            .bind(&req.code)
            .bind(req.discount_type.as_str())
            .bind(req.discount_value)
            .bind(req.minimum_spend)
            .bind(req.expires_at)
            .bind(req.max_redemptions)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to create coupon {}: {err:?}", req.code);
                RepositoryError::from_insert(err, &req.code)
            })?;

        info!("✅ Created coupon {}", record.code);

        Coupon::try_from(record)
    }

    async fn redeem(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            UPDATE coupons
            SET redemption_count = redemption_count + 1,
                updated_at       = current_timestamp
            WHERE code = $1
              AND (max_redemptions IS NULL OR redemption_count < max_redemptions)
            RETURNING {COUPON_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, CouponRecord>(&sql)
            .bind(code)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to redeem coupon {code}: {err:?}");
                RepositoryError::from(err)
            })?;

        match &record {
            Some(r) => info!("🎟️ Redeemed coupon {code} ({} used)", r.redemption_count),
            None => warn!("⚠️ Coupon {code} could not be redeemed"),
        }

        record.map(Coupon::try_from).transpose()
    }

    async fn release(&self, code: &str) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query(
            r#"
            UPDATE coupons
            SET redemption_count = GREATEST(redemption_count - 1, 0),
                updated_at       = current_timestamp
            WHERE code = $1
            "#,
        )
        .bind(code)
        .execute(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to release coupon {code}: {err:?}");
            RepositoryError::from(err)
        })?;

        info!("↩️ Released one redemption of coupon {code}");

        Ok(())
    }
}
