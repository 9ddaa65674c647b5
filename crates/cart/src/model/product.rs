use sqlx::FromRow;

/// Price columns of the product service's `products` table. Prices are
/// stored as whole currency units.
#[derive(Debug, FromRow)]
pub struct ProductPrice {
    pub product_id: i32,
    pub price: i64,
}
