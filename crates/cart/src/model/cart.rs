use crate::domain::cart::{Cart, CartItem};
use chrono::NaiveDateTime;
use sqlx::{FromRow, types::Json};

#[derive(Debug, FromRow)]
pub struct CartRecord {
    pub owner_id: i32,
    pub items: Json<Vec<CartItem>>,
    pub applied_coupon: Option<String>,
    pub next_item_id: i32,
    pub version: i64,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<CartRecord> for Cart {
    fn from(value: CartRecord) -> Self {
        Cart {
            owner_id: value.owner_id,
            items: value.items.0,
            applied_coupon: value.applied_coupon,
            next_item_id: value.next_item_id,
            version: value.version,
        }
    }
}
