use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::errors::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub item_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price_snapshot: Decimal,
}

/// Largest quantity a single line may hold.
pub const MAX_LINE_QUANTITY: i32 = 9_999;

impl CartItem {
    /// `None` when the amount does not fit in a `Decimal`.
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.unit_price_snapshot
            .checked_mul(Decimal::from(self.quantity))
    }

    /// Saturating form of [`checked_line_total`](Self::checked_line_total).
    /// Carts built through the mutations below never saturate.
    pub fn line_total(&self) -> Decimal {
        self.unit_price_snapshot
            .saturating_mul(Decimal::from(self.quantity))
    }
}

/// One owner's cart. `version` is zero until the first save and is the
/// optimistic concurrency token afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub owner_id: i32,
    pub items: Vec<CartItem>,
    pub applied_coupon: Option<String>,
    pub next_item_id: i32,
    pub version: i64,
}

impl Cart {
    pub fn empty(owner_id: i32) -> Self {
        Self {
            owner_id,
            items: Vec::new(),
            applied_coupon: None,
            next_item_id: 1,
            version: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.line_total()))
    }

    /// `None` when some line or the sum of lines overflows.
    pub fn checked_subtotal(&self) -> Option<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |acc, item| {
            acc.checked_add(item.checked_line_total()?)
        })
    }

    pub fn find_item(&self, item_id: i32) -> Option<&CartItem> {
        self.items.iter().find(|item| item.item_id == item_id)
    }

    /// Adds units of a product. An existing line for the same product is
    /// incremented and takes the new price snapshot.
    pub fn add_item(
        &mut self,
        product_id: i32,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<&CartItem, ServiceError> {
        if quantity <= 0 || quantity > MAX_LINE_QUANTITY {
            return Err(ServiceError::InvalidQuantity(quantity.into()));
        }

        let mut next = self.clone();

        let idx = match next.items.iter().position(|i| i.product_id == product_id) {
            Some(idx) => {
                let item = &mut next.items[idx];
                let merged = i64::from(item.quantity) + i64::from(quantity);
                item.quantity = i32::try_from(merged)
                    .ok()
                    .filter(|q| *q <= MAX_LINE_QUANTITY)
                    .ok_or(ServiceError::InvalidQuantity(merged))?;
                item.unit_price_snapshot = unit_price;
                idx
            }
            None => {
                let item_id = next.next_item_id;
                next.next_item_id = next
                    .next_item_id
                    .checked_add(1)
                    .ok_or_else(|| ServiceError::Internal("cart item id space exhausted".into()))?;

                next.items.push(CartItem {
                    item_id,
                    product_id,
                    quantity,
                    unit_price_snapshot: unit_price,
                });
                next.items.len() - 1
            }
        };

        if next.checked_subtotal().is_none() {
            return Err(ServiceError::InvalidQuantity(next.items[idx].quantity.into()));
        }

        *self = next;
        Ok(&self.items[idx])
    }

    /// Sets an absolute quantity. Zero removes the line.
    pub fn set_item_quantity(&mut self, item_id: i32, quantity: i32) -> Result<(), ServiceError> {
        if !(0..=MAX_LINE_QUANTITY).contains(&quantity) {
            return Err(ServiceError::InvalidQuantity(quantity.into()));
        }

        if quantity == 0 {
            return self.remove_item(item_id).map(|_| ());
        }

        let mut next = self.clone();
        let item = next
            .items
            .iter_mut()
            .find(|i| i.item_id == item_id)
            .ok_or(ServiceError::ItemNotFound(item_id))?;
        item.quantity = quantity;

        if next.checked_subtotal().is_none() {
            return Err(ServiceError::InvalidQuantity(quantity.into()));
        }

        *self = next;
        Ok(())
    }

    pub fn remove_item(&mut self, item_id: i32) -> Result<CartItem, ServiceError> {
        let idx = self
            .items
            .iter()
            .position(|i| i.item_id == item_id)
            .ok_or(ServiceError::ItemNotFound(item_id))?;

        let removed = self.items.remove(idx);
        self.drop_coupon_if_empty();

        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.applied_coupon = None;
    }

    /// Coupons only ride on carts that hold items.
    pub fn apply_coupon(&mut self, code: String) -> Result<(), ServiceError> {
        if self.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        self.applied_coupon = Some(code);
        Ok(())
    }

    pub fn remove_coupon(&mut self) {
        self.applied_coupon = None;
    }

    /// Replaces the snapshot of every line holding `product_id`. Returns
    /// false, leaving the cart as it was, when the new price would overflow
    /// the cart total.
    pub fn refresh_price(&mut self, product_id: i32, unit_price: Decimal) -> bool {
        let mut next = self.clone();
        next.items
            .iter_mut()
            .filter(|i| i.product_id == product_id)
            .for_each(|i| i.unit_price_snapshot = unit_price);

        if next.checked_subtotal().is_none() {
            return false;
        }

        *self = next;
        true
    }

    fn drop_coupon_if_empty(&mut self) {
        if self.items.is_empty() {
            self.applied_coupon = None;
        }
    }
}
