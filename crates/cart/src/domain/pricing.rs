use crate::domain::{
    cart::Cart,
    coupon::{DiscountDescriptor, DiscountType},
    response::cart::{AppliedCouponView, PricedCart, PricedCartItem},
};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashSet;

const MONEY_SCALE: u32 = 2;

/// Discount for a subtotal, rounded half away from zero to cents and
/// clamped so it never exceeds the subtotal or drops below zero.
pub fn discount_amount(subtotal: Decimal, discount: &DiscountDescriptor) -> Decimal {
    let raw = match discount.discount_type {
        DiscountType::Percentage => subtotal.saturating_mul(discount.value / Decimal::ONE_HUNDRED),
        DiscountType::FixedAmount => discount.value,
    };

    raw.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
        .max(Decimal::ZERO)
        .min(subtotal.max(Decimal::ZERO))
}

/// Prices a cart. `stale_products` marks lines whose snapshot could not be
/// refreshed from the catalog.
pub fn price(
    cart: &Cart,
    discount: Option<&DiscountDescriptor>,
    stale_products: &HashSet<i32>,
) -> PricedCart {
    let items: Vec<PricedCartItem> = cart
        .items
        .iter()
        .map(|item| PricedCartItem {
            item_id: item.item_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price_snapshot,
            line_total: item.line_total(),
            stale: stale_products.contains(&item.product_id),
        })
        .collect();

    let subtotal = items
        .iter()
        .fold(Decimal::ZERO, |acc, i| acc.saturating_add(i.line_total));

    let discount_amount = discount
        .map(|d| discount_amount(subtotal, d))
        .unwrap_or(Decimal::ZERO);

    let price_stale = items.iter().any(|i| i.stale);

    PricedCart {
        owner_id: cart.owner_id,
        items,
        coupon: discount.map(AppliedCouponView::active),
        subtotal,
        discount_amount,
        total: (subtotal - discount_amount).max(Decimal::ZERO),
        price_stale,
    }
}
