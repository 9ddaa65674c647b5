mod common;

use cart::{abstract_trait::cart::CartServiceTrait, domain::coupon::DiscountType};
use chrono::{Duration, Utc};
use common::{OWNER, SHOE, SOCK, coupon, harness};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use shared::errors::ServiceError;
use testresult::TestResult;

#[tokio::test]
async fn empty_cart_reads_without_writing() -> TestResult {
    let h = harness();

    let priced = h.service.get_cart(OWNER).await?;

    assert!(priced.items.is_empty());
    assert_eq!(priced.total, Decimal::ZERO);
    assert!(priced.coupon.is_none());
    assert_eq!(h.carts.save_count(), 0);
    Ok(())
}

#[tokio::test]
async fn save10_takes_twenty_off_two_hundred() -> TestResult {
    let h = harness();
    h.coupons
        .insert(coupon("SAVE10", DiscountType::Percentage, dec!(10)));

    let before = h.service.add_item(OWNER, SHOE, 2).await?;
    assert_eq!(before.subtotal, dec!(200));
    assert_eq!(before.total, dec!(200));

    let applied = h.service.apply_coupon(OWNER, "save10").await?;
    assert_eq!(applied.discount_amount, dec!(20));
    assert_eq!(applied.total, dec!(180));
    let view = applied.coupon.as_ref().ok_or("coupon missing")?;
    assert_eq!(view.code, "SAVE10");
    assert!(view.active);

    let removed = h.service.remove_coupon(OWNER).await?;
    assert_eq!(removed, before);
    assert_eq!(removed.total, dec!(200));
    Ok(())
}

#[tokio::test]
async fn minimum_spend_leaves_cart_untouched() -> TestResult {
    let h = harness();
    let mut big = coupon("BIG500", DiscountType::FixedAmount, dec!(50));
    big.minimum_spend = Some(dec!(500));
    h.coupons.insert(big);

    h.service.add_item(OWNER, SHOE, 2).await?;
    let err = h.service.apply_coupon(OWNER, "BIG500").await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::MinimumSpendNotMet { minimum, subtotal, .. }
            if minimum == dec!(500) && subtotal == dec!(200)
    ));

    let priced = h.service.get_cart(OWNER).await?;
    assert_eq!(priced.total, dec!(200));
    assert!(priced.coupon.is_none());
    assert_eq!(h.carts.stored(OWNER).ok_or("no cart")?.applied_coupon, None);
    Ok(())
}

#[tokio::test]
async fn expired_coupon_is_never_recorded() -> TestResult {
    let h = harness();
    let mut old = coupon("OLD", DiscountType::FixedAmount, dec!(5));
    old.expires_at = Some(Utc::now() - Duration::minutes(1));
    h.coupons.insert(old);

    h.service.add_item(OWNER, SHOE, 1).await?;
    let saves = h.carts.save_count();

    let err = h.service.apply_coupon(OWNER, "old").await.unwrap_err();

    assert!(matches!(err, ServiceError::CouponExpired(_)));
    assert_eq!(h.carts.save_count(), saves);
    assert_eq!(h.carts.stored(OWNER).ok_or("no cart")?.applied_coupon, None);
    Ok(())
}

#[tokio::test]
async fn unknown_and_exhausted_coupons_are_rejected() -> TestResult {
    let h = harness();
    let mut once = coupon("ONCE", DiscountType::FixedAmount, dec!(5));
    once.max_redemptions = Some(1);
    once.redemption_count = 1;
    h.coupons.insert(once);

    h.service.add_item(OWNER, SHOE, 1).await?;

    assert!(matches!(
        h.service.apply_coupon(OWNER, "NOPE").await,
        Err(ServiceError::CouponNotFound(_))
    ));
    assert!(matches!(
        h.service.apply_coupon(OWNER, "ONCE").await,
        Err(ServiceError::CouponExhausted(_))
    ));
    Ok(())
}

#[tokio::test]
async fn removing_every_unit_removes_the_item() -> TestResult {
    let h = harness();

    let priced = h.service.add_item(OWNER, SHOE, 3).await?;
    let item_id = priced.items[0].item_id;

    let priced = h.service.update_quantity(OWNER, item_id, 0).await?;
    assert!(priced.items.iter().all(|i| i.item_id != item_id));

    let priced = h.service.add_item(OWNER, SOCK, 2).await?;
    let sock_id = priced.items[0].item_id;
    assert_ne!(sock_id, item_id);

    let priced = h.service.remove_item(OWNER, sock_id).await?;
    assert!(priced.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn repeated_adds_merge_into_one_line() -> TestResult {
    let h = harness();

    h.service.add_item(OWNER, SOCK, 2).await?;
    let priced = h.service.add_item(OWNER, SOCK, 3).await?;

    assert_eq!(priced.items.len(), 1);
    assert_eq!(priced.items[0].quantity, 5);
    assert_eq!(priced.subtotal, dec!(25));
    Ok(())
}

#[tokio::test]
async fn rejects_bad_quantities_and_unknown_items() -> TestResult {
    let h = harness();

    assert!(matches!(
        h.service.add_item(OWNER, SHOE, 0).await,
        Err(ServiceError::InvalidQuantity(0))
    ));

    let priced = h.service.add_item(OWNER, SHOE, 1).await?;
    let item_id = priced.items[0].item_id;

    assert!(matches!(
        h.service.update_quantity(OWNER, item_id, -2).await,
        Err(ServiceError::InvalidQuantity(-2))
    ));
    assert!(matches!(
        h.service.update_quantity(OWNER, 999, 1).await,
        Err(ServiceError::ItemNotFound(999))
    ));
    assert!(matches!(
        h.service.remove_item(OWNER, 999).await,
        Err(ServiceError::ItemNotFound(999))
    ));

    assert_eq!(h.service.get_cart(OWNER).await?.items[0].quantity, 1);
    Ok(())
}

#[tokio::test]
async fn add_needs_a_known_product_and_a_reachable_catalog() -> TestResult {
    let h = harness();

    assert!(matches!(
        h.service.add_item(OWNER, 77, 1).await,
        Err(ServiceError::ProductNotFound(77))
    ));

    h.catalog.set_down(true);
    assert!(matches!(
        h.service.add_item(OWNER, SHOE, 1).await,
        Err(ServiceError::CatalogUnavailable(_))
    ));

    assert_eq!(h.carts.save_count(), 0);
    Ok(())
}

#[tokio::test]
async fn catalog_outage_flags_stale_prices_instead_of_failing() -> TestResult {
    let h = harness();
    h.service.add_item(OWNER, SHOE, 2).await?;

    h.catalog.set_down(true);
    let priced = h.service.get_cart(OWNER).await?;

    assert!(priced.price_stale);
    assert!(priced.items.iter().all(|i| i.stale));
    assert_eq!(priced.subtotal, dec!(200));
    Ok(())
}

#[tokio::test]
async fn reads_pick_up_catalog_price_changes() -> TestResult {
    let h = harness();
    h.service.add_item(OWNER, SHOE, 2).await?;

    h.catalog.set_price(SHOE, dec!(90));
    let priced = h.service.get_cart(OWNER).await?;

    assert_eq!(priced.items[0].unit_price, dec!(90));
    assert_eq!(priced.subtotal, dec!(180));
    assert!(!priced.price_stale);
    Ok(())
}

#[tokio::test]
async fn coupon_deactivates_and_reactivates_with_the_subtotal() -> TestResult {
    let h = harness();
    let mut c = coupon("SPEND150", DiscountType::FixedAmount, dec!(30));
    c.minimum_spend = Some(dec!(150));
    h.coupons.insert(c);

    let priced = h.service.add_item(OWNER, SHOE, 2).await?;
    let item_id = priced.items[0].item_id;
    h.service.apply_coupon(OWNER, "SPEND150").await?;

    let priced = h.service.update_quantity(OWNER, item_id, 1).await?;
    let view = priced.coupon.as_ref().ok_or("coupon missing")?;
    assert!(!view.active);
    assert!(view.reason.is_some());
    assert_eq!(priced.discount_amount, Decimal::ZERO);
    assert_eq!(priced.total, dec!(100));

    let priced = h.service.update_quantity(OWNER, item_id, 2).await?;
    assert!(priced.coupon.as_ref().is_some_and(|c| c.active));
    assert_eq!(priced.total, dec!(170));
    Ok(())
}

#[tokio::test]
async fn emptying_the_cart_drops_the_coupon() -> TestResult {
    let h = harness();
    h.coupons
        .insert(coupon("SAVE10", DiscountType::Percentage, dec!(10)));

    let priced = h.service.add_item(OWNER, SHOE, 1).await?;
    h.service.apply_coupon(OWNER, "SAVE10").await?;

    let priced = h
        .service
        .remove_item(OWNER, priced.items[0].item_id)
        .await?;
    assert!(priced.coupon.is_none());

    let priced = h.service.add_item(OWNER, SHOE, 1).await?;
    assert!(priced.coupon.is_none());
    assert_eq!(priced.total, dec!(100));
    Ok(())
}

#[tokio::test]
async fn clear_empties_items_and_coupon() -> TestResult {
    let h = harness();
    h.coupons
        .insert(coupon("SAVE10", DiscountType::Percentage, dec!(10)));

    h.service.add_item(OWNER, SHOE, 1).await?;
    h.service.add_item(OWNER, SOCK, 4).await?;
    h.service.apply_coupon(OWNER, "SAVE10").await?;

    let priced = h.service.clear_cart(OWNER).await?;

    assert!(priced.items.is_empty());
    assert!(priced.coupon.is_none());
    assert_eq!(priced.total, Decimal::ZERO);
    Ok(())
}

#[tokio::test]
async fn remove_coupon_is_idempotent() -> TestResult {
    let h = harness();

    let priced = h.service.remove_coupon(OWNER).await?;
    assert!(priced.coupon.is_none());

    h.service.add_item(OWNER, SHOE, 1).await?;
    let saves = h.carts.save_count();

    h.service.remove_coupon(OWNER).await?;
    h.service.remove_coupon(OWNER).await?;

    assert_eq!(h.carts.save_count(), saves);
    Ok(())
}

#[tokio::test]
async fn a_single_version_conflict_is_retried() -> TestResult {
    let h = harness();
    h.service.add_item(OWNER, SHOE, 1).await?;

    h.carts.inject_conflicts(1);
    let priced = h.service.add_item(OWNER, SHOE, 1).await?;

    assert_eq!(priced.items[0].quantity, 2);
    Ok(())
}

#[tokio::test]
async fn two_consecutive_conflicts_surface() -> TestResult {
    let h = harness();
    h.service.add_item(OWNER, SHOE, 1).await?;

    h.carts.inject_conflicts(2);
    let result = h.service.add_item(OWNER, SHOE, 1).await;

    assert!(matches!(result, Err(ServiceError::ConcurrentModification)));
    assert_eq!(h.service.get_cart(OWNER).await?.items[0].quantity, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_are_all_counted() -> TestResult {
    let h = harness();
    let n = 25;

    let tasks: Vec<_> = (0..n)
        .map(|_| {
            let service = h.service.clone();
            tokio::spawn(async move { service.add_item(OWNER, SOCK, 1).await })
        })
        .collect();

    for task in tasks {
        task.await??;
    }

    let priced = h.service.get_cart(OWNER).await?;
    assert_eq!(priced.items.len(), 1);
    assert_eq!(priced.items[0].quantity, n);
    Ok(())
}

#[tokio::test]
async fn owners_do_not_share_carts() -> TestResult {
    let h = harness();

    h.service.add_item(1, SHOE, 1).await?;
    h.service.add_item(2, SOCK, 3).await?;

    let first = h.service.get_cart(1).await?;
    let second = h.service.get_cart(2).await?;

    assert_eq!(first.owner_id, 1);
    assert_eq!(first.items[0].product_id, SHOE);
    assert_eq!(second.items[0].product_id, SOCK);
    assert_eq!(second.total, dec!(15));
    Ok(())
}

#[tokio::test]
async fn large_fixed_discount_floors_total_at_zero() -> TestResult {
    let h = harness();
    h.coupons
        .insert(coupon("HUGE", DiscountType::FixedAmount, dec!(1000)));

    h.service.add_item(OWNER, SOCK, 1).await?;
    let priced = h.service.apply_coupon(OWNER, "HUGE").await?;

    assert_eq!(priced.discount_amount, dec!(5));
    assert_eq!(priced.total, Decimal::ZERO);
    Ok(())
}

#[tokio::test]
async fn coupon_cannot_be_applied_to_an_empty_cart() -> TestResult {
    let h = harness();
    h.coupons
        .insert(coupon("SAVE10", DiscountType::Percentage, dec!(10)));

    assert!(matches!(
        h.service.apply_coupon(OWNER, "save10").await,
        Err(ServiceError::EmptyCart)
    ));
    assert!(h.carts.stored(OWNER).is_none());
    assert_eq!(h.carts.save_count(), 0);

    let priced = h.service.add_item(OWNER, SHOE, 1).await?;
    h.service
        .remove_item(OWNER, priced.items[0].item_id)
        .await?;

    assert!(matches!(
        h.service.apply_coupon(OWNER, "SAVE10").await,
        Err(ServiceError::EmptyCart)
    ));
    let stored = h.carts.stored(OWNER).ok_or("no cart")?;
    assert!(stored.is_empty());
    assert!(stored.applied_coupon.is_none());
    Ok(())
}

#[tokio::test]
async fn amounts_too_large_to_total_are_refused_and_reads_stay_safe() -> TestResult {
    let h = harness();
    h.coupons
        .insert(coupon("SAVE10", DiscountType::Percentage, dec!(10)));
    h.catalog.set_price(10, Decimal::MAX);
    h.catalog.set_price(11, Decimal::MAX);

    assert!(matches!(
        h.service.add_item(OWNER, SHOE, i32::MAX).await,
        Err(ServiceError::InvalidQuantity(_))
    ));

    h.service.add_item(OWNER, 10, 1).await?;
    assert!(matches!(
        h.service.add_item(OWNER, 11, 1).await,
        Err(ServiceError::InvalidQuantity(1))
    ));

    let priced = h.service.apply_coupon(OWNER, "SAVE10").await?;
    assert_eq!(priced.items.len(), 1);
    assert_eq!(priced.subtotal, Decimal::MAX);
    assert!(priced.total >= Decimal::ZERO);

    let priced = h.service.get_cart(OWNER).await?;
    assert!(priced.coupon.as_ref().is_some_and(|c| c.active));
    Ok(())
}

#[tokio::test]
async fn price_refresh_that_would_overflow_keeps_the_snapshot() -> TestResult {
    let h = harness();
    h.catalog.set_price(10, dec!(10));
    h.catalog.set_price(11, dec!(1));

    h.service.add_item(OWNER, 10, 1).await?;
    h.service.add_item(OWNER, 11, 1).await?;

    h.catalog.set_price(11, Decimal::MAX);
    let priced = h.service.get_cart(OWNER).await?;

    assert!(priced.price_stale);
    let refused = priced
        .items
        .iter()
        .find(|i| i.product_id == 11)
        .ok_or("line missing")?;
    assert!(refused.stale);
    assert_eq!(refused.unit_price, dec!(1));
    assert_eq!(priced.subtotal, dec!(11));
    Ok(())
}
