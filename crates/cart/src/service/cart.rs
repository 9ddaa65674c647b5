use crate::{
    abstract_trait::{
        cart::{CartServiceTrait, DynCartRepository},
        catalog::DynProductCatalog,
        coupon::{DynCouponRepository, DynCouponValidator},
    },
    domain::{
        cart::Cart,
        pricing,
        response::cart::{AppliedCouponView, PricedCart},
    },
    service::{cart_store::CartStore, locks::OwnerLocks, observe::Observer},
};
use async_trait::async_trait;
use chrono::Utc;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics},
};
use std::{collections::HashSet, future::Future, sync::Arc, time::Duration};
use tracing::{error, info, warn};

pub struct CartServiceDeps {
    pub cart_repo: DynCartRepository,
    pub coupon_repo: DynCouponRepository,
    pub validator: DynCouponValidator,
    pub catalog: DynProductCatalog,
    pub lock_timeout: Duration,
}

/// Cart operations for one owner at a time: lock, mutate, re-price, persist.
#[derive(Clone)]
pub struct CartService {
    store: CartStore,
    coupons: DynCouponRepository,
    validator: DynCouponValidator,
    catalog: DynProductCatalog,
    locks: OwnerLocks,
    observer: Observer,
}

impl CartService {
    pub fn new(deps: CartServiceDeps, registry: &mut Registry) -> Self {
        let CartServiceDeps {
            cart_repo,
            coupon_repo,
            validator,
            catalog,
            lock_timeout,
        } = deps;

        let metrics = Arc::new(Metrics::new());
        metrics.register("cart_service", registry);

        Self {
            store: CartStore::new(cart_repo),
            coupons: coupon_repo,
            validator,
            catalog,
            locks: OwnerLocks::new(lock_timeout),
            observer: Observer::new("cart-service", metrics),
        }
    }

    /// Runs `attempt` and, on a version conflict, once more against fresh state.
    async fn with_retry<T, F, Fut>(&self, owner_id: i32, mut attempt: F) -> Result<T, ServiceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        match attempt().await {
            Err(ServiceError::ConcurrentModification) => {
                warn!("🔁 Cart of owner {owner_id} changed underneath us, retrying once");
                attempt().await
            }
            other => other,
        }
    }

    /// Copy of `cart` with catalog prices, plus the products whose price
    /// could not be refreshed.
    async fn refresh_prices(&self, cart: &Cart) -> (Cart, HashSet<i32>) {
        let mut refreshed = cart.clone();
        let mut stale = HashSet::new();

        let product_ids: HashSet<i32> = cart.items.iter().map(|i| i.product_id).collect();

        for product_id in product_ids {
            match self.catalog.get_price(product_id).await {
                Ok(price) => {
                    if !refreshed.refresh_price(product_id, price) {
                        warn!(
                            "⚠️ Catalog price {price} of product {product_id} overflows the cart total, keeping snapshot"
                        );
                        stale.insert(product_id);
                    }
                }
                Err(e) => {
                    warn!("⚠️ Keeping snapshot price for product {product_id}: {e}");
                    stale.insert(product_id);
                }
            }
        }

        (refreshed, stale)
    }

    /// Prices the cart with live catalog prices and the live state of its
    /// coupon. A coupon that no longer validates is reported but not applied.
    async fn price_cart(&self, cart: &Cart) -> Result<PricedCart, ServiceError> {
        let (refreshed, stale) = self.refresh_prices(cart).await;

        let Some(code) = refreshed.applied_coupon.as_deref() else {
            return Ok(pricing::price(&refreshed, None, &stale));
        };

        match self
            .validator
            .validate(code, refreshed.subtotal(), Utc::now())
            .await
        {
            Ok(descriptor) => Ok(pricing::price(&refreshed, Some(&descriptor), &stale)),
            Err(e) if e.is_coupon_rejection() => {
                info!("🎟️ Coupon {code} inactive for owner {}: {e}", cart.owner_id);
                let mut priced = pricing::price(&refreshed, None, &stale);
                priced.coupon = Some(AppliedCouponView::inactive(code, e.to_string()));
                Ok(priced)
            }
            Err(e) => Err(e),
        }
    }

    async fn try_apply_coupon(&self, owner_id: i32, code: &str) -> Result<Cart, ServiceError> {
        let mut cart = self.store.get(owner_id).await?;

        if cart.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        let (refreshed, _) = self.refresh_prices(&cart).await;

        let descriptor = self
            .validator
            .validate(code, refreshed.subtotal(), Utc::now())
            .await?;

        cart.apply_coupon(descriptor.code)?;
        self.store.save(&cart).await
    }

    /// Fails on prices the catalog cannot confirm and on an applied coupon
    /// that no longer validates.
    async fn try_checkout(&self, owner_id: i32) -> Result<PricedCart, ServiceError> {
        let mut cart = self.store.get(owner_id).await?;

        if cart.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        let (refreshed, stale) = self.refresh_prices(&cart).await;

        if !stale.is_empty() {
            return Err(ServiceError::CatalogUnavailable(format!(
                "could not confirm prices of products {stale:?}"
            )));
        }

        let discount = match refreshed.applied_coupon.as_deref() {
            Some(code) => Some(
                self.validator
                    .validate(code, refreshed.subtotal(), Utc::now())
                    .await?,
            ),
            None => None,
        };

        let priced = pricing::price(&refreshed, discount.as_ref(), &stale);

        if let Some(d) = &discount {
            self.redeem(&d.code).await?;
        }

        cart.clear();

        if let Err(e) = self.store.save(&cart).await {
            if let Some(d) = &discount {
                warn!(
                    "↩️ Checkout of owner {owner_id} failed after redeeming {}, releasing",
                    d.code
                );
                if let Err(release_err) = self.coupons.release(&d.code).await {
                    error!("❌ Failed to release coupon {}: {release_err}", d.code);
                }
            }
            return Err(e);
        }

        info!(
            "🛒 Owner {owner_id} checked out {} items for {}",
            priced.items.len(),
            priced.total
        );

        Ok(priced)
    }

    async fn redeem(&self, code: &str) -> Result<(), ServiceError> {
        if self.coupons.redeem(code).await?.is_some() {
            return Ok(());
        }

        match self.coupons.find_by_code(code).await? {
            Some(_) => Err(ServiceError::CouponExhausted(code.to_string())),
            None => Err(ServiceError::CouponNotFound(code.to_string())),
        }
    }
}

#[async_trait]
impl CartServiceTrait for CartService {
    async fn get_cart(&self, owner_id: i32) -> Result<PricedCart, ServiceError> {
        self.observer
            .observe(
                Method::Get,
                "get_cart",
                vec![KeyValue::new("cart.owner_id", owner_id.to_string())],
                async {
                    let cart = self.store.get(owner_id).await?;
                    self.price_cart(&cart).await
                },
            )
            .await
    }

    async fn add_item(
        &self,
        owner_id: i32,
        product_id: i32,
        quantity: i32,
    ) -> Result<PricedCart, ServiceError> {
        info!("🛒 Adding {quantity} x product {product_id} for owner {owner_id}");

        self.observer
            .observe(
                Method::Post,
                "add_item",
                vec![
                    KeyValue::new("cart.owner_id", owner_id.to_string()),
                    KeyValue::new("cart.product_id", product_id.to_string()),
                ],
                async {
                    if quantity <= 0 {
                        return Err(ServiceError::InvalidQuantity(quantity.into()));
                    }

                    let _guard = self.locks.acquire(owner_id).await?;
                    let unit_price = self.catalog.get_price(product_id).await?;

                    let cart = self
                        .with_retry(owner_id, || {
                            self.store.add_item(owner_id, product_id, quantity, unit_price)
                        })
                        .await?;

                    self.price_cart(&cart).await
                },
            )
            .await
    }

    async fn update_quantity(
        &self,
        owner_id: i32,
        item_id: i32,
        quantity: i32,
    ) -> Result<PricedCart, ServiceError> {
        self.observer
            .observe(
                Method::Put,
                "update_quantity",
                vec![
                    KeyValue::new("cart.owner_id", owner_id.to_string()),
                    KeyValue::new("cart.item_id", item_id.to_string()),
                ],
                async {
                    let _guard = self.locks.acquire(owner_id).await?;

                    let cart = self
                        .with_retry(owner_id, || {
                            self.store.set_item_quantity(owner_id, item_id, quantity)
                        })
                        .await?;

                    self.price_cart(&cart).await
                },
            )
            .await
    }

    async fn remove_item(&self, owner_id: i32, item_id: i32) -> Result<PricedCart, ServiceError> {
        self.observer
            .observe(
                Method::Delete,
                "remove_item",
                vec![
                    KeyValue::new("cart.owner_id", owner_id.to_string()),
                    KeyValue::new("cart.item_id", item_id.to_string()),
                ],
                async {
                    let _guard = self.locks.acquire(owner_id).await?;

                    let cart = self
                        .with_retry(owner_id, || self.store.remove_item(owner_id, item_id))
                        .await?;

                    self.price_cart(&cart).await
                },
            )
            .await
    }

    async fn clear_cart(&self, owner_id: i32) -> Result<PricedCart, ServiceError> {
        self.observer
            .observe(
                Method::Delete,
                "clear_cart",
                vec![KeyValue::new("cart.owner_id", owner_id.to_string())],
                async {
                    let _guard = self.locks.acquire(owner_id).await?;

                    let cart = self
                        .with_retry(owner_id, || self.store.clear(owner_id))
                        .await?;

                    self.price_cart(&cart).await
                },
            )
            .await
    }

    async fn apply_coupon(&self, owner_id: i32, code: &str) -> Result<PricedCart, ServiceError> {
        info!("🎟️ Applying coupon {code} for owner {owner_id}");

        self.observer
            .observe(
                Method::Post,
                "apply_coupon",
                vec![
                    KeyValue::new("cart.owner_id", owner_id.to_string()),
                    KeyValue::new("coupon.code", code.to_string()),
                ],
                async {
                    let _guard = self.locks.acquire(owner_id).await?;

                    let cart = self
                        .with_retry(owner_id, || self.try_apply_coupon(owner_id, code))
                        .await?;

                    self.price_cart(&cart).await
                },
            )
            .await
    }

    async fn remove_coupon(&self, owner_id: i32) -> Result<PricedCart, ServiceError> {
        self.observer
            .observe(
                Method::Post,
                "remove_coupon",
                vec![KeyValue::new("cart.owner_id", owner_id.to_string())],
                async {
                    let _guard = self.locks.acquire(owner_id).await?;

                    let cart = self
                        .with_retry(owner_id, || {
                            self.store.update(owner_id, |cart| {
                                cart.remove_coupon();
                                Ok(())
                            })
                        })
                        .await?;

                    self.price_cart(&cart).await
                },
            )
            .await
    }

    async fn checkout(&self, owner_id: i32) -> Result<PricedCart, ServiceError> {
        self.observer
            .observe(
                Method::Post,
                "checkout",
                vec![KeyValue::new("cart.owner_id", owner_id.to_string())],
                async {
                    let _guard = self.locks.acquire(owner_id).await?;

                    self.with_retry(owner_id, || self.try_checkout(owner_id))
                        .await
                },
            )
            .await
    }
}
