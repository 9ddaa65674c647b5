#![allow(dead_code)]

use async_trait::async_trait;
use cart::{
    abstract_trait::{
        cart::CartRepositoryTrait,
        catalog::ProductCatalogTrait,
        coupon::CouponRepositoryTrait,
    },
    domain::{
        cart::Cart,
        coupon::{Coupon, DiscountType},
        requests::coupon::CreateCouponRecordRequest,
    },
    service::{CartService, CartServiceDeps, CouponValidator},
};
use prometheus_client::registry::Registry;
use rust_decimal::Decimal;
use shared::errors::{RepositoryError, ServiceError};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

#[derive(Default)]
pub struct InMemoryCarts {
    carts: Mutex<HashMap<i32, Cart>>,
    conflicts_to_inject: AtomicUsize,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryCarts {
    /// The next `n` saves lose their version race.
    pub fn inject_conflicts(&self, n: usize) {
        self.conflicts_to_inject.store(n, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn stored(&self, owner_id: i32) -> Option<Cart> {
        self.carts.lock().unwrap().get(&owner_id).cloned()
    }
}

#[async_trait]
impl CartRepositoryTrait for InMemoryCarts {
    async fn find_by_owner(&self, owner_id: i32) -> Result<Option<Cart>, RepositoryError> {
        Ok(self.stored(owner_id))
    }

    async fn save(&self, cart: &Cart) -> Result<Cart, RepositoryError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::Custom("storage offline".into()));
        }

        let injected = self
            .conflicts_to_inject
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(RepositoryError::Conflict("injected".into()));
        }

        let mut carts = self.carts.lock().unwrap();
        let current_version = carts.get(&cart.owner_id).map_or(0, |c| c.version);
        if current_version != cart.version {
            return Err(RepositoryError::Conflict("stale version".into()));
        }

        let mut saved = cart.clone();
        saved.version += 1;
        carts.insert(cart.owner_id, saved.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);

        Ok(saved)
    }
}

#[derive(Default)]
pub struct InMemoryCoupons {
    coupons: Mutex<HashMap<String, Coupon>>,
    exhaust_on_redeem: AtomicBool,
}

impl InMemoryCoupons {
    pub fn insert(&self, coupon: Coupon) {
        self.coupons
            .lock()
            .unwrap()
            .insert(coupon.code.clone(), coupon);
    }

    pub fn get(&self, code: &str) -> Option<Coupon> {
        self.coupons.lock().unwrap().get(code).cloned()
    }

    pub fn set_redemption_count(&self, code: &str, count: i32) {
        if let Some(c) = self.coupons.lock().unwrap().get_mut(code) {
            c.redemption_count = count;
        }
    }

    /// Simulates another checkout using up the coupon between validation and
    /// redemption.
    pub fn exhaust_on_redeem(&self, on: bool) {
        self.exhaust_on_redeem.store(on, Ordering::SeqCst);
    }
}

#[async_trait]
impl CouponRepositoryTrait for InMemoryCoupons {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        Ok(self.get(code))
    }

    async fn create_coupon(
        &self,
        req: &CreateCouponRecordRequest,
    ) -> Result<Coupon, RepositoryError> {
        let mut coupons = self.coupons.lock().unwrap();
        if coupons.contains_key(&req.code) {
            return Err(RepositoryError::AlreadyExists(req.code.clone()));
        }

        let coupon = Coupon {
            code: req.code.clone(),
            discount_type: req.discount_type,
            discount_value: req.discount_value,
            minimum_spend: req.minimum_spend,
            expires_at: req.expires_at,
            max_redemptions: req.max_redemptions,
            redemption_count: 0,
        };
        coupons.insert(coupon.code.clone(), coupon.clone());

        Ok(coupon)
    }

    async fn redeem(&self, code: &str) -> Result<Option<Coupon>, RepositoryError> {
        let mut coupons = self.coupons.lock().unwrap();
        let Some(coupon) = coupons.get_mut(code) else {
            return Ok(None);
        };

        if self.exhaust_on_redeem.load(Ordering::SeqCst)
            && let Some(max) = coupon.max_redemptions
        {
            coupon.redemption_count = max;
        }

        if coupon.is_exhausted() {
            return Ok(None);
        }

        coupon.redemption_count += 1;
        Ok(Some(coupon.clone()))
    }

    async fn release(&self, code: &str) -> Result<(), RepositoryError> {
        if let Some(c) = self.coupons.lock().unwrap().get_mut(code) {
            c.redemption_count = (c.redemption_count - 1).max(0);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    prices: Mutex<HashMap<i32, Decimal>>,
    down: AtomicBool,
}

impl FakeCatalog {
    pub fn set_price(&self, product_id: i32, price: Decimal) {
        self.prices.lock().unwrap().insert(product_id, price);
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductCatalogTrait for FakeCatalog {
    async fn get_price(&self, product_id: i32) -> Result<Decimal, ServiceError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(ServiceError::CatalogUnavailable("catalog offline".into()));
        }

        self.prices
            .lock()
            .unwrap()
            .get(&product_id)
            .copied()
            .ok_or(ServiceError::ProductNotFound(product_id))
    }
}

pub struct Harness {
    pub service: Arc<CartService>,
    pub carts: Arc<InMemoryCarts>,
    pub coupons: Arc<InMemoryCoupons>,
    pub catalog: Arc<FakeCatalog>,
}

pub const OWNER: i32 = 42;
pub const SHOE: i32 = 1;
pub const SOCK: i32 = 2;

pub fn harness() -> Harness {
    let carts = Arc::new(InMemoryCarts::default());
    let coupons = Arc::new(InMemoryCoupons::default());
    let catalog = Arc::new(FakeCatalog::default());

    catalog.set_price(SHOE, Decimal::from(100));
    catalog.set_price(SOCK, Decimal::from(5));

    let service = CartService::new(
        CartServiceDeps {
            cart_repo: carts.clone(),
            coupon_repo: coupons.clone(),
            validator: Arc::new(CouponValidator::new(coupons.clone())),
            catalog: catalog.clone(),
            lock_timeout: Duration::from_secs(5),
        },
        &mut Registry::default(),
    );

    Harness {
        service: Arc::new(service),
        carts,
        coupons,
        catalog,
    }
}

pub fn coupon(code: &str, discount_type: DiscountType, value: Decimal) -> Coupon {
    Coupon {
        code: code.to_string(),
        discount_type,
        discount_value: value,
        minimum_spend: None,
        expires_at: None,
        max_redemptions: None,
        redemption_count: 0,
    }
}
