use crate::{
    abstract_trait::{
        cart::{DynCartRepository, DynCartService},
        catalog::DynProductCatalog,
        coupon::{DynCouponRepository, DynCouponService, DynCouponValidator},
    },
    repository::{CartRepository, CouponRepository, ProductCatalogRepository},
    service::{
        CachedProductCatalog, CartService, CartServiceDeps, CouponService, CouponValidator,
    },
};
use prometheus_client::registry::Registry;
use shared::{
    cache::CacheStore,
    config::{ConnectionPool, RedisClient},
};
use std::{fmt, sync::Arc, time::Duration};

#[derive(Clone)]
pub struct DependenciesInject {
    pub cart_service: DynCartService,
    pub coupon_service: DynCouponService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("cart_service", &"CartService")
            .field("coupon_service", &"CouponService")
            .finish()
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub pool: ConnectionPool,
    pub redis: RedisClient,
    pub lock_timeout: Duration,
    pub price_cache_ttl: Duration,
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Self {
        let DependenciesInjectDeps {
            pool,
            redis,
            lock_timeout,
            price_cache_ttl,
        } = deps;

        let cart_repo: DynCartRepository = Arc::new(CartRepository::new(pool.clone()));
        let coupon_repo: DynCouponRepository = Arc::new(CouponRepository::new(pool.clone()));

        let cache = Arc::new(CacheStore::new(redis.pool.clone(), "product_price"));
        let catalog: DynProductCatalog = Arc::new(CachedProductCatalog::new(
            Arc::new(ProductCatalogRepository::new(pool)),
            cache,
            price_cache_ttl,
        ));

        let validator: DynCouponValidator = Arc::new(CouponValidator::new(coupon_repo.clone()));

        let cart_service: DynCartService = Arc::new(CartService::new(
            CartServiceDeps {
                cart_repo,
                coupon_repo: coupon_repo.clone(),
                validator,
                catalog,
                lock_timeout,
            },
            registry,
        ));

        let coupon_service: DynCouponService =
            Arc::new(CouponService::new(coupon_repo, registry));

        Self {
            cart_service,
            coupon_service,
        }
    }
}
