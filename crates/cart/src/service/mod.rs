mod cart;
mod cart_store;
mod catalog;
mod coupon;
mod coupon_validator;
mod locks;
mod observe;

pub use self::cart::{CartService, CartServiceDeps};
pub use self::cart_store::CartStore;
pub use self::catalog::CachedProductCatalog;
pub use self::coupon::CouponService;
pub use self::coupon_validator::CouponValidator;
pub use self::locks::{OwnerGuard, OwnerLocks};
