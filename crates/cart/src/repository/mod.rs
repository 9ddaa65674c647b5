mod cart;
mod coupon;
mod product;

pub use self::cart::CartRepository;
pub use self::coupon::CouponRepository;
pub use self::product::ProductCatalogRepository;
