pub mod cart;
pub mod coupon;
pub mod product;
