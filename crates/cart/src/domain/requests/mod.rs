pub mod cart;
pub mod coupon;
