pub mod api;
pub mod cart;
pub mod coupon;
