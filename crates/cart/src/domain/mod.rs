pub mod cart;
pub mod coupon;
pub mod pricing;
pub mod requests;
pub mod response;
