mod repository;
mod service;
mod validator;

pub use self::repository::{CouponRepositoryTrait, DynCouponRepository};
pub use self::service::{CouponServiceTrait, DynCouponService};
pub use self::validator::{CouponValidatorTrait, DynCouponValidator};
