use crate::errors::repository::RepositoryError;
use jsonwebtoken::errors::Error as JwtError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("JWT error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid Token")]
    InvalidTokenType,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Cart item {0} not found")]
    ItemNotFound(i32),

    #[error("Product {0} not found")]
    ProductNotFound(i32),

    #[error("Coupon {0} not found")]
    CouponNotFound(String),

    #[error("Coupon {0} has expired")]
    CouponExpired(String),

    #[error("Coupon {0} has reached its redemption limit")]
    CouponExhausted(String),

    #[error("Coupon {code} requires a minimum spend of {minimum}, cart subtotal is {subtotal}")]
    MinimumSpendNotMet {
        code: String,
        minimum: Decimal,
        subtotal: Decimal,
    },

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Cart was modified concurrently, please retry")]
    ConcurrentModification,

    #[error("Product catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable machine-readable code sent to clients alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Repo(RepositoryError::NotFound) => "NOT_FOUND",
            ServiceError::Repo(RepositoryError::AlreadyExists(_)) => "ALREADY_EXISTS",
            ServiceError::Repo(RepositoryError::Conflict(_)) => "CONFLICT",
            ServiceError::Repo(_) => "REPOSITORY_ERROR",
            ServiceError::Validation(_) => "VALIDATION_FAILED",
            ServiceError::Jwt(_) | ServiceError::InvalidTokenType => "INVALID_TOKEN",
            ServiceError::TokenExpired => "TOKEN_EXPIRED",
            ServiceError::InvalidQuantity(_) => "INVALID_QUANTITY",
            ServiceError::ItemNotFound(_) => "ITEM_NOT_FOUND",
            ServiceError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            ServiceError::CouponNotFound(_) => "COUPON_NOT_FOUND",
            ServiceError::CouponExpired(_) => "COUPON_EXPIRED",
            ServiceError::CouponExhausted(_) => "COUPON_EXHAUSTED",
            ServiceError::MinimumSpendNotMet { .. } => "MINIMUM_SPEND_NOT_MET",
            ServiceError::EmptyCart => "EMPTY_CART",
            ServiceError::ConcurrentModification => "CONCURRENT_MODIFICATION",
            ServiceError::CatalogUnavailable(_) => "CATALOG_UNAVAILABLE",
            ServiceError::Internal(_) => "INTERNAL",
        }
    }

    /// Coupon validation failures, as opposed to infrastructure errors.
    pub fn is_coupon_rejection(&self) -> bool {
        matches!(
            self,
            ServiceError::CouponNotFound(_)
                | ServiceError::CouponExpired(_)
                | ServiceError::CouponExhausted(_)
                | ServiceError::MinimumSpendNotMet { .. }
        )
    }
}
