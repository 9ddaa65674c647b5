use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    #[validate(range(min = 1))]
    pub product_id: i32,

    #[validate(range(min = 1, max = 9999, message = "Quantity must be between 1 and 9999"))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    /// Zero removes the item.
    #[validate(range(min = 0, max = 9999, message = "Quantity must be between 0 and 9999"))]
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::MAX_LINE_QUANTITY;

    #[test]
    fn quantity_bounds_match_the_cart_limit() {
        let add = |quantity| AddCartItemRequest {
            product_id: 1,
            quantity,
        };
        assert!(add(MAX_LINE_QUANTITY).validate().is_ok());
        assert!(add(MAX_LINE_QUANTITY + 1).validate().is_err());
        assert!(add(0).validate().is_err());

        let update = |quantity| UpdateCartItemRequest { quantity };
        assert!(update(0).validate().is_ok());
        assert!(update(MAX_LINE_QUANTITY).validate().is_ok());
        assert!(update(i32::MAX).validate().is_err());
    }
}
