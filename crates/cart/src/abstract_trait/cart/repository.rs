use crate::domain::cart::Cart;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynCartRepository = Arc<dyn CartRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait CartRepositoryTrait {
    async fn find_by_owner(&self, owner_id: i32) -> Result<Option<Cart>, RepositoryError>;

    /// Writes the cart only if the stored version still equals `cart.version`
    /// and returns it with the bumped version. A lost race is
    /// `RepositoryError::Conflict`.
    async fn save(&self, cart: &Cart) -> Result<Cart, RepositoryError>;
}
