use crate::{abstract_trait::cart::DynCartRepository, domain::cart::Cart};
use rust_decimal::Decimal;
use shared::errors::{RepositoryError, ServiceError};
use tracing::debug;

/// Load-mutate-save over the cart repository. Each call is one attempt; a lost
/// version race comes back as `ConcurrentModification`.
#[derive(Clone)]
pub struct CartStore {
    repo: DynCartRepository,
}

impl CartStore {
    pub fn new(repo: DynCartRepository) -> Self {
        Self { repo }
    }

    /// The owner's cart, or an unsaved empty one.
    pub async fn get(&self, owner_id: i32) -> Result<Cart, ServiceError> {
        let cart = self.repo.find_by_owner(owner_id).await?;
        Ok(cart.unwrap_or_else(|| Cart::empty(owner_id)))
    }

    pub async fn save(&self, cart: &Cart) -> Result<Cart, ServiceError> {
        self.repo.save(cart).await.map_err(|err| match err {
            RepositoryError::Conflict(_) => ServiceError::ConcurrentModification,
            other => ServiceError::Repo(other),
        })
    }

    /// Applies `mutate` to the current cart and persists it. Nothing is
    /// written when the mutation leaves the cart unchanged.
    pub async fn update<F>(&self, owner_id: i32, mutate: F) -> Result<Cart, ServiceError>
    where
        F: FnOnce(&mut Cart) -> Result<(), ServiceError>,
    {
        let before = self.get(owner_id).await?;
        let mut cart = before.clone();

        mutate(&mut cart)?;

        if cart == before {
            debug!("Cart of owner {owner_id} unchanged, skipping save");
            return Ok(cart);
        }

        self.save(&cart).await
    }

    pub async fn add_item(
        &self,
        owner_id: i32,
        product_id: i32,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<Cart, ServiceError> {
        self.update(owner_id, |cart| {
            cart.add_item(product_id, quantity, unit_price).map(|_| ())
        })
        .await
    }

    pub async fn set_item_quantity(
        &self,
        owner_id: i32,
        item_id: i32,
        quantity: i32,
    ) -> Result<Cart, ServiceError> {
        self.update(owner_id, |cart| cart.set_item_quantity(item_id, quantity))
            .await
    }

    pub async fn remove_item(&self, owner_id: i32, item_id: i32) -> Result<Cart, ServiceError> {
        self.update(owner_id, |cart| cart.remove_item(item_id).map(|_| ()))
            .await
    }

    pub async fn clear(&self, owner_id: i32) -> Result<Cart, ServiceError> {
        self.update(owner_id, |cart| {
            cart.clear();
            Ok(())
        })
        .await
    }
}
