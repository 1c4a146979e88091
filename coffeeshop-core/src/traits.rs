//! Core trait definitions

use crate::error::CoffeeShopResult;
use crate::types::*;
use async_trait::async_trait;

/// Persistence contract for drinks
///
/// Every mutating call commits before returning. Implementations report a
/// missing row as `CoffeeShopError::NotFound`.
#[async_trait]
pub trait DrinkStore: Send + Sync {
    /// All drinks ordered by id
    async fn list(&self) -> CoffeeShopResult<Vec<Drink>>;

    /// Look up a single drink
    async fn find(&self, id: DrinkId) -> CoffeeShopResult<Option<Drink>>;

    /// Store a new drink and return it with its assigned id
    async fn insert(&self, drink: NewDrink) -> CoffeeShopResult<Drink>;

    /// Overwrite title and ingredients of an existing drink
    async fn update(&self, drink: &Drink) -> CoffeeShopResult<()>;

    /// Remove a drink
    async fn delete(&self, id: DrinkId) -> CoffeeShopResult<()>;

    /// Release backend resources; the store must not be used afterwards
    async fn close(&self) {}
}
