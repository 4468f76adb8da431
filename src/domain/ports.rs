use crate::domain::model::{NewPet, Pet, PetChanges, PetId};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Persistence port over the single pet table.
///
/// Each call is atomic on its own; callers must not assume atomicity across
/// calls (an id seen by `exists_by_id` may be gone by `update_by_id`).
#[async_trait]
pub trait PetStore: Send + Sync {
    /// Up to `limit` pets in ascending id order.
    async fn list(&self, limit: u32) -> Result<Vec<Pet>>;

    async fn insert(&self, pet: &NewPet) -> Result<Pet>;

    /// The subset of `ids` currently present.
    async fn ids_existing(&self, ids: &[PetId]) -> Result<BTreeSet<PetId>>;

    /// Removes matching rows and returns how many were removed. Absent ids are ignored.
    async fn delete_by_ids(&self, ids: &[PetId]) -> Result<u64>;

    /// Applies `changes` and returns the refreshed row, or `PetError::NotFound`.
    async fn update_by_id(&self, id: PetId, changes: &PetChanges) -> Result<Pet>;

    async fn exists_by_id(&self, id: PetId) -> Result<bool>;

    async fn close(&self) {}
}
