use crate::core::{NewPet, Pet, PetChanges, PetId, PetStore};
use crate::utils::error::{PetError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<PetId, Pet>,
    last_id: PetId,
}

/// In-process store keyed by id; ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryPetStore {
    table: Mutex<Table>,
}

impl MemoryPetStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> Result<MutexGuard<'_, Table>> {
        self.table.lock().map_err(|_| PetError::StoreError {
            message: "memory store lock poisoned".to_string(),
        })
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.table()?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl PetStore for MemoryPetStore {
    async fn list(&self, limit: u32) -> Result<Vec<Pet>> {
        let table = self.table()?;
        Ok(table
            .rows
            .values()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn insert(&self, pet: &NewPet) -> Result<Pet> {
        let mut table = self.table()?;
        table.last_id += 1;

        let record = Pet {
            id: table.last_id,
            name: pet.name.clone(),
            age: pet.age,
            species: pet.species,
            created_at: chrono::Utc::now().naive_utc(),
        };
        table.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn ids_existing(&self, ids: &[PetId]) -> Result<BTreeSet<PetId>> {
        let table = self.table()?;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| table.rows.contains_key(id))
            .collect())
    }

    async fn delete_by_ids(&self, ids: &[PetId]) -> Result<u64> {
        let mut table = self.table()?;
        let removed = ids
            .iter()
            .filter(|&&id| table.rows.remove(&id).is_some())
            .count();
        Ok(removed as u64)
    }

    async fn update_by_id(&self, id: PetId, changes: &PetChanges) -> Result<Pet> {
        let mut table = self.table()?;
        let pet = table.rows.get_mut(&id).ok_or(PetError::NotFound { id })?;
        changes.apply_to(pet);
        Ok(pet.clone())
    }

    async fn exists_by_id(&self, id: PetId) -> Result<bool> {
        Ok(self.table()?.rows.contains_key(&id))
    }
}
