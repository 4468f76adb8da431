use crate::core::{
    DeleteOutcome, FieldPatch, MissingPet, NewPet, Pet, PetChanges, PetDraft, PetId, PetPage,
    PetPatch, PetStore, DEFAULT_LIST_LIMIT,
};
use crate::utils::error::{FieldViolation, PetError, Result, ViolationKind};
use crate::utils::validation::{
    validate_age, validate_id, validate_limit, validate_name, validate_species, FieldResult,
};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Orchestrates validation and store calls for every pet operation.
#[derive(Clone)]
pub struct PetService {
    store: Arc<dyn PetStore>,
}

impl PetService {
    pub fn new(store: Arc<dyn PetStore>) -> Self {
        Self { store }
    }

    pub async fn create_pet(&self, draft: PetDraft) -> Result<Pet> {
        let mut violations = Vec::new();
        let name = collect(validate_name(&draft.name), &mut violations);
        let age = collect(validate_age(draft.age), &mut violations);
        let species = collect(validate_species(&draft.species), &mut violations);

        let (Some(name), Some(age), Some(species)) = (name, age, species) else {
            return Err(PetError::validation(violations));
        };

        let pet = self.store.insert(&NewPet { name, age, species }).await?;
        tracing::info!(pet_id = pet.id, species = %pet.species, "Created pet");
        Ok(pet)
    }

    /// `count` is the size of the returned page, not of the table.
    pub async fn list_pets(&self, limit: Option<i64>) -> Result<PetPage> {
        let limit = validate_limit(limit.unwrap_or(DEFAULT_LIST_LIMIT))?;
        let items = self.store.list(limit).await?;
        tracing::debug!(limit, returned = items.len(), "Listed pets");

        Ok(PetPage {
            count: items.len(),
            items,
        })
    }

    pub async fn delete_many_pets(&self, ids: &[i64]) -> Result<DeleteOutcome> {
        let requested = validate_id_set(ids)?;
        let requested_ids: Vec<PetId> = requested.iter().copied().collect();

        let existing = self.store.ids_existing(&requested_ids).await?;
        let errors: Vec<MissingPet> = requested
            .difference(&existing)
            .copied()
            .map(MissingPet::new)
            .collect();

        let existing_ids: Vec<PetId> = existing.iter().copied().collect();
        if !existing_ids.is_empty() {
            let removed = self.store.delete_by_ids(&existing_ids).await?;
            if removed != existing_ids.len() as u64 {
                // 檢查與刪除之間被其他請求刪掉，視為無害
                tracing::debug!(
                    expected = existing_ids.len(),
                    removed,
                    "Some pets vanished before deletion"
                );
            }
        }

        tracing::info!(
            deleted = existing_ids.len(),
            missing = errors.len(),
            "Deleted pets"
        );

        Ok(DeleteOutcome {
            deleted: existing_ids.len(),
            errors,
        })
    }

    pub async fn update_pet(&self, patch: PetPatch) -> Result<Pet> {
        let id = validate_id(patch.id)?;

        if !self.store.exists_by_id(id).await? {
            return Err(PetError::NotFound { id });
        }

        let mut violations = Vec::new();
        let changes = PetChanges {
            name: present(&patch.name, "name", &mut violations, |name| validate_name(name)),
            age: present(&patch.age, "age", &mut violations, |age| validate_age(*age)),
            species: present(&patch.species, "type", &mut violations, |species| {
                validate_species(species)
            }),
        };
        if !violations.is_empty() {
            return Err(PetError::validation(violations));
        }

        let pet = self.store.update_by_id(id, &changes).await?;
        tracing::info!(pet_id = id, empty = changes.is_empty(), "Updated pet");
        Ok(pet)
    }
}

fn collect<T>(result: FieldResult<T>, violations: &mut Vec<FieldViolation>) -> Option<T> {
    result.map_err(|violation| violations.push(violation)).ok()
}

fn present<T, U>(
    field: &FieldPatch<T>,
    name: &str,
    violations: &mut Vec<FieldViolation>,
    validate: impl FnOnce(&T) -> FieldResult<U>,
) -> Option<U> {
    match field {
        FieldPatch::Absent => None,
        FieldPatch::Null => {
            violations.push(FieldViolation::new(
                name,
                ViolationKind::Null,
                format!("{} cannot be null", name),
            ));
            None
        }
        FieldPatch::Set(value) => collect(validate(value), violations),
    }
}

/// 非空、皆為正整數且不重複；重複檢查在查詢 store 之前
fn validate_id_set(ids: &[i64]) -> Result<BTreeSet<PetId>> {
    if ids.is_empty() {
        return Err(FieldViolation::new(
            "ids",
            ViolationKind::Empty,
            "ids must contain at least one item",
        )
        .into());
    }

    let mut violations = Vec::new();
    let mut seen = BTreeSet::new();
    for &id in ids {
        if let Err(mut violation) = validate_id(id) {
            violation.field = "ids".to_string();
            violations.push(violation);
        } else if !seen.insert(id) {
            violations.push(FieldViolation::new(
                "ids",
                ViolationKind::Duplicate,
                format!("ids must be unique, {} appears more than once", id),
            ));
        }
    }

    if violations.is_empty() {
        Ok(seen)
    } else {
        Err(PetError::validation(violations))
    }
}
