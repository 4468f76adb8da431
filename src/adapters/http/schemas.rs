//! Wire payloads. Field names and order follow the public JSON contract,
//! which calls the species `type`.

use crate::core::{DeleteOutcome, FieldPatch, MissingPet, Pet, PetDraft, PetPage, PetPatch, Species};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePetRequest {
    pub name: String,
    pub age: i64,
    #[serde(rename = "type")]
    pub species: String,
}

impl CreatePetRequest {
    pub fn into_draft(self) -> PetDraft {
        PetDraft {
            name: self.name,
            age: self.age,
            species: self.species,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePetRequest {
    pub id: i64,
    #[serde(default)]
    pub name: FieldPatch<String>,
    #[serde(default)]
    pub age: FieldPatch<i64>,
    #[serde(default, rename = "type")]
    pub species: FieldPatch<String>,
}

impl UpdatePetRequest {
    pub fn into_patch(self) -> PetPatch {
        PetPatch {
            id: self.id,
            name: self.name,
            age: self.age,
            species: self.species,
        }
    }
}

/// `{"ids": [...]}`, or a bare `[...]` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DeletePetsRequest {
    Wrapped { ids: Vec<i64> },
    Bare(Vec<i64>),
}

impl DeletePetsRequest {
    pub fn into_ids(self) -> Vec<i64> {
        match self {
            DeletePetsRequest::Wrapped { ids } | DeletePetsRequest::Bare(ids) => ids,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPetsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetResponse {
    pub name: String,
    pub age: i32,
    #[serde(rename = "type")]
    pub species: Species,
    pub id: i64,
    pub created_at: NaiveDateTime,
}

impl From<Pet> for PetResponse {
    fn from(pet: Pet) -> Self {
        Self {
            name: pet.name,
            age: pet.age,
            species: pet.species,
            id: pet.id,
            created_at: pet.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetListResponse {
    pub count: usize,
    pub items: Vec<PetResponse>,
}

impl From<PetPage> for PetListResponse {
    fn from(page: PetPage) -> Self {
        Self {
            count: page.count,
            items: page.items.into_iter().map(PetResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetErrorItem {
    pub id: i64,
    pub error: String,
}

impl From<MissingPet> for PetErrorItem {
    fn from(missing: MissingPet) -> Self {
        Self {
            id: missing.id,
            error: missing.error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePetsResponse {
    pub deleted: usize,
    pub errors: Vec<PetErrorItem>,
}

impl From<DeleteOutcome> for DeletePetsResponse {
    fn from(outcome: DeleteOutcome) -> Self {
        Self {
            deleted: outcome.deleted,
            errors: outcome.errors.into_iter().map(PetErrorItem::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_request_accepts_wrapped_and_bare_bodies() {
        let wrapped: DeletePetsRequest = serde_json::from_str(r#"{"ids": [1, 2]}"#).unwrap();
        let bare: DeletePetsRequest = serde_json::from_str("[3]").unwrap();
        assert_eq!(wrapped.into_ids(), vec![1, 2]);
        assert_eq!(bare.into_ids(), vec![3]);
    }

    #[test]
    fn test_pet_response_field_order() {
        let pet = Pet {
            id: 4,
            name: "Rex".to_string(),
            age: 2,
            species: Species::Dog,
            created_at: NaiveDateTime::default(),
        };
        let json = serde_json::to_string(&PetResponse::from(pet)).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Rex","age":2,"type":"dog","id":4,"created_at":"1970-01-01T00:00:00"}"#
        );
    }

    #[test]
    fn test_update_request_keeps_absent_fields_absent() {
        let request: UpdatePetRequest =
            serde_json::from_str(r#"{"id": 1, "age": 3, "type": null}"#).unwrap();
        let patch = request.into_patch();
        assert!(patch.name.is_absent());
        assert_eq!(patch.age, FieldPatch::Set(3));
        assert_eq!(patch.species, FieldPatch::Null);
    }
}
