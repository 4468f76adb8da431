use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub type PetId = i64;

pub const DEFAULT_LIST_LIMIT: i64 = 20;
pub const PET_NOT_FOUND_MESSAGE: &str = "Pet with the matching ID was not found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::Dog, Species::Cat];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|species| species.as_str() == s)
            .ok_or_else(|| format!("unknown species '{}'", s))
    }
}

/// 已持久化的寵物紀錄 (id 與 created_at 由 store 指派)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub age: i32,
    pub species: Species,
    pub created_at: NaiveDateTime,
}

/// Unvalidated input for a new pet, as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetDraft {
    pub name: String,
    pub age: i64,
    pub species: String,
}

/// A validated pet ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    pub name: String,
    pub age: i32,
    pub species: Species,
}

/// Presence of a single field in a partial update.
///
/// `Absent` means "leave unchanged"; `Null` is an explicit JSON `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldPatch<T> {
    #[default]
    Absent,
    Null,
    Set(T),
}

impl<T> FieldPatch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldPatch::Absent)
    }
}

impl<T> From<Option<T>> for FieldPatch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldPatch::Null, FieldPatch::Set)
    }
}

// 搭配 #[serde(default)]：欄位缺席時不會呼叫此函式
impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldPatch<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(FieldPatch::from)
    }
}

/// Unvalidated partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetPatch {
    pub id: i64,
    pub name: FieldPatch<String>,
    pub age: FieldPatch<i64>,
    pub species: FieldPatch<String>,
}

impl PetPatch {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            name: FieldPatch::Absent,
            age: FieldPatch::Absent,
            species: FieldPatch::Absent,
        }
    }
}

/// Validated field-level diff applied by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetChanges {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub species: Option<Species>,
}

impl PetChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.species.is_none()
    }

    pub fn apply_to(&self, pet: &mut Pet) {
        if let Some(name) = &self.name {
            pet.name = name.clone();
        }
        if let Some(age) = self.age {
            pet.age = age;
        }
        if let Some(species) = self.species {
            pet.species = species;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetPage {
    pub count: usize,
    pub items: Vec<Pet>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPet {
    pub id: PetId,
    pub error: String,
}

impl MissingPet {
    pub fn new(id: PetId) -> Self {
        Self {
            id,
            error: PET_NOT_FOUND_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted: usize,
    pub errors: Vec<MissingPet>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default)]
        name: FieldPatch<String>,
    }

    #[test]
    fn test_field_patch_distinguishes_absent_null_and_value() {
        let absent: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.name, FieldPatch::Absent);

        let null: Probe = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(null.name, FieldPatch::Null);

        let set: Probe = serde_json::from_str(r#"{"name": "Rex"}"#).unwrap();
        assert_eq!(set.name, FieldPatch::Set("Rex".to_string()));
    }

    #[test]
    fn test_species_parsing_is_case_sensitive() {
        assert_eq!("dog".parse::<Species>().unwrap(), Species::Dog);
        assert_eq!("cat".parse::<Species>().unwrap(), Species::Cat);
        assert!("Dog".parse::<Species>().is_err());
        assert!("bird".parse::<Species>().is_err());
    }

    #[test]
    fn test_changes_apply_only_present_fields() {
        let mut pet = Pet {
            id: 1,
            name: "Rex".to_string(),
            age: 2,
            species: Species::Dog,
            created_at: NaiveDateTime::default(),
        };
        let changes = PetChanges {
            age: Some(3),
            ..PetChanges::default()
        };
        changes.apply_to(&mut pet);

        assert_eq!(pet.age, 3);
        assert_eq!(pet.name, "Rex");
        assert_eq!(pet.species, Species::Dog);
        assert!(PetChanges::default().is_empty());
        assert!(!changes.is_empty());
    }
}
