pub mod service;

pub use crate::domain::model::{
    DeleteOutcome, FieldPatch, MissingPet, NewPet, Pet, PetChanges, PetDraft, PetId, PetPage,
    PetPatch, Species, DEFAULT_LIST_LIMIT, PET_NOT_FOUND_MESSAGE,
};
pub use crate::domain::ports::PetStore;
pub use crate::utils::error::Result;
