pub mod memory;
pub mod postgres;

pub use memory::MemoryPetStore;
pub use postgres::PostgresPetStore;
