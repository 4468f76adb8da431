pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::http::router;
pub use adapters::storage::{MemoryPetStore, PostgresPetStore};
pub use config::{CliConfig, Settings, StoreBackend};
pub use core::service::PetService;
pub use utils::error::{PetError, Result};
