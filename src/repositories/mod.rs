pub mod memory_stop_repository;
pub mod stop_repository;

pub use memory_stop_repository::MemoryStopRepository;
pub use stop_repository::{PgStopRepository, StopStore};
