pub mod app_config;
pub mod file_store;
pub mod memory;
pub mod records;

pub use file_store::FileStore;
pub use memory::MemoryStore;
pub use records::Storage;
