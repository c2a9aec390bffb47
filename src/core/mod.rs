mod fjall_store;
mod store;

pub use fjall_store::FjallStore;
pub use store::{KvStore, MemoryKvStore};
