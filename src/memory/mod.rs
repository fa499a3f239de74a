pub mod snapshot;

pub use snapshot::{MemorySnapshot, Position};
