pub mod aggregator;
pub mod breakdown;
pub mod checkpoint;
pub mod events;
pub mod journal;

pub use aggregator::RewardAggregator;
pub use breakdown::{RewardBreakdown, RewardCategory, RewardWeights};
pub use checkpoint::{CheckpointLink, CheckpointMap};
pub use events::{EventDetector, Events};
pub use journal::{EpisodeRecord, InMemoryJournal, JsonLinesJournal, RewardJournal};
