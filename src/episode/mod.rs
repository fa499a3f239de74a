pub mod controller;
pub mod state;
pub mod step;

pub use controller::EpisodeController;
pub use state::{EpisodeState, Phase};
pub use step::{OBSERVATION_SHAPE, Observation, ObservationShape, ResetInfo, StepInfo, StepResult};
