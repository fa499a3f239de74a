pub mod encoder;

pub use encoder::{ActionEncoder, ActionScheme, Gesture, Release};
