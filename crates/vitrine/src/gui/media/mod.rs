pub mod element;
pub mod model;

pub use element::{AutoplayPolicy, MediaElement, PlaybackError, SimulatedMedia};
pub use model::{MediaController, MediaEvent, Phase, PlaybackState, PlayerOptions, Presentation};

pub const DEFAULT_VOLUME: f64 = 0.5;
pub const VISIBILITY_THRESHOLD: f64 = 0.5;
/// Cadence of native `timeupdate` events while playing.
pub const TIME_UPDATE_INTERVAL: std::time::Duration = std::time::Duration::from_millis(250);
