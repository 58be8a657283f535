//! chairside-estimator: reveal sequencing and session state for the ROI estimator

pub mod sequencer;
pub mod session;

pub use sequencer::{REVEAL_DELAY, RevealError, RevealPhase, RevealSequencer, RevealSnapshot};
pub use session::EstimatorSession;
