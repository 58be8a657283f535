//! Input state holder: owns the inputs, the focused control and the sequencer

use std::time::Duration;

use chairside_core::{EstimatorInputs, InputField};
use tokio::sync::watch;

use crate::sequencer::{RevealError, RevealSequencer, RevealSnapshot};

/// One interactive estimator. Dropping it cancels any pending reveal.
#[derive(Debug)]
pub struct EstimatorSession {
    inputs: EstimatorInputs,
    selected: InputField,
    sequencer: RevealSequencer,
}

impl EstimatorSession {
    pub fn new(inputs: EstimatorInputs) -> Self {
        Self::with_sequencer(inputs, RevealSequencer::new())
    }

    pub fn with_delay(inputs: EstimatorInputs, delay: Duration) -> Self {
        Self::with_sequencer(inputs, RevealSequencer::with_delay(delay))
    }

    pub fn with_sequencer(inputs: EstimatorInputs, sequencer: RevealSequencer) -> Self {
        Self {
            inputs,
            selected: InputField::MissedCalls,
            sequencer,
        }
    }

    pub fn inputs(&self) -> &EstimatorInputs {
        &self.inputs
    }

    /// Direct access for free-form edits. Never re-evaluates.
    pub fn inputs_mut(&mut self) -> &mut EstimatorInputs {
        &mut self.inputs
    }

    pub fn selected(&self) -> InputField {
        self.selected
    }

    pub fn select(&mut self, field: InputField) {
        self.selected = field;
    }

    pub fn select_next(&mut self) {
        self.selected = self.selected.next();
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.prev();
    }

    /// Slider-style move of the focused field
    pub fn adjust_selected(&mut self, steps: i32) {
        self.inputs.adjust(self.selected, steps);
    }

    /// Kick off a calculation with the inputs as they are right now
    pub fn calculate(&mut self) -> Result<u64, RevealError> {
        self.sequencer.trigger(&self.inputs)
    }

    pub fn snapshot(&self) -> RevealSnapshot {
        self.sequencer.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<RevealSnapshot> {
        self.sequencer.subscribe()
    }

    pub fn control_enabled(&self) -> bool {
        self.sequencer.control_enabled()
    }

    pub fn dispose(&mut self) {
        self.sequencer.dispose();
    }
}

impl Default for EstimatorSession {
    fn default() -> Self {
        Self::new(EstimatorInputs::default())
    }
}
