//! Reveal sequencer: idle -> calculating -> revealed, with a cancellable delay.
//!
//! State is published through a `tokio::sync::watch` channel so a frame loop
//! can poll `snapshot()` and async callers can await `changed()`. The pending
//! reveal is a spawned task owned by the sequencer; disposing (or dropping)
//! the sequencer aborts it, and the reveal write re-checks the disposed flag
//! under the channel lock so nothing lands after `dispose` returns.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chairside_core::{EstimatorInputs, EstimatorOutputs, evaluate};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// How long the "calculating" phase lasts before results are shown
pub const REVEAL_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealPhase {
    #[default]
    Idle,
    Calculating,
    Revealed,
}

/// What observers see. `outputs` is only set while `Revealed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevealSnapshot {
    pub phase: RevealPhase,
    /// Inputs captured by the most recent trigger
    pub inputs: Option<EstimatorInputs>,
    pub outputs: Option<EstimatorOutputs>,
    /// Incremented on every trigger; lets views restart animations
    pub generation: u64,
}

impl RevealSnapshot {
    /// The "calculate" control is disabled while a calculation runs
    pub fn control_enabled(&self) -> bool {
        self.phase != RevealPhase::Calculating
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevealError {
    #[error("a calculation is already in progress")]
    Busy,
    #[error("the estimator has been disposed")]
    Disposed,
}

#[derive(Debug)]
pub struct RevealSequencer {
    state: Arc<watch::Sender<RevealSnapshot>>,
    disposed: Arc<AtomicBool>,
    pending: Option<JoinHandle<()>>,
    delay: Duration,
}

impl Default for RevealSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealSequencer {
    pub fn new() -> Self {
        Self::with_delay(REVEAL_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(RevealSnapshot::default());
        Self {
            state: Arc::new(tx),
            disposed: Arc::new(AtomicBool::new(false)),
            pending: None,
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn subscribe(&self) -> watch::Receiver<RevealSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> RevealSnapshot {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> RevealPhase {
        self.state.borrow().phase
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    pub fn control_enabled(&self) -> bool {
        !self.is_disposed() && self.state.borrow().control_enabled()
    }

    /// Start a calculation against a copy of `inputs`.
    ///
    /// Works from `Idle` and from `Revealed`; a re-trigger always runs the
    /// full calculating phase again and clears the previous outputs.
    /// Must be called from within a tokio runtime.
    pub fn trigger(&mut self, inputs: &EstimatorInputs) -> Result<u64, RevealError> {
        if self.is_disposed() {
            return Err(RevealError::Disposed);
        }
        let phase = self.state.borrow().phase;
        if phase == RevealPhase::Calculating {
            return Err(RevealError::Busy);
        }

        let captured = *inputs;
        let mut generation = 0;
        self.state.send_modify(|s| {
            s.generation += 1;
            s.phase = RevealPhase::Calculating;
            s.inputs = Some(captured);
            s.outputs = None;
            generation = s.generation;
        });
        debug!(generation, ?captured, "calculation started");

        let state = Arc::clone(&self.state);
        let disposed = Arc::clone(&self.disposed);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let outputs = evaluate(&captured);
            let applied = state.send_if_modified(|s| {
                if disposed.load(Ordering::Acquire)
                    || s.generation != generation
                    || s.phase != RevealPhase::Calculating
                {
                    return false;
                }
                s.phase = RevealPhase::Revealed;
                s.outputs = Some(outputs);
                true
            });
            if applied {
                info!(generation, roi = outputs.roi_percentage, "estimate revealed");
            } else {
                debug!(generation, "stale reveal dropped");
            }
        }));

        Ok(generation)
    }

    /// Cancel any pending reveal and refuse further triggers. Idempotent.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        // Flip the flag under the channel lock so an in-flight reveal either
        // completed before this point or observes the flag.
        let disposed = &self.disposed;
        self.state.send_if_modified(|_| {
            disposed.store(true, Ordering::Release);
            false
        });
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        debug!("reveal sequencer disposed");
    }
}

impl Drop for RevealSequencer {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_trigger_enters_calculating_synchronously() {
        let mut seq = RevealSequencer::new();
        assert_eq!(seq.phase(), RevealPhase::Idle);
        assert!(seq.control_enabled());

        let generation = seq.trigger(&EstimatorInputs::default()).unwrap();
        assert_eq!(generation, 1);

        let snap = seq.snapshot();
        assert_eq!(snap.phase, RevealPhase::Calculating);
        assert_eq!(snap.outputs, None);
        assert_eq!(snap.inputs, Some(EstimatorInputs::default()));
        assert!(!seq.control_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_while_calculating() {
        let mut seq = RevealSequencer::new();
        seq.trigger(&EstimatorInputs::default()).unwrap();
        assert_eq!(seq.trigger(&EstimatorInputs::default()), Err(RevealError::Busy));
        assert_eq!(seq.snapshot().generation, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_is_idempotent_and_blocks_triggers() {
        let mut seq = RevealSequencer::new();
        seq.dispose();
        seq.dispose();
        assert!(seq.is_disposed());
        assert!(!seq.control_enabled());
        assert_eq!(seq.trigger(&EstimatorInputs::default()), Err(RevealError::Disposed));
        assert_eq!(seq.phase(), RevealPhase::Idle);
    }
}
