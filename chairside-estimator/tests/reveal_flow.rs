use std::time::Duration;

use chairside_core::{EstimatorInputs, Payback, evaluate};
use chairside_estimator::{EstimatorSession, REVEAL_DELAY, RevealError, RevealPhase, RevealSequencer};
use tokio::time::Instant;

/// Results only appear once the full delay has elapsed.
#[tokio::test(start_paused = true)]
async fn test_reveal_after_fixed_delay() {
    let mut seq = RevealSequencer::new();
    let mut rx = seq.subscribe();
    let start = Instant::now();

    seq.trigger(&EstimatorInputs::new(50, 200.0, 20)).unwrap();
    rx.borrow_and_update();

    tokio::time::sleep(REVEAL_DELAY - Duration::from_millis(1)).await;
    let snap = seq.snapshot();
    assert_eq!(snap.phase, RevealPhase::Calculating);
    assert!(snap.outputs.is_none());

    rx.changed().await.unwrap();
    assert!(start.elapsed() >= REVEAL_DELAY);

    let snap = rx.borrow_and_update().clone();
    assert_eq!(snap.phase, RevealPhase::Revealed);
    let outputs = snap.outputs.expect("outputs after reveal");
    assert_eq!(outputs.roi_percentage, 2433);
    assert_eq!(outputs.payback_months, Payback::Months(0.5));
    assert!(seq.control_enabled());
}

/// Editing inputs during the delay does not change what gets revealed.
#[tokio::test(start_paused = true)]
async fn test_inputs_captured_at_trigger() {
    let mut session = EstimatorSession::default();
    let mut rx = session.subscribe();

    session.calculate().unwrap();
    rx.borrow_and_update();
    session.inputs_mut().missed_calls_per_month = 200;
    session.inputs_mut().average_treatment_value = 999.0;

    rx.changed().await.unwrap();
    let snap = session.snapshot();
    assert_eq!(snap.outputs, Some(evaluate(&EstimatorInputs::default())));
    assert_eq!(snap.inputs, Some(EstimatorInputs::default()));
}

/// Triggering from Revealed restarts the calculating phase against current inputs.
#[tokio::test(start_paused = true)]
async fn test_retrigger_re_evaluates() {
    let mut session = EstimatorSession::default();
    let mut rx = session.subscribe();

    session.calculate().unwrap();
    rx.changed().await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(session.snapshot().phase, RevealPhase::Revealed);

    session.inputs_mut().hours_saved_per_week = 40;
    let generation = session.calculate().unwrap();
    assert_eq!(generation, 2);

    let snap = rx.borrow_and_update().clone();
    assert_eq!(snap.phase, RevealPhase::Calculating);
    assert!(snap.outputs.is_none());
    assert!(!session.control_enabled());

    rx.changed().await.unwrap();
    let outputs = session.snapshot().outputs.unwrap();
    assert_eq!(outputs.annual_staff_savings, 52_000.0);
    assert_eq!(outputs.roi_percentage, 2867);
}

#[tokio::test(start_paused = true)]
async fn test_retrigger_while_calculating_is_rejected() {
    let mut session = EstimatorSession::default();
    session.calculate().unwrap();
    assert_eq!(session.calculate(), Err(RevealError::Busy));

    tokio::time::sleep(REVEAL_DELAY * 2).await;
    assert_eq!(session.snapshot().phase, RevealPhase::Revealed);
    assert_eq!(session.snapshot().generation, 1);
}

/// Disposing mid-calculation means no state change is ever observed afterwards.
#[tokio::test(start_paused = true)]
async fn test_dispose_cancels_pending_reveal() {
    let mut seq = RevealSequencer::new();
    let mut rx = seq.subscribe();

    seq.trigger(&EstimatorInputs::default()).unwrap();
    rx.borrow_and_update();
    seq.dispose();

    tokio::time::sleep(REVEAL_DELAY * 4).await;
    assert!(!rx.has_changed().unwrap());
    assert_eq!(seq.phase(), RevealPhase::Calculating);
    assert!(seq.snapshot().outputs.is_none());
}

/// Tearing down the session closes the channel without a late reveal.
#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending_reveal() {
    let mut session = EstimatorSession::default();
    let mut rx = session.subscribe();

    session.calculate().unwrap();
    rx.borrow_and_update();
    drop(session);

    assert!(rx.changed().await.is_err());
    assert_eq!(rx.borrow().phase, RevealPhase::Calculating);
    assert!(rx.borrow().outputs.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_zero_benefit_reveals_never() {
    let mut seq = RevealSequencer::with_delay(Duration::from_millis(10));
    let mut rx = seq.subscribe();
    seq.trigger(&EstimatorInputs::new(0, 0.0, 0)).unwrap();
    rx.borrow_and_update();

    rx.changed().await.unwrap();
    let outputs = seq.snapshot().outputs.unwrap();
    assert_eq!(outputs.payback_months, Payback::Never);
    assert_eq!(outputs.roi_percentage, 0);
}
