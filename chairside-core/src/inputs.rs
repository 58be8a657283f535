//! Estimator input parameters and the slider bounds the UI enforces

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three user-adjustable parameters of an ROI estimate.
///
/// Fields are plain data: setting them never triggers an evaluation and
/// never clamps. Slider-style movement goes through [`EstimatorInputs::adjust`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EstimatorInputs {
    /// Calls missed after hours or while busy
    pub missed_calls_per_month: u32,
    /// Typical patient spend per visit, in currency units
    pub average_treatment_value: f64,
    /// Staff time freed for patient care
    pub hours_saved_per_week: u32,
}

impl Default for EstimatorInputs {
    fn default() -> Self {
        Self {
            missed_calls_per_month: 50,
            average_treatment_value: 200.0,
            hours_saved_per_week: 20,
        }
    }
}

/// Which input a control is bound to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum InputField {
    #[serde(rename = "missed-calls")]
    MissedCalls,
    #[serde(rename = "treatment-value")]
    TreatmentValue,
    #[serde(rename = "hours-saved")]
    HoursSaved,
}

impl InputField {
    pub const ALL: [InputField; 3] = [
        InputField::MissedCalls,
        InputField::TreatmentValue,
        InputField::HoursSaved,
    ];

    /// Inclusive (min, max). Treatment value has no upper bound.
    pub fn bounds(&self) -> (f64, Option<f64>) {
        match self {
            InputField::MissedCalls => (10.0, Some(200.0)),
            InputField::TreatmentValue => (0.0, None),
            InputField::HoursSaved => (5.0, Some(40.0)),
        }
    }

    /// Amount a single slider step moves the value
    pub fn step(&self) -> f64 {
        match self {
            InputField::MissedCalls => 5.0,
            InputField::TreatmentValue => 10.0,
            InputField::HoursSaved => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputField::MissedCalls => "Missed Calls Per Month",
            InputField::TreatmentValue => "Average Treatment Value",
            InputField::HoursSaved => "Hours Saved Weekly",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            InputField::MissedCalls => "Calls you miss after hours or when busy",
            InputField::TreatmentValue => "Your typical patient spend per visit",
            InputField::HoursSaved => "Staff time freed for patient care",
        }
    }

    pub fn next(&self) -> InputField {
        match self {
            InputField::MissedCalls => InputField::TreatmentValue,
            InputField::TreatmentValue => InputField::HoursSaved,
            InputField::HoursSaved => InputField::MissedCalls,
        }
    }

    pub fn prev(&self) -> InputField {
        match self {
            InputField::MissedCalls => InputField::HoursSaved,
            InputField::TreatmentValue => InputField::MissedCalls,
            InputField::HoursSaved => InputField::TreatmentValue,
        }
    }
}

/// Input outside the range the estimator's controls allow
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        value: u32,
    },
    #[error("average treatment value must be a positive amount (got {0})")]
    NonPositiveValue(f64),
}

impl EstimatorInputs {
    pub fn new(missed_calls_per_month: u32, average_treatment_value: f64, hours_saved_per_week: u32) -> Self {
        Self {
            missed_calls_per_month,
            average_treatment_value,
            hours_saved_per_week,
        }
    }

    /// Current value of a field as f64 (for display and slider math)
    pub fn get(&self, field: InputField) -> f64 {
        match field {
            InputField::MissedCalls => self.missed_calls_per_month as f64,
            InputField::TreatmentValue => self.average_treatment_value,
            InputField::HoursSaved => self.hours_saved_per_week as f64,
        }
    }

    /// Move a field by whole slider steps, clamped to its bounds.
    pub fn adjust(&mut self, field: InputField, steps: i32) {
        let (min, max) = field.bounds();
        let mut v = self.get(field) + field.step() * steps as f64;
        v = v.max(min);
        if let Some(max) = max {
            v = v.min(max);
        }
        match field {
            InputField::MissedCalls => self.missed_calls_per_month = v.round() as u32,
            InputField::TreatmentValue => self.average_treatment_value = v,
            InputField::HoursSaved => self.hours_saved_per_week = v.round() as u32,
        }
    }

    /// Check the values against the ranges the controls enforce.
    ///
    /// Evaluation does not call this; it is for entry points that accept
    /// free-form numbers (CLI flags, config files).
    pub fn validate(&self) -> Result<(), InputError> {
        check_range(InputField::MissedCalls, "missed calls per month", self.missed_calls_per_month)?;
        check_range(InputField::HoursSaved, "hours saved per week", self.hours_saved_per_week)?;
        if !(self.average_treatment_value.is_finite() && self.average_treatment_value > 0.0) {
            return Err(InputError::NonPositiveValue(self.average_treatment_value));
        }
        Ok(())
    }
}

fn check_range(field: InputField, name: &'static str, value: u32) -> Result<(), InputError> {
    let (min, max) = field.bounds();
    let min = min as u32;
    let max = max.map(|m| m as u32).unwrap_or(u32::MAX);
    if value < min || value > max {
        return Err(InputError::OutOfRange {
            field: name,
            min,
            max,
            value,
        });
    }
    Ok(())
}
