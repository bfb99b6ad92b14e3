//! What-if scenario draft for single-record predictions

use crate::shared::types::{Record, SinglePrediction};
use serde_json::{Number, Value};

/// A numeric slider with its declared bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

pub const FIELD_COUNT: usize = 8;

pub const FIELDS: [FieldSpec; FIELD_COUNT] = [
    FieldSpec { key: "longitude", label: "Longitude", min: -124.5, max: -114.0, step: 0.01, default: -122.23 },
    FieldSpec { key: "latitude", label: "Latitude", min: 32.0, max: 42.0, step: 0.01, default: 37.88 },
    FieldSpec { key: "housing_median_age", label: "House Age (years)", min: 1.0, max: 52.0, step: 1.0, default: 30.0 },
    FieldSpec { key: "total_rooms", label: "Total Rooms", min: 100.0, max: 40000.0, step: 100.0, default: 2000.0 },
    FieldSpec { key: "total_bedrooms", label: "Total Bedrooms", min: 10.0, max: 7000.0, step: 10.0, default: 400.0 },
    FieldSpec { key: "population", label: "Population", min: 50.0, max: 35000.0, step: 50.0, default: 800.0 },
    FieldSpec { key: "households", label: "Households", min: 10.0, max: 6000.0, step: 10.0, default: 350.0 },
    FieldSpec { key: "median_income", label: "Median Income (x$10K)", min: 0.5, max: 15.0, step: 0.1, default: 5.0 },
];

pub const OCEAN_KEY: &str = "ocean_proximity";

pub const OCEAN_OPTIONS: [&str; 5] = ["<1H OCEAN", "INLAND", "ISLAND", "NEAR BAY", "NEAR OCEAN"];

const DEFAULT_OCEAN: usize = 3;

/// Nominal coverage of the backend's confidence interval
pub const CONFIDENCE_LEVEL_PCT: u16 = 90;

/// Rows of the form: the sliders followed by the ocean selector
pub const ROW_COUNT: usize = FIELD_COUNT + 1;

/// Local draft of one property record
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDraft {
    values: [f64; FIELD_COUNT],
    ocean: usize,
}

impl Default for ScenarioDraft {
    fn default() -> Self {
        Self {
            values: FIELDS.map(|f| f.default),
            ocean: DEFAULT_OCEAN,
        }
    }
}

impl ScenarioDraft {
    pub fn value(&self, field: usize) -> Option<f64> {
        self.values.get(field).copied()
    }

    pub fn ocean(&self) -> &'static str {
        OCEAN_OPTIONS[self.ocean]
    }

    /// Set a field, clamped to its bounds and snapped to its step grid
    pub fn set(&mut self, field: usize, value: f64) {
        let Some(spec) = FIELDS.get(field) else {
            return;
        };
        if !value.is_finite() {
            return;
        }
        let steps = ((value - spec.min) / spec.step).round();
        let snapped = spec.min + steps * spec.step;
        // Round away float noise from repeated step arithmetic
        let snapped = (snapped * 1e6).round() / 1e6;
        self.values[field] = snapped.clamp(spec.min, spec.max);
    }

    /// Move a field by `delta` steps
    pub fn nudge(&mut self, field: usize, delta: i32) {
        if let (Some(spec), Some(current)) = (FIELDS.get(field), self.value(field)) {
            self.set(field, current + spec.step * delta as f64);
        }
    }

    pub fn select_ocean(&mut self, option: usize) {
        if option < OCEAN_OPTIONS.len() {
            self.ocean = option;
        }
    }

    pub fn cycle_ocean(&mut self, delta: i32) {
        let len = OCEAN_OPTIONS.len() as i32;
        self.ocean = (self.ocean as i32 + delta).rem_euclid(len) as usize;
    }

    /// The draft as the single-object JSON payload
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        for (spec, value) in FIELDS.iter().zip(self.values) {
            let number = Number::from_f64(value).unwrap_or_else(|| Number::from(0));
            record.insert(spec.key.to_string(), Value::Number(number));
        }
        record.insert(OCEAN_KEY.to_string(), Value::String(self.ocean().to_string()));
        record
    }
}

/// Simulator panel state: draft, cursor and the last outcome
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulatorState {
    pub draft: ScenarioDraft,
    pub selected: usize,
    pub loading: bool,
    pub result: Option<SinglePrediction>,
    pub error: Option<String>,
}

impl SimulatorState {
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1).min(ROW_COUNT - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Adjust the selected row: sliders move by steps, the selector cycles
    pub fn adjust(&mut self, delta: i32) {
        if self.selected < FIELDS.len() {
            self.draft.nudge(self.selected, delta);
        } else {
            self.draft.cycle_ocean(delta);
        }
    }

    /// Mark a request in flight and hand back the payload
    pub fn begin_request(&mut self) -> Option<Record> {
        if self.loading {
            return None;
        }
        self.loading = true;
        self.error = None;
        Some(self.draft.to_record())
    }

    /// A failure keeps the previous result on screen
    pub fn finish(&mut self, outcome: Result<SinglePrediction, String>) {
        self.loading = false;
        match outcome {
            Ok(prediction) => self.result = Some(prediction),
            Err(message) => self.error = Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_payload() {
        let record = ScenarioDraft::default().to_record();
        assert_eq!(
            Value::Object(record),
            json!({
                "longitude": -122.23,
                "latitude": 37.88,
                "housing_median_age": 30.0,
                "total_rooms": 2000.0,
                "total_bedrooms": 400.0,
                "population": 800.0,
                "households": 350.0,
                "median_income": 5.0,
                "ocean_proximity": "NEAR BAY"
            })
        );
    }

    #[test]
    fn test_fields_clamp_to_bounds() {
        let mut draft = ScenarioDraft::default();
        draft.set(2, 500.0);
        assert_eq!(draft.value(2), Some(52.0));
        draft.set(2, -3.0);
        assert_eq!(draft.value(2), Some(1.0));
        draft.set(7, 7.26);
        assert_eq!(draft.value(7), Some(7.3));
        draft.set(2, f64::NAN);
        assert_eq!(draft.value(2), Some(1.0));
    }

    #[test]
    fn test_nudge_moves_by_step() {
        let mut draft = ScenarioDraft::default();
        draft.nudge(3, 2);
        assert_eq!(draft.value(3), Some(2200.0));
        draft.nudge(0, -1);
        assert_eq!(draft.value(0), Some(-122.24));
        draft.nudge(1, 10_000);
        assert_eq!(draft.value(1), Some(42.0));
    }

    #[test]
    fn test_ocean_selector() {
        let mut draft = ScenarioDraft::default();
        assert_eq!(draft.ocean(), "NEAR BAY");
        draft.cycle_ocean(2);
        assert_eq!(draft.ocean(), "<1H OCEAN");
        draft.cycle_ocean(-1);
        assert_eq!(draft.ocean(), "NEAR OCEAN");
        draft.select_ocean(99);
        assert_eq!(draft.ocean(), "NEAR OCEAN");
        draft.select_ocean(1);
        assert_eq!(draft.ocean(), "INLAND");
    }

    #[test]
    fn test_failure_keeps_previous_result() {
        let mut sim = SimulatorState::default();
        assert!(sim.begin_request().is_some());
        assert!(sim.begin_request().is_none());

        let prediction = SinglePrediction {
            predicted_price: 250_000.0,
            confidence_low: Some(200_000.0),
            confidence_high: Some(300_000.0),
        };
        sim.finish(Ok(prediction));
        assert_eq!(sim.result, Some(prediction));

        sim.begin_request();
        sim.finish(Err("Prediction failed".to_string()));
        assert_eq!(sim.result, Some(prediction));
        assert_eq!(sim.error.as_deref(), Some("Prediction failed"));
        assert!(!sim.loading);
    }

    #[test]
    fn test_selection_covers_ocean_row() {
        let mut sim = SimulatorState::default();
        for _ in 0..20 {
            sim.select_next();
        }
        assert_eq!(sim.selected, FIELDS.len());
        sim.adjust(1);
        assert_eq!(sim.draft.ocean(), "NEAR OCEAN");
    }
}
