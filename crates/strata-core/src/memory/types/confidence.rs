//! Confidence score clamped to the unit interval

use serde::{Deserialize, Serialize};

/// Confidence level for facts and insights, always within 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Confidence(f32);

impl Confidence {
    /// Full confidence
    pub const CERTAIN: Confidence = Confidence(1.0);

    /// Create a new confidence value (clamped to 0.0-1.0, NaN becomes 0.0)
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the confidence value
    pub fn value(&self) -> f32 {
        self.0
    }

    /// Increase confidence by a fixed step, capped at 1.0
    pub fn reinforce(&mut self, step: f32) {
        self.0 = (self.0 + step.max(0.0)).min(1.0);
    }

    /// Check whether this confidence meets a threshold
    pub fn at_least(&self, threshold: f32) -> bool {
        self.0 >= threshold
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(0.5)
    }
}

impl From<f32> for Confidence {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f32 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(Confidence::new(1.7).value(), 1.0);
        assert_eq!(Confidence::new(-0.2).value(), 0.0);
        assert_eq!(Confidence::new(f32::NAN).value(), 0.0);
        assert_eq!(Confidence::default().value(), 0.5);
    }

    #[test]
    fn test_reinforce_caps_at_one() {
        let mut c = Confidence::new(0.75);
        c.reinforce(0.1);
        assert!((c.value() - 0.85).abs() < 1e-6);
        for _ in 0..10 {
            c.reinforce(0.1);
        }
        assert_eq!(c.value(), 1.0);
    }

    #[test]
    fn test_serde_clamps_out_of_range_input() {
        let c: Confidence = serde_json::from_str("3.5").unwrap();
        assert_eq!(c, Confidence::CERTAIN);
        assert_eq!(serde_json::to_string(&Confidence::new(0.5)).unwrap(), "0.5");
    }

    #[test]
    fn test_display() {
        assert_eq!(Confidence::new(0.5).to_string(), "0.5");
        assert_eq!(format!("{:.1}", Confidence::new(0.87)), "0.9");
    }
}
