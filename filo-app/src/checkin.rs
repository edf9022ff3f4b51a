//! Daily mood and stress check-ins.

use serde::{Deserialize, Serialize};

/// One day's check-in entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    /// Day label, e.g. `Mon`.
    pub date: String,
    /// Mood label or emoji.
    pub mood: String,
    /// Stress rating, 1 (calm) to 5 (overwhelmed).
    pub stress_level: u8,
    /// Whether the user socialized that day.
    pub socialized: bool,
    /// Hours slept.
    pub sleep_hours: u8,
}

impl DailyLog {
    /// Create a check-in entry.
    pub fn new(date: impl Into<String>, mood: impl Into<String>, stress_level: u8) -> Self {
        Self {
            date: date.into(),
            mood: mood.into(),
            stress_level,
            socialized: false,
            sleep_hours: 0,
        }
    }
}
