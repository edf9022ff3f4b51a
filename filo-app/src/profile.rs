//! Onboarding and profile data.

use crate::router::LoginMethod;
use serde::{Deserialize, Serialize};

/// Everything captured during login and onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Age bracket, e.g. `26-35`.
    pub age_range: String,
    /// Hours worked daily (0-14).
    pub work_hours: u8,
    /// Whether the user works after hours.
    pub work_after_hours: bool,
    /// Baseline daily stress label.
    pub base_stress: String,
    /// Baseline loneliness frequency.
    pub base_loneliness: String,
    /// Whether onboarding completed.
    pub has_onboarded: bool,
    /// Whether the user is signed in.
    pub is_logged_in: bool,
    /// How the user signed in, once they have.
    pub login_method: Option<LoginMethod>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age_range: "26-35".to_string(),
            work_hours: 8,
            work_after_hours: false,
            base_stress: "Neutral".to_string(),
            base_loneliness: "Sometimes".to_string(),
            has_onboarded: false,
            is_logged_in: false,
            login_method: None,
        }
    }
}
