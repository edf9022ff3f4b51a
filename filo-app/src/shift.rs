//! Work-shift and break tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Break lifecycle: untouched, running, finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakStatus {
    Idle,
    Active,
    Done,
}

/// One of the day's logged breaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakSession {
    /// Break slot number, 1-based.
    pub id: u8,
    /// Display label.
    pub label: String,
    /// When the break started.
    pub start: Option<DateTime<Utc>>,
    /// When the break ended.
    pub end: Option<DateTime<Utc>>,
    /// Current status.
    pub status: BreakStatus,
}

/// The current day's shift with its break slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkShift {
    /// Clock-in time.
    pub shift_start: Option<DateTime<Utc>>,
    /// Clock-out time.
    pub shift_end: Option<DateTime<Utc>>,
    /// The day's break slots.
    pub breaks: Vec<BreakSession>,
}

/// Number of break slots per day.
const BREAK_SLOTS: u8 = 5;

impl Default for WorkShift {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkShift {
    /// A fresh shift with five idle break slots.
    pub fn new() -> Self {
        Self {
            shift_start: None,
            shift_end: None,
            breaks: (1..=BREAK_SLOTS)
                .map(|id| BreakSession {
                    id,
                    label: format!("Break {}", id),
                    start: None,
                    end: None,
                    status: BreakStatus::Idle,
                })
                .collect(),
        }
    }

    /// Whether the user has clocked in.
    pub fn is_started(&self) -> bool {
        self.shift_start.is_some()
    }

    /// The single clock button: first press clocks in, any later press
    /// stamps the clock-out time.
    pub fn clock(&mut self, now: DateTime<Utc>) {
        if self.shift_start.is_none() {
            self.shift_start = Some(now);
        } else {
            self.shift_end = Some(now);
        }
    }

    /// Toggle break `id`: idle starts it, active finishes it, done stays
    /// done. Breaks require an open shift.
    ///
    /// Returns the break's new status, or `None` for an unknown id or when
    /// not clocked in.
    pub fn toggle_break(&mut self, id: u8, now: DateTime<Utc>) -> Option<BreakStatus> {
        if !self.is_started() {
            return None;
        }
        let slot = self.breaks.iter_mut().find(|b| b.id == id)?;
        match slot.status {
            BreakStatus::Idle => {
                slot.status = BreakStatus::Active;
                slot.start = Some(now);
            }
            BreakStatus::Active => {
                slot.status = BreakStatus::Done;
                slot.end = Some(now);
            }
            BreakStatus::Done => {}
        }
        Some(slot.status)
    }

    /// Number of finished breaks.
    pub fn breaks_taken(&self) -> usize {
        self.breaks.iter().filter(|b| b.status == BreakStatus::Done).count()
    }
}
