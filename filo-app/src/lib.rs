//! # filo-app
//!
//! Application state for the FILO wellness companion: the screen router,
//! onboarding/profile data, daily check-ins, the work-shift tracker, and
//! the dashboard wellness index.
//!
//! Routing is an explicit finite-state machine: an enum of screens plus a
//! pure [`transition`](router::transition) function keyed by user actions,
//! aggregated with the rest of the client state in [`AppState`].

pub mod checkin;
pub mod profile;
pub mod router;
pub mod shift;
pub mod state;
pub mod wellness;

pub use checkin::DailyLog;
pub use profile::UserProfile;
pub use router::{Action, LoginMethod, Screen, transition};
pub use shift::{BreakSession, BreakStatus, WorkShift};
pub use state::AppState;
pub use wellness::wellness_index;
