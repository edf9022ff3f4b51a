//! Aggregate application state.
//!
//! One owned object passed by reference wherever state changes: the
//! current screen, the profile, the day's shift, check-in logs, and the
//! chat history all live here.

use crate::checkin::DailyLog;
use crate::profile::UserProfile;
use crate::router::{Action, Screen, transition};
use crate::shift::WorkShift;
use crate::wellness::wellness_index;
use filo_core::ChatMessage;

/// The whole client state.
#[derive(Debug, Default)]
pub struct AppState {
    screen: Screen,
    /// Login and onboarding data.
    pub user: UserProfile,
    /// The current day's shift.
    pub shift: WorkShift,
    /// Check-in history, oldest first.
    pub logs: Vec<DailyLog>,
    /// Chat turns, oldest first.
    pub chat_history: Vec<ChatMessage>,
}

impl AppState {
    /// Fresh state on the splash screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// The screen currently shown.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Apply a user action: update profile flags where the action implies
    /// them, then route.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::SignIn(method) => {
                self.user.is_logged_in = true;
                self.user.login_method = Some(method);
            }
            Action::FinishOnboarding => self.user.has_onboarded = true,
            Action::SignOut => {
                self.user.is_logged_in = false;
                self.user.login_method = None;
            }
            _ => {}
        }

        let next = transition(self.screen, action);
        if next != self.screen {
            tracing::debug!(from = ?self.screen, to = ?next, "Screen change");
            self.screen = next;
        }
    }

    /// Record a daily check-in.
    pub fn record_check_in(&mut self, log: DailyLog) {
        self.logs.push(log);
    }

    /// Current wellness index for the dashboard.
    pub fn wellness_index(&self) -> u8 {
        wellness_index(&self.logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::LoginMethod;

    #[test]
    fn test_starts_on_splash() {
        let state = AppState::new();
        assert_eq!(state.screen(), Screen::Splash);
        assert!(!state.user.is_logged_in);
    }

    #[test]
    fn test_sign_in_sets_profile_flags() {
        let mut state = AppState::new();
        state.dispatch(Action::GetStarted);
        state.dispatch(Action::SignIn(LoginMethod::Mobile));

        assert_eq!(state.screen(), Screen::Consent);
        assert!(state.user.is_logged_in);
        assert_eq!(state.user.login_method, Some(LoginMethod::Mobile));
    }

    #[test]
    fn test_finish_onboarding_marks_profile() {
        let mut state = AppState::new();
        state.dispatch(Action::GetStarted);
        state.dispatch(Action::SignIn(LoginMethod::Google));
        state.dispatch(Action::AgreeConsent);
        state.dispatch(Action::NextStep);
        state.dispatch(Action::NextStep);
        state.dispatch(Action::FinishOnboarding);

        assert_eq!(state.screen(), Screen::Dashboard);
        assert!(state.user.has_onboarded);
    }

    #[test]
    fn test_sign_out_clears_login() {
        let mut state = AppState::new();
        state.dispatch(Action::GetStarted);
        state.dispatch(Action::SignIn(LoginMethod::Google));
        state.dispatch(Action::SignOut);

        assert_eq!(state.screen(), Screen::Splash);
        assert!(!state.user.is_logged_in);
        assert!(state.user.login_method.is_none());
    }

    #[test]
    fn test_check_ins_feed_wellness_index() {
        let mut state = AppState::new();
        assert_eq!(state.wellness_index(), 70);

        state.record_check_in(DailyLog::new("Mon", "Great", 1));
        assert_eq!(state.wellness_index(), 80);
    }
}
