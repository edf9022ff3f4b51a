//! Screen routing.
//!
//! An explicit finite-state router: an enum of screens plus a pure
//! transition function keyed by user actions. No guards, no shared mutable
//! global; callers hold the current screen and dispatch actions through
//! [`transition`].

use serde::{Deserialize, Serialize};

/// Every screen in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Splash,
    Login,
    Consent,
    OnboardingAge,
    OnboardingWork,
    OnboardingWellbeing,
    Dashboard,
    CheckIn,
    Insights,
    Chat,
    Analytics,
    Nudges,
    Profile,
    WorkTracker,
    CallSelect,
    AiCall,
    PeerCall,
}

impl Default for Screen {
    fn default() -> Self {
        Self::Splash
    }
}

/// How the user signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    Google,
    Mobile,
}

/// User actions that move between screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Splash call-to-action.
    GetStarted,
    /// Successful sign-in.
    SignIn(LoginMethod),
    /// Consent accepted.
    AgreeConsent,
    /// Advance one onboarding step.
    NextStep,
    /// Final onboarding step submitted.
    FinishOnboarding,
    /// Direct navigation (sidebar, dashboard tiles).
    Open(Screen),
    /// Header back button.
    Back,
    /// Start a call with the AI companion.
    StartAiCall,
    /// Start a peer-support call.
    StartPeerCall,
    /// Hang up the active call.
    EndCall,
    /// Sign out.
    SignOut,
}

/// Pure transition function. Unmatched combinations stay put.
pub fn transition(screen: Screen, action: Action) -> Screen {
    use Screen::*;

    match (screen, action) {
        (Splash, Action::GetStarted) => Login,
        (Login, Action::SignIn(_)) => Consent,
        (Consent, Action::AgreeConsent) => OnboardingAge,
        (OnboardingAge, Action::NextStep) => OnboardingWork,
        (OnboardingWork, Action::NextStep) => OnboardingWellbeing,
        (OnboardingWellbeing, Action::FinishOnboarding) => Dashboard,
        (_, Action::Open(target)) => target,
        (_, Action::Back) => Dashboard,
        (CallSelect, Action::StartAiCall) => AiCall,
        (CallSelect, Action::StartPeerCall) => PeerCall,
        (AiCall | PeerCall, Action::EndCall) => CallSelect,
        (_, Action::SignOut) => Splash,
        (current, _) => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onboarding_flow() {
        let mut screen = Screen::Splash;
        for action in [
            Action::GetStarted,
            Action::SignIn(LoginMethod::Google),
            Action::AgreeConsent,
            Action::NextStep,
            Action::NextStep,
            Action::FinishOnboarding,
        ] {
            screen = transition(screen, action);
        }
        assert_eq!(screen, Screen::Dashboard);
    }

    #[test]
    fn test_call_flow() {
        let screen = transition(Screen::Dashboard, Action::Open(Screen::CallSelect));
        assert_eq!(screen, Screen::CallSelect);
        let screen = transition(screen, Action::StartAiCall);
        assert_eq!(screen, Screen::AiCall);
        let screen = transition(screen, Action::EndCall);
        assert_eq!(screen, Screen::CallSelect);
    }

    #[test]
    fn test_open_navigates_from_anywhere() {
        assert_eq!(transition(Screen::Chat, Action::Open(Screen::Analytics)), Screen::Analytics);
        assert_eq!(transition(Screen::Profile, Action::Open(Screen::Chat)), Screen::Chat);
    }

    #[test]
    fn test_back_returns_to_dashboard() {
        assert_eq!(transition(Screen::WorkTracker, Action::Back), Screen::Dashboard);
        assert_eq!(transition(Screen::Chat, Action::Back), Screen::Dashboard);
    }

    #[test]
    fn test_sign_out_from_anywhere() {
        assert_eq!(transition(Screen::Dashboard, Action::SignOut), Screen::Splash);
        assert_eq!(transition(Screen::Profile, Action::SignOut), Screen::Splash);
    }

    #[test]
    fn test_unmatched_actions_stay_put() {
        assert_eq!(transition(Screen::Splash, Action::NextStep), Screen::Splash);
        assert_eq!(transition(Screen::Dashboard, Action::StartAiCall), Screen::Dashboard);
        assert_eq!(transition(Screen::Login, Action::FinishOnboarding), Screen::Login);
    }
}
