//! Route access guard.
//!
//! A pure decision over the session state the caller already holds. The web
//! client asks for it through `GET /api/access`, and API handlers apply the
//! same rules through [`Session`](crate::auth::Session).

use serde::Serialize;

use hirely_models::UserRole;

pub const SIGN_IN_REDIRECT: &str = "/?sign-in=true";
pub const SIGN_UP_REDIRECT: &str = "/?sign-up=true";
pub const ONBOARDING_PATH: &str = "/onboarding";

/// What the caller knows about the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Identity provider has not answered yet.
    Loading,
    SignedOut,
    SignedIn { role: Option<UserRole> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuardPolicy {
    /// Signed-out users are sent to the sign-in prompt.
    pub requires_sign_in: bool,
    /// Signed-in users without a role are sent to onboarding.
    pub requires_role: bool,
    /// Send signed-out users to sign-up rather than sign-in.
    pub signup_redirect: bool,
}

impl GuardPolicy {
    pub const OPEN: GuardPolicy = GuardPolicy {
        requires_sign_in: false,
        requires_role: false,
        signup_redirect: false,
    };

    pub const SIGNED_IN: GuardPolicy = GuardPolicy {
        requires_sign_in: true,
        requires_role: false,
        signup_redirect: false,
    };

    pub const ROLE_REQUIRED: GuardPolicy = GuardPolicy {
        requires_sign_in: true,
        requires_role: true,
        signup_redirect: false,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Render nothing until the session is known.
    Wait,
    Render,
    Redirect { to: String },
}

/// Decide what to do with a navigation to `pathname`.
pub fn evaluate(policy: GuardPolicy, session: SessionState, pathname: &str) -> GuardDecision {
    if !policy.requires_sign_in {
        return GuardDecision::Render;
    }

    match session {
        SessionState::Loading => GuardDecision::Wait,
        SessionState::SignedOut => GuardDecision::Redirect {
            to: if policy.signup_redirect {
                SIGN_UP_REDIRECT
            } else {
                SIGN_IN_REDIRECT
            }
            .to_string(),
        },
        SessionState::SignedIn { role } => {
            if policy.requires_role && role.is_none() && pathname != ONBOARDING_PATH {
                GuardDecision::Redirect {
                    to: ONBOARDING_PATH.to_string(),
                }
            } else {
                GuardDecision::Render
            }
        }
    }
}

/// Navigable pages of the web client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Home,
    Onboarding,
    Jobs,
    Job(String),
    PostJob,
    SavedJobs,
    MyJobs,
    JobAnalytics(String),
}

impl AppRoute {
    /// Match a client path, ignoring any query string and trailing slash.
    pub fn parse(path: &str) -> Option<AppRoute> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => AppRoute::Home,
            ["onboarding"] => AppRoute::Onboarding,
            ["jobs"] => AppRoute::Jobs,
            ["job", id] => AppRoute::Job((*id).to_string()),
            ["job", id, "analytics"] => AppRoute::JobAnalytics((*id).to_string()),
            ["post-job"] => AppRoute::PostJob,
            ["saved-jobs"] => AppRoute::SavedJobs,
            ["my-jobs"] => AppRoute::MyJobs,
            _ => return None,
        };
        Some(route)
    }

    pub fn policy(&self) -> GuardPolicy {
        match self {
            AppRoute::Home => GuardPolicy::OPEN,
            AppRoute::Onboarding => GuardPolicy::SIGNED_IN,
            _ => GuardPolicy::ROLE_REQUIRED,
        }
    }

    /// Canonical client path.
    pub fn path(&self) -> String {
        match self {
            AppRoute::Home => "/".to_string(),
            AppRoute::Onboarding => ONBOARDING_PATH.to_string(),
            AppRoute::Jobs => "/jobs".to_string(),
            AppRoute::Job(id) => format!("/job/{}", id),
            AppRoute::JobAnalytics(id) => format!("/job/{}/analytics", id),
            AppRoute::PostJob => "/post-job".to_string(),
            AppRoute::SavedJobs => "/saved-jobs".to_string(),
            AppRoute::MyJobs => "/my-jobs".to_string(),
        }
    }

    pub fn evaluate(&self, session: SessionState) -> GuardDecision {
        evaluate(self.policy(), session, &self.path())
    }
}
