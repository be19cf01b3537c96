//! Role-scoped navigation.
//!
//! Which tabs a role may open is a static capability table; resolving a
//! view never inspects roles anywhere else.

use std::fmt;
use std::str::FromStr;

use common::Role;

use crate::gate::HackathonGate;
use crate::session::SessionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tab {
    Challenges,
    Leaderboard,
    Submissions,
    Admin,
    Judge,
}

impl Tab {
    pub const DEFAULT: Tab = Tab::Challenges;

    pub fn id(&self) -> &'static str {
        match self {
            Self::Challenges => "challenges",
            Self::Leaderboard => "leaderboard",
            Self::Submissions => "submissions",
            Self::Admin => "admin",
            Self::Judge => "judge",
        }
    }

    pub fn label(&self) -> &'static str {
        capability(*self).label
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tab '{0}'")]
pub struct ParseTabError(String);

impl FromStr for Tab {
    type Err = ParseTabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CAPABILITIES
            .iter()
            .map(|cap| cap.tab)
            .find(|tab| tab.id() == s)
            .ok_or_else(|| ParseTabError(s.to_string()))
    }
}

/// One row of the capability table.
#[derive(Debug)]
pub struct TabCapability {
    pub tab: Tab,
    pub label: &'static str,
    pub roles: &'static [Role],
}

/// Every tab and the roles allowed to open it, in display order.
pub const CAPABILITIES: &[TabCapability] = &[
    TabCapability {
        tab: Tab::Challenges,
        label: "Challenges",
        roles: &[Role::Participant, Role::Admin, Role::Judge],
    },
    TabCapability {
        tab: Tab::Leaderboard,
        label: "Leaderboard",
        roles: &[Role::Participant, Role::Admin, Role::Judge],
    },
    TabCapability {
        tab: Tab::Submissions,
        label: "My Submissions",
        roles: &[Role::Participant],
    },
    TabCapability {
        tab: Tab::Admin,
        label: "Admin Panel",
        roles: &[Role::Admin],
    },
    TabCapability {
        tab: Tab::Judge,
        label: "Review",
        roles: &[Role::Judge],
    },
];

fn capability(tab: Tab) -> &'static TabCapability {
    CAPABILITIES
        .iter()
        .find(|cap| cap.tab == tab)
        .unwrap_or(&CAPABILITIES[0])
}

pub fn is_allowed(tab: Tab, role: Role) -> bool {
    capability(tab).roles.contains(&role)
}

pub fn visible_tabs(role: Role) -> Vec<Tab> {
    CAPABILITIES
        .iter()
        .filter(|cap| cap.roles.contains(&role))
        .map(|cap| cap.tab)
        .collect()
}

/// What the front-end should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Session or hackathon list still loading; render nothing protected.
    Loading,
    /// Handshake failed, profile rejected, or signed out.
    LoginRequired,
    /// Participant without a selected hackathon.
    HackathonSelection,
    Page(Tab),
}

/// Resolves exactly one view for the session, gate and requested tab. A
/// tab the role may not open falls back to the role's first tab.
pub fn route(session: &SessionState, gate: &HackathonGate, active: Tab) -> View {
    let user = match session {
        SessionState::Loading => return View::Loading,
        SessionState::Error(_) | SessionState::SignedOut => return View::LoginRequired,
        SessionState::Authenticated { user, .. } => user,
    };

    if user.role.is_participant() {
        if gate.is_loading() {
            return View::Loading;
        }
        if gate.selected_hackathon().is_none() {
            return View::HackathonSelection;
        }
    }

    if is_allowed(active, user.role) {
        View::Page(active)
    } else {
        View::Page(visible_tabs(user.role).first().copied().unwrap_or(Tab::DEFAULT))
    }
}
