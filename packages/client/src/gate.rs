//! Per-session hackathon selection for participants.
//!
//! Participants work inside one hackathon at a time; admins and judges
//! bypass the gate and always see the global view.

use tracing::{info, warn};

use common::{Hackathon, Task, User};

use crate::api::ApiClient;
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// The hackathon list has not been loaded yet.
    Loading,
    NoSelection,
    Selected(Hackathon),
}

#[derive(Debug, Clone)]
pub struct HackathonGate {
    user: Option<User>,
    hackathons: Vec<Hackathon>,
    state: GateState,
}

impl Default for HackathonGate {
    fn default() -> Self {
        Self::new()
    }
}

impl HackathonGate {
    pub fn new() -> Self {
        Self {
            user: None,
            hackathons: Vec::new(),
            state: GateState::Loading,
        }
    }

    /// Sets the current user. A different user starts without a selection.
    pub fn set_user(&mut self, user: Option<User>) {
        let same_user = match (&self.user, &user) {
            (Some(old), Some(new)) => old.id == new.id,
            _ => false,
        };
        self.user = user;
        if !same_user {
            self.clear_hackathon();
        }
    }

    /// Replaces the hackathon list. The current selection is refreshed from
    /// the new list, or dropped if the participant is no longer a member.
    pub fn set_hackathons(&mut self, hackathons: Vec<Hackathon>) {
        self.hackathons = hackathons;

        self.state = match std::mem::replace(&mut self.state, GateState::NoSelection) {
            GateState::Selected(selected) => {
                match self.my_hackathons().into_iter().find(|h| h.id == selected.id) {
                    Some(fresh) => GateState::Selected(fresh.clone()),
                    None => {
                        info!(hackathon = %selected.id, "Selected hackathon no longer available");
                        GateState::NoSelection
                    }
                }
            }
            GateState::Loading | GateState::NoSelection => GateState::NoSelection,
        };
    }

    /// Fetches all hackathons. On failure the list is left empty and the
    /// error is returned to the caller.
    pub async fn load(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        match api.get_hackathons().await {
            Ok(hackathons) => {
                self.set_hackathons(hackathons);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to fetch hackathons: {e}");
                self.set_hackathons(Vec::new());
                Err(e)
            }
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, GateState::Loading)
    }

    pub fn selected_hackathon(&self) -> Option<&Hackathon> {
        match &self.state {
            GateState::Selected(hackathon) => Some(hackathon),
            _ => None,
        }
    }

    /// Hackathons the current participant belongs to. Empty for admins,
    /// judges, and before the user is known.
    pub fn my_hackathons(&self) -> Vec<&Hackathon> {
        match &self.user {
            Some(user) if user.role.is_participant() => self
                .hackathons
                .iter()
                .filter(|h| h.has_member(&user.id))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Selects `hackathon` if it is one of [`my_hackathons`](Self::my_hackathons).
    /// The stored snapshot comes from the loaded list, not from the argument.
    pub fn select_hackathon(&mut self, hackathon: &Hackathon) -> Option<&Hackathon> {
        self.select_by_id(&hackathon.id)
    }

    /// Selects one of [`my_hackathons`](Self::my_hackathons) by ID. Returns
    /// `None` without changing state while the list is loading or when the
    /// participant is not a member.
    pub fn select_by_id(&mut self, hackathon_id: &str) -> Option<&Hackathon> {
        if self.is_loading() {
            return None;
        }
        let hackathon = self
            .my_hackathons()
            .into_iter()
            .find(|h| h.id == hackathon_id)
            .cloned()?;
        info!(hackathon = %hackathon.id, name = %hackathon.name, "Hackathon selected");
        self.state = GateState::Selected(hackathon);
        self.selected_hackathon()
    }

    /// Drops the selection ("switch hackathon").
    pub fn clear_hackathon(&mut self) {
        if let GateState::Selected(_) = self.state {
            self.state = GateState::NoSelection;
        }
    }

    /// True for a participant who still has to pick a hackathon.
    pub fn needs_selection(&self) -> bool {
        let gated = self
            .user
            .as_ref()
            .is_some_and(|user| user.role.is_participant());
        gated && self.selected_hackathon().is_none()
    }

    pub fn is_task_visible(&self, task_id: &str) -> bool {
        match &self.user {
            Some(user) if user.role.is_participant() => self
                .selected_hackathon()
                .is_some_and(|h| h.has_task(task_id)),
            Some(_) => true,
            None => false,
        }
    }

    /// Tasks visible in the current scope: the selected hackathon's tasks
    /// for participants, everything for admins and judges.
    pub fn visible_tasks(&self, tasks: Vec<Task>) -> Vec<Task> {
        tasks
            .into_iter()
            .filter(|task| self.is_task_visible(&task.id))
            .collect()
    }
}
