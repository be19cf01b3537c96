use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use tracing::{info, warn};

use client::{
    ApiClient, ClientError, DataCache, HackathonGate, Session, SessionState, Tab, View,
    provider_from_config, route,
};
use common::User;
use common::config::ClientAppConfig;

/// A signed-in session together with the state every page reads from.
pub struct App {
    pub session: Session,
    pub api: ApiClient,
    pub gate: HackathonGate,
    pub cache: DataCache,
    /// Why the hackathon list failed to load. Only participants need it.
    hackathons_error: Option<ClientError>,
}

impl App {
    /// Runs the identity handshake, falling back to one explicit login, and
    /// loads the hackathon list for the gate.
    pub async fn start(config: &ClientAppConfig) -> Result<Self> {
        let http = ApiClient::http_client(&config.api).context("Failed to build HTTP client")?;
        let provider = provider_from_config(http.clone(), &config.identity)
            .context("No usable identity configuration")?;
        let mut session = Session::new(provider, http, config.api.base_url.clone());

        let state = session.init().await.clone();
        if let SessionState::Error(reason) = state {
            warn!("Handshake did not authenticate ({reason}), attempting login");
            session.login().await.context("Login required")?;
        }

        let api = session.api().context("Login required")?;
        let mut gate = HackathonGate::new();
        gate.set_user(session.current_user().cloned());
        let hackathons_error = gate.load(&api).await.err();

        let cache = DataCache::new(Arc::new(api.clone()));
        Ok(Self {
            session,
            api,
            gate,
            cache,
            hackathons_error,
        })
    }

    pub fn user(&self) -> Result<&User> {
        self.session.current_user().context("Login required")
    }

    /// Resolves `tab` through the router and fills the cache. Participants
    /// pick a hackathon first.
    pub async fn open(&mut self, tab: Tab, hackathon: Option<&str>) -> Result<()> {
        if self.gate.needs_selection() {
            self.choose_hackathon(hackathon)?;
        }

        match route(self.session.state(), &self.gate, tab) {
            View::Page(resolved) if resolved == tab => {}
            View::Page(_) => bail!(
                "The {} tab is not available to {} users",
                tab.label(),
                self.user()?.role
            ),
            View::HackathonSelection => bail!("Select a hackathon with --hackathon <id>"),
            View::LoginRequired => bail!("Login required"),
            View::Loading => bail!("Session is still loading"),
        }

        self.refresh_cache().await;
        Ok(())
    }

    fn choose_hackathon(&mut self, requested: Option<&str>) -> Result<()> {
        let mine: Vec<(String, String)> = self
            .gate
            .my_hackathons()
            .into_iter()
            .map(|h| (h.id.clone(), h.name.clone()))
            .collect();
        if mine.is_empty() {
            return Err(no_hackathons(self.hackathons_error.take()));
        }

        let id = match requested {
            Some(id) => id.to_string(),
            None if std::io::stdin().is_terminal() => {
                let items: Vec<String> = mine
                    .iter()
                    .map(|(id, name)| format!("{name} ({id})"))
                    .collect();
                let index = Select::with_theme(&ColorfulTheme::default())
                    .with_prompt("Select a hackathon")
                    .items(&items)
                    .default(0)
                    .interact()
                    .context("Hackathon selection cancelled")?;
                mine[index].0.clone()
            }
            None => {
                let available: Vec<&str> = mine.iter().map(|(id, _)| id.as_str()).collect();
                bail!(
                    "Select a hackathon with --hackathon <id> (available: {})",
                    available.join(", ")
                );
            }
        };

        let selected = self
            .gate
            .select_by_id(&id)
            .with_context(|| format!("You are not a member of hackathon '{id}'"))?;
        info!(hackathon = %selected.id, "Working in hackathon");
        Ok(())
    }

    /// Rebuilds the lookup cache. Categories that failed to load are
    /// reported and left empty.
    pub async fn refresh_cache(&self) {
        let report = self.cache.refresh().await;
        if !report.is_complete() {
            warn!(?report, "Some lookups could not be loaded; names may show as unknown");
        }
    }
}

/// Why a participant has no hackathon to choose from.
fn no_hackathons(load_error: Option<ClientError>) -> anyhow::Error {
    match load_error {
        Some(e) => anyhow::Error::new(e).context("Failed to load hackathons"),
        None => anyhow!("You are not a member of any hackathon yet"),
    }
}
