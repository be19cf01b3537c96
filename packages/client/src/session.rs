use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::Client;
use tracing::{error, info, warn};

use common::User;

use crate::api::{ApiClient, ReloginHook};
use crate::error::ClientError;
use crate::identity::IdentityProvider;

/// Lifecycle of an authenticated session.
///
/// `Loading` until the identity handshake resolves, then exactly one of
/// `Authenticated` or `Error`. `SignedOut` follows an explicit logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Authenticated { user: User, token: String },
    Error(String),
    SignedOut,
}

pub struct Session {
    provider: Arc<dyn IdentityProvider>,
    http: Client,
    base_url: String,
    state: SessionState,
    initialized: bool,
    login_required: Arc<AtomicBool>,
}

impl Session {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        http: Client,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            http,
            base_url: base_url.into(),
            state: SessionState::Loading,
            initialized: false,
            login_required: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Runs the identity handshake and loads the user's profile. Only the
    /// first call does any work.
    pub async fn init(&mut self) -> &SessionState {
        if self.initialized {
            return &self.state;
        }
        self.initialized = true;

        match self.provider.init().await {
            Ok(Some(token)) => {
                // Failure is recorded in `state`.
                let _ = self.authenticate(token).await;
            }
            Ok(None) => {
                error!("User not authenticated via identity provider");
                self.state = SessionState::Error("Not authenticated".into());
            }
            Err(e) => {
                error!("Identity handshake failed: {e}");
                self.state = SessionState::Error(e.to_string());
            }
        }
        &self.state
    }

    async fn authenticate(&mut self, token: String) -> Result<(), ClientError> {
        let api = self.bind(&token);
        match api.get_current_user().await {
            Ok(user) => {
                info!(username = %user.username, role = %user.role, "Session authenticated");
                self.login_required.store(false, Ordering::SeqCst);
                self.state = SessionState::Authenticated { user, token };
                Ok(())
            }
            Err(e) => {
                warn!("Backend rejected profile request: {e}");
                self.state = SessionState::Error(e.to_string());
                Err(e)
            }
        }
    }

    fn bind(&self, token: &str) -> ApiClient {
        let flag = Arc::clone(&self.login_required);
        let hook: ReloginHook = Arc::new(move || flag.store(true, Ordering::SeqCst));
        ApiClient::with_http_client(self.http.clone(), self.base_url.clone(), token, hook)
    }

    /// Obtains a fresh token and reloads the profile.
    pub async fn login(&mut self) -> Result<&User, ClientError> {
        self.initialized = true;
        self.state = SessionState::Loading;

        let token = match self.provider.login().await {
            Ok(token) => token,
            Err(e) => {
                self.state = SessionState::Error(e.to_string());
                return Err(e);
            }
        };
        self.authenticate(token).await?;

        self.current_user()
            .ok_or_else(|| ClientError::Identity("no active session".into()))
    }

    /// Ends the session. Local state is cleared even when the provider
    /// fails to acknowledge the logout.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let result = self.provider.logout().await;
        if let Err(e) = &result {
            warn!("Identity provider logout failed: {e}");
        }
        self.state = SessionState::SignedOut;
        self.login_required.store(false, Ordering::SeqCst);
        info!("Session signed out");
        result
    }

    /// Re-fetches the authenticated user's profile. A rejected token ends the
    /// session in `Error`; any other failure keeps the previous profile.
    pub async fn refresh_current_user(&mut self) -> Result<&User, ClientError> {
        let SessionState::Authenticated { token, .. } = &self.state else {
            return Err(ClientError::Identity("no active session".into()));
        };

        let fresh = match self.bind(token).get_current_user().await {
            Ok(fresh) => fresh,
            Err(ClientError::Unauthorized) => {
                warn!("Backend rejected the session token, login required");
                self.state = SessionState::Error(ClientError::Unauthorized.to_string());
                return Err(ClientError::Unauthorized);
            }
            Err(e) => {
                error!("Failed to refresh current user: {e}");
                return Err(e);
            }
        };

        match &mut self.state {
            SessionState::Authenticated { user, .. } => {
                *user = fresh;
                Ok(&*user)
            }
            _ => Err(ClientError::Identity("no active session".into())),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading)
    }

    pub fn current_user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    /// An API client bound to the current token. A 401 on any of its calls
    /// marks the session as needing a fresh login.
    pub fn api(&self) -> Option<ApiClient> {
        self.token().map(|token| self.bind(token))
    }

    pub fn login_required(&self) -> bool {
        self.login_required.load(Ordering::SeqCst)
    }
}
