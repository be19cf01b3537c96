use std::sync::Arc;

use serde_json::json;

use client::{
    ClientError, GateState, HackathonGate, IdentityProvider, KeycloakPasswordGrant, Session,
    SessionState, StaticToken, Tab, View, route,
};
use common::Role;
use common::config::IdentityConfig;

use crate::mock::{MockBackend, PASSWORD, REALM, VALID_TOKEN};

fn static_session(app: &MockBackend, token: &str) -> Session {
    Session::new(
        Arc::new(StaticToken::new(token)),
        reqwest::Client::new(),
        app.url(),
    )
}

fn keycloak(app: &MockBackend, password: &str) -> KeycloakPasswordGrant {
    let config = IdentityConfig {
        url: app.url(),
        realm: REALM.into(),
        client_id: "hackathon-app".into(),
        ..IdentityConfig::default()
    };
    KeycloakPasswordGrant::new(reqwest::Client::new(), config, "alice", password)
}

mod handshake {
    use super::*;

    #[tokio::test]
    async fn valid_token_authenticates_with_backend_profile() {
        let app = MockBackend::spawn().await;
        let mut session = static_session(&app, VALID_TOKEN);
        assert!(session.is_loading());

        let state = session.init().await.clone();

        let SessionState::Authenticated { user, token } = state else {
            panic!("Expected an authenticated session, got {state:?}");
        };
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Participant);
        assert_eq!(user.team_label(), "Rustaceans");
        assert_eq!(token, VALID_TOKEN);
    }

    #[tokio::test]
    async fn rejected_profile_request_ends_in_error() {
        let app = MockBackend::spawn().await;
        let mut session = static_session(&app, "forged-token");

        let state = session.init().await;

        assert!(matches!(state, SessionState::Error(_)));
        assert!(session.current_user().is_none());
        assert!(session.api().is_none());
    }

    #[tokio::test]
    async fn unauthenticated_provider_ends_in_error_without_calling_backend() {
        let app = MockBackend::spawn().await;
        let mut session = Session::new(
            Arc::new(StaticToken::anonymous()),
            reqwest::Client::new(),
            app.url(),
        );

        let state = session.init().await;

        assert!(matches!(state, SessionState::Error(_)));
        assert!(app.requests_to("/api/users/current").is_empty());
    }

    #[tokio::test]
    async fn init_runs_the_handshake_only_once() {
        let app = MockBackend::spawn().await;
        let mut session = static_session(&app, VALID_TOKEN);

        session.init().await;
        session.init().await;

        assert_eq!(app.requests_to("/api/users/current").len(), 1);
    }
}

mod profile {
    use super::*;

    #[tokio::test]
    async fn refresh_picks_up_server_side_changes() {
        let app = MockBackend::spawn().await;
        let mut session = static_session(&app, VALID_TOKEN);
        session.init().await;

        *app.state.current_user.lock().unwrap() = json!({
            "id": "u1", "username": "alice", "email": "alice@example.org",
            "role": "JUDGE"
        });
        let user = session.refresh_current_user().await.unwrap();

        assert_eq!(user.role, Role::Judge);
        assert_eq!(user.team_label(), "No team");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_profile() {
        let app = MockBackend::spawn().await;
        let mut session = static_session(&app, VALID_TOKEN);
        session.init().await;

        app.fail("/api/users/current", 500, "profile service down");
        assert!(session.refresh_current_user().await.is_err());

        assert_eq!(session.current_user().unwrap().username, "alice");
    }

    #[tokio::test]
    async fn revoked_token_on_refresh_ends_session_and_requires_login() {
        let app = MockBackend::spawn().await;
        let mut session = static_session(&app, VALID_TOKEN);
        session.init().await;
        assert!(session.current_user().is_some());

        app.fail("/api/users/current", 401, "");
        let err = session.refresh_current_user().await.unwrap_err();

        assert!(matches!(err, ClientError::Unauthorized));
        assert!(matches!(session.state(), SessionState::Error(_)));
        assert!(session.current_user().is_none());
        assert!(session.api().is_none());
        assert!(session.login_required());
        assert_eq!(
            route(session.state(), &HackathonGate::new(), Tab::Challenges),
            View::LoginRequired
        );
    }

    #[tokio::test]
    async fn unauthorized_api_call_flags_login_required() {
        let app = MockBackend::spawn().await;
        let mut session = static_session(&app, VALID_TOKEN);
        session.init().await;
        let api = session.api().unwrap();
        assert!(!session.login_required());

        app.fail("/api/tasks", 401, "");
        assert!(api.get_tasks().await.is_err());

        assert!(session.login_required());
    }
}

mod identity_provider {
    use super::*;

    #[tokio::test]
    async fn password_grant_obtains_token() {
        let app = MockBackend::spawn().await;
        let provider = keycloak(&app, PASSWORD);

        let token = provider.login().await.unwrap();

        assert_eq!(token, VALID_TOKEN);
        let requests = app.requests_to("/realms/hackathon/protocol/openid-connect/token");
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].content_type.as_deref(),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[tokio::test]
    async fn refused_credentials_mean_not_authenticated() {
        let app = MockBackend::spawn().await;
        let provider = keycloak(&app, "wrong");

        assert_eq!(provider.init().await.unwrap(), None);
        assert!(provider.login().await.is_err());
    }

    #[tokio::test]
    async fn session_login_and_logout_through_identity_provider() {
        let app = MockBackend::spawn().await;
        let mut session = Session::new(
            Arc::new(keycloak(&app, PASSWORD)),
            reqwest::Client::new(),
            app.url(),
        );

        assert_eq!(session.login().await.unwrap().username, "alice");
        assert_eq!(session.token(), Some(VALID_TOKEN));

        session.logout().await.unwrap();

        assert_eq!(session.state(), &SessionState::SignedOut);
        assert!(session.api().is_none());
        assert_eq!(*app.state.logouts.lock().unwrap(), vec!["refresh-1".to_string()]);
    }
}

mod navigation {
    use super::*;

    #[tokio::test]
    async fn participant_is_gated_until_a_hackathon_is_selected() {
        let app = MockBackend::spawn().await;
        let mut session = static_session(&app, VALID_TOKEN);
        session.init().await;
        let api = session.api().unwrap();

        let mut gate = HackathonGate::new();
        gate.set_user(session.current_user().cloned());
        assert_eq!(route(session.state(), &gate, Tab::Challenges), View::Loading);

        gate.load(&api).await.unwrap();
        assert_eq!(gate.state(), &GateState::NoSelection);
        assert_eq!(
            route(session.state(), &gate, Tab::Challenges),
            View::HackathonSelection
        );

        let mine: Vec<_> = gate.my_hackathons().iter().map(|h| h.id.clone()).collect();
        assert_eq!(mine, vec!["h1"]);
        assert!(gate.select_by_id("h2").is_none());
        gate.select_by_id("h1").unwrap();

        assert_eq!(
            route(session.state(), &gate, Tab::Submissions),
            View::Page(Tab::Submissions)
        );
        assert_eq!(
            route(session.state(), &gate, Tab::Admin),
            View::Page(Tab::Challenges)
        );

        let visible = gate.visible_tasks(api.get_tasks().await.unwrap());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "t1");
    }

    #[tokio::test]
    async fn failed_hackathon_load_leaves_participant_without_choices() {
        let app = MockBackend::spawn().await;
        let mut session = static_session(&app, VALID_TOKEN);
        session.init().await;
        let api = session.api().unwrap();
        app.fail("/api/hackathons", 500, "boom");

        let mut gate = HackathonGate::new();
        gate.set_user(session.current_user().cloned());

        assert!(gate.load(&api).await.is_err());
        assert!(gate.my_hackathons().is_empty());
        assert_eq!(
            route(session.state(), &gate, Tab::Challenges),
            View::HackathonSelection
        );
    }
}
