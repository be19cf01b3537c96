use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Backend REST endpoint settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Origin the `/api/...` paths are resolved against. Default: "http://localhost:8080".
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_api_base_url() -> String {
    "http://localhost:8080".into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_secs: None,
        }
    }
}

/// Identity provider settings.
///
/// A pre-issued `token` takes precedence over the password grant.
#[derive(Debug, Deserialize, Clone)]
pub struct IdentityConfig {
    /// Keycloak base URL. Default: "http://localhost:8180".
    #[serde(default = "default_identity_url")]
    pub url: String,
    /// Default: "hackathon".
    #[serde(default = "default_identity_realm")]
    pub realm: String,
    /// Default: "hackathon-app".
    #[serde(default = "default_identity_client_id")]
    pub client_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

fn default_identity_url() -> String {
    "http://localhost:8180".into()
}
fn default_identity_realm() -> String {
    "hackathon".into()
}
fn default_identity_client_id() -> String {
    "hackathon-app".into()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            url: default_identity_url(),
            realm: default_identity_realm(),
            client_id: default_identity_client_id(),
            username: None,
            password: None,
            token: None,
        }
    }
}

/// Client application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClientAppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
}

impl ClientAppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("HACKATHON_CONFIG").unwrap_or_else(|_| "config/client".to_string());
        Self::load_from(&config_path)
    }

    /// Loads from an explicit file path (extension optional). The file may
    /// be absent; environment overrides still apply.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("api.base_url", default_api_base_url())?
            .set_default("identity.url", default_identity_url())?
            .set_default("identity.realm", default_identity_realm())?
            .set_default("identity.client_id", default_identity_client_id())?
            .add_source(File::with_name(config_path).required(false))
            // Override from environment (e.g., HACKATHON__API__BASE_URL)
            .add_source(Environment::with_prefix("HACKATHON").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
