pub mod api;
pub mod cache;
pub mod error;
pub mod gate;
pub mod identity;
pub mod router;
pub mod routes;
pub mod session;

pub use api::{ApiClient, ReloginHook, UploadFile};
pub use cache::{CatalogSource, DataCache, RefreshReport};
pub use error::{ClientError, ErrorKind};
pub use gate::{GateState, HackathonGate};
pub use identity::{IdentityProvider, KeycloakPasswordGrant, StaticToken, provider_from_config};
pub use router::{Tab, View, route};
pub use session::{Session, SessionState};
