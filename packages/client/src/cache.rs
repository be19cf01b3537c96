//! ID → display lookups for users, tasks and hackathons.
//!
//! The cache is a disposable snapshot of backend state. Each category is
//! fetched independently and swapped in whole, so a failing category never
//! blocks the others and a reader never observes a half-written category.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::{debug, warn};

use common::{Hackathon, Task, User, UserSummary};

use crate::api::ApiClient;
use crate::error::ClientError;

pub const UNKNOWN_USER: &str = "Unknown User";
pub const UNKNOWN_TASK: &str = "Unknown Task";
pub const UNKNOWN_HACKATHON: &str = "Unknown Hackathon";

/// Where the cache pulls its three categories from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<User>, ClientError>;
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ClientError>;
    async fn fetch_hackathons(&self) -> Result<Vec<Hackathon>, ClientError>;
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn fetch_users(&self) -> Result<Vec<User>, ClientError> {
        self.get_users().await
    }

    async fn fetch_tasks(&self) -> Result<Vec<Task>, ClientError> {
        self.get_tasks().await
    }

    async fn fetch_hackathons(&self) -> Result<Vec<Hackathon>, ClientError> {
        self.get_hackathons().await
    }
}

/// Outcome of one refresh, per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    pub users: bool,
    pub tasks: bool,
    pub hackathons: bool,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.users && self.tasks && self.hackathons
    }
}

type Category<V> = RwLock<Arc<IndexMap<String, V>>>;

fn snapshot<V>(category: &Category<V>) -> Arc<IndexMap<String, V>> {
    Arc::clone(&category.read().unwrap_or_else(PoisonError::into_inner))
}

fn replace<V>(category: &Category<V>, entries: IndexMap<String, V>) {
    *category.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(entries);
}

pub struct DataCache {
    source: Arc<dyn CatalogSource>,
    users: Category<String>,
    tasks: Category<Task>,
    hackathons: Category<String>,
}

impl DataCache {
    /// An empty cache. Every lookup answers with the unknown sentinel until
    /// the first [`refresh`](Self::refresh).
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            users: RwLock::default(),
            tasks: RwLock::default(),
            hackathons: RwLock::default(),
        }
    }

    /// Builds the cache and performs the initial fetch.
    pub async fn load(source: Arc<dyn CatalogSource>) -> Self {
        let cache = Self::new(source);
        cache.refresh().await;
        cache
    }

    /// Re-fetches all three categories concurrently. A failed category is
    /// logged and emptied; the others are unaffected.
    pub async fn refresh(&self) -> RefreshReport {
        let users = async {
            match self.source.fetch_users().await {
                Ok(users) => {
                    let entries = users.into_iter().map(|u| (u.id, u.username)).collect();
                    replace(&self.users, entries);
                    true
                }
                Err(e) => {
                    warn!("Failed to fetch users: {e}");
                    replace(&self.users, IndexMap::new());
                    false
                }
            }
        };

        let tasks = async {
            match self.source.fetch_tasks().await {
                Ok(tasks) => {
                    let entries = tasks.into_iter().map(|t| (t.id.clone(), t)).collect();
                    replace(&self.tasks, entries);
                    true
                }
                Err(e) => {
                    warn!("Failed to fetch tasks: {e}");
                    replace(&self.tasks, IndexMap::new());
                    false
                }
            }
        };

        let hackathons = async {
            match self.source.fetch_hackathons().await {
                Ok(hackathons) => {
                    let entries = hackathons.into_iter().map(|h| (h.id, h.name)).collect();
                    replace(&self.hackathons, entries);
                    true
                }
                Err(e) => {
                    warn!("Failed to fetch hackathons: {e}");
                    replace(&self.hackathons, IndexMap::new());
                    false
                }
            }
        };

        let (users, tasks, hackathons) = tokio::join!(users, tasks, hackathons);
        let report = RefreshReport {
            users,
            tasks,
            hackathons,
        };
        debug!(?report, "Data cache refreshed");
        report
    }

    pub fn user_name(&self, id: &str) -> String {
        snapshot(&self.users)
            .get(id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_USER.to_string())
    }

    pub fn task_name(&self, id: &str) -> String {
        snapshot(&self.tasks)
            .get(id)
            .map(|task| task.name.clone())
            .unwrap_or_else(|| UNKNOWN_TASK.to_string())
    }

    pub fn hackathon_name(&self, id: &str) -> String {
        snapshot(&self.hackathons)
            .get(id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_HACKATHON.to_string())
    }

    pub fn all_users(&self) -> Vec<UserSummary> {
        snapshot(&self.users)
            .iter()
            .map(|(id, username)| UserSummary {
                id: id.clone(),
                username: username.clone(),
            })
            .collect()
    }

    /// Full task objects, in the order the backend listed them.
    pub fn all_tasks(&self) -> Vec<Task> {
        snapshot(&self.tasks).values().cloned().collect()
    }

    pub fn task(&self, id: &str) -> Option<Task> {
        snapshot(&self.tasks).get(id).cloned()
    }
}
