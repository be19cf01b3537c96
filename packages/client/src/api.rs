//! Token-bound client for the hackathon backend.
//!
//! Every request carries the bearer token. A 401 invokes the re-login hook
//! and fails with [`ClientError::Unauthorized`]; the request is never
//! retried with the stale token.
//!
//! A 204 or an empty 2xx body is not an error by itself. Operations that
//! return an entity fail with [`ClientError::EmptyResponse`] in that case,
//! while operations returning `()` (deletes and `override_score`) resolve
//! with no value.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, warn};

use common::config::ApiConfig;
use common::{
    CreateUserRequest, Hackathon, HackathonRequest, LeaderboardEntry, Role, ScoreOverride,
    Solution, SubmissionHistory, Task, TaskDetails, UpdateUserRequest, User,
};

use crate::error::ClientError;
use crate::routes;

/// Callback invoked when the backend answers 401.
pub type ReloginHook = Arc<dyn Fn() + Send + Sync>;

/// A file to upload in a multipart request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    /// Guessed from the file extension when not given explicitly.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_raw()
            .map(str::to_string);
        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    fn into_part(self) -> Result<Part, ClientError> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        match self.content_type {
            Some(content_type) => Ok(part.mime_str(&content_type)?),
            None => Ok(part),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: String,
    on_unauthorized: ReloginHook,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        on_unauthorized: ReloginHook,
    ) -> Self {
        Self::with_http_client(Client::new(), base_url, token, on_unauthorized)
    }

    /// Reuses an existing connection pool.
    pub fn with_http_client(
        http: Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
        on_unauthorized: ReloginHook,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            on_unauthorized,
        }
    }

    /// Builds the shared HTTP client described by `config`.
    pub fn http_client(config: &ApiConfig) -> Result<Client, ClientError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(builder.build()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn json_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, "application/json")
    }

    // No explicit content type: reqwest writes the multipart boundary itself.
    fn multipart_request(&self, method: Method, path: &str, form: Form) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.token)
            .multipart(form)
    }

    async fn dispatch(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<reqwest::Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(path, status = status.as_u16(), "Backend responded");

        if status == StatusCode::UNAUTHORIZED {
            warn!(path, "Token rejected, requesting re-login");
            (self.on_unauthorized)();
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or(status.as_str())
                    .to_string()
            } else {
                text
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// `None` for 204 or an empty body, the parsed JSON otherwise.
    async fn read_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<Option<T>, ClientError> {
        let response = self.dispatch(request, path).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&body)?))
    }

    async fn expect_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, ClientError> {
        self.read_json(request, path)
            .await?
            .ok_or_else(|| ClientError::EmptyResponse(path.to_string()))
    }

    async fn execute(&self, request: RequestBuilder, path: &str) -> Result<(), ClientError> {
        self.read_json::<IgnoredAny>(request, path).await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.json_request(Method::GET, path);
        self.expect_json(request, path).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .json_request(method, path)
            .body(serde_json::to_vec(body)?);
        self.expect_json(request, path).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let request = self.json_request(Method::DELETE, path);
        self.execute(request, path).await
    }

    // ---------------------------------------------------------------------
    // Users
    // ---------------------------------------------------------------------

    pub async fn get_current_user(&self) -> Result<User, ClientError> {
        self.get(routes::CURRENT_USER).await
    }

    pub async fn get_users(&self) -> Result<Vec<User>, ClientError> {
        self.get(routes::USERS).await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, ClientError> {
        self.get(&routes::user(user_id)).await
    }

    pub async fn get_users_by_role(&self, role: Role) -> Result<Vec<User>, ClientError> {
        self.get(&routes::users_by_role(role)).await
    }

    pub async fn create_user(&self, user: &CreateUserRequest) -> Result<User, ClientError> {
        self.send_json(Method::POST, routes::USERS, user).await
    }

    pub async fn update_user(
        &self,
        user_id: &str,
        update: &UpdateUserRequest,
    ) -> Result<User, ClientError> {
        let path = routes::user(user_id);
        self.send_json(Method::PUT, &path, update).await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<(), ClientError> {
        self.delete(&routes::user(user_id)).await
    }

    /// Solutions of one user grouped by task ID.
    pub async fn get_submission_history(
        &self,
        user_id: &str,
    ) -> Result<SubmissionHistory, ClientError> {
        self.get(&routes::user_history(user_id)).await
    }

    // ---------------------------------------------------------------------
    // Tasks
    // ---------------------------------------------------------------------

    pub async fn get_tasks(&self) -> Result<Vec<Task>, ClientError> {
        self.get(routes::TASKS).await
    }

    pub async fn get_task(&self, task_id: &str) -> Result<Task, ClientError> {
        self.get(&routes::task(task_id)).await
    }

    /// Sends one multipart request: a JSON part named `task` followed by one
    /// `files` part per dataset file.
    pub async fn create_task(
        &self,
        details: &TaskDetails,
        files: Vec<UploadFile>,
    ) -> Result<Task, ClientError> {
        let details = serde_json::to_vec(details)?;
        let task_part = Part::bytes(details).mime_str("application/json")?;
        let mut form = Form::new().part("task", task_part);
        for file in files {
            form = form.part("files", file.into_part()?);
        }

        let request = self.multipart_request(Method::POST, routes::TASKS, form);
        self.expect_json(request, routes::TASKS).await
    }

    pub async fn update_task_details(
        &self,
        task_id: &str,
        details: &TaskDetails,
    ) -> Result<Task, ClientError> {
        let path = routes::task(task_id);
        self.send_json(Method::PUT, &path, details).await
    }

    pub async fn add_files_to_task(
        &self,
        task_id: &str,
        files: Vec<UploadFile>,
    ) -> Result<Task, ClientError> {
        let mut form = Form::new();
        for file in files {
            form = form.part("files", file.into_part()?);
        }

        let path = routes::task_files(task_id);
        let request = self.multipart_request(Method::PUT, &path, form);
        self.expect_json(request, &path).await
    }

    /// Replaces the reference solution used for automated scoring.
    pub async fn set_task_solution(
        &self,
        task_id: &str,
        file: UploadFile,
    ) -> Result<Task, ClientError> {
        let form = Form::new().part("file", file.into_part()?);

        let path = routes::task_solution(task_id);
        let request = self.multipart_request(Method::PUT, &path, form);
        self.expect_json(request, &path).await
    }

    pub async fn remove_file_from_task(
        &self,
        task_id: &str,
        index: usize,
    ) -> Result<Task, ClientError> {
        let path = routes::task_file_remove(task_id, index);
        let request = self.json_request(Method::PUT, &path);
        self.expect_json(request, &path).await
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<(), ClientError> {
        self.delete(&routes::task(task_id)).await
    }

    /// Raw bytes of the dataset file at `index`.
    pub async fn download_task_file(
        &self,
        task_id: &str,
        index: usize,
    ) -> Result<Vec<u8>, ClientError> {
        let path = routes::task_file(task_id, index);
        let request = self.http.get(self.url(&path)).bearer_auth(&self.token);
        let response = self.dispatch(request, &path).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---------------------------------------------------------------------
    // Solutions
    // ---------------------------------------------------------------------

    pub async fn submit_solution(
        &self,
        user_id: &str,
        task_id: &str,
        file: UploadFile,
    ) -> Result<Solution, ClientError> {
        let form = Form::new()
            .text("userId", user_id.to_string())
            .text("taskId", task_id.to_string())
            .part("file", file.into_part()?);

        let request = self.multipart_request(Method::POST, routes::SUBMIT_SOLUTION, form);
        self.expect_json(request, routes::SUBMIT_SOLUTION).await
    }

    pub async fn get_all_solutions(&self) -> Result<Vec<Solution>, ClientError> {
        self.get(routes::SOLUTIONS).await
    }

    pub async fn get_leaderboard(
        &self,
        task_id: &str,
    ) -> Result<Vec<LeaderboardEntry>, ClientError> {
        self.get(&routes::leaderboard(task_id)).await
    }

    pub async fn get_solutions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Solution>, ClientError> {
        self.get(&routes::user_solutions(user_id)).await
    }

    pub async fn get_solutions_for_task(
        &self,
        task_id: &str,
    ) -> Result<Vec<Solution>, ClientError> {
        self.get(&routes::task_solutions(task_id)).await
    }

    pub async fn delete_solution(&self, solution_id: &str) -> Result<(), ClientError> {
        self.delete(&routes::solution(solution_id)).await
    }

    /// Overwrites the automated score of a solution.
    pub async fn override_score(&self, score: &ScoreOverride) -> Result<(), ClientError> {
        let request = self
            .json_request(Method::PUT, routes::JUDGE_SCORE)
            .body(serde_json::to_vec(score)?);
        self.execute(request, routes::JUDGE_SCORE).await
    }

    // ---------------------------------------------------------------------
    // Hackathons
    // ---------------------------------------------------------------------

    pub async fn get_hackathons(&self) -> Result<Vec<Hackathon>, ClientError> {
        self.get(routes::HACKATHONS).await
    }

    pub async fn get_hackathon(&self, hackathon_id: &str) -> Result<Hackathon, ClientError> {
        self.get(&routes::hackathon(hackathon_id)).await
    }

    pub async fn create_hackathon(
        &self,
        hackathon: &HackathonRequest,
    ) -> Result<Hackathon, ClientError> {
        let path = routes::HACKATHONS;
        self.send_json(Method::POST, path, hackathon).await
    }

    pub async fn update_hackathon(
        &self,
        hackathon_id: &str,
        hackathon: &HackathonRequest,
    ) -> Result<Hackathon, ClientError> {
        let path = routes::hackathon(hackathon_id);
        self.send_json(Method::PUT, &path, hackathon).await
    }

    pub async fn delete_hackathon(&self, hackathon_id: &str) -> Result<(), ClientError> {
        self.delete(&routes::hackathon(hackathon_id)).await
    }

    pub async fn add_task_to_hackathon(
        &self,
        hackathon_id: &str,
        task_id: &str,
    ) -> Result<Hackathon, ClientError> {
        let path = routes::hackathon_task(hackathon_id, task_id);
        let request = self.json_request(Method::PUT, &path);
        self.expect_json(request, &path).await
    }

    pub async fn remove_task_from_hackathon(
        &self,
        hackathon_id: &str,
        task_id: &str,
    ) -> Result<Hackathon, ClientError> {
        let path = routes::hackathon_task(hackathon_id, task_id);
        let request = self.json_request(Method::DELETE, &path);
        self.expect_json(request, &path).await
    }

    pub async fn add_user_to_hackathon(
        &self,
        hackathon_id: &str,
        user_id: &str,
    ) -> Result<Hackathon, ClientError> {
        let path = routes::hackathon_user(hackathon_id, user_id);
        let request = self.json_request(Method::PUT, &path);
        self.expect_json(request, &path).await
    }

    pub async fn remove_user_from_hackathon(
        &self,
        hackathon_id: &str,
        user_id: &str,
    ) -> Result<Hackathon, ClientError> {
        let path = routes::hackathon_user(hackathon_id, user_id);
        let request = self.json_request(Method::DELETE, &path);
        self.expect_json(request, &path).await
    }
}
