//! HTTP client for the Ufazien hosting platform.
//!
//! The client owns the current [`Session`]. It is loaded from the
//! [`SessionStore`] at construction and replaced on login, refresh and logout.
//! A request answered with 401 triggers at most one token refresh and one
//! retry of that request.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::core::config::{PlatformConfig, REFRESH_TIMEOUT, SUBDOMAIN_SUFFIX};
use crate::core::error::AppError;
use crate::core::models::{Database, Deployment, Domain, User, Website};
use crate::core::poller::StatusSource;
use crate::core::session::{Session, SessionStore};
use crate::ui;

/// Token refresh endpoint. Never refreshed-and-retried itself.
pub const REFRESH_PATH: &str = "/auth/token/refresh/";

/// A file sent as a multipart part.
#[derive(Debug, Clone)]
pub struct FileAttachment {
    /// Form field name.
    pub field: String,
    pub path: PathBuf,
}

impl FileAttachment {
    pub fn new(field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            field: field.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access: Option<String>,
    refresh: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: Option<String>,
}

/// Authenticated client for the platform API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: SessionStore,
    session: Option<Session>,
}

impl ApiClient {
    /// Creates a client and loads any persisted session.
    pub fn from_config(config: &PlatformConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("ufazien/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let store = SessionStore::new(config.tokens_path());
        let session = store.load();
        tracing::debug!(api_url = %config.api_url, authenticated = session.is_some(), "client ready");

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            store,
            session,
        })
    }

    /// Current session, if logged in.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Fails with [`AppError::AuthenticationRequired`] when not logged in.
    pub fn require_session(&self) -> Result<&Session, AppError> {
        self.session.as_ref().ok_or(AppError::AuthenticationRequired)
    }

    /// Sends a request and returns the parsed response body.
    ///
    /// With `files` the body is sent as multipart form data (each `body` field
    /// becomes a text part), otherwise as JSON.
    pub async fn request(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        files: Option<&[FileAttachment]>,
    ) -> Result<Value, AppError> {
        let mut retried = false;

        loop {
            let response = self.dispatch(&method, path, body, files).await?;

            if response.status() == StatusCode::UNAUTHORIZED
                && !retried
                && path != REFRESH_PATH
                && self.session.is_some()
            {
                tracing::debug!(path, "access token rejected, refreshing");
                if self.refresh_access_token().await {
                    retried = true;
                    continue;
                }
                self.clear_session();
                return Err(AppError::AuthenticationFailed);
            }

            return read_body(response).await;
        }
    }

    /// Typed variant of [`request`](Self::request) for JSON endpoints.
    async fn call<T: DeserializeOwned>(
        &mut self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, AppError> {
        let value = self.request(method, path, body, None).await?;
        serde_json::from_value(value).map_err(|e| AppError::InvalidResponse(e.to_string()))
    }

    async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        files: Option<&[FileAttachment]>,
    ) -> Result<Response, AppError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "sending request");

        let mut builder = self.http.request(method.clone(), &url);
        if let Some(session) = &self.session {
            builder = builder.bearer_auth(&session.access_token);
        }

        builder = match (files, body) {
            (Some(files), _) => builder.multipart(multipart_form(body, files).await?),
            (None, Some(body)) => builder.json(body),
            (None, None) => builder,
        };

        builder
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// Returns false on any failure, leaving the session untouched.
    async fn refresh_access_token(&mut self) -> bool {
        let Some(refresh_token) = self.session.as_ref().map(|s| s.refresh_token.clone()) else {
            return false;
        };

        let url = format!("{}{}", self.base_url, REFRESH_PATH);
        let response = match self
            .http
            .post(&url)
            .json(&json!({ "refresh": refresh_token }))
            .timeout(REFRESH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!(status = %response.status(), "token refresh rejected");
                return false;
            }
            Err(e) => {
                tracing::debug!(error = %e, "token refresh failed");
                return false;
            }
        };

        match response.json::<RefreshResponse>().await {
            Ok(RefreshResponse {
                access: Some(access),
            }) if !access.is_empty() => {
                self.set_session(Session::new(access, refresh_token));
                true
            }
            _ => false,
        }
    }

    /// Replaces the session in memory and on disk.
    fn set_session(&mut self, session: Session) {
        if let Err(e) = self.store.save(&session.access_token, &session.refresh_token) {
            tracing::warn!(error = %e, "session not persisted");
            ui::warning(&format!("Could not save tokens: {}", e));
        }
        self.session = Some(session);
    }

    /// Forgets the session in memory and on disk.
    fn clear_session(&mut self) {
        self.session = None;
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "session record not removed");
        }
    }

    // --- Authentication ---

    /// Logs in and persists the issued token pair.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, AppError> {
        // Login never goes through the refresh path
        self.session = None;

        let body = json!({ "email": email, "password": password });
        let response: LoginResponse = self.call(Method::POST, "/auth/login/", Some(&body)).await?;

        if let (Some(access), Some(refresh)) = (response.access, response.refresh) {
            self.set_session(Session::new(access, refresh));
        }

        Ok(response.user.unwrap_or_default())
    }

    /// Logs out remotely when possible; the local session is always cleared.
    pub async fn logout(&mut self) {
        if self.session.is_some() {
            if let Err(e) = self.request(Method::POST, "/auth/logout/", None, None).await {
                tracing::debug!(error = %e, "remote logout failed");
            }
        }
        self.clear_session();
    }

    /// Profile of the logged in user.
    pub async fn profile(&mut self) -> Result<User, AppError> {
        self.call(Method::GET, "/auth/user/", None).await
    }

    // --- Hosting ---

    /// Registers `<subdomain>.ufazien.com`.
    pub async fn create_domain(&mut self, subdomain: &str) -> Result<Domain, AppError> {
        let body = json!({
            "name": format!("{}{}", subdomain, SUBDOMAIN_SUFFIX),
            "domain_type": "subdomain",
        });
        self.call(Method::POST, "/hosting/domains/", Some(&body)).await
    }

    /// Domains that can be attached to a new website.
    pub async fn available_domains(&mut self) -> Result<Vec<Domain>, AppError> {
        self.call(Method::GET, "/hosting/domains/available/", None)
            .await
    }

    /// Creates a website, registering its subdomain first unless `domain_id` is given.
    pub async fn create_website(
        &mut self,
        name: &str,
        subdomain: &str,
        website_type: &str,
        description: Option<&str>,
        environment_variables: Option<&HashMap<String, String>>,
        domain_id: Option<&str>,
    ) -> Result<Website, AppError> {
        let mut body = Map::new();
        body.insert("name".into(), json!(name));
        body.insert("website_type".into(), json!(website_type));

        if let Some(description) = description.filter(|d| !d.is_empty()) {
            body.insert("description".into(), json!(description));
        }
        if let Some(vars) = environment_variables.filter(|v| !v.is_empty()) {
            body.insert("environment_variables".into(), json!(vars));
        }

        let domain_id = match domain_id {
            Some(id) => id.to_string(),
            None => self.create_domain(subdomain).await?.id,
        };
        body.insert("domain_id".into(), json!(domain_id));

        self.call(Method::POST, "/hosting/websites/", Some(&Value::Object(body)))
            .await
    }

    pub async fn list_websites(&mut self) -> Result<Vec<Website>, AppError> {
        self.call(Method::GET, "/hosting/websites/", None).await
    }

    pub async fn website(&mut self, website_id: &str) -> Result<Website, AppError> {
        self.call(Method::GET, &format!("/hosting/websites/{}/", website_id), None)
            .await
    }

    /// Uploads a zip archive, replacing the website files.
    pub async fn upload_zip(&mut self, website_id: &str, zip_path: &Path) -> Result<Value, AppError> {
        let files = [FileAttachment::new("zip_file", zip_path)];
        self.request(
            Method::POST,
            &format!("/hosting/websites/{}/upload_zip/", website_id),
            None,
            Some(&files[..]),
        )
        .await
    }

    /// Triggers a deployment of the uploaded files.
    pub async fn deploy_website(&mut self, website_id: &str) -> Result<Deployment, AppError> {
        let value = self
            .request(
                Method::POST,
                &format!("/hosting/websites/{}/deploy/", website_id),
                None,
                None,
            )
            .await?;
        // Some deployments answer with an empty body
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    /// Requests a new database. It is usually still provisioning on return.
    pub async fn create_database(
        &mut self,
        name: &str,
        db_type: &str,
        description: Option<&str>,
    ) -> Result<Database, AppError> {
        let mut body = json!({ "name": name, "db_type": db_type });
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            body["description"] = json!(description);
        }
        self.call(Method::POST, "/hosting/databases/", Some(&body))
            .await
    }

    pub async fn database(&mut self, database_id: &str) -> Result<Database, AppError> {
        self.call(Method::GET, &format!("/hosting/databases/{}/", database_id), None)
            .await
    }
}

impl StatusSource for ApiClient {
    async fn fetch_status(&mut self, resource_id: &str) -> Result<Database, AppError> {
        self.database(resource_id).await
    }
}

/// Builds the multipart body: text parts for `body` fields, then the files.
async fn multipart_form(body: Option<&Value>, files: &[FileAttachment]) -> Result<Form, AppError> {
    let mut form = Form::new();

    if let Some(Value::Object(fields)) = body {
        for (key, value) in fields {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            form = form.text(key.clone(), text);
        }
    }

    for file in files {
        let bytes = tokio::fs::read(&file.path).await.map_err(|e| {
            AppError::Upload(format!("Failed to read {}: {}", file.path.display(), e))
        })?;
        let file_name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| AppError::Upload(e.to_string()))?;
        form = form.part(file.field.clone(), part);
    }

    Ok(form)
}

/// Parses a response: JSON body on success, [`AppError::Remote`] otherwise.
async fn read_body(response: Response) -> Result<Value, AppError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| AppError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(remote_error(status, &text));
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

/// Extracts the server's `detail` or `message`, falling back to the status line.
fn remote_error(status: StatusCode, text: &str) -> AppError {
    let data: Value = serde_json::from_str(text).unwrap_or(Value::Null);

    let message = data
        .get("detail")
        .or_else(|| data.get("message"))
        .map(|m| match m {
            Value::String(s) => s.clone(),
            other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
        })
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        });

    AppError::Remote {
        status: status.as_u16(),
        message,
    }
}
