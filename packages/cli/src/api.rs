use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::blocking::multipart::Form;
use serde::Deserialize;

/// One image attached to a content record.
#[derive(Clone, Debug, Deserialize, serde::Serialize, PartialEq)]
pub struct MediaRef {
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub order: i32,
}

/// A content record as returned by the API.
#[derive(Clone, Debug, Deserialize)]
pub struct ContentRecord {
    pub id: i32,
    pub section: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub images: Vec<MediaRef>,
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    username: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Multipart payload for a content create or update.
pub struct ContentForm {
    pub section: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub order: i32,
    pub is_active: bool,
    /// Images to keep, echoed back as `existing_images` JSON. `None` means
    /// the field is not sent at all.
    pub existing_images: Option<Vec<MediaRef>>,
    /// Files to upload, with optional captions.
    pub uploads: Vec<(PathBuf, Option<String>)>,
}

impl ContentForm {
    fn into_form(self) -> Result<Form> {
        let mut form = Form::new()
            .text("section", self.section)
            .text("title", self.title)
            .text("order", self.order.to_string())
            .text("is_active", self.is_active.to_string());

        if let Some(subtitle) = self.subtitle {
            form = form.text("subtitle", subtitle);
        }
        if let Some(description) = self.description {
            form = form.text("description", description);
        }
        if let Some(body) = self.body {
            form = form.text("body", body);
        }
        if let Some(kept) = self.existing_images {
            form = form.text("existing_images", serde_json::to_string(&kept)?);
        }
        for (i, (path, caption)) in self.uploads.into_iter().enumerate() {
            form = form.file("images", &path).with_context(|| {
                format!("failed to read upload '{}'", path.display())
            })?;
            if let Some(caption) = caption {
                form = form.text(format!("caption_{i}"), caption);
            }
        }

        Ok(form)
    }
}

pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

fn token_path() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .context("could not determine the configuration directory")?
        .join("campus-admin");
    Ok(dir.join("token"))
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: load_token().ok().flatten(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    fn bearer(&self) -> Result<&str> {
        self.token
            .as_deref()
            .context("not logged in; run `campus-admin login` first")
    }

    /// Log in and persist the token for subsequent commands.
    pub fn login(&mut self, username: &str, password: &str) -> Result<String> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({"username": username, "password": password}))
            .send()?;
        let login: LoginResponse = parse(response)?;

        save_token(&login.token)?;
        self.token = Some(login.token);
        Ok(login.username)
    }

    pub fn list_content(&self, section: Option<&str>) -> Result<Vec<ContentRecord>> {
        let mut request = self.http.get(self.url("/content"));
        if let Some(section) = section {
            request = request.query(&[("section", section)]);
        }
        parse(request.send()?)
    }

    pub fn get_content(&self, id: i32) -> Result<ContentRecord> {
        parse(self.http.get(self.url(&format!("/content/{id}"))).send()?)
    }

    pub fn create_content(&self, form: ContentForm) -> Result<ContentRecord> {
        let response = self
            .http
            .post(self.url("/content"))
            .bearer_auth(self.bearer()?)
            .multipart(form.into_form()?)
            .send()?;
        parse(response)
    }

    pub fn update_content(&self, id: i32, form: ContentForm) -> Result<ContentRecord> {
        let response = self
            .http
            .put(self.url(&format!("/content/{id}")))
            .bearer_auth(self.bearer()?)
            .multipart(form.into_form()?)
            .send()?;
        parse(response)
    }

    pub fn delete_content(&self, id: i32) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/content/{id}")))
            .bearer_auth(self.bearer()?)
            .send()?;
        let _: serde_json::Value = parse(response)?;
        Ok(())
    }
}

fn load_token() -> Result<Option<String>> {
    let path = token_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let token = std::fs::read_to_string(&path)?;
    let token = token.trim();
    Ok((!token.is_empty()).then(|| token.to_string()))
}

fn save_token(token: &str) -> Result<()> {
    let path = token_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, token)?;
    restrict_permissions(&path);
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

/// Deserialize a successful response, or surface the server's error message.
fn parse<T: serde::de::DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T> {
    let status = response.status();
    let text = response.text()?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|e| e.message)
            .unwrap_or(text);
        bail!("{} ({status})", message);
    }

    serde_json::from_str(&text).with_context(|| format!("unexpected response body: {text}"))
}
