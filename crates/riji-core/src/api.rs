//! Remote diary API client.
//!
//! One method per endpoint; every call is a single HTTP exchange with no
//! retries. Failures are classified as transport errors, non-2xx statuses,
//! or application-level `error` codes, and always propagate to the caller.

use std::collections::HashMap;

use chrono::NaiveDate;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, LoginError, Result};
use crate::models::{DiaryEntry, EntryKind, Space};
use crate::session::Session;

/// Diary entry as the server sends it, before the client attaches its
/// authorship tag and read mark.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WireEntry {
    pub id: i64,
    pub user: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "createddate")]
    pub date: NaiveDate,
    #[serde(rename = "createdtime")]
    pub created_at: Option<i64>,
    #[serde(rename = "ts")]
    pub modified_at: i64,
    #[serde(default)]
    pub msg_count: i64,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub weather: String,
    #[serde(default)]
    pub space: Space,
}

impl WireEntry {
    /// Attach the client-side projections, producing a full [`DiaryEntry`].
    #[must_use]
    pub fn into_entry(self, kind: EntryKind, read_mark: Option<i64>) -> DiaryEntry {
        DiaryEntry {
            id: self.id,
            user: self.user,
            title: self.title,
            content: self.content,
            date: self.date,
            created_at: self.created_at,
            modified_at: self.modified_at,
            msg_count: self.msg_count,
            mood: self.mood,
            weather: self.weather,
            space: self.space,
            kind,
            read_mark,
        }
    }
}

/// Everything one `/api/v2/sync/` round-trip returns: own and paired
/// entries plus both read-mark maps, keyed by stringified entry id.
#[derive(Debug, Default, Deserialize)]
pub struct SyncSnapshot {
    #[serde(default)]
    pub diaries: Vec<WireEntry>,
    #[serde(default)]
    pub diaries_paired: Vec<WireEntry>,
    /// When the partner read each of the caller's entries
    #[serde(default)]
    pub read_marks: HashMap<String, i64>,
    /// When the caller read each of the partner's entries
    #[serde(default)]
    pub own_read_marks: HashMap<String, i64>,
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    #[serde(default)]
    token: String,
    #[serde(default)]
    userid: i64,
    #[serde(default)]
    error: i64,
}

#[derive(Debug, Deserialize)]
struct AllByIdsPayload {
    #[serde(default)]
    diaries: Vec<WireEntry>,
    #[serde(default)]
    error: i64,
}

#[derive(Debug, Deserialize)]
struct WritePayload {
    diary: Option<WireEntry>,
    #[serde(default)]
    error: i64,
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    #[serde(default)]
    error: i64,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref())?,
            client: Client::builder().build()?,
        })
    }

    /// `POST /api/login/` with an email/password form.
    ///
    /// The service signals a malformed email with HTTP 403 and `error: 1`;
    /// wrong password and unknown account come back as 200 with codes 2
    /// and 4.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        validate_credentials(email, password)?;

        let form = Form::new()
            .text("email", email.to_string())
            .text("password", password.to_string());
        let response = self
            .client
            .post(format!("{}/api/login/", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let payload = match serde_json::from_str::<LoginPayload>(&body) {
            Ok(payload) => payload,
            Err(error) if status.is_success() => return Err(error.into()),
            Err(_) => return Err(Error::Status(status.as_u16())),
        };

        classify_login(status, payload)
    }

    /// `POST /api/v2/sync/`: all own and paired entries plus read marks.
    pub async fn sync(&self, session: &Session) -> Result<SyncSnapshot> {
        let request = self
            .authed(session, self.client.post(format!("{}/api/v2/sync/", self.base_url)));
        expect_payload(request.send().await?).await
    }

    /// `POST /api/diary/all_by_ids/{user}/` for a single id; the list view
    /// carries full fields already, but selection re-fetches for freshness.
    pub async fn fetch_by_id(&self, session: &Session, user: i64, id: i64) -> Result<WireEntry> {
        let form = Form::new().text("diary_ids", id.to_string());
        let request = self
            .authed(
                session,
                self.client
                    .post(format!("{}/api/diary/all_by_ids/{user}/", self.base_url)),
            )
            .multipart(form);

        let payload: AllByIdsPayload = expect_payload(request.send().await?).await?;
        expect_ok(payload.error)?;
        payload
            .diaries
            .into_iter()
            .next()
            .ok_or(Error::EntryNotFound(id))
    }

    /// `POST /api/write/`: create or overwrite the entry for a date.
    pub async fn write(&self, session: &Session, entry: &DiaryEntry) -> Result<WireEntry> {
        let form = Form::new()
            .text("title", entry.title.clone())
            .text("content", entry.content.clone())
            .text("date", entry.date.format("%Y-%m-%d").to_string())
            .text("mood", entry.mood.clone())
            .text("weather", entry.weather.clone());
        let request = self
            .authed(session, self.client.post(format!("{}/api/write/", self.base_url)))
            .multipart(form);

        let payload: WritePayload = expect_payload(request.send().await?).await?;
        expect_ok(payload.error)?;
        payload.diary.ok_or_else(|| {
            Error::UnexpectedResponse("write response did not include a diary".to_string())
        })
    }

    /// `GET /api/diary/delete/{id}/`.
    pub async fn delete(&self, session: &Session, id: i64) -> Result<()> {
        let request = self.authed(
            session,
            self.client
                .get(format!("{}/api/diary/delete/{id}/", self.base_url)),
        );

        let payload: StatusPayload = expect_payload(request.send().await?).await?;
        expect_ok(payload.error)
    }

    /// `POST /api/update_read_mark/{id}/`: records that the caller viewed
    /// the entry. Best-effort from the service's point of view.
    pub async fn update_read_mark(&self, session: &Session, id: i64) -> Result<()> {
        let request = self
            .authed(
                session,
                self.client
                    .post(format!("{}/api/update_read_mark/{id}/", self.base_url)),
            )
            .multipart(Form::new());

        let payload: StatusPayload = expect_payload(request.send().await?).await?;
        expect_ok(payload.error)
    }

    fn authed(&self, session: &Session, request: RequestBuilder) -> RequestBuilder {
        request
            .header("auth", session.auth_header())
            .header("Accept", "application/json")
    }
}

fn classify_login(status: StatusCode, payload: LoginPayload) -> Result<Session> {
    if status == StatusCode::FORBIDDEN && payload.error == 1 {
        return Err(LoginError::MalformedEmail.into());
    }
    if !status.is_success() {
        return Err(Error::Status(status.as_u16()));
    }

    match payload.error {
        0 => Ok(Session::new(payload.token, payload.userid)),
        2 => Err(LoginError::WrongPassword.into()),
        4 => Err(LoginError::AccountNotFound.into()),
        code => Err(LoginError::Other(code).into()),
    }
}

async fn expect_payload<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status(status.as_u16()));
    }
    Ok(response.json::<T>().await?)
}

fn expect_ok(code: i64) -> Result<()> {
    if code == 0 {
        Ok(())
    } else {
        Err(Error::Api(code))
    }
}

pub fn normalize_base_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(
            "API base URL must not be empty".to_string(),
        ));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::InvalidInput(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(Error::InvalidInput("Email is required".to_string()));
    }
    if password.trim().is_empty() {
        return Err(Error::InvalidInput("Password is required".to_string()));
    }
    Ok(())
}
