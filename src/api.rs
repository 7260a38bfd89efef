use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::auth::AuthClient;
use crate::error::{ApiError, ApiResult};
use crate::logic::cascade::{CascadeField, CascadeOption, FetchRequest};
use crate::logic::conflicts::{ConflictRecord, EntityKind, UpdateStrategy, UploadOutcome};
use crate::session::Session;
use crate::transport::{FormValue, HttpRequest, Method, Transport};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    /// Levels the compose form offers; each has its own form label
    pub const COMPOSE: [Priority; 3] = [Priority::Medium, Priority::High, Priority::Critical];

    /// Parse a priority label, accepting the compose-form labels as well
    pub fn parse(raw: &str) -> Priority {
        match raw.trim().to_lowercase().as_str() {
            "low" => Priority::Low,
            "medium" | "normal" => Priority::Medium,
            "high" | "urgent" => Priority::High,
            "critical" | "highly urgent" => Priority::Critical,
            _ => Priority::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    /// Label the server's compose endpoint stores. Low has no form label of
    /// its own and is sent as its plain name.
    pub fn form_label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "Normal",
            Priority::High => "Urgent",
            Priority::Critical => "Highly Urgent",
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| Priority::parse(&s)).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoticeStatus {
    Draft,
    #[default]
    Published,
    Scheduled,
}

impl NoticeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeStatus::Draft => "draft",
            NoticeStatus::Published => "published",
            NoticeStatus::Scheduled => "scheduled",
        }
    }
}

impl<'de> Deserialize<'de> for NoticeStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(match raw.to_lowercase().as_str() {
            "draft" => NoticeStatus::Draft,
            "scheduled" => NoticeStatus::Scheduled,
            _ => NoticeStatus::Published,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Creator {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// `createdBy` is an object on most endpoints and a bare id on older ones
fn deserialize_creator<'de, D>(deserializer: D) -> Result<Option<Creator>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Full(Creator),
        Id(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Full(c)) => Some(c),
        Some(Raw::Id(id)) => Some(Creator {
            id,
            ..Creator::default()
        }),
        None => None,
    })
}

/// Accept `"CSE"`, `["CSE", "ECE"]` or null
fn deserialize_string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::One(s)) if s.trim().is_empty() => Vec::new(),
        Some(Raw::One(s)) => vec![s],
        Some(Raw::Many(v)) => v,
        None => Vec::new(),
    })
}

/// Treat null as an empty vector
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, alias = "notice_type")]
    pub notice_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_or_list")]
    pub departments: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_string_or_list")]
    pub program_course: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_string_or_list")]
    pub year: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_string_or_list")]
    pub section: Vec<String>,
    #[serde(default)]
    pub status: NoticeStatus,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<String>,
    #[serde(default, alias = "created_by", deserialize_with = "deserialize_creator")]
    pub created_by: Option<Creator>,
    #[serde(default, alias = "recipient_emails", deserialize_with = "deserialize_null_default")]
    pub recipient_emails: Vec<String>,
    #[serde(default)]
    pub read_count: u64,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub attachments: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeAnalytics {
    #[serde(default)]
    pub recipient_count: u64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: NoticeStatus,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub attachments_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReadRecord {
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub read_count: u64,
    #[serde(default)]
    pub last_read: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NoticeReads {
    #[serde(default)]
    pub total_reads: u64,
    #[serde(default)]
    pub unique_readers: u64,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub reads: Vec<ReadRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallAnalytics {
    #[serde(default)]
    pub total_notices: u64,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_new_read: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoticeResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub notice_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
struct NamedCode {
    name: String,
    #[serde(default)]
    code: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    message: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    conflicts: Vec<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    errors: Vec<serde_json::Value>,
}

/// Everything the compose form submits
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoticeDraft {
    pub title: String,
    pub subject: String,
    pub content: String,
    pub notice_type: String,
    pub priority: Priority,
    /// Department names (not codes)
    pub departments: Vec<String>,
    pub courses: Vec<String>,
    pub years: Vec<String>,
    pub sections: Vec<String>,
    pub recipient_emails: Vec<String>,
    pub send_email: bool,
    pub attachments: Vec<PathBuf>,
}

/// Typed client for the notice REST API
pub struct NoticeClient<T: Transport> {
    auth: Arc<AuthClient<T>>,
}

impl<T: Transport> Clone for NoticeClient<T> {
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
        }
    }
}

impl<T: Transport> NoticeClient<T> {
    pub fn new(auth: AuthClient<T>) -> Self {
        Self {
            auth: Arc::new(auth),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.auth.base_url(), path)
    }

    async fn get_json<R: serde::de::DeserializeOwned>(&self, path: &str) -> ApiResult<R> {
        self.auth
            .send(HttpRequest::get(self.url(path)))
            .await?
            .into_result()
    }

    // ---------------------------------------------------------------
    // Session
    // ---------------------------------------------------------------

    /// Previously stored session, if any
    pub fn stored_session(&self) -> ApiResult<Option<Session>> {
        self.auth.store().load()
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let request = HttpRequest::post(self.url("/api/auth/login"))
            .json(serde_json::json!({ "email": email, "password": password }));
        let login: LoginResponse = self.auth.send_unauthenticated(request).await?.into_result()?;

        let mut session = Session::new(login.access_token.clone(), login.refresh_token.clone());
        session.role = Some(login.user.role.clone());
        session.user_name = Some(login.user.name.clone());
        self.auth.store().save(&session)?;

        debug!(role = %login.user.role, "logged in");
        Ok(login)
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> ApiResult<String> {
        let request = HttpRequest::post(self.url("/api/auth/signup")).json(serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
        }));
        let response: MessageResponse =
            self.auth.send_unauthenticated(request).await?.into_result()?;
        Ok(response.message)
    }

    /// Tell the server, then drop local tokens regardless of the outcome
    pub async fn logout(&self) -> ApiResult<()> {
        if let Err(e) = self
            .auth
            .send(HttpRequest::post(self.url("/api/auth/logout")))
            .await
        {
            warn!(error = %e, "logout request failed, clearing session anyway");
        }
        self.auth.store().clear()
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        self.get_json("/api/auth/current-user").await
    }

    // ---------------------------------------------------------------
    // Notices
    // ---------------------------------------------------------------

    pub async fn list_notices(&self) -> ApiResult<Vec<Notice>> {
        self.get_json("/api/notices").await
    }

    pub async fn get_notice(&self, id: &str) -> ApiResult<Notice> {
        self.get_json(&format!("/api/notices/{}", urlencoding::encode(id)))
            .await
    }

    pub async fn mark_read(&self, id: &str) -> ApiResult<MarkReadResponse> {
        let url = self.url(&format!("/api/notices/{}/read", urlencoding::encode(id)));
        self.auth.send(HttpRequest::post(url)).await?.into_result()
    }

    pub async fn delete_notice(&self, id: &str) -> ApiResult<String> {
        let url = self.url(&format!("/api/notices/{}", urlencoding::encode(id)));
        let response: MessageResponse = self
            .auth
            .send(HttpRequest::new(Method::Delete, url))
            .await?
            .into_result()?;
        Ok(response.message)
    }

    pub async fn notice_analytics(&self, id: &str) -> ApiResult<NoticeAnalytics> {
        self.get_json(&format!("/api/notices/{}/analytics", urlencoding::encode(id)))
            .await
    }

    pub async fn notice_reads(&self, id: &str) -> ApiResult<NoticeReads> {
        self.get_json(&format!("/api/notices/{}/reads", urlencoding::encode(id)))
            .await
    }

    pub async fn overall_analytics(&self) -> ApiResult<OverallAnalytics> {
        self.get_json("/api/notices/analytics").await
    }

    pub async fn users_count(&self) -> ApiResult<u64> {
        let response: CountResponse = self.get_json("/api/users/count").await?;
        Ok(response.count)
    }

    pub async fn create_notice(
        &self,
        draft: &NoticeDraft,
        publish: bool,
    ) -> ApiResult<CreateNoticeResponse> {
        let status = if publish { "published" } else { "draft" };
        let to_json = |v: &Vec<String>| serde_json::to_string(v).unwrap_or_else(|_| "[]".into());

        let mut parts = vec![
            ("title".to_string(), FormValue::Text(draft.title.clone())),
            ("subject".to_string(), FormValue::Text(draft.subject.clone())),
            ("content".to_string(), FormValue::Text(draft.content.clone())),
            ("noticeType".to_string(), FormValue::Text(draft.notice_type.clone())),
            (
                "priority".to_string(),
                FormValue::Text(draft.priority.form_label().to_string()),
            ),
            ("status".to_string(), FormValue::Text(status.to_string())),
            ("departments".to_string(), FormValue::Text(to_json(&draft.departments))),
            ("courses".to_string(), FormValue::Text(to_json(&draft.courses))),
            ("years".to_string(), FormValue::Text(to_json(&draft.years))),
            ("sections".to_string(), FormValue::Text(to_json(&draft.sections))),
            (
                "recipient_emails".to_string(),
                FormValue::Text(to_json(&draft.recipient_emails)),
            ),
            (
                "send_options".to_string(),
                FormValue::Text(
                    serde_json::json!({ "email": draft.send_email, "web": true }).to_string(),
                ),
            ),
        ];

        for path in &draft.attachments {
            parts.push(("attachments".to_string(), read_file_part(path).await?));
        }

        let request = HttpRequest::post(self.url("/api/notices")).multipart(parts);
        self.auth.send(request).await?.into_result()
    }

    // ---------------------------------------------------------------
    // Cascade lookups
    // ---------------------------------------------------------------

    /// Fetch the option list for one cascade field given its upstream selections
    pub async fn fetch_options(&self, request: &FetchRequest) -> ApiResult<Vec<CascadeOption>> {
        match request.field {
            CascadeField::Department => {
                let departments: Vec<NamedCode> = self.get_json("/api/departments").await?;
                Ok(departments
                    .into_iter()
                    .map(|d| CascadeOption::new(d.code, d.name))
                    .collect())
            }
            CascadeField::Course => {
                let courses: Vec<NamedCode> = if let [single] = request.departments.as_slice() {
                    let path = format!(
                        "/api/departments/{}/courses",
                        urlencoding::encode(&single.value)
                    );
                    self.get_json(&path).await?
                } else {
                    let codes: Vec<&str> =
                        request.departments.iter().map(|d| d.value.as_str()).collect();
                    let req = HttpRequest::post(self.url("/api/courses-by-departments"))
                        .json(serde_json::json!({ "departments": codes }));
                    self.auth.send(req).await?.into_result()?
                };
                Ok(courses
                    .into_iter()
                    .map(|c| CascadeOption::new(c.name.clone(), c.name))
                    .collect())
            }
            CascadeField::Year | CascadeField::Section => {
                let base = if request.field == CascadeField::Year {
                    "/api/years"
                } else {
                    "/api/sections"
                };
                let values: Vec<String> =
                    self.get_json(&format!("{}{}", base, request.query_string())).await?;
                Ok(values
                    .into_iter()
                    .map(|v| CascadeOption::new(v.clone(), v))
                    .collect())
            }
        }
    }

    // ---------------------------------------------------------------
    // Students / teachers
    // ---------------------------------------------------------------

    /// Upload a CSV/Excel roster. `fields` are the form fields besides the file.
    pub async fn bulk_upload(
        &self,
        kind: EntityKind,
        fields: Vec<(String, String)>,
        file: &Path,
    ) -> ApiResult<UploadOutcome> {
        let mut parts: Vec<(String, FormValue)> = fields
            .into_iter()
            .map(|(k, v)| (k, FormValue::Text(v)))
            .collect();
        parts.push(("file".to_string(), read_file_part(file).await?));

        let url = self.url(&format!("/api/{}/upload-details", kind.path_segment()));
        let response: UploadResponse = self
            .auth
            .send(HttpRequest::post(url).multipart(parts))
            .await?
            .into_result()?;

        let mut errors = response.errors;
        let mut conflicts = Vec::new();
        for fields in response.conflicts {
            match ConflictRecord::from_fields(kind, fields) {
                Some(record) => conflicts.push(record),
                None => {
                    let message = format!("Row without {} cannot be reviewed", kind.key_field());
                    warn!(%message, "dropping keyless conflict row");
                    errors.push(serde_json::Value::String(message));
                }
            }
        }

        Ok(UploadOutcome::new(response.message, conflicts, errors))
    }

    pub async fn add_manual(
        &self,
        kind: EntityKind,
        payload: serde_json::Map<String, serde_json::Value>,
    ) -> ApiResult<String> {
        let url = self.url(&format!("/api/{}/add-manual", kind.path_segment()));
        let response: MessageResponse = self
            .auth
            .send(HttpRequest::post(url).json(serde_json::Value::Object(payload)))
            .await?
            .into_result()?;
        Ok(response.message)
    }

    pub async fn update_manual(
        &self,
        kind: EntityKind,
        key: &str,
        payload: serde_json::Map<String, serde_json::Value>,
    ) -> ApiResult<String> {
        let url = self.url(&format!(
            "/api/{}/update-manual/{}",
            kind.path_segment(),
            urlencoding::encode(key)
        ));
        let response: MessageResponse = self
            .auth
            .send(HttpRequest::put(url).json(serde_json::Value::Object(payload)))
            .await?
            .into_result()?;
        Ok(response.message)
    }

    pub async fn batch_update_teachers(&self, rows: Vec<ConflictRecord>) -> ApiResult<String> {
        let body: Vec<serde_json::Value> = rows
            .into_iter()
            .map(|r| serde_json::Value::Object(r.fields))
            .collect();
        let request = HttpRequest::post(self.url("/api/teachers/batch-update"))
            .json(serde_json::Value::Array(body));
        let response: MessageResponse = self.auth.send(request).await?.into_result()?;
        Ok(response.message)
    }

    /// Push the selected conflict rows back to the server.
    ///
    /// Returns the keys that were updated and the first error seen, if any.
    pub async fn apply_conflict_updates(
        &self,
        kind: EntityKind,
        rows: Vec<ConflictRecord>,
    ) -> (Vec<String>, Option<ApiError>) {
        match kind.update_strategy() {
            UpdateStrategy::PerRow => {
                let mut updated = Vec::new();
                let mut first_error = None;
                for row in rows {
                    match self.update_manual(kind, &row.key, row.fields.clone()).await {
                        Ok(_) => updated.push(row.key),
                        Err(e) => {
                            warn!(key = %row.key, error = %e, "conflict update failed");
                            first_error.get_or_insert(e);
                        }
                    }
                }
                (updated, first_error)
            }
            UpdateStrategy::Batch => {
                let keys: Vec<String> = rows.iter().map(|r| r.key.clone()).collect();
                match self.batch_update_teachers(rows).await {
                    Ok(_) => (keys, None),
                    Err(e) => (Vec::new(), Some(e)),
                }
            }
        }
    }
}

async fn read_file_part(path: &Path) -> ApiResult<FormValue> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        ApiError::Validation(format!("Could not read {}: {}", path.display(), e))
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());
    Ok(FormValue::File { file_name, bytes })
}
