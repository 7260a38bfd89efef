use std::collections::VecDeque;
use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::debug;

use crate::api::{
    CreateNoticeResponse, LoginResponse, MarkReadResponse, Notice, NoticeAnalytics, NoticeClient,
    NoticeDraft, NoticeReads, OverallAnalytics, User,
};
use crate::error::{ApiError, ApiResult};
use crate::logic::cascade::{CascadeOption, FetchRequest};
use crate::logic::conflicts::{ConflictRecord, EntityKind, UploadOutcome};
use crate::transport::Transport;

/// Priority level for API requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RequestPriority {
    High, // User-initiated actions (login, submit, open notice)
    Low,  // Counters, read receipts
}

/// Which form a cascade fetch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeScope {
    Compose,
    Upload,
}

/// API request types
#[derive(Debug, Clone)]
pub enum ApiRequest {
    Login {
        email: String,
        password: String,
    },
    Signup {
        name: String,
        email: String,
        password: String,
    },
    Logout,
    /// Check a stored session on startup
    CurrentUser,

    ListNotices,
    GetNotice {
        id: String,
    },
    MarkRead {
        id: String,
    },
    CreateNotice {
        draft: Box<NoticeDraft>,
        publish: bool,
    },
    DeleteNotice {
        id: String,
    },
    GetNoticeAnalytics {
        id: String,
    },
    GetNoticeReads {
        id: String,
    },
    GetOverallAnalytics,
    GetUsersCount,

    FetchOptions {
        scope: CascadeScope,
        request: FetchRequest,
    },

    BulkUpload {
        kind: EntityKind,
        fields: Vec<(String, String)>,
        file: PathBuf,
    },
    AddManual {
        kind: EntityKind,
        payload: serde_json::Map<String, serde_json::Value>,
    },
    UpdateManual {
        kind: EntityKind,
        key: String,
        payload: serde_json::Map<String, serde_json::Value>,
    },
    ApplyConflicts {
        kind: EntityKind,
        rows: Vec<ConflictRecord>,
    },
}

impl ApiRequest {
    fn priority(&self) -> RequestPriority {
        match self {
            ApiRequest::MarkRead { .. }
            | ApiRequest::GetOverallAnalytics
            | ApiRequest::GetUsersCount => RequestPriority::Low,
            _ => RequestPriority::High,
        }
    }
}

/// API response types
#[derive(Debug)]
pub enum ApiResponse {
    LoginResult(ApiResult<LoginResponse>),
    SignupResult(ApiResult<String>),
    LogoutResult(ApiResult<()>),
    CurrentUserResult(ApiResult<User>),

    NoticesResult(ApiResult<Vec<Notice>>),
    NoticeResult {
        id: String,
        notice: ApiResult<Notice>,
    },
    MarkReadResult {
        id: String,
        result: ApiResult<MarkReadResponse>,
    },
    CreateNoticeResult {
        publish: bool,
        result: ApiResult<CreateNoticeResponse>,
    },
    DeleteNoticeResult {
        id: String,
        result: ApiResult<String>,
    },
    NoticeAnalyticsResult {
        id: String,
        analytics: ApiResult<NoticeAnalytics>,
    },
    NoticeReadsResult {
        id: String,
        reads: ApiResult<NoticeReads>,
    },
    OverallAnalyticsResult(ApiResult<OverallAnalytics>),
    UsersCountResult(ApiResult<u64>),

    OptionsResult {
        scope: CascadeScope,
        request: FetchRequest,
        options: ApiResult<Vec<CascadeOption>>,
    },

    BulkUploadResult {
        kind: EntityKind,
        outcome: ApiResult<UploadOutcome>,
    },
    AddManualResult {
        kind: EntityKind,
        result: ApiResult<String>,
    },
    UpdateManualResult {
        kind: EntityKind,
        result: ApiResult<String>,
    },
    ApplyConflictsResult {
        kind: EntityKind,
        updated: Vec<String>,
        error: Option<ApiError>,
    },
}

impl ApiResponse {
    /// The error carried by this response, if any
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            ApiResponse::LoginResult(r) => r.as_ref().err(),
            ApiResponse::SignupResult(r) => r.as_ref().err(),
            ApiResponse::LogoutResult(r) => r.as_ref().err(),
            ApiResponse::CurrentUserResult(r) => r.as_ref().err(),
            ApiResponse::NoticesResult(r) => r.as_ref().err(),
            ApiResponse::NoticeResult { notice, .. } => notice.as_ref().err(),
            ApiResponse::MarkReadResult { result, .. } => result.as_ref().err(),
            ApiResponse::CreateNoticeResult { result, .. } => result.as_ref().err(),
            ApiResponse::DeleteNoticeResult { result, .. } => result.as_ref().err(),
            ApiResponse::NoticeAnalyticsResult { analytics, .. } => analytics.as_ref().err(),
            ApiResponse::NoticeReadsResult { reads, .. } => reads.as_ref().err(),
            ApiResponse::OverallAnalyticsResult(r) => r.as_ref().err(),
            ApiResponse::UsersCountResult(r) => r.as_ref().err(),
            ApiResponse::OptionsResult { options, .. } => options.as_ref().err(),
            ApiResponse::BulkUploadResult { outcome, .. } => outcome.as_ref().err(),
            ApiResponse::AddManualResult { result, .. } => result.as_ref().err(),
            ApiResponse::UpdateManualResult { result, .. } => result.as_ref().err(),
            ApiResponse::ApplyConflictsResult { error, .. } => error.as_ref(),
        }
    }
}

/// Internal message for tracking completed requests
enum InternalMessage {
    Completed,
}

/// Queue a request behind others of equal or higher priority
fn enqueue_by_priority(queue: &mut VecDeque<(ApiRequest, RequestPriority)>, request: ApiRequest) {
    let priority = request.priority();
    let insert_pos = queue
        .iter()
        .position(|(_, p)| *p > priority)
        .unwrap_or(queue.len());

    queue.insert(insert_pos, (request, priority));
}

/// API service worker that processes requests in the background
pub struct ApiService<T: Transport> {
    client: NoticeClient<T>,
    request_queue: VecDeque<(ApiRequest, RequestPriority)>,
    in_flight: usize,
    response_tx: mpsc::UnboundedSender<ApiResponse>,
    completion_tx: mpsc::UnboundedSender<InternalMessage>,
    max_concurrent: usize,
}

impl<T: Transport> ApiService<T> {
    fn new(
        client: NoticeClient<T>,
        response_tx: mpsc::UnboundedSender<ApiResponse>,
        completion_tx: mpsc::UnboundedSender<InternalMessage>,
    ) -> Self {
        Self {
            client,
            request_queue: VecDeque::new(),
            in_flight: 0,
            response_tx,
            completion_tx,
            max_concurrent: 6,
        }
    }

    fn enqueue(&mut self, request: ApiRequest) {
        enqueue_by_priority(&mut self.request_queue, request);
    }

    fn process_next(&mut self) {
        if self.in_flight >= self.max_concurrent {
            return;
        }

        let Some((request, _)) = self.request_queue.pop_front() else {
            return;
        };

        self.in_flight += 1;

        let client = self.client.clone();
        let response_tx = self.response_tx.clone();
        let completion_tx = self.completion_tx.clone();

        tokio::spawn(async move {
            let response = execute_request(&client, request).await;
            if let Some(err) = response.error() {
                debug!(error = %err, "api request failed");
            }
            let _ = response_tx.send(response);
            let _ = completion_tx.send(InternalMessage::Completed);
        });
    }
}

/// Execute an API request and return the response
pub async fn execute_request<T: Transport>(
    client: &NoticeClient<T>,
    request: ApiRequest,
) -> ApiResponse {
    match request {
        ApiRequest::Login { email, password } => {
            ApiResponse::LoginResult(client.login(&email, &password).await)
        }
        ApiRequest::Signup {
            name,
            email,
            password,
        } => ApiResponse::SignupResult(client.signup(&name, &email, &password).await),
        ApiRequest::Logout => ApiResponse::LogoutResult(client.logout().await),
        ApiRequest::CurrentUser => ApiResponse::CurrentUserResult(client.current_user().await),

        ApiRequest::ListNotices => ApiResponse::NoticesResult(client.list_notices().await),
        ApiRequest::GetNotice { id } => {
            let notice = client.get_notice(&id).await;
            ApiResponse::NoticeResult { id, notice }
        }
        ApiRequest::MarkRead { id } => {
            let result = client.mark_read(&id).await;
            ApiResponse::MarkReadResult { id, result }
        }
        ApiRequest::CreateNotice { draft, publish } => {
            let result = client.create_notice(&draft, publish).await;
            ApiResponse::CreateNoticeResult { publish, result }
        }
        ApiRequest::DeleteNotice { id } => {
            let result = client.delete_notice(&id).await;
            ApiResponse::DeleteNoticeResult { id, result }
        }
        ApiRequest::GetNoticeAnalytics { id } => {
            let analytics = client.notice_analytics(&id).await;
            ApiResponse::NoticeAnalyticsResult { id, analytics }
        }
        ApiRequest::GetNoticeReads { id } => {
            let reads = client.notice_reads(&id).await;
            ApiResponse::NoticeReadsResult { id, reads }
        }
        ApiRequest::GetOverallAnalytics => {
            ApiResponse::OverallAnalyticsResult(client.overall_analytics().await)
        }
        ApiRequest::GetUsersCount => ApiResponse::UsersCountResult(client.users_count().await),

        ApiRequest::FetchOptions { scope, request } => {
            let options = client.fetch_options(&request).await;
            ApiResponse::OptionsResult {
                scope,
                request,
                options,
            }
        }

        ApiRequest::BulkUpload { kind, fields, file } => {
            let outcome = client.bulk_upload(kind, fields, &file).await;
            ApiResponse::BulkUploadResult { kind, outcome }
        }
        ApiRequest::AddManual { kind, payload } => {
            let result = client.add_manual(kind, payload).await;
            ApiResponse::AddManualResult { kind, result }
        }
        ApiRequest::UpdateManual { kind, key, payload } => {
            let result = client.update_manual(kind, &key, payload).await;
            ApiResponse::UpdateManualResult { kind, result }
        }
        ApiRequest::ApplyConflicts { kind, rows } => {
            let (updated, error) = client.apply_conflict_updates(kind, rows).await;
            ApiResponse::ApplyConflictsResult {
                kind,
                updated,
                error,
            }
        }
    }
}

/// Spawn the API service worker
pub fn spawn_api_service<T: Transport>(
    client: NoticeClient<T>,
) -> (
    mpsc::UnboundedSender<ApiRequest>,
    mpsc::UnboundedReceiver<ApiResponse>,
) {
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ApiRequest>();
    let (response_tx, response_rx) = mpsc::unbounded_channel::<ApiResponse>();
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel::<InternalMessage>();

    tokio::spawn(async move {
        let mut service = ApiService::new(client, response_tx, completion_tx);
        let mut tick = interval(Duration::from_millis(10));

        loop {
            tokio::select! {
                request = request_rx.recv() => {
                    match request {
                        Some(request) => service.enqueue(request),
                        // UI side hung up; finish quietly
                        None => break,
                    }
                }

                Some(InternalMessage::Completed) = completion_rx.recv() => {
                    service.in_flight = service.in_flight.saturating_sub(1);
                }

                _ = tick.tick() => {
                    while !service.request_queue.is_empty()
                        && service.in_flight < service.max_concurrent
                    {
                        service.process_next();
                    }
                }
            }
        }
    });

    (request_tx, response_rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_priority_goes_behind_high() {
        let mut queue: VecDeque<(ApiRequest, RequestPriority)> = VecDeque::new();
        for request in [
            ApiRequest::GetUsersCount,
            ApiRequest::ListNotices,
            ApiRequest::MarkRead { id: "n1".into() },
            ApiRequest::GetNotice { id: "n2".into() },
        ] {
            enqueue_by_priority(&mut queue, request);
        }

        let order: Vec<RequestPriority> = queue.iter().map(|(_, p)| *p).collect();
        assert_eq!(
            order,
            vec![
                RequestPriority::High,
                RequestPriority::High,
                RequestPriority::Low,
                RequestPriority::Low
            ]
        );
        assert!(matches!(queue[0].0, ApiRequest::ListNotices));
        assert!(matches!(queue[1].0, ApiRequest::GetNotice { .. }));
        assert!(matches!(queue[2].0, ApiRequest::GetUsersCount));
    }

    #[test]
    fn test_response_error_accessor() {
        let ok = ApiResponse::UsersCountResult(Ok(3));
        assert!(ok.error().is_none());

        let failed = ApiResponse::ApplyConflictsResult {
            kind: EntityKind::Teacher,
            updated: vec![],
            error: Some(ApiError::SessionExpired),
        };
        assert_eq!(failed.error(), Some(&ApiError::SessionExpired));
    }
}
