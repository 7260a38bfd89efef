//! Shared fixtures for the integration tests: a scripted HTTP transport and
//! client builders wired to an in-memory session store.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use noticetui::api::NoticeClient;
use noticetui::auth::AuthClient;
use noticetui::error::ApiResult;
use noticetui::session::{Session, SessionStore};
use noticetui::transport::{HttpRequest, HttpResponse, Transport};

pub const BASE_URL: &str = "http://api.test";

type Handler = dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync;

/// Answers every request with a closure and records what was sent
pub struct ScriptedTransport {
    handler: Box<Handler>,
    log: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(handler: impl Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.log.lock().unwrap().clone()
    }

    /// Number of requests whose URL path (query excluded) ends with `suffix`
    pub fn count(&self, suffix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| path_of(&r.url).ends_with(suffix))
            .count()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        self.log.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        Ok((self.handler)(&request))
    }
}

pub fn path_of(url: &str) -> &str {
    let without_query = url.split('?').next().unwrap_or(url);
    without_query.strip_prefix(BASE_URL).unwrap_or(without_query)
}

pub fn json(status: u16, value: serde_json::Value) -> HttpResponse {
    HttpResponse::json(status, &value)
}

/// Client over `transport` with an optional pre-stored session
pub fn client_with(
    transport: ScriptedTransport,
    session: Option<Session>,
) -> (NoticeClient<ScriptedTransport>, Arc<ScriptedTransport>, Arc<SessionStore>) {
    let transport = Arc::new(transport);
    let store = Arc::new(SessionStore::in_memory().unwrap());
    if let Some(session) = session {
        store.save(&session).unwrap();
    }
    let auth = AuthClient::new(transport.clone(), store.clone(), BASE_URL);
    (NoticeClient::new(auth), transport, store)
}
