//! Authenticated request helper
//!
//! Every authenticated call goes through [`AuthClient::send`]: attach the
//! stored bearer token, and on a 401 perform one refresh-token exchange and
//! one retry. Refreshes are serialized so that concurrent 401s share a single
//! exchange.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;
use crate::transport::{HttpRequest, HttpResponse, Transport};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

pub struct AuthClient<T: Transport> {
    transport: Arc<T>,
    store: Arc<SessionStore>,
    base_url: String,
    refresh_lock: Mutex<()>,
}

impl<T: Transport> AuthClient<T> {
    pub fn new(transport: Arc<T>, store: Arc<SessionStore>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            store,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Send without any Authorization header (login, signup)
    pub async fn send_unauthenticated(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        self.transport.send(request).await
    }

    /// Send an authenticated request.
    ///
    /// Returns the response only when it is 2xx; every other outcome is an
    /// `ApiError`. At most one refresh exchange and one retry happen per call.
    pub async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let sent_token = self.store.load()?.map(|s| s.access_token);

        let response = self.send_with_token(&request, sent_token.as_deref()).await?;
        if response.status != 401 {
            return Self::check(response);
        }

        debug!(url = %request.url, "401 received, refreshing access token");
        let token = self.refresh_access_token(sent_token.as_deref()).await?;

        let retried = self.send_with_token(&request, Some(&token)).await?;
        if retried.status == 401 {
            warn!(url = %request.url, "still unauthorized after refresh, dropping session");
            self.store.clear()?;
            return Err(ApiError::SessionExpired);
        }
        Self::check(retried)
    }

    async fn send_with_token(
        &self,
        request: &HttpRequest,
        token: Option<&str>,
    ) -> ApiResult<HttpResponse> {
        let request = match token {
            Some(token) => request.clone().with_bearer(token),
            None => request.clone(),
        };
        self.transport.send(request).await
    }

    fn check(response: HttpResponse) -> ApiResult<HttpResponse> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_status(response.status, &response.body))
        }
    }

    /// Obtain a fresh access token after `stale` was rejected.
    ///
    /// If another caller already replaced `stale` while we waited for the
    /// lock, the stored token is reused and no exchange is made.
    async fn refresh_access_token(&self, stale: Option<&str>) -> ApiResult<String> {
        let _guard = self.refresh_lock.lock().await;

        let Some(session) = self.store.load()? else {
            return Err(ApiError::SessionExpired);
        };

        if Some(session.access_token.as_str()) != stale {
            debug!("access token already refreshed by another request");
            return Ok(session.access_token);
        }

        let Some(refresh_token) = session.refresh_token.clone() else {
            info!("no refresh token stored, session expired");
            self.store.clear()?;
            return Err(ApiError::SessionExpired);
        };

        let request = HttpRequest::post(format!("{}/api/auth/refresh", self.base_url))
            .json(serde_json::json!({ "refreshToken": refresh_token }));
        let response = self.transport.send(request).await?;

        let refreshed = if response.is_success() {
            serde_json::from_slice::<RefreshResponse>(&response.body).ok()
        } else {
            None
        };

        let Some(refreshed) = refreshed else {
            warn!(status = response.status, "token refresh rejected");
            self.store.clear()?;
            return Err(ApiError::SessionExpired);
        };

        match refreshed.refresh_token {
            Some(rotated) => {
                let mut updated = session;
                updated.access_token = refreshed.access_token.clone();
                updated.refresh_token = Some(rotated);
                self.store.save(&updated)?;
            }
            None => {
                self.store.replace_access_token(&refreshed.access_token)?;
            }
        }

        info!("access token refreshed");
        Ok(refreshed.access_token)
    }
}
