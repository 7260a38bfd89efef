//! API Response Handler
//!
//! Applies responses from the background API worker to the model. A session
//! that could not be refreshed sends the user back to the login screen no
//! matter which request noticed it.

use tracing::{debug, warn};

use noticetui::error::ApiError;
use noticetui::logic::conflicts::ConflictReview;
use noticetui::logic::errors::{format_error_message, requires_login};
use noticetui::logic::routing::Route;
use noticetui::logic::ui::ToastKind;
use noticetui::model::forms::{ComposeForm, ManualEntryForm};
use noticetui::services::{ApiRequest, ApiResponse};

use crate::App;

/// Handle API response from background service
pub fn handle_api_response(app: &mut App, response: ApiResponse) {
    if let Some(err) = response.error() {
        if requires_login(err) && app.model.session.is_logged_in() {
            warn!("session expired, returning to login");
            app.model.expire_session(&err.to_string());
            return;
        }
    }

    match response {
        ApiResponse::LoginResult(result) => {
            app.model.login.submitting = false;
            match result {
                Ok(login) => app.on_signed_in(login.user),
                Err(err) => app.model.login.error = Some(format_error_message(&err)),
            }
        }

        ApiResponse::SignupResult(result) => {
            app.model.signup.submitting = false;
            match result {
                Ok(message) => {
                    let email = app.model.signup.email.trim().to_string();
                    app.model.signup = Default::default();
                    app.model.login.email = email;
                    app.model.ui.reset_route(Route::Login);
                    let text = if message.is_empty() {
                        "Account created. Please log in.".to_string()
                    } else {
                        message
                    };
                    app.toast(text, ToastKind::Success);
                }
                Err(err) => app.model.signup.error = Some(format_error_message(&err)),
            }
        }

        ApiResponse::LogoutResult(result) => {
            if let Err(err) = result {
                debug!(error = %err, "logout cleanup failed");
            }
        }

        ApiResponse::CurrentUserResult(result) => {
            app.model.login.submitting = false;
            match result {
                Ok(user) => app.on_signed_in(user),
                // Stored tokens were no good; stay on the login screen quietly
                Err(err) => debug!(error = %err, "stored session rejected"),
            }
        }

        ApiResponse::NoticesResult(result) => match result {
            Ok(notices) => app.model.notices.set_notices(notices),
            Err(err) => {
                app.model.notices.loading = false;
                app.toast(format_error_message(&err), ToastKind::Error);
            }
        },

        ApiResponse::NoticeResult { id, notice } => {
            // Ignore a detail that arrives after the user moved on
            let showing = app.model.notices.detail.as_ref().is_some_and(|n| n.id == id);
            if !showing {
                return;
            }
            app.model.notices.detail_loading = false;
            match notice {
                Ok(notice) => {
                    app.model.notices.detail = Some(notice);
                    app.model.notices.mark_read(&id);
                    app.send(ApiRequest::MarkRead { id });
                }
                Err(err) => app.toast(format_error_message(&err), ToastKind::Error),
            }
        }

        ApiResponse::MarkReadResult { id, result } => match result {
            Ok(receipt) => debug!(%id, new = receipt.is_new_read, "read receipt recorded"),
            // Receipts are best effort
            Err(err) => warn!(%id, error = %err, "read receipt failed"),
        },

        ApiResponse::CreateNoticeResult { publish, result } => {
            app.model.compose.submitting = false;
            match result {
                Ok(created) => {
                    let text = if !created.message.is_empty() {
                        created.message
                    } else if publish {
                        "Notice published".to_string()
                    } else {
                        "Draft saved".to_string()
                    };
                    app.model.compose = ComposeForm::default();
                    app.toast(text, ToastKind::Success);
                    if app.model.route() == Route::Compose {
                        app.model.ui.pop_route();
                    }
                    app.load_home();
                }
                Err(err) => app.model.compose.error = Some(format_error_message(&err)),
            }
        }

        ApiResponse::DeleteNoticeResult { id, result } => match result {
            Ok(_) => {
                app.model.notices.remove(&id);
                if app.model.route() == Route::NoticeDetail {
                    app.model.ui.pop_route();
                }
                app.toast("Notice deleted", ToastKind::Success);
                if app.model.route() == Route::AdminDashboard {
                    app.send(ApiRequest::GetOverallAnalytics);
                }
            }
            Err(err) => app.toast(format_error_message(&err), ToastKind::Error),
        },

        ApiResponse::NoticeAnalyticsResult { id, analytics } => {
            if app.model.notices.analytics_for.as_deref() != Some(id.as_str()) {
                return;
            }
            match analytics {
                Ok(analytics) => app.model.notices.analytics = Some(analytics),
                Err(err) => app.toast(format_error_message(&err), ToastKind::Error),
            }
        }

        ApiResponse::NoticeReadsResult { id, reads } => {
            if app.model.notices.analytics_for.as_deref() != Some(id.as_str()) {
                return;
            }
            match reads {
                Ok(reads) => {
                    app.model.notices.reads_selection = None;
                    app.model.notices.reads = Some(reads);
                }
                Err(err) => app.toast(format_error_message(&err), ToastKind::Error),
            }
        }

        ApiResponse::OverallAnalyticsResult(result) => match result {
            Ok(overall) => app.model.dashboard.total_notices = Some(overall.total_notices),
            Err(err) => warn!(error = %err, "overall analytics failed"),
        },

        ApiResponse::UsersCountResult(result) => match result {
            Ok(count) => app.model.dashboard.users_count = Some(count),
            Err(err) => warn!(error = %err, "users count failed"),
        },

        ApiResponse::OptionsResult {
            scope,
            request,
            options,
        } => app.apply_cascade_options(scope, request, options),

        ApiResponse::BulkUploadResult { kind, outcome } => {
            let upload = &mut app.model.upload;
            if upload.kind != kind {
                return;
            }
            upload.busy = false;
            match outcome {
                Ok(outcome) => {
                    let conflicts = outcome.conflicts.clone();
                    upload.message = Some(outcome.message.clone());
                    upload.last_outcome = Some(outcome);
                    if conflicts.is_empty() {
                        upload.review = None;
                        upload.review_cursor = None;
                    } else {
                        upload.review_cursor = Some(0);
                        upload.review = Some(ConflictReview::new(kind, conflicts));
                    }
                }
                Err(err) => upload.message = Some(format_error_message(&err)),
            }
        }

        ApiResponse::AddManualResult { kind, result } => {
            let upload = &mut app.model.upload;
            if upload.kind != kind {
                return;
            }
            upload.busy = false;
            match result {
                Ok(message) => {
                    upload.manual = ManualEntryForm::new(kind);
                    upload.message = Some(message);
                }
                Err(ApiError::Conflict { message, existing }) => {
                    // Offer to update the record the server already has
                    upload.manual.prefill(kind, &existing);
                    upload.manual.update_mode = true;
                    upload.manual.focus = 1;
                    upload.message = Some(format!("{} Press ^S to update it.", message));
                }
                Err(err) => upload.message = Some(format_error_message(&err)),
            }
        }

        ApiResponse::UpdateManualResult { kind, result } => {
            let upload = &mut app.model.upload;
            if upload.kind != kind {
                return;
            }
            upload.busy = false;
            match result {
                Ok(message) => {
                    upload.manual = ManualEntryForm::new(kind);
                    upload.message = Some(message);
                }
                Err(err) => upload.message = Some(format_error_message(&err)),
            }
        }

        ApiResponse::ApplyConflictsResult {
            kind,
            updated,
            error,
        } => {
            let upload = &mut app.model.upload;
            upload.busy = false;
            let Some(review) = upload.review.as_mut().filter(|r| r.kind == kind) else {
                return;
            };
            review.apply_updated(&updated);
            let remaining = review.len();
            upload.review_cursor = if remaining == 0 {
                None
            } else {
                upload.review_cursor.map(|c| c.min(remaining - 1))
            };
            if remaining == 0 {
                upload.review = None;
            }

            match error {
                None => {
                    upload.message = Some(format!("Updated {} record(s)", updated.len()));
                }
                Some(err) => {
                    upload.message = Some(format!(
                        "Updated {} record(s); {}",
                        updated.len(),
                        format_error_message(&err)
                    ));
                }
            }
        }
    }
}
