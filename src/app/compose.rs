//! The admin's new-notice form

use std::path::PathBuf;

use noticetui::api::Priority;
use noticetui::logic::errors::format_error_message;
use noticetui::logic::forms::{add_recipient, validate_notice};
use noticetui::logic::navigation::cycle_focus;
use noticetui::logic::notices::NOTICE_TYPES;
use noticetui::logic::routing::Route;
use noticetui::model::forms::{ComposeField, ComposeForm};
use noticetui::services::{ApiRequest, CascadeScope};

use crate::App;

impl App {
    /// Fresh form with departments loading
    pub(crate) fn open_compose(&mut self) {
        if !self.model.session.is_admin() {
            return;
        }
        self.model.compose = ComposeForm::default();
        self.model.navigate(Route::Compose);
        let requests = self.model.compose.cascade.start();
        self.dispatch_fetches(CascadeScope::Compose, requests);
    }

    /// Left/Right on a choice field
    pub(crate) fn compose_change_choice(&mut self, forward: bool) {
        let form = &mut self.model.compose;
        match form.focus {
            ComposeField::NoticeType => {
                form.notice_type = cycle_focus(form.notice_type, NOTICE_TYPES.len(), forward);
            }
            ComposeField::Priority => {
                let all = Priority::COMPOSE;
                let idx = all.iter().position(|p| *p == form.priority).unwrap_or(0);
                form.priority = all[cycle_focus(idx, all.len(), forward)];
            }
            ComposeField::SendEmail => form.send_email = !form.send_email,
            _ => {}
        }
    }

    /// Enter on the recipients field
    pub(crate) fn compose_add_recipient(&mut self) {
        let form = &mut self.model.compose;
        let raw = form.recipient_input.clone();
        match add_recipient(&mut form.recipients, &raw) {
            // Duplicates are dropped silently, like a fresh add
            Ok(_) => {
                form.recipient_input.clear();
                form.error = None;
            }
            Err(err) => form.error = Some(format_error_message(&err)),
        }
    }

    /// Backspace on an empty recipients input removes the last chip
    pub(crate) fn compose_remove_last_recipient(&mut self) {
        self.model.compose.recipients.pop();
    }

    /// Enter on the attachments field
    pub(crate) fn compose_add_attachment(&mut self) {
        let form = &mut self.model.compose;
        let raw = form.attachment_input.trim();
        if raw.is_empty() {
            return;
        }
        let path = PathBuf::from(raw);
        if !path.is_file() {
            form.error = Some(format!("File not found: {}", raw));
            return;
        }
        if !form.attachments.contains(&path) {
            form.attachments.push(path);
        }
        form.attachment_input.clear();
        form.error = None;
    }

    pub(crate) fn compose_remove_last_attachment(&mut self) {
        self.model.compose.attachments.pop();
    }

    /// Publish now, or keep as a draft
    pub(crate) fn submit_notice(&mut self, publish: bool) {
        let form = &mut self.model.compose;
        if form.submitting {
            return;
        }
        if let Err(err) = validate_notice(&form.title, &form.content) {
            form.error = Some(format_error_message(&err));
            return;
        }

        form.error = None;
        form.submitting = true;
        let draft = Box::new(form.to_draft());
        self.send(ApiRequest::CreateNotice { draft, publish });
    }
}
