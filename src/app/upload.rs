//! Roster upload, conflict review and single-record entry

use std::path::PathBuf;

use noticetui::logic::conflicts::EntityKind;
use noticetui::logic::errors::format_error_message;
use noticetui::logic::forms::{validate_manual_entry, validate_upload};
use noticetui::logic::navigation::{cycle_focus, next_selection, prev_selection};
use noticetui::logic::routing::Route;
use noticetui::logic::ui::ToastKind;
use noticetui::model::forms::{UploadForm, UploadMode};
use noticetui::services::{ApiRequest, CascadeScope};

use crate::App;

impl App {
    pub(crate) fn open_upload(&mut self) {
        if !self.model.session.is_admin() {
            return;
        }
        self.model.navigate(Route::Upload);
        self.reset_upload(self.model.upload.kind);
    }

    fn reset_upload(&mut self, kind: EntityKind) {
        self.model.upload = UploadForm::new(kind);
        let requests = self.model.upload.cascade.start();
        self.dispatch_fetches(CascadeScope::Upload, requests);
    }

    /// Students <-> teachers; the form starts over
    pub(crate) fn switch_upload_kind(&mut self) {
        if self.model.upload.busy {
            return;
        }
        let mode = self.model.upload.mode;
        self.reset_upload(self.model.upload.kind.toggle());
        self.model.upload.mode = mode;
    }

    pub(crate) fn toggle_upload_mode(&mut self) {
        let upload = &mut self.model.upload;
        upload.mode = match upload.mode {
            UploadMode::Bulk => UploadMode::Manual,
            UploadMode::Manual => UploadMode::Bulk,
        };
        upload.message = None;
    }

    pub(crate) fn submit_upload(&mut self) {
        let upload = &mut self.model.upload;
        if upload.busy {
            return;
        }
        let fields = upload.form_fields();
        let values: Vec<&str> = fields.iter().map(|(_, v)| v.as_str()).collect();
        if let Err(err) = validate_upload(&values, &upload.file_path) {
            upload.message = Some(format_error_message(&err));
            return;
        }

        let file = PathBuf::from(upload.file_path.trim());
        let kind = upload.kind;
        upload.busy = true;
        upload.message = None;
        upload.last_outcome = None;
        self.send(ApiRequest::BulkUpload { kind, fields, file });
    }

    pub(crate) fn review_move(&mut self, forward: bool) {
        let upload = &mut self.model.upload;
        let len = upload.review.as_ref().map(|r| r.len()).unwrap_or(0);
        upload.review_cursor = if forward {
            next_selection(upload.review_cursor, len)
        } else {
            prev_selection(upload.review_cursor, len)
        };
    }

    pub(crate) fn review_toggle(&mut self) {
        let upload = &mut self.model.upload;
        let (Some(review), Some(cursor)) = (upload.review.as_mut(), upload.review_cursor) else {
            return;
        };
        if let Some(key) = review.pending().get(cursor).map(|r| r.key.clone()) {
            review.toggle(&key);
        }
    }

    pub(crate) fn review_select_all(&mut self, select: bool) {
        if let Some(review) = self.model.upload.review.as_mut() {
            if select {
                review.select_all();
            } else {
                review.deselect_all();
            }
        }
    }

    /// Send the selected rows with the kind's update strategy
    pub(crate) fn review_update_selected(&mut self) {
        let upload = &mut self.model.upload;
        let Some(review) = upload.review.as_ref() else {
            return;
        };
        if upload.busy {
            return;
        }
        let rows = match review.selected_rows() {
            Ok(rows) => rows,
            Err(err) => {
                let message = format_error_message(&err);
                self.toast(message, ToastKind::Error);
                return;
            }
        };
        let kind = review.kind;
        upload.busy = true;
        self.send(ApiRequest::ApplyConflicts { kind, rows });
    }

    /// Forget the pending conflicts without touching the server
    pub(crate) fn review_discard(&mut self) {
        let upload = &mut self.model.upload;
        if let Some(review) = upload.review.as_mut() {
            review.discard();
        }
        upload.review = None;
        upload.review_cursor = None;
        upload.message = Some("Conflicting records discarded".to_string());
    }

    pub(crate) fn manual_cycle(&mut self, forward: bool) {
        let manual = &mut self.model.upload.manual;
        let mut next = cycle_focus(manual.focus, manual.values.len(), forward);
        // The key is fixed once we are updating an existing record
        if manual.update_mode && next == 0 {
            next = cycle_focus(next, manual.values.len(), forward);
        }
        manual.focus = next;
    }

    /// Add, or update when the server already knows the key
    pub(crate) fn submit_manual(&mut self) {
        let upload = &mut self.model.upload;
        if upload.busy {
            return;
        }
        let kind = upload.kind;
        let (key_field, key_label) = kind.manual_fields()[0];
        let key = upload.manual.value(kind, key_field).trim().to_string();
        let name = upload.manual.value(kind, "name").to_string();
        if let Err(err) = validate_manual_entry(key_label, &key, &name) {
            upload.message = Some(format_error_message(&err));
            return;
        }

        let payload = upload.manual.payload(kind);
        upload.busy = true;
        upload.message = None;
        let request = if upload.manual.update_mode {
            ApiRequest::UpdateManual { kind, key, payload }
        } else {
            ApiRequest::AddManual { kind, payload }
        };
        self.send(request);
    }
}
