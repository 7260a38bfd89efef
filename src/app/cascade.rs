//! Dependent selection fetches for the compose and upload forms

use tracing::debug;

use noticetui::error::ApiResult;
use noticetui::logic::cascade::{CascadeField, CascadeOption, FetchRequest, SelectionCascade};
use noticetui::logic::conflicts::EntityKind;
use noticetui::logic::errors::format_error_message;
use noticetui::logic::navigation::{next_selection, prev_selection};
use noticetui::logic::ui::ToastKind;
use noticetui::services::{ApiRequest, CascadeScope};

use crate::App;

impl App {
    fn cascade_parts(
        &mut self,
        scope: CascadeScope,
    ) -> (&mut SelectionCascade, &mut [usize; 4]) {
        match scope {
            CascadeScope::Compose => {
                let form = &mut self.model.compose;
                (&mut form.cascade, &mut form.cascade_cursor)
            }
            CascadeScope::Upload => {
                let form = &mut self.model.upload;
                (&mut form.cascade, &mut form.cascade_cursor)
            }
        }
    }

    /// Send the fetches a cascade change asked for
    pub(crate) fn dispatch_fetches(&self, scope: CascadeScope, requests: Vec<FetchRequest>) {
        for request in requests {
            // Teacher rosters are filed under a department only
            if scope == CascadeScope::Upload
                && self.model.upload.kind == EntityKind::Teacher
                && request.field != CascadeField::Department
            {
                continue;
            }
            self.send(ApiRequest::FetchOptions { scope, request });
        }
    }

    /// Move the highlighted option of one field
    pub(crate) fn cascade_move(&mut self, scope: CascadeScope, field: CascadeField, forward: bool) {
        let (cascade, cursor) = self.cascade_parts(scope);
        let len = cascade.options(field).len();
        let current = Some(cursor[field.index()]).filter(|_| len > 0);
        let moved = if forward {
            next_selection(current, len)
        } else {
            prev_selection(current, len)
        };
        cursor[field.index()] = moved.unwrap_or(0);
    }

    /// Toggle the highlighted option
    pub(crate) fn cascade_toggle(&mut self, scope: CascadeScope, field: CascadeField) {
        let (cascade, cursor) = self.cascade_parts(scope);
        let Some(value) = cascade
            .options(field)
            .get(cursor[field.index()])
            .map(|o| o.value.clone())
        else {
            return;
        };
        let requests = cascade.toggle(field, &value);
        self.dispatch_fetches(scope, requests);
    }

    pub(crate) fn cascade_select_all(&mut self, scope: CascadeScope, field: CascadeField) {
        let (cascade, _) = self.cascade_parts(scope);
        let requests = cascade.select_all(field);
        self.dispatch_fetches(scope, requests);
    }

    /// Refetch the field whose last lookup failed
    pub(crate) fn cascade_retry(&mut self, scope: CascadeScope) {
        let (cascade, _) = self.cascade_parts(scope);
        let requests = cascade.retry();
        self.dispatch_fetches(scope, requests);
    }

    pub(crate) fn cascade_deselect_all(&mut self, scope: CascadeScope, field: CascadeField) {
        let (cascade, _) = self.cascade_parts(scope);
        let requests = cascade.deselect_all(field);
        self.dispatch_fetches(scope, requests);
    }

    /// Install fetched options; stale results are dropped by the cascade
    pub(crate) fn apply_cascade_options(
        &mut self,
        scope: CascadeScope,
        request: FetchRequest,
        options: ApiResult<Vec<CascadeOption>>,
    ) {
        let field = request.field;
        let (cascade, cursor) = self.cascade_parts(scope);
        match options {
            Ok(options) => {
                if cascade.apply_options(&request, options) {
                    cursor[field.index()] = 0;
                } else {
                    debug!(?field, "dropping stale options");
                }
            }
            Err(err) => {
                if cascade.apply_failure(&request) {
                    let message = format!(
                        "Could not load {}: {} (r to retry)",
                        field.label(),
                        format_error_message(&err)
                    );
                    self.toast(message, ToastKind::Error);
                }
            }
        }
    }
}
