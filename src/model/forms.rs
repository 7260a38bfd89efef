//! Form state
//!
//! Plain data behind the login, signup, compose and upload screens. Editing
//! and validation live in handlers and `logic::forms`; nothing here does I/O.

use std::path::PathBuf;

use crate::api::{NoticeDraft, Priority};
use crate::logic::cascade::{CascadeField, SelectionCascade};
use crate::logic::conflicts::{ConflictReview, EntityKind, UploadOutcome};
use crate::logic::navigation::cycle_focus;
use crate::logic::notices::NOTICE_TYPES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus_password: bool,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginForm {
    pub fn focus(&self) -> LoginField {
        if self.focus_password {
            LoginField::Password
        } else {
            LoginField::Email
        }
    }

    pub fn focused_text(&mut self) -> &mut String {
        if self.focus_password {
            &mut self.password
        } else {
            &mut self.email
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupField {
    Name,
    Email,
    Password,
    Confirm,
}

impl SignupField {
    pub const ALL: [SignupField; 4] = [
        SignupField::Name,
        SignupField::Email,
        SignupField::Password,
        SignupField::Confirm,
    ];
}

#[derive(Clone, Debug)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub focus: SignupField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl Default for SignupForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm: String::new(),
            focus: SignupField::Name,
            error: None,
            submitting: false,
        }
    }
}

impl SignupForm {
    pub fn focused_text(&mut self) -> &mut String {
        match self.focus {
            SignupField::Name => &mut self.name,
            SignupField::Email => &mut self.email,
            SignupField::Password => &mut self.password,
            SignupField::Confirm => &mut self.confirm,
        }
    }

    pub fn cycle(&mut self, forward: bool) {
        let idx = SignupField::ALL.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = SignupField::ALL[cycle_focus(idx, SignupField::ALL.len(), forward)];
    }
}

/// Focusable parts of the compose form, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeField {
    Title,
    Subject,
    Content,
    NoticeType,
    Priority,
    Target(CascadeField),
    Recipients,
    Attachments,
    SendEmail,
}

impl ComposeField {
    pub const ORDER: [ComposeField; 12] = [
        ComposeField::Title,
        ComposeField::Subject,
        ComposeField::Content,
        ComposeField::NoticeType,
        ComposeField::Priority,
        ComposeField::Target(CascadeField::Department),
        ComposeField::Target(CascadeField::Course),
        ComposeField::Target(CascadeField::Year),
        ComposeField::Target(CascadeField::Section),
        ComposeField::Recipients,
        ComposeField::Attachments,
        ComposeField::SendEmail,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ComposeField::Title => "Title",
            ComposeField::Subject => "Subject",
            ComposeField::Content => "Notice body",
            ComposeField::NoticeType => "Type",
            ComposeField::Priority => "Priority",
            ComposeField::Target(f) => f.label(),
            ComposeField::Recipients => "Recipient emails",
            ComposeField::Attachments => "Attachments",
            ComposeField::SendEmail => "Send email",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ComposeForm {
    pub title: String,
    pub subject: String,
    pub content: String,
    pub notice_type: usize,
    pub priority: Priority,
    /// Multi-select targeting
    pub cascade: SelectionCascade,
    /// Highlighted option per cascade field
    pub cascade_cursor: [usize; 4],
    pub recipient_input: String,
    pub recipients: Vec<String>,
    pub attachment_input: String,
    pub attachments: Vec<PathBuf>,
    pub send_email: bool,
    pub focus: ComposeField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl Default for ComposeForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            subject: String::new(),
            content: String::new(),
            notice_type: 0,
            priority: Priority::Medium,
            cascade: SelectionCascade::new(true),
            cascade_cursor: [0; 4],
            recipient_input: String::new(),
            recipients: Vec::new(),
            attachment_input: String::new(),
            attachments: Vec::new(),
            send_email: false,
            focus: ComposeField::Title,
            error: None,
            submitting: false,
        }
    }
}

impl ComposeForm {
    pub fn notice_type_label(&self) -> &'static str {
        NOTICE_TYPES[self.notice_type % NOTICE_TYPES.len()]
    }

    pub fn cycle(&mut self, forward: bool) {
        let order = ComposeField::ORDER;
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[cycle_focus(idx, order.len(), forward)];
    }

    /// Text buffer behind the focused field, if it takes typing
    pub fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            ComposeField::Title => Some(&mut self.title),
            ComposeField::Subject => Some(&mut self.subject),
            ComposeField::Content => Some(&mut self.content),
            ComposeField::Recipients => Some(&mut self.recipient_input),
            ComposeField::Attachments => Some(&mut self.attachment_input),
            _ => None,
        }
    }

    /// Everything the server needs, with targeting sent by name
    pub fn to_draft(&self) -> NoticeDraft {
        NoticeDraft {
            title: self.title.trim().to_string(),
            subject: self.subject.trim().to_string(),
            content: self.content.clone(),
            notice_type: self.notice_type_label().to_string(),
            priority: self.priority,
            departments: self.cascade.selected_labels(CascadeField::Department),
            courses: self.cascade.selected_labels(CascadeField::Course),
            years: self.cascade.selected_labels(CascadeField::Year),
            sections: self.cascade.selected_labels(CascadeField::Section),
            recipient_emails: self.recipients.clone(),
            send_email: self.send_email,
            attachments: self.attachments.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    Bulk,
    Manual,
}

/// Focusable parts of the bulk upload form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadField {
    Target(CascadeField),
    File,
    Review,
}

impl UploadField {
    /// Tab order for a roster kind; teachers only pick a department
    pub fn order(kind: EntityKind) -> Vec<UploadField> {
        let targets: &[CascadeField] = match kind {
            EntityKind::Student => &CascadeField::ALL,
            EntityKind::Teacher => &[CascadeField::Department],
        };
        let mut order: Vec<UploadField> = targets.iter().map(|f| UploadField::Target(*f)).collect();
        order.push(UploadField::File);
        order.push(UploadField::Review);
        order
    }
}

/// Single-record add/update form
#[derive(Clone, Debug)]
pub struct ManualEntryForm {
    pub values: Vec<String>,
    pub focus: usize,
    /// Set after the server reported the key already exists
    pub update_mode: bool,
}

impl ManualEntryForm {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            values: vec![String::new(); kind.manual_fields().len()],
            focus: 0,
            update_mode: false,
        }
    }

    pub fn payload(&self, kind: EntityKind) -> serde_json::Map<String, serde_json::Value> {
        kind.manual_fields()
            .iter()
            .zip(&self.values)
            .map(|((key, _), value)| {
                (key.to_string(), serde_json::Value::String(value.trim().to_string()))
            })
            .collect()
    }

    pub fn value(&self, kind: EntityKind, key: &str) -> &str {
        kind.manual_fields()
            .iter()
            .position(|(k, _)| *k == key)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Copy fields of an existing server record into the empty slots
    pub fn prefill(&mut self, kind: EntityKind, existing: &serde_json::Value) {
        for (i, (key, _)) in kind.manual_fields().iter().enumerate() {
            // Students keep their department under "branch"
            let value = existing
                .get(*key)
                .or_else(|| (*key == "department").then(|| existing.get("branch")).flatten());
            if let (Some(value), Some(slot)) = (value, self.values.get_mut(i)) {
                if slot.trim().is_empty() {
                    *slot = crate::logic::conflicts::value_text(value);
                }
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct UploadForm {
    pub kind: EntityKind,
    pub mode: UploadMode,
    /// Single-select cohort for the roster
    pub cascade: SelectionCascade,
    pub cascade_cursor: [usize; 4],
    pub file_path: String,
    pub focus: UploadField,
    pub review: Option<ConflictReview>,
    pub review_cursor: Option<usize>,
    pub last_outcome: Option<UploadOutcome>,
    pub manual: ManualEntryForm,
    pub message: Option<String>,
    pub busy: bool,
}

impl UploadForm {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            mode: UploadMode::Bulk,
            cascade: SelectionCascade::new(false),
            cascade_cursor: [0; 4],
            file_path: String::new(),
            focus: UploadField::Target(CascadeField::Department),
            review: None,
            review_cursor: None,
            last_outcome: None,
            manual: ManualEntryForm::new(kind),
            message: None,
            busy: false,
        }
    }

    pub fn cycle(&mut self, forward: bool) {
        let order = UploadField::order(self.kind);
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[cycle_focus(idx, order.len(), forward)];
    }

    /// Cohort form fields sent alongside the file
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let first = |field: CascadeField| {
            self.cascade
                .selected_labels(field)
                .into_iter()
                .next()
                .unwrap_or_default()
        };

        let mut fields = vec![("department".to_string(), first(CascadeField::Department))];
        if self.kind == EntityKind::Student {
            fields.push(("course".to_string(), first(CascadeField::Course)));
            fields.push(("year".to_string(), first(CascadeField::Year)));
            fields.push(("section".to_string(), first(CascadeField::Section)));
        }
        fields
    }
}

impl Default for UploadForm {
    fn default() -> Self {
        Self::new(EntityKind::Student)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::cascade::CascadeOption;

    #[test]
    fn test_compose_tab_order_wraps() {
        let mut form = ComposeForm::default();
        form.cycle(false);
        assert_eq!(form.focus, ComposeField::SendEmail);
        form.cycle(true);
        assert_eq!(form.focus, ComposeField::Title);
    }

    #[test]
    fn test_compose_draft_uses_department_names() {
        let mut form = ComposeForm::default();
        form.title = "  Holiday  ".to_string();
        let req = form.cascade.start().remove(0);
        form.cascade.apply_options(
            &req,
            vec![CascadeOption::new("CSE", "Computer Science")],
        );
        form.cascade.toggle(CascadeField::Department, "CSE");

        let draft = form.to_draft();
        assert_eq!(draft.title, "Holiday");
        assert_eq!(draft.departments, vec!["Computer Science".to_string()]);
        assert_eq!(draft.notice_type, "Academic");
    }

    #[test]
    fn test_teacher_upload_skips_cohort_fields() {
        let order = UploadField::order(EntityKind::Teacher);
        assert_eq!(
            order,
            vec![
                UploadField::Target(CascadeField::Department),
                UploadField::File,
                UploadField::Review
            ]
        );
        let form = UploadForm::new(EntityKind::Teacher);
        assert_eq!(form.form_fields().len(), 1);
    }

    #[test]
    fn test_manual_prefill_maps_branch_to_department() {
        let mut form = ManualEntryForm::new(EntityKind::Student);
        form.values[0] = "2101".to_string();
        form.prefill(
            EntityKind::Student,
            &serde_json::json!({"univ_roll_no": "9999", "name": "Ravi", "branch": "CSE"}),
        );

        assert_eq!(form.value(EntityKind::Student, "univ_roll_no"), "2101");
        assert_eq!(form.value(EntityKind::Student, "name"), "Ravi");
        assert_eq!(form.value(EntityKind::Student, "department"), "CSE");
    }

    #[test]
    fn test_manual_payload_trims_values() {
        let mut form = ManualEntryForm::new(EntityKind::Teacher);
        form.values[0] = " T7 ".to_string();
        let payload = form.payload(EntityKind::Teacher);
        assert_eq!(payload["employee_id"], "T7");
        assert_eq!(payload.len(), EntityKind::Teacher.manual_fields().len());
    }
}
