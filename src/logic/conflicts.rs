//! Bulk upload conflict review
//!
//! A roster upload creates the new rows and hands back the rows whose natural
//! key already exists. Those are held here until the admin either pushes them
//! as updates or discards them.

use serde_json::{Map, Value};

use crate::error::ApiError;

/// Which roster an upload or manual entry targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Student,
    Teacher,
}

/// How selected conflicts are written back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStrategy {
    /// One update request per row; each row succeeds or fails on its own
    PerRow,
    /// One request carrying every row; all succeed or none do
    Batch,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Student => "Students",
            EntityKind::Teacher => "Teachers",
        }
    }

    pub fn path_segment(self) -> &'static str {
        match self {
            EntityKind::Student => "students",
            EntityKind::Teacher => "teachers",
        }
    }

    /// Field holding the natural key
    pub fn key_field(self) -> &'static str {
        match self {
            EntityKind::Student => "univ_roll_no",
            EntityKind::Teacher => "employee_id",
        }
    }

    pub fn update_strategy(self) -> UpdateStrategy {
        match self {
            EntityKind::Student => UpdateStrategy::PerRow,
            EntityKind::Teacher => UpdateStrategy::Batch,
        }
    }

    /// Columns shown in the review table, key first
    pub fn review_columns(self) -> &'static [&'static str] {
        match self {
            EntityKind::Student => &[
                "univ_roll_no",
                "name",
                "course",
                "year",
                "section",
                "official_email",
            ],
            EntityKind::Teacher => &[
                "employee_id",
                "name",
                "post",
                "specialization",
                "official_email",
            ],
        }
    }

    /// Fields of the manual entry form as (json key, label)
    pub fn manual_fields(self) -> &'static [(&'static str, &'static str)] {
        match self {
            EntityKind::Student => &[
                ("univ_roll_no", "University Roll No"),
                ("name", "Name"),
                ("department", "Department"),
                ("course", "Course"),
                ("year", "Year"),
                ("section", "Section"),
                ("class_roll_no", "Class Roll No"),
                ("father_name", "Father's Name"),
                ("student_mobile", "Student Mobile"),
                ("father_mobile", "Father's Mobile"),
                ("official_email", "Email"),
            ],
            EntityKind::Teacher => &[
                ("employee_id", "Employee ID"),
                ("name", "Name"),
                ("department", "Department"),
                ("post", "Post"),
                ("specialization", "Specialization"),
                ("mobile", "Mobile"),
                ("official_email", "Email"),
            ],
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            EntityKind::Student => EntityKind::Teacher,
            EntityKind::Teacher => EntityKind::Student,
        }
    }
}

/// Render a JSON scalar the way it should appear in a table cell
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// An uploaded row whose key already exists on the server
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictRecord {
    pub key: String,
    pub fields: Map<String, Value>,
}

impl ConflictRecord {
    /// Returns None when the row has no usable key
    pub fn from_fields(kind: EntityKind, fields: Map<String, Value>) -> Option<Self> {
        let key = fields.get(kind.key_field()).map(value_text)?;
        if key.trim().is_empty() {
            return None;
        }
        Some(Self { key, fields })
    }

    pub fn field(&self, name: &str) -> String {
        self.fields.get(name).map(value_text).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UploadOutcome {
    pub message: String,
    /// Count parsed from the server message, when it reports one
    pub inserted: Option<u64>,
    pub conflicts: Vec<ConflictRecord>,
    pub errors: Vec<String>,
}

impl UploadOutcome {
    pub fn new(message: String, conflicts: Vec<ConflictRecord>, errors: Vec<Value>) -> Self {
        Self {
            inserted: parse_inserted_count(&message),
            message,
            conflicts,
            errors: errors.iter().map(value_text).collect(),
        }
    }
}

/// Pull N out of "... Successfully created N new students."
///
/// # Examples
/// ```
/// use noticetui::logic::conflicts::parse_inserted_count;
///
/// assert_eq!(
///     parse_inserted_count("Process complete. Successfully created 12 new students."),
///     Some(12)
/// );
/// assert_eq!(parse_inserted_count("No new students were added."), None);
/// ```
pub fn parse_inserted_count(message: &str) -> Option<u64> {
    let lower = message.to_lowercase();
    let rest = &lower[lower.find("created")? + "created".len()..];
    rest.split_whitespace().next()?.parse().ok()
}

/// Pending conflicts and the admin's selection over them
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictReview {
    pub kind: EntityKind,
    pending: Vec<ConflictRecord>,
    /// Selected keys, in selection order
    selected: Vec<String>,
}

impl ConflictReview {
    pub fn new(kind: EntityKind, conflicts: Vec<ConflictRecord>) -> Self {
        Self {
            kind,
            pending: conflicts,
            selected: Vec::new(),
        }
    }

    pub fn pending(&self) -> &[ConflictRecord] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.iter().any(|k| k == key)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn toggle(&mut self, key: &str) {
        if let Some(pos) = self.selected.iter().position(|k| k == key) {
            self.selected.remove(pos);
        } else if self.pending.iter().any(|r| r.key == key) {
            self.selected.push(key.to_string());
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.pending.iter().map(|r| r.key.clone()).collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Rows to send for "update selected"; an empty selection is rejected
    pub fn selected_rows(&self) -> Result<Vec<ConflictRecord>, ApiError> {
        if self.selected.is_empty() {
            return Err(ApiError::Validation(
                "Select at least one record to update".to_string(),
            ));
        }
        Ok(self
            .pending
            .iter()
            .filter(|r| self.is_selected(&r.key))
            .cloned()
            .collect())
    }

    /// Drop the rows that were updated; failed rows stay pending and selected
    pub fn apply_updated(&mut self, updated: &[String]) {
        self.pending.retain(|r| !updated.contains(&r.key));
        self.selected.retain(|k| !updated.contains(k));
    }

    /// Forget every pending row without contacting the server
    pub fn discard(&mut self) {
        self.pending.clear();
        self.selected.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(kind: EntityKind, key: &str) -> ConflictRecord {
        let mut fields = Map::new();
        fields.insert(kind.key_field().to_string(), json!(key));
        fields.insert("name".to_string(), json!(format!("Name {}", key)));
        ConflictRecord::from_fields(kind, fields).unwrap()
    }

    fn review(n: usize) -> ConflictReview {
        let rows = (1..=n)
            .map(|i| record(EntityKind::Student, &format!("R{}", i)))
            .collect();
        ConflictReview::new(EntityKind::Student, rows)
    }

    #[test]
    fn test_n_conflicts_become_n_pending_rows() {
        assert_eq!(review(3).len(), 3);
    }

    #[test]
    fn test_discard_empties_pending() {
        let mut r = review(3);
        r.toggle("R1");
        r.discard();
        assert!(r.is_empty());
        assert_eq!(r.selected_count(), 0);
    }

    #[test]
    fn test_empty_selection_is_validation_error() {
        let r = review(2);
        assert!(matches!(r.selected_rows(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_selected_rows_follow_pending_order() {
        let mut r = review(3);
        r.toggle("R3");
        r.toggle("R1");
        let keys: Vec<String> = r.selected_rows().unwrap().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["R1".to_string(), "R3".to_string()]);
    }

    #[test]
    fn test_apply_updated_removes_only_successful_rows() {
        let mut r = review(3);
        r.select_all();
        r.apply_updated(&["R1".to_string(), "R3".to_string()]);

        assert_eq!(r.len(), 1);
        assert_eq!(r.pending()[0].key, "R2");
        assert!(r.is_selected("R2"));
        assert_eq!(r.selected_count(), 1);
    }

    #[test]
    fn test_toggle_unknown_key_is_ignored() {
        let mut r = review(1);
        r.toggle("nope");
        assert_eq!(r.selected_count(), 0);
    }

    #[test]
    fn test_select_all_then_deselect_all() {
        let mut r = review(4);
        r.select_all();
        assert_eq!(r.selected_count(), 4);
        r.deselect_all();
        assert_eq!(r.selected_count(), 0);
    }

    #[test]
    fn test_record_without_key_is_skipped() {
        let mut fields = Map::new();
        fields.insert("name".to_string(), json!("Nobody"));
        assert!(ConflictRecord::from_fields(EntityKind::Teacher, fields).is_none());
    }

    #[test]
    fn test_numeric_key_is_stringified() {
        let mut fields = Map::new();
        fields.insert("employee_id".to_string(), json!(1042));
        let r = ConflictRecord::from_fields(EntityKind::Teacher, fields).unwrap();
        assert_eq!(r.key, "1042");
    }

    #[test]
    fn test_strategy_by_kind() {
        assert_eq!(EntityKind::Student.update_strategy(), UpdateStrategy::PerRow);
        assert_eq!(EntityKind::Teacher.update_strategy(), UpdateStrategy::Batch);
    }

    #[test]
    fn test_outcome_parses_count_and_errors() {
        let outcome = UploadOutcome::new(
            "Process complete. Successfully created 5 new teachers.".to_string(),
            vec![],
            vec![json!("Row 4: Skipped. Missing Employee ID.")],
        );
        assert_eq!(outcome.inserted, Some(5));
        assert_eq!(outcome.errors, vec!["Row 4: Skipped. Missing Employee ID.".to_string()]);
    }
}
