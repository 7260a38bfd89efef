//! Integration tests for roster upload and conflict review
//!
//! Upload → conflicts come back → the admin selects some → updates are sent
//! with the kind's strategy → only the rows that failed stay pending.

mod common;

use std::path::PathBuf;

use common::{client_with, json, path_of, ScriptedTransport};
use noticetui::logic::conflicts::{ConflictRecord, ConflictReview, EntityKind};
use noticetui::session::Session;
use noticetui::transport::{FormValue, HttpRequest, HttpResponse, Method, RequestBody};
use serde_json::json;

fn session() -> Option<Session> {
    Some(Session::new("tok", Some("r1".to_string())))
}

fn student_server(req: &HttpRequest) -> HttpResponse {
    match (req.method, path_of(&req.url)) {
        (Method::Post, "/api/students/upload-details") => json(
            200,
            json!({
                "message": "Process complete. Successfully created 3 new students.",
                "conflicts": [
                    { "univ_roll_no": "R1", "name": "Ravi", "course": "B.Tech" },
                    { "univ_roll_no": "R2", "name": "Mina", "course": "B.Tech" },
                    { "univ_roll_no": "", "name": "Blank key" },
                    { "name": "No key" }
                ],
                "errors": ["Row 7: missing name"]
            }),
        ),
        (Method::Put, "/api/students/update-manual/R2") => {
            json(500, json!({ "error": "Database write failed" }))
        }
        (Method::Put, p) if p.starts_with("/api/students/update-manual/") => {
            json(200, json!({ "message": "Student updated" }))
        }
        _ => json(404, json!({ "error": "not found" })),
    }
}

fn roster_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("noticetui-{}-{}", std::process::id(), name));
    std::fs::write(&path, "univ_roll_no,name\nR1,Ravi\n").unwrap();
    path
}

#[tokio::test]
async fn test_bulk_upload_reports_conflicts_and_counts() {
    let (client, transport, _) = client_with(ScriptedTransport::new(student_server), session());
    let file = roster_file("students.csv");

    let fields = vec![
        ("department".to_string(), "Computer Science".to_string()),
        ("course".to_string(), "B.Tech".to_string()),
    ];
    let outcome = client
        .bulk_upload(EntityKind::Student, fields, &file)
        .await
        .unwrap();
    std::fs::remove_file(&file).ok();

    assert_eq!(outcome.inserted, Some(3));
    let keys: Vec<&str> = outcome.conflicts.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["R1", "R2"]);
    // Keyless conflicts are reported instead of reviewed
    assert_eq!(
        outcome.errors,
        vec![
            "Row 7: missing name".to_string(),
            "Row without univ_roll_no cannot be reviewed".to_string(),
            "Row without univ_roll_no cannot be reviewed".to_string(),
        ]
    );

    let requests = transport.requests();
    let RequestBody::Multipart(parts) = &requests[0].body else {
        panic!("upload must be multipart");
    };
    let department = FormValue::Text("Computer Science".into());
    assert!(parts
        .iter()
        .any(|(name, value)| name == "department" && *value == department));
    assert!(parts
        .iter()
        .any(|(name, value)| name == "file" && matches!(value, FormValue::File { .. })));
}

#[tokio::test]
async fn test_student_updates_go_row_by_row_and_keep_failures() {
    let (client, transport, _) = client_with(ScriptedTransport::new(student_server), session());
    let file = roster_file("students-partial.csv");
    let outcome = client
        .bulk_upload(EntityKind::Student, Vec::new(), &file)
        .await
        .unwrap();
    std::fs::remove_file(&file).ok();

    let mut review = ConflictReview::new(EntityKind::Student, outcome.conflicts);
    review.select_all();
    let rows = review.selected_rows().unwrap();

    let (updated, error) = client
        .apply_conflict_updates(EntityKind::Student, rows)
        .await;
    assert_eq!(updated, vec!["R1".to_string()]);
    assert_eq!(error.unwrap().to_string(), "Database write failed");
    assert_eq!(transport.count("/api/students/update-manual/R1"), 1);
    assert_eq!(transport.count("/api/students/update-manual/R2"), 1);

    review.apply_updated(&updated);
    assert_eq!(review.len(), 1);
    assert_eq!(review.pending()[0].key, "R2");
    assert!(review.is_selected("R2"), "failed row stays selected for a retry");
}

#[tokio::test]
async fn test_teacher_updates_go_in_one_batch() {
    let (client, transport, _) = client_with(
        ScriptedTransport::new(|req| match path_of(&req.url) {
            "/api/teachers/batch-update" => json(200, json!({ "message": "2 teachers updated" })),
            _ => json(404, json!({ "error": "not found" })),
        }),
        session(),
    );

    let conflicts = vec![
        json!({ "employee_id": "T1", "name": "Dr. Rao", "post": "Professor" }),
        json!({ "employee_id": "T2", "name": "Dr. Sen", "post": "Lecturer" }),
    ]
    .into_iter()
    .filter_map(|v| match v {
        serde_json::Value::Object(fields) => {
            ConflictRecord::from_fields(EntityKind::Teacher, fields)
        }
        _ => None,
    })
    .collect();

    let mut review = ConflictReview::new(EntityKind::Teacher, conflicts);
    review.select_all();
    let (updated, error) = client
        .apply_conflict_updates(EntityKind::Teacher, review.selected_rows().unwrap())
        .await;

    assert!(error.is_none());
    assert_eq!(updated, vec!["T1".to_string(), "T2".to_string()]);
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let RequestBody::Json(body) = &requests[0].body else {
        panic!("batch update must be json");
    };
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    review.apply_updated(&updated);
    assert!(review.is_empty());
}

#[tokio::test]
async fn test_failed_batch_keeps_every_row() {
    let (client, _, _) = client_with(
        ScriptedTransport::new(|_| json(500, json!({ "error": "Batch rejected" }))),
        session(),
    );
    let fields = match json!({ "employee_id": "T9", "name": "Dr. Iyer" }) {
        serde_json::Value::Object(fields) => fields,
        _ => unreachable!(),
    };
    let record = ConflictRecord::from_fields(EntityKind::Teacher, fields).unwrap();

    let mut review = ConflictReview::new(EntityKind::Teacher, vec![record]);
    review.select_all();
    let (updated, error) = client
        .apply_conflict_updates(EntityKind::Teacher, review.selected_rows().unwrap())
        .await;

    assert!(updated.is_empty());
    assert_eq!(error.unwrap().to_string(), "Batch rejected");
    review.apply_updated(&updated);
    assert_eq!(review.len(), 1);
}

#[test]
fn test_update_requires_a_selection() {
    let review = ConflictReview::new(EntityKind::Student, Vec::new());
    let err = review.selected_rows().unwrap_err();
    assert_eq!(err.to_string(), "Select at least one record to update");
}
