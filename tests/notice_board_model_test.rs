//! Integration tests for the application model
//!
//! These tests walk the model through a user's session:
//! 1. Signing in lands on the role's home screen
//! 2. Filters and read tracking shape what the list shows
//! 3. Session expiry wipes everything and returns to login

use noticetui::api::{Notice, Priority, User};
use noticetui::logic::notices::cycle_priority_filter;
use noticetui::model::Model;
use noticetui::{Role, Route};

fn user(role: &str) -> User {
    User {
        id: "u1".into(),
        name: "Asha".into(),
        email: "asha@uni.edu".into(),
        role: role.into(),
    }
}

fn notice(id: &str, title: &str, priority: Priority) -> Notice {
    Notice {
        id: id.into(),
        title: title.into(),
        priority,
        ..Notice::default()
    }
}

fn board() -> Vec<Notice> {
    vec![
        notice("n1", "Library hours", Priority::Low),
        notice("n2", "Exam schedule", Priority::High),
        notice("n3", "Fee deadline", Priority::Critical),
    ]
}

#[test]
fn test_user_session_lands_on_home_and_cannot_reach_admin_screens() {
    let mut model = Model::new(false);
    model.session.sign_in(user("user"));
    model.go_home();
    assert_eq!(model.session.role, Some(Role::User));
    assert_eq!(model.route(), Route::UserHome);

    for route in [Route::Compose, Route::Upload, Route::Analytics, Route::AdminDashboard] {
        model.navigate(route);
        assert_eq!(model.route(), Route::UserHome, "{:?} must redirect home", route);
    }

    model.navigate(Route::NoticeDetail);
    assert_eq!(model.route(), Route::NoticeDetail);
    assert!(model.ui.pop_route());
    assert_eq!(model.route(), Route::UserHome);
}

#[test]
fn test_admin_session_reaches_every_screen() {
    let mut model = Model::new(false);
    model.session.sign_in(user("admin"));
    model.go_home();
    assert_eq!(model.route(), Route::AdminDashboard);

    model.navigate(Route::Upload);
    assert_eq!(model.route(), Route::Upload);
}

#[test]
fn test_priority_filter_and_read_tracking() {
    let mut model = Model::new(false);
    model.notices.set_notices(board());
    assert_eq!(model.notices.counts().unread, 3);
    assert_eq!(model.notices.counts().urgent, 2);

    model.notices.mark_read("n2");
    assert!(model.notices.is_read("n2"));
    assert_eq!(model.notices.counts().unread, 2);

    // None → Low → Medium → High
    let mut priority = None;
    for _ in 0..3 {
        priority = cycle_priority_filter(priority);
    }
    model.notices.filter.priority = priority;
    model.notices.apply_filter();
    assert_eq!(model.notices.selected_notice().map(|n| n.id.as_str()), Some("n2"));
    assert_eq!(model.notices.visible.len(), 1);
}

#[test]
fn test_search_keeps_selection_in_range() {
    let mut model = Model::new(false);
    model.notices.set_notices(board());
    model.notices.selection = Some(2);

    model.notices.filter.query = "exam".into();
    model.notices.apply_filter();
    assert_eq!(model.notices.visible, vec![1]);
    assert_eq!(model.notices.selection, Some(0));
}

#[test]
fn test_session_expiry_resets_everything() {
    let mut model = Model::new(true);
    model.session.sign_in(user("admin"));
    model.go_home();
    model.notices.set_notices(board());
    model.notices.mark_read("n1");

    model.expire_session("Session expired. Please login again.");

    assert_eq!(model.route(), Route::Login);
    assert!(!model.session.is_logged_in());
    assert!(model.notices.visible.is_empty());
    assert!(!model.notices.is_read("n1"));
    assert_eq!(
        model.login.error.as_deref(),
        Some("Session expired. Please login again.")
    );
    assert!(model.ui.vim_mode, "preferences survive sign-out");
}
