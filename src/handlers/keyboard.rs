//! Keyboard Input Handler
//!
//! Dialogs get the first look at every key, then the current screen. Form
//! screens take plain characters as text, so their commands use Ctrl.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use noticetui::logic::cascade::CascadeField;
use noticetui::logic::routing::Route;
use noticetui::model::forms::{ComposeField, UploadField, UploadMode};
use noticetui::services::CascadeScope;

use crate::app::notices::Movement;
use crate::App;

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// Type into or delete from a text buffer. Returns false if the key is not an edit.
fn edit_text(text: &mut String, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            text.push(c);
            true
        }
        KeyCode::Backspace => {
            text.pop();
            true
        }
        _ => false,
    }
}

/// List movement for a key, honoring vim bindings
fn movement(key: &KeyEvent, vim_mode: bool) -> Option<Movement> {
    match key.code {
        KeyCode::Down => Some(Movement::Next),
        KeyCode::Up => Some(Movement::Prev),
        KeyCode::Home => Some(Movement::First),
        KeyCode::End => Some(Movement::Last),
        KeyCode::Char('j') if vim_mode => Some(Movement::Next),
        KeyCode::Char('k') if vim_mode => Some(Movement::Prev),
        KeyCode::Char('g') if vim_mode => Some(Movement::First),
        KeyCode::Char('G') if vim_mode => Some(Movement::Last),
        _ => None,
    }
}

/// Handle keyboard input
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if is_ctrl(&key, 'c') {
        app.model.ui.should_quit = true;
        return;
    }

    // Dialogs swallow every key while open
    if app.model.ui.show_help {
        app.model.ui.show_help = false;
        return;
    }
    if app.model.ui.confirm_delete.is_some() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.model.ui.confirm_delete = None;
            }
            _ => {}
        }
        return;
    }
    if app.model.ui.confirm_logout {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                app.model.ui.confirm_logout = false;
                app.logout();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.model.ui.confirm_logout = false;
            }
            _ => {}
        }
        return;
    }

    match app.model.route() {
        Route::Login => handle_login_key(app, key),
        Route::Signup => handle_signup_key(app, key),
        Route::Compose => handle_compose_key(app, key),
        Route::Upload => handle_upload_key(app, key),
        Route::AdminDashboard
        | Route::NoticeList
        | Route::UserHome
        | Route::NoticeDetail
        | Route::Analytics => handle_browse_key(app, key),
    }
}

fn handle_login_key(app: &mut App, key: KeyEvent) {
    if is_ctrl(&key, 'n') {
        app.open_signup();
        return;
    }
    let form = &mut app.model.login;
    match key.code {
        KeyCode::Esc => app.model.ui.should_quit = true,
        KeyCode::Enter => app.submit_login(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            form.focus_password = !form.focus_password;
        }
        _ => {
            if !form.submitting {
                edit_text(form.focused_text(), &key);
            }
        }
    }
}

fn handle_signup_key(app: &mut App, key: KeyEvent) {
    let form = &mut app.model.signup;
    match key.code {
        KeyCode::Esc => {
            if !app.model.ui.pop_route() {
                app.model.ui.reset_route(Route::Login);
            }
        }
        KeyCode::Enter => app.submit_signup(),
        KeyCode::Tab | KeyCode::Down => form.cycle(true),
        KeyCode::BackTab | KeyCode::Up => form.cycle(false),
        _ => {
            if !form.submitting {
                edit_text(form.focused_text(), &key);
            }
        }
    }
}

fn handle_browse_key(app: &mut App, key: KeyEvent) {
    let route = app.model.route();
    let is_list = matches!(route, Route::AdminDashboard | Route::NoticeList | Route::UserHome);

    if app.model.ui.search_mode {
        match key.code {
            KeyCode::Down => app.move_selection(Movement::Next),
            KeyCode::Up => app.move_selection(Movement::Prev),
            KeyCode::Esc => app.end_search(false),
            KeyCode::Enter => app.end_search(true),
            KeyCode::Backspace => app.search_backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.search_input(c)
            }
            _ => {}
        }
        return;
    }

    if let Some(m) = movement(&key, app.model.ui.vim_mode) {
        app.move_selection(m);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.model.ui.should_quit = true,
        KeyCode::Char('?') => app.model.ui.show_help = true,
        KeyCode::Char('L') => app.request_logout(),
        KeyCode::Char('r') => app.load_home(),
        KeyCode::Esc => {
            if app.model.notices.filter.is_active() && is_list {
                app.model.notices.filter = Default::default();
                app.model.notices.apply_filter();
            } else {
                app.model.ui.pop_route();
            }
        }

        KeyCode::Enter if is_list => app.open_selected_notice(),
        KeyCode::Char('/') if is_list => app.start_search(),
        KeyCode::Char('p') if is_list => app.cycle_priority_filter(),
        KeyCode::Char('t') if is_list => app.cycle_type_filter(),

        // Admin actions; each one checks the role itself
        KeyCode::Char('d') | KeyCode::Delete if route != Route::Analytics => app.request_delete(),
        KeyCode::Char('a') if route != Route::Analytics => app.open_analytics(),
        KeyCode::Char('c') if route == Route::AdminDashboard => app.open_compose(),
        KeyCode::Char('u') if route == Route::AdminDashboard => app.open_upload(),
        KeyCode::Char('n') if route == Route::AdminDashboard => app.open_notice_list(),
        _ => {}
    }
}

fn handle_compose_key(app: &mut App, key: KeyEvent) {
    if is_ctrl(&key, 's') {
        app.submit_notice(true);
        return;
    }
    if is_ctrl(&key, 'd') {
        app.submit_notice(false);
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.model.ui.pop_route();
            return;
        }
        KeyCode::Tab => {
            app.model.compose.cycle(true);
            return;
        }
        KeyCode::BackTab => {
            app.model.compose.cycle(false);
            return;
        }
        _ => {}
    }

    let focus = app.model.compose.focus;
    match focus {
        ComposeField::Title | ComposeField::Subject => {
            if key.code == KeyCode::Enter {
                app.model.compose.cycle(true);
            } else if let Some(text) = app.model.compose.focused_text() {
                edit_text(text, &key);
            }
        }
        ComposeField::Content => {
            if key.code == KeyCode::Enter {
                app.model.compose.content.push('\n');
            } else {
                edit_text(&mut app.model.compose.content, &key);
            }
        }
        ComposeField::Recipients => match key.code {
            KeyCode::Enter => app.compose_add_recipient(),
            KeyCode::Backspace if app.model.compose.recipient_input.is_empty() => {
                app.compose_remove_last_recipient()
            }
            _ => {
                edit_text(&mut app.model.compose.recipient_input, &key);
            }
        },
        ComposeField::Attachments => match key.code {
            KeyCode::Enter => app.compose_add_attachment(),
            KeyCode::Backspace if app.model.compose.attachment_input.is_empty() => {
                app.compose_remove_last_attachment()
            }
            _ => {
                edit_text(&mut app.model.compose.attachment_input, &key);
            }
        },
        ComposeField::NoticeType | ComposeField::Priority | ComposeField::SendEmail => {
            match key.code {
                KeyCode::Left => app.compose_change_choice(false),
                KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') => {
                    app.compose_change_choice(true)
                }
                _ => {}
            }
        }
        ComposeField::Target(field) => handle_cascade_key(app, CascadeScope::Compose, field, &key),
    }
}

/// Keys shared by every cascade picker
fn handle_cascade_key(app: &mut App, scope: CascadeScope, field: CascadeField, key: &KeyEvent) {
    match movement(key, app.model.ui.vim_mode) {
        Some(Movement::Next) => return app.cascade_move(scope, field, true),
        Some(Movement::Prev) => return app.cascade_move(scope, field, false),
        _ => {}
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => app.cascade_toggle(scope, field),
        KeyCode::Char('a') => app.cascade_select_all(scope, field),
        KeyCode::Char('n') => app.cascade_deselect_all(scope, field),
        KeyCode::Char('r') => app.cascade_retry(scope),
        _ => {}
    }
}

fn handle_upload_key(app: &mut App, key: KeyEvent) {
    if is_ctrl(&key, 't') {
        app.switch_upload_kind();
        return;
    }
    if is_ctrl(&key, 'o') {
        app.toggle_upload_mode();
        return;
    }
    if is_ctrl(&key, 's') {
        match app.model.upload.mode {
            UploadMode::Bulk => app.submit_upload(),
            UploadMode::Manual => app.submit_manual(),
        }
        return;
    }
    if key.code == KeyCode::Esc {
        app.model.ui.pop_route();
        return;
    }

    match app.model.upload.mode {
        UploadMode::Bulk => handle_bulk_upload_key(app, key),
        UploadMode::Manual => handle_manual_entry_key(app, key),
    }
}

fn handle_bulk_upload_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => return app.model.upload.cycle(true),
        KeyCode::BackTab => return app.model.upload.cycle(false),
        _ => {}
    }

    match app.model.upload.focus {
        UploadField::Target(field) => handle_cascade_key(app, CascadeScope::Upload, field, &key),
        UploadField::File => {
            if key.code == KeyCode::Enter {
                app.submit_upload();
            } else {
                edit_text(&mut app.model.upload.file_path, &key);
            }
        }
        UploadField::Review => match key.code {
            KeyCode::Down => app.review_move(true),
            KeyCode::Up => app.review_move(false),
            KeyCode::Char('j') if app.model.ui.vim_mode => app.review_move(true),
            KeyCode::Char('k') if app.model.ui.vim_mode => app.review_move(false),
            KeyCode::Char(' ') | KeyCode::Enter => app.review_toggle(),
            KeyCode::Char('a') => app.review_select_all(true),
            KeyCode::Char('n') => app.review_select_all(false),
            KeyCode::Char('u') => app.review_update_selected(),
            KeyCode::Char('x') => app.review_discard(),
            _ => {}
        },
    }
}

fn handle_manual_entry_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::Enter => app.manual_cycle(true),
        KeyCode::BackTab | KeyCode::Up => app.manual_cycle(false),
        _ => {
            let manual = &mut app.model.upload.manual;
            // The key field is locked while updating
            if manual.update_mode && manual.focus == 0 {
                return;
            }
            if let Some(value) = manual.values.get_mut(manual.focus) {
                edit_text(value, &key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::handle_api_response;
    use noticetui::api::{Notice, Priority, User};
    use noticetui::logic::cascade::CascadeOption;
    use noticetui::services::{ApiRequest, ApiResponse};
    use tokio::sync::mpsc;

    fn app() -> (App, mpsc::UnboundedReceiver<ApiRequest>) {
        let (api_tx, request_rx) = mpsc::unbounded_channel();
        let (_response_tx, api_rx) = mpsc::unbounded_channel();
        let app = App::from_parts(false, "http://localhost:5001".into(), api_tx, api_rx);
        (app, request_rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ApiRequest>) -> Vec<ApiRequest> {
        let mut out = Vec::new();
        while let Ok(r) = rx.try_recv() {
            out.push(r);
        }
        out
    }

    fn sign_in(app: &mut App, role: &str) {
        app.on_signed_in(User {
            id: "u1".into(),
            name: "Kai".into(),
            email: "kai@x.io".into(),
            role: role.into(),
        });
    }

    #[test]
    fn test_login_form_submits() {
        let (mut app, mut rx) = app();
        type_str(&mut app, "kai@x.io");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "hunter22");
        press(&mut app, KeyCode::Enter);

        let sent = drain(&mut rx);
        assert!(matches!(
            sent.as_slice(),
            [ApiRequest::Login { email, password }] if email == "kai@x.io" && password == "hunter22"
        ));
        assert!(app.model.login.submitting);
    }

    #[test]
    fn test_login_requires_both_fields() {
        let (mut app, mut rx) = app();
        type_str(&mut app, "kai@x.io");
        press(&mut app, KeyCode::Enter);

        assert!(drain(&mut rx).is_empty());
        assert_eq!(app.model.login.error.as_deref(), Some("Please fill in all fields"));
    }

    #[test]
    fn test_signup_rejects_mismatched_passwords() {
        let (mut app, mut rx) = app();
        ctrl(&mut app, 'n');
        assert_eq!(app.model.route(), Route::Signup);

        type_str(&mut app, "Kai");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "kai@x.io");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "secret1");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "secret2");
        press(&mut app, KeyCode::Enter);

        assert!(drain(&mut rx).is_empty());
        assert_eq!(app.model.signup.error.as_deref(), Some("Passwords do not match"));
    }

    #[test]
    fn test_search_filters_list() {
        let (mut app, _rx) = app();
        sign_in(&mut app, "user");
        app.model.notices.set_notices(vec![
            Notice {
                id: "1".into(),
                title: "Exam timetable".into(),
                ..Notice::default()
            },
            Notice {
                id: "2".into(),
                title: "Sports day".into(),
                ..Notice::default()
            },
        ]);

        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "sport");
        assert_eq!(app.model.notices.visible, vec![1]);

        press(&mut app, KeyCode::Esc);
        assert!(!app.model.ui.search_mode);
        assert_eq!(app.model.notices.visible.len(), 2);
    }

    #[test]
    fn test_user_cannot_open_admin_screens() {
        let (mut app, _rx) = app();
        sign_in(&mut app, "user");
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.model.route(), Route::UserHome);
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.model.route(), Route::UserHome);
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let (mut app, mut rx) = app();
        sign_in(&mut app, "admin");
        app.model.notices.set_notices(vec![Notice {
            id: "n7".into(),
            title: "Old notice".into(),
            ..Notice::default()
        }]);
        drain(&mut rx);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.model.ui.confirm_delete.is_some());
        assert!(drain(&mut rx).is_empty());

        press(&mut app, KeyCode::Char('y'));
        assert!(app.model.ui.confirm_delete.is_none());
        assert!(matches!(
            drain(&mut rx).as_slice(),
            [ApiRequest::DeleteNotice { id }] if id == "n7"
        ));
    }

    #[test]
    fn test_compose_department_toggle_requests_courses() {
        let (mut app, mut rx) = app();
        sign_in(&mut app, "admin");
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.model.route(), Route::Compose);

        let request = drain(&mut rx)
            .into_iter()
            .find_map(|r| match r {
                ApiRequest::FetchOptions { request, .. } => Some(request),
                _ => None,
            })
            .unwrap();
        handle_api_response(
            &mut app,
            ApiResponse::OptionsResult {
                scope: CascadeScope::Compose,
                request,
                options: Ok(vec![
                    CascadeOption::new("CSE", "Computer Science"),
                    CascadeOption::new("ME", "Mechanical"),
                ]),
            },
        );

        app.model.compose.focus = ComposeField::Target(CascadeField::Department);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.model.compose.cascade.selected(CascadeField::Department).len(), 2);

        let sent = drain(&mut rx);
        assert!(sent.iter().any(|r| matches!(
            r,
            ApiRequest::FetchOptions { request, .. } if request.field == CascadeField::Course
        )));
    }

    #[test]
    fn test_compose_priority_choices_survive_submission() {
        let (mut app, _rx) = app();
        sign_in(&mut app, "admin");
        press(&mut app, KeyCode::Char('c'));
        app.model.compose.focus = ComposeField::Priority;

        let mut offered = vec![app.model.compose.priority];
        for _ in 0..3 {
            press(&mut app, KeyCode::Right);
            offered.push(app.model.compose.priority);
        }

        assert_eq!(offered[..3], Priority::COMPOSE);
        assert_eq!(offered[3], offered[0], "choices wrap around");
        for priority in offered {
            assert_eq!(Priority::parse(priority.form_label()), priority);
        }
    }

    #[test]
    fn test_failed_department_lookup_can_be_retried() {
        let (mut app, mut rx) = app();
        sign_in(&mut app, "admin");
        press(&mut app, KeyCode::Char('c'));

        let request = drain(&mut rx)
            .into_iter()
            .find_map(|r| match r {
                ApiRequest::FetchOptions { request, .. } => Some(request),
                _ => None,
            })
            .unwrap();
        handle_api_response(
            &mut app,
            ApiResponse::OptionsResult {
                scope: CascadeScope::Compose,
                request,
                options: Err(noticetui::error::ApiError::Transport("connection refused".into())),
            },
        );
        assert!(app.model.ui.toast.is_some());

        app.model.compose.focus = ComposeField::Target(CascadeField::Department);
        press(&mut app, KeyCode::Char('r'));
        assert!(matches!(
            drain(&mut rx).as_slice(),
            [ApiRequest::FetchOptions { scope: CascadeScope::Compose, request }]
                if request.field == CascadeField::Department
        ));
    }

    #[test]
    fn test_teacher_upload_never_fetches_courses() {
        let (mut app, mut rx) = app();
        sign_in(&mut app, "admin");
        press(&mut app, KeyCode::Char('u'));
        ctrl(&mut app, 't');
        assert_eq!(
            app.model.upload.kind,
            noticetui::logic::conflicts::EntityKind::Teacher
        );

        let request = drain(&mut rx)
            .into_iter()
            .filter_map(|r| match r {
                ApiRequest::FetchOptions { request, .. } => Some(request),
                _ => None,
            })
            .last()
            .unwrap();
        handle_api_response(
            &mut app,
            ApiResponse::OptionsResult {
                scope: CascadeScope::Upload,
                request,
                options: Ok(vec![CascadeOption::new("CSE", "Computer Science")]),
            },
        );

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.model.upload.cascade.selected(CascadeField::Department).len(), 1);
        assert!(!drain(&mut rx)
            .iter()
            .any(|r| matches!(r, ApiRequest::FetchOptions { .. })));
    }

    #[test]
    fn test_logout_confirmation() {
        let (mut app, mut rx) = app();
        sign_in(&mut app, "user");
        drain(&mut rx);

        press(&mut app, KeyCode::Char('L'));
        assert!(app.model.ui.confirm_logout);
        press(&mut app, KeyCode::Char('y'));

        assert_eq!(app.model.route(), Route::Login);
        assert!(drain(&mut rx).iter().any(|r| matches!(r, ApiRequest::Logout)));
    }
}
