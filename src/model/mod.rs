//! Pure Application Model - Elm Architecture
//!
//! The Model is organized into focused sub-models:
//!
//! - **SessionModel**: who is logged in and with which role
//! - **NoticesModel**: notice list, filter, detail and analytics
//! - **DashboardModel**: admin counters
//! - **Forms**: login, signup, compose and upload form state
//! - **UiModel**: current screen, dialogs, toast
//!
//! Key principles:
//! - Clone + Debug: state can be snapshotted in tests
//! - No services: all I/O goes through the API worker
//! - Pure accessors: helper methods are side-effect free

pub mod forms;
pub mod notices;
pub mod session;
pub mod ui;

pub use forms::{ComposeForm, LoginForm, SignupForm, UploadForm};
pub use notices::{DashboardModel, NoticesModel};
pub use session::SessionModel;
pub use ui::UiModel;

use crate::logic::routing::{home_route, resolve, Route};
use crate::logic::ui::ToastKind;

/// Root application model composed of focused sub-models
#[derive(Clone, Debug)]
pub struct Model {
    pub session: SessionModel,

    pub notices: NoticesModel,

    pub dashboard: DashboardModel,

    pub login: LoginForm,

    pub signup: SignupForm,

    pub compose: ComposeForm,

    pub upload: UploadForm,

    pub ui: UiModel,
}

impl Model {
    pub fn new(vim_mode: bool) -> Self {
        Self {
            session: SessionModel::new(),
            notices: NoticesModel::new(),
            dashboard: DashboardModel::default(),
            login: LoginForm::default(),
            signup: SignupForm::default(),
            compose: ComposeForm::default(),
            upload: UploadForm::default(),
            ui: UiModel::new(vim_mode),
        }
    }

    pub fn route(&self) -> Route {
        self.ui.route
    }

    /// Navigate, respecting role restrictions
    pub fn navigate(&mut self, route: Route) {
        let target = resolve(self.session.role, route);
        self.ui.push_route(target);
    }

    /// Land on the role's home screen with a clean history
    pub fn go_home(&mut self) {
        let route = self.session.role.map(home_route).unwrap_or(Route::Login);
        self.ui.reset_route(route);
    }

    /// Forget everything tied to the account and show the login screen
    pub fn sign_out(&mut self) {
        let vim_mode = self.ui.vim_mode;
        *self = Model::new(vim_mode);
    }

    /// Session expired mid-use: sign out and explain why
    pub fn expire_session(&mut self, message: &str) {
        self.sign_out();
        self.login.error = Some(message.to_string());
        self.ui.show_toast(message, ToastKind::Error);
    }

    pub fn has_modal(&self) -> bool {
        self.ui.has_modal()
    }

    pub fn close_all_modals(&mut self) {
        self.ui.close_all_modals();
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.ui.show_toast(message, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::User;

    fn user(role: &str) -> User {
        User {
            id: "1".into(),
            name: "Sam".into(),
            email: "sam@x.io".into(),
            role: role.into(),
        }
    }

    #[test]
    fn test_model_creation() {
        let model = Model::new(true);
        assert_eq!(model.route(), Route::Login);
        assert!(model.ui.vim_mode);
        assert!(!model.session.is_logged_in());
    }

    #[test]
    fn test_go_home_by_role() {
        let mut model = Model::new(false);
        model.session.sign_in(user("admin"));
        model.go_home();
        assert_eq!(model.route(), Route::AdminDashboard);

        model.session.sign_in(user("user"));
        model.go_home();
        assert_eq!(model.route(), Route::UserHome);
    }

    #[test]
    fn test_user_navigation_to_admin_screen_redirects() {
        let mut model = Model::new(false);
        model.session.sign_in(user("user"));
        model.go_home();
        model.navigate(Route::Upload);
        assert_eq!(model.route(), Route::UserHome);
    }

    #[test]
    fn test_expire_session_resets_state() {
        let mut model = Model::new(true);
        model.session.sign_in(user("admin"));
        model.notices.mark_read("n1");
        model.go_home();

        model.expire_session("Session expired. Please login again.");

        assert_eq!(model.route(), Route::Login);
        assert!(!model.session.is_logged_in());
        assert!(model.notices.read_ids.is_empty());
        assert!(model.ui.vim_mode);
        assert!(model.login.error.is_some());
        assert!(model.ui.toast.is_some());
    }
}
