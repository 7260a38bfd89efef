//! Login, signup and logout flows

use tracing::info;

use noticetui::api::User;
use noticetui::logic::errors::format_error_message;
use noticetui::logic::forms::{validate_login, validate_signup};
use noticetui::logic::routing::Route;
use noticetui::logic::ui::ToastKind;
use noticetui::services::ApiRequest;

use crate::App;

impl App {
    pub(crate) fn submit_login(&mut self) {
        let form = &mut self.model.login;
        if form.submitting {
            return;
        }
        if let Err(err) = validate_login(&form.email, &form.password) {
            form.error = Some(format_error_message(&err));
            return;
        }

        form.error = None;
        form.submitting = true;
        let request = ApiRequest::Login {
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        };
        self.send(request);
    }

    pub(crate) fn submit_signup(&mut self) {
        let form = &mut self.model.signup;
        if form.submitting {
            return;
        }
        if let Err(err) = validate_signup(&form.name, &form.email, &form.password, &form.confirm) {
            form.error = Some(format_error_message(&err));
            return;
        }

        form.error = None;
        form.submitting = true;
        let request = ApiRequest::Signup {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        };
        self.send(request);
    }

    /// Verify a stored session with the server before trusting it
    pub(crate) fn restore_session(&mut self) {
        self.model.login.submitting = true;
        self.send(ApiRequest::CurrentUser);
    }

    /// Route by role and load the landing screen
    pub(crate) fn on_signed_in(&mut self, user: User) {
        info!(role = %user.role, "signed in");
        self.model.login = Default::default();
        self.model.session.sign_in(user);
        self.model.go_home();

        if self.model.route() == Route::Login {
            // Neither admin nor user: the server knows the account, we don't serve it
            self.model.session.sign_out();
            self.model.login.error =
                Some("This account has no access to the notice board".to_string());
            self.send(ApiRequest::Logout);
            return;
        }

        let greeting = format!("Welcome, {}", self.model.session.display_name());
        self.toast(greeting, ToastKind::Success);
        self.load_home();
    }

    pub(crate) fn open_signup(&mut self) {
        self.model.signup = Default::default();
        self.model.ui.push_route(Route::Signup);
    }

    pub(crate) fn request_logout(&mut self) {
        if self.model.session.is_logged_in() {
            self.model.ui.confirm_logout = true;
        }
    }

    /// Tell the server (best effort) and drop everything local right away
    pub(crate) fn logout(&mut self) {
        self.send(ApiRequest::Logout);
        self.model.sign_out();
        self.toast("Logged out", ToastKind::Info);
    }
}
