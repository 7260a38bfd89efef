//! UI Model
//!
//! Current screen, preferences, dialogs and the toast.

use std::time::Instant;

use crate::logic::routing::Route;
use crate::logic::ui::{should_dismiss_toast, ToastKind};

/// Notice pending a delete confirmation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmDelete {
    pub notice_id: String,
    pub title: String,
}

#[derive(Clone, Debug)]
pub struct UiModel {
    // ============================================
    // NAVIGATION
    // ============================================
    pub route: Route,

    /// Screens to return to on Esc
    pub back_stack: Vec<Route>,

    // ============================================
    // PREFERENCES
    // ============================================
    pub vim_mode: bool,

    // ============================================
    // DIALOGS & POPUPS
    // ============================================
    pub confirm_delete: Option<ConfirmDelete>,

    pub confirm_logout: bool,

    pub show_help: bool,

    /// Toast message (text, kind, timestamp)
    pub toast: Option<(String, ToastKind, Instant)>,

    // ============================================
    // SEARCH
    // ============================================
    /// Search input is receiving keystrokes
    pub search_mode: bool,

    pub should_quit: bool,
}

impl UiModel {
    pub fn new(vim_mode: bool) -> Self {
        Self {
            route: Route::Login,
            back_stack: Vec::new(),
            vim_mode,
            confirm_delete: None,
            confirm_logout: false,
            show_help: false,
            toast: None,
            search_mode: false,
            should_quit: false,
        }
    }

    pub fn has_modal(&self) -> bool {
        self.confirm_delete.is_some() || self.confirm_logout || self.show_help
    }

    pub fn close_all_modals(&mut self) {
        self.confirm_delete = None;
        self.confirm_logout = false;
        self.show_help = false;
        self.search_mode = false;
    }

    /// Open a screen, remembering where we came from
    pub fn push_route(&mut self, route: Route) {
        if self.route != route {
            self.back_stack.push(self.route);
            self.route = route;
        }
    }

    /// Go back one screen. Returns false when there is nowhere to go.
    pub fn pop_route(&mut self) -> bool {
        match self.back_stack.pop() {
            Some(route) => {
                self.route = route;
                true
            }
            None => false,
        }
    }

    /// Jump to a screen and forget the history (login, logout, role home)
    pub fn reset_route(&mut self, route: Route) {
        self.back_stack.clear();
        self.route = route;
    }

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast = Some((message.into(), kind, Instant::now()));
    }

    pub fn should_dismiss_toast(&self) -> bool {
        self.toast
            .as_ref()
            .map(|(_, kind, at)| should_dismiss_toast(at.elapsed().as_millis(), *kind))
            .unwrap_or(false)
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }
}
