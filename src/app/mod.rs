//! App Orchestration Methods
//!
//! `impl App` blocks grouped by domain. Each one turns a user action into
//! model changes plus requests for the API worker:
//! - session: login, signup, restore, logout
//! - notices: list, detail, delete, analytics, search and filters
//! - cascade: department -> course -> year -> section fetches
//! - compose: the admin's new-notice form
//! - upload: roster upload, conflict review and manual entry

pub(crate) mod cascade;
pub(crate) mod compose;
pub(crate) mod notices;
pub(crate) mod session;
pub(crate) mod upload;
