//! Business Logic
//!
//! Pure functions and state machines that can be unit tested:
//! - cascade: department -> course -> year -> section selection
//! - conflicts: bulk upload conflict review
//! - errors: error classification for display
//! - forms: client-side validation
//! - navigation: selection and focus index arithmetic
//! - notices: filtering, counts, text formatting
//! - routing: roles and screens
//! - ui: toast timing and text helpers

pub mod cascade;
pub mod conflicts;
pub mod errors;
pub mod forms;
pub mod navigation;
pub mod notices;
pub mod routing;
pub mod ui;
