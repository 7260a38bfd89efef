//! Notice board TUI library
//!
//! Everything behind the screens: the authenticated HTTP helper, the typed
//! notice API, the pure state machines (selection cascade, conflict review)
//! and the application model. The binary wires these to ratatui.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod services;
pub mod session;
pub mod transport;

pub use error::{ApiError, ApiResult};
pub use logic::routing::{Role, Route};
