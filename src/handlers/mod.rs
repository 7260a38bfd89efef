//! Event Handlers
//!
//! Keyboard input and API responses both land here and mutate the App.
//! Nothing in this module blocks: requests go out over the service channel.

pub mod api;
pub mod keyboard;

pub use api::handle_api_response;
pub use keyboard::handle_key;
