// UI module - handles all TUI rendering using Ratatui
//
// Architecture:
// - layout: Splits the screen into header, body, legend and status line
// - render: Main orchestration function that picks the screen for the route
// - header: Top bar with screen title and account
// - auth: Login and signup forms
// - notice_list / notice_detail: Notice browsing
// - dashboard / analytics: Admin counters and per-notice reads
// - compose / upload: Admin forms
// - fields: Shared inputs and option pickers
// - legend: Renders hotkey legend
// - status_bar: Renders bottom status line
// - dialogs: Confirmation dialogs and help
// - toast: Renders toast notifications (brief pop-up messages)

pub mod analytics;
pub mod auth;
pub mod compose;
pub mod dashboard;
pub mod dialogs;
pub mod fields;
pub mod header;
pub mod layout;
pub mod legend;
pub mod notice_detail;
pub mod notice_list;
pub mod render;
pub mod status_bar;
pub mod toast;
pub mod upload;

// Re-export main render function for convenience
pub use render::render;
