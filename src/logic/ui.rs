//! Toast and banner timing

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// How a toast is styled and how long it stays up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    /// Errors stay up longer than confirmations
    pub fn duration_ms(self) -> u128 {
        match self {
            ToastKind::Info | ToastKind::Success => 2000,
            ToastKind::Error => 4000,
        }
    }
}

/// Whether a toast shown `elapsed_ms` ago should be removed
///
/// # Examples
/// ```
/// use noticetui::logic::ui::{should_dismiss_toast, ToastKind};
///
/// assert!(!should_dismiss_toast(1500, ToastKind::Success));
/// assert!(should_dismiss_toast(2000, ToastKind::Success));
/// assert!(!should_dismiss_toast(2000, ToastKind::Error));
/// ```
pub fn should_dismiss_toast(elapsed_ms: u128, kind: ToastKind) -> bool {
    elapsed_ms >= kind.duration_ms()
}

/// Truncate `text` to `max` display columns, adding an ellipsis when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Mask a password field for display
pub fn mask(text: &str) -> String {
    "•".repeat(text.chars().count())
}
