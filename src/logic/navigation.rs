//! List and form navigation
//!
//! Pure index arithmetic for moving a selection through a list or focus
//! through form fields. Everything wraps.

/// Move to the next row, wrapping to the top
///
/// # Examples
/// ```
/// use noticetui::logic::navigation::next_selection;
///
/// assert_eq!(next_selection(None, 0), None);
/// assert_eq!(next_selection(None, 3), Some(0));
/// assert_eq!(next_selection(Some(1), 3), Some(2));
/// assert_eq!(next_selection(Some(2), 3), Some(0));
/// ```
pub fn next_selection(current: Option<usize>, list_len: usize) -> Option<usize> {
    if list_len == 0 {
        return None;
    }

    Some(match current {
        Some(i) if i + 1 >= list_len => 0,
        Some(i) => i + 1,
        None => 0,
    })
}

/// Move to the previous row, wrapping to the bottom
///
/// # Examples
/// ```
/// use noticetui::logic::navigation::prev_selection;
///
/// assert_eq!(prev_selection(None, 0), None);
/// assert_eq!(prev_selection(Some(2), 3), Some(1));
/// assert_eq!(prev_selection(Some(0), 3), Some(2));
/// assert_eq!(prev_selection(None, 3), Some(2));
/// ```
pub fn prev_selection(current: Option<usize>, list_len: usize) -> Option<usize> {
    if list_len == 0 {
        return None;
    }

    Some(match current {
        Some(0) | None => list_len - 1,
        Some(i) if i >= list_len => list_len - 1,
        Some(i) => i - 1,
    })
}

/// Keep a selection valid after the list shrank or grew
pub fn clamp_selection(current: Option<usize>, list_len: usize) -> Option<usize> {
    if list_len == 0 {
        return None;
    }
    Some(current.unwrap_or(0).min(list_len - 1))
}

/// Cycle form focus (Tab / Shift+Tab)
pub fn cycle_focus(current: usize, field_count: usize, forward: bool) -> usize {
    if field_count == 0 {
        return 0;
    }
    if forward {
        (current + 1) % field_count
    } else {
        (current + field_count - 1) % field_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_selection_single_item_wraps_to_itself() {
        assert_eq!(next_selection(Some(0), 1), Some(0));
    }

    #[test]
    fn test_prev_selection_out_of_range_goes_to_last() {
        assert_eq!(prev_selection(Some(9), 3), Some(2));
    }

    #[test]
    fn test_clamp_selection() {
        assert_eq!(clamp_selection(Some(5), 3), Some(2));
        assert_eq!(clamp_selection(None, 3), Some(0));
        assert_eq!(clamp_selection(Some(1), 0), None);
    }

    #[test]
    fn test_cycle_focus() {
        assert_eq!(cycle_focus(0, 3, true), 1);
        assert_eq!(cycle_focus(2, 3, true), 0);
        assert_eq!(cycle_focus(0, 3, false), 2);
        assert_eq!(cycle_focus(0, 0, true), 0);
    }
}
