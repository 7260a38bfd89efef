use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout information for rendering
pub struct LayoutInfo {
    /// Top bar: screen title and account
    pub header_area: Rect,
    /// Screen body
    pub content_area: Rect,
    /// Hotkey legend area (full width)
    pub legend_area: Rect,
    /// Bottom status bar area
    pub status_area: Rect,
}

/// Split the terminal into header, content, legend and status bar
pub fn calculate_layout(terminal_size: Rect, legend_height: u16) -> LayoutInfo {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Header (border, text, border)
            Constraint::Min(5),                // Screen body
            Constraint::Length(legend_height), // Legend (exact fit for wrapped content)
            Constraint::Length(1),             // Status line
        ])
        .split(terminal_size);

    LayoutInfo {
        header_area: chunks[0],
        content_area: chunks[1],
        legend_area: chunks[2],
        status_area: chunks[3],
    }
}

/// A `width` x `height` rect centered in `area`, clipped to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
