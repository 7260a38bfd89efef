//! Shared form widgets: labelled inputs and option pickers

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use noticetui::logic::cascade::{FieldPhase, FieldState};
use noticetui::logic::ui::mask;

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Bordered single-line input; the cursor is drawn when focused
pub fn render_input(
    f: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    secret: bool,
) {
    let shown = if secret { mask(value) } else { value.to_string() };
    let mut spans = vec![Span::raw(shown)];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
    }

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label.to_string())
            .border_style(border_style(focused)),
    );
    f.render_widget(input, area);
}

/// One-line "label: value" row, highlighted when focused
pub fn choice_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let marker = if focused { "▶ " } else { "  " };
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Line::from(vec![
        Span::styled(format!("{}{}: ", marker, label), label_style),
        Span::styled(value.to_string(), Style::default().fg(Color::White)),
    ])
}

fn phase_hint(state: &FieldState, upstream_ready: bool) -> Option<&'static str> {
    match state.phase {
        FieldPhase::Loading => Some("Loading..."),
        FieldPhase::Invalidated | FieldPhase::Idle if !upstream_ready => {
            Some("Select the previous field first")
        }
        FieldPhase::Idle => Some("No options loaded"),
        FieldPhase::Loaded if state.options.is_empty() => Some("No options available"),
        _ => None,
    }
}

/// Checkbox list for one cascade field
pub fn render_option_picker(
    f: &mut Frame,
    area: Rect,
    label: &str,
    state: &FieldState,
    upstream_ready: bool,
    cursor: usize,
    focused: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} ({} selected)", label, state.selected.len()))
        .border_style(border_style(focused));

    if let Some(hint) = phase_hint(state, upstream_ready) {
        let hint = Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)))
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = state
        .options
        .iter()
        .map(|option| {
            let checked = if state.is_selected(&option.value) { "[x] " } else { "[ ] " };
            ListItem::new(format!("{}{}", checked, option.label))
        })
        .collect();

    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(cursor.min(state.options.len().saturating_sub(1))));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, area, &mut list_state);
}
