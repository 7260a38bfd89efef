use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::notice_list::render_notice_list;
use noticetui::model::{DashboardModel, NoticesModel};

fn stat_card(f: &mut Frame, area: Rect, label: &str, value: Option<u64>, color: Color) {
    let text = value.map(|v| v.to_string()).unwrap_or_else(|| "…".to_string());
    let card = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(ratatui::layout::Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(label.to_string()));
    f.render_widget(card, area);
}

/// Counter cards above the admin's notice list
pub fn render_dashboard(
    f: &mut Frame,
    area: Rect,
    dashboard: &DashboardModel,
    notices: &NoticesModel,
    search_mode: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[0]);

    let counts = notices.counts();
    stat_card(f, cards[0], "Total notices", dashboard.total_notices, Color::Cyan);
    stat_card(f, cards[1], "Users", dashboard.users_count, Color::Green);
    stat_card(f, cards[2], "Urgent", Some(counts.urgent as u64), Color::Red);

    render_notice_list(f, chunks[1], notices, search_mode, "Your notices");
}
