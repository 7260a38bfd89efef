use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame,
};

use noticetui::logic::notices::{format_timestamp, read_rate};
use noticetui::model::{DashboardModel, NoticesModel};

fn summary_lines(notices: &NoticesModel) -> Vec<Line<'static>> {
    let Some(analytics) = &notices.analytics else {
        return vec![Line::from("Loading analytics...")];
    };

    let title = notices
        .notices
        .iter()
        .chain(notices.detail.iter())
        .find(|n| Some(&n.id) == notices.analytics_for.as_ref())
        .map(|n| n.title.clone())
        .unwrap_or_default();

    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<14}", label), Style::default().fg(Color::DarkGray)),
            Span::raw(value),
        ])
    };

    vec![
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        field("Recipients", analytics.recipient_count.to_string()),
        field("Priority", analytics.priority.as_str().to_string()),
        field("Status", analytics.status.as_str().to_string()),
        field(
            "Published",
            analytics
                .published_at
                .as_deref()
                .or(analytics.created_at.as_deref())
                .map(format_timestamp)
                .unwrap_or_else(|| "-".to_string()),
        ),
        field("Attachments", analytics.attachments_count.to_string()),
    ]
}

/// Per-notice analytics: summary, read-rate gauge and reader table
pub fn render_analytics(
    f: &mut Frame,
    area: Rect,
    notices: &NoticesModel,
    dashboard: &DashboardModel,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(area);

    let summary = Paragraph::new(summary_lines(notices))
        .block(Block::default().borders(Borders::ALL).title("Analytics"));
    f.render_widget(summary, chunks[0]);

    let readers = notices.reads.as_ref().map(|r| r.unique_readers).unwrap_or(0);
    let audience = dashboard.users_count.unwrap_or(0);
    let rate = read_rate(readers, audience);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Read rate"))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(rate.min(100) as u16)
        .label(format!("{}% ({} of {} users)", rate, readers, audience));
    f.render_widget(gauge, chunks[1]);

    let rows: Vec<Row> = notices
        .reads
        .as_ref()
        .map(|r| r.reads.as_slice())
        .unwrap_or(&[])
        .iter()
        .map(|read| {
            Row::new(vec![
                Cell::from(read.user_name.clone()),
                Cell::from(read.user_email.clone()),
                Cell::from(read.read_count.to_string()),
                Cell::from(
                    read.last_read
                        .as_deref()
                        .map(format_timestamp)
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Percentage(40),
            Constraint::Length(7),
            Constraint::Min(18),
        ],
    )
    .header(
        Row::new(vec!["Name", "Email", "Reads", "Last read"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title("Readers"))
    .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default();
    state.select(notices.reads_selection);
    f.render_stateful_widget(table, chunks[2], &mut state);
}
