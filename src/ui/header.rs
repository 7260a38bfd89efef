use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use noticetui::logic::routing::{Role, Route};
use noticetui::model::SessionModel;

fn role_span(role: Option<Role>) -> Span<'static> {
    match role {
        Some(Role::Admin) => Span::styled("admin", Style::default().fg(Color::Magenta)),
        Some(Role::User) => Span::styled("user", Style::default().fg(Color::Cyan)),
        Some(Role::Unknown) => Span::styled("unknown role", Style::default().fg(Color::Red)),
        None => Span::styled("signed out", Style::default().fg(Color::DarkGray)),
    }
}

/// Render the top bar: screen title, account and server
pub fn render_header(
    f: &mut Frame,
    area: Rect,
    route: Route,
    session: &SessionModel,
    base_url: &str,
) {
    let mut spans = vec![
        Span::styled(
            route.title(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
    ];

    if let Some(user) = &session.user {
        spans.push(Span::styled(
            user.name.clone(),
            Style::default().fg(Color::Green),
        ));
        spans.push(Span::raw(" ("));
        spans.push(role_span(session.role));
        spans.push(Span::raw(") | "));
    } else {
        spans.push(role_span(session.role));
        spans.push(Span::raw(" | "));
    }

    spans.push(Span::styled(
        base_url.to_string(),
        Style::default().fg(Color::DarkGray),
    ));

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Notice Board")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(bar, area);
}
