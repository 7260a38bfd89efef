use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::layout::centered_rect;
use noticetui::logic::ui::truncate;

/// Render the delete confirmation dialog
pub fn render_delete_confirmation(f: &mut Frame, title: &str) {
    let prompt_text = format!(
        "Delete this notice?\n\n\
        {}\n\n\
        WARNING: This action cannot be undone!\n\n\
        Continue? (y/n)",
        truncate(title, 44)
    );

    let prompt_area = centered_rect(50, 11, f.area());
    let prompt = Paragraph::new(prompt_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Delete")
                .border_style(Style::default().fg(Color::Red)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, prompt_area);
    f.render_widget(prompt, prompt_area);
}

pub fn render_logout_confirmation(f: &mut Frame) {
    let prompt_area = centered_rect(40, 7, f.area());
    let prompt = Paragraph::new("Log out of this account?\n\nContinue? (y/n)")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Logout")
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, prompt_area);
    f.render_widget(prompt, prompt_area);
}

/// Keyboard reference, closed by any key
pub fn render_help(f: &mut Frame, vim_mode: bool) {
    let nav = if vim_mode { "j/k, g/G" } else { "↑/↓, Home/End" };
    let rows: Vec<(&str, &str)> = vec![
        (nav, "Move through lists"),
        ("Enter", "Open the selected notice"),
        ("/", "Search titles, bodies and departments"),
        ("p / t", "Cycle priority / type filter"),
        ("r", "Reload from the server"),
        ("a", "Notice analytics (admin)"),
        ("d", "Delete notice (admin)"),
        ("c / u / n", "Compose / roster upload / all notices (admin)"),
        ("Tab", "Next form field"),
        ("^S / ^D", "Publish / save draft"),
        ("L", "Log out"),
        ("Esc", "Back"),
        ("q", "Quit"),
    ];

    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(k, desc)| {
            Line::from(vec![
                Span::styled(format!("{:<16}", k), Style::default().fg(Color::Yellow)),
                Span::raw(desc),
            ])
        })
        .collect();

    let height = lines.len() as u16 + 2;
    let area = centered_rect(60, height, f.area());
    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Help (any key to close)")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(Clear, area);
    f.render_widget(help, area);
}
