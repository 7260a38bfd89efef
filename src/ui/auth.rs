use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::fields::render_input;
use super::layout::centered_rect;
use noticetui::model::forms::{LoginField, LoginForm, SignupField, SignupForm};

/// Error or progress line under a form
fn render_form_message(f: &mut Frame, area: Rect, error: Option<&str>, submitting: bool) {
    let span = match (error, submitting) {
        (_, true) => Span::styled("Please wait...", Style::default().fg(Color::Yellow)),
        (Some(err), false) => Span::styled(err.to_string(), Style::default().fg(Color::Red)),
        (None, false) => Span::raw(""),
    };
    f.render_widget(Paragraph::new(span).wrap(Wrap { trim: true }), area);
}

fn form_frame(f: &mut Frame, area: Rect, title: &str, rows: u16) -> Vec<Rect> {
    let height = rows * 3 + 4;
    let outer = centered_rect(56, height, area);
    f.render_widget(Clear, outer);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(outer);
    f.render_widget(block, outer);

    let mut constraints: Vec<Constraint> = (0..rows).map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(1));
    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner)
        .to_vec()
}

pub fn render_login(f: &mut Frame, area: Rect, form: &LoginForm) {
    let rows = form_frame(f, area, "Login", 2);
    let focus = form.focus();
    render_input(f, rows[0], "Email", &form.email, focus == LoginField::Email, false);
    render_input(f, rows[1], "Password", &form.password, focus == LoginField::Password, true);
    render_form_message(f, rows[2], form.error.as_deref(), form.submitting);
}

pub fn render_signup(f: &mut Frame, area: Rect, form: &SignupForm) {
    let rows = form_frame(f, area, "Create account", 4);
    render_input(f, rows[0], "Full name", &form.name, form.focus == SignupField::Name, false);
    render_input(f, rows[1], "Email", &form.email, form.focus == SignupField::Email, false);
    render_input(f, rows[2], "Password", &form.password, form.focus == SignupField::Password, true);
    render_input(
        f,
        rows[3],
        "Confirm password",
        &form.confirm,
        form.focus == SignupField::Confirm,
        true,
    );
    render_form_message(f, rows[4], form.error.as_deref(), form.submitting);
}
