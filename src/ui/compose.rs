use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::fields::{border_style, choice_line, render_input, render_option_picker};
use noticetui::logic::cascade::CascadeField;
use noticetui::model::forms::{ComposeField, ComposeForm};

fn render_content(f: &mut Frame, area: Rect, form: &ComposeForm) {
    let focused = form.focus == ComposeField::Content;
    let mut lines: Vec<Line> = form
        .content
        .split('\n')
        .map(|l| Line::from(l.to_string()))
        .collect();
    if focused {
        if let Some(last) = lines.last_mut() {
            last.spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
        }
    }
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(ComposeField::Content.label())
                .border_style(border_style(focused)),
        );
    f.render_widget(body, area);
}

fn render_options(f: &mut Frame, area: Rect, form: &ComposeForm) {
    let lines = vec![
        choice_line(
            ComposeField::NoticeType.label(),
            &format!("◀ {} ▶", form.notice_type_label()),
            form.focus == ComposeField::NoticeType,
        ),
        choice_line(
            ComposeField::Priority.label(),
            &format!("◀ {} ▶", form.priority.form_label()),
            form.focus == ComposeField::Priority,
        ),
        choice_line(
            ComposeField::SendEmail.label(),
            if form.send_email { "[x] yes" } else { "[ ] no" },
            form.focus == ComposeField::SendEmail,
        ),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Options")),
        area,
    );
}

/// Input plus the chips already added beneath it
fn render_list_input(
    f: &mut Frame,
    area: Rect,
    field: ComposeField,
    input: &str,
    items: &[String],
    focused: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);
    render_input(f, chunks[0], field.label(), input, focused, false);

    let chips = if items.is_empty() {
        Line::from(Span::styled("  (none)", Style::default().fg(Color::DarkGray)))
    } else {
        let mut spans = vec![Span::raw("  ")];
        for item in items {
            spans.push(Span::styled(format!("[{}] ", item), Style::default().fg(Color::Green)));
        }
        Line::from(spans)
    };
    f.render_widget(Paragraph::new(chips), chunks[1]);
}

/// Render the compose form: text fields on the left, targeting on the right
pub fn render_compose(f: &mut Frame, area: Rect, form: &ComposeForm) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(3), // subject
            Constraint::Min(5),    // body
            Constraint::Length(5), // type, priority, email
            Constraint::Length(4), // recipients
            Constraint::Length(4), // attachments
            Constraint::Length(1), // error
        ])
        .split(columns[0]);

    render_input(
        f,
        left[0],
        ComposeField::Title.label(),
        &form.title,
        form.focus == ComposeField::Title,
        false,
    );
    render_input(
        f,
        left[1],
        ComposeField::Subject.label(),
        &form.subject,
        form.focus == ComposeField::Subject,
        false,
    );
    render_content(f, left[2], form);
    render_options(f, left[3], form);
    render_list_input(
        f,
        left[4],
        ComposeField::Recipients,
        &form.recipient_input,
        &form.recipients,
        form.focus == ComposeField::Recipients,
    );
    let attachments: Vec<String> = form
        .attachments
        .iter()
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string())
        })
        .collect();
    render_list_input(
        f,
        left[5],
        ComposeField::Attachments,
        &form.attachment_input,
        &attachments,
        form.focus == ComposeField::Attachments,
    );

    let message = match (&form.error, form.submitting) {
        (_, true) => Span::styled("Submitting...", Style::default().fg(Color::Yellow)),
        (Some(err), false) => Span::styled(err.clone(), Style::default().fg(Color::Red)),
        (None, false) => Span::raw(""),
    };
    f.render_widget(Paragraph::new(message), left[6]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
        ])
        .split(columns[1]);

    for field in CascadeField::ALL {
        render_option_picker(
            f,
            right[field.index()],
            field.label(),
            form.cascade.field(field),
            form.cascade.upstream_ready(field),
            form.cascade_cursor[field.index()],
            form.focus == ComposeField::Target(field),
        );
    }
}
