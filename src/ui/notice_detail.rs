use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::notice_list::priority_style;
use noticetui::api::Notice;
use noticetui::logic::notices::{format_audience, format_timestamp, strip_html};
use noticetui::model::NoticesModel;

fn meta_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

fn detail_lines(notice: &Notice) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            notice.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if let Some(subject) = notice.subject.as_deref().filter(|s| !s.is_empty()) {
        lines.push(meta_line("Subject", subject.to_string()));
    }
    lines.push(Line::from(vec![
        Span::styled(format!("{:<12}", "Priority"), Style::default().fg(Color::DarkGray)),
        Span::styled(notice.priority.as_str(), priority_style(notice.priority)),
    ]));
    if let Some(kind) = &notice.notice_type {
        lines.push(meta_line("Type", kind.clone()));
    }
    lines.push(meta_line("Audience", format_audience(notice)));
    if let Some(created) = &notice.created_at {
        lines.push(meta_line("Posted", format_timestamp(created)));
    }
    if let Some(creator) = &notice.created_by {
        let by = if creator.name.is_empty() { creator.id.clone() } else { creator.name.clone() };
        lines.push(meta_line("Posted by", by));
    }
    if !notice.attachments.is_empty() {
        lines.push(meta_line("Attachments", notice.attachments.len().to_string()));
    }

    lines.push(Line::from(""));
    for text in strip_html(&notice.content).lines() {
        lines.push(Line::from(text.to_string()));
    }
    lines
}

/// Render the open notice, scrolled by `detail_scroll`
pub fn render_notice_detail(f: &mut Frame, area: Rect, notices: &NoticesModel) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Notice")
        .border_style(Style::default().fg(Color::Cyan));

    let Some(notice) = &notices.detail else {
        let text = if notices.detail_loading { "Loading notice..." } else { "Notice not found" };
        f.render_widget(Paragraph::new(text).block(block), area);
        return;
    };

    let body = Paragraph::new(detail_lines(notice))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((notices.detail_scroll, 0));
    f.render_widget(body, area);
}
