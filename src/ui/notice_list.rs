use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use noticetui::api::{Notice, NoticeStatus, Priority};
use noticetui::logic::notices::format_timestamp;
use noticetui::logic::ui::truncate;
use noticetui::model::NoticesModel;

pub fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::Low => Style::default().fg(Color::DarkGray),
        Priority::Medium => Style::default().fg(Color::Blue),
        Priority::High => Style::default().fg(Color::Yellow),
        Priority::Critical => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

fn notice_row(notice: &Notice, read: bool, title_width: usize) -> ListItem<'static> {
    let marker = if read {
        Span::raw("  ")
    } else {
        Span::styled("● ", Style::default().fg(Color::Cyan))
    };
    let title_style = if read {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    let mut spans = vec![
        marker,
        Span::styled(
            format!("{:<9}", notice.priority.as_str()),
            priority_style(notice.priority),
        ),
        Span::styled(
            format!("{:<width$}", truncate(&notice.title, title_width), width = title_width),
            title_style,
        ),
        Span::raw("  "),
        Span::styled(
            format!("{:<10}", notice.notice_type.as_deref().unwrap_or("-")),
            Style::default().fg(Color::Magenta),
        ),
    ];
    if notice.status != NoticeStatus::Published {
        spans.push(Span::styled(
            format!("[{}] ", notice.status.as_str()),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(created) = &notice.created_at {
        spans.push(Span::styled(
            format_timestamp(created),
            Style::default().fg(Color::DarkGray),
        ));
    }

    ListItem::new(Line::from(spans))
}

fn render_search_bar(f: &mut Frame, area: Rect, query: &str, active: bool) {
    let mut spans = vec![Span::raw(query.to_string())];
    if active {
        spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
    }
    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .border_style(if active {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            }),
    );
    f.render_widget(bar, area);
}

/// Render the filtered notice list (with a search bar while searching)
pub fn render_notice_list(
    f: &mut Frame,
    area: Rect,
    notices: &NoticesModel,
    search_mode: bool,
    title: &str,
) {
    let show_search = search_mode || !notices.filter.query.is_empty();
    let (search_area, list_area) = if show_search {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);
        (Some(chunks[0]), chunks[1])
    } else {
        (None, area)
    };

    if let Some(search_area) = search_area {
        render_search_bar(f, search_area, &notices.filter.query, search_mode);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} ({})", title, notices.visible.len()));

    if notices.loading && notices.notices.is_empty() {
        f.render_widget(Paragraph::new("Loading notices...").block(block), list_area);
        return;
    }
    if notices.visible.is_empty() {
        let text = if notices.filter.is_active() {
            "No notices match the current filter"
        } else {
            "No notices yet"
        };
        let empty = Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray)))
            .block(block);
        f.render_widget(empty, list_area);
        return;
    }

    // Marker + priority column + spacing + type column + date
    let title_width = (list_area.width as usize).saturating_sub(2 + 2 + 9 + 2 + 10 + 20).max(10);
    let items: Vec<ListItem> = notices
        .visible
        .iter()
        .filter_map(|i| notices.notices.get(*i))
        .map(|n| notice_row(n, notices.is_read(&n.id), title_width))
        .collect();

    let mut state = ListState::default();
    state.select(notices.selection);

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, list_area, &mut state);
}
