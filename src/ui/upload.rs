use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use super::fields::{border_style, render_input, render_option_picker};
use noticetui::logic::cascade::CascadeField;
use noticetui::logic::conflicts::{ConflictReview, EntityKind};
use noticetui::model::forms::{ManualEntryForm, UploadField, UploadForm, UploadMode};

fn render_tabs(f: &mut Frame, area: Rect, form: &UploadForm) {
    let tab = |label: &'static str, active: bool| {
        if active {
            Span::styled(
                format!(" {} ", label),
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {} ", label), Style::default().fg(Color::Gray))
        }
    };

    let line = Line::from(vec![
        tab("Students", form.kind == EntityKind::Student),
        tab("Teachers", form.kind == EntityKind::Teacher),
        Span::raw("   │   "),
        tab("Bulk upload", form.mode == UploadMode::Bulk),
        tab("Add one", form.mode == UploadMode::Manual),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn outcome_lines(form: &UploadForm) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if form.busy {
        lines.push(Line::from(Span::styled("Working...", Style::default().fg(Color::Yellow))));
    }
    if let Some(message) = &form.message {
        lines.push(Line::from(message.clone()));
    }
    if let Some(outcome) = &form.last_outcome {
        if let Some(inserted) = outcome.inserted {
            lines.push(Line::from(Span::styled(
                format!("{} new record(s) created", inserted),
                Style::default().fg(Color::Green),
            )));
        }
        for err in outcome.errors.iter().take(5) {
            lines.push(Line::from(Span::styled(
                format!("• {}", err),
                Style::default().fg(Color::Red),
            )));
        }
        if outcome.errors.len() > 5 {
            lines.push(Line::from(format!("  ... and {} more", outcome.errors.len() - 5)));
        }
    }
    lines
}

fn render_review(
    f: &mut Frame,
    area: Rect,
    review: Option<&ConflictReview>,
    cursor: Option<usize>,
    focused: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(match review {
            Some(r) if !r.is_empty() => format!(
                "Existing records ({} pending, {} selected)",
                r.len(),
                r.selected_count()
            ),
            _ => "Existing records".to_string(),
        })
        .border_style(border_style(focused));

    let Some(review) = review.filter(|r| !r.is_empty()) else {
        let empty = Paragraph::new(Span::styled(
            "No conflicts to review",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(empty, area);
        return;
    };

    let columns = review.kind.review_columns();
    let mut header = vec![Cell::from("")];
    header.extend(columns.iter().map(|c| Cell::from(c.replace('_', " "))));

    let rows: Vec<Row> = review
        .pending()
        .iter()
        .map(|record| {
            let check = if review.is_selected(&record.key) { "[x]" } else { "[ ]" };
            let mut cells = vec![Cell::from(check)];
            cells.extend(columns.iter().map(|c| Cell::from(record.field(c))));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(3)];
    widths.extend(columns.iter().map(|_| Constraint::Ratio(1, columns.len() as u32)));

    let table = Table::new(rows, widths)
        .header(
            Row::new(header)
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        )
        .block(block)
        .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default();
    if focused {
        state.select(cursor);
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn render_bulk(f: &mut Frame, area: Rect, form: &UploadForm) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let targets: &[CascadeField] = match form.kind {
        EntityKind::Student => &CascadeField::ALL,
        EntityKind::Teacher => &[CascadeField::Department],
    };
    let mut constraints: Vec<Constraint> = targets
        .iter()
        .map(|_| Constraint::Ratio(1, targets.len() as u32))
        .collect();
    constraints.push(Constraint::Length(3));
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(columns[0]);

    for (i, field) in targets.iter().enumerate() {
        render_option_picker(
            f,
            left[i],
            field.label(),
            form.cascade.field(*field),
            form.cascade.upstream_ready(*field),
            form.cascade_cursor[field.index()],
            form.focus == UploadField::Target(*field),
        );
    }
    render_input(
        f,
        left[targets.len()],
        "Roster file (.xlsx, .xls, .csv)",
        &form.file_path,
        form.focus == UploadField::File,
        false,
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(5)])
        .split(columns[1]);

    let outcome = Paragraph::new(outcome_lines(form))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Result"));
    f.render_widget(outcome, right[0]);

    render_review(
        f,
        right[1],
        form.review.as_ref(),
        form.review_cursor,
        form.focus == UploadField::Review,
    );
}

fn render_manual(
    f: &mut Frame,
    area: Rect,
    kind: EntityKind,
    manual: &ManualEntryForm,
    message: Option<&str>,
) {
    let fields = kind.manual_fields();

    let noun = match kind {
        EntityKind::Student => "student",
        EntityKind::Teacher => "teacher",
    };
    let title = if manual.update_mode {
        format!("Update existing {}", noun)
    } else {
        format!("Add {}", noun)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(if manual.update_mode {
            Color::Yellow
        } else {
            Color::Cyan
        }));
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Two columns keep eleven student fields on screen
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);
    let per_column = fields.len().div_ceil(2);
    let column_rows = |col: Rect, n: usize| {
        let mut c: Vec<Constraint> = (0..n).map(|_| Constraint::Length(3)).collect();
        c.push(Constraint::Min(0));
        Layout::default().direction(Direction::Vertical).constraints(c).split(col)
    };
    let left = column_rows(halves[0], per_column);
    let right = column_rows(halves[1], fields.len() - per_column);

    for (i, ((_, label), value)) in fields.iter().zip(&manual.values).enumerate() {
        let area = if i < per_column { left[i] } else { right[i - per_column] };
        // The key cannot change while updating an existing record
        let label = if manual.update_mode && i == 0 {
            format!("{} (locked)", label)
        } else {
            label.to_string()
        };
        render_input(f, area, &label, value, manual.focus == i, false);
    }

    if let Some(message) = message {
        let msg_area = right[fields.len() - per_column];
        f.render_widget(Paragraph::new(message.to_string()).wrap(Wrap { trim: true }), msg_area);
    }
}

/// Render the roster upload screen
pub fn render_upload(f: &mut Frame, area: Rect, form: &UploadForm) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5)])
        .split(area);

    render_tabs(f, chunks[0], form);
    match form.mode {
        UploadMode::Bulk => render_bulk(f, chunks[1], form),
        UploadMode::Manual => render_manual(
            f,
            chunks[1],
            form.kind,
            &form.manual,
            form.message.as_deref(),
        ),
    }
}
