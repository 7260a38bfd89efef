use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use noticetui::logic::routing::Route;
use noticetui::model::forms::{UploadField, UploadMode};

/// What the legend needs to know about the current screen
#[derive(Debug, Clone, Copy)]
pub struct LegendContext {
    pub route: Route,
    pub vim_mode: bool,
    pub is_admin: bool,
    pub search_mode: bool,
    pub upload_mode: UploadMode,
    pub upload_focus: UploadField,
}

fn key(k: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(k, Style::default().fg(Color::Yellow)),
        Span::raw(label),
    ]
}

/// Build hotkey spans (extracted for testability)
fn build_hotkey_spans(ctx: &LegendContext) -> Vec<Span<'static>> {
    let mut hotkey_spans = vec![];
    let nav = if ctx.vim_mode { "j/k" } else { "↑/↓" };

    match ctx.route {
        Route::Login => {
            hotkey_spans.extend(key("Tab", ":Next field  "));
            hotkey_spans.extend(key("Enter", ":Login  "));
            hotkey_spans.extend(key("^N", ":Sign up  "));
            hotkey_spans.extend(key("Esc", ":Quit"));
            return hotkey_spans;
        }
        Route::Signup => {
            hotkey_spans.extend(key("Tab", ":Next field  "));
            hotkey_spans.extend(key("Enter", ":Create account  "));
            hotkey_spans.extend(key("Esc", ":Back to login"));
            return hotkey_spans;
        }
        Route::Compose => {
            hotkey_spans.extend(key("Tab/⇧Tab", ":Field  "));
            hotkey_spans.extend(key("←/→", ":Change  "));
            hotkey_spans.extend(key("↑/↓", ":Option  "));
            hotkey_spans.extend(key("Space", ":Toggle  "));
            hotkey_spans.extend(key("a/n", ":All/None  "));
            hotkey_spans.extend(key("r", ":Retry lookup  "));
            hotkey_spans.extend(key("^S", ":Publish  "));
            hotkey_spans.extend(key("^D", ":Save draft  "));
            hotkey_spans.extend(key("Esc", ":Back"));
            return hotkey_spans;
        }
        Route::Upload => {
            hotkey_spans.extend(key("Tab/⇧Tab", ":Field  "));
            hotkey_spans.extend(key("^T", ":Students/Teachers  "));
            hotkey_spans.extend(key("^O", ":Bulk/Manual  "));
            if ctx.upload_mode == UploadMode::Bulk {
                hotkey_spans.extend(key("Space", ":Toggle  "));
                if ctx.upload_focus == UploadField::Review {
                    hotkey_spans.extend(key("a/n", ":All/None  "));
                    hotkey_spans.extend(key("u", ":Update selected  "));
                    hotkey_spans.extend(key("x", ":Discard  "));
                } else if matches!(ctx.upload_focus, UploadField::Target(_)) {
                    hotkey_spans.extend(key("r", ":Retry lookup  "));
                }
                hotkey_spans.extend(key("^S", ":Upload  "));
            } else {
                hotkey_spans.extend(key("^S", ":Save  "));
            }
            hotkey_spans.extend(key("Esc", ":Back"));
            return hotkey_spans;
        }
        _ => {}
    }

    if ctx.search_mode {
        hotkey_spans.extend(key("Enter", ":Keep filter  "));
        hotkey_spans.extend(key("Esc", ":Clear search"));
        return hotkey_spans;
    }

    hotkey_spans.extend([
        Span::styled(nav, Style::default().fg(Color::Yellow)),
        Span::raw(":Nav  "),
    ]);

    match ctx.route {
        Route::NoticeDetail => {
            hotkey_spans.extend(key("Esc", ":Back  "));
        }
        Route::Analytics => {
            hotkey_spans.extend(key("r", ":Refresh  "));
            hotkey_spans.extend(key("Esc", ":Back  "));
        }
        _ => {
            hotkey_spans.extend(key("Enter", ":Open  "));
            hotkey_spans.extend(key("/", ":Search  "));
            if ctx.is_admin {
                hotkey_spans.extend(key("t", ":Type  "));
            } else {
                hotkey_spans.extend(key("p", ":Priority  "));
            }
            hotkey_spans.extend(key("r", ":Refresh  "));
        }
    }

    // Admin actions on notices
    if ctx.is_admin && ctx.route != Route::Analytics {
        hotkey_spans.extend(key("a", ":Analytics  "));
        hotkey_spans.extend(key("d", ":Delete  "));
    }
    if ctx.is_admin && ctx.route == Route::AdminDashboard {
        hotkey_spans.extend(key("c", ":Compose  "));
        hotkey_spans.extend(key("u", ":Upload  "));
        hotkey_spans.extend(key("n", ":All notices  "));
    }

    hotkey_spans.extend(key("L", ":Logout  "));
    hotkey_spans.extend(key("?", ":Help  "));
    hotkey_spans.extend(key("q", ":Quit"));

    hotkey_spans
}

/// Build the legend paragraph (reusable for both rendering and height calculation)
pub fn build_legend_paragraph(ctx: &LegendContext) -> Paragraph<'static> {
    Paragraph::new(vec![Line::from(build_hotkey_spans(ctx))])
        .block(Block::default().borders(Borders::ALL).title("Hotkeys"))
        .style(Style::default().fg(Color::Gray))
        .wrap(ratatui::widgets::Wrap { trim: false })
}

pub fn render_legend(f: &mut Frame, area: Rect, ctx: &LegendContext) {
    f.render_widget(build_legend_paragraph(ctx), area);
}

/// Required legend height for the terminal width, borders included
pub fn calculate_legend_height(terminal_width: u16, ctx: &LegendContext) -> u16 {
    // Count lines without the block; line_count() ignores borders
    let paragraph_for_counting = Paragraph::new(vec![Line::from(build_hotkey_spans(ctx))])
        .wrap(ratatui::widgets::Wrap { trim: false });

    let available_width = terminal_width.saturating_sub(2);
    let line_count = paragraph_for_counting.line_count(available_width);

    (line_count as u16).saturating_add(2).max(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use noticetui::logic::cascade::CascadeField;

    fn ctx(route: Route, is_admin: bool) -> LegendContext {
        LegendContext {
            route,
            vim_mode: false,
            is_admin,
            search_mode: false,
            upload_mode: UploadMode::Bulk,
            upload_focus: UploadField::Target(CascadeField::Department),
        }
    }

    fn spans_to_text(spans: &[Span]) -> String {
        spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_user_list_hides_admin_actions() {
        let text = spans_to_text(&build_hotkey_spans(&ctx(Route::UserHome, false)));
        assert!(text.contains(":Priority"));
        assert!(!text.contains(":Delete"));
        assert!(!text.contains(":Compose"));
    }

    #[test]
    fn test_admin_dashboard_shows_admin_actions() {
        let text = spans_to_text(&build_hotkey_spans(&ctx(Route::AdminDashboard, true)));
        assert!(text.contains(":Delete"));
        assert!(text.contains(":Upload"));
        assert!(text.contains(":Type"));
    }

    #[test]
    fn test_review_keys_only_when_review_focused() {
        let mut c = ctx(Route::Upload, true);
        assert!(!spans_to_text(&build_hotkey_spans(&c)).contains(":Update selected"));
        c.upload_focus = UploadField::Review;
        assert!(spans_to_text(&build_hotkey_spans(&c)).contains(":Update selected"));
    }

    #[test]
    fn test_vim_mode_nav_label() {
        let mut c = ctx(Route::NoticeList, false);
        c.vim_mode = true;
        assert!(spans_to_text(&build_hotkey_spans(&c)).starts_with("j/k"));
    }

    #[test]
    fn test_legend_height_grows_when_narrow() {
        let c = ctx(Route::AdminDashboard, true);
        assert_eq!(calculate_legend_height(400, &c), 3);
        assert!(calculate_legend_height(40, &c) > 3);
    }
}
