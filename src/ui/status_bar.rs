use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use noticetui::logic::routing::Route;
use noticetui::model::Model;

/// Plain-text status for the current screen
pub fn status_text(model: &Model) -> String {
    match model.route() {
        Route::Login | Route::Signup => "Not signed in".to_string(),
        Route::NoticeList | Route::UserHome | Route::AdminDashboard => {
            let notices = &model.notices;
            if notices.loading {
                return "Loading notices...".to_string();
            }
            let counts = notices.counts();
            let mut text = format!(
                "{} of {} shown │ {} unread │ {} urgent",
                notices.visible.len(),
                counts.total,
                counts.unread,
                counts.urgent
            );
            let filter = &notices.filter;
            if let Some(priority) = filter.priority {
                text.push_str(&format!(" │ priority: {}", priority.as_str()));
            }
            if let Some(kind) = &filter.notice_type {
                text.push_str(&format!(" │ type: {}", kind));
            }
            if !filter.query.is_empty() {
                text.push_str(&format!(" │ search: \"{}\"", filter.query));
            }
            text
        }
        Route::NoticeDetail => {
            if model.notices.detail_loading {
                "Loading notice...".to_string()
            } else {
                match &model.notices.detail {
                    Some(n) if model.notices.is_read(&n.id) => "Read".to_string(),
                    Some(_) => "Unread".to_string(),
                    None => String::new(),
                }
            }
        }
        Route::Compose => {
            if model.compose.submitting {
                "Submitting notice...".to_string()
            } else {
                format!(
                    "{} recipient email(s) │ {} attachment(s)",
                    model.compose.recipients.len(),
                    model.compose.attachments.len()
                )
            }
        }
        Route::Analytics => match &model.notices.reads {
            Some(reads) => format!(
                "{} reads │ {} unique readers",
                reads.total_reads, reads.unique_readers
            ),
            None => "Loading analytics...".to_string(),
        },
        Route::Upload => {
            let upload = &model.upload;
            if upload.busy {
                "Working...".to_string()
            } else if let Some(review) = &upload.review {
                format!(
                    "{} conflict(s) pending │ {} selected",
                    review.len(),
                    review.selected_count()
                )
            } else {
                format!("{} roster", upload.kind.label())
            }
        }
    }
}

/// Render the bottom status line
pub fn render_status_bar(f: &mut Frame, area: Rect, model: &Model) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(status_text(model), Style::default().fg(Color::Gray)),
    ]));
    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use noticetui::api::{Notice, Priority, User};

    #[test]
    fn test_list_status_shows_counts_and_filter() {
        let mut model = Model::new(false);
        model.session.sign_in(User {
            id: "1".into(),
            name: "Ira".into(),
            email: "ira@x.io".into(),
            role: "user".into(),
        });
        model.go_home();
        model.notices.set_notices(vec![
            Notice {
                id: "a".into(),
                title: "Exam".into(),
                priority: Priority::High,
                ..Notice::default()
            },
            Notice {
                id: "b".into(),
                title: "Fest".into(),
                ..Notice::default()
            },
        ]);
        model.notices.filter.priority = Some(Priority::High);
        model.notices.apply_filter();

        let text = status_text(&model);
        assert!(text.starts_with("1 of 2 shown"));
        assert!(text.contains("1 urgent"));
        assert!(text.contains("priority: high"));
    }

    #[test]
    fn test_login_status() {
        assert_eq!(status_text(&Model::new(false)), "Not signed in");
    }
}
