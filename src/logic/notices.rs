//! Notice list filtering and display helpers
//!
//! Pure functions used by the notice list, detail and analytics screens.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime};

use crate::api::{Notice, Priority};

/// Notice types offered by the compose form
pub const NOTICE_TYPES: [&str; 5] = ["Academic", "Event", "Exam", "Holiday", "Other"];

/// Case-insensitive match on title, content or department
///
/// # Examples
/// ```
/// use noticetui::api::Notice;
/// use noticetui::logic::notices::matches_search;
///
/// let notice = Notice {
///     id: "1".into(),
///     title: "Exam Timetable".into(),
///     departments: vec!["Physics".into()],
///     ..Notice::default()
/// };
/// assert!(matches_search(&notice, "timetable"));
/// assert!(matches_search(&notice, "PHYS"));
/// assert!(matches_search(&notice, ""));
/// assert!(!matches_search(&notice, "holiday"));
/// ```
pub fn matches_search(notice: &Notice, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    notice.title.to_lowercase().contains(&query)
        || notice.content.to_lowercase().contains(&query)
        || notice
            .departments
            .iter()
            .any(|d| d.to_lowercase().contains(&query))
}

/// Filters applied to a notice list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeFilter {
    pub query: String,
    /// None means all priorities
    pub priority: Option<Priority>,
    /// None means all notice types
    pub notice_type: Option<String>,
}

impl NoticeFilter {
    pub fn matches(&self, notice: &Notice) -> bool {
        if !matches_search(notice, &self.query) {
            return false;
        }
        if let Some(priority) = self.priority {
            if notice.priority != priority {
                return false;
            }
        }
        if let Some(notice_type) = &self.notice_type {
            let matches = notice
                .notice_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(notice_type));
            if !matches {
                return false;
            }
        }
        true
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty() || self.priority.is_some() || self.notice_type.is_some()
    }
}

/// Indices of the notices passing `filter`, in list order
pub fn filter_notices(notices: &[Notice], filter: &NoticeFilter) -> Vec<usize> {
    notices
        .iter()
        .enumerate()
        .filter(|(_, n)| filter.matches(n))
        .map(|(i, _)| i)
        .collect()
}

/// Cycle: all -> low -> medium -> high -> critical -> all
pub fn cycle_priority_filter(current: Option<Priority>) -> Option<Priority> {
    match current {
        None => Some(Priority::Low),
        Some(Priority::Low) => Some(Priority::Medium),
        Some(Priority::Medium) => Some(Priority::High),
        Some(Priority::High) => Some(Priority::Critical),
        Some(Priority::Critical) => None,
    }
}

/// Cycle through [`NOTICE_TYPES`], wrapping back to "all"
pub fn cycle_type_filter(current: Option<&str>) -> Option<String> {
    let next = match current {
        None => 0,
        Some(t) => match NOTICE_TYPES.iter().position(|n| *n == t) {
            Some(i) => i + 1,
            None => 0,
        },
    };
    NOTICE_TYPES.get(next).map(|s| s.to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoticeCounts {
    pub total: usize,
    pub unread: usize,
    /// High or critical
    pub urgent: usize,
}

pub fn summarize(notices: &[Notice], read: &HashSet<String>) -> NoticeCounts {
    NoticeCounts {
        total: notices.len(),
        unread: notices.iter().filter(|n| !read.contains(&n.id)).count(),
        urgent: notices
            .iter()
            .filter(|n| n.priority >= Priority::High)
            .count(),
    }
}

/// Rounded percentage of `readers` over `audience`; 0 when there is no audience
///
/// # Examples
/// ```
/// use noticetui::logic::notices::read_rate;
///
/// assert_eq!(read_rate(1, 3), 33);
/// assert_eq!(read_rate(2, 3), 67);
/// assert_eq!(read_rate(5, 0), 0);
/// ```
pub fn read_rate(readers: u64, audience: u64) -> u64 {
    if audience == 0 {
        return 0;
    }
    ((readers as f64 / audience as f64) * 100.0).round() as u64
}

/// Reduce rich-text HTML to plain text for the terminal
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut tag = String::new();
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let name = tag
                    .trim_start_matches('/')
                    .split(|c: char| c.is_whitespace() || c == '/')
                    .next()
                    .unwrap_or("")
                    .to_lowercase();
                if matches!(name.as_str(), "p" | "br" | "div" | "li" | "h1" | "h2" | "h3" | "tr")
                    && !text.ends_with('\n')
                {
                    text.push('\n');
                }
                if name == "li" && !tag.starts_with('/') {
                    text.push_str("• ");
                }
            }
            _ if in_tag => tag.push(ch),
            _ => text.push(ch),
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    let mut lines: Vec<&str> = Vec::new();
    for line in decoded.lines().map(str::trim_end) {
        if line.trim().is_empty() && lines.last().map_or(true, |l| l.trim().is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Render a server timestamp as "20 May 2024, 10:15"; unparseable input is returned as-is
///
/// # Examples
/// ```
/// use noticetui::logic::notices::format_timestamp;
///
/// assert_eq!(format_timestamp("2024-05-20T10:15:00"), "20 May 2024, 10:15");
/// assert_eq!(format_timestamp("2024-05-20T10:15:00.123456"), "20 May 2024, 10:15");
/// assert_eq!(format_timestamp("2024-05-20T10:15:00+00:00"), "20 May 2024, 10:15");
/// assert_eq!(format_timestamp("yesterday"), "yesterday");
/// ```
pub fn format_timestamp(raw: &str) -> String {
    const OUT: &str = "%d %b %Y, %H:%M";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(OUT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(OUT).to_string();
    }
    raw.to_string()
}

/// One-line description of a notice's audience
pub fn format_audience(notice: &Notice) -> String {
    let part = |values: &[String], all: &str| {
        if values.is_empty() {
            all.to_string()
        } else {
            values.join(", ")
        }
    };

    format!(
        "{} / {} / {} / {}",
        part(&notice.departments, "All departments"),
        part(&notice.program_course, "All courses"),
        part(&notice.year, "All years"),
        part(&notice.section, "All sections"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(id: &str, title: &str, priority: Priority, notice_type: &str) -> Notice {
        Notice {
            id: id.to_string(),
            title: title.to_string(),
            priority,
            notice_type: Some(notice_type.to_string()),
            ..Notice::default()
        }
    }

    fn sample() -> Vec<Notice> {
        vec![
            notice("1", "Library closed", Priority::Low, "Holiday"),
            notice("2", "Mid-term exams", Priority::Critical, "Exam"),
            notice("3", "Hackathon", Priority::High, "Event"),
            notice("4", "Fee reminder", Priority::Medium, "Academic"),
        ]
    }

    #[test]
    fn test_filter_by_priority() {
        let filter = NoticeFilter {
            priority: Some(Priority::Critical),
            ..NoticeFilter::default()
        };
        assert_eq!(filter_notices(&sample(), &filter), vec![1]);
    }

    #[test]
    fn test_filter_by_type_ignores_case() {
        let filter = NoticeFilter {
            notice_type: Some("event".to_string()),
            ..NoticeFilter::default()
        };
        assert_eq!(filter_notices(&sample(), &filter), vec![2]);
    }

    #[test]
    fn test_filter_combines_search_and_priority() {
        let filter = NoticeFilter {
            query: "e".to_string(),
            priority: Some(Priority::Medium),
            notice_type: None,
        };
        assert_eq!(filter_notices(&sample(), &filter), vec![3]);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = NoticeFilter::default();
        assert!(!filter.is_active());
        assert_eq!(filter_notices(&sample(), &filter).len(), 4);
    }

    #[test]
    fn test_cycle_priority_filter_wraps() {
        let mut current = None;
        let mut seen = Vec::new();
        for _ in 0..5 {
            current = cycle_priority_filter(current);
            seen.push(current);
        }
        assert_eq!(
            seen,
            vec![
                Some(Priority::Low),
                Some(Priority::Medium),
                Some(Priority::High),
                Some(Priority::Critical),
                None
            ]
        );
    }

    #[test]
    fn test_cycle_type_filter_wraps() {
        assert_eq!(cycle_type_filter(None).as_deref(), Some("Academic"));
        assert_eq!(cycle_type_filter(Some("Holiday")).as_deref(), Some("Other"));
        assert_eq!(cycle_type_filter(Some("Other")), None);
    }

    #[test]
    fn test_summarize_counts() {
        let read: HashSet<String> = ["1".to_string(), "3".to_string()].into_iter().collect();
        let counts = summarize(&sample(), &read);
        assert_eq!(
            counts,
            NoticeCounts {
                total: 4,
                unread: 2,
                urgent: 2
            }
        );
    }

    #[test]
    fn test_strip_html_paragraphs_and_entities() {
        let html = "<p>Dear students,</p><p>Exams start on <b>Monday</b> &amp; end Friday.</p>";
        assert_eq!(
            strip_html(html),
            "Dear students,\nExams start on Monday & end Friday."
        );
    }

    #[test]
    fn test_strip_html_list_items() {
        let html = "<ul><li>One</li><li>Two</li></ul>";
        assert_eq!(strip_html(html), "• One\n• Two");
    }

    #[test]
    fn test_strip_html_plain_text_untouched() {
        assert_eq!(strip_html("No markup here"), "No markup here");
    }

    #[test]
    fn test_format_audience_defaults() {
        let n = Notice {
            departments: vec!["CSE".to_string()],
            ..Notice::default()
        };
        assert_eq!(
            format_audience(&n),
            "CSE / All courses / All years / All sections"
        );
    }
}
