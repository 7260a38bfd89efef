//! Notice Model
//!
//! Fetched notices, the active filter, the open notice and its analytics.

use std::collections::HashSet;

use crate::api::{Notice, NoticeAnalytics, NoticeReads};
use crate::logic::navigation::clamp_selection;
use crate::logic::notices::{filter_notices, summarize, NoticeCounts, NoticeFilter};

#[derive(Clone, Debug, Default)]
pub struct NoticesModel {
    /// Notices as returned by the server
    pub notices: Vec<Notice>,

    /// Indices into `notices` passing the filter
    pub visible: Vec<usize>,

    pub filter: NoticeFilter,

    /// Selected row within `visible`
    pub selection: Option<usize>,

    pub loading: bool,

    /// Ids opened during this session
    pub read_ids: HashSet<String>,

    /// Notice shown on the detail screen
    pub detail: Option<Notice>,
    pub detail_loading: bool,
    pub detail_scroll: u16,

    /// Analytics screen for one notice
    pub analytics_for: Option<String>,
    pub analytics: Option<NoticeAnalytics>,
    pub reads: Option<NoticeReads>,
    pub reads_selection: Option<usize>,
}

impl NoticesModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list and re-apply the current filter
    pub fn set_notices(&mut self, notices: Vec<Notice>) {
        self.notices = notices;
        self.loading = false;
        self.apply_filter();
    }

    pub fn apply_filter(&mut self) {
        self.visible = filter_notices(&self.notices, &self.filter);
        self.selection = clamp_selection(self.selection, self.visible.len());
    }

    pub fn selected_notice(&self) -> Option<&Notice> {
        self.selection
            .and_then(|i| self.visible.get(i))
            .and_then(|i| self.notices.get(*i))
    }

    pub fn counts(&self) -> NoticeCounts {
        summarize(&self.notices, &self.read_ids)
    }

    pub fn mark_read(&mut self, id: &str) {
        self.read_ids.insert(id.to_string());
    }

    pub fn is_read(&self, id: &str) -> bool {
        self.read_ids.contains(id)
    }

    /// Drop a deleted notice from every view
    pub fn remove(&mut self, id: &str) {
        self.notices.retain(|n| n.id != id);
        if self.detail.as_ref().is_some_and(|n| n.id == id) {
            self.detail = None;
        }
        self.apply_filter();
    }

    pub fn open_analytics(&mut self, id: &str) {
        self.analytics_for = Some(id.to_string());
        self.analytics = None;
        self.reads = None;
        self.reads_selection = None;
    }

    /// Clear everything tied to the logged-in account
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Admin dashboard counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardModel {
    pub total_notices: Option<u64>,
    pub users_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Priority;

    fn notice(id: &str, title: &str, priority: Priority) -> Notice {
        Notice {
            id: id.to_string(),
            title: title.to_string(),
            priority,
            ..Notice::default()
        }
    }

    fn model() -> NoticesModel {
        let mut m = NoticesModel::new();
        m.set_notices(vec![
            notice("a", "Exam timetable", Priority::High),
            notice("b", "Sports day", Priority::Low),
            notice("c", "Exam results", Priority::Critical),
        ]);
        m
    }

    #[test]
    fn test_set_notices_selects_first() {
        let m = model();
        assert_eq!(m.visible, vec![0, 1, 2]);
        assert_eq!(m.selected_notice().unwrap().id, "a");
    }

    #[test]
    fn test_filter_clamps_selection() {
        let mut m = model();
        m.selection = Some(2);
        m.filter.query = "sports".to_string();
        m.apply_filter();
        assert_eq!(m.visible, vec![1]);
        assert_eq!(m.selected_notice().unwrap().id, "b");
    }

    #[test]
    fn test_remove_clears_detail() {
        let mut m = model();
        m.detail = Some(notice("b", "Sports day", Priority::Low));
        m.remove("b");
        assert!(m.detail.is_none());
        assert_eq!(m.notices.len(), 2);
    }

    #[test]
    fn test_counts_track_local_reads() {
        let mut m = model();
        assert_eq!(m.counts().unread, 3);
        m.mark_read("a");
        assert_eq!(m.counts().unread, 2);
        assert_eq!(m.counts().urgent, 2);
    }
}
