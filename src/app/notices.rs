//! Notice browsing: list, detail, delete, analytics and filters

use noticetui::logic::navigation::{clamp_selection, next_selection, prev_selection};
use noticetui::logic::notices::{cycle_priority_filter, cycle_type_filter};
use noticetui::logic::routing::Route;
use noticetui::model::ui::ConfirmDelete;
use noticetui::services::ApiRequest;

use crate::App;

/// Where a list movement should land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Movement {
    Next,
    Prev,
    First,
    Last,
}

fn moved(current: Option<usize>, len: usize, movement: Movement) -> Option<usize> {
    match movement {
        Movement::Next => next_selection(current, len),
        Movement::Prev => prev_selection(current, len),
        Movement::First => clamp_selection(Some(0), len),
        Movement::Last => clamp_selection(Some(usize::MAX), len),
    }
}

impl App {
    pub(crate) fn load_notices(&mut self) {
        self.model.notices.loading = true;
        self.send(ApiRequest::ListNotices);
    }

    pub(crate) fn load_dashboard(&mut self) {
        self.load_notices();
        self.send(ApiRequest::GetOverallAnalytics);
        self.send(ApiRequest::GetUsersCount);
    }

    /// Reload whatever the current screen shows
    pub(crate) fn load_home(&mut self) {
        match self.model.route() {
            Route::AdminDashboard => self.load_dashboard(),
            Route::NoticeList | Route::UserHome => self.load_notices(),
            Route::NoticeDetail => {
                if let Some(id) = self.model.notices.detail.as_ref().map(|n| n.id.clone()) {
                    self.model.notices.detail_loading = true;
                    self.send(ApiRequest::GetNotice { id });
                }
            }
            Route::Analytics => self.refresh_analytics(),
            _ => {}
        }
    }

    /// Full-screen list from the dashboard
    pub(crate) fn open_notice_list(&mut self) {
        if self.model.route() != Route::AdminDashboard {
            return;
        }
        self.model.navigate(Route::NoticeList);
        self.load_notices();
    }

    /// Id of the notice an action applies to on this screen
    fn current_notice(&self) -> Option<(String, String)> {
        match self.model.route() {
            Route::NoticeDetail => self.model.notices.detail.as_ref(),
            _ => self.model.notices.selected_notice(),
        }
        .map(|n| (n.id.clone(), n.title.clone()))
    }

    pub(crate) fn move_selection(&mut self, movement: Movement) {
        let notices = &mut self.model.notices;
        match self.model.ui.route {
            Route::NoticeDetail => {
                notices.detail_scroll = match movement {
                    Movement::Next => notices.detail_scroll.saturating_add(1),
                    Movement::Prev => notices.detail_scroll.saturating_sub(1),
                    Movement::First => 0,
                    Movement::Last => notices.detail_scroll.saturating_add(20),
                };
            }
            Route::Analytics => {
                let len = notices.reads.as_ref().map(|r| r.reads.len()).unwrap_or(0);
                notices.reads_selection = moved(notices.reads_selection, len, movement);
            }
            _ => {
                notices.selection = moved(notices.selection, notices.visible.len(), movement);
            }
        }
    }

    /// Show the selected notice; the cached copy is displayed until the fetch lands
    pub(crate) fn open_selected_notice(&mut self) {
        let Some(notice) = self.model.notices.selected_notice().cloned() else {
            return;
        };
        let id = notice.id.clone();
        let notices = &mut self.model.notices;
        notices.detail = Some(notice);
        notices.detail_loading = true;
        notices.detail_scroll = 0;
        self.model.navigate(Route::NoticeDetail);
        self.send(ApiRequest::GetNotice { id });
    }

    pub(crate) fn request_delete(&mut self) {
        if !self.model.session.is_admin() {
            return;
        }
        if let Some((notice_id, title)) = self.current_notice() {
            self.model.ui.confirm_delete = Some(ConfirmDelete { notice_id, title });
        }
    }

    pub(crate) fn confirm_delete(&mut self) {
        if let Some(pending) = self.model.ui.confirm_delete.take() {
            self.send(ApiRequest::DeleteNotice {
                id: pending.notice_id,
            });
        }
    }

    pub(crate) fn open_analytics(&mut self) {
        if !self.model.session.is_admin() {
            return;
        }
        let Some((id, _)) = self.current_notice() else {
            return;
        };
        self.model.notices.open_analytics(&id);
        self.model.navigate(Route::Analytics);
        self.refresh_analytics();
    }

    pub(crate) fn refresh_analytics(&mut self) {
        let Some(id) = self.model.notices.analytics_for.clone() else {
            return;
        };
        self.send(ApiRequest::GetNoticeAnalytics { id: id.clone() });
        self.send(ApiRequest::GetNoticeReads { id });
        // Read rate needs the audience size
        self.send(ApiRequest::GetUsersCount);
    }

    pub(crate) fn start_search(&mut self) {
        self.model.ui.search_mode = true;
    }

    pub(crate) fn search_input(&mut self, c: char) {
        self.model.notices.filter.query.push(c);
        self.model.notices.apply_filter();
    }

    pub(crate) fn search_backspace(&mut self) {
        self.model.notices.filter.query.pop();
        self.model.notices.apply_filter();
    }

    /// Leave search mode, keeping or dropping the query
    pub(crate) fn end_search(&mut self, keep: bool) {
        self.model.ui.search_mode = false;
        if !keep {
            self.model.notices.filter.query.clear();
            self.model.notices.apply_filter();
        }
    }

    pub(crate) fn cycle_priority_filter(&mut self) {
        let filter = &mut self.model.notices.filter;
        filter.priority = cycle_priority_filter(filter.priority);
        self.model.notices.apply_filter();
    }

    pub(crate) fn cycle_type_filter(&mut self) {
        let filter = &mut self.model.notices.filter;
        filter.notice_type = cycle_type_filter(filter.notice_type.as_deref());
        self.model.notices.apply_filter();
    }
}
