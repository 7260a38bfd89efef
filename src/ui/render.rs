use crate::App;
use noticetui::logic::routing::Route;
use ratatui::Frame;

use super::{
    analytics, auth, compose, dashboard, dialogs, header, layout, legend, notice_detail,
    notice_list, status_bar, toast, upload,
};

/// Main render function - orchestrates all UI rendering
pub fn render(f: &mut Frame, app: &App) {
    let size = f.area();
    let model = &app.model;

    let legend_ctx = legend::LegendContext {
        route: model.route(),
        vim_mode: model.ui.vim_mode,
        is_admin: model.session.is_admin(),
        search_mode: model.ui.search_mode,
        upload_mode: model.upload.mode,
        upload_focus: model.upload.focus,
    };
    let legend_height = legend::calculate_legend_height(size.width, &legend_ctx);
    let layout_info = layout::calculate_layout(size, legend_height);

    header::render_header(
        f,
        layout_info.header_area,
        model.route(),
        &model.session,
        &app.base_url,
    );

    let body = layout_info.content_area;
    match model.route() {
        Route::Login => auth::render_login(f, body, &model.login),
        Route::Signup => auth::render_signup(f, body, &model.signup),
        Route::AdminDashboard => dashboard::render_dashboard(
            f,
            body,
            &model.dashboard,
            &model.notices,
            model.ui.search_mode,
        ),
        Route::NoticeList => notice_list::render_notice_list(
            f,
            body,
            &model.notices,
            model.ui.search_mode,
            "All notices",
        ),
        Route::UserHome => notice_list::render_notice_list(
            f,
            body,
            &model.notices,
            model.ui.search_mode,
            "Notices for you",
        ),
        Route::NoticeDetail => notice_detail::render_notice_detail(f, body, &model.notices),
        Route::Compose => compose::render_compose(f, body, &model.compose),
        Route::Analytics => analytics::render_analytics(f, body, &model.notices, &model.dashboard),
        Route::Upload => upload::render_upload(f, body, &model.upload),
    }

    legend::render_legend(f, layout_info.legend_area, &legend_ctx);
    status_bar::render_status_bar(f, layout_info.status_area, model);

    // Dialogs on top of everything else
    if let Some(pending) = &model.ui.confirm_delete {
        dialogs::render_delete_confirmation(f, &pending.title);
    }
    if model.ui.confirm_logout {
        dialogs::render_logout_confirmation(f);
    }
    if model.ui.show_help {
        dialogs::render_help(f, model.ui.vim_mode);
    }

    if let Some((message, kind, _)) = &model.ui.toast {
        toast::render_toast(f, size, message, *kind);
    }
}
