//! Screens and role-based routing

/// Role reported by the server for the logged-in account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
    Unknown,
}

impl Role {
    pub fn parse(raw: &str) -> Role {
        match raw.trim() {
            "admin" => Role::Admin,
            "user" => Role::User,
            _ => Role::Unknown,
        }
    }
}

/// Every screen the app can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    AdminDashboard,
    NoticeList,
    NoticeDetail,
    Compose,
    Analytics,
    Upload,
    UserHome,
}

impl Route {
    pub fn title(self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Signup => "Sign up",
            Route::AdminDashboard => "Dashboard",
            Route::NoticeList => "Notices",
            Route::NoticeDetail => "Notice",
            Route::Compose => "New notice",
            Route::Analytics => "Analytics",
            Route::Upload => "Students & teachers",
            Route::UserHome => "Notice board",
        }
    }

    /// Screens reachable without a session
    pub fn is_public(self) -> bool {
        matches!(self, Route::Login | Route::Signup)
    }

    pub fn is_admin_only(self) -> bool {
        matches!(
            self,
            Route::AdminDashboard | Route::Compose | Route::Analytics | Route::Upload
        )
    }
}

/// Landing screen after login (or session restore) for a role
///
/// # Examples
/// ```
/// use noticetui::logic::routing::{home_route, Role, Route};
///
/// assert_eq!(home_route(Role::Admin), Route::AdminDashboard);
/// assert_eq!(home_route(Role::User), Route::UserHome);
/// assert_eq!(home_route(Role::Unknown), Route::Login);
/// ```
pub fn home_route(role: Role) -> Route {
    match role {
        Role::Admin => Route::AdminDashboard,
        Role::User => Route::UserHome,
        Role::Unknown => Route::Login,
    }
}

/// Whether `role` may open `route`; anything refused falls back to the role's home
pub fn can_access(role: Option<Role>, route: Route) -> bool {
    match role {
        None => route.is_public(),
        Some(Role::Unknown) => route.is_public(),
        Some(Role::Admin) => true,
        Some(Role::User) => !route.is_admin_only(),
    }
}

/// Resolve a navigation attempt to the screen actually shown
pub fn resolve(role: Option<Role>, requested: Route) -> Route {
    if can_access(role, requested) {
        requested
    } else {
        role.map(home_route).unwrap_or(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("teacher"), Role::Unknown);
        assert_eq!(Role::parse(""), Role::Unknown);
    }

    #[test]
    fn test_user_cannot_open_admin_screens() {
        assert_eq!(resolve(Some(Role::User), Route::Compose), Route::UserHome);
        assert_eq!(resolve(Some(Role::User), Route::NoticeDetail), Route::NoticeDetail);
    }

    #[test]
    fn test_anonymous_goes_to_login() {
        assert_eq!(resolve(None, Route::NoticeList), Route::Login);
        assert_eq!(resolve(None, Route::Signup), Route::Signup);
    }

    #[test]
    fn test_admin_opens_everything() {
        assert_eq!(resolve(Some(Role::Admin), Route::Upload), Route::Upload);
        assert_eq!(resolve(Some(Role::Admin), Route::UserHome), Route::UserHome);
    }

    #[test]
    fn test_unknown_role_stays_on_login() {
        assert_eq!(resolve(Some(Role::Unknown), Route::UserHome), Route::Login);
    }
}
