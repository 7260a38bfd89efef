//! Who is logged in, as far as the UI is concerned.
//!
//! Tokens never live here; they stay in `SessionStore`.

use crate::api::User;
use crate::logic::routing::Role;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionModel {
    pub role: Option<Role>,
    pub user: Option<User>,
}

impl SessionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.role.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn sign_in(&mut self, user: User) {
        self.role = Some(Role::parse(&user.role));
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) {
        self.role = None;
        self.user = None;
    }

    pub fn display_name(&self) -> &str {
        self.user.as_ref().map(|u| u.name.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_parses_role() {
        let mut s = SessionModel::new();
        s.sign_in(User {
            id: "1".into(),
            name: "Asha".into(),
            email: "a@x.io".into(),
            role: "admin".into(),
        });
        assert!(s.is_admin());
        assert_eq!(s.display_name(), "Asha");

        s.sign_out();
        assert!(!s.is_logged_in());
    }
}
