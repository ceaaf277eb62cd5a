use serde::{Deserialize, Serialize};

use super::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub token: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated(AuthUser),
}

impl AuthState {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            AuthState::Unauthenticated => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

/// Where a denied screen sends the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Redirect(Route),
}

impl Access {
    pub fn is_granted(self) -> bool {
        self == Access::Granted
    }
}

/// Minimum-role guard placed in front of a screen or operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGate {
    pub required: Role,
}

impl RoleGate {
    pub const fn new(required: Role) -> Self {
        Self { required }
    }

    pub fn check(&self, state: &AuthState) -> Access {
        match state.role() {
            None => Access::Redirect(Route::Login),
            Some(role) if role.satisfies(self.required) => Access::Granted,
            Some(_) => Access::Redirect(Route::Home),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn signed_in(role: Role) -> AuthState {
        AuthState::Authenticated(AuthUser {
            token: "t".into(),
            email: "ana@example.com".into(),
            role,
        })
    }

    #[rstest]
    #[case(Role::Premium, Role::Gym, Access::Redirect(Route::Home))]
    #[case(Role::Premium, Role::Logued, Access::Granted)]
    #[case(Role::Gym, Role::Gym, Access::Granted)]
    #[case(Role::Admin, Role::Gym, Access::Granted)]
    #[case(Role::Logued, Role::Admin, Access::Redirect(Route::Home))]
    fn gate_compares_roles(#[case] role: Role, #[case] required: Role, #[case] expected: Access) {
        assert_eq!(RoleGate::new(required).check(&signed_in(role)), expected);
    }

    #[test]
    fn anonymous_is_sent_to_login() {
        let gate = RoleGate::new(Role::Logued);
        assert_eq!(
            gate.check(&AuthState::Unauthenticated),
            Access::Redirect(Route::Login)
        );
    }
}
