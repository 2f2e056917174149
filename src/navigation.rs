//! In-app routes and the single navigator that every redirect flows through.
//! The HTTP client's 401 hook and the navigation guard both emit here, so the
//! console only ever changes view in one place.

use std::{fmt, sync::Arc};
use tokio::sync::watch;
use tracing::debug;

/// Console routes, mirroring the web application's paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Register,
    Dashboard,
    Profile,
    Admin,
    AdminUsers,
    AdminUserCreate,
    AdminUserEdit(u64),
    AdminLoginActivities,
    NotFound(String),
}

/// Access requirement attached to a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Any authenticated session.
    Authenticated,
    /// Authenticated with the admin role.
    AdminOnly,
}

impl Route {
    /// Parses a path such as `/admin/users/edit/7`; trailing slashes are ignored.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');

        match normalized {
            "" => Self::Root,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/profile" => Self::Profile,
            "/admin" => Self::Admin,
            "/admin/users" => Self::AdminUsers,
            "/admin/users/create" => Self::AdminUserCreate,
            "/admin/login-activities" => Self::AdminLoginActivities,
            other => other
                .strip_prefix("/admin/users/edit/")
                .and_then(|id| id.parse::<u64>().ok())
                .map_or_else(|| Self::NotFound(trimmed.to_string()), Self::AdminUserEdit),
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Root => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Admin => "/admin".to_string(),
            Self::AdminUsers => "/admin/users".to_string(),
            Self::AdminUserCreate => "/admin/users/create".to_string(),
            Self::AdminUserEdit(id) => format!("/admin/users/edit/{id}"),
            Self::AdminLoginActivities => "/admin/login-activities".to_string(),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Access requirement for protected routes; `None` for public ones.
    #[must_use]
    pub fn access(&self) -> Option<Access> {
        match self {
            Self::Dashboard | Self::Profile => Some(Access::Authenticated),
            Self::Admin
            | Self::AdminUsers
            | Self::AdminUserCreate
            | Self::AdminUserEdit(_)
            | Self::AdminLoginActivities => Some(Access::AdminOnly),
            Self::Root | Self::Login | Self::Register | Self::NotFound(_) => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.path())
    }
}

/// Router-aware redirect handler shared by the client, the guard and the views.
#[derive(Clone, Debug)]
pub struct Navigator {
    current: Arc<watch::Sender<Route>>,
}

impl Navigator {
    #[must_use]
    pub fn new(initial: Route) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            current: Arc::new(sender),
        }
    }

    /// Moves to `to`. `/` always lands on `/login`.
    pub fn navigate(&self, to: Route) {
        let to = if to == Route::Root { Route::Login } else { to };
        debug!(route = %to, "navigate");
        self.current.send_replace(to);
    }

    #[must_use]
    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_paths() {
        assert_eq!(Route::parse("/"), Route::Root);
        assert_eq!(Route::parse("/login/"), Route::Login);
        assert_eq!(Route::parse("/admin/users"), Route::AdminUsers);
        assert_eq!(Route::parse("/admin/users/create"), Route::AdminUserCreate);
        assert_eq!(Route::parse("/admin/users/edit/42"), Route::AdminUserEdit(42));
        assert_eq!(
            Route::parse("/admin/login-activities"),
            Route::AdminLoginActivities
        );
    }

    #[test]
    fn parse_unknown_paths() {
        assert_eq!(
            Route::parse("/admin/users/edit/abc"),
            Route::NotFound("/admin/users/edit/abc".to_string())
        );
        assert_eq!(Route::parse("/nope"), Route::NotFound("/nope".to_string()));
    }

    #[test]
    fn path_round_trips_for_edit() {
        assert_eq!(Route::AdminUserEdit(7).path(), "/admin/users/edit/7");
        assert_eq!(Route::parse(&Route::AdminUserEdit(7).path()), Route::AdminUserEdit(7));
    }

    #[test]
    fn access_requirements() {
        assert_eq!(Route::Login.access(), None);
        assert_eq!(Route::Dashboard.access(), Some(Access::Authenticated));
        assert_eq!(Route::AdminLoginActivities.access(), Some(Access::AdminOnly));
    }

    #[test]
    fn navigate_updates_current_and_subscribers() {
        let navigator = Navigator::default();
        let mut receiver = navigator.subscribe();

        navigator.navigate(Route::Dashboard);

        assert_eq!(navigator.current(), Route::Dashboard);
        assert!(receiver.has_changed().unwrap_or(false));
        assert_eq!(*receiver.borrow_and_update(), Route::Dashboard);
    }

    #[test]
    fn root_redirects_to_login() {
        let navigator = Navigator::new(Route::Dashboard);
        navigator.navigate(Route::Root);
        assert_eq!(navigator.current(), Route::Login);
    }
}
