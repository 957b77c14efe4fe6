use std::fmt;

use crate::client::backend::AuthBackend;
use crate::client::session::{SessionState, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    SignUp,
    SignIn,
    Search,
    OrganizationInfo,
    Dashboard,
    CreateActivity,
    EditActivity(i32),
    Settings,
}

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        let route = match path.to_lowercase().as_str() {
            "" => Route::Landing,
            "/signup" => Route::SignUp,
            "/signin" => Route::SignIn,
            "/search" => Route::Search,
            "/organization" => Route::OrganizationInfo,
            "/dashboard" => Route::Dashboard,
            "/activities/new" => Route::CreateActivity,
            "/settings" => Route::Settings,
            other => {
                let id = other.strip_prefix("/activities/")?.strip_suffix("/edit")?;
                Route::EditActivity(id.parse().ok()?)
            }
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".into(),
            Route::SignUp => "/signup".into(),
            Route::SignIn => "/signin".into(),
            Route::Search => "/search".into(),
            Route::OrganizationInfo => "/organization".into(),
            Route::Dashboard => "/dashboard".into(),
            Route::CreateActivity => "/activities/new".into(),
            Route::EditActivity(id) => format!("/activities/{}/edit", id),
            Route::Settings => "/settings".into(),
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard | Route::CreateActivity | Route::EditActivity(_) | Route::Settings)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Session still loading; show a spinner.
    Pending,
    Allow,
    Redirect(Route),
}

pub fn guard<B>(route: &Route, store: &SessionStore<B>) -> Access
where
    B: AuthBackend,
{
    if !route.is_protected() {
        return Access::Allow;
    }
    match store.state() {
        SessionState::Uninitialized => Access::Pending,
        SessionState::SignedIn(_) => Access::Allow,
        SessionState::SignedOut => Access::Redirect(Route::SignIn),
    }
}
