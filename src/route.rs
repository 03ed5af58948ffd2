//! In-app routes. There is no URL bar; `--route` picks the first page.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Demo,
    Research,
}

/// A navigation bar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
}

pub const NAV_LINKS: [NavLink; 3] = [
    NavLink {
        label: "Home",
        route: Route::Home,
    },
    NavLink {
        label: "Try Demo",
        route: Route::Demo,
    },
    NavLink {
        label: "Research",
        route: Route::Research,
    },
];

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Demo => "/demo",
            Route::Research => "/research",
        }
    }

    /// Map a path to a route. Trailing slashes are ignored; unknown paths are `None`.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        match trimmed {
            "" | "#" => Some(Route::Home),
            "/demo" | "#/demo" => Some(Route::Demo),
            "/research" | "#/research" => Some(Route::Research),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
