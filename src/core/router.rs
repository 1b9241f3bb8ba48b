//! Path routing for `shop open <path>` and board navigation

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("No page at '{0}'. Known paths: {known}", known = Route::known_paths())]
    NotFound(String),
}

/// Staff role a dashboard is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Role {
    Owner,
    Dispatcher,
    Mechanic,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::Dispatcher => "Dispatcher",
            Role::Mechanic => "Mechanic",
        }
    }

    /// Landing page for the role
    pub fn home(&self) -> Route {
        match self {
            Role::Owner => Route::Owner,
            Role::Dispatcher => Route::Dispatch,
            Role::Mechanic => Route::Mechanic,
        }
    }
}

/// A navigable page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Owner,
    Units,
    Mechanics,
    Dispatch,
    Mechanic,
    WorkOrders,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::Owner,
        Route::Units,
        Route::Mechanics,
        Route::Dispatch,
        Route::Mechanic,
        Route::WorkOrders,
    ];

    /// Canonical path
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Owner => "/owner",
            Route::Units => "/owner/units",
            Route::Mechanics => "/owner/mechanics",
            Route::Dispatch => "/dispatch",
            Route::Mechanic => "/mechanic",
            Route::WorkOrders => "/work-orders",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Choose dashboard",
            Route::Owner => "Owner Dashboard",
            Route::Units => "Units",
            Route::Mechanics => "Mechanics",
            Route::Dispatch => "Dispatcher Dashboard",
            Route::Mechanic => "Mechanic Dashboard",
            Route::WorkOrders => "Work Orders",
        }
    }

    /// Pages reachable from this one
    pub fn links(&self) -> Vec<Route> {
        match self {
            Route::Home => vec![Route::Owner, Route::Dispatch, Route::Mechanic],
            Route::Owner => vec![Route::Units, Route::Mechanics, Route::WorkOrders],
            Route::Dispatch | Route::Mechanic => vec![Route::WorkOrders, Route::Home],
            Route::Units | Route::Mechanics => vec![Route::Owner],
            Route::WorkOrders => vec![Route::Home],
        }
    }

    /// Whether rendering the page needs the API
    pub fn needs_api(&self) -> bool {
        matches!(self, Route::Units | Route::Mechanics | Route::WorkOrders)
    }

    fn known_paths() -> String {
        Self::ALL.iter().map(|r| r.path()).collect::<Vec<_>>().join(", ")
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl std::str::FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let path = trimmed.trim_end_matches('/');
        let path = path.strip_prefix('/').unwrap_or(path);
        match path.to_lowercase().as_str() {
            "" => Ok(Route::Home),
            "owner" => Ok(Route::Owner),
            "owner/units" | "units" => Ok(Route::Units),
            "owner/mechanics" | "mechanics" => Ok(Route::Mechanics),
            "dispatch" => Ok(Route::Dispatch),
            "mechanic" => Ok(Route::Mechanic),
            "work-orders" | "work_orders" => Ok(Route::WorkOrders),
            _ => Err(RouteError::NotFound(trimmed.to_string())),
        }
    }
}
