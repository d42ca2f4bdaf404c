use super::location::Location;
use crate::error::NavError;
use crate::state::Phase;
use std::collections::HashMap;

pub const HOME: &str = "home";
pub const SPLASH: &str = "splash";
pub const LOGIN: &str = "login";
pub const LOADING: &str = "loading";
pub const SETTINGS: &str = "settings";

/// Query parameter carrying a captured deep link.
pub const FROM_PARAM: &str = "from";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
    pub name: String,
    pub path: String,
}

/// Named routes plus the canonical route of each unready phase.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
    phase_routes: HashMap<Phase, String>,
}

impl RouteTable {
    /// A table with only the home route and no phase routes.
    pub fn empty() -> Self {
        Self {
            routes: vec![RouteDef {
                name: HOME.to_string(),
                path: "/".to_string(),
            }],
            phase_routes: HashMap::new(),
        }
    }

    /// Adds a route, replacing any route with the same name.
    pub fn with_route(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        let name = name.into();
        let path = Location::new(path.into()).path().to_string();
        self.routes.retain(|r| r.name != name);
        self.routes.push(RouteDef { name, path });
        self
    }

    /// Routes `phase` to the route called `name` while the app is not ready.
    pub fn with_phase_route(mut self, phase: Phase, name: impl Into<String>) -> Self {
        if phase.is_ready() {
            tracing::warn!("routes: ignoring phase route for {phase}");
            return self;
        }
        self.phase_routes.insert(phase, name.into());
        self
    }

    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }

    pub fn path_of(&self, name: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.path.as_str())
    }

    pub fn name_of(&self, path: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|r| r.path == path)
            .map(|r| r.name.as_str())
    }

    pub fn home_path(&self) -> &str {
        self.path_of(HOME).unwrap_or("/")
    }

    pub fn is_home(&self, path: &str) -> bool {
        path == self.home_path()
    }

    /// Path of the route shown while in `phase`, if `phase` is unready.
    pub fn phase_path(&self, phase: Phase) -> Option<&str> {
        self.phase_routes
            .get(&phase)
            .and_then(|name| self.path_of(name))
    }

    /// Whether `path` is one of the routes shown while the app is not ready.
    pub fn is_unready(&self, path: &str) -> bool {
        self.phase_routes
            .values()
            .filter_map(|name| self.path_of(name))
            .any(|p| p == path)
    }

    pub fn location_for<I, K, V>(&self, name: &str, params: I) -> Result<Location, NavError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let path = self
            .path_of(name)
            .ok_or_else(|| NavError::UnknownRoute(name.to_string()))?;
        Ok(params
            .into_iter()
            .fold(Location::new(path), |loc, (k, v)| loc.with_query(k, v)))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::empty()
            .with_route(SPLASH, "/splash")
            .with_route(LOGIN, "/login")
            .with_route(LOADING, "/loading")
            .with_route(SETTINGS, "/settings")
            .with_phase_route(Phase::Starting, SPLASH)
            .with_phase_route(Phase::LoggedOut, LOGIN)
            .with_phase_route(Phase::Loading, LOADING)
    }
}
