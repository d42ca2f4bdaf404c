//! Navigation surface: runs every request and every lifecycle change through
//! the redirect policy and publishes the resulting screen.

use super::location::Location;
use super::policy::redirect;
use super::routes::{RouteTable, HOME};
use crate::error::NavError;
use crate::state::{AppLifecycle, ListenerId, Notifier};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Screen {
    Page { name: String, location: Location },
    /// Unroutable request; the renderer shows `message` and a link home.
    Error { requested: String, message: String },
}

impl Screen {
    pub fn name(&self) -> Option<&str> {
        match self {
            Screen::Page { name, .. } => Some(name),
            Screen::Error { .. } => None,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            Screen::Page { location, .. } => Some(location),
            Screen::Error { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Screen::Error { .. })
    }

    fn error(requested: impl Into<String>, err: NavError) -> Self {
        Screen::Error {
            requested: requested.into(),
            message: err.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Navigator {
    inner: Arc<NavigatorInner>,
}

struct NavigatorInner {
    routes: RouteTable,
    lifecycle: AppLifecycle,
    redirect_limit: usize,
    current: Mutex<Screen>,
    notifier: Notifier<Screen>,
    lifecycle_listener: Mutex<Option<ListenerId>>,
}

impl Navigator {
    /// Starts on the home route (redirected as the current phase requires) and
    /// follows lifecycle changes from then on.
    pub fn new(routes: RouteTable, lifecycle: AppLifecycle, redirect_limit: usize) -> Self {
        let home = Location::new(routes.home_path());
        let initial = resolve(&routes, &lifecycle, redirect_limit, home);

        let inner = Arc::new(NavigatorInner {
            routes,
            lifecycle: lifecycle.clone(),
            redirect_limit,
            current: Mutex::new(initial),
            notifier: Notifier::new(),
            lifecycle_listener: Mutex::new(None),
        });

        let weak: Weak<NavigatorInner> = Arc::downgrade(&inner);
        let listener = lifecycle.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                Navigator { inner }.refresh();
            }
        });
        *inner.lifecycle_listener.lock() = Some(listener);

        Self { inner }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.inner.routes
    }

    pub fn current(&self) -> Screen {
        self.inner.current.lock().clone()
    }

    pub fn subscribe<F>(&self, f: F) -> ListenerId
    where
        F: Fn(&Screen) + Send + Sync + 'static,
    {
        self.inner.notifier.subscribe(f)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.notifier.unsubscribe(id)
    }

    pub fn stream(&self) -> broadcast::Receiver<Screen> {
        self.inner.notifier.stream()
    }

    pub fn go(&self, location: Location) -> Screen {
        let screen = self.resolve(location);
        self.set(screen.clone());
        screen
    }

    pub fn go_str(&self, raw: &str) -> Screen {
        match Location::parse(raw) {
            Ok(location) => self.go(location),
            Err(e) => {
                let screen = Screen::error(raw, e);
                self.set(screen.clone());
                screen
            }
        }
    }

    pub fn go_named<I, K, V>(&self, name: &str, params: I) -> Screen
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        match self.inner.routes.location_for(name, params) {
            Ok(location) => self.go(location),
            Err(e) => {
                let screen = Screen::error(name, e);
                self.set(screen.clone());
                screen
            }
        }
    }

    pub fn go_home(&self) -> Screen {
        self.go_named(HOME, std::iter::empty::<(String, String)>())
    }

    /// Re-run the redirect policy against the current request.
    pub fn refresh(&self) -> Screen {
        let request = match self.current() {
            Screen::Page { location, .. } => Some(location),
            Screen::Error { requested, .. } => Location::parse(&requested).ok(),
        };
        match request {
            Some(location) => self.go(location),
            None => self.current(),
        }
    }

    pub fn shutdown(&self) {
        if let Some(id) = self.inner.lifecycle_listener.lock().take() {
            self.inner.lifecycle.unsubscribe(id);
        }
    }

    fn resolve(&self, request: Location) -> Screen {
        resolve(
            &self.inner.routes,
            &self.inner.lifecycle,
            self.inner.redirect_limit,
            request,
        )
    }

    fn set(&self, screen: Screen) {
        {
            let mut current = self.inner.current.lock();
            if *current == screen {
                return;
            }
            *current = screen.clone();
        }

        match &screen {
            Screen::Page { name, location } => {
                tracing::info!(route = %name, location = %location, "navigator: showing page")
            }
            Screen::Error { requested, message } => {
                tracing::warn!(requested = %requested, "navigator: {message}")
            }
        }
        self.inner.notifier.notify(&screen);
    }
}

fn resolve(
    routes: &RouteTable,
    lifecycle: &AppLifecycle,
    redirect_limit: usize,
    request: Location,
) -> Screen {
    let phase = lifecycle.phase();
    let mut location = request;
    let mut hops = 0;

    while let Some(next) = redirect(&location, phase, routes) {
        hops += 1;
        if hops > redirect_limit {
            return Screen::error(
                location.to_string(),
                NavError::RedirectLimit {
                    limit: redirect_limit,
                    location: location.to_string(),
                },
            );
        }
        tracing::debug!(from = %location, to = %next, phase = %phase, "navigator: redirect");
        location = next;
    }

    match routes.name_of(location.path()) {
        Some(name) => Screen::Page {
            name: name.to_string(),
            location,
        },
        None => Screen::error(
            location.to_string(),
            NavError::UnmatchedPath(location.path().to_string()),
        ),
    }
}
