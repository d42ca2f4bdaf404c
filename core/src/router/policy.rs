//! Redirect policy: decides whether a navigation request must be rewritten
//! given the current phase.
//!
//! Unready phases pin navigation to their canonical route and capture the
//! request under `from`; once ready, unready routes replay `from` (or go
//! home). Home and unready routes are never captured, so a replay can never
//! land on the redirect target itself.

use super::location::Location;
use super::routes::{RouteTable, FROM_PARAM};
use crate::state::Phase;
use std::collections::BTreeMap;

/// `None` means the request proceeds unchanged.
pub fn redirect(request: &Location, phase: Phase, routes: &RouteTable) -> Option<Location> {
    let path = request.path();
    let is_home = routes.is_home(path);
    let is_unready = routes.is_unready(path);

    let target = if phase.is_ready() {
        if !is_unready {
            return None;
        }
        replay_target(request, routes)
    } else {
        let phase_path = routes.phase_path(phase)?;
        let query = if is_home || is_unready {
            request.query().clone()
        } else {
            BTreeMap::from([(FROM_PARAM.to_string(), path.to_string())])
        };
        Location::from_parts(phase_path, query)
    };

    (target != *request).then_some(target)
}

/// The captured deep link if it points at a routable in-app page, else home.
fn replay_target(request: &Location, routes: &RouteTable) -> Location {
    request
        .query_value(FROM_PARAM)
        .filter(|from| !from.starts_with("//"))
        .and_then(|from| Location::parse(from).ok())
        .filter(|loc| !routes.is_unready(loc.path()))
        .unwrap_or_else(|| Location::new(routes.home_path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const UNREADY: [Phase; 3] = [Phase::Starting, Phase::LoggedOut, Phase::Loading];

    fn loc(s: &str) -> Location {
        Location::parse(s).unwrap()
    }

    fn run(request: &str, phase: Phase) -> Option<String> {
        redirect(&loc(request), phase, &RouteTable::default()).map(|l| l.to_string())
    }

    #[test]
    fn test_unready_phase_captures_deep_link() {
        let cases = [
            (Phase::Starting, "/splash?from=%2Fsettings"),
            (Phase::LoggedOut, "/login?from=%2Fsettings"),
            (Phase::Loading, "/loading?from=%2Fsettings"),
        ];
        for (phase, expected) in cases {
            assert_eq!(run("/settings", phase).as_deref(), Some(expected), "{phase}");
        }
    }

    #[test]
    fn test_capture_discards_other_parameters() {
        assert_eq!(
            run("/settings?tab=theme", Phase::LoggedOut).as_deref(),
            Some("/login?from=%2Fsettings")
        );
    }

    #[test]
    fn test_capture_applies_to_unknown_paths() {
        assert_eq!(
            run("/reports/7", Phase::LoggedOut).as_deref(),
            Some("/login?from=%2Freports%2F7")
        );
    }

    #[test]
    fn test_home_is_never_captured() {
        assert_eq!(run("/", Phase::LoggedOut).as_deref(), Some("/login"));
        assert_eq!(run("/?x=1", Phase::Loading).as_deref(), Some("/loading?x=1"));
    }

    #[test]
    fn test_unready_routes_pass_query_through() {
        assert_eq!(
            run("/splash?from=%2Fsettings", Phase::LoggedOut).as_deref(),
            Some("/login?from=%2Fsettings")
        );
        assert_eq!(
            run("/login?from=%2Fsettings", Phase::Loading).as_deref(),
            Some("/loading?from=%2Fsettings")
        );
    }

    #[test]
    fn test_already_on_phase_route_is_not_redirected() {
        assert_eq!(run("/login?from=%2Fsettings", Phase::LoggedOut), None);
        assert_eq!(run("/splash", Phase::Starting), None);
    }

    #[test]
    fn test_ready_replays_from() {
        for path in ["/splash", "/login", "/loading"] {
            let request = format!("{path}?from=%2Fsettings");
            assert_eq!(run(&request, Phase::Ready).as_deref(), Some("/settings"));
        }
    }

    #[test]
    fn test_ready_without_from_goes_home() {
        assert_eq!(run("/login", Phase::Ready).as_deref(), Some("/"));
        assert_eq!(run("/loading?x=1", Phase::Ready).as_deref(), Some("/"));
    }

    #[test]
    fn test_ready_leaves_other_routes_alone() {
        assert_eq!(run("/", Phase::Ready), None);
        assert_eq!(run("/settings", Phase::Ready), None);
        assert_eq!(run("/nowhere", Phase::Ready), None);
    }

    #[test]
    fn test_ready_rejects_unsafe_from() {
        assert_eq!(
            run("/login?from=%2F%2Fevil.example", Phase::Ready).as_deref(),
            Some("/")
        );
        assert_eq!(
            run("/login?from=https%3A%2F%2Fevil.example", Phase::Ready).as_deref(),
            Some("/")
        );
        assert_eq!(
            run("/login?from=%2Floading", Phase::Ready).as_deref(),
            Some("/")
        );
    }

    #[test]
    fn test_ready_replay_keeps_deep_link_query() {
        assert_eq!(
            run("/login?from=%2Fsettings%3Ftab%3Dtheme", Phase::Ready).as_deref(),
            Some("/settings?tab=theme")
        );
    }

    #[test]
    fn test_policy_is_idempotent() {
        let routes = RouteTable::default();
        let requests = [
            "/",
            "/?x=1",
            "/settings",
            "/settings?tab=theme",
            "/splash",
            "/login?from=%2Fsettings",
            "/loading?from=%2F%2Fevil",
            "/login?from=%2Flogin",
            "/nowhere",
        ];
        for phase in Phase::ALL {
            for request in requests {
                if let Some(first) = redirect(&loc(request), phase, &routes) {
                    assert_eq!(
                        redirect(&first, phase, &routes),
                        None,
                        "{request} under {phase} -> {first}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_unready_phase_without_route_does_not_redirect() {
        let routes = RouteTable::empty().with_route("settings", "/settings");
        for phase in UNREADY {
            assert_eq!(redirect(&loc("/settings"), phase, &routes), None);
        }
    }
}
