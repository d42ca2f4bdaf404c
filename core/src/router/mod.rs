pub mod location;
pub mod navigator;
pub mod policy;
pub mod routes;

pub use location::Location;
pub use navigator::{Navigator, Screen};
pub use policy::redirect;
pub use routes::{RouteDef, RouteTable, FROM_PARAM, HOME, LOADING, LOGIN, SETTINGS, SPLASH};
