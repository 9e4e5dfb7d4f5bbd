mod route;
mod router;

pub use route::{Route, RoutePart, TurnDirection};
pub use router::Router;
