//! trip-planner core
//!
//! Orders a set of geographic waypoints (nearest-neighbor seed + 2-opt,
//! respecting anchors and locked stops) and splits the order into
//! day-by-day itineraries against opening windows and day budgets.

pub mod constraints;
pub mod construct;
pub mod day_planner;
pub mod error;
pub mod haversine;
pub mod locks;
pub mod model;
pub mod opening_hours;
pub mod refine;
pub mod request;
pub mod solver;
pub mod traits;

pub use error::{Error, Result};
pub use request::{OptimizeRequest, OptimizeResponse};
pub use solver::{SolveOptions, solve, solve_batch};
