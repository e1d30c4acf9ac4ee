//! Test fixtures for trip-planner.
//!
//! Real Las Vegas / Henderson locations plus helpers for checking plans.

#![allow(dead_code)]

pub mod las_vegas_locations;

pub use las_vegas_locations::*;

use trip_planner::OptimizeResponse;

/// Every optimized index, flattened across days in day order.
pub fn scheduled_indexes(response: &OptimizeResponse) -> Vec<usize> {
    response
        .days
        .iter()
        .flat_map(|day| day.waypoint_indexes.iter().copied())
        .collect()
}

/// Ids of the optimized waypoints, in order.
pub fn ordered_ids(response: &OptimizeResponse) -> Vec<String> {
    response
        .waypoints
        .iter()
        .map(|w| w.id.clone().unwrap_or_default())
        .collect()
}
