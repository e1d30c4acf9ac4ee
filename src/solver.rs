//! Optimizer pipeline: lock-aware ordering followed by day planning.

use std::time::Duration;

use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use crate::constraints::Constraints;
use crate::day_planner::plan_days;
use crate::error::{Error, Result};
use crate::haversine::HaversineMatrix;
use crate::locks::optimize_with_locks;
use crate::model::{Conflict, DayPlan, OptimizedWaypoint, RouteSummary};
use crate::refine::{Deadline, RefineBudget, route_distance_km};
use crate::request::{OptimizeRequest, OptimizeResponse};
use crate::traits::{DistanceMatrixProvider, Stop};

#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Requests with more waypoints are rejected.
    pub max_waypoints: usize,
    /// Maximum 2-opt sweeps per segment before refinement stops early.
    pub max_sweeps: usize,
    /// Wall-clock limit for ordering; exceeding it fails the solve.
    pub time_budget: Option<Duration>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_waypoints: 500,
            max_sweeps: 1000,
            time_budget: None,
        }
    }
}

/// Ordering and itinerary for a list of stops.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    /// `order[pos]` is the index of the input stop visited at `pos`.
    pub order: Vec<usize>,
    /// Day plans; indexes refer to positions in `order`.
    pub days: Vec<DayPlan>,
    pub conflicts: Vec<Conflict>,
    pub total_distance_km: f64,
}

/// Order `stops` and split the result into days.
pub fn plan_route<S: Stop>(
    stops: &[S],
    constraints: &Constraints,
    options: &SolveOptions,
) -> Result<RoutePlan> {
    if stops.len() > options.max_waypoints {
        return Err(Error::TooManyWaypoints {
            count: stops.len(),
            max: options.max_waypoints,
        });
    }

    let locations: Vec<(f64, f64)> = stops.iter().map(Stop::location).collect();
    let matrix = HaversineMatrix.matrix_for(&locations);
    let budget = RefineBudget {
        max_sweeps: options.max_sweeps,
        deadline: options.time_budget.map(Deadline::new),
    };

    let ordering = optimize_with_locks(
        stops,
        &matrix,
        constraints.fixed_start,
        constraints.fixed_end,
        &constraints.locked_waypoint_ids,
        &budget,
    )?;
    debug!(
        segments = ordering.segments,
        sweeps = ordering.sweeps,
        truncated = ordering.truncated,
        "ordering complete"
    );

    let ordered: Vec<&S> = ordering.order.iter().map(|&i| &stops[i]).collect();
    let schedule = plan_days(&ordered, constraints);

    Ok(RoutePlan {
        total_distance_km: route_distance_km(&ordering.order, &matrix),
        order: ordering.order,
        days: schedule.days,
        conflicts: schedule.conflicts,
    })
}

/// Run the full pipeline for one request.
pub fn solve(request: &OptimizeRequest, options: &SolveOptions) -> Result<OptimizeResponse> {
    request.validate()?;
    let plan = plan_route(&request.waypoints, &request.constraints, options)?;

    let waypoints: Vec<OptimizedWaypoint> = plan
        .order
        .iter()
        .enumerate()
        .map(|(position, &input)| {
            OptimizedWaypoint::from_waypoint(request.waypoints[input].clone(), position)
        })
        .collect();

    let summary = RouteSummary {
        total_distance_km: plan.total_distance_km,
        total_travel_minutes: plan.days.iter().map(|d| d.estimated_travel_minutes).sum(),
        day_count: plan.days.len(),
        conflict_count: plan.conflicts.len(),
    };
    info!(
        waypoints = waypoints.len(),
        days = summary.day_count,
        conflicts = summary.conflict_count,
        distance_km = summary.total_distance_km,
        "route optimized"
    );

    Ok(OptimizeResponse {
        waypoints,
        days: plan.days,
        conflicts: plan.conflicts,
        summary,
    })
}

/// Decode and solve one JSON request body.
pub fn solve_value(body: &Value, options: &SolveOptions) -> Result<OptimizeResponse> {
    let request = OptimizeRequest::from_json_value(body)?;
    solve(&request, options)
}

/// Solve independent request bodies in parallel. Results keep input order.
pub fn solve_batch(bodies: &[Value], options: &SolveOptions) -> Vec<Result<OptimizeResponse>> {
    info!(requests = bodies.len(), "solving batch");
    bodies
        .par_iter()
        .map(|body| solve_value(body, options))
        .collect()
}
