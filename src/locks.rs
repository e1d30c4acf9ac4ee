//! Lock-aware ordering.
//!
//! Locked waypoints (and the fixed start/end) stay at their input index.
//! Each run of unlocked waypoints between two locks is ordered on its own,
//! traveling from the preceding lock toward the following one. All work
//! happens on one index array over the caller's stops.

use std::collections::HashSet;

use tracing::debug;

use crate::construct::nearest_neighbor_order;
use crate::error::Result;
use crate::refine::{RefineBudget, RefineOutcome, two_opt_refine};
use crate::traits::Stop;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderOutcome {
    /// Permutation of `0..n`; `order[pos]` is the input index placed at `pos`.
    pub order: Vec<usize>,
    pub segments: usize,
    pub sweeps: usize,
    /// Some segment hit the sweep cap.
    pub truncated: bool,
}

impl OrderOutcome {
    fn identity(n: usize) -> Self {
        Self {
            order: (0..n).collect(),
            ..Self::default()
        }
    }

    fn absorb(&mut self, refine: RefineOutcome) {
        self.segments += 1;
        self.sweeps += refine.sweeps;
        self.truncated |= refine.truncated;
    }
}

/// Nearest-neighbor seed followed by 2-opt for one segment of indices.
pub fn optimize_segment(
    segment: &[usize],
    matrix: &[Vec<f64>],
    fixed_start: bool,
    fixed_end: bool,
    budget: &RefineBudget,
) -> Result<(Vec<usize>, RefineOutcome)> {
    let mut route = nearest_neighbor_order(segment, matrix, fixed_start, fixed_end);
    let outcome = two_opt_refine(&mut route, matrix, fixed_start, fixed_end, budget)?;
    Ok((route, outcome))
}

/// Indices that must not move: stops whose id is locked, plus the first and
/// last positions when the route ends are fixed.
pub fn locked_indexes<S: Stop>(
    stops: &[S],
    fixed_start: bool,
    fixed_end: bool,
    locked_ids: &HashSet<String>,
) -> Vec<usize> {
    let n = stops.len();
    if n == 0 {
        return Vec::new();
    }

    let mut effective: HashSet<&str> = locked_ids.iter().map(String::as_str).collect();
    if fixed_start {
        effective.extend(stops[0].stop_id());
    }
    if fixed_end {
        effective.extend(stops[n - 1].stop_id());
    }

    (0..n)
        .filter(|&i| {
            (fixed_start && i == 0)
                || (fixed_end && i == n - 1)
                || stops[i].stop_id().is_some_and(|id| effective.contains(id))
        })
        .collect()
}

/// Compute the visiting order for `stops`.
///
/// `matrix` is the distance matrix over all stops, indexed like `stops`.
pub fn optimize_with_locks<S: Stop>(
    stops: &[S],
    matrix: &[Vec<f64>],
    fixed_start: bool,
    fixed_end: bool,
    locked_ids: &HashSet<String>,
    budget: &RefineBudget,
) -> Result<OrderOutcome> {
    let n = stops.len();
    let mut outcome = OrderOutcome::identity(n);
    if n < 3 {
        return Ok(outcome);
    }

    let locked = locked_indexes(stops, fixed_start, fixed_end, locked_ids);
    if locked.is_empty() {
        let (route, refine) =
            optimize_segment(&outcome.order, matrix, fixed_start, fixed_end, budget)?;
        outcome.order = route;
        outcome.absorb(refine);
        return Ok(outcome);
    }
    debug!(locked = ?locked, "splitting route at locked positions");

    let mut previous: Option<usize> = None;
    for next in locked.iter().copied().map(Some).chain(std::iter::once(None)) {
        let interior_start = previous.map_or(0, |p| p + 1);
        let interior_end = next.unwrap_or(n);
        previous = next;
        if interior_start >= interior_end {
            continue;
        }

        let mut segment = Vec::with_capacity(interior_end - interior_start + 2);
        segment.extend(interior_start.checked_sub(1));
        segment.extend(interior_start..interior_end);
        segment.extend(next);

        let has_start = interior_start > 0;
        let has_end = next.is_some();
        let (route, refine) = optimize_segment(&segment, matrix, has_start, has_end, budget)?;
        debug!(
            from = interior_start,
            to = interior_end,
            sweeps = refine.sweeps,
            "optimized segment"
        );

        let interior = &route[usize::from(has_start)..route.len() - usize::from(has_end)];
        outcome.order[interior_start..interior_end].copy_from_slice(interior);
        outcome.absorb(refine);
    }

    Ok(outcome)
}
