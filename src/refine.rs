//! 2-opt local search over a constructed route.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Minimum gain (km) for a move to count as an improvement.
const IMPROVEMENT_EPSILON_KM: f64 = 1e-9;

/// A wall-clock limit shared by every segment of one solve.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn new(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn check(&self) -> Result<()> {
        let elapsed = self.started.elapsed();
        if elapsed > self.budget {
            return Err(Error::TimeBudgetExceeded {
                elapsed_ms: elapsed.as_millis(),
                budget_ms: self.budget.as_millis(),
            });
        }
        Ok(())
    }
}

/// Bounds on a single refinement run.
#[derive(Debug, Clone, Copy)]
pub struct RefineBudget {
    pub max_sweeps: usize,
    pub deadline: Option<Deadline>,
}

impl Default for RefineBudget {
    fn default() -> Self {
        Self {
            max_sweeps: 1000,
            deadline: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefineOutcome {
    pub sweeps: usize,
    pub moves: usize,
    /// The sweep cap stopped refinement before a local optimum was reached.
    pub truncated: bool,
}

/// Total length of a route, anchors included.
pub fn route_distance_km(route: &[usize], matrix: &[Vec<f64>]) -> f64 {
    route.windows(2).map(|leg| matrix[leg[0]][leg[1]]).sum()
}

/// Improve `route` in place with 2-opt segment reversals.
///
/// Anchored ends (`fixed_start` / `fixed_end`) never move but their legs
/// count toward the route length. Sweeps repeat until one makes no
/// improving move or the budget's sweep cap is reached. `matrix` must be
/// symmetric.
pub fn two_opt_refine(
    route: &mut [usize],
    matrix: &[Vec<f64>],
    fixed_start: bool,
    fixed_end: bool,
    budget: &RefineBudget,
) -> Result<RefineOutcome> {
    let mut outcome = RefineOutcome::default();
    let n = route.len();
    if n < 4 {
        return Ok(outcome);
    }

    let start = usize::from(fixed_start);
    let end = if fixed_end { n - 1 } else { n };
    if end - start < 3 {
        return Ok(outcome);
    }

    let mut improved = true;
    while improved {
        if outcome.sweeps >= budget.max_sweeps {
            outcome.truncated = true;
            warn!(
                sweeps = outcome.sweeps,
                len = n,
                "2-opt sweep cap reached before local optimum"
            );
            break;
        }
        if let Some(deadline) = &budget.deadline {
            deadline.check()?;
        }

        improved = false;
        outcome.sweeps += 1;

        for i in start..end - 1 {
            for k in i + 1..end {
                if reversal_gain(route, matrix, i, k) < -IMPROVEMENT_EPSILON_KM {
                    route[i..=k].reverse();
                    outcome.moves += 1;
                    improved = true;
                }
            }
        }
    }

    debug!(
        sweeps = outcome.sweeps,
        moves = outcome.moves,
        len = n,
        "2-opt finished"
    );
    Ok(outcome)
}

/// Change in route length from reversing `route[i..=k]`.
fn reversal_gain(route: &[usize], matrix: &[Vec<f64>], i: usize, k: usize) -> f64 {
    let mut delta = 0.0;
    if i > 0 {
        let before = route[i - 1];
        delta += matrix[before][route[k]] - matrix[before][route[i]];
    }
    if k + 1 < route.len() {
        let after = route[k + 1];
        delta += matrix[route[i]][after] - matrix[route[k]][after];
    }
    delta
}
