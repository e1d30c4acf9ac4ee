//! Day-by-day itinerary planning.
//!
//! Walks the optimized order once, simulating a clock against each stop's
//! opening window, its visit duration and the day window. A stop that
//! overflows a non-empty day starts the next day; a stop that cannot fit
//! even on a fresh day is still placed and reported as a conflict.

use tracing::{debug, warn};

use crate::constraints::Constraints;
use crate::haversine::haversine_km;
use crate::model::{Conflict, DayPlan, TravelMode};
use crate::traits::Stop;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayPlanOutcome {
    pub days: Vec<DayPlan>,
    pub conflicts: Vec<Conflict>,
}

/// Result of testing one stop against a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fit {
    pub fits: bool,
    pub visit_start: u32,
    pub visit_end: u32,
    pub window_start: u32,
    pub window_end: u32,
    pub visit_minutes: u32,
}

/// Estimated travel minutes between two stops.
pub fn leg_minutes<S: Stop>(from: &S, to: &S, mode: TravelMode) -> u32 {
    mode.leg_minutes(haversine_km(from.location(), to.location()))
}

/// Test whether `stop`, arriving at `arrival`, can be visited inside both its
/// opening window and the day window.
pub fn fit_in_day<S: Stop>(
    stop: &S,
    arrival: u32,
    constraints: &Constraints,
    day_start: u32,
    day_end: u32,
) -> Fit {
    let visit_minutes = constraints.visit_minutes_for(stop);
    let window = constraints.window_for(stop);
    let window_start = day_start.max(window.open_minutes);
    let window_end = day_end.min(window.close_minutes);
    let visit_start = arrival.max(window_start);
    let visit_end = visit_start.saturating_add(visit_minutes);

    Fit {
        fits: visit_end <= window_end,
        visit_start,
        visit_end,
        window_start,
        window_end,
        visit_minutes,
    }
}

/// The day currently being filled.
struct OpenDay {
    day: u32,
    indexes: Vec<usize>,
    travel_minutes: u32,
    clock: u32,
}

impl OpenDay {
    fn new(day: u32, day_start: u32) -> Self {
        Self {
            day,
            indexes: Vec::new(),
            travel_minutes: 0,
            clock: day_start,
        }
    }

    fn close(self, travel_minutes: u32) -> DayPlan {
        DayPlan {
            day: self.day,
            waypoint_indexes: self.indexes,
            estimated_travel_minutes: travel_minutes,
        }
    }
}

/// Split `stops` (already in visiting order) into day plans.
pub fn plan_days<S: Stop>(stops: &[S], constraints: &Constraints) -> DayPlanOutcome {
    let day_start = constraints.day_start_minutes;
    let day_end = constraints.effective_day_end_minutes();
    let mode = constraints.travel_mode;

    let mut outcome = DayPlanOutcome::default();
    let mut current = OpenDay::new(1, day_start);

    for (i, stop) in stops.iter().enumerate() {
        let mut leg = current
            .indexes
            .last()
            .map_or(0, |&prev| leg_minutes(&stops[prev], stop, mode));
        let mut arrival = current.clock.saturating_add(leg);
        let mut fit = fit_in_day(stop, arrival, constraints, day_start, day_end);

        if !current.indexes.is_empty() && !fit.fits {
            let next_day = current.day + 1;
            // The rejected leg still counts toward the day it was planned from.
            let travel = current.travel_minutes.saturating_add(leg);
            let closed = std::mem::replace(&mut current, OpenDay::new(next_day, day_start));
            debug!(
                day = closed.day,
                stops = closed.indexes.len(),
                travel,
                "day closed on overflow"
            );
            outcome.days.push(closed.close(travel));

            leg = 0;
            arrival = current.clock;
            fit = fit_in_day(stop, arrival, constraints, day_start, day_end);
        }

        if !fit.fits {
            warn!(
                stop = stop.name(),
                window_start = fit.window_start,
                window_end = fit.window_end,
                visit_minutes = fit.visit_minutes,
                "stop cannot be scheduled within its window"
            );
            outcome.conflicts.push(Conflict {
                waypoint_id: stop.stop_id().map(str::to_string),
                message: conflict_message(stop.name(), &fit, day_start, day_end),
            });
        }

        current.indexes.push(i);
        current.travel_minutes = current.travel_minutes.saturating_add(leg);
        current.clock = fit.visit_end;
    }

    if !current.indexes.is_empty() {
        let travel = current.travel_minutes;
        outcome.days.push(current.close(travel));
    }
    outcome
}

fn conflict_message(name: &str, fit: &Fit, day_start: u32, day_end: u32) -> String {
    let label = if name.is_empty() { "Waypoint" } else { name };
    format!(
        "{label} cannot fit within the configured day/opening window \
         (needs {} min, window {}-{}, day {}-{})",
        fit.visit_minutes,
        format_clock(fit.window_start),
        format_clock(fit.window_end),
        format_clock(day_start),
        format_clock(day_end),
    )
}

/// Minutes from midnight as `HH:MM`.
pub fn format_clock(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Waypoint;

    fn stop(id: &str, lat: f64, lng: f64) -> Waypoint {
        Waypoint::new(id.to_uppercase(), lat, lng).with_id(id)
    }

    #[test]
    fn test_window_wait_then_fit() {
        let constraints = Constraints::default()
            .with_day(540, 1200)
            .with_time_window("a", 600, 720)
            .with_visit_minutes("a", 90);
        let fit = fit_in_day(&stop("a", 0.0, 0.0), 540, &constraints, 540, 1200);

        assert!(fit.fits);
        assert_eq!(fit.visit_start, 600);
        assert_eq!(fit.visit_end, 690);
    }

    #[test]
    fn test_visit_must_end_before_close() {
        // Waiting until 10:00 is fine, but a 90 minute visit overruns 11:00.
        let constraints = Constraints::default()
            .with_time_window("a", 600, 660)
            .with_visit_minutes("a", 90);
        let fit = fit_in_day(&stop("a", 0.0, 0.0), 540, &constraints, 540, 1200);

        assert!(!fit.fits);
        assert_eq!(fit.visit_start, 600);
        assert_eq!(fit.visit_end, 690);
        assert_eq!(fit.window_end, 660);
    }

    #[test]
    fn test_single_stop_single_day() {
        let constraints = Constraints::default()
            .with_time_window("a", 600, 720)
            .with_visit_minutes("a", 90);
        let outcome = plan_days(&[stop("a", 0.0, 0.0)], &constraints);

        assert!(outcome.conflicts.is_empty());
        assert_eq!(
            outcome.days,
            vec![DayPlan {
                day: 1,
                waypoint_indexes: vec![0],
                estimated_travel_minutes: 0
            }]
        );
    }

    #[test]
    fn test_overflow_opens_new_day() {
        // Each visit takes five hours; the default day is 09:00-20:00.
        let constraints = Constraints::default().with_default_visit_minutes(300);
        let stops = vec![stop("a", 0.0, 0.0), stop("b", 0.0, 0.01), stop("c", 0.0, 0.02)];
        let outcome = plan_days(&stops, &constraints);

        assert!(outcome.conflicts.is_empty());
        assert_eq!(outcome.days.len(), 2);
        assert_eq!(outcome.days[0].waypoint_indexes, vec![0, 1]);
        assert_eq!(outcome.days[1].waypoint_indexes, vec![2]);
        assert_eq!(outcome.days[1].day, 2);
        // Day one: a->b leg plus the rejected b->c leg.
        assert_eq!(outcome.days[0].estimated_travel_minutes, 2);
        assert_eq!(outcome.days[1].estimated_travel_minutes, 0);
    }

    #[test]
    fn test_closed_window_is_conflict_on_fresh_day() {
        // "late" closes at 10:00 but a long first visit pushes arrival past it.
        let constraints = Constraints::default()
            .with_visit_minutes("early", 160)
            .with_time_window("late", 0, 600)
            .with_visit_minutes("late", 60)
            .with_time_window("after", 0, 1439);
        let stops = vec![
            stop("early", 0.0, 0.0),
            stop("late", 0.0, 0.01),
            stop("after", 0.0, 0.02),
        ];
        let outcome = plan_days(&stops, &constraints);

        assert_eq!(outcome.days.len(), 2);
        assert_eq!(outcome.days[0].waypoint_indexes, vec![0]);
        assert_eq!(outcome.days[1].waypoint_indexes, vec![1, 2]);
        assert!(outcome.conflicts.is_empty());
    }

    #[test]
    fn test_unfittable_stop_still_placed() {
        // Window 08:00-09:10 overlaps the day by ten minutes only.
        let constraints = Constraints::default()
            .with_time_window("tiny", 480, 550)
            .with_visit_minutes("tiny", 60);
        let stops = vec![stop("a", 0.0, 0.0), stop("tiny", 0.0, 0.01), stop("c", 0.0, 0.02)];
        let outcome = plan_days(&stops, &constraints);

        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].waypoint_id.as_deref(), Some("tiny"));
        assert!(outcome.conflicts[0].message.starts_with("TINY cannot fit"));
        assert!(outcome.conflicts[0].message.contains("09:00-09:10"));

        let placed: Vec<usize> = outcome
            .days
            .iter()
            .flat_map(|d| d.waypoint_indexes.iter().copied())
            .collect();
        assert_eq!(placed, vec![0, 1, 2]);
        assert_eq!(outcome.days[1].waypoint_indexes[0], 1);
    }

    #[test]
    fn test_lone_stop_conflict_without_id() {
        let constraints = Constraints::default().with_default_visit_minutes(1000);
        let stops = vec![Waypoint::new("", 0.0, 0.0)];
        let outcome = plan_days(&stops, &constraints);

        assert_eq!(outcome.days.len(), 1);
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].waypoint_id, None);
        assert!(outcome.conflicts[0].message.starts_with("Waypoint cannot fit"));
    }

    #[test]
    fn test_travel_accumulates_within_day() {
        let constraints = Constraints::default()
            .with_default_visit_minutes(5)
            .with_travel_mode(TravelMode::Walking);
        // ~1.11 km apart at the equator: 13 minutes on foot.
        let stops = vec![stop("a", 0.0, 0.0), stop("b", 0.0, 0.01), stop("c", 0.0, 0.02)];
        let outcome = plan_days(&stops, &constraints);

        assert_eq!(outcome.days.len(), 1);
        assert_eq!(outcome.days[0].estimated_travel_minutes, 26);
    }

    #[test]
    fn test_whole_day_visit_is_conflict_not_overflow() {
        let constraints = Constraints::default().with_default_visit_minutes(u32::MAX);
        let stops = vec![stop("a", 0.0, 0.0), stop("b", 0.0, 0.01)];
        let outcome = plan_days(&stops, &constraints);

        assert_eq!(outcome.conflicts.len(), 2);
        assert_eq!(outcome.days.len(), 2);
        assert_eq!(outcome.days[1].waypoint_indexes, vec![1]);
    }

    #[test]
    fn test_late_clock_saturates() {
        let constraints = Constraints::default();
        let fit = fit_in_day(&stop("a", 0.0, 0.0), u32::MAX - 1, &constraints, 540, 1200);
        assert!(!fit.fits);
        assert_eq!(fit.visit_end, u32::MAX);
    }

    #[test]
    fn test_empty_input_has_no_days() {
        let outcome = plan_days::<Waypoint>(&[], &Constraints::default());
        assert!(outcome.days.is_empty());
        assert!(outcome.conflicts.is_empty());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(545), "09:05");
        assert_eq!(format_clock(1440), "24:00");
    }
}
