//! Normalized optimizer constraints.
//!
//! Raw request values are never rejected here: anything of the wrong type,
//! non-finite, or out of range falls back to its default or is clamped.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};
use tracing::debug;

use crate::model::{LAST_MINUTE_OF_DAY, MINUTES_PER_DAY, TimeWindow, TravelMode};
use crate::opening_hours::parse_opening_hours;
use crate::traits::Stop;

pub const DEFAULT_DAY_START_MINUTES: u32 = 9 * 60;
pub const DEFAULT_DAY_END_MINUTES: u32 = 20 * 60;
pub const DEFAULT_VISIT_MINUTES: u32 = 60;
pub const MIN_VISIT_MINUTES: u32 = 5;
/// Upper bound on a visit: one whole day.
pub const MAX_VISIT_MINUTES: u32 = MINUTES_PER_DAY;
/// The effective day is never shorter than this.
pub const MIN_DAY_LENGTH_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Constraints {
    pub fixed_start: bool,
    pub fixed_end: bool,
    pub travel_mode: TravelMode,
    pub locked_waypoint_ids: HashSet<String>,
    pub visit_minutes_by_waypoint_id: HashMap<String, u32>,
    pub default_visit_minutes: u32,
    pub time_windows_by_waypoint_id: HashMap<String, TimeWindow>,
    pub day_start_minutes: u32,
    pub day_end_minutes: u32,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            fixed_start: true,
            fixed_end: true,
            travel_mode: TravelMode::default(),
            locked_waypoint_ids: HashSet::new(),
            visit_minutes_by_waypoint_id: HashMap::new(),
            default_visit_minutes: DEFAULT_VISIT_MINUTES,
            time_windows_by_waypoint_id: HashMap::new(),
            day_start_minutes: DEFAULT_DAY_START_MINUTES,
            day_end_minutes: DEFAULT_DAY_END_MINUTES,
        }
    }
}

impl Constraints {
    /// Read constraints out of a request body, defaulting every field that is
    /// missing or malformed.
    pub fn from_body(body: &Map<String, Value>) -> Self {
        let day_start_minutes = minutes_in_range(body.get("dayStartMinutes"), LAST_MINUTE_OF_DAY)
            .unwrap_or(DEFAULT_DAY_START_MINUTES);
        let day_end_minutes = minutes_in_range(body.get("dayEndMinutes"), MINUTES_PER_DAY)
            .unwrap_or(DEFAULT_DAY_END_MINUTES);

        let default_visit_minutes =
            visit_minutes(body.get("defaultVisitMinutes")).unwrap_or(DEFAULT_VISIT_MINUTES);

        let visit_minutes_by_waypoint_id = body
            .get("visitMinutesByWaypointId")
            .and_then(Value::as_object)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|(id, raw)| visit_minutes(Some(raw)).map(|m| (id.clone(), m)))
                    .collect()
            })
            .unwrap_or_default();

        let mut time_windows_by_waypoint_id: HashMap<String, TimeWindow> = body
            .get("timeWindowsByWaypointId")
            .and_then(Value::as_object)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(id, raw)| (id.clone(), window_from_value(raw)))
                    .collect()
            })
            .unwrap_or_default();

        // Textual opening hours only fill gaps left by explicit windows.
        if let Some(hints) = body.get("openingHoursByWaypointId").and_then(Value::as_object) {
            for (id, raw) in hints {
                if time_windows_by_waypoint_id.contains_key(id) {
                    continue;
                }
                let window = raw
                    .as_str()
                    .and_then(parse_opening_hours)
                    .unwrap_or(TimeWindow::FULL_DAY);
                time_windows_by_waypoint_id.insert(id.clone(), window);
            }
        }

        let locked_waypoint_ids = body
            .get("lockedWaypointIds")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let travel_mode = body
            .get("travelMode")
            .and_then(Value::as_str)
            .and_then(TravelMode::from_name)
            .unwrap_or_default();

        let constraints = Self {
            fixed_start: !matches!(body.get("fixedStart"), Some(Value::Bool(false))),
            fixed_end: !matches!(body.get("fixedEnd"), Some(Value::Bool(false))),
            travel_mode,
            locked_waypoint_ids,
            visit_minutes_by_waypoint_id,
            default_visit_minutes,
            time_windows_by_waypoint_id,
            day_start_minutes,
            day_end_minutes,
        };
        debug!(
            fixed_start = constraints.fixed_start,
            fixed_end = constraints.fixed_end,
            travel_mode = ?constraints.travel_mode,
            locked = constraints.locked_waypoint_ids.len(),
            day_start = constraints.day_start_minutes,
            day_end = constraints.effective_day_end_minutes(),
            "normalized constraints"
        );
        constraints
    }

    /// Day end coerced to at least `day_start_minutes + 30`.
    pub fn effective_day_end_minutes(&self) -> u32 {
        self.day_end_minutes.max(self.day_start_minutes + MIN_DAY_LENGTH_MINUTES)
    }

    /// Visit duration for a stop, between five minutes and a whole day.
    pub fn visit_minutes_for<S: Stop>(&self, stop: &S) -> u32 {
        let minutes = stop
            .stop_id()
            .and_then(|id| self.visit_minutes_by_waypoint_id.get(id))
            .copied()
            .unwrap_or(self.default_visit_minutes);
        clamp_visit_minutes(minutes)
    }

    /// Opening window for a stop; full day when unconfigured.
    pub fn window_for<S: Stop>(&self, stop: &S) -> TimeWindow {
        stop.stop_id()
            .and_then(|id| self.time_windows_by_waypoint_id.get(id))
            .map(|window| {
                TimeWindow::new(
                    window.open_minutes.min(LAST_MINUTE_OF_DAY),
                    window.close_minutes.min(LAST_MINUTE_OF_DAY),
                )
            })
            .unwrap_or(TimeWindow::FULL_DAY)
    }

    pub fn with_fixed_ends(mut self, fixed_start: bool, fixed_end: bool) -> Self {
        self.fixed_start = fixed_start;
        self.fixed_end = fixed_end;
        self
    }

    pub fn with_travel_mode(mut self, mode: TravelMode) -> Self {
        self.travel_mode = mode;
        self
    }

    pub fn with_locked(mut self, id: impl Into<String>) -> Self {
        self.locked_waypoint_ids.insert(id.into());
        self
    }

    pub fn with_visit_minutes(mut self, id: impl Into<String>, minutes: u32) -> Self {
        self.visit_minutes_by_waypoint_id
            .insert(id.into(), clamp_visit_minutes(minutes));
        self
    }

    pub fn with_default_visit_minutes(mut self, minutes: u32) -> Self {
        self.default_visit_minutes = clamp_visit_minutes(minutes);
        self
    }

    pub fn with_time_window(mut self, id: impl Into<String>, open: u32, close: u32) -> Self {
        self.time_windows_by_waypoint_id
            .insert(id.into(), TimeWindow::new(open, close));
        self
    }

    pub fn with_day(mut self, start_minutes: u32, end_minutes: u32) -> Self {
        self.day_start_minutes = start_minutes.min(LAST_MINUTE_OF_DAY);
        self.day_end_minutes = end_minutes.min(MINUTES_PER_DAY);
        self
    }
}

fn finite_number(raw: Option<&Value>) -> Option<f64> {
    raw.and_then(Value::as_f64).filter(|n| n.is_finite())
}

/// A number in `[0, max]`, rounded. Out-of-range values are rejected, not clamped.
fn minutes_in_range(raw: Option<&Value>, max: u32) -> Option<u32> {
    finite_number(raw)
        .filter(|n| *n >= 0.0 && *n <= f64::from(max))
        .map(|n| n.round() as u32)
}

fn visit_minutes(raw: Option<&Value>) -> Option<u32> {
    finite_number(raw)
        .filter(|n| *n > 0.0)
        .map(|n| n.round().min(f64::from(MAX_VISIT_MINUTES)) as u32)
        .map(clamp_visit_minutes)
}

fn clamp_visit_minutes(minutes: u32) -> u32 {
    minutes.clamp(MIN_VISIT_MINUTES, MAX_VISIT_MINUTES)
}

fn clamped_minute(raw: Option<&Value>, default: u32) -> u32 {
    finite_number(raw)
        .map(|n| n.round().clamp(0.0, f64::from(LAST_MINUTE_OF_DAY)) as u32)
        .unwrap_or(default)
}

fn window_from_value(raw: &Value) -> TimeWindow {
    let open = clamped_minute(raw.get("openMinutes"), 0);
    let close = clamped_minute(raw.get("closeMinutes"), LAST_MINUTE_OF_DAY);
    TimeWindow::new(open, close)
}
