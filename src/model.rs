//! Domain types flowing through the optimizer pipeline.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::traits::Stop;

/// Last minute of a day (23:59).
pub const LAST_MINUTE_OF_DAY: u32 = 23 * 60 + 59;

/// Minutes in a day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A waypoint as supplied by the caller.
///
/// Fields the optimizer does not understand are kept in `extra` and echoed
/// back untouched in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Position hint from the caller; replaced by the assigned order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Waypoint {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            lat,
            lng,
            order: None,
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Non-string values (null, numbers, objects) read as no id.
fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    string_or_none(deserializer).map(Option::unwrap_or_default)
}

impl Stop for Waypoint {
    fn stop_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// A waypoint with its 0-based position in the optimized sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedWaypoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub order: usize,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OptimizedWaypoint {
    pub fn from_waypoint(waypoint: Waypoint, order: usize) -> Self {
        Self {
            id: waypoint.id,
            name: waypoint.name,
            lat: waypoint.lat,
            lng: waypoint.lng,
            order,
            extra: waypoint.extra,
        }
    }
}

impl Stop for OptimizedWaypoint {
    fn stop_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// How the traveler moves between stops. Each mode maps to a fixed
/// average speed used for leg estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl TravelMode {
    /// Parse a mode name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "driving" => Some(Self::Driving),
            "walking" => Some(Self::Walking),
            "cycling" => Some(Self::Cycling),
            _ => None,
        }
    }

    /// Average speed in km/h.
    pub fn speed_kmh(self) -> f64 {
        match self {
            Self::Driving => 60.0,
            Self::Cycling => 18.0,
            Self::Walking => 5.0,
        }
    }

    /// Estimated minutes to cover `km`. Never less than one minute.
    pub fn leg_minutes(self, km: f64) -> u32 {
        let minutes = (km / self.speed_kmh() * 60.0).round();
        // Saturating cast; NaN maps to 0 and is lifted to 1 below.
        (minutes as u32).max(1)
    }
}

/// An opening window in minutes from midnight, `open_minutes <= close_minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub open_minutes: u32,
    pub close_minutes: u32,
}

impl TimeWindow {
    pub const FULL_DAY: TimeWindow = TimeWindow {
        open_minutes: 0,
        close_minutes: LAST_MINUTE_OF_DAY,
    };

    /// Build a window, swapping the bounds if they are reversed.
    pub fn new(open_minutes: u32, close_minutes: u32) -> Self {
        Self {
            open_minutes: open_minutes.min(close_minutes),
            close_minutes: close_minutes.max(open_minutes),
        }
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::FULL_DAY
    }
}

/// One day of the itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// 1-based day number.
    pub day: u32,
    /// Indices into the optimized waypoint array.
    pub waypoint_indexes: Vec<usize>,
    pub estimated_travel_minutes: u32,
}

/// A stop that could not be scheduled within its window. The stop is still
/// placed in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoint_id: Option<String>,
    pub message: String,
}

/// Totals over the whole optimized route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub total_distance_km: f64,
    pub total_travel_minutes: u32,
    pub day_count: usize,
    pub conflict_count: usize,
}
