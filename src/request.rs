//! JSON request/response shapes.
//!
//! Only the waypoint list is validated strictly. Every other field goes
//! through [`Constraints::from_body`], which defaults anything malformed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constraints::Constraints;
use crate::error::{Error, Result};
use crate::model::{Conflict, DayPlan, OptimizedWaypoint, RouteSummary, Waypoint};

pub const MIN_WAYPOINTS: usize = 2;
pub const MAX_LATITUDE: f64 = 90.0;

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeRequest {
    pub waypoints: Vec<Waypoint>,
    pub constraints: Constraints,
}

impl OptimizeRequest {
    pub fn new(waypoints: Vec<Waypoint>, constraints: Constraints) -> Self {
        Self {
            waypoints,
            constraints,
        }
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json_value(&value)
    }

    /// Decode a request body. Fails only when the waypoint list is missing,
    /// too short, or contains an entry without usable coordinates.
    pub fn from_json_value(body: &Value) -> Result<Self> {
        let raw_waypoints = body
            .get("waypoints")
            .and_then(Value::as_array)
            .filter(|waypoints| waypoints.len() >= MIN_WAYPOINTS)
            .ok_or_else(insufficient_waypoints)?;

        let waypoints = raw_waypoints
            .iter()
            .enumerate()
            .map(|(i, raw)| decode_waypoint(i, raw))
            .collect::<Result<Vec<_>>>()?;

        let constraints = body
            .as_object()
            .map(Constraints::from_body)
            .unwrap_or_default();

        Ok(Self::new(waypoints, constraints))
    }

    /// Reject requests the pipeline cannot order.
    pub fn validate(&self) -> Result<()> {
        if self.waypoints.len() < MIN_WAYPOINTS {
            return Err(insufficient_waypoints());
        }
        if let Some(i) = self
            .waypoints
            .iter()
            .position(|wp| !wp.lat.is_finite() || !wp.lng.is_finite())
        {
            return Err(Error::invalid_input(format!(
                "waypoint {i} has non-finite coordinates"
            )));
        }
        if let Some(i) = self
            .waypoints
            .iter()
            .position(|wp| wp.lat.abs() > MAX_LATITUDE)
        {
            return Err(Error::invalid_input(format!(
                "waypoint {i} has latitude outside [-90, 90]"
            )));
        }
        Ok(())
    }
}

fn insufficient_waypoints() -> Error {
    Error::invalid_input("At least 2 waypoints are required")
}

fn decode_waypoint(index: usize, raw: &Value) -> Result<Waypoint> {
    let mut fields = raw
        .as_object()
        .cloned()
        .ok_or_else(|| Error::invalid_input(format!("waypoint {index} is not an object")))?;

    // The caller's previous position is only a hint; drop it if it is not an index.
    let order = fields
        .remove("order")
        .and_then(|order| order.as_u64())
        .and_then(|order| usize::try_from(order).ok());

    let mut waypoint: Waypoint = serde_json::from_value(Value::Object(fields))
        .map_err(|e| Error::invalid_input(format!("waypoint {index} is malformed: {e}")))?;
    waypoint.order = order;
    Ok(waypoint)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub waypoints: Vec<OptimizedWaypoint>,
    pub days: Vec<DayPlan>,
    pub conflicts: Vec<Conflict>,
    pub summary: RouteSummary,
}

/// Body returned in place of a response when a request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        let error = match err {
            Error::InvalidInput(message) => message.clone(),
            other => other.to_string(),
        };
        Self { error }
    }
}
