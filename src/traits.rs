//! Core seams for the route optimizer.
//!
//! The ordering and scheduling algorithms only need a stop's identity,
//! display name and coordinates, so they are written against [`Stop`]
//! rather than the concrete request types.

/// A place that can be ordered into a route.
pub trait Stop {
    /// Caller-assigned stable id. Stops without one (or with an empty one)
    /// cannot be locked or individually configured.
    fn stop_id(&self) -> Option<&str>;

    /// Human-readable name, used in conflict messages.
    fn name(&self) -> &str;

    /// Location coordinates (lat, lng) in degrees.
    fn location(&self) -> (f64, f64);
}

impl<S: Stop + ?Sized> Stop for &S {
    fn stop_id(&self) -> Option<&str> {
        (**self).stop_id()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn location(&self) -> (f64, f64) {
        (**self).location()
    }
}

/// Provides a distance matrix (kilometers) for a set of locations.
///
/// The matrix is indexed by the provided location order.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Vec<Vec<f64>>;
}
