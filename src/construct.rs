//! Nearest-neighbor route construction.

use tracing::trace;

/// Order a segment greedily by nearest neighbor.
///
/// `segment` holds indices into `matrix`. With `fixed_end` the last element
/// is held back and appended at the end. The first element always seeds the
/// route, whether or not the start is fixed. Ties go to the earliest
/// candidate in the remaining pool.
pub fn nearest_neighbor_order(
    segment: &[usize],
    matrix: &[Vec<f64>],
    fixed_start: bool,
    fixed_end: bool,
) -> Vec<usize> {
    if segment.len() <= 2 {
        return segment.to_vec();
    }
    trace!(len = segment.len(), fixed_start, fixed_end, "nearest-neighbor seed");

    let mut remaining = segment.to_vec();
    let end = if fixed_end { remaining.pop() } else { None };

    let mut route = Vec::with_capacity(segment.len());
    route.push(remaining.remove(0));

    while let Some(&current) = route.last() {
        if remaining.is_empty() {
            break;
        }

        let mut next_idx = 0;
        let mut best = f64::INFINITY;
        for (i, &candidate) in remaining.iter().enumerate() {
            let dist = matrix[current][candidate];
            if dist < best {
                best = dist;
                next_idx = i;
            }
        }
        route.push(remaining.remove(next_idx));
    }

    if let Some(end) = end {
        route.push(end);
    }
    route
}
