//! Time map invariant checks.

use super::{TimeMap, ValidTimeMap};
use crate::error::ValidationError;

/// Check `map` against a source of `source_len` frames.
///
/// Checks run in a fixed order and the first failure is returned:
/// negative (or non-finite) coordinates, then monotonicity, then length, then the
/// end boundary. Both axes must be non-decreasing together; a map that runs
/// one axis backwards is rejected even if the other axis moves forward.
pub fn validate_time_map(map: TimeMap, source_len: i64) -> Result<ValidTimeMap, ValidationError> {
    let points = map.points();

    if let Some(index) = points
        .iter()
        .position(|p| p.source < 0 || !p.target.is_finite() || p.target < 0.0)
    {
        return Err(ValidationError::NegativeCoordinate { index });
    }

    if let Some(index) = points
        .windows(2)
        .position(|w| w[0].source > w[1].source || w[0].target > w[1].target)
    {
        return Err(ValidationError::NonMonotonic { index });
    }

    let last = match points {
        [.., _, last] => last,
        _ => return Err(ValidationError::TooShort { len: points.len() }),
    };

    if last.source != source_len {
        return Err(ValidationError::BoundaryMismatch {
            expected: source_len,
            found: last.source,
        });
    }

    Ok(ValidTimeMap { map })
}
