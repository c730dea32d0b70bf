//! Sample-accurate time maps for non-linear stretching.
//!
//! A time map pins source frame positions to target frame positions. The
//! stretch tool interpolates linearly between consecutive entries, so a map
//! must be non-negative, non-decreasing on both axes, and end exactly at the
//! last source frame before it is handed on. [`validate_time_map`] checks
//! this and returns a [`ValidTimeMap`], the only form the control-file writer
//! accepts.

pub mod builder;
pub mod control;
pub mod validate;

use std::ops::Deref;

pub use builder::{build_time_map, build_time_map_from_warp_file, build_time_map_with_format};
pub use control::ControlFile;
pub use validate::validate_time_map;

/// One source → target correspondence, in frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePoint {
    pub source: i64,
    pub target: f64,
}

impl TimePoint {
    pub fn new(source: i64, target: f64) -> Self {
        Self { source, target }
    }
}

impl From<(i64, i64)> for TimePoint {
    fn from((source, target): (i64, i64)) -> Self {
        Self::new(source, target as f64)
    }
}

/// An ordered, possibly unvalidated, time map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeMap {
    points: Vec<TimePoint>,
}

impl TimeMap {
    pub fn new(points: Vec<TimePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&TimePoint> {
        self.points.last()
    }

    pub fn push(&mut self, point: TimePoint) {
        self.points.push(point);
    }

    pub fn into_points(self) -> Vec<TimePoint> {
        self.points
    }
}

impl<P: Into<TimePoint>> FromIterator<P> for TimeMap {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// A time map that passed validation. Read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTimeMap {
    map: TimeMap,
}

impl ValidTimeMap {
    /// Overall target/source length ratio, the tool's initial `--time` value.
    pub fn time_ratio(&self) -> f64 {
        match self.map.last() {
            Some(last) if last.source > 0 => last.target / last.source as f64,
            _ => 1.0,
        }
    }

    pub fn into_inner(self) -> TimeMap {
        self.map
    }
}

impl Deref for ValidTimeMap {
    type Target = TimeMap;

    fn deref(&self) -> &TimeMap {
        &self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_from_integer_pairs() {
        let map: TimeMap = [(0, 0), (100, 50)].into_iter().collect();
        assert_eq!(
            map.points(),
            &[TimePoint::new(0, 0.0), TimePoint::new(100, 50.0)]
        );
        assert_eq!(map.last(), Some(&TimePoint::new(100, 50.0)));
    }

    #[test]
    fn time_ratio_of_valid_map() {
        let map: TimeMap = [(0, 0), (16000, 12000)].into_iter().collect();
        let valid = validate_time_map(map, 16000).unwrap();
        assert_eq!(valid.time_ratio(), 0.75);
    }

    #[test]
    fn time_ratio_with_zero_length_source() {
        let map: TimeMap = [(0, 0), (0, 0)].into_iter().collect();
        let valid = validate_time_map(map, 0).unwrap();
        assert_eq!(valid.time_ratio(), 1.0);
    }
}
