//! Projects a query point onto a 2D polyline, reporting the nearest (and,
//! when ambiguous, second-nearest) segment and its local parameter.

use crate::errors::{Error, Result};
use nurbs_base::cgmath64::*;

/// An ordered sequence of 2D points defining a piecewise-linear path.
pub struct PolylineMapper {
    points: Vec<Vector2>,
}

impl PolylineMapper {
    /// Wraps `points` as a polyline. Fails only on an empty point list.
    pub fn try_new(points: Vec<Vector2>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::InvalidArgument("polyline must have at least one point".to_string()));
        }
        Ok(PolylineMapper { points })
    }

    fn foot_of_perpendicular(&self, segment: usize, query: Vector2) -> (f64, f64) {
        let a = self.points[segment];
        let b = self.points[segment + 1];
        let ab = b - a;
        let denom = ab.dot(ab);
        let t = if denom > nurbs_base::TOLERANCE2 {
            ((query - a).dot(ab) / denom).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let foot = a + ab * t;
        (t, (foot - query).magnitude())
    }

    /// Returns `(t0, i0, t1, i1)`: the nearest segment's local parameter
    /// and index, then the second-nearest *distinct* segment's, if its
    /// distance is within `tolerance` of the nearest. Otherwise `(t1, i1)`
    /// repeats `(t0, i0)`. A single-point polyline always returns
    /// `(0, 0, 0, 0)`.
    pub fn map(&self, query: Vector2, tolerance: f64) -> (f64, usize, f64, usize) {
        if self.points.len() < 2 {
            return (0.0, 0, 0.0, 0);
        }
        let mut scored: Vec<(f64, usize, f64)> = (0..self.points.len() - 1)
            .map(|i| {
                let (t, dist) = self.foot_of_perpendicular(i, query);
                (dist, i, t)
            })
            .collect();
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        let (d0, i0, t0) = scored[0];
        if scored.len() < 2 {
            return (t0, i0, t0, i0);
        }
        let (d1, i1, t1) = scored[1];
        if (d1 - d0).abs() <= tolerance {
            (t0, i0, t1, i1)
        } else {
            (t0, i0, t0, i0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nurbs_base::assert_near;

    fn right_angle_path() -> PolylineMapper {
        PolylineMapper::try_new(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(2.0, 0.0),
            Vector2::new(2.0, 2.0),
        ])
        .unwrap()
    }

    #[test]
    fn unambiguous_point_maps_to_its_segment() {
        let polyline = right_angle_path();
        let (t0, i0, t1, i1) = polyline.map(Vector2::new(1.0, 0.5), 1e-6);
        assert_eq!(i0, 0);
        assert_near!(t0, 0.5);
        assert_eq!((t1, i1), (t0, i0));
    }

    #[test]
    fn corner_point_is_ambiguous_between_both_segments() {
        let polyline = right_angle_path();
        let (t0, i0, t1, i1) = polyline.map(Vector2::new(2.0, 0.0), 1e-6);
        let mut hit: Vec<usize> = vec![i0, i1];
        hit.sort();
        assert_eq!(hit, vec![0, 1]);
        let _ = (t0, t1);
    }

    #[test]
    fn single_point_polyline_is_degenerate() {
        let polyline = PolylineMapper::try_new(vec![Vector2::new(5.0, 5.0)]).unwrap();
        assert_eq!(polyline.map(Vector2::new(0.0, 0.0), 1e-6), (0.0, 0, 0.0, 0));
    }

    #[test]
    fn empty_points_are_rejected() {
        assert!(PolylineMapper::try_new(vec![]).is_err());
    }
}
