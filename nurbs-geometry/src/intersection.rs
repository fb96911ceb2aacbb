//! Intersections of a 2D curve with axis-aligned knot lines, found by
//! Newton iteration seeded from per-span corner/midpoint brackets.

use crate::curve::NurbsCurveGeometry;
use crate::errors::{Error, Result};
use nurbs_base::cgmath64::*;

const MAX_NEWTON_ITERATIONS: usize = 50;

/// Finds curve parameters where a 2D curve crosses either a set of
/// vertical lines (`x = knots_u[i]`) or horizontal lines (`y = knots_v[i]`).
pub struct CurveSpanIntersection {
    knots_u: Vec<f64>,
    knots_v: Vec<f64>,
    tolerance: f64,
    include_curve_knots: bool,
}

impl CurveSpanIntersection {
    /// `knots_u`/`knots_v` need not be deduplicated; `tolerance` bounds both
    /// the Newton residual and the final dedup pass.
    pub fn try_new(
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        tolerance: f64,
        include_curve_knots: bool,
    ) -> Result<Self> {
        if tolerance <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "intersection tolerance must be positive, got {tolerance}"
            )));
        }
        Ok(CurveSpanIntersection {
            knots_u,
            knots_v,
            tolerance,
            include_curve_knots,
        })
    }

    fn unique_sorted(values: &[f64], tolerance: f64) -> Vec<f64> {
        let mut out = values.to_vec();
        out.sort_by(|a, b| a.partial_cmp(b).unwrap());
        out.dedup_by(|a, b| (*a - *b).abs() < tolerance);
        out
    }

    /// Targets on `axis` (0 = x against `knots_u`, 1 = y against `knots_v`)
    /// that fall strictly between `lo` and `hi`.
    fn targets_in_range(&self, axis: usize, lo: f64, hi: f64) -> Vec<f64> {
        let source = if axis == 0 { &self.knots_u } else { &self.knots_v };
        Self::unique_sorted(source, self.tolerance)
            .into_iter()
            .filter(|&v| v >= lo - self.tolerance && v <= hi + self.tolerance)
            .collect()
    }

    fn coord(p: Vector2, axis: usize) -> f64 {
        if axis == 0 { p.x } else { p.y }
    }

    fn newton_root(
        curve: &NurbsCurveGeometry<Vector2>,
        axis: usize,
        target: f64,
        mut t: f64,
        ta: f64,
        tb: f64,
        tolerance: f64,
    ) -> Option<f64> {
        for _ in 0..MAX_NEWTON_ITERATIONS {
            let ders = curve.derivatives_at(t, 1);
            let f = Self::coord(ders[0], axis) - target;
            if f.abs() <= tolerance {
                return (t >= ta - tolerance && t <= tb + tolerance).then_some(t.clamp(ta, tb));
            }
            let df = Self::coord(ders[1], axis);
            if df.abs() < f64::EPSILON {
                return None;
            }
            let next = t - f / df;
            t = next.clamp(ta, tb);
        }
        let ders = curve.derivatives_at(t, 0);
        let f = Self::coord(ders[0], axis) - target;
        (f.abs() <= tolerance).then_some(t)
    }

    fn span_roots(
        &self,
        curve: &NurbsCurveGeometry<Vector2>,
        ta: f64,
        tb: f64,
    ) -> Vec<f64> {
        let tm = 0.5 * (ta + tb);
        let pa = curve.point_at(ta);
        let pb = curve.point_at(tb);
        let pm = curve.point_at(tm);
        let samples = [(ta, pa), (tm, pm), (tb, pb)];

        let mut roots = Vec::new();
        for axis in 0..2 {
            let coords: Vec<f64> = samples.iter().map(|&(_, p)| Self::coord(p, axis)).collect();
            let lo = coords.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = coords.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            for target in self.targets_in_range(axis, lo, hi) {
                for w in samples.windows(2) {
                    let (c0, c1) = (Self::coord(w[0].1, axis), Self::coord(w[1].1, axis));
                    let brackets = (c0 - target) * (c1 - target) <= 0.0;
                    if !brackets {
                        continue;
                    }
                    let seed = 0.5 * (w[0].0 + w[1].0);
                    if let Some(root) =
                        Self::newton_root(curve, axis, target, seed, ta, tb, self.tolerance)
                    {
                        roots.push(root);
                    }
                }
            }
        }
        roots
    }

    /// Runs the search over every span of `curve`'s knot vector and returns
    /// the merged, sorted, deduplicated set of crossing parameters.
    pub fn compute(&self, curve: &NurbsCurveGeometry<Vector2>) -> Vec<f64> {
        let degree = curve.degree();
        let knots = curve.knots().as_slice();
        let domain = curve.domain();
        let mut breakpoints: Vec<f64> = knots
            .iter()
            .copied()
            .filter(|&t| t >= domain.min() - self.tolerance && t <= domain.max() + self.tolerance)
            .collect();
        breakpoints.sort_by(|a, b| a.partial_cmp(b).unwrap());
        breakpoints.dedup_by(|a, b| (*a - *b).abs() < self.tolerance);
        if breakpoints.len() < 2 {
            breakpoints = vec![domain.min(), domain.max()];
        }
        let _ = degree;

        let mut results = Vec::new();
        for w in breakpoints.windows(2) {
            results.extend(self.span_roots(curve, w[0], w[1]));
        }
        if self.include_curve_knots {
            results.extend(
                knots
                    .iter()
                    .copied()
                    .filter(|&t| t > domain.min() + self.tolerance && t < domain.max() - self.tolerance),
            );
        }
        Self::unique_sorted(&results, self.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knot_vector::KnotVector;
    use nurbs_base::assert_near;

    fn diagonal_line() -> NurbsCurveGeometry<Vector2> {
        let knots = KnotVector::new(vec![0.0, 0.0, 1.0, 1.0]);
        let poles = vec![Vector2::new(0.0, 0.0), Vector2::new(10.0, 10.0)];
        NurbsCurveGeometry::try_new(1, knots, poles, vec![]).unwrap()
    }

    #[test]
    fn finds_grid_crossings_of_a_diagonal_line() {
        let curve = diagonal_line();
        let intersector =
            CurveSpanIntersection::try_new(vec![0.0, 5.0, 10.0], vec![0.0, 5.0, 10.0], 1e-9, false)
                .unwrap();
        let hits = intersector.compute(&curve);
        // the line x=y crosses each vertical/horizontal grid line at the
        // same t, so 0, 0.5, and 1 each get hit twice and collapse to one.
        assert_eq!(hits.len(), 3);
        assert_near!(hits[0], 0.0);
        assert_near!(hits[1], 0.5);
        assert_near!(hits[2], 1.0);
    }

    #[test]
    fn empty_targets_give_no_hits() {
        let curve = diagonal_line();
        let intersector = CurveSpanIntersection::try_new(vec![], vec![], 1e-9, false).unwrap();
        assert!(intersector.compute(&curve).is_empty());
    }

    #[test]
    fn include_curve_knots_adds_interior_breakpoints() {
        let knots = KnotVector::new(vec![0.0, 0.0, 0.5, 1.0, 1.0]);
        let poles = vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(5.0, 5.0),
            Vector2::new(10.0, 10.0),
        ];
        let curve = NurbsCurveGeometry::try_new(2, knots, poles, vec![]).unwrap();
        let intersector = CurveSpanIntersection::try_new(vec![], vec![], 1e-9, true).unwrap();
        let hits = intersector.compute(&curve);
        assert!(hits.iter().any(|&t| (t - 0.5).abs() < 1e-9));
    }

    #[test]
    fn non_positive_tolerance_is_rejected() {
        assert!(CurveSpanIntersection::try_new(vec![], vec![], 0.0, false).is_err());
    }

    #[test]
    fn matches_reference_span_intersection() {
        let knots = KnotVector::new(vec![1.0, 1.0, 4.3333333333, 7.6666666667, 11.0, 11.0]);
        let poles = vec![
            Vector2::new(5.0, 5.0),
            Vector2::new(8.0, 7.0),
            Vector2::new(6.0, 8.0),
            Vector2::new(8.0, 10.0),
            Vector2::new(9.0, 8.0),
        ];
        let curve = NurbsCurveGeometry::try_new(2, knots, poles, vec![]).unwrap();
        let intersector = CurveSpanIntersection::try_new(
            vec![5.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 10.0],
            vec![5.0, 5.0, 6.0, 8.0, 8.0, 10.0, 10.0],
            1e-7,
            false,
        )
        .unwrap();
        let hits = intersector.compute(&curve);
        let expected = [
            1.0,
            1.6366100188,
            1.9308025998,
            2.6666666667,
            4.3333333333,
            5.7140452079,
            7.6666666667,
            9.3333333333,
            11.0,
        ];
        assert_eq!(hits.len(), expected.len());
        for (got, &want) in hits.iter().zip(expected.iter()) {
            assert_near!(*got, want);
        }
    }
}
