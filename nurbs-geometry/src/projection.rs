//! Nearest-parameter projection of a point onto a curve, accelerated by
//! an R-tree over densely pre-sampled chord segments and refined by
//! Newton iteration in parameter space.

use crate::curve::NurbsCurveGeometry;
use crate::errors::{Error, Result};
use crate::rtree::RTree;
use nurbs_base::cgmath64::*;

const MAX_NEWTON_ITERATIONS: usize = 50;
const SAMPLES_PER_SPAN: usize = 100;

/// Projects query points onto a curve. Pre-samples the curve once at
/// construction and reuses the resulting R-tree for every
/// [`compute`](Self::compute) call.
pub struct PointOnCurveProjection<'a, V, const D: usize> {
    curve: &'a NurbsCurveGeometry<V>,
    tolerance: f64,
    samples: Vec<(f64, V)>,
    tree: RTree<D>,
    parameter: Option<f64>,
    point: Option<V>,
}

impl<'a, V, const D: usize> PointOnCurveProjection<'a, V, D>
where
    V: VectorSpace<Scalar = f64> + InnerSpace<Scalar = f64> + Copy + Into<[f64; D]>,
{
    /// Builds the acceleration structure for `curve`. `tolerance` gates
    /// both Newton convergence and the degenerate-chord fallback.
    pub fn try_new(curve: &'a NurbsCurveGeometry<V>, tolerance: f64) -> Result<Self> {
        if tolerance <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "projection tolerance must be positive, got {tolerance}"
            )));
        }
        let domain = curve.domain();
        let nb_spans = curve.knots().nb_spans(curve.degree()).max(1);
        let nb_samples = nb_spans * SAMPLES_PER_SPAN;
        let samples: Vec<(f64, V)> = (0..=nb_samples)
            .map(|i| {
                let t = domain.denormalize(i as f64 / nb_samples as f64);
                (t, curve.point_at(t))
            })
            .collect();

        let mut tree = RTree::<D>::new(nb_samples)?;
        for w in samples.windows(2) {
            let (p0, p1): ([f64; D], [f64; D]) = (w[0].1.into(), w[1].1.into());
            let mut min = p0;
            let mut max = p0;
            for d in 0..D {
                min[d] = min[d].min(p1[d]);
                max[d] = max[d].max(p1[d]);
            }
            tree.add(min, max)?;
        }
        tree.finish()?;

        Ok(PointOnCurveProjection {
            curve,
            tolerance,
            samples,
            tree,
            parameter: None,
            point: None,
        })
    }

    /// the parameter found by the most recent [`compute`](Self::compute) call
    pub fn parameter(&self) -> Option<f64> { self.parameter }
    /// the point found by the most recent [`compute`](Self::compute) call
    pub fn point(&self) -> Option<V> { self.point }

    fn newton_refine(&self, seed: f64, target: V) -> (f64, V) {
        let domain = self.curve.domain();
        let mut t = seed.clamp(domain.min(), domain.max());
        let mut point = self.curve.point_at(t);
        for _ in 0..MAX_NEWTON_ITERATIONS {
            let ders = self.curve.derivatives_at(t, 2);
            let diff = ders[0] - target;
            let f = diff.dot(ders[1]);
            let fp = ders[1].dot(ders[1]) + diff.dot(ders[2]);
            if fp.abs() < f64::EPSILON {
                break;
            }
            let t_next = (t - f / fp).clamp(domain.min(), domain.max());
            let next_point = self.curve.point_at(t_next);
            let step_converged = (next_point - point).magnitude() <= self.tolerance;
            let residual_converged = f.abs() <= self.tolerance * ders[1].magnitude().max(1.0);
            t = t_next;
            point = next_point;
            if step_converged || residual_converged {
                break;
            }
        }
        (t, point)
    }

    fn nearest_endpoint(&self, target: V) -> (f64, V, f64) {
        let (t0, p0) = self.samples[0];
        let (t1, p1) = *self.samples.last().unwrap();
        let d0 = (p0 - target).magnitude();
        let d1 = (p1 - target).magnitude();
        if d0 <= d1 { (t0, p0, d0) } else { (t1, p1, d1) }
    }

    /// Finds the curve parameter nearest `target`. On success returns
    /// `(t, point)` and records it for [`parameter`](Self::parameter)/
    /// [`point`](Self::point). If `max_distance` excludes every
    /// candidate, records the nearer domain endpoint and returns
    /// [`Error::EmptyResult`] carrying its distance to `target`.
    pub fn compute(&mut self, target: V, max_distance: Option<f64>) -> Result<(f64, V)> {
        let max_distance = max_distance.unwrap_or(f64::INFINITY);
        let target_arr: [f64; D] = target.into();
        let (query_min, query_max) = if max_distance.is_finite() {
            let mut min = [0.0; D];
            let mut max = [0.0; D];
            for d in 0..D {
                min[d] = target_arr[d] - max_distance;
                max[d] = target_arr[d] + max_distance;
            }
            (min, max)
        } else {
            ([f64::NEG_INFINITY; D], [f64::INFINITY; D])
        };

        let candidates = self.tree.search(query_min, query_max, |_| true);
        let mut best: Option<(f64, V, f64)> = None;
        for segment in candidates {
            let (ta, pa) = self.samples[segment];
            let (tb, pb) = self.samples[segment + 1];
            let chord = pb - pa;
            let denom = chord.dot(chord);
            let s = if denom > nurbs_base::TOLERANCE2 {
                ((target - pa).dot(chord) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let seed = ta + s * (tb - ta);
            let (t, p) = self.newton_refine(seed, target);
            let dist = (p - target).magnitude();
            if dist <= max_distance && best.as_ref().map_or(true, |&(_, _, best_dist)| dist < best_dist) {
                best = Some((t, p, dist));
            }
        }

        match best {
            Some((t, p, _)) => {
                self.parameter = Some(t);
                self.point = Some(p);
                Ok((t, p))
            }
            None => {
                let (t, p, dist) = self.nearest_endpoint(target);
                self.parameter = Some(t);
                self.point = Some(p);
                Err(Error::EmptyResult(dist))
            }
        }
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
    fn projects_onto_nearest_point_of_a_line() {
        let curve = diagonal_line();
        let mut projector = PointOnCurveProjection::<Vector2, 2>::try_new(&curve, 1e-9).unwrap();
        let (t, p) = projector.compute(Vector2::new(3.0, 5.0), None).unwrap();
        assert_near!(t, 0.4);
        assert_near!(p, Vector2::new(4.0, 4.0));
        assert_eq!(projector.parameter(), Some(t));
    }

    #[test]
    fn point_on_curve_projects_to_itself() {
        let curve = diagonal_line();
        let mut projector = PointOnCurveProjection::<Vector2, 2>::try_new(&curve, 1e-9).unwrap();
        let on_curve = curve.point_at(0.73);
        let (t, p) = projector.compute(on_curve, None).unwrap();
        assert_near!(t, 0.73);
        assert_near!(p, on_curve);
    }

    #[test]
    fn max_distance_exclusion_falls_back_to_nearest_endpoint() {
        let curve = diagonal_line();
        let mut projector = PointOnCurveProjection::<Vector2, 2>::try_new(&curve, 1e-9).unwrap();
        let far_target = Vector2::new(1000.0, -1000.0);
        let err = projector.compute(far_target, Some(1.0)).unwrap_err();
        match err {
            Error::EmptyResult(dist) => assert!(dist > 1.0),
            other => panic!("expected EmptyResult, got {other:?}"),
        }
        assert_eq!(projector.parameter(), Some(0.0));
    }

    #[test]
    fn non_positive_tolerance_is_rejected() {
        let curve = diagonal_line();
        assert!(PointOnCurveProjection::<Vector2, 2>::try_new(&curve, 0.0).is_err());
    }
}
