//! Adaptive chord-deviation tessellation of a curve into a polyline.

use crate::curve::NurbsCurveGeometry;
use crate::errors::{Error, Result};
use nurbs_base::{Interval, TOLERANCE};
use nurbs_base::cgmath64::*;

const MAX_SUBDIVISION_DEPTH: usize = 24;

fn perpendicular_distance<V: VectorSpace<Scalar = f64> + InnerSpace<Scalar = f64>>(
    pm: V,
    pa: V,
    pb: V,
) -> f64 {
    let ab = pb - pa;
    let denom = ab.dot(ab);
    if denom <= TOLERANCE * TOLERANCE {
        return (pm - pa).magnitude();
    }
    let t = (pm - pa).dot(ab) / denom;
    let proj = pa + ab * t;
    (pm - proj).magnitude()
}

fn tessellate_span<V: VectorSpace<Scalar = f64> + InnerSpace<Scalar = f64>>(
    curve: &NurbsCurveGeometry<V>,
    ta: f64,
    tb: f64,
    tolerance: f64,
) -> Vec<(f64, V)> {
    let pa = curve.point_at(ta);
    let pb = curve.point_at(tb);
    let mut stack = vec![(ta, tb, pa, pb, 0usize)];
    let mut accepted = Vec::new();
    while let Some((a, b, pa, pb, depth)) = stack.pop() {
        let tm = 0.5 * (a + b);
        let pm = curve.point_at(tm);
        let dist = perpendicular_distance(pm, pa, pb);
        if dist > tolerance && depth < MAX_SUBDIVISION_DEPTH {
            stack.push((tm, b, pm, pb, depth + 1));
            stack.push((a, tm, pa, pm, depth + 1));
        } else {
            accepted.push((a, pa));
            accepted.push((b, pb));
        }
    }
    accepted.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap());
    accepted.dedup_by(|x, y| (x.0 - y.0).abs() < TOLERANCE);
    accepted
}

/// Adaptively tessellates `curve` over `interval` (defaulting to the whole
/// domain) into `(t, point)` samples with strictly increasing `t`,
/// endpoints included, and every knot strictly inside the interval forced
/// in as a sample.
pub fn tessellate<V: VectorSpace<Scalar = f64> + InnerSpace<Scalar = f64>>(
    curve: &NurbsCurveGeometry<V>,
    tolerance: f64,
    interval: Option<Interval>,
) -> Result<Vec<(f64, V)>> {
    if tolerance <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "tessellation tolerance must be positive, got {tolerance}"
        )));
    }
    let domain = interval.unwrap_or_else(|| curve.domain());
    let mut breakpoints: Vec<f64> = curve
        .knots()
        .as_slice()
        .iter()
        .copied()
        .filter(|&t| t > domain.min() + TOLERANCE && t < domain.max() - TOLERANCE)
        .collect();
    breakpoints.sort_by(|a, b| a.partial_cmp(b).unwrap());
    breakpoints.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE);
    breakpoints.insert(0, domain.min());
    breakpoints.push(domain.max());

    let mut samples: Vec<(f64, V)> = Vec::new();
    for pair in breakpoints.windows(2) {
        let mut span = tessellate_span(curve, pair[0], pair[1], tolerance);
        if !samples.is_empty() {
            span.remove(0);
        }
        samples.extend(span);
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knot_vector::KnotVector;
    use nurbs_base::assert_near;

    fn quarter_circleish() -> NurbsCurveGeometry<Vector2> {
        // a degree-2 curve bulging away from its chord, forcing subdivision.
        let knots = KnotVector::new(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let poles = vec![
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ];
        NurbsCurveGeometry::try_new(2, knots, poles, vec![1.0, std::f64::consts::FRAC_1_SQRT_2, 1.0])
            .unwrap()
    }

    #[test]
    fn endpoints_are_included() {
        let curve = quarter_circleish();
        let samples = tessellate(&curve, 1e-3, None).unwrap();
        assert_near!(samples.first().unwrap().0, 0.0);
        assert_near!(samples.last().unwrap().0, 1.0);
    }

    #[test]
    fn strictly_increasing_parameter() {
        let curve = quarter_circleish();
        let samples = tessellate(&curve, 1e-3, None).unwrap();
        for w in samples.windows(2) {
            assert!(w[1].0 > w[0].0);
        }
    }

    #[test]
    fn tighter_tolerance_yields_more_samples() {
        let curve = quarter_circleish();
        let coarse = tessellate(&curve, 1e-1, None).unwrap();
        let fine = tessellate(&curve, 1e-5, None).unwrap();
        assert!(fine.len() >= coarse.len());
    }

    #[test]
    fn zero_tolerance_is_rejected() {
        let curve = quarter_circleish();
        assert!(tessellate(&curve, 0.0, None).is_err());
    }
}
