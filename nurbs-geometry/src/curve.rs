//! NURBS curve geometry: construction and point/derivative evaluation.

use crate::errors::{Error, Result};
use crate::knot_vector::KnotVector;
use crate::shape_functions::ShapeFunctions;
use nurbs_base::cgmath64::*;
use nurbs_base::Interval;
use serde::{Deserialize, Serialize};

/// A NURBS curve of dimension `V` (`Vector2<f64>` or `Vector3<f64>`):
/// degree, knot vector, poles, and optional weights.
///
/// Constructed once and thereafter read-only with respect to topology
/// (degree, knot count, pole count); pole, weight, and knot values may
/// still be edited in place through [`poles_mut`](Self::poles_mut) and
/// friends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NurbsCurveGeometry<V> {
    degree: usize,
    knots: KnotVector,
    poles: Vec<V>,
    weights: Vec<f64>,
}

impl<V: VectorSpace<Scalar = f64>> NurbsCurveGeometry<V> {
    /// Builds a curve from `(degree, knots, poles, weights)`.
    /// # Errors
    /// `len(knots) != degree + len(poles) - 1` or
    /// `len(weights) ∉ {0, len(poles)}` is an [`Error::InvalidArgument`].
    pub fn try_new(degree: usize, knots: KnotVector, poles: Vec<V>, weights: Vec<f64>) -> Result<Self> {
        if degree < 1 {
            return Err(Error::InvalidArgument(format!(
                "degree must be at least 1, got {degree}"
            )));
        }
        if poles.is_empty() {
            return Err(Error::InvalidArgument("poles must not be empty".to_string()));
        }
        if knots.len() != degree + poles.len() - 1 {
            return Err(Error::InvalidArgument(format!(
                "knot vector length {} does not match degree {} and {} poles",
                knots.len(),
                degree,
                poles.len()
            )));
        }
        if !weights.is_empty() && weights.len() != poles.len() {
            return Err(Error::InvalidArgument(format!(
                "{} weights given for {} poles",
                weights.len(),
                poles.len()
            )));
        }
        Ok(NurbsCurveGeometry {
            degree,
            knots,
            poles,
            weights,
        })
    }

    /// the polynomial degree
    #[inline(always)]
    pub fn degree(&self) -> usize { self.degree }
    /// the number of poles
    #[inline(always)]
    pub fn nb_poles(&self) -> usize { self.poles.len() }
    /// the poles, in order
    #[inline(always)]
    pub fn poles(&self) -> &[V] { &self.poles }
    /// mutable access to the poles
    #[inline(always)]
    pub fn poles_mut(&mut self) -> &mut [V] { &mut self.poles }
    /// the weights, empty if the curve is (or was constructed as) non-rational
    #[inline(always)]
    pub fn weights(&self) -> &[f64] { &self.weights }
    /// the knot vector
    #[inline(always)]
    pub fn knots(&self) -> &KnotVector { &self.knots }

    /// `true` iff weights are present and not all equal
    pub fn is_rational(&self) -> bool {
        match self.weights.split_first() {
            Some((first, rest)) => rest.iter().any(|w| (w - first).abs() > f64::EPSILON),
            None => false,
        }
    }

    /// the knot-implied parameter domain
    #[inline(always)]
    pub fn domain(&self) -> Interval { self.knots.domain(self.degree) }

    /// the arithmetic mean of `degree` consecutive interior knots starting
    /// at `index+1`, a parameter conventionally associated with pole `index`
    pub fn greville_point(&self, index: usize) -> f64 { self.knots.greville(self.degree, index) }

    fn weights_or_none(&self) -> Option<&[f64]> {
        (!self.weights.is_empty()).then_some(self.weights.as_slice())
    }

    /// Position at parameter `t`, clamped into [`domain`](Self::domain).
    pub fn point_at(&self, t: f64) -> V { self.derivatives_at(t, 0)[0] }

    /// The point and its derivatives up to `order`, `order+1` values total.
    pub fn derivatives_at(&self, t: f64, order: usize) -> Vec<V> {
        let sf = ShapeFunctions::curve(self.degree, &self.knots, self.weights_or_none(), t, order)
            .expect("degree was validated at construction");
        (0..=order)
            .map(|k| {
                sf.nonzero_indices
                    .iter()
                    .zip(sf.values[k].iter())
                    .fold(V::zero(), |acc, (&i, &n)| acc + self.poles[i] * n)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nurbs_base::assert_near;

    fn scenario_s1() -> NurbsCurveGeometry<Vector3> {
        let knots = KnotVector::new(vec![
            0.0,
            0.0,
            0.0,
            0.0,
            32.9731425998736,
            65.9462851997473,
            98.9194277996209,
            131.892570399495,
            131.892570399495,
            131.892570399495,
            131.892570399495,
        ]);
        let poles = vec![
            Vector3::new(0.0, -25.0, -5.0),
            Vector3::new(-5.0, -25.0, 0.0),
            Vector3::new(-15.0, -20.0, -1.0),
            Vector3::new(-18.0, -5.0, 3.0),
            Vector3::new(-12.0, 8.0, 5.0),
            Vector3::new(-8.0, 15.0, 4.166667),
            Vector3::new(-15.0, 20.0, 4.5),
            Vector3::new(-25.0, 15.0, 4.0),
        ];
        NurbsCurveGeometry::try_new(4, knots, poles, vec![]).unwrap()
    }

    #[test]
    fn endpoints_match_first_and_last_pole() {
        let curve = scenario_s1();
        assert_near!(curve.point_at(0.0), Vector3::new(0.0, -25.0, -5.0));
        assert_near!(curve.point_at(131.892570399495), Vector3::new(-25.0, 15.0, 4.0));
    }

    #[test]
    fn zeroth_derivative_equals_point_at() {
        let curve = scenario_s1();
        for i in 0..=10 {
            let t = curve.domain().denormalize(i as f64 / 10.0);
            let ders = curve.derivatives_at(t, 2);
            assert_near!(ders[0], curve.point_at(t));
        }
    }

    #[test]
    fn invalid_knot_length_is_rejected() {
        let knots = KnotVector::new(vec![0.0, 0.0, 1.0, 1.0]);
        let poles = vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0)];
        assert!(NurbsCurveGeometry::try_new(2, knots, poles, vec![]).is_err());
    }
}
