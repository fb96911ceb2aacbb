//! Knot vectors: span lookup and the degree/pole/knot arithmetic identities.

use crate::errors::{Error, Result};
use nurbs_base::{Interval, Tolerance};
use serde::{Deserialize, Serialize};

/// A non-decreasing sequence of reals defining the piecewise polynomial
/// structure of a B-spline/NURBS geometry along one parameter direction.
///
/// The knot vector does not itself store a degree; span lookup and the
/// arithmetic identities all take `degree` as a parameter, mirroring how
/// a curve or surface geometry pairs one knot vector per direction with
/// its own degree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnotVector(Vec<f64>);

impl KnotVector {
    /// Wraps a sequence of knots without validation. Prefer [`try_new`](Self::try_new)
    /// at a construction boundary.
    #[inline(always)]
    pub fn new(knots: Vec<f64>) -> Self { KnotVector(knots) }

    /// Validates `degree >= 1` and that `knots` is non-decreasing.
    /// # Examples
    /// ```
    /// use nurbs_geometry::KnotVector;
    /// assert!(KnotVector::try_new(2, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]).is_ok());
    /// assert!(KnotVector::try_new(0, vec![0.0, 1.0]).is_err());
    /// assert!(KnotVector::try_new(1, vec![1.0, 0.0]).is_err());
    /// ```
    pub fn try_new(degree: usize, knots: Vec<f64>) -> Result<Self> {
        if degree < 1 {
            return Err(Error::InvalidArgument(format!(
                "degree must be at least 1, got {degree}"
            )));
        }
        if knots.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidArgument(
                "knot vector must be non-decreasing".to_string(),
            ));
        }
        Ok(KnotVector(knots))
    }

    /// the raw knot values
    #[inline(always)]
    pub fn as_slice(&self) -> &[f64] { &self.0 }

    /// `nb_knots`
    #[inline(always)]
    pub fn len(&self) -> usize { self.0.len() }

    /// `true` iff there are no knots at all
    #[inline(always)]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// The parametric domain `[knots[degree-1], knots[nb_knots-degree]]`.
    pub fn domain(&self, degree: usize) -> Interval {
        Interval::new(self.0[degree - 1], self.0[self.0.len() - degree])
    }

    /// `nb_spans = nb_knots - 2*(degree-1) - 1`
    /// # Examples
    /// ```
    /// use nurbs_geometry::KnotVector;
    /// let knots = KnotVector::new(vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0]);
    /// assert_eq!(knots.nb_spans(3), 8 - 2 * (3 - 1) - 1);
    /// ```
    pub fn nb_spans(&self, degree: usize) -> usize { self.0.len() - 2 * (degree - 1) - 1 }

    /// `nb_knots = degree + nb_poles - 1`
    pub fn nb_poles(&self, degree: usize) -> usize { self.0.len() + 1 - degree }

    fn span_bounds(&self, degree: usize) -> (usize, usize) {
        (degree - 1, self.0.len() - degree - 1)
    }

    /// The largest index `i` with `knots[i] <= t`, clamped into
    /// `[degree-1, nb_knots-degree-1]`.
    pub fn upper_span(&self, degree: usize, t: f64) -> usize {
        let (lo, hi) = self.span_bounds(degree);
        let i = self.0.iter().rposition(|&k| k <= t).unwrap_or(lo);
        i.clamp(lo, hi)
    }

    /// The smallest index `i` with `t <= knots[i]`, clamped into the same
    /// range as [`upper_span`](Self::upper_span).
    pub fn lower_span(&self, degree: usize, t: f64) -> usize {
        let (lo, hi) = self.span_bounds(degree);
        let i = self.0.iter().position(|&k| t <= k).unwrap_or(hi);
        i.clamp(lo, hi)
    }

    /// How many knots equal `knots[i]`, within tolerance.
    pub fn multiplicity(&self, i: usize) -> usize {
        self.0.iter().filter(|u| u.near(&self.0[i])).count()
    }

    /// Greville abscissa of pole `index`: the arithmetic mean of `degree`
    /// consecutive interior knots starting at `index+1`.
    pub fn greville(&self, degree: usize, index: usize) -> f64 {
        let window = &self.0[index + 1..index + 1 + degree];
        window.iter().sum::<f64>() / degree as f64
    }
}

impl From<Vec<f64>> for KnotVector {
    fn from(knots: Vec<f64>) -> Self { KnotVector(knots) }
}

impl std::ops::Index<usize> for KnotVector {
    type Output = f64;
    fn index(&self, idx: usize) -> &f64 { &self.0[idx] }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nurbs_base::assert_near;

    fn sample() -> KnotVector {
        // degree 4, matches scenario S1 of the evaluation tests.
        KnotVector::new(vec![
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
        ])
    }

    #[test]
    fn domain_matches_endpoints() {
        let knots = sample();
        let domain = knots.domain(4);
        assert_eq!(domain.min(), 0.0);
        assert_eq!(domain.max(), 131.892570399495);
    }

    #[test]
    fn nb_spans_identity() {
        let knots = sample();
        assert_eq!(knots.nb_spans(4), knots.len() - 2 * (4 - 1) - 1);
        assert_eq!(knots.nb_spans(4), 4);
    }

    #[test]
    fn upper_span_clamps_at_right_endpoint() {
        let knots = sample();
        let (_, hi) = knots.span_bounds(4);
        assert_eq!(knots.upper_span(4, 131.892570399495), hi);
        assert_eq!(knots.upper_span(4, 1000.0), hi);
    }

    #[test]
    fn lower_span_clamps_at_left_endpoint() {
        let knots = sample();
        let (lo, _) = knots.span_bounds(4);
        assert_eq!(knots.lower_span(4, -10.0), lo);
        assert_eq!(knots.lower_span(4, 0.0), lo);
    }

    #[test]
    fn multiplicity_counts_repeats() {
        let knots = KnotVector::new(vec![0.0, 0.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0]);
        assert_eq!(knots.multiplicity(5), 3);
    }

    #[test]
    fn greville_is_mean_of_interior_window() {
        let knots = KnotVector::new(vec![0.0, 0.0, 0.0, 1.0, 2.0, 2.0, 2.0]);
        assert_near!(knots.greville(2, 1), (0.0 + 1.0) / 2.0);
    }
}
