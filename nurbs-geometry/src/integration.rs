//! Gauss-Legendre quadrature: point/weight generation and curve/surface
//! integration helpers built on it.

use crate::curve::NurbsCurveGeometry;
use crate::errors::{Error, Result};
use crate::surface::NurbsSurfaceGeometry;
use nurbs_base::cgmath64::*;
use nurbs_base::Interval;

/// `(parameter, weight)` pairs of an `n`-point Gauss-Legendre rule on
/// `[-1, 1]`, found by Newton's method on the Legendre polynomial
/// recurrence (Golub-Welsch-free, since no eigensolver is on hand here).
fn reference_rule(n: usize) -> Vec<(f64, f64)> {
    assert!(n >= 1);
    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        // Chebyshev-node initial guess, refined by Newton iteration.
        let mut x = (std::f64::consts::PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        for _ in 0..100 {
            let (p, dp) = legendre_and_derivative(n, x);
            let dx = p / dp;
            x -= dx;
            if dx.abs() < 1e-15 {
                break;
            }
        }
        let (_, dp) = legendre_and_derivative(n, x);
        let w = 2.0 / ((1.0 - x * x) * dp * dp);
        points.push((x, w));
    }
    points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    points
}

/// `P_n(x)` and `P_n'(x)` via the standard three-term recurrence.
fn legendre_and_derivative(n: usize, x: f64) -> (f64, f64) {
    let (mut p0, mut p1) = (1.0, x);
    for k in 2..=n {
        let k = k as f64;
        let p2 = ((2.0 * k - 1.0) * x * p1 - (k - 1.0) * p0) / k;
        p0 = p1;
        p1 = p2;
    }
    let n = n as f64;
    let dp = n * (x * p1 - p0) / (x * x - 1.0);
    (p1, dp)
}

/// Number of quadrature points needed to exactly integrate a polynomial of
/// the given `degree`.
fn points_for_degree(degree: usize) -> usize { degree / 2 + 1 }

/// `(parameter, weight)` pairs exact for polynomials up to `degree`,
/// mapped from `[-1, 1]` onto `domain`.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if `degree == 0`, since no quadrature
/// rule is exact for a non-constant integrand below that degree.
///
/// # Examples
/// ```
/// use nurbs_geometry::{integration_points, Interval};
/// let pts = integration_points(2, Interval::new(0.0, 1.0)).unwrap();
/// assert_eq!(pts.len(), 2);
/// ```
pub fn integration_points(degree: usize, domain: Interval) -> Result<Vec<(f64, f64)>> {
    if degree == 0 {
        return Err(Error::InvalidArgument(
            "integration degree must be at least 1".to_string(),
        ));
    }
    let n = points_for_degree(degree);
    let half_length = domain.length() / 2.0;
    let mid = (domain.min() + domain.max()) / 2.0;
    Ok(reference_rule(n)
        .into_iter()
        .map(|(xi, wi)| (mid + half_length * xi, wi * half_length))
        .collect())
}

/// Tensor-product quadrature over a rectangle, exact for polynomials up to
/// `degree_u`/`degree_v` along each axis.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if either degree is `0`.
pub fn integration_points_2d(
    degree_u: usize,
    domain_u: Interval,
    degree_v: usize,
    domain_v: Interval,
) -> Result<Vec<(f64, f64, f64)>> {
    let pu = integration_points(degree_u, domain_u)?;
    let pv = integration_points(degree_v, domain_v)?;
    Ok(pu
        .iter()
        .flat_map(|&(u, wu)| pv.iter().map(move |&(v, wv)| (u, v, wu * wv)))
        .collect())
}

/// Integrates `f` along `curve` using per-span Gauss-Legendre quadrature
/// of degree `curve.degree() + 1`, weighting each sample by the arc-length
/// Jacobian `|C'(t)|`.
pub fn integrate_over_curve<V, F>(curve: &NurbsCurveGeometry<V>, mut f: F) -> Result<f64>
where
    V: VectorSpace<Scalar = f64> + InnerSpace<Scalar = f64>,
    F: FnMut(f64, V) -> f64,
{
    let domain = curve.domain();
    let mut breakpoints: Vec<f64> = curve
        .knots()
        .as_slice()
        .iter()
        .copied()
        .filter(|&t| t > domain.min() + nurbs_base::TOLERANCE && t < domain.max() - nurbs_base::TOLERANCE)
        .collect();
    breakpoints.sort_by(|a, b| a.partial_cmp(b).unwrap());
    breakpoints.dedup_by(|a, b| (*a - *b).abs() < nurbs_base::TOLERANCE);
    breakpoints.insert(0, domain.min());
    breakpoints.push(domain.max());
    if breakpoints.len() < 2 {
        return Err(Error::EmptyResult(domain.min()));
    }

    let degree = curve.degree() + 1;
    let mut total = 0.0;
    for w in breakpoints.windows(2) {
        let span = Interval::new(w[0], w[1]);
        for (t, weight) in integration_points(degree, span)? {
            let ders = curve.derivatives_at(t, 1);
            let jacobian = ders[1].magnitude();
            total += f(t, ders[0]) * jacobian * weight;
        }
    }
    Ok(total)
}

/// Integrates `f` over `surface`'s whole domain using per-cell tensor
/// Gauss-Legendre quadrature, weighting by the area-element Jacobian
/// `|Su x Sv|`.
pub fn integrate_over_surface<F>(surface: &NurbsSurfaceGeometry<Vector3>, mut f: F) -> Result<f64>
where
    F: FnMut(f64, f64, Vector3) -> f64,
{
    let (domain_u, domain_v) = surface.domain();
    let cells_u = breakpoints_of(surface.knots_u().as_slice(), domain_u);
    let cells_v = breakpoints_of(surface.knots_v().as_slice(), domain_v);
    if cells_u.len() < 2 || cells_v.len() < 2 {
        return Err(Error::EmptyResult(domain_u.min()));
    }

    let degree_u = surface.degree_u() + 1;
    let degree_v = surface.degree_v() + 1;
    let mut total = 0.0;
    for wu in cells_u.windows(2) {
        for wv in cells_v.windows(2) {
            let cell_u = Interval::new(wu[0], wu[1]);
            let cell_v = Interval::new(wv[0], wv[1]);
            for (u, v, weight) in integration_points_2d(degree_u, cell_u, degree_v, cell_v)? {
                let ders = surface.derivatives_at(u, v, 1);
                let jacobian = ders[2].cross(ders[1]).magnitude();
                total += f(u, v, ders[0]) * jacobian * weight;
            }
        }
    }
    Ok(total)
}

fn breakpoints_of(knots: &[f64], domain: Interval) -> Vec<f64> {
    let mut pts: Vec<f64> = knots
        .iter()
        .copied()
        .filter(|&t| t > domain.min() + nurbs_base::TOLERANCE && t < domain.max() - nurbs_base::TOLERANCE)
        .collect();
    pts.sort_by(|a, b| a.partial_cmp(b).unwrap());
    pts.dedup_by(|a, b| (*a - *b).abs() < nurbs_base::TOLERANCE);
    pts.insert(0, domain.min());
    pts.push(domain.max());
    pts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knot_vector::KnotVector;
    use nurbs_base::assert_near;

    #[test]
    fn two_point_rule_on_unit_interval() {
        let pts = integration_points(2, Interval::new(0.0, 1.0)).unwrap();
        assert_eq!(pts.len(), 2);
        assert_near!(pts[0].0, 0.21132486540518713);
        assert_near!(pts[0].1, 0.5);
        assert_near!(pts[1].0, 0.7886751345948129);
        assert_near!(pts[1].1, 0.5);
    }

    #[test]
    fn weights_sum_to_interval_length() {
        let domain = Interval::new(-2.0, 5.0);
        let total: f64 = integration_points(5, domain).unwrap().iter().map(|(_, w)| w).sum();
        assert_near!(total, domain.length());
    }

    #[test]
    fn exactly_integrates_low_degree_polynomial() {
        // integral of x^3 over [0, 2] is 4.
        let pts = integration_points(3, Interval::new(0.0, 2.0)).unwrap();
        let total: f64 = pts.iter().map(|&(t, w)| t.powi(3) * w).sum();
        assert_near!(total, 4.0);
    }

    #[test]
    fn zero_degree_is_rejected() {
        assert!(integration_points(0, Interval::new(0.0, 1.0)).is_err());
        assert!(integration_points_2d(0, Interval::new(0.0, 1.0), 2, Interval::new(0.0, 1.0)).is_err());
    }

    #[test]
    fn straight_line_length_matches_integral() {
        let knots = KnotVector::new(vec![0.0, 0.0, 1.0, 1.0]);
        let poles = vec![Vector2::new(0.0, 0.0), Vector2::new(3.0, 4.0)];
        let curve = crate::curve::NurbsCurveGeometry::try_new(1, knots, poles, vec![]).unwrap();
        let length = integrate_over_curve(&curve, |_, _| 1.0).unwrap();
        assert_near!(length, 5.0);
    }

    #[test]
    fn flat_plane_area_matches_integral() {
        let knots_u = KnotVector::new(vec![0.0, 0.0, 1.0, 1.0]);
        let knots_v = KnotVector::new(vec![0.0, 0.0, 1.0, 1.0]);
        let poles = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(3.0, 0.0, 0.0),
            Vector3::new(3.0, 2.0, 0.0),
        ];
        let surface = NurbsSurfaceGeometry::try_new(1, 1, knots_u, knots_v, 2, poles, vec![]).unwrap();
        let area = integrate_over_surface(&surface, |_, _, _| 1.0).unwrap();
        assert_near!(area, 6.0);
    }
}
