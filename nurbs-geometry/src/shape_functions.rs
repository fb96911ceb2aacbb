//! B-spline/NURBS shape-function evaluation: nonzero basis values and their
//! derivatives, with rational (weighted) quotient-rule propagation.

use crate::errors::{Error, Result};
use crate::knot_vector::KnotVector;

/// The nonzero basis functions (and derivatives, if requested) at a
/// parameter value.
///
/// `values[k][j]` is the `k`-th derivative of the basis function attached
/// to pole `nonzero_indices[j]`. When weights are supplied this is already
/// the rational (NURBS) basis function, not the plain B-spline one.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeFunctions {
    /// poles whose basis function is nonzero at this parameter
    pub nonzero_indices: Vec<usize>,
    /// `values[k][j]`, `k` in `0..=order`, `j` in `0..nonzero_indices.len()`
    pub values: Vec<Vec<f64>>,
}

fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut result = 1.0;
    for i in 0..k {
        result = result * (n - i) as f64 / (i + 1) as f64;
    }
    result
}

/// Non-decreasing knots padded with one extra copy of each endpoint, turning
/// the degree+nb_poles-1 length convention used by [`KnotVector`] into the
/// textbook degree+nb_poles+1 clamped convention the de Boor recurrence
/// below is written against.
fn padded_knots(knots: &KnotVector) -> Vec<f64> {
    let raw = knots.as_slice();
    let mut padded = Vec::with_capacity(raw.len() + 2);
    padded.push(raw[0]);
    padded.extend_from_slice(raw);
    padded.push(raw[raw.len() - 1]);
    padded
}

/// Derivatives of the nonzero B-spline basis functions (Piegl & Tiller,
/// "The NURBS Book", Algorithm A2.3), evaluated at `t` against `knots`.
///
/// Returns `(nonzero_pole_indices, ders)` where `ders[k][j]` is the `k`-th
/// derivative of the basis function for pole `nonzero_pole_indices[j]`.
fn ders_basis_funs(
    degree: usize,
    knots: &KnotVector,
    t: f64,
    order: usize,
) -> (Vec<usize>, Vec<Vec<f64>>) {
    let padded = padded_knots(knots);
    let span = knots.upper_span(degree, t);
    let i = span + 1; // book-convention span index into `padded`
    let p = degree;
    let n = order.min(p);

    let mut ndu = vec![vec![0.0_f64; p + 1]; p + 1];
    ndu[0][0] = 1.0;
    let mut left = vec![0.0_f64; p + 1];
    let mut right = vec![0.0_f64; p + 1];
    for j in 1..=p {
        left[j] = t - padded[i + 1 - j];
        right[j] = padded[i + j] - t;
        let mut saved = 0.0;
        for r in 0..j {
            ndu[j][r] = right[r + 1] + left[j - r];
            let temp = match ndu[j][r] == 0.0 {
                true => 0.0,
                false => ndu[r][j - 1] / ndu[j][r],
            };
            ndu[r][j] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        ndu[j][j] = saved;
    }

    let mut ders = vec![vec![0.0_f64; p + 1]; n + 1];
    for j in 0..=p {
        ders[0][j] = ndu[j][p];
    }

    for r in 0..=p {
        let mut a = vec![vec![0.0_f64; p + 1]; 2];
        let (mut s1, mut s2) = (0usize, 1usize);
        a[0][0] = 1.0;
        for k in 1..=n {
            let mut d = 0.0;
            let rk = r as isize - k as isize;
            let pk = p as isize - k as isize;
            if r >= k {
                let denom = ndu[(pk + 1) as usize][rk as usize];
                a[s2][0] = match denom == 0.0 {
                    true => 0.0,
                    false => a[s1][0] / denom,
                };
                d = a[s2][0] * ndu[rk as usize][pk as usize];
            }
            let j1 = if rk >= -1 { 1 } else { (-rk) as usize };
            let j2 = if r as isize - 1 <= pk { k - 1 } else { p - r };
            for j in j1..=j2 {
                let idx = (rk + j as isize) as usize;
                let denom = ndu[(pk + 1) as usize][idx];
                a[s2][j] = match denom == 0.0 {
                    true => 0.0,
                    false => (a[s1][j] - a[s1][j - 1]) / denom,
                };
                d += a[s2][j] * ndu[idx][pk as usize];
            }
            if r as isize <= pk {
                let denom = ndu[(pk + 1) as usize][r];
                a[s2][k] = match denom == 0.0 {
                    true => 0.0,
                    false => -a[s1][k - 1] / denom,
                };
                d += a[s2][k] * ndu[r][pk as usize];
            }
            ders[k][r] = d;
            std::mem::swap(&mut s1, &mut s2);
        }
    }

    let mut factor = p as f64;
    for k in 1..=n {
        for j in 0..=p {
            ders[k][j] *= factor;
        }
        factor *= (p - k) as f64;
    }
    while ders.len() <= order {
        ders.push(vec![0.0; p + 1]);
    }

    let base = i - p; // == span + 1 - degree
    let nonzero_indices = (0..=p).map(|j| base + j).collect();
    (nonzero_indices, ders)
}

/// Applies the rational (weighted) quotient-rule recursion to a table of
/// plain B-spline basis derivatives, turning them into NURBS basis
/// derivatives. `ders[k][j]` / `weights[j]` are aligned by `j`.
fn rationalize(ders: &[Vec<f64>], weights: &[f64], order: usize) -> Vec<Vec<f64>> {
    let deg1 = ders[0].len();
    let mut v = vec![vec![0.0; deg1]; order + 1];
    let mut w = vec![0.0; order + 1];
    for k in 0..=order {
        for j in 0..deg1 {
            v[k][j] = ders[k][j] * weights[j];
            w[k] += v[k][j];
        }
    }
    let mut r = vec![vec![0.0; deg1]; order + 1];
    for j in 0..deg1 {
        r[0][j] = v[0][j] / w[0];
    }
    for k in 1..=order {
        for j in 0..deg1 {
            let mut acc = v[k][j];
            for i in 1..=k {
                acc -= binomial(k, i) * w[i] * r[k - i][j];
            }
            r[k][j] = acc / w[0];
        }
    }
    r
}

fn is_rational(weights: Option<&[f64]>) -> Option<&[f64]> {
    weights.filter(|w| w.iter().any(|&wi| (wi - w[0]).abs() > f64::EPSILON))
}

impl ShapeFunctions {
    /// Nonzero B-spline/NURBS basis functions and derivatives for a curve
    /// direction. `weights`, if given, must have one entry per pole in
    /// `knots`'s implied pole count; only the entries for the nonzero
    /// poles are consulted.
    pub fn curve(
        degree: usize,
        knots: &KnotVector,
        weights: Option<&[f64]>,
        t: f64,
        order: usize,
    ) -> Result<Self> {
        if degree < 1 {
            return Err(Error::InvalidArgument(format!(
                "degree must be at least 1, got {degree}"
            )));
        }
        let domain = knots.domain(degree);
        let t = domain.clamp(t);
        let (nonzero_indices, ders) = ders_basis_funs(degree, knots, t, order);
        let values = match is_rational(weights) {
            Some(w) => {
                let local: Vec<f64> = nonzero_indices.iter().map(|&i| w[i]).collect();
                rationalize(&ders, &local, order)
            }
            None => ders,
        };
        Ok(ShapeFunctions {
            nonzero_indices,
            values,
        })
    }

    /// Tensor-product nonzero shape functions for a surface. `nb_poles_v`
    /// is needed to flatten `(u, v)` pole pairs into the surface's
    /// row-major pole indexing (`k = u*nb_poles_v + v`).
    #[allow(clippy::too_many_arguments)]
    pub fn surface(
        degree_u: usize,
        knots_u: &KnotVector,
        degree_v: usize,
        knots_v: &KnotVector,
        nb_poles_v: usize,
        weights: Option<&[f64]>,
        u: f64,
        v: f64,
        order: usize,
    ) -> Result<Self> {
        if degree_u < 1 || degree_v < 1 {
            return Err(Error::InvalidArgument(
                "surface degrees must be at least 1".to_string(),
            ));
        }
        let du = knots_u.domain(degree_u).clamp(u);
        let dv = knots_v.domain(degree_v).clamp(v);
        let (idx_u, ders_u) = ders_basis_funs(degree_u, knots_u, du, order);
        let (idx_v, ders_v) = ders_basis_funs(degree_v, knots_v, dv, order);

        let nu = idx_u.len();
        let nv = idx_v.len();
        let nonzero_indices: Vec<usize> = idx_u
            .iter()
            .flat_map(|&iu| idx_v.iter().map(move |&iv| iu * nb_poles_v + iv))
            .collect();

        // raw[(du,dv)][local_k] for du,dv each in 0..=order (rectangular, not
        // yet restricted to the triangular du+dv<=order output layout).
        let mut raw = vec![vec![vec![0.0; nu * nv]; order + 1]; order + 1];
        for a in 0..=order {
            for b in 0..=order {
                for iu in 0..nu {
                    for iv in 0..nv {
                        raw[a][b][iu * nv + iv] = ders_u[a][iu] * ders_v[b][iv];
                    }
                }
            }
        }

        let raw = match is_rational(weights) {
            Some(w) => {
                let local: Vec<f64> = nonzero_indices.iter().map(|&i| w[i]).collect();
                rationalize_surface(&raw, &local, order)
            }
            None => raw,
        };

        let mut values = Vec::with_capacity((order + 1) * (order + 2) / 2);
        for s in 0..=order {
            for du in 0..=s {
                let dv = s - du;
                values.push(raw[du][dv].clone());
            }
        }
        Ok(ShapeFunctions {
            nonzero_indices,
            values,
        })
    }
}

fn rationalize_surface(raw: &[Vec<Vec<f64>>], weights: &[f64], order: usize) -> Vec<Vec<Vec<f64>>> {
    let local_count = weights.len();
    let mut v = vec![vec![vec![0.0; local_count]; order + 1]; order + 1];
    let mut w = vec![vec![0.0; order + 1]; order + 1];
    for a in 0..=order {
        for b in 0..=order {
            for k in 0..local_count {
                v[a][b][k] = raw[a][b][k] * weights[k];
                w[a][b] += v[a][b][k];
            }
        }
    }
    let mut r = vec![vec![vec![0.0; local_count]; order + 1]; order + 1];
    for k in 0..local_count {
        r[0][0][k] = v[0][0][k] / w[0][0];
    }
    for s in 1..=(2 * order) {
        for a in 0..=order.min(s) {
            let b = match s.checked_sub(a) {
                Some(b) if b <= order => b,
                _ => continue,
            };
            if a == 0 && b == 0 {
                continue;
            }
            for k in 0..local_count {
                let mut acc = v[a][b][k];
                for i in 0..=a {
                    for j in 0..=b {
                        if i == 0 && j == 0 {
                            continue;
                        }
                        acc -= binomial(a, i) * binomial(b, j) * w[i][j] * r[a - i][b - j][k];
                    }
                }
                r[a][b][k] = acc / w[0][0];
            }
        }
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use nurbs_base::assert_near;

    #[test]
    fn rational_derivatives_match_reference_scenario() {
        // degree 2, knots [1,1,3,3], weights [1, 1.5, 1], t=2, order 2.
        let knots = KnotVector::new(vec![1.0, 1.0, 3.0, 3.0]);
        let weights = [1.0, 1.5, 1.0];
        let sf = ShapeFunctions::curve(2, &knots, Some(&weights), 2.0, 2).unwrap();
        assert_eq!(sf.nonzero_indices, vec![0, 1, 2]);
        let expected = [
            [0.20, 0.60, 0.20],
            [-0.40, 0.0, 0.40],
            [0.48, -0.96, 0.48],
        ];
        for (row, exp) in sf.values.iter().zip(expected.iter()) {
            for (got, want) in row.iter().zip(exp.iter()) {
                assert_near!(*got, *want);
            }
        }
    }

    #[test]
    fn partition_of_unity() {
        let knots = KnotVector::new(vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            let sf = ShapeFunctions::curve(3, &knots, None, t, 0).unwrap();
            let sum: f64 = sf.values[0].iter().sum();
            assert_near!(sum, 1.0);
        }
    }

    #[test]
    fn non_rational_matches_bernstein_basis() {
        let knots = KnotVector::new(vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        let t = 0.3;
        let sf = ShapeFunctions::curve(3, &knots, None, t, 0).unwrap();
        let expected = [
            (1.0 - t).powi(3),
            3.0 * t * (1.0 - t).powi(2),
            3.0 * t * t * (1.0 - t),
            t.powi(3),
        ];
        for (got, want) in sf.values[0].iter().zip(expected.iter()) {
            assert_near!(*got, *want);
        }
    }
}
