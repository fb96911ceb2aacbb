//! NURBS surface geometry: bivariate evaluation and surface normals.

use crate::errors::{Error, Result};
use crate::knot_vector::KnotVector;
use crate::shape_functions::ShapeFunctions;
use nurbs_base::cgmath64::*;
use nurbs_base::Interval;
use serde::{Deserialize, Serialize};

/// A NURBS surface of dimension `V`: two degrees, two knot vectors, and a
/// `Pu x Pv` grid of poles stored row-major with `u` major
/// (`poles[u * nb_poles_v + v]`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NurbsSurfaceGeometry<V> {
    degree_u: usize,
    degree_v: usize,
    knots_u: KnotVector,
    knots_v: KnotVector,
    nb_poles_v: usize,
    poles: Vec<V>,
    weights: Vec<f64>,
}

impl<V: VectorSpace<Scalar = f64>> NurbsSurfaceGeometry<V> {
    /// Builds a surface from two degrees, two knot vectors, and a
    /// row-major (`u`-major) pole grid of size `nb_poles_u * nb_poles_v`.
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        degree_u: usize,
        degree_v: usize,
        knots_u: KnotVector,
        knots_v: KnotVector,
        nb_poles_v: usize,
        poles: Vec<V>,
        weights: Vec<f64>,
    ) -> Result<Self> {
        if degree_u < 1 || degree_v < 1 {
            return Err(Error::InvalidArgument(
                "surface degrees must be at least 1".to_string(),
            ));
        }
        if nb_poles_v == 0 || poles.len() % nb_poles_v != 0 {
            return Err(Error::InvalidArgument(
                "pole count is not a multiple of nb_poles_v".to_string(),
            ));
        }
        let nb_poles_u = poles.len() / nb_poles_v;
        if knots_u.len() != degree_u + nb_poles_u - 1 {
            return Err(Error::InvalidArgument(format!(
                "knots_u length {} does not match degree_u {} and {} u-poles",
                knots_u.len(),
                degree_u,
                nb_poles_u
            )));
        }
        if knots_v.len() != degree_v + nb_poles_v - 1 {
            return Err(Error::InvalidArgument(format!(
                "knots_v length {} does not match degree_v {} and {} v-poles",
                knots_v.len(),
                degree_v,
                nb_poles_v
            )));
        }
        if !weights.is_empty() && weights.len() != poles.len() {
            return Err(Error::InvalidArgument(format!(
                "{} weights given for {} poles",
                weights.len(),
                poles.len()
            )));
        }
        Ok(NurbsSurfaceGeometry {
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            nb_poles_v,
            poles,
            weights,
        })
    }

    /// degree along `u`
    #[inline(always)]
    pub fn degree_u(&self) -> usize { self.degree_u }
    /// degree along `v`
    #[inline(always)]
    pub fn degree_v(&self) -> usize { self.degree_v }
    /// number of poles along `v` (the row stride)
    #[inline(always)]
    pub fn nb_poles_v(&self) -> usize { self.nb_poles_v }
    /// number of poles along `u`
    #[inline(always)]
    pub fn nb_poles_u(&self) -> usize { self.poles.len() / self.nb_poles_v }
    /// the poles, row-major with `u` major: `poles()[u * nb_poles_v() + v]`
    #[inline(always)]
    pub fn poles(&self) -> &[V] { &self.poles }
    /// mutable access to the poles
    #[inline(always)]
    pub fn poles_mut(&mut self) -> &mut [V] { &mut self.poles }
    /// the weights, empty if non-rational
    #[inline(always)]
    pub fn weights(&self) -> &[f64] { &self.weights }
    /// knot vector along `u`
    #[inline(always)]
    pub fn knots_u(&self) -> &KnotVector { &self.knots_u }
    /// knot vector along `v`
    #[inline(always)]
    pub fn knots_v(&self) -> &KnotVector { &self.knots_v }

    /// `true` iff weights are present and not all equal
    pub fn is_rational(&self) -> bool {
        match self.weights.split_first() {
            Some((first, rest)) => rest.iter().any(|w| (w - first).abs() > f64::EPSILON),
            None => false,
        }
    }

    /// the knot-implied parameter domain along `(u, v)`
    pub fn domain(&self) -> (Interval, Interval) {
        (
            self.knots_u.domain(self.degree_u),
            self.knots_v.domain(self.degree_v),
        )
    }

    fn weights_or_none(&self) -> Option<&[f64]> {
        (!self.weights.is_empty()).then_some(self.weights.as_slice())
    }

    /// Position at `(u, v)`, clamped into [`domain`](Self::domain).
    pub fn point_at(&self, u: f64, v: f64) -> V { self.derivatives_at(u, v, 0)[0] }

    /// Derivatives up to `order`, laid out in lex order over `(du, dv)`
    /// with `du+dv <= order`, ascending by total degree then by `du`.
    /// Length `(order+1)(order+2)/2`.
    pub fn derivatives_at(&self, u: f64, v: f64, order: usize) -> Vec<V> {
        let sf = ShapeFunctions::surface(
            self.degree_u,
            &self.knots_u,
            self.degree_v,
            &self.knots_v,
            self.nb_poles_v,
            self.weights_or_none(),
            u,
            v,
            order,
        )
        .expect("degrees were validated at construction");
        sf.values
            .iter()
            .map(|row| {
                sf.nonzero_indices
                    .iter()
                    .zip(row.iter())
                    .fold(V::zero(), |acc, (&i, &n)| acc + self.poles[i] * n)
            })
            .collect()
    }
}

impl NurbsSurfaceGeometry<Vector3> {
    /// Unit normal at `(u, v)`: the normalized cross product of the first
    /// `u`- and `v`-partials. Returns the zero vector at a degenerate
    /// parameterization (partials parallel or one of them zero).
    pub fn normal_at(&self, u: f64, v: f64) -> Vector3 {
        let ders = self.derivatives_at(u, v, 1);
        // lex order for order=1: [(0,0), (0,1), (1,0)] -- s=0: (0,0); s=1: du=0 then du=1
        let du = ders[2];
        let dv = ders[1];
        let n = du.cross(dv);
        match n.magnitude2() > nurbs_base::TOLERANCE2 {
            true => n.normalize(),
            false => Vector3::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nurbs_base::assert_near;

    fn flat_plane() -> NurbsSurfaceGeometry<Vector3> {
        // degree (1,1) bilinear patch spanning the unit square at z=0.
        let knots_u = KnotVector::new(vec![0.0, 0.0, 1.0, 1.0]);
        let knots_v = KnotVector::new(vec![0.0, 0.0, 1.0, 1.0]);
        let poles = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
        ];
        NurbsSurfaceGeometry::try_new(1, 1, knots_u, knots_v, 2, poles, vec![]).unwrap()
    }

    #[test]
    fn bilinear_interpolates_corners() {
        let surface = flat_plane();
        assert_near!(surface.point_at(0.0, 0.0), Vector3::new(0.0, 0.0, 0.0));
        assert_near!(surface.point_at(1.0, 1.0), Vector3::new(1.0, 1.0, 0.0));
        assert_near!(surface.point_at(0.5, 0.5), Vector3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn normal_of_flat_plane_is_up() {
        let surface = flat_plane();
        let n = surface.normal_at(0.5, 0.5);
        assert_near!(n, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn zeroth_derivative_equals_point_at() {
        let surface = flat_plane();
        let ders = surface.derivatives_at(0.3, 0.7, 2);
        assert_near!(ders[0], surface.point_at(0.3, 0.7));
    }

    /// Degree (2,1) non-rational surface with 12 poles, evaluated at a
    /// non-trivial interior parameter.
    fn reference_surface() -> NurbsSurfaceGeometry<Vector3> {
        let knots_u = KnotVector::new(vec![0.0, 0.0, 7.5, 15.0, 15.0]);
        let knots_v = KnotVector::new(vec![0.0, 10.0, 20.0]);
        let poles = vec![
            Vector3::new(-10.0, -5.0, -1.0),
            Vector3::new(-12.0, 3.0, 3.0),
            Vector3::new(-9.0, 11.0, -0.0701928417),
            Vector3::new(-5.0, -3.0, 1.0),
            Vector3::new(-6.0, 4.0, -2.0),
            Vector3::new(-5.0, 7.0, 0.9298071583),
            Vector3::new(0.0, -4.0, -1.0),
            Vector3::new(1.0, 6.0, 5.0),
            Vector3::new(0.0, 13.0, -0.2350184214),
            Vector3::new(4.0, -2.0, 0.0),
            Vector3::new(5.0, 4.0, -1.0),
            Vector3::new(5.0, 11.0, 0.7649815786),
        ];
        NurbsSurfaceGeometry::try_new(2, 1, knots_u, knots_v, 3, poles, vec![]).unwrap()
    }

    #[test]
    fn point_and_normal_match_reference_surface() {
        let surface = reference_surface();
        assert_near!(surface.point_at(12.0, 5.0), Vector3::new(1.46, 0.96, 0.9));
        assert_near!(
            surface.normal_at(12.0, 5.0),
            Vector3::new(0.2613127124, -0.3275832699, 0.9079674375)
        );
    }
}
