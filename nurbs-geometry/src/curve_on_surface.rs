//! Composition of a 2D NURBS curve with a surface: `t -> S(C(t))`.

use crate::curve::NurbsCurveGeometry;
use crate::surface::NurbsSurfaceGeometry;
use nurbs_base::cgmath64::*;
use nurbs_base::Interval;

/// A curve living in a surface's parameter space, composed with that
/// surface. Holds non-owning references: neither the curve nor the
/// surface may outlive this view.
#[derive(Clone, Copy, Debug)]
pub struct CurveOnSurface<'a, V> {
    curve: &'a NurbsCurveGeometry<Vector2>,
    surface: &'a NurbsSurfaceGeometry<V>,
}

impl<'a, V: VectorSpace<Scalar = f64>> CurveOnSurface<'a, V> {
    /// Wraps a 2D curve `C` giving `(u, v)` surface coordinates, and the
    /// surface `S` itself.
    pub fn new(curve: &'a NurbsCurveGeometry<Vector2>, surface: &'a NurbsSurfaceGeometry<V>) -> Self {
        CurveOnSurface { curve, surface }
    }

    /// the underlying 2D parameter-space curve
    #[inline(always)]
    pub fn curve(&self) -> &NurbsCurveGeometry<Vector2> { self.curve }
    /// the underlying surface
    #[inline(always)]
    pub fn surface(&self) -> &NurbsSurfaceGeometry<V> { self.surface }

    /// the parameter domain, inherited from the 2D curve
    #[inline(always)]
    pub fn domain(&self) -> Interval { self.curve.domain() }

    /// `S(C(t))`
    pub fn point_at(&self, t: f64) -> V {
        let uv = self.curve.point_at(t);
        self.surface.point_at(uv.x, uv.y)
    }

    /// Derivatives of `t -> S(C(t))` up to `order` (0, 1, or 2), composed
    /// via Faa di Bruno from the curve's and surface's own derivatives.
    pub fn derivatives_at(&self, t: f64, order: usize) -> Vec<V> {
        assert!(order <= 2, "composed derivatives are only implemented up to order 2");
        let c = self.curve.derivatives_at(t, order);
        let uv = c[0];
        let s = self.surface.derivatives_at(uv.x, uv.y, order);
        // lex layout for order 2: s[0]=S, s[1]=Sv, s[2]=Su, s[3]=Svv, s[4]=Suv, s[5]=Suu
        let mut out = vec![s[0]];
        if order >= 1 {
            let (up, vp) = (c[1].x, c[1].y);
            out.push(s[2] * up + s[1] * vp);
        }
        if order >= 2 {
            let (up, vp) = (c[1].x, c[1].y);
            let (upp, vpp) = (c[2].x, c[2].y);
            out.push(s[5] * (up * up) + s[4] * (2.0 * up * vp) + s[3] * (vp * vp) + s[2] * upp + s[1] * vpp);
        }
        out
    }

    /// Interior knots of the parameter-space curve's knot vector strictly
    /// inside its domain, deduplicated: the forced sample points for
    /// tessellation.
    pub fn breakpoints(&self) -> Vec<f64> {
        let domain = self.domain();
        let knots = self.curve.knots().as_slice();
        let mut out: Vec<f64> = knots
            .iter()
            .copied()
            .filter(|&t| t > domain.min() && t < domain.max())
            .collect();
        out.dedup_by(|a, b| (*a - *b).abs() < nurbs_base::TOLERANCE);
        out
    }
}
