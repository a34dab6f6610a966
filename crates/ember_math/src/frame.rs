//! Local shading frames and reflection helpers.

use crate::Vec3;

/// Orthonormal basis (u, v, w) built around a given w axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthonormalBasis {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl OrthonormalBasis {
    /// Build a frame whose w axis is `w`.
    ///
    /// The helper axis is +Y when |w.x| > 0.1 and +X otherwise. The switch is
    /// discontinuous but keeps renders comparable with earlier output, so it
    /// must not be replaced with a branchless construction.
    ///
    /// `w` does not need to be unit length; `u` and `v` always are when `w`
    /// is unit length. `w` must be non-zero.
    pub fn from_w(w: Vec3) -> Self {
        let a = if w.x.abs() > 0.1 { Vec3::Y } else { Vec3::X };
        let u = a.cross(w).normalize();
        let v = w.cross(u);
        Self { u, v, w }
    }

    /// Transform local coordinates into world space.
    #[inline]
    pub fn local(&self, a: f64, b: f64, c: f64) -> Vec3 {
        self.u * a + self.v * b + self.w * c
    }
}

/// Mirror `d` about the surface normal `n`: d - n * 2 (n.d).
#[inline]
pub fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - n * 2.0 * n.dot(d)
}

/// Largest of the three channels.
#[inline]
pub fn max_component(c: Vec3) -> f64 {
    c.max_element()
}
