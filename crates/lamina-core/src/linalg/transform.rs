//! Axis-angle rotation of homogeneous 4×4 matrices.

use log::trace;

use crate::angle::Angle;
use crate::dtype::Element;
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::provider;
use crate::vector::Vector;

/// Left-compose the 3×3 Rodrigues rotation for `angle` about `axis` onto
/// the top three rows of `m`. The last row of the result is `(0, 0, 0, 1)`.
///
/// The axis is used as given; pass a unit vector for a pure rotation. An
/// angle of exactly zero returns a copy of `m`.
///
/// Returns [`MatrixError::Domain`] unless `m` is 4×4 and `axis` has three
/// components, and [`MatrixError::Configuration`] when `T` has no trig
/// binding.
///
/// ```
/// # use lamina_core::{Angle, Matrix, Vector, linalg};
/// let m = Matrix::<f64>::identity(4, 4).unwrap();
/// let quarter = Angle::from_radians(std::f64::consts::FRAC_PI_2);
/// let r = linalg::rotate4x4(&m, &quarter, &Vector::new3(0.0, 0.0, 1.0), None).unwrap();
/// assert!((r.get(1, 0).unwrap() - 1.0).abs() < 1e-12);
/// assert!((r.get(0, 1).unwrap() + 1.0).abs() < 1e-12);
/// ```
pub fn rotate4x4<T: Element>(
    m: &Matrix<T>,
    angle: &Angle<T>,
    axis: &Vector<T>,
    out: Option<Matrix<T>>,
) -> Result<Matrix<T>> {
    if m.shape() != (4, 4) {
        return Err(MatrixError::Domain {
            operation: "rotate4x4",
            reason: "matrix must be 4x4",
        });
    }
    if axis.dimensions() != 3 {
        return Err(MatrixError::Domain {
            operation: "rotate4x4",
            reason: "axis must have three components",
        });
    }
    let ops = provider::resolve::<T>()?;
    if ops.is_zero(angle.radians()) {
        trace!("rotate4x4: zero angle, copying input");
        return Ok(m.copy_into(out));
    }

    let c = ops.cosine(angle.radians())?;
    let s = ops.sine(angle.radians())?;
    let t = (ops.sub)(ops.one, c);
    let [x, y, z] = [axis[0], axis[1], axis[2]];

    let mul = ops.mul;
    let txx = mul(mul(t, x), x);
    let tyy = mul(mul(t, y), y);
    let tzz = mul(mul(t, z), z);
    let txy = mul(mul(t, x), y);
    let txz = mul(mul(t, x), z);
    let tyz = mul(mul(t, y), z);
    let (sx, sy, sz) = (mul(s, x), mul(s, y), mul(s, z));

    let rotation = [
        [(ops.add)(txx, c), (ops.sub)(txy, sz), (ops.add)(txz, sy)],
        [(ops.add)(txy, sz), (ops.add)(tyy, c), (ops.sub)(tyz, sx)],
        [(ops.sub)(txz, sy), (ops.add)(tyz, sx), (ops.add)(tzz, c)],
    ];

    let mut r = Matrix::prepare_output(out, 4, 4, ops.zero);
    for (i, basis) in rotation.iter().enumerate() {
        for j in 0..4 {
            r.data[i * 4 + j] = basis
                .iter()
                .enumerate()
                .fold(ops.zero, |acc, (k, &coeff)| {
                    (ops.mul_add)(coeff, m.data[k * 4 + j], acc)
                });
        }
    }
    r.data[12..].copy_from_slice(&[ops.zero, ops.zero, ops.zero, ops.one]);
    Ok(r)
}

impl<T: Element> Matrix<T> {
    /// [`rotate4x4`] into a fresh matrix.
    pub fn rotate4x4(&self, angle: &Angle<T>, axis: &Vector<T>) -> Result<Matrix<T>> {
        rotate4x4(self, angle, axis, None)
    }
}
