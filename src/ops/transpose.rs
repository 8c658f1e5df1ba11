// Operation kernels: materializing transpose

use log::trace;

use crate::core::binary_op::Accumulate;
use crate::core::error::{GraphBlasError, Result};
use crate::core::matrix::LilMatrix;
use crate::core::views::{MatrixMask, MatrixOperand};
use crate::ops::helpers::{ewise_or_opt_accum_matrix, write_with_opt_mask_matrix};
use crate::types::{OutputControl, ScalarType};

/// Row-major copy of the transpose of `m`.
pub(crate) fn transposed_copy<T: ScalarType>(m: &LilMatrix<T>) -> LilMatrix<T> {
    let mut t = LilMatrix::new(m.ncols(), m.nrows());
    for i in 0..m.nrows() {
        for &(j, v) in m.row(i) {
            t.append_to_row(j, i, v);
        }
    }
    t
}

/// C<mask> = accum(C, A') through the standard pipeline.
pub fn transpose_matrix<T, K, A, AM>(
    c: &mut LilMatrix<T>,
    mask: &K,
    accum: &A,
    a: AM,
    outp: OutputControl,
) -> Result<()>
where
    T: ScalarType,
    K: MatrixMask,
    A: Accumulate<T>,
    AM: MatrixOperand<T>,
{
    if c.nrows() != a.ncols() || c.ncols() != a.nrows() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "transpose: output is {}x{}, input transposes to {}x{}",
            c.nrows(),
            c.ncols(),
            a.ncols(),
            a.nrows()
        )));
    }
    if let Some((mr, mc)) = mask.mask_dims() {
        if (mr, mc) != (c.nrows(), c.ncols()) {
            return Err(GraphBlasError::DimensionMismatch(format!(
                "transpose: mask is {}x{}, output is {}x{}",
                mr,
                mc,
                c.nrows(),
                c.ncols()
            )));
        }
    }

    // a transposed view transposed back is the base itself
    let t = if a.transposed() {
        a.base().clone()
    } else {
        transposed_copy(a.base())
    };

    let mut z = LilMatrix::new(c.nrows(), c.ncols());
    ewise_or_opt_accum_matrix(&mut z, c, &t, accum);
    write_with_opt_mask_matrix(c, z, mask, outp);
    trace!("transpose: wrote {} values", c.nvals());
    Ok(())
}
