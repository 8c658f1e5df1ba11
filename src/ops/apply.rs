// Operation kernels: apply
//
// Structure-preserving unary map: T has exactly the input's stored
// positions, with op applied to each value. Domain change is permitted.

use log::trace;

use crate::core::binary_op::Accumulate;
use crate::core::error::{GraphBlasError, Result};
use crate::core::matrix::LilMatrix;
use crate::core::unary_op::UnaryOp;
use crate::core::vector::SparseVector;
use crate::core::views::{MatrixMask, MatrixOperand, VectorMask};
use crate::ops::helpers::{
    ewise_or_opt_accum, ewise_or_opt_accum_matrix, write_with_opt_mask_matrix,
    write_with_opt_mask_vector,
};
use crate::ops::transpose::transposed_copy;
use crate::types::{IndexType, OutputControl, ScalarType};

/// w<mask> = accum(w, op(u))
pub fn apply_vector<U, W, K, A, Op>(
    w: &mut SparseVector<W>,
    mask: &K,
    accum: &A,
    op: &Op,
    u: &SparseVector<U>,
    outp: OutputControl,
) -> Result<()>
where
    U: ScalarType,
    W: ScalarType,
    K: VectorMask,
    A: Accumulate<W>,
    Op: UnaryOp<U, Output = W>,
{
    if w.size() != u.size() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "apply: output size {}, input size {}",
            w.size(),
            u.size()
        )));
    }
    if let Some(size) = mask.mask_size() {
        if size != w.size() {
            return Err(GraphBlasError::DimensionMismatch(format!(
                "apply: mask size {}, output size {}",
                size,
                w.size()
            )));
        }
    }

    let t: Vec<(IndexType, W)> = u
        .contents()
        .iter()
        .map(|&(i, v)| (i, op.apply(v)))
        .collect();

    let mut z = Vec::new();
    ewise_or_opt_accum(&mut z, w.contents(), &t, accum);
    write_with_opt_mask_vector(w, z, mask, outp);
    Ok(())
}

/// C<mask> = accum(C, op(A))
pub fn apply_matrix<U, W, K, A, Op, AM>(
    c: &mut LilMatrix<W>,
    mask: &K,
    accum: &A,
    op: &Op,
    a: AM,
    outp: OutputControl,
) -> Result<()>
where
    U: ScalarType,
    W: ScalarType,
    K: MatrixMask,
    A: Accumulate<W>,
    Op: UnaryOp<U, Output = W>,
    AM: MatrixOperand<U>,
{
    if c.nrows() != a.nrows() || c.ncols() != a.ncols() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "apply: output is {}x{}, input is {}x{}",
            c.nrows(),
            c.ncols(),
            a.nrows(),
            a.ncols()
        )));
    }
    if let Some((mr, mc)) = mask.mask_dims() {
        if (mr, mc) != (c.nrows(), c.ncols()) {
            return Err(GraphBlasError::DimensionMismatch(format!(
                "apply: mask is {}x{}, output is {}x{}",
                mr,
                mc,
                c.nrows(),
                c.ncols()
            )));
        }
    }

    let mut t = LilMatrix::new(c.nrows(), c.ncols());
    let map_row = |row: &[(IndexType, U)]| -> Vec<(IndexType, W)> {
        row.iter().map(|&(j, v)| (j, op.apply(v))).collect()
    };
    if a.transposed() {
        let at = transposed_copy(a.base());
        for i in 0..t.nrows() {
            t.set_row(i, map_row(at.row(i)));
        }
    } else {
        for i in 0..t.nrows() {
            t.set_row(i, map_row(a.base().row(i)));
        }
    }

    let mut z = LilMatrix::new(c.nrows(), c.ncols());
    ewise_or_opt_accum_matrix(&mut z, c, &t, accum);
    write_with_opt_mask_matrix(c, z, mask, outp);
    trace!("apply: wrote {} values", c.nvals());
    Ok(())
}
