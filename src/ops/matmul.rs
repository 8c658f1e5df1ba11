// Operation kernels: matrix-vector, vector-matrix, and matrix-matrix multiply
//
// mxv and vxm compute their intermediate with either the dot formulation
// (walking rows of the base) or the axpy formulation (scattering scaled
// rows), depending on which side the transpose lands. mxm dispatches on the
// transposition of both operands to one of four kernel families.

use log::{debug, trace};

use crate::core::binary_op::Accumulate;
use crate::core::error::{GraphBlasError, Result};
use crate::core::matrix::LilMatrix;
use crate::core::semiring::Semiring;
use crate::core::vector::SparseVector;
use crate::core::views::{MatrixMask, MatrixOperand, VectorMask};
use crate::ops::helpers::{
    axpy, axpy_right, dot, ewise_or_opt_accum, write_with_opt_mask_vector,
};
use crate::ops::mxm_kernels;
use crate::types::{IndexType, OutputControl, ScalarType};

/// w<mask> = accum(w, A (semiring) u)
pub fn mxv<D1, D2, K, A, S, AM>(
    w: &mut SparseVector<S::Output>,
    mask: &K,
    accum: &A,
    semiring: &S,
    a: AM,
    u: &SparseVector<D2>,
    outp: OutputControl,
) -> Result<()>
where
    D1: ScalarType,
    D2: ScalarType,
    K: VectorMask,
    A: Accumulate<S::Output>,
    S: Semiring<D1, D2>,
    AM: MatrixOperand<D1>,
{
    if a.ncols() != u.size() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "mxv: matrix is {}x{}, vector size {}",
            a.nrows(),
            a.ncols(),
            u.size()
        )));
    }
    if w.size() != a.nrows() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "mxv: output size {}, matrix has {} rows",
            w.size(),
            a.nrows()
        )));
    }
    check_vector_mask("mxv", mask, w.size())?;

    let base = a.base();
    let mut t: Vec<(IndexType, S::Output)> = Vec::new();
    if base.nvals() > 0 && u.nvals() > 0 {
        if a.transposed() {
            // walk stored u entries and scatter scaled base rows
            for &(k, uk) in u.contents() {
                axpy_right(&mut t, semiring, base.row(k), uk);
            }
        } else {
            for i in 0..w.size() {
                if base.row(i).is_empty() {
                    continue;
                }
                if let Some(val) = dot(base.row(i), u.contents(), semiring) {
                    t.push((i, val));
                }
            }
        }
    }

    let mut z = Vec::new();
    ewise_or_opt_accum(&mut z, w.contents(), &t, accum);
    write_with_opt_mask_vector(w, z, mask, outp);
    trace!("mxv: wrote {} values", w.nvals());
    Ok(())
}

/// w<mask> = accum(w, u (semiring) A)
pub fn vxm<D1, D2, K, A, S, BM>(
    w: &mut SparseVector<S::Output>,
    mask: &K,
    accum: &A,
    semiring: &S,
    u: &SparseVector<D1>,
    a: BM,
    outp: OutputControl,
) -> Result<()>
where
    D1: ScalarType,
    D2: ScalarType,
    K: VectorMask,
    A: Accumulate<S::Output>,
    S: Semiring<D1, D2>,
    BM: MatrixOperand<D2>,
{
    if u.size() != a.nrows() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "vxm: vector size {}, matrix is {}x{}",
            u.size(),
            a.nrows(),
            a.ncols()
        )));
    }
    if w.size() != a.ncols() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "vxm: output size {}, matrix has {} columns",
            w.size(),
            a.ncols()
        )));
    }
    check_vector_mask("vxm", mask, w.size())?;

    let base = a.base();
    let mut t: Vec<(IndexType, S::Output)> = Vec::new();
    if base.nvals() > 0 && u.nvals() > 0 {
        if a.transposed() {
            // w[j] = dot(u, base row j)
            for j in 0..w.size() {
                if base.row(j).is_empty() {
                    continue;
                }
                if let Some(val) = dot(u.contents(), base.row(j), semiring) {
                    t.push((j, val));
                }
            }
        } else {
            for &(k, uk) in u.contents() {
                axpy(&mut t, semiring, uk, base.row(k));
            }
        }
    }

    let mut z = Vec::new();
    ewise_or_opt_accum(&mut z, w.contents(), &t, accum);
    write_with_opt_mask_vector(w, z, mask, outp);
    trace!("vxm: wrote {} values", w.nvals());
    Ok(())
}

/// C<mask> = accum(C, A (semiring) B), with either operand optionally
/// transposed.
pub fn mxm<D1, D2, K, A, S, AM, BM>(
    c: &mut LilMatrix<S::Output>,
    mask: &K,
    accum: &A,
    semiring: &S,
    a: AM,
    b: BM,
    outp: OutputControl,
) -> Result<()>
where
    D1: ScalarType,
    D2: ScalarType,
    K: MatrixMask,
    A: Accumulate<S::Output>,
    S: Semiring<D1, D2>,
    AM: MatrixOperand<D1>,
    BM: MatrixOperand<D2>,
{
    if a.ncols() != b.nrows() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "mxm: A is {}x{}, B is {}x{}",
            a.nrows(),
            a.ncols(),
            b.nrows(),
            b.ncols()
        )));
    }
    if c.nrows() != a.nrows() || c.ncols() != b.ncols() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "mxm: output is {}x{}, product is {}x{}",
            c.nrows(),
            c.ncols(),
            a.nrows(),
            b.ncols()
        )));
    }
    if let Some((mr, mc)) = mask.mask_dims() {
        if (mr, mc) != (c.nrows(), c.ncols()) {
            return Err(GraphBlasError::DimensionMismatch(format!(
                "mxm: mask is {}x{}, output is {}x{}",
                mr,
                mc,
                c.nrows(),
                c.ncols()
            )));
        }
    }

    debug!(
        "mxm dispatch: transA={} transB={} masked={} complemented={} accum={}",
        a.transposed(),
        b.transposed(),
        !mask.is_all(),
        mask.complemented(),
        accum.active()
    );
    match (a.transposed(), b.transposed()) {
        (false, false) => {
            mxm_kernels::sparse_mxm_ab(c, mask, accum, semiring, a.base(), b.base(), outp)
        }
        (true, false) => {
            mxm_kernels::sparse_mxm_atb(c, mask, accum, semiring, a.base(), b.base(), outp)
        }
        (false, true) => {
            mxm_kernels::sparse_mxm_abt(c, mask, accum, semiring, a.base(), b.base(), outp)
        }
        (true, true) => {
            mxm_kernels::sparse_mxm_atbt(c, mask, accum, semiring, a.base(), b.base(), outp)
        }
    }
    trace!("mxm: wrote {} values", c.nvals());
    Ok(())
}

fn check_vector_mask<K: VectorMask>(what: &str, mask: &K, w_size: IndexType) -> Result<()> {
    if let Some(size) = mask.mask_size() {
        if size != w_size {
            return Err(GraphBlasError::DimensionMismatch(format!(
                "{}: mask size {}, output size {}",
                what, size, w_size
            )));
        }
    }
    Ok(())
}
