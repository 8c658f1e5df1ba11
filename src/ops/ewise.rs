// Operation kernels: element-wise multiply (intersection) and add (union)
//
// eWiseMult emits op(a, b) only where both inputs store a value, and is
// fully heterogeneous in its domains. eWiseAdd is a union: where both sides
// store a value it emits op(a, b), a one-sided value is carried through
// unchanged, so all domains must coincide.
//
// Matrix forms take plain or transposed operands. A single transposed
// operand is materialized once and the canonical row loop runs; the
// doubly-transposed form scatters columns directly.

use log::trace;

use crate::core::binary_op::{Accumulate, BinaryOp};
use crate::core::error::{GraphBlasError, Result};
use crate::core::matrix::LilMatrix;
use crate::core::vector::SparseVector;
use crate::core::views::{MatrixMask, MatrixOperand, VectorMask};
use crate::ops::helpers::{
    ewise_and, ewise_or, ewise_or_opt_accum, ewise_or_opt_accum_matrix,
    write_with_opt_mask_matrix, write_with_opt_mask_vector,
};
use crate::ops::transpose::transposed_copy;
use crate::types::{OutputControl, ScalarType};

/// w<mask> = accum(w, u .op. v) over the structural intersection
pub fn ewise_mult_vector<U, V, W, K, A, Op>(
    w: &mut SparseVector<W>,
    mask: &K,
    accum: &A,
    op: &Op,
    u: &SparseVector<U>,
    v: &SparseVector<V>,
    outp: OutputControl,
) -> Result<()>
where
    U: ScalarType,
    V: ScalarType,
    W: ScalarType,
    K: VectorMask,
    A: Accumulate<W>,
    Op: BinaryOp<U, V, Output = W>,
{
    check_vector_dims("eWiseMult", w.size(), u.size(), v.size(), mask)?;

    let mut t = Vec::new();
    if u.nvals() > 0 && v.nvals() > 0 {
        ewise_and(&mut t, u.contents(), v.contents(), op);
    }

    let mut z = Vec::new();
    ewise_or_opt_accum(&mut z, w.contents(), &t, accum);
    write_with_opt_mask_vector(w, z, mask, outp);
    Ok(())
}

/// w<mask> = accum(w, u .op. v) over the structural union
pub fn ewise_add_vector<T, K, A, Op>(
    w: &mut SparseVector<T>,
    mask: &K,
    accum: &A,
    op: &Op,
    u: &SparseVector<T>,
    v: &SparseVector<T>,
    outp: OutputControl,
) -> Result<()>
where
    T: ScalarType,
    K: VectorMask,
    A: Accumulate<T>,
    Op: BinaryOp<T, T, Output = T>,
{
    check_vector_dims("eWiseAdd", w.size(), u.size(), v.size(), mask)?;

    let mut t = Vec::new();
    ewise_or(&mut t, u.contents(), v.contents(), op);

    let mut z = Vec::new();
    ewise_or_opt_accum(&mut z, w.contents(), &t, accum);
    write_with_opt_mask_vector(w, z, mask, outp);
    Ok(())
}

/// C<mask> = accum(C, A .op. B) over the structural intersection
pub fn ewise_mult_matrix<U, V, W, K, A, Op, AM, BM>(
    c: &mut LilMatrix<W>,
    mask: &K,
    accum: &A,
    op: &Op,
    a: AM,
    b: BM,
    outp: OutputControl,
) -> Result<()>
where
    U: ScalarType,
    V: ScalarType,
    W: ScalarType,
    K: MatrixMask,
    A: Accumulate<W>,
    Op: BinaryOp<U, V, Output = W>,
    AM: MatrixOperand<U>,
    BM: MatrixOperand<V>,
{
    check_matrix_dims("eWiseMult", c, &a, &b, mask)?;

    let mut t = LilMatrix::new(c.nrows(), c.ncols());
    if a.base().nvals() > 0 && b.base().nvals() > 0 {
        match (a.transposed(), b.transposed()) {
            (false, false) => mult_rows(&mut t, a.base(), b.base(), op),
            (true, false) => {
                let at = transposed_copy(a.base());
                mult_rows(&mut t, &at, b.base(), op);
            }
            (false, true) => {
                let bt = transposed_copy(b.base());
                mult_rows(&mut t, a.base(), &bt, op);
            }
            (true, true) => mult_scatter_transposed(&mut t, a.base(), b.base(), op),
        }
    }

    let mut z = LilMatrix::new(c.nrows(), c.ncols());
    ewise_or_opt_accum_matrix(&mut z, c, &t, accum);
    write_with_opt_mask_matrix(c, z, mask, outp);
    trace!("eWiseMult: wrote {} values", c.nvals());
    Ok(())
}

/// C<mask> = accum(C, A .op. B) over the structural union
pub fn ewise_add_matrix<T, K, A, Op, AM, BM>(
    c: &mut LilMatrix<T>,
    mask: &K,
    accum: &A,
    op: &Op,
    a: AM,
    b: BM,
    outp: OutputControl,
) -> Result<()>
where
    T: ScalarType,
    K: MatrixMask,
    A: Accumulate<T>,
    Op: BinaryOp<T, T, Output = T>,
    AM: MatrixOperand<T>,
    BM: MatrixOperand<T>,
{
    check_matrix_dims("eWiseAdd", c, &a, &b, mask)?;

    let mut t = LilMatrix::new(c.nrows(), c.ncols());
    match (a.transposed(), b.transposed()) {
        (false, false) => add_rows(&mut t, a.base(), b.base(), op),
        (true, false) => {
            let at = transposed_copy(a.base());
            add_rows(&mut t, &at, b.base(), op);
        }
        (false, true) => {
            let bt = transposed_copy(b.base());
            add_rows(&mut t, a.base(), &bt, op);
        }
        (true, true) => add_scatter_transposed(&mut t, a.base(), b.base(), op),
    }

    let mut z = LilMatrix::new(c.nrows(), c.ncols());
    ewise_or_opt_accum_matrix(&mut z, c, &t, accum);
    write_with_opt_mask_matrix(c, z, mask, outp);
    trace!("eWiseAdd: wrote {} values", c.nvals());
    Ok(())
}

fn check_vector_dims<K: VectorMask>(
    what: &str,
    w: usize,
    u: usize,
    v: usize,
    mask: &K,
) -> Result<()> {
    if u != v || w != u {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "{}: output size {}, input sizes {} and {}",
            what, w, u, v
        )));
    }
    if let Some(size) = mask.mask_size() {
        if size != w {
            return Err(GraphBlasError::DimensionMismatch(format!(
                "{}: mask size {}, output size {}",
                what, size, w
            )));
        }
    }
    Ok(())
}

fn check_matrix_dims<U, V, W, K, AM, BM>(
    what: &str,
    c: &LilMatrix<W>,
    a: &AM,
    b: &BM,
    mask: &K,
) -> Result<()>
where
    U: ScalarType,
    V: ScalarType,
    W: ScalarType,
    K: MatrixMask,
    AM: MatrixOperand<U>,
    BM: MatrixOperand<V>,
{
    if a.nrows() != b.nrows() || a.ncols() != b.ncols() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "{}: inputs are {}x{} and {}x{}",
            what,
            a.nrows(),
            a.ncols(),
            b.nrows(),
            b.ncols()
        )));
    }
    if c.nrows() != a.nrows() || c.ncols() != a.ncols() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "{}: output is {}x{}, inputs are {}x{}",
            what,
            c.nrows(),
            c.ncols(),
            a.nrows(),
            a.ncols()
        )));
    }
    if let Some((mr, mc)) = mask.mask_dims() {
        if (mr, mc) != (c.nrows(), c.ncols()) {
            return Err(GraphBlasError::DimensionMismatch(format!(
                "{}: mask is {}x{}, output is {}x{}",
                what,
                mr,
                mc,
                c.nrows(),
                c.ncols()
            )));
        }
    }
    Ok(())
}

fn mult_rows<U, V, W, Op>(t: &mut LilMatrix<W>, a: &LilMatrix<U>, b: &LilMatrix<V>, op: &Op)
where
    U: ScalarType,
    V: ScalarType,
    W: ScalarType,
    Op: BinaryOp<U, V, Output = W>,
{
    for i in 0..t.nrows() {
        if a.row(i).is_empty() || b.row(i).is_empty() {
            continue;
        }
        let mut t_row = Vec::new();
        ewise_and(&mut t_row, a.row(i), b.row(i), op);
        if !t_row.is_empty() {
            t.set_row(i, t_row);
        }
    }
}

fn add_rows<T, Op>(t: &mut LilMatrix<T>, a: &LilMatrix<T>, b: &LilMatrix<T>, op: &Op)
where
    T: ScalarType,
    Op: BinaryOp<T, T, Output = T>,
{
    for i in 0..t.nrows() {
        let mut t_row = Vec::new();
        ewise_or(&mut t_row, a.row(i), b.row(i), op);
        if !t_row.is_empty() {
            t.set_row(i, t_row);
        }
    }
}

// Both operands transposed: intersect base rows and scatter each produced
// (col, value) into column k of the output.
fn mult_scatter_transposed<U, V, W, Op>(
    t: &mut LilMatrix<W>,
    a: &LilMatrix<U>,
    b: &LilMatrix<V>,
    op: &Op,
) where
    U: ScalarType,
    V: ScalarType,
    W: ScalarType,
    Op: BinaryOp<U, V, Output = W>,
{
    let mut t_col = Vec::new();
    for k in 0..a.nrows() {
        if a.row(k).is_empty() || b.row(k).is_empty() {
            continue;
        }
        ewise_and(&mut t_col, a.row(k), b.row(k), op);
        for &(j, v) in &t_col {
            t.append_to_row(j, k, v);
        }
    }
}

fn add_scatter_transposed<T, Op>(t: &mut LilMatrix<T>, a: &LilMatrix<T>, b: &LilMatrix<T>, op: &Op)
where
    T: ScalarType,
    Op: BinaryOp<T, T, Output = T>,
{
    let mut t_col = Vec::new();
    for k in 0..a.nrows() {
        ewise_or(&mut t_col, a.row(k), b.row(k), op);
        for &(j, v) in &t_col {
            t.append_to_row(j, k, v);
        }
    }
}
