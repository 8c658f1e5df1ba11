// Operation kernels: the masked matrix-multiply kernel families
//
// One family per transposition variant. A x B and A x B' use the dot
// formulation; A' x B scatters with axpy; A' x B' runs dots between
// materialized columns of A and rows of B. The masked kernel of each
// family restricts the intermediate to writable positions before the
// write phase runs.

use crate::core::binary_op::Accumulate;
use crate::core::matrix::LilMatrix;
use crate::core::semiring::Semiring;
use crate::core::views::MatrixMask;
use crate::ops::helpers::{axpy, dot, mask_allows, masked_accum, masked_axpy, masked_merge};
use crate::types::{OutputControl, ScalarType};

//----------------------------------------------------------------------------
// Family entries

/// C<mask> = accum(C, A (semiring) B)
pub(crate) fn sparse_mxm_ab<D1, D2, S, K, A>(
    c: &mut LilMatrix<S::Output>,
    mask: &K,
    accum: &A,
    semiring: &S,
    a: &LilMatrix<D1>,
    b: &LilMatrix<D2>,
    outp: OutputControl,
) where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
    K: MatrixMask,
    A: Accumulate<S::Output>,
{
    let inputs_empty = a.nvals() == 0 || b.nvals() == 0;
    run_family(c, mask, accum, outp, inputs_empty, |t| {
        if mask.is_all() {
            ab_kernel(t, semiring, a, b);
        } else {
            ab_kernel_masked(t, mask, semiring, a, b);
        }
    });
}

/// C<mask> = accum(C, A' (semiring) B)
pub(crate) fn sparse_mxm_atb<D1, D2, S, K, A>(
    c: &mut LilMatrix<S::Output>,
    mask: &K,
    accum: &A,
    semiring: &S,
    a: &LilMatrix<D1>,
    b: &LilMatrix<D2>,
    outp: OutputControl,
) where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
    K: MatrixMask,
    A: Accumulate<S::Output>,
{
    let inputs_empty = a.nvals() == 0 || b.nvals() == 0;
    run_family(c, mask, accum, outp, inputs_empty, |t| {
        if mask.is_all() {
            atb_kernel(t, semiring, a, b);
        } else {
            atb_kernel_masked(t, mask, semiring, a, b);
        }
    });
}

/// C<mask> = accum(C, A (semiring) B')
pub(crate) fn sparse_mxm_abt<D1, D2, S, K, A>(
    c: &mut LilMatrix<S::Output>,
    mask: &K,
    accum: &A,
    semiring: &S,
    a: &LilMatrix<D1>,
    b: &LilMatrix<D2>,
    outp: OutputControl,
) where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
    K: MatrixMask,
    A: Accumulate<S::Output>,
{
    let inputs_empty = a.nvals() == 0 || b.nvals() == 0;
    run_family(c, mask, accum, outp, inputs_empty, |t| {
        if mask.is_all() {
            abt_kernel(t, semiring, a, b);
        } else {
            abt_kernel_masked(t, mask, semiring, a, b);
        }
    });
}

/// C<mask> = accum(C, A' (semiring) B')
pub(crate) fn sparse_mxm_atbt<D1, D2, S, K, A>(
    c: &mut LilMatrix<S::Output>,
    mask: &K,
    accum: &A,
    semiring: &S,
    a: &LilMatrix<D1>,
    b: &LilMatrix<D2>,
    outp: OutputControl,
) where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
    K: MatrixMask,
    A: Accumulate<S::Output>,
{
    let inputs_empty = a.nvals() == 0 || b.nvals() == 0;
    run_family(c, mask, accum, outp, inputs_empty, |t| {
        if mask.is_all() {
            atbt_kernel(t, semiring, a, b);
        } else {
            atbt_kernel_masked(t, mask, semiring, a, b);
        }
    });
}

//----------------------------------------------------------------------------
// Shared short-circuit, accumulate, and write structure

fn run_family<T, K, A, F>(
    c: &mut LilMatrix<T>,
    mask: &K,
    accum: &A,
    outp: OutputControl,
    inputs_empty: bool,
    kernel: F,
) where
    T: ScalarType,
    K: MatrixMask,
    A: Accumulate<T>,
    F: FnOnce(&mut LilMatrix<T>),
{
    if accum.active() {
        if short_circuit_accum(c, mask, inputs_empty, outp) {
            return;
        }
        let mut t = LilMatrix::new(c.nrows(), c.ncols());
        if !inputs_empty {
            kernel(&mut t);
        }
        if mask.is_all() {
            for i in 0..c.nrows() {
                let t_row = std::mem::take(t.row_mut(i));
                if !t_row.is_empty() {
                    c.merge_row(i, t_row, accum);
                }
            }
        } else {
            write_masked_accum(c, &t, mask, accum, outp);
        }
    } else {
        if short_circuit_noaccum(c, mask, inputs_empty, outp) {
            return;
        }
        let mut t = LilMatrix::new(c.nrows(), c.ncols());
        if !inputs_empty {
            kernel(&mut t);
        }
        if mask.is_all() {
            *c = t;
        } else {
            write_masked_noaccum(c, t, mask, outp);
        }
    }
}

// Empty operands settle the result without running the kernel. The rules
// follow from the pipeline: an empty T makes Z = C under an accumulator and
// Z empty without one; the mask then decides what survives the write.
fn short_circuit_noaccum<T, K>(
    c: &mut LilMatrix<T>,
    mask: &K,
    inputs_empty: bool,
    outp: OutputControl,
) -> bool
where
    T: ScalarType,
    K: MatrixMask,
{
    if mask.is_all() {
        if inputs_empty {
            c.clear();
            return true;
        }
        return false;
    }
    if !mask.complemented() {
        if outp == OutputControl::Replace && (inputs_empty || mask.mask_nvals() == 0) {
            c.clear();
            return true;
        }
        // merge with an empty mask: no writable position
        mask.mask_nvals() == 0
    } else {
        if outp == OutputControl::Replace && inputs_empty {
            c.clear();
            return true;
        }
        false
    }
}

fn short_circuit_accum<T, K>(
    c: &mut LilMatrix<T>,
    mask: &K,
    inputs_empty: bool,
    outp: OutputControl,
) -> bool
where
    T: ScalarType,
    K: MatrixMask,
{
    if mask.is_all() {
        // Z = C, every position written back unchanged
        return inputs_empty;
    }
    if !mask.complemented() {
        if mask.mask_nvals() == 0 {
            if outp == OutputControl::Replace {
                c.clear();
            }
            return true;
        }
        false
    } else {
        // complement of an empty mask selects everything: Z = C
        outp == OutputControl::Replace && mask.mask_nvals() == 0 && inputs_empty
    }
}

// T from the masked kernels is already restricted to writable positions.
fn write_masked_noaccum<T, K>(c: &mut LilMatrix<T>, mut t: LilMatrix<T>, mask: &K, outp: OutputControl)
where
    T: ScalarType,
    K: MatrixMask,
{
    for i in 0..c.nrows() {
        match outp {
            OutputControl::Replace => {
                let t_row = std::mem::take(t.row_mut(i));
                c.set_row(i, t_row);
            }
            OutputControl::Merge => {
                let mut merged = Vec::new();
                masked_merge(
                    &mut merged,
                    mask.mask_row(i),
                    mask.complemented(),
                    c.row(i),
                    t.row(i),
                );
                c.set_row(i, merged);
            }
        }
    }
}

fn write_masked_accum<T, K, A>(
    c: &mut LilMatrix<T>,
    t: &LilMatrix<T>,
    mask: &K,
    accum: &A,
    outp: OutputControl,
) where
    T: ScalarType,
    K: MatrixMask,
    A: Accumulate<T>,
{
    for i in 0..c.nrows() {
        let mut z_row = Vec::new();
        masked_accum(
            &mut z_row,
            mask.mask_row(i),
            mask.complemented(),
            accum,
            c.row(i),
            t.row(i),
        );
        match outp {
            OutputControl::Replace => c.set_row(i, z_row),
            OutputControl::Merge => {
                let mut merged = Vec::new();
                masked_merge(
                    &mut merged,
                    mask.mask_row(i),
                    mask.complemented(),
                    c.row(i),
                    &z_row,
                );
                c.set_row(i, merged);
            }
        }
    }
}

//----------------------------------------------------------------------------
// A x B: one output column at a time, dot products against materialized
// columns of B. Empty rows and columns short-circuit the inner loops.

fn ab_kernel<D1, D2, S>(
    t: &mut LilMatrix<S::Output>,
    semiring: &S,
    a: &LilMatrix<D1>,
    b: &LilMatrix<D2>,
) where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
{
    for j in 0..b.ncols() {
        let b_col = b.col(j);
        if b_col.nvals() == 0 {
            continue;
        }
        for i in 0..a.nrows() {
            if a.row(i).is_empty() {
                continue;
            }
            if let Some(val) = dot(a.row(i), b_col.contents(), semiring) {
                t.append_to_row(i, j, val);
            }
        }
    }
}

fn ab_kernel_masked<D1, D2, S, K>(
    t: &mut LilMatrix<S::Output>,
    mask: &K,
    semiring: &S,
    a: &LilMatrix<D1>,
    b: &LilMatrix<D2>,
) where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
    K: MatrixMask,
{
    for j in 0..b.ncols() {
        let b_col = b.col(j);
        if b_col.nvals() == 0 {
            continue;
        }
        for i in 0..a.nrows() {
            if a.row(i).is_empty() {
                continue;
            }
            if !mask_allows(mask.mask_row(i), mask.complemented(), j) {
                continue;
            }
            if let Some(val) = dot(a.row(i), b_col.contents(), semiring) {
                t.append_to_row(i, j, val);
            }
        }
    }
}

//----------------------------------------------------------------------------
// A' x B: for each stored a[k][i], scatter a_ki * B[k] into output row i.

fn atb_kernel<D1, D2, S>(
    t: &mut LilMatrix<S::Output>,
    semiring: &S,
    a: &LilMatrix<D1>,
    b: &LilMatrix<D2>,
) where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
{
    for k in 0..a.nrows() {
        if a.row(k).is_empty() || b.row(k).is_empty() {
            continue;
        }
        for idx in 0..a.row(k).len() {
            let (i, a_ki) = a.row(k)[idx];
            axpy(t.row_mut(i), semiring, a_ki, b.row(k));
        }
    }
    t.recompute_nvals();
}

fn atb_kernel_masked<D1, D2, S, K>(
    t: &mut LilMatrix<S::Output>,
    mask: &K,
    semiring: &S,
    a: &LilMatrix<D1>,
    b: &LilMatrix<D2>,
) where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
    K: MatrixMask,
{
    let complemented = mask.complemented();
    for k in 0..a.nrows() {
        if a.row(k).is_empty() || b.row(k).is_empty() {
            continue;
        }
        for idx in 0..a.row(k).len() {
            let (i, a_ki) = a.row(k)[idx];
            let mask_row = mask.mask_row(i);
            if !complemented && mask_row.is_empty() {
                continue;
            }
            masked_axpy(t.row_mut(i), mask_row, complemented, semiring, a_ki, b.row(k));
        }
    }
    t.recompute_nvals();
}

//----------------------------------------------------------------------------
// A x B': T[i][k] = dot(A[i], B[k]); k runs over rows of the base B.

fn abt_kernel<D1, D2, S>(
    t: &mut LilMatrix<S::Output>,
    semiring: &S,
    a: &LilMatrix<D1>,
    b: &LilMatrix<D2>,
) where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
{
    for k in 0..b.nrows() {
        if b.row(k).is_empty() {
            continue;
        }
        for i in 0..a.nrows() {
            if a.row(i).is_empty() {
                continue;
            }
            if let Some(val) = dot(a.row(i), b.row(k), semiring) {
                t.append_to_row(i, k, val);
            }
        }
    }
}

fn abt_kernel_masked<D1, D2, S, K>(
    t: &mut LilMatrix<S::Output>,
    mask: &K,
    semiring: &S,
    a: &LilMatrix<D1>,
    b: &LilMatrix<D2>,
) where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
    K: MatrixMask,
{
    for k in 0..b.nrows() {
        if b.row(k).is_empty() {
            continue;
        }
        for i in 0..a.nrows() {
            if a.row(i).is_empty() {
                continue;
            }
            if !mask_allows(mask.mask_row(i), mask.complemented(), k) {
                continue;
            }
            if let Some(val) = dot(a.row(i), b.row(k), semiring) {
                t.append_to_row(i, k, val);
            }
        }
    }
}

//----------------------------------------------------------------------------
// A' x B': T[i][j] = dot(column i of A, row j of B); both walks run over
// the shared inner index k.

fn atbt_kernel<D1, D2, S>(
    t: &mut LilMatrix<S::Output>,
    semiring: &S,
    a: &LilMatrix<D1>,
    b: &LilMatrix<D2>,
) where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
{
    for i in 0..a.ncols() {
        let a_col = a.col(i);
        if a_col.nvals() == 0 {
            continue;
        }
        for j in 0..b.nrows() {
            if b.row(j).is_empty() {
                continue;
            }
            if let Some(val) = dot(a_col.contents(), b.row(j), semiring) {
                t.append_to_row(i, j, val);
            }
        }
    }
}

fn atbt_kernel_masked<D1, D2, S, K>(
    t: &mut LilMatrix<S::Output>,
    mask: &K,
    semiring: &S,
    a: &LilMatrix<D1>,
    b: &LilMatrix<D2>,
) where
    D1: ScalarType,
    D2: ScalarType,
    S: Semiring<D1, D2>,
    K: MatrixMask,
{
    for i in 0..a.ncols() {
        let a_col = a.col(i);
        if a_col.nvals() == 0 {
            continue;
        }
        for j in 0..b.nrows() {
            if b.row(j).is_empty() {
                continue;
            }
            if !mask_allows(mask.mask_row(i), mask.complemented(), j) {
                continue;
            }
            if let Some(val) = dot(a_col.contents(), b.row(j), semiring) {
                t.append_to_row(i, j, val);
            }
        }
    }
}
