// Operation kernels: reduce
//
// Matrix-to-vector reduce folds each row with a binary operation and runs
// the result through the standard pipeline. The scalar variants fold with
// a monoid seeded by its identity; no mask applies to a scalar.

use log::trace;

use crate::core::binary_op::{Accumulate, BinaryOp};
use crate::core::error::{GraphBlasError, Result};
use crate::core::monoid::Monoid;
use crate::core::vector::SparseVector;
use crate::core::views::{MatrixOperand, VectorMask};
use crate::ops::helpers::{
    ewise_or_opt_accum, opt_accum_scalar, reduction, write_with_opt_mask_vector,
};
use crate::types::{IndexType, OutputControl, ScalarType};

/// w<mask> = accum(w, row-fold of A)
pub fn reduce_matrix_to_vector<T, K, A, Op, AM>(
    w: &mut SparseVector<T>,
    mask: &K,
    accum: &A,
    op: &Op,
    a: AM,
    outp: OutputControl,
) -> Result<()>
where
    T: ScalarType,
    K: VectorMask,
    A: Accumulate<T>,
    Op: BinaryOp<T, T, Output = T>,
    AM: MatrixOperand<T>,
{
    if w.size() != a.nrows() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "reduce: output size {}, input has {} rows",
            w.size(),
            a.nrows()
        )));
    }
    if let Some(size) = mask.mask_size() {
        if size != w.size() {
            return Err(GraphBlasError::DimensionMismatch(format!(
                "reduce: mask size {}, output size {}",
                size,
                w.size()
            )));
        }
    }

    let mut t: Vec<(IndexType, T)> = Vec::new();
    if a.base().nvals() > 0 {
        if a.transposed() {
            for i in 0..a.nrows() {
                let col = a.base().col(i);
                if let Some(v) = reduction(col.contents(), op) {
                    t.push((i, v));
                }
            }
        } else {
            for i in 0..a.nrows() {
                if let Some(v) = reduction(a.base().row(i), op) {
                    t.push((i, v));
                }
            }
        }
    }

    let mut z = Vec::new();
    ewise_or_opt_accum(&mut z, w.contents(), &t, accum);
    write_with_opt_mask_vector(w, z, mask, outp);
    trace!("reduce: wrote {} values", w.nvals());
    Ok(())
}

/// val = accum(val, monoid-fold of u), seeded with the identity.
pub fn reduce_vector_to_scalar<T, A, M>(
    val: &mut T,
    accum: &A,
    monoid: &M,
    u: &SparseVector<T>,
) where
    T: ScalarType,
    A: Accumulate<T>,
    M: Monoid<T>,
{
    let fold = reduction(u.contents(), monoid).unwrap_or_else(|| monoid.identity());
    *val = opt_accum_scalar(*val, fold, accum);
}

/// val = accum(val, monoid-fold of all stored entries of A).
pub fn reduce_matrix_to_scalar<T, A, M, AM>(val: &mut T, accum: &A, monoid: &M, a: AM)
where
    T: ScalarType,
    A: Accumulate<T>,
    M: Monoid<T>,
    AM: MatrixOperand<T>,
{
    let base = a.base();
    let mut fold = monoid.identity();
    for i in 0..base.nrows() {
        if let Some(v) = reduction(base.row(i), monoid) {
            fold = monoid.apply(fold, v);
        }
    }
    *val = opt_accum_scalar(*val, fold, accum);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binary_op::Plus;
    use crate::core::matrix::LilMatrix;
    use crate::core::monoid::{MaxMonoid, PlusMonoid};
    use crate::core::views::transpose;
    use crate::types::{NoAccumulate, NoMask};

    fn sample() -> LilMatrix<f64> {
        LilMatrix::from_dense(
            &[vec![1.0, 2.0, 0.0], vec![0.0, 0.0, 0.0], vec![4.0, 0.0, 8.0]],
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn test_row_reduce_skips_empty_rows() {
        let a = sample();
        let mut w = SparseVector::new(3);
        reduce_matrix_to_vector(
            &mut w,
            &NoMask,
            &NoAccumulate,
            &Plus::new(),
            &a,
            OutputControl::Replace,
        )
        .unwrap();
        assert_eq!(w.contents(), &[(0, 3.0), (2, 12.0)]);
    }

    #[test]
    fn test_reduce_transposed_folds_columns() {
        let a = sample();
        let mut w = SparseVector::new(3);
        reduce_matrix_to_vector(
            &mut w,
            &NoMask,
            &NoAccumulate,
            &Plus::new(),
            transpose(&a),
            OutputControl::Replace,
        )
        .unwrap();
        assert_eq!(w.contents(), &[(0, 5.0), (1, 2.0), (2, 8.0)]);
    }

    #[test]
    fn test_vector_to_scalar_with_and_without_accum() {
        let u = SparseVector::from_dense(&[1.0, 0.0, 5.0], 0.0);
        let mut val = 100.0;
        reduce_vector_to_scalar(&mut val, &NoAccumulate, &PlusMonoid::new(), &u);
        assert_eq!(val, 6.0);
        reduce_vector_to_scalar(&mut val, &Plus::new(), &PlusMonoid::new(), &u);
        assert_eq!(val, 12.0);
    }

    #[test]
    fn test_empty_vector_reduces_to_identity() {
        let u = SparseVector::<f64>::new(4);
        let mut val = -1.0;
        reduce_vector_to_scalar(&mut val, &NoAccumulate, &PlusMonoid::new(), &u);
        assert_eq!(val, 0.0);
    }

    #[test]
    fn test_matrix_to_scalar() {
        let a = sample();
        let mut val = 0.0;
        reduce_matrix_to_scalar(&mut val, &NoAccumulate, &PlusMonoid::new(), &a);
        assert_eq!(val, 15.0);

        let mut max = 0.0;
        reduce_matrix_to_scalar(&mut max, &NoAccumulate, &MaxMonoid::new(), &a);
        assert_eq!(max, 8.0);
    }
}
