// Operation kernels: assign
//
// Constant assignment across all indices. Combined with a mask this reads
// as "set the selected positions to v"; index-subset assignment is
// expressed through masking.

use crate::core::binary_op::Accumulate;
use crate::core::error::{GraphBlasError, Result};
use crate::core::matrix::LilMatrix;
use crate::core::vector::SparseVector;
use crate::core::views::{MatrixMask, VectorMask};
use crate::ops::helpers::{
    ewise_or_opt_accum, ewise_or_opt_accum_matrix, write_with_opt_mask_matrix,
    write_with_opt_mask_vector,
};
use crate::types::{IndexType, OutputControl, ScalarType};

/// w<mask> = accum(w, value) at every index
pub fn assign_vector<T, K, A>(
    w: &mut SparseVector<T>,
    mask: &K,
    accum: &A,
    value: T,
    outp: OutputControl,
) -> Result<()>
where
    T: ScalarType,
    K: VectorMask,
    A: Accumulate<T>,
{
    if let Some(size) = mask.mask_size() {
        if size != w.size() {
            return Err(GraphBlasError::DimensionMismatch(format!(
                "assign: mask size {}, output size {}",
                size,
                w.size()
            )));
        }
    }

    let t: Vec<(IndexType, T)> = (0..w.size()).map(|i| (i, value)).collect();

    let mut z = Vec::new();
    ewise_or_opt_accum(&mut z, w.contents(), &t, accum);
    write_with_opt_mask_vector(w, z, mask, outp);
    Ok(())
}

/// C<mask> = accum(C, value) at every position
pub fn assign_matrix<T, K, A>(
    c: &mut LilMatrix<T>,
    mask: &K,
    accum: &A,
    value: T,
    outp: OutputControl,
) -> Result<()>
where
    T: ScalarType,
    K: MatrixMask,
    A: Accumulate<T>,
{
    if let Some((mr, mc)) = mask.mask_dims() {
        if (mr, mc) != (c.nrows(), c.ncols()) {
            return Err(GraphBlasError::DimensionMismatch(format!(
                "assign: mask is {}x{}, output is {}x{}",
                mr,
                mc,
                c.nrows(),
                c.ncols()
            )));
        }
    }

    let mut t = LilMatrix::new(c.nrows(), c.ncols());
    for i in 0..t.nrows() {
        t.set_row(i, (0..t.ncols()).map(|j| (j, value)).collect());
    }

    let mut z = LilMatrix::new(c.nrows(), c.ncols());
    ewise_or_opt_accum_matrix(&mut z, c, &t, accum);
    write_with_opt_mask_matrix(c, z, mask, outp);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::views::complement;
    use crate::types::{NoAccumulate, NoMask};

    #[test]
    fn test_assign_all_indices() {
        let mut w = SparseVector::<i32>::new(4);
        assign_vector(&mut w, &NoMask, &NoAccumulate, 7, OutputControl::Replace).unwrap();
        assert_eq!(w.to_dense(0), vec![7, 7, 7, 7]);
    }

    #[test]
    fn test_assign_under_structural_mask() {
        let pattern = SparseVector::from_dense(&[1.0, 0.0, 2.5, 0.0], 0.0);
        let mut w = SparseVector::<bool>::new(4);
        assign_vector(&mut w, &pattern, &NoAccumulate, true, OutputControl::Replace).unwrap();
        assert_eq!(w.contents(), &[(0, true), (2, true)]);
    }

    #[test]
    fn test_assign_under_complement_mask() {
        let pattern = SparseVector::from_dense(&[1.0, 0.0, 2.5, 0.0], 0.0);
        let mut w = SparseVector::<bool>::new(4);
        assign_vector(
            &mut w,
            &complement(&pattern),
            &NoAccumulate,
            true,
            OutputControl::Replace,
        )
        .unwrap();
        assert_eq!(w.contents(), &[(1, true), (3, true)]);
    }

    #[test]
    fn test_assign_matrix_merge_keeps_unmasked() {
        let mask = LilMatrix::from_dense(&[vec![1, 0], vec![0, 1]], 0).unwrap();
        let mut c = LilMatrix::from_dense(&[vec![5, 5], vec![5, 5]], 0).unwrap();
        assign_matrix(&mut c, &mask, &NoAccumulate, 9, OutputControl::Merge).unwrap();
        assert_eq!(c.to_dense(0), vec![vec![9, 5], vec![5, 9]]);
    }
}
