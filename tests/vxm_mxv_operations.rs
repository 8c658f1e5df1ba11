// Integration tests for the matrix-vector products, with and without
// transposed operands and masks.

use lilblas::{
    mxv, transpose, vxm, ArithmeticSemiring, GraphBlasError, LilMatrix, NoAccumulate, NoMask,
    OutputControl, Second, SparseVector,
};

fn m3x3() -> LilMatrix<f64> {
    LilMatrix::from_dense(
        &[vec![12.0, 0.0, 7.0], vec![1.0, 0.0, 0.0], vec![3.0, 6.0, 9.0]],
        0.0,
    )
    .unwrap()
}

fn m4x3() -> LilMatrix<f64> {
    LilMatrix::from_dense(
        &[
            vec![5.0, 6.0, 4.0],
            vec![0.0, 7.0, 5.0],
            vec![1.0, 0.0, 0.0],
            vec![2.0, 0.0, 1.0],
        ],
        0.0,
    )
    .unwrap()
}

#[test]
fn test_vxm_bad_dimensions() {
    let a = m3x3();
    let b = m4x3();
    let u3 = SparseVector::from_dense(&[1.0, 1.0, 0.0], 0.0);
    let mut w3 = SparseVector::<f64>::new(3);
    let mut w4 = SparseVector::<f64>::new(4);

    // incompatible input dimensions
    assert!(vxm(
        &mut w3,
        &NoMask,
        &NoAccumulate,
        &ArithmeticSemiring::new(),
        &u3,
        &b,
        OutputControl::Merge,
    )
    .is_err());

    // incompatible output dimensions
    assert!(vxm(
        &mut w4,
        &NoMask,
        &NoAccumulate,
        &ArithmeticSemiring::new(),
        &u3,
        &a,
        OutputControl::Merge,
    )
    .is_err());
}

#[test]
fn test_vxm_reg() {
    let a = m3x3();
    let u = SparseVector::from_dense(&[1.0, 1.0, 0.0], 0.0);
    let mut w = SparseVector::new(3);
    vxm(
        &mut w,
        &NoMask,
        &NoAccumulate,
        &ArithmeticSemiring::new(),
        &u,
        &a,
        OutputControl::Merge,
    )
    .unwrap();
    // index 1 has no contribution: both stored u entries miss column 1
    assert_eq!(w.nvals(), 2);
    assert_eq!(w.contents(), &[(0, 13.0), (2, 7.0)]);
}

#[test]
fn test_vxm_stored_zero_result() {
    let a = LilMatrix::from_dense(
        &[
            vec![1, 1, 0, 0],
            vec![1, 2, 2, 0],
            vec![0, 2, 3, 3],
            vec![0, 0, 3, 4],
        ],
        0,
    )
    .unwrap();
    let u = SparseVector::from_dense(&[1, -1, 0, 0], 0);
    let mut w = SparseVector::new(4);
    vxm(
        &mut w,
        &NoMask,
        &NoAccumulate,
        &ArithmeticSemiring::new(),
        &u,
        &a,
        OutputControl::Merge,
    )
    .unwrap();
    // the computed zero at index 0 is stored, index 3 stays missing
    assert_eq!(w.nvals(), 3);
    assert_eq!(w.contents(), &[(0, 0), (1, -1), (2, -2)]);
    assert_eq!(w.extract_element(3), Err(GraphBlasError::NoValue));
}

#[test]
fn test_vxm_transposed() {
    let a = m3x3();
    let b = m4x3();
    let u3 = SparseVector::from_dense(&[1.0, 1.0, 0.0], 0.0);

    let mut w3 = SparseVector::new(3);
    vxm(
        &mut w3,
        &NoMask,
        &NoAccumulate,
        &ArithmeticSemiring::new(),
        &u3,
        transpose(&a),
        OutputControl::Merge,
    )
    .unwrap();
    assert_eq!(w3.to_dense(0.0), vec![12.0, 1.0, 9.0]);

    let mut w4 = SparseVector::new(4);
    vxm(
        &mut w4,
        &NoMask,
        &NoAccumulate,
        &ArithmeticSemiring::new(),
        &u3,
        transpose(&b),
        OutputControl::Merge,
    )
    .unwrap();
    assert_eq!(w4.to_dense(0.0), vec![11.0, 7.0, 1.0, 2.0]);

    // shape check still applies through the view
    let mut w4 = SparseVector::new(4);
    let u4 = SparseVector::from_dense(&[0.0, 0.0, 1.0, 1.0], 0.0);
    assert!(vxm(
        &mut w4,
        &NoMask,
        &NoAccumulate,
        &ArithmeticSemiring::new(),
        &u4,
        transpose(&b),
        OutputControl::Merge,
    )
    .is_err());
}

#[test]
fn test_mxv_reg_and_transposed() {
    let a = m3x3();
    let u = SparseVector::from_dense(&[1.0, 1.0, 0.0], 0.0);

    let mut w = SparseVector::new(3);
    mxv(
        &mut w,
        &NoMask,
        &NoAccumulate,
        &ArithmeticSemiring::new(),
        &a,
        &u,
        OutputControl::Merge,
    )
    .unwrap();
    assert_eq!(w.to_dense(0.0), vec![12.0, 1.0, 9.0]);

    let mut w = SparseVector::new(3);
    mxv(
        &mut w,
        &NoMask,
        &NoAccumulate,
        &ArithmeticSemiring::new(),
        transpose(&a),
        &u,
        OutputControl::Merge,
    )
    .unwrap();
    assert_eq!(w.contents(), &[(0, 13.0), (2, 7.0)]);
}

#[test]
fn test_vxm_masked_replace() {
    let a = m3x3();
    let u = SparseVector::from_dense(&[1.0, 1.0, 0.0], 0.0);
    let mask = SparseVector::from_dense(&[1.0, 1.0, 0.0], 0.0);
    assert_eq!(mask.nvals(), 2);

    // with an accumulator carrying prior values at masked positions
    let mut w = SparseVector::from_dense(&[1.0, 1.0, 1.0], 0.0);
    vxm(
        &mut w,
        &mask,
        &Second::<f64, f64>::new(),
        &ArithmeticSemiring::new(),
        &u,
        &a,
        OutputControl::Replace,
    )
    .unwrap();
    assert_eq!(w.nvals(), 2);
    assert_eq!(w.contents(), &[(0, 13.0), (1, 1.0)]);

    // without one, a masked-in position with no computed value goes missing
    let mut w = SparseVector::from_dense(&[1.0, 1.0, 1.0], 0.0);
    vxm(
        &mut w,
        &mask,
        &NoAccumulate,
        &ArithmeticSemiring::new(),
        &u,
        &a,
        OutputControl::Replace,
    )
    .unwrap();
    assert_eq!(w.nvals(), 1);
    assert_eq!(w.contents(), &[(0, 13.0)]);
}

#[test]
fn test_vxm_mask_is_structural_stored_zero_counts() {
    let a = LilMatrix::from_dense(
        &[
            vec![1, 1, 0, 0],
            vec![1, 2, 2, 0],
            vec![0, 2, 3, 3],
            vec![0, 0, 3, 4],
        ],
        0,
    )
    .unwrap();
    let u = SparseVector::from_dense(&[1, -1, 1, 0], 0);
    let mut mask = SparseVector::from_dense(&[1, 1, 1, 0], 0);
    assert_eq!(mask.nvals(), 3);
    mask.set_element(3, 0).unwrap();
    // the stored zero is presence, so every position is in the mask
    assert_eq!(mask.nvals(), 4);

    let mut w = SparseVector::from_dense(&[1, 1, 1, 1], 0);
    vxm(
        &mut w,
        &mask,
        &NoAccumulate,
        &ArithmeticSemiring::new(),
        &u,
        &a,
        OutputControl::Replace,
    )
    .unwrap();
    assert_eq!(w.to_dense(666), vec![0, 1, 1, 3]);
    assert_eq!(w.nvals(), 4);
}

#[test]
fn test_mxv_masked_merge_keeps_unmasked() {
    let a = m3x3();
    let u = SparseVector::from_dense(&[1.0, 1.0, 0.0], 0.0);
    let mask = SparseVector::from_dense(&[0.0, 1.0, 1.0], 0.0);

    let mut w = SparseVector::from_dense(&[9.0, 9.0, 9.0], 0.0);
    mxv(
        &mut w,
        &mask,
        &NoAccumulate,
        &ArithmeticSemiring::new(),
        &a,
        &u,
        OutputControl::Merge,
    )
    .unwrap();
    // position 0 is out of the mask and keeps its prior value
    assert_eq!(w.to_dense(0.0), vec![9.0, 1.0, 9.0]);
}
