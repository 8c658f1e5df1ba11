// Operation kernels
//
// Every kernel follows the same three-phase pipeline: compute the pure
// algebraic intermediate T, accumulate Z = C (+accum) T, write Z into the
// output under mask and output control. The row-level helpers implement
// the shared phases.

pub mod apply;
pub mod assign;
pub mod ewise;
pub mod extract;
pub(crate) mod helpers;
pub mod matmul;
pub(crate) mod mxm_kernels;
pub mod reduce;
pub mod transpose;

pub use apply::{apply_matrix, apply_vector};
pub use assign::{assign_matrix, assign_vector};
pub use ewise::{ewise_add_matrix, ewise_add_vector, ewise_mult_matrix, ewise_mult_vector};
pub use extract::{extract_matrix, extract_vector};
pub use matmul::{mxm, mxv, vxm};
pub use reduce::{reduce_matrix_to_scalar, reduce_matrix_to_vector, reduce_vector_to_scalar};
pub use transpose::transpose_matrix;
