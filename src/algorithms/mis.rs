// Algorithms: maximal independent set
//
// A variant of Luby's randomized algorithm:
// - every candidate draws a random value scaled by its inverse degree, with
//   a small positive floor so repeated draws eventually break any tie
// - a candidate whose draw beats every candidate neighbor joins the set
// - new members and their neighbors leave the candidate pool
// - repeat until no candidates remain
//
// The adjacency matrix must be symmetric and unweighted: structural zeros
// absent, edges stored as 1.

use std::cell::RefCell;

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::binary_op::{BinaryFunction, LogicalOr, Plus};
use crate::core::error::{GraphBlasError, Result};
use crate::core::matrix::LilMatrix;
use crate::core::semiring::{MaxSecondSemiring, Semiring};
use crate::core::unary_op::Identity;
use crate::core::vector::SparseVector;
use crate::core::views::complement;
use crate::ops::apply::apply_vector;
use crate::ops::assign::assign_vector;
use crate::ops::ewise::{ewise_add_vector, ewise_mult_vector};
use crate::ops::matmul::mxv;
use crate::ops::reduce::reduce_matrix_to_vector;
use crate::types::{IndexType, NoAccumulate, NoMask, OutputControl};

/// A stored edge to a new member witnesses that the endpoint must leave
/// the candidate pool.
#[derive(Debug, Clone, Copy)]
struct EdgeWitnessSemiring;

impl Semiring<f32, bool> for EdgeWitnessSemiring {
    type Output = bool;

    fn add(&self, x: bool, y: bool) -> bool {
        x || y
    }

    fn multiply(&self, weight: f32, member: bool) -> bool {
        weight != 0.0 && member
    }

    fn zero(&self) -> bool {
        false
    }
}

/// Compute a maximal independent set of the graph. A stored `true` in the
/// result marks the vertex as selected. The random stream is scoped to the
/// call and fully determined by `seed`.
pub fn mis(graph: &LilMatrix<f32>, seed: u64) -> Result<SparseVector<bool>> {
    let num_vertices = graph.nrows();
    if num_vertices != graph.ncols() {
        return Err(GraphBlasError::DimensionMismatch(format!(
            "mis: adjacency matrix is {}x{}, expected square",
            graph.nrows(),
            graph.ncols()
        )));
    }

    let mut degrees = SparseVector::<f32>::new(num_vertices);
    reduce_matrix_to_vector(
        &mut degrees,
        &NoMask,
        &NoAccumulate,
        &Plus::new(),
        graph,
        OutputControl::Replace,
    )?;

    // non-isolated vertices start as candidates; isolated vertices go
    // straight into the independent set
    let mut candidates = SparseVector::<bool>::new(num_vertices);
    assign_vector(
        &mut candidates,
        &degrees,
        &NoAccumulate,
        true,
        OutputControl::Replace,
    )?;

    let mut independent_set = SparseVector::<bool>::new(num_vertices);
    assign_vector(
        &mut independent_set,
        &complement(&degrees),
        &NoAccumulate,
        true,
        OutputControl::Replace,
    )?;

    let rng = RefCell::new(StdRng::seed_from_u64(seed));

    while candidates.nvals() > 0 {
        // fresh draw per candidate, scaled by inverse degree; the floor
        // keeps zero-degree residues from stalling forward progress
        let scaled_random = BinaryFunction(|_candidate: bool, degree: f32| {
            let r: f64 = rng.borrow_mut().gen();
            0.0001_f32 + (r as f32) / (1.0 + 2.0 * degree)
        });
        let mut prob = SparseVector::<f32>::new(num_vertices);
        ewise_mult_vector(
            &mut prob,
            &NoMask,
            &NoAccumulate,
            &scaled_random,
            &candidates,
            &degrees,
            OutputControl::Replace,
        )?;

        // largest draw among each candidate's candidate neighbors
        let mut neighbor_max = SparseVector::<f32>::new(num_vertices);
        mxv(
            &mut neighbor_max,
            &candidates,
            &NoAccumulate,
            &MaxSecondSemiring::<f32>::new(),
            graph,
            &prob,
            OutputControl::Replace,
        )?;

        // a candidate with no stored neighbor maximum wins by default;
        // losing comparisons are dropped rather than stored as false
        let mut new_members = SparseVector::<bool>::new(num_vertices);
        for &(i, p) in prob.contents() {
            let selected = match neighbor_max.extract_element(i) {
                Ok(m) => p > m,
                Err(GraphBlasError::NoValue) => true,
                Err(e) => return Err(e),
            };
            if selected {
                new_members.set_element(i, true)?;
            }
        }

        let previous = independent_set.clone();
        ewise_add_vector(
            &mut independent_set,
            &NoMask,
            &NoAccumulate,
            &LogicalOr,
            &previous,
            &new_members,
            OutputControl::Merge,
        )?;

        // candidates := candidates masked by the complement of new_members
        let previous = candidates.clone();
        apply_vector(
            &mut candidates,
            &complement(&new_members),
            &NoAccumulate,
            &Identity::new(),
            &previous,
            OutputControl::Replace,
        )?;
        if candidates.nvals() == 0 {
            break;
        }

        // neighbors of new members leave the pool as well
        let mut new_neighbors = SparseVector::<bool>::new(num_vertices);
        mxv(
            &mut new_neighbors,
            &candidates,
            &NoAccumulate,
            &EdgeWitnessSemiring,
            graph,
            &new_members,
            OutputControl::Replace,
        )?;

        let previous = candidates.clone();
        apply_vector(
            &mut candidates,
            &complement(&new_neighbors),
            &NoAccumulate,
            &Identity::new(),
            &previous,
            OutputControl::Replace,
        )?;

        trace!(
            "mis: {} selected, {} candidates remain",
            independent_set.nvals(),
            candidates.nvals()
        );
    }

    Ok(independent_set)
}

/// Convert the selection flags into vertex ids by stored position.
pub fn vertex_ids(independent_set: &SparseVector<bool>) -> Vec<IndexType> {
    independent_set.contents().iter().map(|&(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mis_rejects_rectangular_graph() {
        let graph = LilMatrix::<f32>::new(3, 4);
        assert!(mis(&graph, 0).is_err());
    }

    #[test]
    fn test_mis_isolated_vertices_are_selected() {
        // no edges at all: every vertex is independent
        let graph = LilMatrix::<f32>::new(4, 4);
        let selected = mis(&graph, 7).unwrap();
        assert_eq!(vertex_ids(&selected), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_mis_single_edge() {
        let graph =
            LilMatrix::from_dense(&[vec![0.0, 1.0], vec![1.0, 0.0]], 0.0).unwrap();
        let selected = mis(&graph, 42).unwrap();
        // exactly one endpoint of the edge is selected
        assert_eq!(selected.nvals(), 1);
    }
}
