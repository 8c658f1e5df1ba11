// Algorithms composed from the primitive operations

pub mod mis;

pub use mis::{mis, vertex_ids};
