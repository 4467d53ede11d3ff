//! Scalar reference kernels.
//!
//! These are the `Scalar` tier and the correctness baseline every vector
//! tier is checked against.

pub mod naive_ikj;
