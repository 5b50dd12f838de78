//! Computation-graph abstraction consumed by the lowering stage.
//!
//! The driver builds one [`Graph`] per function; the selectors in
//! [`crate::tricore`] classify and rewrite its nodes. Node categories are a
//! closed sum type ([`NodeKind`]), operand edges carry consumer counts for the
//! single-use reuse optimization, and a conservative known-zero-bits analysis
//! backs the or-to-add folding proof.

pub mod graph;
mod known_bits;
pub mod node;

pub use graph::{Graph, NodeId};
pub use node::{
    BlockId, LoadExt, MachineOp, MemAccess, Node, NodeKind, SymbolId, ValueType, NO_REGISTER,
};
