//! Machine-specific lowering for a TriCore compiler backend.
//!
//! This crate hosts the stage between a target-independent computation graph
//! and final instruction encoding: the addressing-mode matcher that folds
//! address arithmetic into base/displacement/symbol operands, the node
//! lowering dispatcher that intercepts a handful of node categories ahead of
//! the generic pattern tables, and the fixup encoder/applier that re-packs
//! resolved values into split-immediate instruction fields.
//!
//! # Primary Usage
//!
//! ```ignore
//! use bumpalo::Bump;
//! use tricore_codegen::{Graph, SelectionSession};
//! use tricore_codegen::tricore::{select_address, select_node};
//!
//! // One session per selected function.
//! let arena = Bump::new();
//! let session = SelectionSession::new(&arena);
//! let mut graph = Graph::new(&session);
//!
//! // ... build the function's graph, then classify address expressions
//! // with select_address and lower nodes with select_node ...
//! ```
//!
//! # Architecture
//!
//! - [`dag`] - Computation-graph abstraction (nodes, edges, known bits)
//! - [`core`] - Shared infrastructure (session, statistics, errors)
//! - [`tricore`] - Target-specific selection and fixup encoding

pub mod core;
pub mod dag;
pub mod tricore;

// Re-export the types most drivers touch.
pub use crate::core::{SelectError, SelectResult, SelectionSession, SessionStats};
pub use dag::{Graph, MachineOp, NodeId, NodeKind, ValueType};
pub use tricore::{AddrMode, Fixup, FixupKind, PatternMatcher, TypeHints};
