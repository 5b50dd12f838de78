// This module implements the node lowering dispatcher that runs ahead of the generic
// table-driven pattern matcher. It lowers frame-index and negate nodes directly into
// AddImm/RevSub machine nodes (reusing the node's identity when it has exactly one
// consumer), inspects loads for diagnostics, and derives the pointer/integer type hints
// a store needs the generic matcher to see. The hints travel as an explicit value with
// the deferral outcome instead of process-wide flags, so interleaved or re-entrant
// selection of multiple nodes cannot corrupt them.

//! Node lowering ahead of the generic matcher.

use log::{debug, trace};

use crate::core::{SelectError, SelectResult};
use crate::dag::{Graph, MachineOp, NodeId, NodeKind, ValueType};

/// Value-shape hints for the generic matcher's pattern predicates.
///
/// Computed per node and passed along with the deferral; nothing here
/// outlives one `select_node` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeHints {
    pointer: bool,
    integer: bool,
}

impl TypeHints {
    /// Hints describing a value of type `ty`.
    pub fn for_value(ty: ValueType) -> Self {
        Self {
            pointer: ty.is_pointer(),
            integer: ty.is_integer(),
        }
    }

    /// Whether the node under selection moves a pointer-shaped value.
    pub fn is_pointer(self) -> bool {
        self.pointer
    }

    /// Whether the node under selection moves an integer-shaped value.
    pub fn is_integer(self) -> bool {
        self.integer
    }
}

/// Outcome of the dispatcher for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lowered {
    /// The node was lowered here; the id refers to the machine node.
    Selected(NodeId),
    /// Not handled; hand to the generic matcher with these hints.
    Defer(TypeHints),
}

/// The generic table-driven instruction matcher behind this dispatcher.
///
/// Implemented by the driver; patterns receive the type hints through their
/// predicate evaluation rather than through shared state.
pub trait PatternMatcher {
    /// Map `node` onto a machine instruction, or report no pattern fits.
    fn match_patterns(
        &mut self,
        graph: &mut Graph<'_>,
        node: NodeId,
        hints: TypeHints,
    ) -> Option<NodeId>;
}

/// Lower the special-cased node categories; defer everything else.
///
/// This never hard-fails: "defer" is the uniform non-match outcome.
pub fn lower_node(graph: &mut Graph<'_>, node: NodeId) -> Lowered {
    let kind = graph.node(node).kind;
    match kind {
        NodeKind::FrameIndex(index) => {
            let tfi = graph.add(NodeKind::TargetFrameIndex(index), ValueType::Ptr, &[]);
            let zero = graph.target_constant(0);
            let id = if graph.has_one_use(node) {
                graph.morph(node, MachineOp::AddImm, ValueType::I32, &[tfi, zero])
            } else {
                graph.add_machine(MachineOp::AddImm, ValueType::I32, &[tfi, zero])
            };
            trace!("lower: frame index {} -> AddImm {:?}", index, id);
            Lowered::Selected(id)
        }

        NodeKind::Neg => {
            let operand = graph.node(node).operand(0);
            let zero = graph.target_constant(0);
            let id = if graph.has_one_use(node) {
                graph.morph(node, MachineOp::RevSub, ValueType::I32, &[operand, zero])
            } else {
                graph.add_machine(MachineOp::RevSub, ValueType::I32, &[operand, zero])
            };
            trace!("lower: neg -> RevSub {:?}", id);
            Lowered::Selected(id)
        }

        NodeKind::Store(_) => {
            let stored = graph.node(graph.node(node).operand(0));
            let hints = TypeHints::for_value(stored.ty);
            trace!("lower: store defers, pointer={}", hints.is_pointer());
            Lowered::Defer(hints)
        }

        NodeKind::Load(mem) => {
            debug!(
                "lower: load align={} ext={:?} mem_ty={:?} operands={}",
                mem.align,
                mem.ext,
                mem.ty,
                graph.node(node).operands().len()
            );
            Lowered::Defer(TypeHints::default())
        }

        _ => Lowered::Defer(TypeHints::default()),
    }
}

/// Select one node: run the dispatcher, then fall back to the generic
/// matcher. A node neither side can cover is a hard selection error.
pub fn select_node<M: PatternMatcher>(
    graph: &mut Graph<'_>,
    node: NodeId,
    matcher: &mut M,
) -> SelectResult<NodeId> {
    match lower_node(graph, node) {
        Lowered::Selected(id) => {
            graph.session().note_node_lowered();
            Ok(id)
        }
        Lowered::Defer(hints) => {
            graph.session().note_node_deferred();
            matcher
                .match_patterns(graph, node, hints)
                .ok_or_else(|| SelectError::CannotSelect {
                    node,
                    kind: graph.node(node).kind.name().to_string(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SelectionSession;
    use crate::dag::MemAccess;
    use bumpalo::Bump;

    #[test]
    fn frame_index_with_one_use_is_morphed_in_place() {
        let arena = Bump::new();
        let session = SelectionSession::new(&arena);
        let mut graph = Graph::new(&session);

        let fi = graph.frame_index(4);
        let _load = graph.load(fi, MemAccess::word());

        let Lowered::Selected(id) = lower_node(&mut graph, fi) else {
            panic!("frame index must be lowered directly");
        };
        assert_eq!(id, fi);
        assert_eq!(graph.node(id).kind, NodeKind::Machine(MachineOp::AddImm));
        let ops = graph.node(id).operands().to_vec();
        assert_eq!(graph.node(ops[0]).kind, NodeKind::TargetFrameIndex(4));
        assert_eq!(graph.node(ops[1]).kind, NodeKind::TargetConstant(0));
    }

    #[test]
    fn shared_frame_index_gets_a_fresh_machine_node() {
        let arena = Bump::new();
        let session = SelectionSession::new(&arena);
        let mut graph = Graph::new(&session);

        let fi = graph.frame_index(4);
        let _first = graph.load(fi, MemAccess::word());
        let _second = graph.load(fi, MemAccess::word());

        let Lowered::Selected(id) = lower_node(&mut graph, fi) else {
            panic!("frame index must be lowered directly");
        };
        assert_ne!(id, fi);
        assert_eq!(graph.node(fi).kind, NodeKind::FrameIndex(4));
        assert_eq!(graph.node(id).kind, NodeKind::Machine(MachineOp::AddImm));
    }

    #[test]
    fn neg_lowers_to_reverse_subtract() {
        let arena = Bump::new();
        let session = SelectionSession::new(&arena);
        let mut graph = Graph::new(&session);

        let r = graph.register(3, ValueType::I32);
        let neg = graph.add(NodeKind::Neg, ValueType::I32, &[r]);
        let _user = graph.add(NodeKind::Opaque("copy-out"), ValueType::I32, &[neg]);

        let Lowered::Selected(id) = lower_node(&mut graph, neg) else {
            panic!("neg must be lowered directly");
        };
        assert_eq!(id, neg);
        assert_eq!(graph.node(id).kind, NodeKind::Machine(MachineOp::RevSub));
        assert_eq!(graph.node(id).operand(0), r);
    }

    #[test]
    fn store_defers_with_value_shape_hints() {
        let arena = Bump::new();
        let session = SelectionSession::new(&arena);
        let mut graph = Graph::new(&session);

        let ptr_val = graph.register(2, ValueType::Ptr);
        let addr = graph.frame_index(0);
        let store = graph.store(ptr_val, addr, MemAccess::word());

        let Lowered::Defer(hints) = lower_node(&mut graph, store) else {
            panic!("stores are not lowered here");
        };
        assert!(hints.is_pointer());
        assert!(!hints.is_integer());

        let int_val = graph.register(3, ValueType::I32);
        let addr2 = graph.frame_index(1);
        let store2 = graph.store(int_val, addr2, MemAccess::word());
        let Lowered::Defer(hints) = lower_node(&mut graph, store2) else {
            panic!("stores are not lowered here");
        };
        assert!(!hints.is_pointer());
        assert!(hints.is_integer());
    }

    #[test]
    fn load_defers_with_empty_hints() {
        let arena = Bump::new();
        let session = SelectionSession::new(&arena);
        let mut graph = Graph::new(&session);

        let addr = graph.register(2, ValueType::Ptr);
        let load = graph.load(addr, MemAccess::word());

        assert_eq!(
            lower_node(&mut graph, load),
            Lowered::Defer(TypeHints::default())
        );
    }

    struct RejectAll;

    impl PatternMatcher for RejectAll {
        fn match_patterns(
            &mut self,
            _graph: &mut Graph<'_>,
            _node: NodeId,
            _hints: TypeHints,
        ) -> Option<NodeId> {
            None
        }
    }

    #[test]
    fn double_miss_is_a_selection_error() {
        let arena = Bump::new();
        let session = SelectionSession::new(&arena);
        let mut graph = Graph::new(&session);

        let name = session.intern_str("trap");
        let node = graph.add(NodeKind::Opaque(name), ValueType::I32, &[]);

        let err = select_node(&mut graph, node, &mut RejectAll).unwrap_err();
        assert_eq!(
            err,
            SelectError::CannotSelect {
                node,
                kind: "trap".to_string()
            }
        );
    }
}
