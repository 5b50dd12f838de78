// This module provides the graph storage consumed by instruction selection. Graph owns
// the node list for one function, tracks consumer counts on every operand edge, and
// offers the two mutation paths selection needs: appending a fresh node and morphing an
// existing node in place into a machine instruction while preserving its identity for
// other consumers. Convenience constructors cover the node shapes tests and drivers
// build most often. The graph borrows the selection session so node creation feeds the
// session statistics and symbol names can be interned with the arena lifetime.

//! Graph storage and construction.

use crate::core::SelectionSession;

use super::node::{MachineOp, MemAccess, Node, NodeKind, SymbolId, ValueType};

/// Index of a node within its [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Computation graph for a single function.
pub struct Graph<'arena> {
    session: &'arena SelectionSession<'arena>,
    nodes: Vec<Node<'arena>>,
}

impl<'arena> Graph<'arena> {
    /// Create an empty graph tied to the given session.
    pub fn new(session: &'arena SelectionSession<'arena>) -> Self {
        Self {
            session,
            nodes: Vec::new(),
        }
    }

    /// The session this graph allocates into.
    pub fn session(&self) -> &'arena SelectionSession<'arena> {
        self.session
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Immutable access to a node.
    pub fn node(&self, id: NodeId) -> &Node<'arena> {
        &self.nodes[id.index()]
    }

    /// Append a node with the given operand edges.
    pub fn add(&mut self, kind: NodeKind<'arena>, ty: ValueType, ops: &[NodeId]) -> NodeId {
        for &op in ops {
            self.nodes[op.index()].uses += 1;
        }
        self.nodes.push(Node {
            kind,
            ty,
            ops: ops.to_vec(),
            uses: 0,
        });
        self.session.note_node_created();
        NodeId(self.nodes.len() as u32 - 1)
    }

    /// Whether `id` has exactly one consumer.
    pub fn has_one_use(&self, id: NodeId) -> bool {
        self.node(id).uses == 1
    }

    /// Replace `id` in place with a machine instruction, keeping its identity
    /// so existing consumers see the lowered form without edge rewrites.
    pub fn morph(
        &mut self,
        id: NodeId,
        op: MachineOp,
        ty: ValueType,
        ops: &[NodeId],
    ) -> NodeId {
        for &operand in ops {
            self.nodes[operand.index()].uses += 1;
        }
        let old_ops = std::mem::take(&mut self.nodes[id.index()].ops);
        self.nodes[id.index()].kind = NodeKind::Machine(op);
        self.nodes[id.index()].ty = ty;
        self.nodes[id.index()].ops = ops.to_vec();
        for operand in old_ops {
            self.nodes[operand.index()].uses -= 1;
        }
        id
    }

    /// Append a machine instruction node.
    pub fn add_machine(&mut self, op: MachineOp, ty: ValueType, ops: &[NodeId]) -> NodeId {
        self.add(NodeKind::Machine(op), ty, ops)
    }

    /// An integer constant node.
    pub fn constant(&mut self, value: i64) -> NodeId {
        self.add(NodeKind::Constant(value), ValueType::I32, &[])
    }

    /// A constant operand committed to an instruction encoding.
    pub fn target_constant(&mut self, value: i64) -> NodeId {
        self.add(NodeKind::TargetConstant(value), ValueType::I32, &[])
    }

    /// A register-valued leaf.
    pub fn register(&mut self, reg: u16, ty: ValueType) -> NodeId {
        self.add(NodeKind::Register(reg), ty, &[])
    }

    /// A stack frame slot reference.
    pub fn frame_index(&mut self, index: i32) -> NodeId {
        self.add(NodeKind::FrameIndex(index), ValueType::Ptr, &[])
    }

    /// A global symbol reference with a declared byte offset.
    pub fn global(&mut self, sym: SymbolId, offset: i64) -> NodeId {
        self.add(NodeKind::GlobalAddress { sym, offset }, ValueType::Ptr, &[])
    }

    /// A symbol wrapper around `inner`.
    pub fn wrapper(&mut self, inner: NodeId) -> NodeId {
        self.add(NodeKind::Wrapper, ValueType::Ptr, &[inner])
    }

    /// A two-operand node; the result type follows the left operand.
    pub fn binary(&mut self, kind: NodeKind<'arena>, lhs: NodeId, rhs: NodeId) -> NodeId {
        let ty = self.node(lhs).ty;
        self.add(kind, ty, &[lhs, rhs])
    }

    /// A load of `mem.ty` from the address `addr`.
    pub fn load(&mut self, addr: NodeId, mem: MemAccess) -> NodeId {
        self.add(NodeKind::Load(mem), mem.ty, &[addr])
    }

    /// A store of `value` to the address `addr`.
    pub fn store(&mut self, value: NodeId, addr: NodeId, mem: MemAccess) -> NodeId {
        self.add(NodeKind::Store(mem), mem.ty, &[value, addr])
    }
}
