// This module implements the addressing-mode matcher: it folds a computation-graph
// subtree into a base/displacement/symbol descriptor usable by load, store and address
// computation instructions. Matching is transactional - every attempt works on its own
// descriptor value and failures simply drop it, so backtracking over the two operand
// orders of an add or the speculative or-to-add folding never leaks partial state into
// the caller's descriptor. The entry point select_address materializes the descriptor
// into (base, displacement) operand nodes, with the symbolic-address special case that
// hands the original expression back as the base.

//! Addressing-mode matching.
//!
//! An address expression is classified into [`AddrMode`]: a register or
//! frame-slot base, an additive displacement, and at most one symbolic
//! anchor. Subtrees that fit nothing become the base register themselves, and
//! a whole expression that cannot be matched at all is left for the caller to
//! lower as a plain pointer with zero offset.

use log::trace;

use crate::dag::{BlockId, Graph, NodeId, NodeKind, SymbolId, ValueType, NO_REGISTER};

/// The variable component anchoring an address.
///
/// `Reg(None)` is the initial state: a register base that no node has claimed
/// yet. At most one node ever becomes the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrBase {
    Reg(Option<NodeId>),
    FrameIndex(i32),
}

impl Default for AddrBase {
    fn default() -> Self {
        AddrBase::Reg(None)
    }
}

/// Symbolic anchor of an address. Mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrSymbol<'arena> {
    Global(SymbolId),
    ConstantPool { index: u32, align: u32 },
    BlockAddress(BlockId),
    External(&'arena str),
    JumpTable(u32),
}

/// Addressing-mode descriptor built up during one matching attempt.
///
/// A plain value: matching clones it per speculative branch and commits a
/// branch by keeping the clone. The symbol slot is private so the only write
/// path is [`AddrMode::set_symbol`], which refuses to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddrMode<'arena> {
    pub base: AddrBase,
    pub disp: i64,
    symbol: Option<AddrSymbol<'arena>>,
}

impl<'arena> AddrMode<'arena> {
    /// An empty descriptor: free register base, zero displacement, no symbol.
    pub fn new() -> Self {
        Self::default()
    }

    /// The symbolic anchor, if one was matched.
    pub fn symbol(&self) -> Option<AddrSymbol<'arena>> {
        self.symbol
    }

    /// Whether a symbolic anchor is already present.
    pub fn has_symbol(&self) -> bool {
        self.symbol.is_some()
    }

    /// Install a symbolic anchor. Returns false (and changes nothing) when a
    /// symbol is already present; two anchors can never coexist.
    pub fn set_symbol(&mut self, symbol: AddrSymbol<'arena>) -> bool {
        if self.symbol.is_some() {
            return false;
        }
        self.symbol = Some(symbol);
        true
    }

    fn base_is_free(&self) -> bool {
        matches!(self.base, AddrBase::Reg(None))
    }
}

/// Try to classify `node` on top of the partial descriptor `am`.
///
/// Returns the extended descriptor on success and `None` on failure; `am`
/// itself is never modified, so a failed attempt leaves the caller exactly
/// where it started.
pub fn match_address<'arena>(
    graph: &Graph<'arena>,
    node: NodeId,
    am: &AddrMode<'arena>,
) -> Option<AddrMode<'arena>> {
    let n = graph.node(node);
    trace!(
        "match_address: {} node {:?}, disp={}",
        n.kind.name(),
        node,
        am.disp
    );

    match n.kind {
        NodeKind::Constant(value) => {
            let mut m = am.clone();
            m.disp = m.disp.wrapping_add(value);
            trace!("match_address: folded constant, disp={}", m.disp);
            Some(m)
        }

        NodeKind::Wrapper => match_wrapper(graph, node, am),

        NodeKind::FrameIndex(index) => {
            if am.base_is_free() {
                let mut m = am.clone();
                m.base = AddrBase::FrameIndex(index);
                Some(m)
            } else {
                match_address_base(node, am)
            }
        }

        NodeKind::Add => {
            let lhs = n.operand(0);
            let rhs = n.operand(1);
            // Try both operand orders; each order runs on its own descriptor
            // and commits only if both operands match.
            if let Some(m) =
                match_address(graph, lhs, am).and_then(|m| match_address(graph, rhs, &m))
            {
                return Some(m);
            }
            if let Some(m) =
                match_address(graph, rhs, am).and_then(|m| match_address(graph, lhs, &m))
            {
                return Some(m);
            }
            match_address_base(node, am)
        }

        // Handle "x | c" as "x + c" iff x is known to have c's bits clear.
        NodeKind::Or => {
            if let NodeKind::Constant(value) = graph.node(n.operand(1)).kind {
                if let Some(mut m) = match_address(graph, n.operand(0), am) {
                    // The displacement slot must not have been claimed by a
                    // global, and the left side must prove the or is an add.
                    if !matches!(m.symbol(), Some(AddrSymbol::Global(_)))
                        && graph.masked_value_is_zero(n.operand(0), value as u64)
                    {
                        m.disp = m.disp.wrapping_add(value);
                        trace!("match_address: or folded as add, disp={}", m.disp);
                        return Some(m);
                    }
                }
            }
            match_address_base(node, am)
        }

        _ => match_address_base(node, am),
    }
}

/// Try to match a wrapper node. Wrappers hold things that resolve down to a
/// symbol reference; once the descriptor has any symbol, another can never
/// match.
fn match_wrapper<'arena>(
    graph: &Graph<'arena>,
    node: NodeId,
    am: &AddrMode<'arena>,
) -> Option<AddrMode<'arena>> {
    if am.has_symbol() {
        trace!("match_wrapper: symbolic displacement already taken");
        return None;
    }

    let mut m = am.clone();
    if let NodeKind::GlobalAddress { sym, offset } = graph.node(graph.node(node).operand(0)).kind {
        m.set_symbol(AddrSymbol::Global(sym));
        m.disp = m.disp.wrapping_add(offset);
        trace!("match_wrapper: global {} at disp {}", sym, m.disp);
    }
    // Other wrapped operands match as a no-op.
    Some(m)
}

/// Fallback: the node itself becomes the base register, provided the base is
/// still unclaimed.
fn match_address_base<'arena>(node: NodeId, am: &AddrMode<'arena>) -> Option<AddrMode<'arena>> {
    if !am.base_is_free() {
        return None;
    }
    let mut m = am.clone();
    m.base = AddrBase::Reg(Some(node));
    Some(m)
}

/// Match a full address expression and materialize its operands.
///
/// Returns `(base, displacement)` node ids on success. On failure the caller
/// synthesizes the trivial "pointer register plus zero" form itself.
///
/// When a symbol was resolved, the base is the original, unmodified input
/// node rather than any matched register: symbolic addresses bypass base
/// folding and are re-lowered from the full expression downstream.
pub fn select_address<'arena>(
    graph: &mut Graph<'arena>,
    node: NodeId,
) -> Option<(NodeId, NodeId)> {
    let am = match match_address(graph, node, &AddrMode::new()) {
        Some(am) => am,
        None => {
            graph.session().note_address_fallback();
            return None;
        }
    };

    let mut base = match am.base {
        AddrBase::FrameIndex(index) => {
            graph.add(NodeKind::TargetFrameIndex(index), ValueType::Ptr, &[])
        }
        AddrBase::Reg(Some(reg)) => reg,
        AddrBase::Reg(None) => {
            let ty = graph.node(node).ty;
            graph.register(NO_REGISTER, ty)
        }
    };

    if am.has_symbol() {
        base = node;
    }
    let disp = graph.target_constant(am.disp);

    graph.session().note_address_matched();
    trace!("select_address: base {:?}, disp {}", base, am.disp);
    Some((base, disp))
}
