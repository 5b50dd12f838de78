//! Conservative known-zero-bits analysis.
//!
//! The address matcher folds `x | c` into `x + c` only when the two are
//! provably equivalent, which requires every bit set in `c` to be zero in
//! `x`. The analysis here is the usual conservative over-approximation: a set
//! bit in the result means "provably zero", a clear bit means "unknown".

use super::graph::{Graph, NodeId};
use super::node::NodeKind;

/// Recursion limit; deeper expressions give up and claim nothing.
const MAX_DEPTH: u32 = 6;

impl Graph<'_> {
    /// Bitmask of positions provably zero in the value of `id`.
    pub fn known_zero_bits(&self, id: NodeId) -> u64 {
        self.known_zero(id, 0)
    }

    /// True when every bit set in `mask` is provably zero in `id`.
    pub fn masked_value_is_zero(&self, id: NodeId, mask: u64) -> bool {
        mask & !self.known_zero_bits(id) == 0
    }

    fn known_zero(&self, id: NodeId, depth: u32) -> u64 {
        if depth >= MAX_DEPTH {
            return 0;
        }
        let node = self.node(id);
        match node.kind {
            NodeKind::Constant(value) | NodeKind::TargetConstant(value) => !(value as u64),
            // A bit is zero in an AND if it is zero in either input.
            NodeKind::And => {
                self.known_zero(node.operand(0), depth + 1)
                    | self.known_zero(node.operand(1), depth + 1)
            }
            // A bit is zero in an OR only if it is zero in both inputs.
            NodeKind::Or => {
                self.known_zero(node.operand(0), depth + 1)
                    & self.known_zero(node.operand(1), depth + 1)
            }
            NodeKind::Shl => match self.node(node.operand(1)).kind {
                NodeKind::Constant(amount) if (0..64).contains(&amount) => {
                    let amount = amount as u32;
                    (self.known_zero(node.operand(0), depth + 1) << amount)
                        | ((1u64 << amount) - 1)
                }
                _ => 0,
            },
            _ => 0,
        }
    }
}
