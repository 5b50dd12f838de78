//! TriCore-specific lowering components.
//!
//! This module contains the target-specific parts of the lowering stage:
//! - Addressing-mode matching and operand materialization
//! - Node lowering ahead of the generic pattern matcher
//! - Fixup kinds, value encoding and application

pub mod addressing;
pub mod fixup;
pub mod isel;

pub use addressing::{match_address, select_address, AddrBase, AddrMode, AddrSymbol};
pub use fixup::{
    adjust_fixup_value, apply_fixup, resolve_fixups, Fixup, FixupKind, FixupKindInfo,
    FIXUP_KIND_INFO, NUM_FIXUP_KINDS,
};
pub use isel::{lower_node, select_node, Lowered, PatternMatcher, TypeHints};
