// This module provides arena-based selection session management using the bumpalo crate
// to simplify lifetime management during instruction selection. SelectionSession owns the
// string interner and the per-session statistics while borrowing the caller's arena, so
// every graph node, interned symbol name and diagnostic string shares one lifetime. The
// statistics record how often the addressing-mode matcher succeeded versus fell back to a
// plain register base, and how many nodes the lowering dispatcher handled itself versus
// deferred to the generic pattern tables. Counters live behind a RefCell so the graph and
// the selectors can update them through shared references.

//! Arena-backed selection session.
//!
//! One session covers the selection of a single function: the graph, the
//! interned strings and the statistics all borrow the session's arena and are
//! dropped together when the driver moves on.

use bumpalo::Bump;
use std::collections::HashMap;
use std::cell::RefCell;

/// Counters collected while selecting one function.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// Graph nodes created, including target nodes materialized by selection.
    pub nodes_created: usize,
    /// Address expressions folded into a base/displacement descriptor.
    pub addresses_matched: usize,
    /// Address expressions that did not fit any addressing mode.
    pub address_fallbacks: usize,
    /// Nodes lowered directly by the dispatcher.
    pub nodes_lowered: usize,
    /// Nodes handed to the generic pattern matcher.
    pub nodes_deferred: usize,
}

/// Arena-backed state shared across one selection run.
pub struct SelectionSession<'arena> {
    /// Arena allocator for node names and symbol strings.
    arena: &'arena Bump,

    /// Statistics for debugging and tuning.
    stats: RefCell<SessionStats>,

    /// String interning for external-symbol and opaque node names.
    interned_strings: RefCell<HashMap<String, &'arena str>>,
}

impl<'arena> SelectionSession<'arena> {
    /// Create a session borrowing the given arena.
    pub fn new(arena: &'arena Bump) -> Self {
        Self {
            arena,
            stats: RefCell::new(SessionStats::default()),
            interned_strings: RefCell::new(HashMap::new()),
        }
    }

    /// Get access to the arena allocator.
    pub fn arena(&self) -> &'arena Bump {
        self.arena
    }

    /// Intern a string in the arena.
    pub fn intern_str(&self, s: &str) -> &'arena str {
        let mut strings = self.interned_strings.borrow_mut();
        if let Some(&interned) = strings.get(s) {
            return interned;
        }

        let interned: &'arena str = self.arena.alloc_str(s);
        strings.insert(s.to_string(), interned);
        interned
    }

    /// Snapshot of the current statistics.
    pub fn stats(&self) -> SessionStats {
        self.stats.borrow().clone()
    }

    pub(crate) fn note_node_created(&self) {
        self.stats.borrow_mut().nodes_created += 1;
    }

    pub(crate) fn note_address_matched(&self) {
        self.stats.borrow_mut().addresses_matched += 1;
    }

    pub(crate) fn note_address_fallback(&self) {
        self.stats.borrow_mut().address_fallbacks += 1;
    }

    pub(crate) fn note_node_lowered(&self) {
        self.stats.borrow_mut().nodes_lowered += 1;
    }

    pub(crate) fn note_node_deferred(&self) {
        self.stats.borrow_mut().nodes_deferred += 1;
    }
}
