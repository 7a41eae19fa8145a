//! Positional lookup of nodes inside a subtree
//!
//! The IR keeps no positional indices, so the checker re-derives "the n-th
//! term of this expression" by searching. A search visits the descendants of
//! the root depth-first, left before right, and follows two rules:
//!
//! - a matching node is counted, but its own descendants are not searched
//! - a production at the same level as the root or shallower (for example a
//!   parenthesized expression below an expression) belongs to a nested
//!   construct and is not entered
//!
//! The root itself is never a match.

use crate::{Production, kind::NodeKind, node::IrNode};

/// Returns the `n`-th (0-indexed) descendant of `root` of kind `kind`
#[must_use]
pub fn find_nth_of_type(root: &IrNode, kind: NodeKind, n: usize) -> Option<&IrNode> {
    find_nth_of_types(root, &[kind], n)
}

/// Returns the `n`-th (0-indexed) descendant of `root` whose kind is any of `kinds`
#[must_use]
pub fn find_nth_of_types<'a>(root: &'a IrNode, kinds: &[NodeKind], n: usize) -> Option<&'a IrNode> {
    let mut search = Search {
        kinds,
        barrier: root.kind().level(),
        remaining: n,
    };

    root.children().find_map(|child| search.visit(child))
}

/// Returns the `n`-th (0-indexed) descendant of `root` that starts `production`
#[must_use]
pub fn find_nth_of_production(root: &IrNode, production: Production, n: usize) -> Option<&IrNode> {
    find_nth_of_types(root, production.first_set(), n)
}

/// Returns every descendant of `root` of kind `kind`, in document order
pub fn all_of_type(root: &IrNode, kind: NodeKind) -> impl Iterator<Item = &IrNode> {
    (0..).map_while(move |n| find_nth_of_type(root, kind, n))
}

struct Search<'k> {
    kinds: &'k [NodeKind],
    barrier: Option<u8>,
    remaining: usize,
}

impl Search<'_> {
    fn visit<'a>(&mut self, node: &'a IrNode) -> Option<&'a IrNode> {
        if self.kinds.contains(&node.kind()) {
            if self.remaining == 0 {
                return Some(node);
            }
            self.remaining -= 1;
            return None;
        }

        if self.is_barrier(node) {
            return None;
        }

        if let Some(found) = node.left().and_then(|left| self.visit(left)) {
            return Some(found);
        }

        node.right().and_then(|right| self.visit(right))
    }

    fn is_barrier(&self, node: &IrNode) -> bool {
        match (self.barrier, node.kind().level()) {
            (Some(barrier), Some(level)) => level <= barrier,
            (None, _) | (_, None) => false,
        }
    }
}
