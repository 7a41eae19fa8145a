//! The IR tree consumed by the Newton dimension checker
//!
//! An AST producer builds an [`IrNode`] tree for every constraint list and
//! parameter list. Nodes are binary: each node has an optional left and right
//! child, and longer sequences are chained through [`NodeKind::Sequence`]
//! nodes on the right spine. The tree does not record positional indices, so
//! consumers use the [locator](crate::locator) to find "the n-th term of this
//! expression" or "the first comparison operator of this constraint".
//!
//! The [`build`] module offers helpers that assemble trees in the shape the
//! checker expects.

pub mod build;
mod kind;
pub mod locator;
mod node;
pub mod parameter;

pub use kind::{NodeKind, Production};
pub use node::IrNode;
