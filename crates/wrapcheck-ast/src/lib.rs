// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Abstract Syntax Tree types for the analyzed TypeScript subset.
//!
//! This crate defines the AST nodes shared between the lexer, parser,
//! and the lint rule.

pub mod span;
pub mod token;
pub mod ty;
pub mod expr;
pub mod stmt;

pub use span::{LineMap, Span};

/// Unique identifier for AST nodes.
///
/// Function literals are matched to their enclosing wrap construct by
/// node identity, not by name; anonymous functions have no name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const DUMMY: NodeId = NodeId(u32::MAX);
}
