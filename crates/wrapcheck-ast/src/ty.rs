// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type annotation AST nodes.
//!
//! Only the shapes the checker reasons about are modeled: named references,
//! `typeof` queries, and flat unions. There is no general type algebra.

use crate::{NodeId, Span};

/// A type expression in annotation or type-argument position.
#[derive(Debug, Clone)]
pub struct TypeExpr {
    pub id: NodeId,
    pub kind: TypeKind,
    pub span: Span,
}

/// The kind of type expression.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// Named type reference (`string`, `Promise`)
    Named(String),
    /// Type query (`typeof fetchUser`)
    Typeof {
        name: String,
        /// Span of the queried identifier alone.
        name_span: Span,
    },
    /// Flat union (`A | B | C`); members are never unions themselves.
    Union(Vec<TypeExpr>),
}

/// An explicit type-argument list at a call site (`f<T | U>(...)`).
///
/// The span covers the whole list including the angle brackets, which is
/// what a replacement fix must cover.
#[derive(Debug, Clone)]
pub struct TypeArgList {
    pub span: Span,
    pub args: Vec<TypeExpr>,
}
