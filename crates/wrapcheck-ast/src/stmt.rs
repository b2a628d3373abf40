//! Statement AST nodes.

use crate::expr::{Expr, Param};
use crate::ty::TypeExpr;
use crate::{NodeId, Span};

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct Program {
    pub body: Vec<Stmt>,
}

/// A statement in the AST.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: NodeId,
    pub kind: StmtKind,
    pub span: Span,
}

/// The kind of statement.
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Named import (`import { a, b } from "mod"`)
    Import {
        names: Vec<String>,
        module: String,
    },
    /// Function declaration
    FunctionDecl {
        is_export: bool,
        is_async: bool,
        name: String,
        params: Vec<Param>,
        body: Vec<Stmt>,
    },
    /// Const binding
    Const {
        name: String,
        ty: Option<TypeExpr>,
        init: Expr,
    },
    /// Let binding (initializer optional)
    Let {
        name: String,
        ty: Option<TypeExpr>,
        init: Option<Expr>,
    },
    /// Expression statement
    Expr(Expr),
    /// Return statement
    Return(Option<Expr>),
    /// Throw statement
    Throw(Expr),
    /// If statement
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },
}
