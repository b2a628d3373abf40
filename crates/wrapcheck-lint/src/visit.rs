// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! AST traversal delivering enter/exit events to the checker.
//!
//! The walker owns traversal order; the visitor only reacts to events in
//! the order they are delivered, like a rule driven by a host analysis
//! engine. Depth-first, single pass, no suspension.

use wrapcheck_ast::expr::{ArrowBody, Expr, ExprKind};
use wrapcheck_ast::stmt::{Program, Stmt, StmtKind};
use wrapcheck_ast::NodeId;

/// Callbacks for the node kinds the checker cares about.
pub trait Visitor {
    fn enter_call(&mut self, _call: &Expr) {}
    fn enter_function(&mut self, _id: NodeId) {}
    fn exit_function(&mut self, _id: NodeId) {}
}

pub fn walk_program<V: Visitor>(program: &Program, visitor: &mut V) {
    for stmt in &program.body {
        walk_stmt(stmt, visitor);
    }
}

fn walk_stmts<V: Visitor>(stmts: &[Stmt], visitor: &mut V) {
    for stmt in stmts {
        walk_stmt(stmt, visitor);
    }
}

fn walk_stmt<V: Visitor>(stmt: &Stmt, visitor: &mut V) {
    match &stmt.kind {
        StmtKind::Import { .. } => {}
        StmtKind::FunctionDecl { body, .. } => {
            visitor.enter_function(stmt.id);
            walk_stmts(body, visitor);
            visitor.exit_function(stmt.id);
        }
        StmtKind::Const { init, .. } => walk_expr(init, visitor),
        StmtKind::Let { init, .. } => {
            if let Some(init) = init {
                walk_expr(init, visitor);
            }
        }
        StmtKind::Expr(expr) | StmtKind::Throw(expr) => walk_expr(expr, visitor),
        StmtKind::Return(value) => {
            if let Some(value) = value {
                walk_expr(value, visitor);
            }
        }
        StmtKind::If { cond, then_branch, else_branch } => {
            walk_expr(cond, visitor);
            walk_stmts(then_branch, visitor);
            if let Some(else_branch) = else_branch {
                walk_stmts(else_branch, visitor);
            }
        }
    }
}

fn walk_expr<V: Visitor>(expr: &Expr, visitor: &mut V) {
    match &expr.kind {
        ExprKind::Call { callee, args, .. } => {
            visitor.enter_call(expr);
            walk_expr(callee, visitor);
            for arg in args {
                walk_expr(arg, visitor);
            }
        }
        ExprKind::Function { body, .. } => {
            visitor.enter_function(expr.id);
            walk_stmts(body, visitor);
            visitor.exit_function(expr.id);
        }
        ExprKind::Arrow { body, .. } => {
            visitor.enter_function(expr.id);
            match body {
                ArrowBody::Expr(inner) => walk_expr(inner, visitor),
                ArrowBody::Block(stmts) => walk_stmts(stmts, visitor),
            }
            visitor.exit_function(expr.id);
        }
        ExprKind::New { callee, args } => {
            walk_expr(callee, visitor);
            for arg in args {
                walk_expr(arg, visitor);
            }
        }
        ExprKind::Member { object, .. } => walk_expr(object, visitor),
        ExprKind::Await(inner) => walk_expr(inner, visitor),
        ExprKind::Unary { operand, .. } => walk_expr(operand, visitor),
        ExprKind::Binary { left, right, .. } => {
            walk_expr(left, visitor);
            walk_expr(right, visitor);
        }
        ExprKind::Assign { target, value } => {
            walk_expr(target, visitor);
            walk_expr(value, visitor);
        }
        ExprKind::Array(items) => {
            for item in items {
                walk_expr(item, visitor);
            }
        }
        ExprKind::Object(props) => {
            for prop in props {
                walk_expr(&prop.value, visitor);
            }
        }
        ExprKind::Number(_)
        | ExprKind::String(_)
        | ExprKind::Bool(_)
        | ExprKind::Null
        | ExprKind::Undefined
        | ExprKind::Ident(_) => {}
    }
}
