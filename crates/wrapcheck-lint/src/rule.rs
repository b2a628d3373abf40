// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The wrap/unwrap consistency rule.
//!
//! Tracks open wrap constructs on a scope stack while the walker delivers
//! enter/exit events, then reconciles each construct's declared type
//! parameters against the calls actually unwrapped inside its body. Every
//! inconsistency is an independent diagnostic; nothing aborts traversal.

use wrapcheck_ast::expr::{Expr, ExprKind};
use wrapcheck_ast::ty::{TypeArgList, TypeExpr, TypeKind};
use wrapcheck_ast::{NodeId, Span};
use wrapcheck_diagnostics::Diagnostic;

use crate::scope::WrapScope;
use crate::visit::Visitor;

/// The checker. One instance per linted file.
pub struct WrapConsistency<'a> {
    wrap_name: &'a str,
    unwrap_name: &'a str,
    /// Top of the scope stack; `None` outside any wrap construct.
    scope: Option<Box<WrapScope>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> WrapConsistency<'a> {
    pub fn new(wrap_name: &'a str, unwrap_name: &'a str) -> Self {
        Self {
            wrap_name,
            unwrap_name,
            scope: None,
            diagnostics: Vec::new(),
        }
    }

    /// Consume the checker, returning the collected diagnostics.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// The wrap-open shape: `wrap<...>(...)(async fn)`, an outer call
    /// whose callee is itself a call to the bare wrap identifier, with the
    /// outer call taking exactly one argument, an async function literal.
    ///
    /// Returns the wrap identifier span, the explicit type-argument list,
    /// and the function literal's node id.
    fn match_wrap_open(&self, call: &Expr) -> Option<(Span, Option<TypeArgList>, NodeId)> {
        let ExprKind::Call { callee, args, .. } = &call.kind else {
            return None;
        };
        if args.len() != 1 || !args[0].is_async_fn_literal() {
            return None;
        }
        let ExprKind::Call { callee: inner_callee, type_args, .. } = &callee.kind else {
            return None;
        };
        let ExprKind::Ident(name) = &inner_callee.kind else {
            return None;
        };
        if name != self.wrap_name {
            return None;
        }
        Some((inner_callee.span, type_args.clone(), args[0].id))
    }

    /// Recognize an unwrap call inside the active scope's body and record
    /// the name of the function it unwraps.
    fn check_unwrap(&mut self, call: &Expr) {
        let active = matches!(&self.scope, Some(scope) if scope.entered_body);
        if !active {
            return;
        }
        let ExprKind::Call { callee, args, .. } = &call.kind else {
            return;
        };
        let ExprKind::Ident(name) = &callee.kind else {
            return;
        };
        if name != self.unwrap_name || args.len() != 1 {
            return;
        }

        // Peel at most one await wrapper; this is a fixed peel, not a
        // general expression unwrapper.
        let arg = &args[0];
        let inner = match &arg.kind {
            ExprKind::Await(inner) => inner.as_ref(),
            _ => arg,
        };

        let unwrapped = match &inner.kind {
            ExprKind::Call { callee, .. } => match &callee.kind {
                ExprKind::Ident(fn_name) => Some((fn_name.clone(), inner.span)),
                _ => None,
            },
            _ => None,
        };

        match unwrapped {
            Some((fn_name, span)) => {
                if let Some(scope) = self.scope.as_deref_mut() {
                    scope.record_unwrap(&fn_name, span);
                }
            }
            None => {
                // Reported eagerly and excluded from reconciliation.
                self.report(
                    Diagnostic::error("unwrap argument must be a direct call to a named function")
                        .with_code("badUnwrapArg")
                        .with_primary(arg.span, "not a recognizable call")
                        .with_help("pass the fallible call itself, e.g. `unwrap(fetchUser(id))`"),
                );
            }
        }
    }

    /// Compare the declared type-parameter set against the observed
    /// unwrapped calls. Runs once per scope, at its function's exit event.
    /// Returns the parent scope to restore as the new stack top.
    fn reconcile(&mut self, mut scope: Box<WrapScope>) -> Option<Box<WrapScope>> {
        let mut needs_fix = false;

        // Step 1: the type-parameter list must hold exactly one parameter.
        let single = match &scope.type_args {
            Some(list) if list.args.len() == 1 => Some(list.args[0].clone()),
            _ => None,
        };

        match single {
            None => {
                needs_fix = true;
                self.report(
                    Diagnostic::error("wrap call must declare exactly one type parameter")
                        .with_code("missingTypeParamInWrap")
                        .with_primary(scope.callee_span, "expected `<typeof ...>` on this call"),
                );
            }
            Some(param) => {
                let members: Vec<TypeExpr> = match param {
                    TypeExpr { kind: TypeKind::Union(members), .. } => members,
                    other => vec![other],
                };
                for member in &members {
                    match &member.kind {
                        TypeKind::Typeof { name, .. } => {
                            if !scope.record_declared(name, member.span) {
                                needs_fix = true;
                                self.report(
                                    Diagnostic::error(format!(
                                        "duplicate `typeof {}` in wrap type parameters",
                                        name
                                    ))
                                    .with_code("duplicatedWrapArg")
                                    .with_primary(member.span, "already declared"),
                                );
                            }
                        }
                        _ => {
                            needs_fix = true;
                            self.report(
                                Diagnostic::error(
                                    "wrap type parameter must be a `typeof` reference to a function",
                                )
                                .with_code("badWrapTypeArg")
                                .with_primary(member.span, "not a `typeof` reference"),
                            );
                        }
                    }
                }
            }
        }

        // Step 2: cross-check the two sets, both directions.
        for (name, span) in &scope.unwrapped_calls {
            if !scope.is_declared(name) {
                needs_fix = true;
                self.diagnostics.push(
                    Diagnostic::error(format!(
                        "`{}` is unwrapped here but not declared in the wrap type parameters",
                        name
                    ))
                    .with_code("unwrapNotInWrap")
                    .with_primary(*span, "not declared")
                    .with_secondary(scope.callee_span, "in this wrap construct"),
                );
            }
        }
        for (name, span) in &scope.declared_types {
            if !scope.is_unwrapped(name) {
                needs_fix = true;
                self.diagnostics.push(
                    Diagnostic::error(format!(
                        "`typeof {}` is declared but `{}` is never unwrapped in the wrap body",
                        name, name
                    ))
                    .with_code("wrappedFnNotUnwrapped")
                    .with_primary(*span, "never unwrapped"),
                );
            }
        }

        // Step 3: one umbrella diagnostic carrying the fix, in addition to
        // the individual findings above.
        if needs_fix {
            let mut diag = Diagnostic::error(
                "wrap type parameters do not match the calls unwrapped in the body",
            )
            .with_code("badWrap")
            .with_primary(scope.callee_span, "inconsistent wrap construct");

            match synthesize_fix(&scope) {
                Some((span, replacement)) => {
                    diag = diag
                        .with_help("regenerate the type parameters from the unwrapped calls")
                        .with_suggestion(span, replacement);
                }
                None => {
                    diag = diag.with_help(
                        "no calls are unwrapped in this body; no type parameter list can match",
                    );
                }
            }
            self.report(diag);
        }

        scope.parent.take()
    }
}

/// Render the corrective edit: the unwrapped names in first-seen order as a
/// `typeof` union. Replaces the whole existing list, or inserts after the
/// wrap identifier when no list was written. Never consults the declared
/// types, which makes applying the fix idempotent.
fn synthesize_fix(scope: &WrapScope) -> Option<(Span, String)> {
    if scope.unwrapped_calls.is_empty() {
        return None;
    }
    let union = scope
        .unwrapped_calls
        .iter()
        .map(|(name, _)| format!("typeof {}", name))
        .collect::<Vec<_>>()
        .join(" | ");
    let replacement = format!("<{}>", union);

    let span = match &scope.type_args {
        Some(list) => list.span,
        None => Span::point(scope.callee_span.end),
    };
    Some((span, replacement))
}

impl Visitor for WrapConsistency<'_> {
    fn enter_call(&mut self, call: &Expr) {
        if let Some((callee_span, type_args, function_node)) = self.match_wrap_open(call) {
            let mut scope = Box::new(WrapScope::new(function_node, callee_span, type_args));
            scope.parent = self.scope.take();
            self.scope = Some(scope);
            return;
        }
        self.check_unwrap(call);
    }

    fn enter_function(&mut self, id: NodeId) {
        if let Some(scope) = self.scope.as_deref_mut() {
            if scope.function_node == id {
                scope.entered_body = true;
            }
        }
    }

    fn exit_function(&mut self, id: NodeId) {
        // Unrelated function exits are a no-op; only the exit matching the
        // top scope's function reconciles and pops.
        if let Some(scope) = self.scope.take() {
            if scope.function_node == id {
                self.scope = self.reconcile(scope);
            } else {
                self.scope = Some(scope);
            }
        }
    }
}
