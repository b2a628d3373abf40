// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The wrap scope stack.

use wrapcheck_ast::ty::TypeArgList;
use wrapcheck_ast::{NodeId, Span};

/// One currently-open wrap construct.
///
/// Scopes form a stack through `parent` links; the stack's depth equals the
/// nesting depth of open wrap constructs, and a child never outlives its
/// parent.
#[derive(Debug)]
pub struct WrapScope {
    pub parent: Option<Box<WrapScope>>,
    /// Identity of the function body passed to the wrap construct. The
    /// matching exit event is detected by node id, never by name, since
    /// anonymous functions have none.
    pub function_node: NodeId,
    /// The wrap identifier reference at the call site. Anchors the
    /// umbrella diagnostic and insert-after fixes.
    pub callee_span: Span,
    /// The explicit type-argument list, when one was written.
    pub type_args: Option<TypeArgList>,
    /// False until traversal has entered `function_node`. Unwrap calls seen
    /// while this is false sit outside the body (for example in the wrap
    /// call's own arguments) and are ignored.
    pub entered_body: bool,
    /// Unwrapped callee names mapped to their call sites, insertion order
    /// preserved, first occurrence wins.
    pub unwrapped_calls: Vec<(String, Span)>,
    /// Declared `typeof` names mapped to their type references. Populated
    /// during reconciliation, first occurrence wins.
    pub declared_types: Vec<(String, Span)>,
}

impl WrapScope {
    pub fn new(function_node: NodeId, callee_span: Span, type_args: Option<TypeArgList>) -> Self {
        Self {
            parent: None,
            function_node,
            callee_span,
            type_args,
            entered_body: false,
            unwrapped_calls: Vec::new(),
            declared_types: Vec::new(),
        }
    }

    /// Record an unwrapped call. Duplicate names are dropped; reconciliation
    /// only needs presence per name.
    pub fn record_unwrap(&mut self, name: &str, span: Span) {
        if !self.is_unwrapped(name) {
            self.unwrapped_calls.push((name.to_string(), span));
        }
    }

    /// Record a declared type name. Returns false when the name was already
    /// declared, which the caller reports as a duplicate.
    pub fn record_declared(&mut self, name: &str, span: Span) -> bool {
        if self.is_declared(name) {
            return false;
        }
        self.declared_types.push((name.to_string(), span));
        true
    }

    pub fn is_unwrapped(&self, name: &str) -> bool {
        self.unwrapped_calls.iter().any(|(n, _)| n == name)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared_types.iter().any(|(n, _)| n == name)
    }
}
