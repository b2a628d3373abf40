//! Message-kind registry.
//!
//! Maps stable message identifiers (`badWrap`, `unwrapNotInWrap`, ...) to
//! titles, categories and explanations. Used by `wrapcheck explain <kind>`
//! and for diagnostic display.

use std::collections::HashMap;

/// Registry of all known message kinds.
pub struct MessageRegistry {
    kinds: HashMap<&'static str, MessageInfo>,
}

/// Information about a single message kind.
pub struct MessageInfo {
    pub kind: &'static str,
    pub title: &'static str,
    pub category: MessageCategory,
    pub description: &'static str,
    pub example: &'static str,
}

/// Message category for grouping.
#[derive(Debug, Clone, Copy)]
pub enum MessageCategory {
    Syntax,
    WrapShape,
    Reconciliation,
}

impl std::fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageCategory::Syntax => write!(f, "Syntax"),
            MessageCategory::WrapShape => write!(f, "Wrap shape"),
            MessageCategory::Reconciliation => write!(f, "Reconciliation"),
        }
    }
}

macro_rules! register_kinds {
    ($($kind:literal => ($title:literal, $cat:expr, $desc:literal, $example:literal)),* $(,)?) => {{
        let mut map = HashMap::new();
        $(
            map.insert($kind, MessageInfo {
                kind: $kind,
                title: $title,
                category: $cat,
                description: $desc,
                example: $example,
            });
        )*
        map
    }};
}

impl Default for MessageRegistry {
    fn default() -> Self {
        use MessageCategory::*;

        Self {
            kinds: register_kinds! {
                // Front-end diagnostics
                "unexpectedChar" => (
                    "unexpected character",
                    Syntax,
                    "The lexer hit a character that is not part of the analyzed language.",
                    ""
                ),
                "invalidNumber" => (
                    "invalid number literal",
                    Syntax,
                    "A numeric literal could not be parsed as a number.",
                    ""
                ),
                "parseError" => (
                    "syntax error",
                    Syntax,
                    "The parser could not make sense of the source at this point.",
                    ""
                ),

                // Wrap/unwrap consistency diagnostics
                "badWrap" => (
                    "wrap type parameters disagree with the unwrapped calls",
                    Reconciliation,
                    "The type-parameter union on a wrap call must list exactly the\n\
                     functions unwrapped inside its body. The attached fix regenerates\n\
                     the union from the calls that are actually unwrapped.",
                    "wrap<typeof fetchUser>()(async () => {\n    const cart = unwrap(loadCart());\n})"
                ),
                "missingTypeParamInWrap" => (
                    "wrap call is missing its type parameter",
                    WrapShape,
                    "Every wrap call must carry exactly one explicit type parameter:\n\
                     the union of `typeof` references for the functions unwrapped in\n\
                     its body.",
                    "wrap()(async () => {\n    const user = unwrap(fetchUser());\n})"
                ),
                "badUnwrapArg" => (
                    "unwrap argument is not a recognizable call",
                    WrapShape,
                    "The argument to unwrap must be a direct call to a named function,\n\
                     optionally awaited. Anything else cannot be reconciled against the\n\
                     wrap type parameters.",
                    "wrap<typeof f>()(async () => {\n    const x = unwrap(42);\n})"
                ),
                "badWrapTypeArg" => (
                    "wrap type parameter member is not a typeof reference",
                    WrapShape,
                    "Each member of the wrap type-parameter union must be a `typeof`\n\
                     reference to a named function.",
                    "wrap<typeof f | string>()(async () => { ... })"
                ),
                "duplicatedWrapArg" => (
                    "duplicate member in wrap type parameters",
                    Reconciliation,
                    "A function may appear only once in the wrap type-parameter union;\n\
                     repeated members are redundant.",
                    "wrap<typeof f | typeof f>()(async () => { ... })"
                ),
                "unwrapNotInWrap" => (
                    "unwrapped call is not declared in the wrap type parameters",
                    Reconciliation,
                    "A function unwrapped inside the wrap body must be declared in the\n\
                     wrap type-parameter union.",
                    "wrap<typeof f>()(async () => {\n    const x = unwrap(g());\n})"
                ),
                "wrappedFnNotUnwrapped" => (
                    "declared function is never unwrapped",
                    Reconciliation,
                    "A function declared in the wrap type-parameter union must actually\n\
                     be unwrapped inside the wrap body.",
                    "wrap<typeof f | typeof g>()(async () => {\n    const x = unwrap(f());\n})"
                ),
            },
        }
    }
}

impl MessageRegistry {
    pub fn get(&self, kind: &str) -> Option<&MessageInfo> {
        self.kinds.get(kind)
    }

    pub fn all(&self) -> impl Iterator<Item = &MessageInfo> {
        self.kinds.values()
    }
}
