// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversions from front-end error types to `Diagnostic`.

use crate::{Diagnostic, ToDiagnostic};
use wrapcheck_lexer::LexErrorKind;

// ============================================================================
// Lex Errors
// ============================================================================

impl ToDiagnostic for wrapcheck_lexer::LexError {
    fn to_diagnostic(&self) -> Diagnostic {
        let kind = match self.kind {
            LexErrorKind::UnexpectedChar(_) => "unexpectedChar",
            LexErrorKind::InvalidNumber => "invalidNumber",
        };
        Diagnostic::error(self.to_string())
            .with_code(kind)
            .with_primary(self.span, "here")
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

impl ToDiagnostic for wrapcheck_parser::ParseError {
    fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(&self.message)
            .with_code("parseError")
            .with_primary(self.span, "here");

        if let Some(ref hint) = self.hint {
            diag = diag.with_help(hint.as_str());
        }

        diag
    }
}
