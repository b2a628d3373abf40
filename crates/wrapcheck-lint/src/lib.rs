// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `wrapcheck check` — wrap/unwrap consistency enforcement.
//!
//! Verifies that every wrap construct declares, as a union of `typeof`
//! references, exactly the set of functions unwrapped inside its body, and
//! synthesizes a corrective edit when the two sets diverge.

pub mod fixes;
mod rule;
mod scope;
pub mod types;
pub mod visit;

pub use rule::WrapConsistency;
pub use scope::WrapScope;
pub use types::{LintOpts, LintReport};

use wrapcheck_diagnostics::{Diagnostic, Severity, ToDiagnostic};

/// Parse source and run the wrap/unwrap consistency rule.
pub fn lint(source: &str, file: &str, opts: LintOpts) -> LintReport {
    let mut lexer = wrapcheck_lexer::Lexer::new(source);
    let lex_result = lexer.tokenize();
    let parse_result = wrapcheck_parser::Parser::new(lex_result.tokens).parse();

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    diagnostics.extend(lex_result.errors.iter().map(|e| e.to_diagnostic()));
    diagnostics.extend(parse_result.errors.iter().map(|e| e.to_diagnostic()));

    // The rule runs on whatever parsed, even after front-end errors; it
    // polices only constructs it positively recognizes.
    let mut rule = WrapConsistency::new(&opts.wrap_name, &opts.unwrap_name);
    visit::walk_program(&parse_result.program, &mut rule);
    diagnostics.extend(rule.finish());

    let error_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();

    LintReport {
        version: 1,
        file: file.to_string(),
        success: error_count == 0,
        diagnostics,
        error_count,
        warning_count,
    }
}

/// Serialize a lint report to JSON.
pub fn lint_json(report: &LintReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}
