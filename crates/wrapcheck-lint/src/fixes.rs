// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Applying synthesized fixes to source text.

use thiserror::Error;
use wrapcheck_diagnostics::{CodeSuggestion, Diagnostic};

/// Collect the suggestions attached to a set of diagnostics.
pub fn collect_suggestions(diagnostics: &[Diagnostic]) -> Vec<CodeSuggestion> {
    diagnostics
        .iter()
        .filter_map(|d| d.suggestion().cloned())
        .collect()
}

/// Error applying fixes.
#[derive(Debug, Error)]
pub enum FixError {
    #[error("overlapping fixes at byte {0}")]
    Overlap(usize),
    #[error("fix span {0}..{1} is out of bounds")]
    OutOfBounds(usize, usize),
}

/// Apply suggestions to source, returning the edited text.
///
/// Suggestions must not overlap. Edits are applied back to front so the
/// earlier spans stay valid while splicing.
pub fn apply_suggestions(source: &str, suggestions: &[CodeSuggestion]) -> Result<String, FixError> {
    let mut ordered: Vec<&CodeSuggestion> = suggestions.iter().collect();
    ordered.sort_by_key(|s| (s.span.start, s.span.end));

    for s in &ordered {
        if s.span.start > s.span.end || s.span.end > source.len() {
            return Err(FixError::OutOfBounds(s.span.start, s.span.end));
        }
    }
    for pair in ordered.windows(2) {
        if pair[1].span.start < pair[0].span.end {
            return Err(FixError::Overlap(pair[1].span.start));
        }
    }

    let mut result = source.to_string();
    for s in ordered.iter().rev() {
        result.replace_range(s.span.start..s.span.end, &s.replacement);
    }
    Ok(result)
}
