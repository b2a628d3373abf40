// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Output types for `wrapcheck check`.

use serde::Serialize;
use wrapcheck_diagnostics::Diagnostic;

/// Complete lint report for a file.
#[derive(Debug, Serialize)]
pub struct LintReport {
    pub version: u32,
    pub file: String,
    pub success: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

/// Options for the checker.
pub struct LintOpts {
    /// Identifier recognized as the wrap construct.
    pub wrap_name: String,
    /// Identifier recognized as the unwrap accessor.
    pub unwrap_name: String,
}

impl Default for LintOpts {
    fn default() -> Self {
        Self {
            wrap_name: "wrap".to_string(),
            unwrap_name: "unwrap".to_string(),
        }
    }
}
