// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Rich terminal formatter for diagnostics.
//!
//! Produces multi-line, color-coded output:
//!
//! ```text
//! error[unwrapNotInWrap]: `loadCart` is unwrapped here but not declared
//!   --> cart.ts:4:17
//!    |
//!  4 |     const cart = unwrap(loadCart(user));
//!    |                         ^^^^^^^^^^^^^^ not declared in the wrap type parameters
//!    |
//!    = help: add `typeof loadCart` to the wrap type parameters
//! ```

use colored::Colorize;

use wrapcheck_ast::LineMap;

use crate::{Diagnostic, LabelStyle, Severity};

/// Formats diagnostics for terminal output.
pub struct DiagnosticFormatter<'a> {
    source: &'a str,
    file_name: Option<&'a str>,
    line_map: LineMap,
}

struct Annotation {
    col_start: usize,
    col_end: usize,
    style: LabelStyle,
    message: Option<String>,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_map = LineMap::new(source);
        Self {
            source,
            file_name: None,
            line_map,
        }
    }

    pub fn with_file_name(mut self, name: &'a str) -> Self {
        self.file_name = Some(name);
        self
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();

        self.format_header(&mut out, diagnostic);

        // Group labels by source line, preserving label order
        let mut lines: Vec<(usize, Vec<Annotation>)> = Vec::new();
        for label in &diagnostic.labels {
            let (line, col) = self.line_map.line_col(label.span.start);
            let (end_line, end_col) = self.line_map.line_col(label.span.end);
            // Multi-line spans are annotated on their first line only
            let col_end = if end_line == line { end_col } else { col + 1 };
            let ann = Annotation {
                col_start: col,
                col_end: col_end.max(col + 1),
                style: label.style,
                message: label.message.clone(),
            };
            match lines.iter_mut().find(|(l, _)| *l == line) {
                Some((_, anns)) => anns.push(ann),
                None => lines.push((line, vec![ann])),
            }
        }
        lines.sort_by_key(|(l, _)| *l);

        if lines.is_empty() {
            self.format_footer(&mut out, diagnostic, 2);
            return out;
        }

        // --> file:line:col of the first label
        let first_label = &diagnostic.labels[0];
        let (fline, fcol) = self.line_map.line_col(first_label.span.start);
        let file = self.file_name.unwrap_or("<source>");
        out.push_str(&format!("  {} {}:{}:{}\n", "-->".blue(), file, fline, fcol));

        let max_line = lines.last().map(|(l, _)| *l).unwrap_or(1);
        let gutter = max_line.to_string().len().max(2);

        out.push_str(&format!("{} {}\n", " ".repeat(gutter + 1), "|".blue()));

        let mut prev_line: Option<usize> = None;
        for (line_num, annotations) in &lines {
            if let Some(prev) = prev_line {
                if *line_num > prev + 1 {
                    out.push_str(&format!("{} {}\n", " ".repeat(gutter), "...".blue()));
                }
            }

            let text = self.line_map.line_text(self.source, *line_num).unwrap_or("");
            out.push_str(&format!(
                "{:>width$} {} {}\n",
                line_num.to_string().blue().bold(),
                "|".blue(),
                text,
                width = gutter + 1,
            ));

            for ann in annotations {
                let caret = match ann.style {
                    LabelStyle::Primary => "^",
                    LabelStyle::Secondary => "-",
                };
                let marker = caret.repeat(ann.col_end.saturating_sub(ann.col_start).max(1));
                let colored_marker = match ann.style {
                    LabelStyle::Primary => marker.red().bold().to_string(),
                    LabelStyle::Secondary => marker.blue().to_string(),
                };
                let msg = ann.message.as_deref().unwrap_or("");
                out.push_str(&format!(
                    "{} {} {}{} {}\n",
                    " ".repeat(gutter + 1),
                    "|".blue(),
                    " ".repeat(ann.col_start.saturating_sub(1)),
                    colored_marker,
                    msg,
                ));
            }

            prev_line = Some(*line_num);
        }

        out.push_str(&format!("{} {}\n", " ".repeat(gutter + 1), "|".blue()));
        self.format_footer(&mut out, diagnostic, gutter);

        out
    }

    fn format_header(&self, out: &mut String, diagnostic: &Diagnostic) {
        let severity_str = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Note => "note".blue().bold(),
        };

        if let Some(ref code) = diagnostic.code {
            out.push_str(&format!(
                "{}[{}]: {}\n",
                severity_str,
                code.0.clone().red().bold(),
                diagnostic.message.bold()
            ));
        } else {
            out.push_str(&format!("{}: {}\n", severity_str, diagnostic.message.bold()));
        }
    }

    fn format_footer(&self, out: &mut String, diagnostic: &Diagnostic, gutter: usize) {
        for note in &diagnostic.notes {
            out.push_str(&format!(
                "{} {} {}: {}\n",
                " ".repeat(gutter + 1),
                "=".cyan(),
                "note".cyan().bold(),
                note
            ));
        }

        if let Some(ref help) = diagnostic.help {
            out.push_str(&format!(
                "{} {} {}: {}\n",
                " ".repeat(gutter + 1),
                "=".cyan(),
                "help".cyan().bold(),
                help.message
            ));
            if let Some(ref suggestion) = help.suggestion {
                let verb = if suggestion.span.is_empty() { "insert" } else { "replace with" };
                out.push_str(&format!(
                    "{} {} {}: {} `{}`\n",
                    " ".repeat(gutter + 1),
                    "=".cyan(),
                    "fix".green().bold(),
                    verb,
                    suggestion.replacement
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrapcheck_ast::Span;

    #[test]
    fn formats_header_location_and_caret() {
        colored::control::set_override(false);

        let src = "const x = unwrap(5);\n";
        let diag = Diagnostic::error("unwrap argument must be a call")
            .with_code("badUnwrapArg")
            .with_primary(Span::new(17, 18), "not a call");

        let rendered = DiagnosticFormatter::new(src)
            .with_file_name("x.ts")
            .format(&diag);

        assert!(rendered.contains("error[badUnwrapArg]: unwrap argument must be a call"));
        assert!(rendered.contains("--> x.ts:1:18"));
        assert!(rendered.contains("const x = unwrap(5);"));
        assert!(rendered.contains("^ not a call"));
    }

    #[test]
    fn renders_insert_suggestion() {
        colored::control::set_override(false);

        let diag = Diagnostic::error("missing type parameter")
            .with_code("missingTypeParamInWrap")
            .with_primary(Span::new(0, 4), "here")
            .with_help("declare the unwrapped functions")
            .with_suggestion(Span::point(4), "<typeof f>");

        let rendered = DiagnosticFormatter::new("wrap()(async () => {})").format(&diag);
        assert!(rendered.contains("= help: declare the unwrapped functions"));
        assert!(rendered.contains("= fix: insert `<typeof f>`"));
    }
}
