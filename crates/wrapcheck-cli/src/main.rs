// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! wrapcheck CLI - checks TypeScript sources for wrap/unwrap consistency.

mod output;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use colored::Colorize;
use wrapcheck_diagnostics::formatter::DiagnosticFormatter;
use wrapcheck_diagnostics::kinds::MessageRegistry;
use wrapcheck_lint::{fixes, LintOpts};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Format {
    Human,
    Json,
}

fn main() {
    output::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "check" => {
            let (paths, format, opts) = parse_check_args(&args[2..]);
            cmd_check(&paths, format, opts);
        }
        "fix" => {
            let mut check_only = false;
            let mut paths = Vec::new();
            for arg in &args[2..] {
                match arg.as_str() {
                    "--check" => check_only = true,
                    other => paths.push(other.to_string()),
                }
            }
            if paths.is_empty() {
                eprintln!("Usage: wrapcheck fix <file.ts> [--check]");
                process::exit(1);
            }
            cmd_fix(&paths, check_only);
        }
        "lex" => {
            if args.len() < 3 {
                eprintln!("Usage: wrapcheck lex <file.ts>");
                process::exit(1);
            }
            cmd_lex(&args[2]);
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: wrapcheck parse <file.ts>");
                process::exit(1);
            }
            cmd_parse(&args[2]);
        }
        "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: wrapcheck explain <kind>");
                process::exit(1);
            }
            cmd_explain(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("wrapcheck {}", env!("CARGO_PKG_VERSION"));
        }
        other => {
            // Treat a bare file name as `check`
            if other.ends_with(".ts") {
                cmd_check(&[other.to_string()], Format::Human, LintOpts::default());
            } else {
                eprintln!("Unknown command: {}", other);
                print_usage();
                process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("wrapcheck {} - wrap/unwrap consistency checker", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: wrapcheck <command> [args]");
    println!();
    println!("Commands:");
    println!("  check <path>     Check a .ts file or directory");
    println!("      --json             Emit a JSON report");
    println!("      --wrap-name <n>    Identifier for the wrap construct (default: wrap)");
    println!("      --unwrap-name <n>  Identifier for the unwrap accessor (default: unwrap)");
    println!("  fix <path>       Apply synthesized fixes in place");
    println!("      --check            Only report whether fixes would apply");
    println!("  lex <file>       Tokenize a file and print tokens");
    println!("  parse <file>     Parse a file and print the AST");
    println!("  explain <kind>   Explain a message kind (e.g. badWrap)");
    println!("  help             Show this help");
    println!("  version          Show version");
}

fn parse_check_args(args: &[String]) -> (Vec<String>, Format, LintOpts) {
    let mut paths = Vec::new();
    let mut format = Format::Human;
    let mut opts = LintOpts::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => format = Format::Json,
            "--wrap-name" => {
                i += 1;
                match args.get(i) {
                    Some(name) => opts.wrap_name = name.clone(),
                    None => {
                        eprintln!("{}: --wrap-name needs a value", output::error_label());
                        process::exit(1);
                    }
                }
            }
            "--unwrap-name" => {
                i += 1;
                match args.get(i) {
                    Some(name) => opts.unwrap_name = name.clone(),
                    None => {
                        eprintln!("{}: --unwrap-name needs a value", output::error_label());
                        process::exit(1);
                    }
                }
            }
            other => paths.push(other.to_string()),
        }
        i += 1;
    }

    if paths.is_empty() {
        eprintln!("Usage: wrapcheck check <path> [--json] [--wrap-name <n>] [--unwrap-name <n>]");
        process::exit(1);
    }

    (paths, format, opts)
}

/// Recursively collect .ts files under a directory.
fn collect_ts_files(dir: &Path) -> Vec<String> {
    let mut files = Vec::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return files,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            files.extend(collect_ts_files(&path));
        } else if path.extension().map(|e| e == "ts").unwrap_or(false) {
            files.push(path.to_string_lossy().to_string());
        }
    }
    files.sort();
    files
}

fn expand_paths(paths: &[String]) -> Vec<String> {
    let mut files = Vec::new();
    for path in paths {
        let p = PathBuf::from(path);
        if p.is_dir() {
            files.extend(collect_ts_files(&p));
        } else {
            files.push(path.clone());
        }
    }
    files
}

fn cmd_check(paths: &[String], format: Format, opts: LintOpts) {
    let files = expand_paths(paths);

    if files.is_empty() {
        eprintln!(
            "{}: no .ts files found in {}",
            output::error_label(),
            paths.join(", ")
        );
        process::exit(1);
    }

    let mut total_errors = 0;

    for file in &files {
        let source = match fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}: reading {}: {}", output::error_label(), output::file_path(file), e);
                continue;
            }
        };

        let file_opts = LintOpts {
            wrap_name: opts.wrap_name.clone(),
            unwrap_name: opts.unwrap_name.clone(),
        };
        let report = wrapcheck_lint::lint(&source, file, file_opts);
        total_errors += report.error_count;

        match format {
            Format::Human => {
                let formatter = DiagnosticFormatter::new(&source).with_file_name(file);
                for diagnostic in &report.diagnostics {
                    eprintln!("{}", formatter.format(diagnostic));
                }
            }
            Format::Json => {
                println!("{}", wrapcheck_lint::lint_json(&report));
            }
        }
    }

    if format == Format::Human {
        if total_errors == 0 {
            println!("{} No issues found", output::status_pass());
        } else {
            eprintln!("{} {} error(s)", output::status_fail(), total_errors);
        }
    }

    if total_errors > 0 {
        process::exit(1);
    }
}

fn cmd_fix(paths: &[String], check_only: bool) {
    let files = expand_paths(paths);
    let mut failed = false;

    for file in &files {
        let source = match fs::read_to_string(file) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}: reading {}: {}", output::error_label(), output::file_path(file), e);
                failed = true;
                continue;
            }
        };

        let report = wrapcheck_lint::lint(&source, file, LintOpts::default());
        let suggestions = fixes::collect_suggestions(&report.diagnostics);

        if suggestions.is_empty() {
            println!("{} {} (nothing to fix)", output::status_pass(), output::file_path(file));
            continue;
        }

        let fixed = match fixes::apply_suggestions(&source, &suggestions) {
            Ok(fixed) => fixed,
            Err(e) => {
                eprintln!("{}: fixing {}: {}", output::error_label(), output::file_path(file), e);
                failed = true;
                continue;
            }
        };

        if check_only {
            println!(
                "{} {} (would apply {} fix(es))",
                output::status_fail(),
                output::file_path(file),
                suggestions.len()
            );
            failed = true;
            continue;
        }

        match fs::write(file, &fixed) {
            Ok(_) => {
                println!(
                    "Fixed {} ({} edit(s))",
                    output::file_path(file),
                    suggestions.len()
                );
            }
            Err(e) => {
                eprintln!("{}: writing {}: {}", output::error_label(), output::file_path(file), e);
                failed = true;
            }
        }
    }

    if failed {
        process::exit(1);
    }
}

fn cmd_lex(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: reading {}: {}", output::error_label(), output::file_path(path), e);
            process::exit(1);
        }
    };

    let mut lexer = wrapcheck_lexer::Lexer::new(&source);
    let result = lexer.tokenize();

    let formatter = DiagnosticFormatter::new(&source).with_file_name(path);
    for error in &result.errors {
        use wrapcheck_diagnostics::ToDiagnostic;
        eprintln!("{}", formatter.format(&error.to_diagnostic()));
    }

    println!("=== Tokens ({}) ===\n", result.tokens.len());
    for tok in &result.tokens {
        println!("{:4}:{:<4} {:?}", tok.span.start, tok.span.end, tok.kind);
    }

    if !result.is_ok() {
        eprintln!("\n=== Lex FAILED: {} error(s) ===", result.errors.len());
        process::exit(1);
    }
}

fn cmd_parse(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: reading {}: {}", output::error_label(), output::file_path(path), e);
            process::exit(1);
        }
    };

    let lex_result = wrapcheck_lexer::Lexer::new(&source).tokenize();
    let parse_result = wrapcheck_parser::Parser::new(lex_result.tokens).parse();

    let formatter = DiagnosticFormatter::new(&source).with_file_name(path);
    let mut error_count = lex_result.errors.len();
    {
        use wrapcheck_diagnostics::ToDiagnostic;
        for error in &lex_result.errors {
            eprintln!("{}", formatter.format(&error.to_diagnostic()));
        }
        for error in &parse_result.errors {
            eprintln!("{}", formatter.format(&error.to_diagnostic()));
            error_count += 1;
        }
    }

    println!("{:#?}", parse_result.program);

    if error_count > 0 {
        eprintln!("\n=== Parse FAILED: {} error(s) ===", error_count);
        process::exit(1);
    }
}

fn cmd_explain(kind: &str) {
    let registry = MessageRegistry::default();

    if let Some(info) = registry.get(kind) {
        println!(
            "{}[{}]: {}",
            "error".red().bold(),
            info.kind.red().bold(),
            info.title.bold()
        );
        println!();
        println!("  Category: {}", info.category);
        println!();
        for line in info.description.lines() {
            println!("  {}", line.trim_start());
        }
        if !info.example.is_empty() {
            println!();
            println!("  {}:", "Example".bold());
            println!();
            for line in info.example.lines() {
                println!("    {}", line);
            }
        }
        println!();
        println!("  Run `wrapcheck check <file>` to see this message in context.");
    } else {
        eprintln!("{}: unknown message kind `{}`", output::error_label(), kind);
        eprintln!();
        eprintln!("Known kinds:");
        let mut kinds: Vec<&str> = registry.all().map(|i| i.kind).collect();
        kinds.sort_unstable();
        for k in kinds {
            eprintln!("  {}", k);
        }
        process::exit(1);
    }
}
