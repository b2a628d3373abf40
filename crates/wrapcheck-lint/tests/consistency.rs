// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! End-to-end tests for the wrap/unwrap consistency rule: each test lints
//! a TypeScript snippet and checks the reported message kinds, and where a
//! fix is synthesized, that applying it leaves the source clean.

use wrapcheck_lint::{fixes, lint, LintOpts, LintReport};

fn check(src: &str) -> LintReport {
    lint(src, "test.ts", LintOpts::default())
}

fn kinds(report: &LintReport) -> Vec<&str> {
    report.diagnostics.iter().filter_map(|d| d.kind()).collect()
}

fn count_kind(report: &LintReport, kind: &str) -> usize {
    kinds(report).iter().filter(|k| **k == kind).count()
}

/// Apply every synthesized fix and return the edited source.
fn fixed(src: &str) -> String {
    let report = check(src);
    let suggestions = fixes::collect_suggestions(&report.diagnostics);
    assert!(!suggestions.is_empty(), "expected at least one fix for:\n{}", src);
    fixes::apply_suggestions(src, &suggestions).expect("fixes should apply")
}

fn assert_clean(src: &str) {
    let report = check(src);
    assert!(
        report.diagnostics.is_empty(),
        "expected no diagnostics for:\n{}\ngot: {:?}",
        src,
        kinds(&report)
    );
}

// ============================================================================
// Consistent constructs
// ============================================================================

#[test]
fn consistent_wrap_is_clean() {
    assert_clean(
        r#"
import { fetchUser, loadCart } from "./api";

const result = wrap<typeof fetchUser | typeof loadCart>()(async () => {
    const user = unwrap(await fetchUser(1));
    const cart = unwrap(loadCart(user));
    return cart;
});
"#,
    );
}

#[test]
fn singleton_declaration_is_clean() {
    assert_clean(
        "const r = wrap<typeof fetchUser>()(async () => { return unwrap(fetchUser(1)); });",
    );
}

#[test]
fn duplicate_unwraps_collapse_to_one_entry() {
    assert_clean(
        r#"
const r = wrap<typeof f>()(async () => {
    const a = unwrap(f());
    const b = unwrap(f());
    return a + b;
});
"#,
    );
}

#[test]
fn wrap_config_arguments_are_irrelevant() {
    assert_clean(
        r#"
const r = wrap<typeof f>({ retries: 3, label: "checkout" })(async () => {
    return unwrap(f());
});
"#,
    );
}

#[test]
fn unwrap_in_arrow_expression_body_is_recorded() {
    assert_clean("const r = wrap<typeof f>()(async () => unwrap(await f()));");
}

#[test]
fn unrecognized_unwrap_arities_do_not_participate() {
    // Zero or two arguments is not the unwrap shape; those calls are
    // ignored entirely rather than reported.
    assert_clean(
        r#"
const r = wrap<typeof f>()(async () => {
    unwrap();
    unwrap(g(), h());
    return unwrap(f());
});
"#,
    );
}

// ============================================================================
// Missing or malformed type-parameter lists
// ============================================================================

#[test]
fn missing_type_params_reports_and_fix_roundtrips() {
    let src = "const r = wrap()(async () => { return unwrap(fetchUser(1)); });";
    let report = check(src);

    assert_eq!(count_kind(&report, "missingTypeParamInWrap"), 1);
    assert_eq!(count_kind(&report, "badWrap"), 1);
    assert_eq!(report.diagnostics.len(), 2);

    let out = fixed(src);
    assert!(out.contains("wrap<typeof fetchUser>()"), "got: {}", out);
    assert_clean(&out);
}

#[test]
fn two_type_params_count_as_missing() {
    let src = "const r = wrap<typeof f, typeof g>()(async () => { return unwrap(f()); });";
    let report = check(src);

    assert_eq!(count_kind(&report, "missingTypeParamInWrap"), 1);
    assert_eq!(count_kind(&report, "badWrap"), 1);

    // The fix replaces the whole malformed list
    let out = fixed(src);
    assert!(out.contains("wrap<typeof f>()"), "got: {}", out);
    assert_clean(&out);
}

#[test]
fn non_typeof_member_reports_bad_wrap_type_arg() {
    let src = "const r = wrap<typeof f | Error>()(async () => { return unwrap(f()); });";
    let report = check(src);

    assert_eq!(count_kind(&report, "badWrapTypeArg"), 1);
    assert_eq!(count_kind(&report, "badWrap"), 1);
    assert_eq!(count_kind(&report, "wrappedFnNotUnwrapped"), 0);

    let out = fixed(src);
    assert!(out.contains("wrap<typeof f>()"), "got: {}", out);
    assert_clean(&out);
}

#[test]
fn duplicated_declaration_reports_once_without_phantom_mismatch() {
    let src = "const r = wrap<typeof f | typeof f>()(async () => { return unwrap(f()); });";
    let report = check(src);

    assert_eq!(count_kind(&report, "duplicatedWrapArg"), 1);
    // First occurrence wins, so `f` counts as declared
    assert_eq!(count_kind(&report, "wrappedFnNotUnwrapped"), 0);
    assert_eq!(count_kind(&report, "badWrap"), 1);
    assert_eq!(report.diagnostics.len(), 2);

    let out = fixed(src);
    assert!(out.contains("wrap<typeof f>()"), "got: {}", out);
    assert_clean(&out);
}

// ============================================================================
// Set mismatches
// ============================================================================

#[test]
fn asymmetric_mismatch_reports_both_directions() {
    let src = r#"
const r = wrap<typeof f | typeof g>()(async () => {
    const a = unwrap(f());
    const b = unwrap(h());
    return a + b;
});
"#;
    let report = check(src);

    assert_eq!(count_kind(&report, "wrappedFnNotUnwrapped"), 1);
    assert_eq!(count_kind(&report, "unwrapNotInWrap"), 1);
    assert_eq!(count_kind(&report, "badWrap"), 1);
    assert_eq!(report.diagnostics.len(), 3);

    let out = fixed(src);
    assert!(out.contains("wrap<typeof f | typeof h>()"), "got: {}", out);
    assert_clean(&out);
}

#[test]
fn fix_preserves_first_unwrap_order() {
    let src = r#"
const r = wrap()(async () => {
    const b = unwrap(loadCart());
    const a = unwrap(fetchUser());
    const c = unwrap(loadCart());
    return a;
});
"#;
    let out = fixed(src);
    assert!(
        out.contains("wrap<typeof loadCart | typeof fetchUser>()"),
        "got: {}",
        out
    );
    assert_clean(&out);
}

#[test]
fn declared_but_never_unwrapped_has_no_synthesized_fix() {
    // Nothing is unwrapped, so no type-parameter list could be consistent;
    // the umbrella diagnostic carries no suggestion.
    let src = "const r = wrap<typeof f>()(async () => { return 1; });";
    let report = check(src);

    assert_eq!(count_kind(&report, "wrappedFnNotUnwrapped"), 1);
    assert_eq!(count_kind(&report, "badWrap"), 1);
    assert!(fixes::collect_suggestions(&report.diagnostics).is_empty());
}

// ============================================================================
// Malformed unwrap arguments
// ============================================================================

#[test]
fn literal_unwrap_arg_is_reported_and_excluded() {
    let src = r#"
const r = wrap<typeof f>()(async () => {
    const bad = unwrap(42);
    return unwrap(f());
});
"#;
    let report = check(src);

    // The literal is reported eagerly but does not disturb reconciliation
    // of the other names.
    assert_eq!(count_kind(&report, "badUnwrapArg"), 1);
    assert_eq!(count_kind(&report, "badWrap"), 0);
    assert_eq!(report.diagnostics.len(), 1);
    assert!(!report.success);
}

#[test]
fn member_callee_unwrap_arg_is_reported() {
    let src = r#"
const r = wrap<typeof f>()(async () => {
    const bad = unwrap(api.fetch());
    return unwrap(f());
});
"#;
    let report = check(src);
    assert_eq!(count_kind(&report, "badUnwrapArg"), 1);
}

#[test]
fn await_is_peeled_exactly_once() {
    // One await peels; a second one is not a recognizable call.
    assert_clean("const r = wrap<typeof f>()(async () => unwrap(await f()));");

    let report = check("const r = wrap<typeof f>()(async () => unwrap(await await f()));");
    assert_eq!(count_kind(&report, "badUnwrapArg"), 1);
    assert_eq!(count_kind(&report, "wrappedFnNotUnwrapped"), 1);
}

// ============================================================================
// Scope discipline
// ============================================================================

#[test]
fn unwrap_outside_any_wrap_is_ignored() {
    assert_clean("const x = unwrap(f());");
    assert_clean("function helper() { return unwrap(f()); }");
}

#[test]
fn unwrap_before_body_entry_is_ignored() {
    // The unwrap sits in the wrap call's own arguments, a sibling of the
    // body rather than a descendant.
    assert_clean(
        r#"
const r = wrap<typeof f>(unwrap(g()))(async () => {
    return unwrap(f());
});
"#,
    );
}

#[test]
fn non_async_function_literal_is_not_a_wrap() {
    // The construct is not recognized, so the unwrap inside has no active
    // scope either.
    assert_clean("const r = wrap<typeof f>()(() => { return unwrap(f()); });");
}

#[test]
fn plain_wrap_call_without_invocation_is_not_a_wrap() {
    assert_clean("const r = wrap(async () => { return unwrap(f()); });");
}

#[test]
fn nested_wraps_reconcile_independently() {
    assert_clean(
        r#"
const outer = wrap<typeof f>()(async () => {
    const a = unwrap(f());
    const inner = wrap<typeof g>()(async () => {
        return unwrap(g());
    });
    return a;
});
"#,
    );
}

#[test]
fn inner_wrap_names_do_not_leak_into_outer() {
    let src = r#"
const outer = wrap<typeof f>()(async () => {
    const a = unwrap(f());
    const inner = wrap<typeof g>()(async () => {
        return unwrap(h());
    });
    return a;
});
"#;
    let report = check(src);

    // Only the inner construct is inconsistent.
    assert_eq!(count_kind(&report, "badWrap"), 1);
    assert_eq!(count_kind(&report, "unwrapNotInWrap"), 1);
    assert_eq!(count_kind(&report, "wrappedFnNotUnwrapped"), 1);

    let out = fixed(src);
    assert!(out.contains("wrap<typeof h>()"), "got: {}", out);
    assert!(out.contains("wrap<typeof f>()"), "got: {}", out);
    assert_clean(&out);
}

#[test]
fn unwraps_after_inner_wrap_exits_belong_to_outer() {
    assert_clean(
        r#"
const outer = wrap<typeof f | typeof g>()(async () => {
    const a = unwrap(f());
    const inner = wrap<typeof h>()(async () => {
        return unwrap(h());
    });
    const b = unwrap(g());
    return a + b;
});
"#,
    );
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn applying_the_fix_is_idempotent() {
    let broken = [
        "const r = wrap()(async () => { return unwrap(f()); });",
        "const r = wrap<typeof g>()(async () => { return unwrap(f()); });",
        "const r = wrap<string>()(async () => { return unwrap(f()); });",
        "const r = wrap<typeof f, typeof g>()(async () => { return unwrap(f()); });",
        "const r = wrap<typeof f | typeof f>()(async () => { return unwrap(f()); });",
    ];

    for src in broken {
        let once = fixed(src);
        let report = check(&once);
        assert!(
            report.diagnostics.is_empty(),
            "fix for:\n{}\nleft diagnostics: {:?}\nfixed source: {}",
            src,
            kinds(&report),
            once
        );
        // A clean report synthesizes no further edits
        assert!(fixes::collect_suggestions(&report.diagnostics).is_empty());
    }
}

#[test]
fn fixes_apply_across_sibling_constructs() {
    let src = r#"
const a = wrap()(async () => { return unwrap(f()); });
const b = wrap<typeof x>()(async () => { return unwrap(g()); });
"#;
    let out = fixed(src);
    assert!(out.contains("wrap<typeof f>()"), "got: {}", out);
    assert!(out.contains("wrap<typeof g>()"), "got: {}", out);
    assert_clean(&out);
}

// ============================================================================
// Configuration and reporting surface
// ============================================================================

#[test]
fn configured_names_replace_the_defaults() {
    let opts = LintOpts {
        wrap_name: "guard".to_string(),
        unwrap_name: "take".to_string(),
    };
    let report = lint(
        "const r = guard<typeof f>()(async () => { return take(f()); });",
        "test.ts",
        opts,
    );
    assert!(report.diagnostics.is_empty(), "got: {:?}", kinds(&report));

    // Under custom names the default identifiers mean nothing
    let opts = LintOpts {
        wrap_name: "guard".to_string(),
        unwrap_name: "take".to_string(),
    };
    let report = lint(
        "const r = wrap()(async () => { return unwrap(f()); });",
        "test.ts",
        opts,
    );
    assert!(report.diagnostics.is_empty());
}

#[test]
fn front_end_errors_are_reported_not_fatal() {
    let report = check("const = 1;\nconst r = wrap()(async () => { return unwrap(f()); });");
    assert!(!report.success);
    assert!(kinds(&report).contains(&"parseError"));
    // The rule still ran on the statements that parsed
    assert!(kinds(&report).contains(&"missingTypeParamInWrap"));
}

#[test]
fn json_report_carries_kinds_and_suggestions() {
    let report = check("const r = wrap()(async () => { return unwrap(f()); });");
    let json = wrapcheck_lint::lint_json(&report);
    assert!(json.contains("\"badWrap\""));
    assert!(json.contains("missingTypeParamInWrap"));
    assert!(json.contains("<typeof f>"));
    assert!(json.contains("\"success\": false"));
}
