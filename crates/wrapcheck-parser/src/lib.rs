//! Parser for the analyzed TypeScript subset.
//!
//! Transforms a token stream into an abstract syntax tree.

mod parser;

pub use parser::{ParseError, ParseResult, Parser};

#[cfg(test)]
mod tests {
    use super::*;
    use wrapcheck_ast::expr::{ArrowBody, Expr, ExprKind};
    use wrapcheck_ast::stmt::StmtKind;
    use wrapcheck_ast::ty::TypeKind;

    fn parse(src: &str) -> ParseResult {
        let lex_result = wrapcheck_lexer::Lexer::new(src).tokenize();
        assert!(lex_result.is_ok(), "Lex errors: {:?}", lex_result.errors);
        Parser::new(lex_result.tokens).parse()
    }

    fn first_expr(result: &ParseResult) -> &Expr {
        match &result.program.body[0].kind {
            StmtKind::Expr(e) => e,
            StmtKind::Const { init, .. } => init,
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn parse_import() {
        let result = parse(r#"import { fetchUser, loadCart } from "./api";"#);
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        match &result.program.body[0].kind {
            StmtKind::Import { names, module } => {
                assert_eq!(names, &["fetchUser", "loadCart"]);
                assert_eq!(module, "./api");
            }
            other => panic!("Expected import, got {:?}", other),
        }
    }

    #[test]
    fn parse_typed_call() {
        let result = parse("wrap<typeof f | typeof g>()(async () => {});");
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);

        // Outer call: wrap<...>()(fn)
        let outer = first_expr(&result);
        let (callee, args) = match &outer.kind {
            ExprKind::Call { callee, args, type_args } => {
                assert!(type_args.is_none());
                (callee, args)
            }
            other => panic!("Expected call, got {:?}", other),
        };
        assert_eq!(args.len(), 1);
        assert!(args[0].is_async_fn_literal());

        // Inner call carries the type-argument list
        match &callee.kind {
            ExprKind::Call { callee, type_args, .. } => {
                assert!(matches!(callee.kind, ExprKind::Ident(ref n) if n == "wrap"));
                let list = type_args.as_ref().expect("type args");
                assert_eq!(list.args.len(), 1);
                match &list.args[0].kind {
                    TypeKind::Union(members) => {
                        assert_eq!(members.len(), 2);
                        assert!(matches!(
                            &members[0].kind,
                            TypeKind::Typeof { name, .. } if name == "f"
                        ));
                    }
                    other => panic!("Expected union, got {:?}", other),
                }
            }
            other => panic!("Expected inner call, got {:?}", other),
        }
    }

    #[test]
    fn type_arg_list_span_covers_brackets() {
        let src = "wrap<typeof f>()(async () => {});";
        let result = parse(src);
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);

        let outer = first_expr(&result);
        let ExprKind::Call { callee, .. } = &outer.kind else { panic!() };
        let ExprKind::Call { type_args, .. } = &callee.kind else { panic!() };
        let list = type_args.as_ref().unwrap();
        assert_eq!(&src[list.span.start..list.span.end], "<typeof f>");
    }

    #[test]
    fn less_than_is_not_type_args() {
        let result = parse("const ok = a < b;");
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        match &first_expr(&result).kind {
            ExprKind::Binary { .. } => {}
            other => panic!("Expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn parse_async_arrow_block_body() {
        let result = parse("const h = async (id) => { return id; };");
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        match &first_expr(&result).kind {
            ExprKind::Arrow { is_async, params, body } => {
                assert!(is_async);
                assert_eq!(params.len(), 1);
                assert!(matches!(body, ArrowBody::Block(stmts) if stmts.len() == 1));
            }
            other => panic!("Expected arrow, got {:?}", other),
        }
    }

    #[test]
    fn async_is_an_identifier_when_nothing_follows() {
        let result = parse("async(1);");
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        match &first_expr(&result).kind {
            ExprKind::Call { callee, .. } => {
                assert!(matches!(callee.kind, ExprKind::Ident(ref n) if n == "async"));
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn parse_await_in_call_argument() {
        let result = parse("const u = unwrap(await fetchUser(1));");
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        let ExprKind::Call { args, .. } = &first_expr(&result).kind else { panic!() };
        assert!(matches!(args[0].kind, ExprKind::Await(_)));
    }

    #[test]
    fn parse_function_declaration() {
        let result = parse("export async function fetchUser(id) { return id; }");
        assert!(result.is_ok(), "Parse errors: {:?}", result.errors);
        match &result.program.body[0].kind {
            StmtKind::FunctionDecl { is_export, is_async, name, .. } => {
                assert!(is_export);
                assert!(is_async);
                assert_eq!(name, "fetchUser");
            }
            other => panic!("Expected function decl, got {:?}", other),
        }
    }

    #[test]
    fn error_recovery_continues_to_next_statement() {
        let result = parse("const = 1;\nconst ok = 2;");
        assert!(!result.is_ok());
        // The second statement still parses
        assert!(result
            .program
            .body
            .iter()
            .any(|s| matches!(&s.kind, StmtKind::Const { name, .. } if name == "ok")));
    }

    #[test]
    fn node_ids_are_unique() {
        let result = parse("f(g(h(1)), i(2));");
        assert!(result.is_ok());
        let mut ids = Vec::new();
        fn collect(e: &Expr, ids: &mut Vec<u32>) {
            ids.push(e.id.0);
            match &e.kind {
                ExprKind::Call { callee, args, .. } => {
                    collect(callee, ids);
                    for a in args {
                        collect(a, ids);
                    }
                }
                _ => {}
            }
        }
        if let StmtKind::Expr(e) = &result.program.body[0].kind {
            collect(e, &mut ids);
        }
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
    }
}
