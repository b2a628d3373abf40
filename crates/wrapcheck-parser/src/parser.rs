// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation using Pratt parsing for expressions.

use wrapcheck_ast::expr::{ArrowBody, BinOp, Expr, ExprKind, Param, Prop, UnaryOp};
use wrapcheck_ast::stmt::{Program, Stmt, StmtKind};
use wrapcheck_ast::token::{Token, TokenKind};
use wrapcheck_ast::ty::{TypeArgList, TypeExpr, TypeKind};
use wrapcheck_ast::{NodeId, Span};

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// The parser for the TypeScript subset.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Collected errors during parsing
    errors: Vec<ParseError>,
    /// Counter for generating unique NodeIds
    next_node_id: u32,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0, errors: Vec::new(), next_node_id: 0 }
    }

    pub fn parse(mut self) -> ParseResult {
        let mut body = Vec::new();

        while !self.at_end() {
            match self.parse_stmt() {
                Ok(stmt) => body.push(stmt),
                Err(e) => {
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize();
                }
            }
        }

        ParseResult {
            program: Program { body },
            errors: self.errors,
        }
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Record error, return if should continue.
    fn record_error(&mut self, error: ParseError) -> bool {
        self.errors.push(error);
        self.errors.len() < MAX_ERRORS
    }

    /// Skip to the next statement boundary after an error.
    fn synchronize(&mut self) {
        while !self.at_end() {
            if matches!(self.current_kind(), TokenKind::Semi) {
                self.advance();
                return;
            }
            match self.current_kind() {
                TokenKind::Const
                | TokenKind::Let
                | TokenKind::Var
                | TokenKind::Function
                | TokenKind::Import
                | TokenKind::Export
                | TokenKind::Return
                | TokenKind::Throw
                | TokenKind::If => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek(&self, n: usize) -> &TokenKind {
        self.tokens.get(self.pos + n).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        if !self.at_end() {
            self.pos += 1;
        }
        self.tokens.get(self.pos - 1).unwrap()
    }

    fn prev_end(&self) -> usize {
        self.tokens[self.pos.saturating_sub(1)].span.end
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(
                &kind.display_name(),
                self.current_kind(),
                self.current().span,
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::expected(
                "a name",
                self.current_kind(),
                self.current().span,
            )),
        }
    }

    fn expect_string(&mut self) -> Result<String, ParseError> {
        match self.current_kind().clone() {
            TokenKind::String(s) => {
                self.advance();
                Ok(s)
            }
            _ => Err(ParseError::expected(
                "a string",
                self.current_kind(),
                self.current().span,
            )),
        }
    }

    /// Allow keywords as property names after `.` or `?.` or in object keys.
    fn expect_property_name(&mut self) -> Result<String, ParseError> {
        let name = match self.current_kind().clone() {
            TokenKind::Ident(name) => name,
            TokenKind::From => "from".to_string(),
            TokenKind::New => "new".to_string(),
            TokenKind::Typeof => "typeof".to_string(),
            TokenKind::Async => "async".to_string(),
            TokenKind::Await => "await".to_string(),
            TokenKind::String(s) => s,
            _ => {
                return Err(ParseError::expected(
                    "a property name",
                    self.current_kind(),
                    self.current().span,
                ))
            }
        };
        self.advance();
        Ok(name)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current().span.start;

        match self.current_kind() {
            TokenKind::Import => self.parse_import(start),
            TokenKind::Export => {
                self.advance();
                match self.current_kind() {
                    TokenKind::Function => self.parse_function_decl(start, true, false),
                    TokenKind::Async if matches!(self.peek(1), TokenKind::Function) => {
                        self.advance();
                        self.parse_function_decl(start, true, true)
                    }
                    TokenKind::Const | TokenKind::Let | TokenKind::Var => self.parse_binding(start),
                    _ => Err(ParseError::expected(
                        "`function`, `const` or `let` after `export`",
                        self.current_kind(),
                        self.current().span,
                    )),
                }
            }
            TokenKind::Function => self.parse_function_decl(start, false, false),
            TokenKind::Async if matches!(self.peek(1), TokenKind::Function) => {
                self.advance();
                self.parse_function_decl(start, false, true)
            }
            TokenKind::Const | TokenKind::Let | TokenKind::Var => self.parse_binding(start),
            TokenKind::Return => {
                self.advance();
                let value = if self.is_stmt_end() {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                let end = self.prev_end();
                self.match_token(&TokenKind::Semi);
                Ok(Stmt { id: self.next_id(), kind: StmtKind::Return(value), span: Span::new(start, end) })
            }
            TokenKind::Throw => {
                self.advance();
                let value = self.parse_expr()?;
                let end = value.span.end;
                self.match_token(&TokenKind::Semi);
                Ok(Stmt { id: self.next_id(), kind: StmtKind::Throw(value), span: Span::new(start, end) })
            }
            TokenKind::If => self.parse_if(start),
            _ => {
                let expr = self.parse_expr()?;
                let end = expr.span.end;
                self.match_token(&TokenKind::Semi);
                Ok(Stmt { id: self.next_id(), kind: StmtKind::Expr(expr), span: Span::new(start, end) })
            }
        }
    }

    fn is_stmt_end(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::Semi | TokenKind::RBrace | TokenKind::Eof
        )
    }

    /// `import { a, b } from "mod"`
    fn parse_import(&mut self, start: usize) -> Result<Stmt, ParseError> {
        self.expect(&TokenKind::Import)?;
        self.expect(&TokenKind::LBrace)?;

        let mut names = Vec::new();
        loop {
            if self.check(&TokenKind::RBrace) {
                break;
            }
            names.push(self.expect_ident()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        self.expect(&TokenKind::From)?;
        let module = self.expect_string()?;
        let end = self.prev_end();
        self.match_token(&TokenKind::Semi);

        Ok(Stmt {
            id: self.next_id(),
            kind: StmtKind::Import { names, module },
            span: Span::new(start, end),
        })
    }

    fn parse_function_decl(&mut self, start: usize, is_export: bool, is_async: bool) -> Result<Stmt, ParseError> {
        self.expect(&TokenKind::Function)?;
        let name = self.expect_ident()?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        let end = self.prev_end();

        Ok(Stmt {
            id: self.next_id(),
            kind: StmtKind::FunctionDecl { is_export, is_async, name, params, body },
            span: Span::new(start, end),
        })
    }

    fn parse_binding(&mut self, start: usize) -> Result<Stmt, ParseError> {
        let is_const = matches!(self.current_kind(), TokenKind::Const);
        self.advance();
        let name = self.expect_ident()?;

        let ty = if self.match_token(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let kind = if is_const {
            self.expect(&TokenKind::Eq)?;
            let init = self.parse_expr()?;
            StmtKind::Const { name, ty, init }
        } else {
            let init = if self.match_token(&TokenKind::Eq) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            StmtKind::Let { name, ty, init }
        };

        let end = self.prev_end();
        self.match_token(&TokenKind::Semi);
        Ok(Stmt { id: self.next_id(), kind, span: Span::new(start, end) })
    }

    fn parse_if(&mut self, start: usize) -> Result<Stmt, ParseError> {
        self.expect(&TokenKind::If)?;
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let then_branch = self.parse_branch()?;

        let else_branch = if self.match_token(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                let nested_start = self.current().span.start;
                Some(vec![self.parse_if(nested_start)?])
            } else {
                Some(self.parse_branch()?)
            }
        } else {
            None
        };

        let end = self.prev_end();
        Ok(Stmt {
            id: self.next_id(),
            kind: StmtKind::If { cond, then_branch, else_branch },
            span: Span::new(start, end),
        })
    }

    /// A branch is either a braced block or a single statement.
    fn parse_branch(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if self.check(&TokenKind::LBrace) {
            self.parse_block()
        } else {
            Ok(vec![self.parse_stmt()?])
        }
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(stmts)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    const PREFIX_BP: u8 = 15;

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_expr_bp(0)?;

        // Assignment is right-associative and lowest precedence
        if self.check(&TokenKind::Eq) {
            if !matches!(lhs.kind, ExprKind::Ident(_) | ExprKind::Member { .. }) {
                return Err(ParseError {
                    span: self.current().span,
                    message: "invalid assignment target".to_string(),
                    hint: None,
                });
            }
            self.advance();
            let value = self.parse_expr()?;
            let span = Span::new(lhs.span.start, value.span.end);
            return Ok(Expr {
                id: self.next_id(),
                kind: ExprKind::Assign { target: Box::new(lhs), value: Box::new(value) },
                span,
            });
        }

        Ok(lhs)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let start = self.current().span.start;
        let mut lhs = self.parse_prefix()?;

        loop {
            if let Some(bp) = self.postfix_bp() {
                if bp < min_bp {
                    break;
                }
                lhs = self.parse_postfix(lhs)?;
                continue;
            }

            if let Some((l_bp, r_bp, op)) = self.infix_bp() {
                if l_bp < min_bp {
                    break;
                }
                self.advance();
                let rhs = self.parse_expr_bp(r_bp)?;
                let end = rhs.span.end;
                lhs = Expr {
                    id: self.next_id(),
                    kind: ExprKind::Binary { op, left: Box::new(lhs), right: Box::new(rhs) },
                    span: Span::new(start, end),
                };
                continue;
            }

            break;
        }

        Ok(lhs)
    }

    /// Postfix binding power for call, member access and typed calls.
    fn postfix_bp(&self) -> Option<u8> {
        match self.current_kind() {
            TokenKind::LParen | TokenKind::Dot | TokenKind::QuestionDot => Some(17),
            TokenKind::Lt if self.looks_like_type_args() => Some(17),
            _ => None,
        }
    }

    fn infix_bp(&self) -> Option<(u8, u8, BinOp)> {
        let (l, r, op) = match self.current_kind() {
            TokenKind::PipePipe => (3, 4, BinOp::Or),
            TokenKind::AmpAmp => (5, 6, BinOp::And),
            TokenKind::EqEqEq => (7, 8, BinOp::StrictEq),
            TokenKind::BangEqEq => (7, 8, BinOp::StrictNe),
            TokenKind::EqEq => (7, 8, BinOp::Eq),
            TokenKind::BangEq => (7, 8, BinOp::Ne),
            TokenKind::Lt => (9, 10, BinOp::Lt),
            TokenKind::Gt => (9, 10, BinOp::Gt),
            TokenKind::LtEq => (9, 10, BinOp::Le),
            TokenKind::GtEq => (9, 10, BinOp::Ge),
            TokenKind::Plus => (11, 12, BinOp::Add),
            TokenKind::Minus => (11, 12, BinOp::Sub),
            TokenKind::Star => (13, 14, BinOp::Mul),
            TokenKind::Slash => (13, 14, BinOp::Div),
            TokenKind::Percent => (13, 14, BinOp::Mod),
            _ => return None,
        };
        Some((l, r, op))
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span.start;

        match self.current_kind().clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr { id: self.next_id(), kind: ExprKind::Number(n), span: Span::new(start, self.prev_end()) })
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Expr { id: self.next_id(), kind: ExprKind::String(s), span: Span::new(start, self.prev_end()) })
            }
            TokenKind::Bool(b) => {
                self.advance();
                Ok(Expr { id: self.next_id(), kind: ExprKind::Bool(b), span: Span::new(start, self.prev_end()) })
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expr { id: self.next_id(), kind: ExprKind::Null, span: Span::new(start, self.prev_end()) })
            }
            TokenKind::Undefined => {
                self.advance();
                Ok(Expr { id: self.next_id(), kind: ExprKind::Undefined, span: Span::new(start, self.prev_end()) })
            }

            // Single-parameter arrow without parentheses: `x => ...`
            TokenKind::Ident(_) if matches!(self.peek(1), TokenKind::Arrow) => {
                self.parse_arrow_unparenthesized(start, false)
            }

            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr { id: self.next_id(), kind: ExprKind::Ident(name), span: Span::new(start, self.prev_end()) })
            }

            TokenKind::Async => self.parse_async_prefix(start),

            TokenKind::Function => self.parse_function_expr(start, false),

            TokenKind::Await => {
                self.advance();
                let operand = self.parse_expr_bp(Self::PREFIX_BP)?;
                let end = operand.span.end;
                Ok(Expr { id: self.next_id(), kind: ExprKind::Await(Box::new(operand)), span: Span::new(start, end) })
            }

            TokenKind::Typeof => {
                self.advance();
                let operand = self.parse_expr_bp(Self::PREFIX_BP)?;
                let end = operand.span.end;
                Ok(Expr {
                    id: self.next_id(),
                    kind: ExprKind::Unary { op: UnaryOp::Typeof, operand: Box::new(operand) },
                    span: Span::new(start, end),
                })
            }

            TokenKind::Bang => {
                self.advance();
                let operand = self.parse_expr_bp(Self::PREFIX_BP)?;
                let end = operand.span.end;
                Ok(Expr {
                    id: self.next_id(),
                    kind: ExprKind::Unary { op: UnaryOp::Not, operand: Box::new(operand) },
                    span: Span::new(start, end),
                })
            }

            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_expr_bp(Self::PREFIX_BP)?;
                let end = operand.span.end;
                Ok(Expr {
                    id: self.next_id(),
                    kind: ExprKind::Unary { op: UnaryOp::Neg, operand: Box::new(operand) },
                    span: Span::new(start, end),
                })
            }

            TokenKind::New => {
                self.advance();
                let mut callee = {
                    let cstart = self.current().span.start;
                    let name = self.expect_ident()?;
                    Expr { id: self.next_id(), kind: ExprKind::Ident(name), span: Span::new(cstart, self.prev_end()) }
                };
                while self.match_token(&TokenKind::Dot) {
                    let property = self.expect_property_name()?;
                    let span = Span::new(callee.span.start, self.prev_end());
                    callee = Expr {
                        id: self.next_id(),
                        kind: ExprKind::Member { object: Box::new(callee), property, optional: false },
                        span,
                    };
                }
                let args = if self.match_token(&TokenKind::LParen) {
                    let args = self.parse_args()?;
                    self.expect(&TokenKind::RParen)?;
                    args
                } else {
                    Vec::new()
                };
                let end = self.prev_end();
                Ok(Expr {
                    id: self.next_id(),
                    kind: ExprKind::New { callee: Box::new(callee), args },
                    span: Span::new(start, end),
                })
            }

            TokenKind::LParen => {
                if self.arrow_ahead(self.pos) {
                    return self.parse_arrow(start, false);
                }
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                // Parenthesized expressions keep no node of their own
                Ok(inner)
            }

            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                while !self.check(&TokenKind::RBracket) {
                    items.push(self.parse_expr()?);
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RBracket)?;
                Ok(Expr { id: self.next_id(), kind: ExprKind::Array(items), span: Span::new(start, self.prev_end()) })
            }

            TokenKind::LBrace => {
                self.advance();
                let mut props = Vec::new();
                while !self.check(&TokenKind::RBrace) {
                    let key = self.expect_property_name()?;
                    self.expect(&TokenKind::Colon)?;
                    let value = self.parse_expr()?;
                    props.push(Prop { key, value });
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RBrace)?;
                Ok(Expr { id: self.next_id(), kind: ExprKind::Object(props), span: Span::new(start, self.prev_end()) })
            }

            _ => Err(ParseError::expected(
                "expression",
                self.current_kind(),
                self.current().span,
            )),
        }
    }

    /// `async` is contextual: arrow or function literal when one follows,
    /// a plain identifier otherwise.
    fn parse_async_prefix(&mut self, start: usize) -> Result<Expr, ParseError> {
        match self.peek(1) {
            TokenKind::Function => {
                self.advance();
                self.parse_function_expr(start, true)
            }
            TokenKind::LParen if self.arrow_ahead(self.pos + 1) => {
                self.advance();
                self.parse_arrow(start, true)
            }
            TokenKind::Ident(_) if matches!(self.peek(2), TokenKind::Arrow) => {
                self.advance();
                self.parse_arrow_unparenthesized(start, true)
            }
            _ => {
                self.advance();
                Ok(Expr {
                    id: self.next_id(),
                    kind: ExprKind::Ident("async".to_string()),
                    span: Span::new(start, self.prev_end()),
                })
            }
        }
    }

    /// Look ahead from a `(` token for the matching `)` followed by `=>`.
    fn arrow_ahead(&self, lparen_at: usize) -> bool {
        if !matches!(self.tokens.get(lparen_at).map(|t| &t.kind), Some(TokenKind::LParen)) {
            return false;
        }
        let mut depth = 0usize;
        let mut i = lparen_at;
        while let Some(tok) = self.tokens.get(i) {
            match tok.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return matches!(
                            self.tokens.get(i + 1).map(|t| &t.kind),
                            Some(TokenKind::Arrow)
                        );
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
        }
        false
    }

    fn parse_arrow(&mut self, start: usize, is_async: bool) -> Result<Expr, ParseError> {
        let params = self.parse_params()?;
        self.expect(&TokenKind::Arrow)?;
        let body = self.parse_arrow_body()?;
        let end = self.prev_end();
        Ok(Expr {
            id: self.next_id(),
            kind: ExprKind::Arrow { is_async, params, body },
            span: Span::new(start, end),
        })
    }

    fn parse_arrow_unparenthesized(&mut self, start: usize, is_async: bool) -> Result<Expr, ParseError> {
        let pstart = self.current().span.start;
        let name = self.expect_ident()?;
        let params = vec![Param { name, ty: None, span: Span::new(pstart, self.prev_end()) }];
        self.expect(&TokenKind::Arrow)?;
        let body = self.parse_arrow_body()?;
        let end = self.prev_end();
        Ok(Expr {
            id: self.next_id(),
            kind: ExprKind::Arrow { is_async, params, body },
            span: Span::new(start, end),
        })
    }

    fn parse_arrow_body(&mut self) -> Result<ArrowBody, ParseError> {
        if self.check(&TokenKind::LBrace) {
            Ok(ArrowBody::Block(self.parse_block()?))
        } else {
            Ok(ArrowBody::Expr(Box::new(self.parse_expr()?)))
        }
    }

    fn parse_function_expr(&mut self, start: usize, is_async: bool) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::Function)?;
        let name = match self.current_kind().clone() {
            TokenKind::Ident(n) => {
                self.advance();
                Some(n)
            }
            _ => None,
        };
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        let end = self.prev_end();
        Ok(Expr {
            id: self.next_id(),
            kind: ExprKind::Function { is_async, name, params, body },
            span: Span::new(start, end),
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();

        while !self.check(&TokenKind::RParen) {
            let start = self.current().span.start;
            let name = self.expect_ident()?;
            let ty = if self.match_token(&TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(Param { name, ty, span: Span::new(start, self.prev_end()) });
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_postfix(&mut self, lhs: Expr) -> Result<Expr, ParseError> {
        let start = lhs.span.start;

        match self.current_kind() {
            TokenKind::LParen => {
                self.advance();
                let args = self.parse_args()?;
                self.expect(&TokenKind::RParen)?;
                let end = self.prev_end();
                Ok(Expr {
                    id: self.next_id(),
                    kind: ExprKind::Call { callee: Box::new(lhs), type_args: None, args },
                    span: Span::new(start, end),
                })
            }

            TokenKind::Lt => {
                // Only reached when looks_like_type_args() held
                let type_args = self.parse_type_args()?;
                self.expect(&TokenKind::LParen)?;
                let args = self.parse_args()?;
                self.expect(&TokenKind::RParen)?;
                let end = self.prev_end();
                Ok(Expr {
                    id: self.next_id(),
                    kind: ExprKind::Call { callee: Box::new(lhs), type_args: Some(type_args), args },
                    span: Span::new(start, end),
                })
            }

            TokenKind::Dot | TokenKind::QuestionDot => {
                let optional = matches!(self.current_kind(), TokenKind::QuestionDot);
                self.advance();
                let property = self.expect_property_name()?;
                let end = self.prev_end();
                Ok(Expr {
                    id: self.next_id(),
                    kind: ExprKind::Member { object: Box::new(lhs), property, optional },
                    span: Span::new(start, end),
                })
            }

            _ => Ok(lhs),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        Ok(args)
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Decide whether a `<` at the current position starts a type-argument
    /// list. Scans ahead for the closing `>` over type-shaped tokens and
    /// requires a `(` right after it; anything else means comparison.
    fn looks_like_type_args(&self) -> bool {
        let mut i = self.pos + 1;
        loop {
            match self.tokens.get(i).map(|t| &t.kind) {
                Some(TokenKind::Gt) => {
                    return matches!(
                        self.tokens.get(i + 1).map(|t| &t.kind),
                        Some(TokenKind::LParen)
                    );
                }
                Some(TokenKind::Ident(_))
                | Some(TokenKind::Typeof)
                | Some(TokenKind::Pipe)
                | Some(TokenKind::Comma)
                | Some(TokenKind::Null)
                | Some(TokenKind::Undefined) => i += 1,
                _ => return false,
            }
        }
    }

    /// Parse `<T, U | V>` capturing the full bracketed span.
    fn parse_type_args(&mut self) -> Result<TypeArgList, ParseError> {
        let open = self.expect(&TokenKind::Lt)?.span;
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(&TokenKind::Gt)?.span;
        Ok(TypeArgList {
            span: Span::new(open.start, close.end),
            args,
        })
    }

    /// Parse a type: a primary or a flat `|` union of primaries.
    fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current().span.start;
        let first = self.parse_type_primary()?;

        if !self.check(&TokenKind::Pipe) {
            return Ok(first);
        }

        let mut members = vec![first];
        while self.match_token(&TokenKind::Pipe) {
            members.push(self.parse_type_primary()?);
        }
        let end = self.prev_end();
        Ok(TypeExpr {
            id: self.next_id(),
            kind: TypeKind::Union(members),
            span: Span::new(start, end),
        })
    }

    fn parse_type_primary(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.current().span.start;
        match self.current_kind().clone() {
            TokenKind::Typeof => {
                self.advance();
                let name_span = self.current().span;
                let name = self.expect_ident()?;
                Ok(TypeExpr {
                    id: self.next_id(),
                    kind: TypeKind::Typeof { name, name_span },
                    span: Span::new(start, self.prev_end()),
                })
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(TypeExpr {
                    id: self.next_id(),
                    kind: TypeKind::Named(name),
                    span: Span::new(start, self.prev_end()),
                })
            }
            TokenKind::Null => {
                self.advance();
                Ok(TypeExpr {
                    id: self.next_id(),
                    kind: TypeKind::Named("null".to_string()),
                    span: Span::new(start, self.prev_end()),
                })
            }
            TokenKind::Undefined => {
                self.advance();
                Ok(TypeExpr {
                    id: self.next_id(),
                    kind: TypeKind::Named("undefined".to_string()),
                    span: Span::new(start, self.prev_end()),
                })
            }
            _ => Err(ParseError::expected(
                "type",
                self.current_kind(),
                self.current().span,
            )),
        }
    }
}

/// Result of parsing: a program plus any errors found.
#[derive(Debug)]
pub struct ParseResult {
    pub program: Program,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Returns true if parsing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        let message = format!("Expected {}, found {}", expected, found.display_name());
        let hint = match expected {
            "')'" if matches!(found, TokenKind::Eof) => Some("Unclosed '(' - missing ')'".to_string()),
            "'}'" if matches!(found, TokenKind::Eof) => Some("Unclosed '{' - missing '}'".to_string()),
            "type" => Some("Expected a type name or a `typeof` reference".to_string()),
            _ => None,
        };
        Self { span, message, hint }
    }
}
