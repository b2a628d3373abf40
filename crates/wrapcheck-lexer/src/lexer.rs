//! The lexer implementation using logos.

use logos::Logos;
use thiserror::Error;
use wrapcheck_ast::token::{Token, TokenKind};
use wrapcheck_ast::Span;

/// Raw token type for logos - literal values are parsed in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    // === Comments (skip them) ===
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/", logos::skip)]
    BlockComment,

    // === Keywords ===
    #[token("const")]
    Const,
    #[token("let")]
    Let,
    #[token("var")]
    Var,
    #[token("function")]
    Function,
    #[token("async")]
    Async,
    #[token("await")]
    Await,
    #[token("return")]
    Return,
    #[token("typeof")]
    Typeof,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("import")]
    Import,
    #[token("export")]
    Export,
    #[token("from")]
    From,
    #[token("throw")]
    Throw,
    #[token("new")]
    New,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("undefined")]
    Undefined,

    // === Operators (order matters - longer first) ===
    #[token("===")]
    EqEqEq,
    #[token("!==")]
    BangEqEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("=>")]
    Arrow,
    #[token("?.")]
    QuestionDot,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,
    #[token(".")]
    Dot,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,

    // === Literals ===
    #[regex(r"[0-9][0-9_]*(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    DoubleString,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    SingleString,

    // === Identifier (must come after keywords) ===
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
}

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// The lexer for the TypeScript subset.
pub struct Lexer<'a> {
    source: &'a str,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self { source, errors: Vec::new() }
    }

    /// Tokenize the entire source, collecting multiple errors.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let span = logos_lexer.span();
            let slice = logos_lexer.slice();

            let kind = match result {
                Ok(raw) => match self.convert_token(raw, slice, span.start, span.end) {
                    Ok(kind) => kind,
                    Err(e) => {
                        self.errors.push(e);
                        continue;
                    }
                },
                Err(()) => {
                    let ch = self.source[span.start..].chars().next().unwrap_or('?');
                    self.errors.push(LexError::unexpected_char(ch, span.start));
                    continue;
                }
            };

            tokens.push(Token {
                kind,
                span: Span::new(span.start, span.end),
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(self.source.len(), self.source.len()),
        });

        LexResult {
            tokens,
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// Convert a raw logos token to our TokenKind, parsing literal values.
    fn convert_token(&self, raw: RawToken, slice: &str, start: usize, end: usize) -> Result<TokenKind, LexError> {
        Ok(match raw {
            RawToken::Const => TokenKind::Const,
            RawToken::Let => TokenKind::Let,
            RawToken::Var => TokenKind::Var,
            RawToken::Function => TokenKind::Function,
            RawToken::Async => TokenKind::Async,
            RawToken::Await => TokenKind::Await,
            RawToken::Return => TokenKind::Return,
            RawToken::Typeof => TokenKind::Typeof,
            RawToken::If => TokenKind::If,
            RawToken::Else => TokenKind::Else,
            RawToken::Import => TokenKind::Import,
            RawToken::Export => TokenKind::Export,
            RawToken::From => TokenKind::From,
            RawToken::Throw => TokenKind::Throw,
            RawToken::New => TokenKind::New,
            RawToken::True => TokenKind::Bool(true),
            RawToken::False => TokenKind::Bool(false),
            RawToken::Null => TokenKind::Null,
            RawToken::Undefined => TokenKind::Undefined,

            RawToken::EqEqEq => TokenKind::EqEqEq,
            RawToken::BangEqEq => TokenKind::BangEqEq,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::BangEq => TokenKind::BangEq,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::AmpAmp => TokenKind::AmpAmp,
            RawToken::PipePipe => TokenKind::PipePipe,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::QuestionDot => TokenKind::QuestionDot,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Question => TokenKind::Question,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::Amp => TokenKind::Amp,
            RawToken::Dot => TokenKind::Dot,

            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Semi => TokenKind::Semi,
            RawToken::Comma => TokenKind::Comma,

            RawToken::Number => {
                let cleaned: String = slice.chars().filter(|c| *c != '_').collect();
                let value = cleaned
                    .parse::<f64>()
                    .map_err(|_| LexError::invalid_number(start, end))?;
                TokenKind::Number(value)
            }
            RawToken::DoubleString | RawToken::SingleString => {
                let inner = &slice[1..slice.len() - 1];
                TokenKind::String(unescape(inner))
            }
            RawToken::Ident => TokenKind::Ident(slice.to_string()),

            // These are skipped by logos, but we list them for completeness
            RawToken::LineComment | RawToken::BlockComment => {
                unreachable!("comments are skipped")
            }
        })
    }
}

/// Process escape sequences in a string literal body.
///
/// Unknown escapes keep the escaped character, matching JS semantics.
fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('0') => result.push('\0'),
            Some(other) => result.push(other),
            None => break,
        }
    }

    result
}

/// Result of lexing: tokens plus any errors found.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    /// Returns true if lexing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A lexer error with location.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// The kind of lexer error.
#[derive(Debug, Clone, Error)]
pub enum LexErrorKind {
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    #[error("invalid number literal")]
    InvalidNumber,
}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        Self {
            kind: LexErrorKind::UnexpectedChar(ch),
            span: Span::new(pos, pos + ch.len_utf8()),
        }
    }

    fn invalid_number(start: usize, end: usize) -> Self {
        Self {
            kind: LexErrorKind::InvalidNumber,
            span: Span::new(start, end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let result = Lexer::new(src).tokenize();
        assert!(result.is_ok(), "lex errors: {:?}", result.errors);
        result.tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_wrap_call_shape() {
        let toks = kinds("wrap<typeof f>()(async () => {})");
        assert_eq!(
            toks,
            vec![
                TokenKind::Ident("wrap".into()),
                TokenKind::Lt,
                TokenKind::Typeof,
                TokenKind::Ident("f".into()),
                TokenKind::Gt,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LParen,
                TokenKind::Async,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Arrow,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_strings_and_numbers() {
        let toks = kinds(r#"const a = 'one'; const b = "two"; const c = 1.5e3;"#);
        assert!(toks.contains(&TokenKind::String("one".into())));
        assert!(toks.contains(&TokenKind::String("two".into())));
        assert!(toks.contains(&TokenKind::Number(1500.0)));
    }

    #[test]
    fn comments_are_skipped() {
        let toks = kinds("a // line\n/* block\n comment */ b");
        assert_eq!(
            toks,
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unexpected_char_is_collected() {
        let result = Lexer::new("const a = #;").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(result.errors[0].kind, LexErrorKind::UnexpectedChar('#')));
        // Lexing continues past the error
        assert!(result.tokens.iter().any(|t| t.kind == TokenKind::Semi));
    }
}
