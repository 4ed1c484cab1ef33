//! Lexer for the embedded scripting language using logos.
//!
//! The procedure text is indentation-structured, so lexing runs per line:
//! leading spaces are measured against an indent stack that emits
//! `Indent`/`Dedent` tokens, and logos tokenizes the rest of the line.

use logos::Logos;

use super::token::{Token, TokenKind};

/// Raw token from logos (structural tokens are added by the line pass).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")] // Skip horizontal whitespace
#[logos(skip r"#[^\n]*")] // Skip line comments
enum RawToken {
    // === Keywords ===
    #[token("fn")]
    Fn,
    #[token("if")]
    If,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("while")]
    While,
    #[token("return")]
    Return,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // === Symbols ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("+=")]
    PlusEq,
    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token("<")]
    Lt,
    #[token(">=")]
    GtEq,
    #[token(">")]
    Gt,
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
    #[token("!")]
    Bang,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,

    // === Literals ===

    // Float before integer so the shared prefix resolves to the longer match.
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", |lex| {
        lex.slice().replace('_', "").parse::<f64>().ok()
    })]
    Float(f64),

    #[regex(r"[0-9][0-9_]*", |lex| {
        lex.slice().replace('_', "").parse::<i64>().ok()
    })]
    Int(i64),

    // String literal, single- or double-quoted.
    #[regex(r"'([^'\\]|\\.)*'", |lex| unescape_string(lex.slice()))]
    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape_string(lex.slice()))]
    Str(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

/// Lex error with the offending procedure-text line.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("line {line}: unexpected input starting at {text:?}")]
    UnexpectedInput { line: usize, text: String },
    #[error("line {line}: indentation does not match any open block")]
    InconsistentIndent { line: usize },
    #[error("line {line}: tab character in indentation")]
    TabIndent { line: usize },
}

/// Lexer over one procedure text.
pub struct Lexer<'src> {
    source: &'src str,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer { source }
    }

    /// Lex the whole source into a token list ending in `Eof`.
    ///
    /// Blank and comment-only lines are skipped without affecting the
    /// indentation structure.
    pub fn lex_all(&self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut indents: Vec<usize> = vec![0];
        let mut last_line = 0;

        for (index, line) in self.source.lines().enumerate() {
            let line_no = index + 1;
            last_line = line_no;

            let rest = line.trim_start();
            if rest.is_empty() || rest.starts_with('#') {
                continue;
            }
            let leading = &line[..line.len() - rest.len()];
            if leading.contains('\t') {
                return Err(LexError::TabIndent { line: line_no });
            }

            self.adjust_indent(leading.len(), line_no, &mut indents, &mut tokens)?;
            self.lex_line(rest, line_no, &mut tokens)?;
            tokens.push(Token::new(TokenKind::Newline, line_no));
        }

        while indents.len() > 1 {
            indents.pop();
            tokens.push(Token::new(TokenKind::Dedent, last_line));
        }
        tokens.push(Token::new(TokenKind::Eof, last_line));
        Ok(tokens)
    }

    /// Emit Indent/Dedent tokens for the new indentation width.
    fn adjust_indent(
        &self,
        width: usize,
        line_no: usize,
        indents: &mut Vec<usize>,
        tokens: &mut Vec<Token>,
    ) -> Result<(), LexError> {
        let current = indents.last().copied().unwrap_or(0);
        if width > current {
            indents.push(width);
            tokens.push(Token::new(TokenKind::Indent, line_no));
        } else if width < current {
            while indents.last().copied().unwrap_or(0) > width {
                indents.pop();
                tokens.push(Token::new(TokenKind::Dedent, line_no));
            }
            if indents.last().copied().unwrap_or(0) != width {
                return Err(LexError::InconsistentIndent { line: line_no });
            }
        }
        Ok(())
    }

    /// Run logos over the indentation-free tail of one line.
    fn lex_line(
        &self,
        rest: &str,
        line_no: usize,
        tokens: &mut Vec<Token>,
    ) -> Result<(), LexError> {
        let mut logos = RawToken::lexer(rest);
        while let Some(item) = logos.next() {
            match item {
                Ok(raw) => tokens.push(Token::new(convert(raw), line_no)),
                Err(()) => {
                    return Err(LexError::UnexpectedInput {
                        line: line_no,
                        text: logos.slice().to_string(),
                    })
                }
            }
        }
        Ok(())
    }
}

fn convert(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::Fn => TokenKind::Fn,
        RawToken::If => TokenKind::If,
        RawToken::Elif => TokenKind::Elif,
        RawToken::Else => TokenKind::Else,
        RawToken::For => TokenKind::For,
        RawToken::In => TokenKind::In,
        RawToken::While => TokenKind::While,
        RawToken::Return => TokenKind::Return,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::Eq => TokenKind::Eq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Bang => TokenKind::Bang,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Int(n) => TokenKind::Int(n),
        RawToken::Float(x) => TokenKind::Float(x),
        RawToken::Str(s) => TokenKind::Str(s),
        RawToken::Ident(s) => TokenKind::Ident(s),
    }
}

/// Strip the surrounding quotes and process escape sequences. Unknown
/// escapes resolve to the escaped character itself.
fn unescape_string(slice: &str) -> String {
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(c) => out.push(c),
            None => out.push('\\'),
        }
    }
    out
}
