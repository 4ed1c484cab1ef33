//! Syntax for the embedded scripting language the synthesizer targets.
//!
//! The pipeline mirrors the compiler it serves: a logos-based lexer with an
//! indentation pass produces a token list, and a recursive-descent parser
//! turns it into a `Procedure` AST for the interpreter.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{AssignOp, BinaryOp, Expr, IfArm, Procedure, Stmt, UnaryOp};
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, Parser};
pub use token::{Token, TokenKind};

/// Lex and parse one procedure text.
pub fn parse_source(source: &str) -> Result<Procedure, ParseError> {
    let tokens = Lexer::new(source).lex_all()?;
    Parser::new(&tokens).parse_procedure()
}
