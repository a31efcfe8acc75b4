pub mod eval;
pub mod lex;
pub mod parse;

pub use eval::{evaluate, polish_notation};
pub use lex::{Lexer, Token, TokenKind, tokenize};
pub use parse::{Ast, BinaryOp, Parser, UnaryOp, parse_expression};
