use std::fmt::Display;

use miette::{Diagnostic, Error, NamedSource, SourceSpan};
use thiserror::Error;

use crate::lex::{Token, TokenKind, tokenize};

#[derive(Error, Debug, Diagnostic)]
#[error("Empty input")]
pub struct EmptyInputError;

#[derive(Error, Debug, Diagnostic)]
#[error("Expected an argument for '{op}' at position {position} but found {found}")]
#[diagnostic(help("operators need an operand on their right"))]
pub struct MissingArgumentError {
    #[source_code]
    src: NamedSource<String>,

    #[label("operand expected after this")]
    bad_bit: SourceSpan,

    pub op: char,
    /// 1-based position just past the operator character.
    pub position: usize,
    pub found: String,
}

#[derive(Error, Debug, Diagnostic)]
#[error("Expected ')' at position {close} for '(' at position {open} but found {found}")]
#[diagnostic(help("close the parenthesized expression"))]
pub struct UnclosedParenError {
    #[source_code]
    src: NamedSource<String>,

    #[label("this '(' is never closed")]
    open_bit: SourceSpan,

    pub open: usize,
    pub close: usize,
    pub found: String,
}

#[derive(Error, Debug, Diagnostic)]
#[error("Expected EOS at position {position} but found {found}")]
#[diagnostic(help("remove the trailing input"))]
pub struct TrailingInputError {
    #[source_code]
    src: NamedSource<String>,

    #[label("expression already complete here")]
    bad_bit: SourceSpan,

    pub position: usize,
    pub found: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// One owning tree per parse; parentheses are consumed by the parser and
/// never show up here. Every node keeps the token that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast<'de> {
    Number(f64, Token<'de>),
    Unary(UnaryOp, Token<'de>, Box<Ast<'de>>),
    Binary(BinaryOp, Token<'de>, Box<Ast<'de>>, Box<Ast<'de>>),
}

impl<'de> Ast<'de> {
    pub fn token(&self) -> Token<'de> {
        match self {
            Ast::Number(_, token) | Ast::Unary(_, token, _) | Ast::Binary(_, token, _, _) => *token,
        }
    }
}

impl Display for Ast<'_> {
    /// Postfix (Polish) rendering of the token sequence.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ast::Number(_, token) => write!(f, "{token}"),
            Ast::Unary(_, token, arg) => write!(f, "{arg} {token}"),
            Ast::Binary(_, token, lhs, rhs) => write!(f, "{lhs} {rhs} {token}"),
        }
    }
}

pub struct Parser<'t, 'de> {
    filename: Option<&'de str>,
    whole: &'de str,
    tokens: &'t [Token<'de>],
    index: usize,
}

impl<'t, 'de> Parser<'t, 'de> {
    pub fn new(filename: Option<&'de str>, tokens: &'t [Token<'de>], whole: &'de str) -> Self {
        Parser {
            filename,
            whole,
            tokens,
            index: 0,
        }
    }

    pub fn parse(mut self) -> Result<Ast<'de>, Error> {
        if self.tokens.is_empty() {
            return Err(EmptyInputError.into());
        }
        let expr = self.parse_expr()?;
        match expr {
            Some(expr) if self.index == self.tokens.len() => Ok(expr),
            _ => Err(self.trailing_input()),
        }
    }

    /// Position of the next unconsumed token, or the input length once the
    /// sequence is exhausted.
    fn position(&self) -> usize {
        self.tokens
            .get(self.index)
            .map_or(self.whole.len(), |token| token.position)
    }

    fn peek(&self) -> Option<&Token<'de>> {
        self.tokens.get(self.index)
    }

    fn pop(&mut self) -> Option<Token<'de>> {
        let token = self.tokens.get(self.index).copied();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn parse_expr(&mut self) -> Result<Option<Ast<'de>>, Error> {
        self.parse_sum_or_diff()
    }

    fn parse_sum_or_diff(&mut self) -> Result<Option<Ast<'de>>, Error> {
        let Some(mut res) = self.parse_mul_or_div()? else {
            return Ok(None);
        };
        loop {
            let (op, token) = match self.peek() {
                Some(
                    token @ Token {
                        kind: TokenKind::Plus,
                        ..
                    },
                ) => (BinaryOp::Add, *token),
                Some(
                    token @ Token {
                        kind: TokenKind::Minus,
                        ..
                    },
                ) => (BinaryOp::Sub, *token),
                _ => return Ok(Some(res)),
            };
            self.pop();
            let rhs = match self.parse_mul_or_div()? {
                Some(rhs) => rhs,
                None => return Err(self.missing_argument()),
            };
            res = Ast::Binary(op, token, Box::new(res), Box::new(rhs));
        }
    }

    fn parse_mul_or_div(&mut self) -> Result<Option<Ast<'de>>, Error> {
        let Some(mut res) = self.parse_unary()? else {
            return Ok(None);
        };
        loop {
            let (op, token) = match self.peek() {
                Some(
                    token @ Token {
                        kind: TokenKind::Star,
                        ..
                    },
                ) => (BinaryOp::Mul, *token),
                Some(
                    token @ Token {
                        kind: TokenKind::Slash,
                        ..
                    },
                ) => (BinaryOp::Div, *token),
                _ => return Ok(Some(res)),
            };
            self.pop();
            let rhs = match self.parse_unary()? {
                Some(rhs) => rhs,
                None => return Err(self.missing_argument()),
            };
            res = Ast::Binary(op, token, Box::new(res), Box::new(rhs));
        }
    }

    fn parse_unary(&mut self) -> Result<Option<Ast<'de>>, Error> {
        let (op, token) = match self.peek() {
            Some(
                token @ Token {
                    kind: TokenKind::Plus,
                    ..
                },
            ) => (UnaryOp::Plus, *token),
            Some(
                token @ Token {
                    kind: TokenKind::Minus,
                    ..
                },
            ) => (UnaryOp::Minus, *token),
            _ => return self.parse_atom(),
        };
        self.pop();
        let arg = match self.parse_unary()? {
            Some(arg) => arg,
            None => return Err(self.missing_argument()),
        };
        Ok(Some(Ast::Unary(op, token, Box::new(arg))))
    }

    fn parse_atom(&mut self) -> Result<Option<Ast<'de>>, Error> {
        match self.peek().copied() {
            Some(
                token @ Token {
                    kind: TokenKind::Number(n),
                    ..
                },
            ) => {
                self.pop();
                Ok(Some(Ast::Number(n, token)))
            }
            Some(
                open @ Token {
                    kind: TokenKind::LeftParen,
                    ..
                },
            ) => {
                self.pop();
                let inner = match self.parse_expr()? {
                    Some(inner) => inner,
                    None => return Err(self.missing_argument()),
                };
                let close = self.position();
                match self.pop() {
                    Some(Token {
                        kind: TokenKind::RightParen,
                        ..
                    }) => Ok(Some(inner)),
                    _ => Err(UnclosedParenError {
                        src: self.source(),
                        open_bit: SourceSpan::from(open.position..open.position + 1),
                        open: open.position + 1,
                        close: close + 1,
                        found: char_at(self.whole, close)
                            .map_or_else(|| "EOS".to_string(), |c| c.to_string()),
                    }
                    .into()),
                }
            }
            _ => Ok(None),
        }
    }

    // The operator named in the message is the input character one before the
    // current position; with whitespace between operator and failure point
    // this names the blank instead.
    fn missing_argument(&self) -> Error {
        let at = self.position().saturating_sub(1);
        let op = char_at(self.whole, at).unwrap_or(' ');
        let found = char_at(self.whole, at + 1)
            .map_or_else(|| "EOS".to_string(), |c| format!("'{c}'"));
        MissingArgumentError {
            src: self.source(),
            bad_bit: SourceSpan::from(at..at + 1),
            op,
            position: at + 2,
            found,
        }
        .into()
    }

    fn trailing_input(&self) -> Error {
        let at = self.position();
        let found =
            char_at(self.whole, at).map_or_else(|| "EOS".to_string(), |c| format!("'{c}'"));
        TrailingInputError {
            src: self.source(),
            bad_bit: SourceSpan::from(at..(at + 1).min(self.whole.len())),
            position: at + 1,
            found,
        }
        .into()
    }

    fn source(&self) -> NamedSource<String> {
        NamedSource::new(self.filename.unwrap_or("<input>"), self.whole.to_string())
    }
}

fn char_at(whole: &str, at: usize) -> Option<char> {
    whole.get(at..).and_then(|rest| rest.chars().next())
}

/// Tokenizes and parses in one go.
pub fn parse_expression(input: &str) -> Result<Ast<'_>, Error> {
    let tokens = tokenize(input)?;
    Parser::new(None, &tokens, input).parse()
}
