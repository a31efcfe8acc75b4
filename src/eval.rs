use crate::lex::Token;
use crate::parse::{Ast, BinaryOp, UnaryOp};

/// Folds the tree into an `f64`. Division by zero follows IEEE 754, so
/// `1/0` is infinite and `0/0` is NaN.
pub fn evaluate(expr: &Ast) -> f64 {
    match expr {
        Ast::Number(n, _) => *n,
        Ast::Unary(UnaryOp::Plus, _, arg) => evaluate(arg),
        Ast::Unary(UnaryOp::Minus, _, arg) => -evaluate(arg),
        Ast::Binary(op, _, lhs, rhs) => {
            let (lhs, rhs) = (evaluate(lhs), evaluate(rhs));
            match op {
                BinaryOp::Add => lhs + rhs,
                BinaryOp::Sub => lhs - rhs,
                BinaryOp::Mul => lhs * rhs,
                BinaryOp::Div => lhs / rhs,
            }
        }
    }
}

/// Post-order token sequence: children left-to-right, then the node's token.
pub fn polish_notation<'de>(expr: &Ast<'de>) -> Vec<Token<'de>> {
    fn walk<'de>(expr: &Ast<'de>, out: &mut Vec<Token<'de>>) {
        match expr {
            Ast::Number(..) => {}
            Ast::Unary(_, _, arg) => walk(arg, out),
            Ast::Binary(_, _, lhs, rhs) => {
                walk(lhs, out);
                walk(rhs, out);
            }
        }
        out.push(expr.token());
    }

    let mut out = Vec::new();
    walk(expr, &mut out);
    out
}
