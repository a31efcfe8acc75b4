use arith::eval::{evaluate, polish_notation};
use arith::lex::{TokenKind, tokenize};
use arith::parse::{Ast, BinaryOp, UnaryOp};
use arith::parse_expression;

fn eval(input: &str) -> f64 {
    evaluate(&parse_expression(input).unwrap())
}

fn parse_err(input: &str) -> String {
    parse_expression(input).unwrap_err().to_string()
}

fn number(expr: &Ast) -> f64 {
    match expr {
        Ast::Number(n, _) => *n,
        other => panic!("expected a number, got {other:?}"),
    }
}

fn leaves(expr: &Ast) -> usize {
    match expr {
        Ast::Number(..) => 1,
        Ast::Unary(_, _, arg) => leaves(arg),
        Ast::Binary(_, _, lhs, rhs) => leaves(lhs) + leaves(rhs),
    }
}

#[test]
fn subtraction_is_left_associative() {
    assert_eq!(eval("2-3-4"), -5.0);
    assert_eq!(eval("100/10/5"), 2.0);
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(eval("2+3*4"), 14.0);
    assert_eq!(eval("(2+3)*4"), 20.0);
}

#[test]
fn unary_binds_tighter_than_binary() {
    assert_eq!(eval("-2*3"), -6.0);
    assert_eq!(eval("-2+3"), 1.0);
    assert_eq!(eval("--2"), 2.0);
    assert_eq!(eval("5 * -2"), -10.0);
}

#[test]
fn division_follows_f64_semantics() {
    assert_eq!(eval("7/2"), 3.5);
    assert_eq!(eval("1/0"), f64::INFINITY);
    assert!(eval("0/0").is_nan());
}

#[test]
fn leaf_count_matches_number_tokens() {
    for input in ["2", "2+3*4", "(2+3)*4", " 2*(5*2+6*3)--4-+4", "--2"] {
        let numbers = tokenize(input)
            .unwrap()
            .iter()
            .filter(|token| matches!(token.kind, TokenKind::Number(_)))
            .count();
        let expr = parse_expression(input).unwrap();
        assert_eq!(leaves(&expr), numbers, "leaf count mismatch for {input:?}");
    }
}

#[test]
fn postfix_keeps_original_tokens() {
    let expr = parse_expression("2+3*4").unwrap();
    let postfix: Vec<_> = polish_notation(&expr)
        .iter()
        .map(|token| (token.kind, token.position))
        .collect();
    assert_eq!(
        postfix,
        vec![
            (TokenKind::Number(2.0), 0),
            (TokenKind::Number(3.0), 2),
            (TokenKind::Number(4.0), 4),
            (TokenKind::Star, 3),
            (TokenKind::Plus, 1),
        ]
    );
    assert_eq!(expr.to_string(), "NUM(2) NUM(3) NUM(4) STAR PLUS");
}

#[test]
fn nested_input_structure() {
    // Sub(Sub(Mul(2, Add(Mul(5, 2), Mul(6, 3))), -4), +4)
    let expr = parse_expression(" 2*(5*2+6*3)--4-+4").unwrap();
    assert_eq!(expr.token().position, 15);

    let Ast::Binary(BinaryOp::Sub, _, outer, plus_four) = &expr else {
        panic!("expected outer subtraction, got {expr:?}");
    };
    let Ast::Unary(UnaryOp::Plus, _, four) = &**plus_four else {
        panic!("expected unary plus, got {plus_four:?}");
    };
    assert_eq!(number(four), 4.0);

    let Ast::Binary(BinaryOp::Sub, _, product, minus_four) = &**outer else {
        panic!("expected inner subtraction, got {outer:?}");
    };
    let Ast::Unary(UnaryOp::Minus, _, four) = &**minus_four else {
        panic!("expected unary minus, got {minus_four:?}");
    };
    assert_eq!(number(four), 4.0);

    let Ast::Binary(BinaryOp::Mul, _, two, sum) = &**product else {
        panic!("expected multiplication, got {product:?}");
    };
    assert_eq!(number(two), 2.0);

    let Ast::Binary(BinaryOp::Add, _, ten, eighteen) = &**sum else {
        panic!("expected addition, got {sum:?}");
    };
    let Ast::Binary(BinaryOp::Mul, _, five, two) = &**ten else {
        panic!("expected multiplication, got {ten:?}");
    };
    assert_eq!(number(five), 5.0);
    assert_eq!(number(two), 2.0);
    let Ast::Binary(BinaryOp::Mul, _, six, three) = &**eighteen else {
        panic!("expected multiplication, got {eighteen:?}");
    };
    assert_eq!(number(six), 6.0);
    assert_eq!(number(three), 3.0);

    assert_eq!(evaluate(&expr), 56.0);
}

#[test]
fn parentheses_vanish_from_the_tree() {
    let expr = parse_expression("((2))").unwrap();
    assert!(matches!(&expr, Ast::Number(n, _) if *n == 2.0), "got {expr:?}");
}

#[test]
fn empty_input() {
    assert_eq!(parse_err(""), "Empty input");
    assert_eq!(parse_err("   "), "Empty input");
}

#[test]
fn missing_argument() {
    assert_eq!(
        parse_err("  2 +"),
        "Expected an argument for '+' at position 6 but found EOS"
    );
    assert_eq!(
        parse_err("  2 + 3 * ()"),
        "Expected an argument for '(' at position 12 but found ')'"
    );
}

#[test]
fn unclosed_paren() {
    assert_eq!(
        parse_err("  2 + 3 * (2"),
        "Expected ')' at position 13 for '(' at position 11 but found EOS"
    );
    assert_eq!(
        parse_err("  2 + 3 * (2 3"),
        "Expected ')' at position 14 for '(' at position 11 but found 3"
    );
}

#[test]
fn trailing_input() {
    assert_eq!(parse_err("2 2"), "Expected EOS at position 3 but found '2'");
    assert_eq!(parse_err(")"), "Expected EOS at position 1 but found ')'");
}

#[test]
fn failure_leaves_only_an_error() {
    // all-or-nothing: an Err carries no partial tree
    assert!(parse_expression("1 + (2 *").is_err());
    assert!(parse_expression("1 + ").is_err());
}
