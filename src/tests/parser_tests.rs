//! End-to-end parser tests: formula text in, tree or error out.

use crate::{parse, ParseError};

#[test]
fn canonical_formulas_round_trip_through_display() {
    for formula in [
        "x^2 + y^2",
        "sin(x) * cos(y)",
        "1 / x",
        "x^2 * y",
        "sqrt(x^2 + y^2)",
        "exp(x) + ln(y)",
        "log(x, 2)",
    ] {
        let expr = parse(formula).unwrap();
        assert_eq!(expr.to_string(), formula);
    }
}

#[test]
fn implicit_multiplication_covers_natural_notation() {
    for (written, meant) in [
        ("2x", "2 * x"),
        ("x y", "x * y"),
        ("xy", "x * y"),
        ("2(x + y)", "2 * (x + y)"),
        ("2sin(x)", "2 * sin(x)"),
        ("(x + 1)(y + 1)", "(x + 1) * (y + 1)"),
    ] {
        let expr = parse(written).unwrap();
        assert_eq!(expr.to_string(), meant, "for input {written:?}");
    }
}

#[test]
fn double_star_is_a_power_alias() {
    let starred = parse("x**2 + y**2").unwrap();
    let caret = parse("x^2 + y^2").unwrap();
    assert_eq!(starred, caret);
}

#[test]
fn power_is_right_associative() {
    let expr = parse("2^3^2").unwrap();
    assert_eq!(expr.evaluate(0.0, 0.0), 512.0);
}

#[test]
fn unary_minus_binds_below_power() {
    let expr = parse("-x^2").unwrap();
    assert_eq!(expr.evaluate(2.0, 0.0), -4.0);
    assert_eq!(expr.to_string(), "-x^2");
}

#[test]
fn trailing_parentheses_are_auto_closed() {
    assert_eq!(parse("sin(x").unwrap(), parse("sin(x)").unwrap());
    assert_eq!(parse("2 * (x + (y").unwrap(), parse("2 * (x + (y))").unwrap());
}

#[test]
fn stray_closing_parenthesis_is_rejected() {
    let err = parse("x)").unwrap_err();
    match err {
        ParseError::UnbalancedParens { span } => {
            assert_eq!(span.map(|s| s.start), Some(1));
        }
        other => panic!("expected UnbalancedParens, got {other:?}"),
    }
}

#[test]
fn named_constants_evaluate() {
    let expr = parse("pi * e").unwrap();
    let expected = std::f64::consts::PI * std::f64::consts::E;
    assert!((expr.evaluate(0.0, 0.0) - expected).abs() < 1e-12);

    // a letter run decomposes into known symbols
    assert_eq!(parse("pie").unwrap().to_string(), "pi * e");
}

#[test]
fn blank_input_is_rejected() {
    assert_eq!(parse("").unwrap_err(), ParseError::EmptyFormula);
    assert_eq!(parse("   ").unwrap_err(), ParseError::EmptyFormula);
}

#[test]
fn unknown_names_are_rejected_with_their_span() {
    let err = parse("x + zebra").unwrap_err();
    match err {
        ParseError::UnknownSymbol { name, span } => {
            assert_eq!(name, "zebra");
            let span = span.unwrap();
            assert_eq!((span.start, span.end), (4, 9));
        }
        other => panic!("expected UnknownSymbol, got {other:?}"),
    }
}

#[test]
fn stray_characters_are_rejected_with_their_span() {
    let err = parse("x $ y").unwrap_err();
    match err {
        ParseError::InvalidToken { token, span } => {
            assert_eq!(token, "$");
            assert_eq!(span.map(|s| s.start), Some(2));
        }
        other => panic!("expected InvalidToken, got {other:?}"),
    }
}

#[test]
fn malformed_numbers_are_rejected() {
    let err = parse("1.2.3 + x").unwrap_err();
    assert!(matches!(err, ParseError::InvalidNumber { .. }));

    // a bare leading dot is still a valid number
    assert_eq!(parse(".5").unwrap().evaluate(0.0, 0.0), 0.5);
}

#[test]
fn function_arity_is_checked_at_parse_time() {
    assert!(matches!(
        parse("sin(x, y)").unwrap_err(),
        ParseError::WrongArity { got: 2, .. }
    ));
    assert!(matches!(
        parse("log(x, 2, 3)").unwrap_err(),
        ParseError::WrongArity { got: 3, .. }
    ));
}

#[test]
fn function_head_requires_parentheses() {
    assert!(matches!(
        parse("sin x").unwrap_err(),
        ParseError::UnexpectedToken { .. }
    ));
}

#[test]
fn deeply_skewed_input_hits_the_depth_limit() {
    let mut formula = String::from("x");
    for _ in 0..120 {
        formula.push_str(" + 1");
    }
    assert_eq!(parse(&formula).unwrap_err(), ParseError::MaxDepthExceeded);
}

#[test]
fn broad_balanced_input_hits_the_node_limit() {
    fn doubled(depth: usize) -> String {
        if depth == 0 {
            "(x + 1)".to_string()
        } else {
            let inner = doubled(depth - 1);
            format!("({inner} + {inner})")
        }
    }

    // 2^14 - 1 nodes at depth 14: past the node cap, well under the depth cap
    assert_eq!(parse(&doubled(12)).unwrap_err(), ParseError::MaxNodesExceeded);
}
