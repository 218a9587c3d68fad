//! Implicit multiplication insertion for natural notation
//!
//! Inserts `*` operators between tokens where multiplication is implied, e.g. `2x` → `2 * x`.

use crate::parser::tokens::{Operator, Token};

/// Check if implicit multiplication should be inserted between two tokens
fn should_insert_mul(current: &Token, next: &Token) -> bool {
    match (current, next) {
        // Number/Identifier/) * Function head: 4 sin(x) → 4 * sin(x)
        (
            Token::Number(_) | Token::Identifier(_) | Token::RightParen,
            Token::Operator(op),
        ) if op.is_function() => true,

        // Identifier * (: function calls lex as operator heads, so a plain
        // identifier before ( is always multiplication: e(x+1) → e * (x+1)
        (Token::Identifier(_), Token::LeftParen) => true,

        // Coalesced arms for standard multiplication cases:
        // Number * Identifier: 2x
        // Number * (: 2(x)
        // Identifier * Identifier: xy
        // Identifier * Number: x2
        // ) * Identifier: )x
        // ) * Number: )2
        // ) * (: )(
        (Token::Number(_) | Token::Identifier(_) | Token::RightParen, Token::Identifier(_))
        | (Token::Number(_) | Token::RightParen, Token::LeftParen)
        | (Token::Identifier(_) | Token::RightParen, Token::Number(_)) => true,

        // Function head * ( is NOT multiplication (it's a function call)
        (Token::Operator(op), Token::LeftParen) if op.is_function() => false,

        _ => false,
    }
}

/// Insert implicit multiplication operators between appropriate tokens
///
/// Rules:
/// - Number * Identifier: `2 x` → `2 * x`
/// - Identifier * Identifier: `x y` → `x * y`
/// - Identifier * Function: `x sin(x)` → `x * sin(x)`
/// - ) * Identifier/Number/(: `(a) x` → `(a) * x`
/// - Identifier/Number * (: `x (y)` → `x * (y)`
///
/// Exception: Function head followed by ( is NOT multiplication
pub(crate) fn insert_implicit_multiplication(tokens: Vec<Token>) -> Vec<Token> {
    if tokens.is_empty() {
        return tokens;
    }

    // Check if any insertion is needed before allocating a new vector
    let needs_insertion = tokens.windows(2).any(|w| should_insert_mul(&w[0], &w[1]));

    if !needs_insertion {
        return tokens;
    }

    let mut result = Vec::with_capacity(tokens.len() * 3 / 2);
    let mut it = tokens.into_iter().peekable();

    while let Some(current) = it.next() {
        let needs_mul = it
            .peek()
            .is_some_and(|next| should_insert_mul(&current, next));

        result.push(current);
        if needs_mul {
            result.push(Token::Operator(Operator::Mul));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_identifier() {
        let tokens = vec![Token::Number(2.0), Token::Identifier("x".to_string())];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[1], Token::Operator(Operator::Mul)));
    }

    #[test]
    fn test_identifier_identifier() {
        let tokens = vec![
            Token::Identifier("x".to_string()),
            Token::Identifier("y".to_string()),
        ];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[1], Token::Operator(Operator::Mul)));
    }

    #[test]
    fn test_paren_identifier() {
        let tokens = vec![Token::RightParen, Token::Identifier("x".to_string())];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[1], Token::Operator(Operator::Mul)));
    }

    #[test]
    fn test_function_no_multiplication() {
        let tokens = vec![Token::Operator(Operator::Sin), Token::LeftParen];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 2); // No multiplication inserted
    }

    #[test]
    fn test_number_function() {
        let tokens = vec![Token::Number(4.0), Token::Operator(Operator::Sin)];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[1], Token::Operator(Operator::Mul)));
    }

    #[test]
    fn test_identifier_left_paren() {
        let tokens = vec![Token::Identifier("e".to_string()), Token::LeftParen];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[1], Token::Operator(Operator::Mul)));
    }

    #[test]
    fn test_no_insertion_returns_input() {
        let tokens = vec![
            Token::Identifier("x".to_string()),
            Token::Operator(Operator::Add),
            Token::Number(1.0),
        ];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
    }
}
