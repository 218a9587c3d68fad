//! Parser module - converts strings to AST
mod implicit_mul;
mod lexer;
mod pratt;
mod tokens;

use crate::ast::Expr;
use crate::error::ParseError;
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES};

/// Parse a formula string into an expression AST
///
/// Accepts infix notation over the variables `x` and `y` with the named
/// constants `pi` and `e`, built-in function calls, and natural notation
/// conveniences: implicit multiplication (`2x`, `x y`, `2(x+y)`), `**` as
/// an alias for `^`, and auto-closing of trailing parentheses.
///
/// # Example
/// ```
/// use gradviz::parse;
///
/// let expr = parse("x^2 + sin(y)").unwrap();
/// assert_eq!(expr.to_string(), "x^2 + sin(y)");
/// ```
///
/// # Errors
/// Returns `ParseError` if:
/// - The input is empty
/// - The input contains invalid syntax or unknown names
/// - A closing parenthesis has no matching opener
/// - The expression exceeds the depth or node count limits
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    // Pipeline: validate -> balance -> lex -> implicit_mul -> parse

    // Step 1: Validate input
    if input.trim().is_empty() {
        return Err(ParseError::EmptyFormula);
    }

    // Step 2: Balance parentheses
    let balanced = lexer::balance_parentheses(input)?;

    // Step 3: Lexing
    let tokens = lexer::lex(&balanced)?;

    // Step 4: Insert implicit multiplication
    let tokens_with_mul = implicit_mul::insert_implicit_multiplication(tokens);

    // Step 5: Build AST
    let expr = pratt::parse_expression(&tokens_with_mul)?;

    // Step 6: Enforce safety limits
    if expr.max_depth() > DEFAULT_MAX_DEPTH {
        return Err(ParseError::MaxDepthExceeded);
    }
    if expr.node_count() > DEFAULT_MAX_NODES {
        return Err(ParseError::MaxNodesExceeded);
    }

    Ok(expr)
}
