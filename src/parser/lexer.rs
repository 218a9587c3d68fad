//! Lexer: characters to tokens
//!
//! Letter runs are resolved here, so unknown names fail at lexing time
//! with a span pointing at the offending run. A run naming a registered
//! function becomes a function head; anything else must split into the
//! known symbols `x`, `y`, `pi` and `e` (`xy` lexes as `x`, `y`).

use crate::error::{ParseError, Span};
use crate::parser::tokens::{Operator, Token};

/// Close any parentheses left open at the end of input.
/// A closing parenthesis with no matching opener is an error.
pub(crate) fn balance_parentheses(input: &str) -> Result<String, ParseError> {
    let mut depth: usize = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    return Err(ParseError::UnbalancedParens {
                        span: Some(Span::at(i)),
                    });
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    if depth == 0 {
        Ok(input.to_string())
    } else {
        let mut balanced = String::with_capacity(input.len() + depth);
        balanced.push_str(input);
        for _ in 0..depth {
            balanced.push(')');
        }
        Ok(balanced)
    }
}

/// Tokenize the input string
pub(crate) fn lex(input: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut tokens = Vec::with_capacity(chars.len() / 2 + 1);
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        match c {
            c if c.is_whitespace() => {
                i += 1;
            }

            '0'..='9' | '.' => {
                let start = pos;
                let mut end = pos + 1;
                i += 1;
                while i < chars.len() && matches!(chars[i].1, '0'..='9' | '.') {
                    end = chars[i].0 + 1;
                    i += 1;
                }
                let text = &input[start..end];
                let value = text.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                    value: text.to_string(),
                    span: Some(Span::new(start, end)),
                })?;
                tokens.push(Token::Number(value));
            }

            c if c.is_ascii_alphabetic() => {
                let start = pos;
                let mut end = pos + 1;
                i += 1;
                while i < chars.len() && chars[i].1.is_ascii_alphabetic() {
                    end = chars[i].0 + 1;
                    i += 1;
                }
                lex_letter_run(&input[start..end], Span::new(start, end), &mut tokens)?;
            }

            '+' => {
                tokens.push(Token::Operator(Operator::Add));
                i += 1;
            }
            '-' => {
                tokens.push(Token::Operator(Operator::Sub));
                i += 1;
            }
            '*' => {
                // ** is an alias for ^
                if i + 1 < chars.len() && chars[i + 1].1 == '*' {
                    tokens.push(Token::Operator(Operator::Pow));
                    i += 2;
                } else {
                    tokens.push(Token::Operator(Operator::Mul));
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Operator(Operator::Div));
                i += 1;
            }
            '^' => {
                tokens.push(Token::Operator(Operator::Pow));
                i += 1;
            }
            '(' => {
                tokens.push(Token::LeftParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RightParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }

            other => {
                return Err(ParseError::invalid_token_at(
                    other.to_string(),
                    Span::at(pos),
                ));
            }
        }
    }

    Ok(tokens)
}

/// Resolve one run of letters into tokens
fn lex_letter_run(run: &str, span: Span, tokens: &mut Vec<Token>) -> Result<(), ParseError> {
    // A run naming a registered function becomes a function head; the
    // parser insists on a following '('
    if let Some(op) = Operator::from_function_name(run) {
        tokens.push(Token::Operator(op));
        return Ok(());
    }

    // Otherwise the run must decompose into known symbols
    let mut rest = run;
    while !rest.is_empty() {
        if rest.starts_with("pi") {
            tokens.push(Token::Identifier("pi".to_string()));
            rest = &rest[2..];
        } else {
            match rest.chars().next() {
                Some(c @ ('x' | 'y' | 'e')) => {
                    tokens.push(Token::Identifier(c.to_string()));
                    rest = &rest[1..];
                }
                _ => return Err(ParseError::unknown_symbol_at(run, span)),
            }
        }
    }

    Ok(())
}
