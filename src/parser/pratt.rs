use crate::ast::{Expr, ExprKind};
use crate::error::ParseError;
use crate::parser::tokens::{Operator, Token};

/// Parse tokens into an AST using Pratt parsing algorithm
pub(crate) fn parse_expression(tokens: &[Token]) -> Result<Expr, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::UnexpectedEndOfInput);
    }

    let mut parser = Parser { tokens, pos: 0 };

    let expr = parser.parse_expr(0)?;

    // Everything must be consumed; a leftover token is a syntax error
    if let Some(token) = parser.current() {
        return Err(ParseError::invalid_token(token.to_user_string()));
    }

    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        // Parse left side (prefix)
        let mut left = self.parse_prefix()?;

        // Parse operators and right side (infix)
        while let Some(token) = self.current() {
            let precedence = match token {
                Token::Operator(op) if !op.is_function() => op.precedence(),
                _ => break,
            };

            if precedence < min_precedence {
                break;
            }

            left = self.parse_infix(left, precedence)?;
        }

        Ok(left)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        if let Some(Token::RightParen) = self.current() {
            return Ok(args); // Empty argument list
        }

        loop {
            args.push(self.parse_expr(0)?);

            match self.current() {
                Some(Token::Comma) => {
                    self.advance(); // consume ,
                }
                Some(Token::RightParen) => {
                    break;
                }
                _ => {
                    return Err(ParseError::UnexpectedToken {
                        expected: ", or )".to_string(),
                        got: self.current_user_string(),
                        span: None,
                    });
                }
            }
        }

        Ok(args)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        // Direct access enables borrowing the token while mutating self.pos
        // (via advance) because we borrow from the underlying slice 'a
        let token = self
            .tokens
            .get(self.pos)
            .ok_or(ParseError::UnexpectedEndOfInput)?;

        match token {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::number(*n))
            }

            // Plain identifiers are always symbols: the lexer resolves
            // function names into operator heads, and implicit
            // multiplication separates identifiers from parentheses
            Token::Identifier(name) => {
                self.advance();
                Ok(Expr::symbol(name.clone()))
            }

            Token::Operator(op) if op.is_function() => {
                self.advance();

                // Function must be followed by (
                if let Some(Token::LeftParen) = self.current() {
                    self.advance(); // consume (
                    let args = self.parse_arguments()?;

                    if let Some(Token::RightParen) = self.current() {
                        self.advance(); // consume )
                    } else {
                        return Err(ParseError::UnexpectedToken {
                            expected: ")".to_string(),
                            got: self.current_user_string(),
                            span: None,
                        });
                    }

                    // Use the canonical name from Operator::to_name()
                    let func_name = op.to_name();

                    let def = crate::functions::lookup(func_name).ok_or_else(|| {
                        ParseError::UnknownFunction {
                            name: func_name.to_string(),
                            span: None,
                        }
                    })?;
                    if !def.validate_arity(args.len()) {
                        return Err(ParseError::WrongArity {
                            name: func_name.to_string(),
                            expected: *def.arity.start(),
                            got: args.len(),
                        });
                    }

                    Ok(Expr::new(ExprKind::FunctionCall {
                        name: func_name.to_string(),
                        args,
                    }))
                } else {
                    Err(ParseError::UnexpectedToken {
                        expected: "(".to_string(),
                        got: self.current_user_string(),
                        span: None,
                    })
                }
            }

            // Unary minus: precedence between Mul (20) and Pow (30)
            // This ensures -x^2 parses as -(x^2), not (-x)^2
            Token::Operator(Operator::Sub) => {
                self.advance();
                let expr = self.parse_expr(25)?;
                Ok(Expr::mul_expr(Expr::number(-1.0), expr))
            }

            // Unary plus: same precedence as unary minus, just returns the expression
            Token::Operator(Operator::Add) => {
                self.advance();
                self.parse_expr(25)
            }

            Token::LeftParen => {
                self.advance(); // consume (
                let expr = self.parse_expr(0)?;

                if let Some(Token::RightParen) = self.current() {
                    self.advance(); // consume )
                    Ok(expr)
                } else {
                    Err(ParseError::UnexpectedToken {
                        expected: ")".to_string(),
                        got: self.current_user_string(),
                        span: None,
                    })
                }
            }

            _ => Err(ParseError::invalid_token(token.to_user_string())),
        }
    }

    fn parse_infix(&mut self, left: Expr, precedence: u8) -> Result<Expr, ParseError> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or(ParseError::UnexpectedEndOfInput)?;

        match token {
            Token::Operator(op) => {
                self.advance();

                // Right associative for power, left for others
                let next_precedence = if matches!(op, Operator::Pow) {
                    precedence // Right associative
                } else {
                    precedence + 1 // Left associative
                };

                let right = self.parse_expr(next_precedence)?;

                let result = match op {
                    Operator::Add => Expr::add_expr(left, right),
                    Operator::Sub => Expr::sub_expr(left, right),
                    Operator::Mul => Expr::mul_expr(left, right),
                    Operator::Div => Expr::div_expr(left, right),
                    Operator::Pow => Expr::pow(left, right),
                    _ => {
                        return Err(ParseError::invalid_token(op.to_name()));
                    }
                };

                Ok(result)
            }

            _ => Err(ParseError::invalid_token(token.to_user_string())),
        }
    }

    fn current_user_string(&self) -> String {
        self.current()
            .map_or_else(|| "end of input".to_string(), Token::to_user_string)
    }
}
