// Differentiation engine - applies calculus rules
//
// Inline zero/one checks here keep intermediate trees small while rules
// apply; the simplification pass handles whatever remains.

use crate::ast::{Expr, ExprKind, is_known_constant};
use crate::error::EvalError;

/// Differentiate an expression with respect to `var`.
///
/// Fails only when a function call carries a name the registry does not
/// know, which cannot happen for expressions built by the parser.
pub(crate) fn derive(expr: &Expr, var: &str) -> Result<Expr, EvalError> {
    match &expr.kind {
        // Base cases
        ExprKind::Number(_) => Ok(Expr::number(0.0)),

        ExprKind::Symbol(name) => {
            if name == var && !is_known_constant(name) {
                Ok(Expr::number(1.0))
            } else {
                Ok(Expr::number(0.0))
            }
        }

        // Chain rule through the registry
        ExprKind::FunctionCall { name, args } => {
            if args.is_empty() {
                return Ok(Expr::number(0.0));
            }

            let def = crate::functions::lookup(name).ok_or_else(|| EvalError::UnknownFunction {
                name: name.clone(),
            })?;

            let mut arg_primes = Vec::with_capacity(args.len());
            for arg in args {
                arg_primes.push(derive(arg, var)?);
            }
            Ok((def.derivative)(args, &arg_primes))
        }

        // Sum rule: (u + v)' = u' + v'
        ExprKind::Add(u, v) => {
            let u_prime = derive(u, var)?;
            let v_prime = derive(v, var)?;
            if u_prime.is_zero_num() {
                Ok(v_prime)
            } else if v_prime.is_zero_num() {
                Ok(u_prime)
            } else {
                Ok(Expr::add_expr(u_prime, v_prime))
            }
        }

        // Subtraction rule: (u - v)' = u' - v'
        ExprKind::Sub(u, v) => {
            let u_prime = derive(u, var)?;
            let v_prime = derive(v, var)?;
            if v_prime.is_zero_num() {
                Ok(u_prime)
            } else {
                Ok(Expr::sub_expr(u_prime, v_prime))
            }
        }

        // Product rule: (u * v)' = u' * v + u * v'
        ExprKind::Mul(u, v) => {
            let u_prime = derive(u, var)?;
            let v_prime = derive(v, var)?;

            // Term 1: u' * v
            let term1 = if u_prime.is_zero_num() {
                Expr::number(0.0)
            } else if u_prime.is_one_num() {
                (**v).clone()
            } else if v.is_one_num() {
                u_prime.clone()
            } else if v.is_zero_num() {
                Expr::number(0.0)
            } else {
                Expr::mul_expr(u_prime.clone(), (**v).clone())
            };

            // Term 2: u * v'
            let term2 = if v_prime.is_zero_num() {
                Expr::number(0.0)
            } else if v_prime.is_one_num() {
                (**u).clone()
            } else if u.is_one_num() {
                v_prime.clone()
            } else if u.is_zero_num() {
                Expr::number(0.0)
            } else {
                Expr::mul_expr((**u).clone(), v_prime.clone())
            };

            // Combine terms
            if term1.is_zero_num() {
                Ok(term2)
            } else if term2.is_zero_num() {
                Ok(term1)
            } else {
                Ok(Expr::add_expr(term1, term2))
            }
        }

        // Quotient rule: (u / v)' = (u' * v - u * v') / v^2
        ExprKind::Div(u, v) => {
            let u_prime = derive(u, var)?;
            let v_prime = derive(v, var)?;

            // If both derivatives are 0, result is 0
            if u_prime.is_zero_num() && v_prime.is_zero_num() {
                return Ok(Expr::number(0.0));
            }

            let numerator = if u_prime.is_zero_num() {
                // -u * v'
                if v_prime.is_one_num() {
                    Expr::mul_expr(Expr::number(-1.0), (**u).clone())
                } else {
                    Expr::mul_expr(
                        Expr::number(-1.0),
                        Expr::mul_expr((**u).clone(), v_prime.clone()),
                    )
                }
            } else if v_prime.is_zero_num() {
                // u' * v
                if u_prime.is_one_num() {
                    (**v).clone()
                } else if v.is_one_num() {
                    u_prime.clone()
                } else if v.is_zero_num() {
                    Expr::number(0.0)
                } else {
                    Expr::mul_expr(u_prime.clone(), (**v).clone())
                }
            } else {
                // u' * v - u * v'
                let term1 = if u_prime.is_one_num() {
                    (**v).clone()
                } else if v.is_one_num() {
                    u_prime.clone()
                } else if v.is_zero_num() {
                    Expr::number(0.0)
                } else {
                    Expr::mul_expr(u_prime.clone(), (**v).clone())
                };

                let term2 = if v_prime.is_one_num() {
                    (**u).clone()
                } else if u.is_one_num() {
                    v_prime.clone()
                } else if u.is_zero_num() {
                    Expr::number(0.0)
                } else {
                    Expr::mul_expr((**u).clone(), v_prime.clone())
                };

                if term1.is_zero_num() {
                    Expr::mul_expr(Expr::number(-1.0), term2)
                } else if term2.is_zero_num() {
                    term1
                } else {
                    Expr::sub_expr(term1, term2)
                }
            };

            if numerator.is_zero_num() {
                Ok(Expr::number(0.0))
            } else if v.is_one_num() {
                Ok(numerator)
            } else {
                let denominator = Expr::pow((**v).clone(), Expr::number(2.0));
                Ok(Expr::div_expr(numerator, denominator))
            }
        }

        // Power rule, with logarithmic differentiation for variable exponents
        ExprKind::Pow(u, v) => {
            if is_constant(v) {
                // Constant exponent - use standard power rule
                // (u^n)' = n * u^(n-1) * u'
                let u_prime = derive(u, var)?;

                // If u' is 0, result is 0
                if u_prime.is_zero_num() {
                    return Ok(Expr::number(0.0));
                }

                let n = (**v).clone();
                if let Some(n_val) = n.as_number() {
                    if n_val == 0.0 {
                        // (u^0)' = 0
                        Ok(Expr::number(0.0))
                    } else if n_val == 1.0 {
                        // (u^1)' = u'
                        Ok(u_prime)
                    } else {
                        let n_minus_1 = Expr::number(n_val - 1.0);
                        let u_pow_n_minus_1 = if u.is_one_num() {
                            // 1^(n-1) = 1
                            Expr::number(1.0)
                        } else if u.is_zero_num() {
                            // 0^(n-1) = 0 for n-1 > 0
                            Expr::number(0.0)
                        } else {
                            Expr::pow((**u).clone(), n_minus_1)
                        };

                        if u_prime.is_one_num() {
                            Ok(Expr::mul_expr(n, u_pow_n_minus_1))
                        } else {
                            Ok(Expr::mul_expr(
                                n,
                                Expr::mul_expr(u_pow_n_minus_1, u_prime),
                            ))
                        }
                    }
                } else {
                    // Non-numeric constant exponent such as pi
                    let n_minus_1 = Expr::sub_expr((**v).clone(), Expr::number(1.0));
                    let u_pow_n_minus_1 = Expr::pow((**u).clone(), n_minus_1);

                    if u_prime.is_one_num() {
                        Ok(Expr::mul_expr((**v).clone(), u_pow_n_minus_1))
                    } else {
                        Ok(Expr::mul_expr(
                            (**v).clone(),
                            Expr::mul_expr(u_pow_n_minus_1, u_prime),
                        ))
                    }
                }
            } else {
                // Variable exponent - logarithmic differentiation:
                // d/dx[u^v] = u^v * (v' * ln(u) + v * u'/u)
                let u_prime = derive(u, var)?;
                let v_prime = derive(v, var)?;

                // If both u' and v' are 0, result is 0
                if u_prime.is_zero_num() && v_prime.is_zero_num() {
                    return Ok(Expr::number(0.0));
                }

                // Term 1: v' * ln(u)
                let ln_u = if matches!(&u.kind, ExprKind::Symbol(name) if name == "e") {
                    // ln(e) = 1
                    Expr::number(1.0)
                } else if u.is_one_num() {
                    // ln(1) = 0
                    Expr::number(0.0)
                } else {
                    Expr::func("ln", (**u).clone())
                };
                let term1 = if v_prime.is_zero_num() || ln_u.is_zero_num() {
                    Expr::number(0.0)
                } else if v_prime.is_one_num() {
                    ln_u
                } else if ln_u.is_one_num() {
                    v_prime.clone()
                } else {
                    Expr::mul_expr(v_prime.clone(), ln_u)
                };

                // Term 2: v * (u'/u)
                let u_prime_over_u = if u_prime.is_zero_num() {
                    Expr::number(0.0)
                } else if u.is_one_num() {
                    // u'/1 = u'
                    u_prime.clone()
                } else if u_prime.is_one_num() {
                    // 1/u
                    Expr::pow((**u).clone(), Expr::number(-1.0))
                } else {
                    Expr::div_expr(u_prime.clone(), (**u).clone())
                };
                let term2 = if u_prime_over_u.is_zero_num() {
                    Expr::number(0.0)
                } else if v.is_one_num() {
                    u_prime_over_u
                } else if u_prime_over_u.is_one_num() {
                    (**v).clone()
                } else {
                    Expr::mul_expr((**v).clone(), u_prime_over_u)
                };

                // Sum of terms
                let sum = if term1.is_zero_num() {
                    term2
                } else if term2.is_zero_num() {
                    term1
                } else {
                    Expr::add_expr(term1, term2)
                };

                // Multiply by u^v
                if sum.is_zero_num() {
                    Ok(Expr::number(0.0))
                } else if sum.is_one_num() {
                    Ok(Expr::pow((**u).clone(), (**v).clone()))
                } else {
                    Ok(Expr::mul_expr(
                        Expr::pow((**u).clone(), (**v).clone()),
                        sum,
                    ))
                }
            }
        }
    }
}

/// True when the expression holds no plot variables, only numbers and
/// named constants
fn is_constant(expr: &Expr) -> bool {
    expr.variables().iter().all(|s| is_known_constant(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_number_and_symbol() {
        assert!(derive(&Expr::number(5.0), "x").unwrap().is_zero_num());
        assert!(derive(&Expr::symbol("x"), "x").unwrap().is_one_num());
        assert!(derive(&Expr::symbol("y"), "x").unwrap().is_zero_num());
        // Named constants differentiate to zero even against themselves
        assert!(derive(&Expr::symbol("pi"), "pi").unwrap().is_zero_num());
    }

    #[test]
    fn test_derive_sinh() {
        let expr = Expr::func("sinh", Expr::symbol("x"));
        let result = derive(&expr, "x").unwrap();
        assert_eq!(result.to_string(), "cosh(x)");
    }

    #[test]
    fn test_derive_subtraction() {
        let expr = Expr::sub_expr(Expr::symbol("x"), Expr::number(3.0));
        let result = derive(&expr, "x").unwrap();
        match result.kind {
            ExprKind::Number(n) => assert_eq!(n, 1.0),
            _ => panic!("Expected Number(1.0), got {:?}", result.kind),
        }
    }

    #[test]
    fn test_derive_power_rule() {
        // d/dx x^2 = 2 * x
        let expr = Expr::pow(Expr::symbol("x"), Expr::number(2.0));
        let result = derive(&expr, "x").unwrap();
        assert_eq!(result.to_string(), "2 * x");

        // d/dx x^3 = 3 * x^2
        let expr = Expr::pow(Expr::symbol("x"), Expr::number(3.0));
        let result = derive(&expr, "x").unwrap();
        assert_eq!(result.to_string(), "3 * x^2");
    }

    #[test]
    fn test_derive_partial_ignores_other_variable() {
        // d/dx (x^2 + y^2) = 2 * x, the y term vanishes
        let expr = Expr::add_expr(
            Expr::pow(Expr::symbol("x"), Expr::number(2.0)),
            Expr::pow(Expr::symbol("y"), Expr::number(2.0)),
        );
        assert_eq!(derive(&expr, "x").unwrap().to_string(), "2 * x");
        assert_eq!(derive(&expr, "y").unwrap().to_string(), "2 * y");
    }

    #[test]
    fn test_derive_division() {
        // d/dx (1 / x) has a quotient shape
        let expr = Expr::div_expr(Expr::number(1.0), Expr::symbol("x"));
        let result = derive(&expr, "x").unwrap();
        assert!(matches!(result.kind, ExprKind::Mul(_, _) | ExprKind::Div(_, _)));
        // Numerically it equals -1/x^2
        assert!((result.evaluate(2.0, 0.0) + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_derive_product_rule() {
        // d/dx (x * sin(y)) = sin(y)
        let expr = Expr::mul_expr(Expr::symbol("x"), Expr::func("sin", Expr::symbol("y")));
        let result = derive(&expr, "x").unwrap();
        assert_eq!(result.to_string(), "sin(y)");
    }

    #[test]
    fn test_logarithmic_differentiation() {
        // d/dx x^x = x^x * (ln(x) + 1), checked numerically at x = 2
        let expr = Expr::pow(Expr::symbol("x"), Expr::symbol("x"));
        let result = derive(&expr, "x").unwrap();
        assert!(matches!(result.kind, ExprKind::Mul(_, _)));
        let expected = 4.0 * (2.0_f64.ln() + 1.0);
        assert!((result.evaluate(2.0, 0.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_derive_exponent_variable_base_e() {
        // d/dx e^x = e^x, via the ln(e) = 1 shortcut
        let expr = Expr::pow(Expr::symbol("e"), Expr::symbol("x"));
        let result = derive(&expr, "x").unwrap();
        assert_eq!(result.to_string(), "exp(x)");
    }

    #[test]
    fn test_derive_chain_rule() {
        // d/dx sin(x^2) = cos(x^2) * (2 * x)
        let expr = Expr::func("sin", Expr::pow(Expr::symbol("x"), Expr::number(2.0)));
        let result = derive(&expr, "x").unwrap();
        let at = |x: f64| result.evaluate(x, 0.0);
        let expected = |x: f64| (x * x).cos() * 2.0 * x;
        assert!((at(1.3) - expected(1.3)).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_function_is_rejected() {
        let expr = Expr::func("frobnicate", Expr::symbol("x"));
        let err = derive(&expr, "x").unwrap_err();
        assert!(matches!(err, EvalError::UnknownFunction { .. }));
    }
}
