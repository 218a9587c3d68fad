//! Mathematical function definitions for the function registry
//!
//! Contains evaluation and symbolic differentiation rules for all supported functions.
//!
//! # Derivative References
//!
//! Derivative formulas follow standard calculus and DLMF:
//! - Trigonometric: Any standard calculus text, DLMF §4.21-4.28
//! - Hyperbolic: DLMF §4.35-4.37 <https://dlmf.nist.gov/4.35>

use super::registry::FunctionDefinition;
use super::{func, mul_opt, neg};
use crate::ast::Expr;

/// Return all function definitions for populating the registry
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        // Trigonometric
        FunctionDefinition {
            name: "sin",
            arity: 1..=1,
            eval: |args| Some(args[0].sin()),
            derivative: |args, arg_primes| {
                // d/dx sin(u) = cos(u) * u'
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(func("cos", u), u_prime)
            },
        },
        FunctionDefinition {
            name: "cos",
            arity: 1..=1,
            eval: |args| Some(args[0].cos()),
            derivative: |args, arg_primes| {
                // d/dx cos(u) = -sin(u) * u'
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(neg(func("sin", u)), u_prime)
            },
        },
        FunctionDefinition {
            name: "tan",
            arity: 1..=1,
            eval: |args| Some(args[0].tan()),
            derivative: |args, arg_primes| {
                // d/dx tan(u) = sec^2(u) * u'
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(Expr::pow(func("sec", u), Expr::number(2.0)), u_prime)
            },
        },
        FunctionDefinition {
            name: "cot",
            arity: 1..=1,
            eval: |args| Some(1.0 / args[0].tan()),
            derivative: |args, arg_primes| {
                // d/dx cot(u) = -csc^2(u) * u'
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(
                    neg(Expr::pow(func("csc", u), Expr::number(2.0))),
                    u_prime,
                )
            },
        },
        FunctionDefinition {
            name: "sec",
            arity: 1..=1,
            eval: |args| Some(1.0 / args[0].cos()),
            derivative: |args, arg_primes| {
                // d/dx sec(u) = sec(u)tan(u) * u'
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(
                    Expr::mul_expr(func("sec", u.clone()), func("tan", u)),
                    u_prime,
                )
            },
        },
        FunctionDefinition {
            name: "csc",
            arity: 1..=1,
            eval: |args| Some(1.0 / args[0].sin()),
            derivative: |args, arg_primes| {
                // d/dx csc(u) = -csc(u)cot(u) * u'
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(
                    neg(Expr::mul_expr(func("csc", u.clone()), func("cot", u))),
                    u_prime,
                )
            },
        },
        // Inverse trigonometric
        FunctionDefinition {
            name: "asin",
            arity: 1..=1,
            eval: |args| Some(args[0].asin()),
            derivative: |args, arg_primes| {
                // d/dx asin(u) = u' / sqrt(1 - u^2)
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(
                    Expr::div_expr(
                        Expr::number(1.0),
                        func(
                            "sqrt",
                            Expr::sub_expr(
                                Expr::number(1.0),
                                Expr::pow(u, Expr::number(2.0)),
                            ),
                        ),
                    ),
                    u_prime,
                )
            },
        },
        FunctionDefinition {
            name: "acos",
            arity: 1..=1,
            eval: |args| Some(args[0].acos()),
            derivative: |args, arg_primes| {
                // d/dx acos(u) = -u' / sqrt(1 - u^2)
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(
                    Expr::div_expr(
                        Expr::number(-1.0),
                        func(
                            "sqrt",
                            Expr::sub_expr(
                                Expr::number(1.0),
                                Expr::pow(u, Expr::number(2.0)),
                            ),
                        ),
                    ),
                    u_prime,
                )
            },
        },
        FunctionDefinition {
            name: "atan",
            arity: 1..=1,
            eval: |args| Some(args[0].atan()),
            derivative: |args, arg_primes| {
                // d/dx atan(u) = u' / (1 + u^2)
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(
                    Expr::div_expr(
                        Expr::number(1.0),
                        Expr::add_expr(Expr::number(1.0), Expr::pow(u, Expr::number(2.0))),
                    ),
                    u_prime,
                )
            },
        },
        // Hyperbolic
        FunctionDefinition {
            name: "sinh",
            arity: 1..=1,
            eval: |args| Some(args[0].sinh()),
            derivative: |args, arg_primes| {
                // d/dx sinh(u) = cosh(u) * u'
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(func("cosh", u), u_prime)
            },
        },
        FunctionDefinition {
            name: "cosh",
            arity: 1..=1,
            eval: |args| Some(args[0].cosh()),
            derivative: |args, arg_primes| {
                // d/dx cosh(u) = sinh(u) * u'
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(func("sinh", u), u_prime)
            },
        },
        FunctionDefinition {
            name: "tanh",
            arity: 1..=1,
            eval: |args| Some(args[0].tanh()),
            derivative: |args, arg_primes| {
                // d/dx tanh(u) = (1 - tanh^2(u)) * u'
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(
                    Expr::sub_expr(
                        Expr::number(1.0),
                        Expr::pow(func("tanh", u), Expr::number(2.0)),
                    ),
                    u_prime,
                )
            },
        },
        // Exponential and logarithmic
        FunctionDefinition {
            name: "exp",
            arity: 1..=1,
            eval: |args| Some(args[0].exp()),
            derivative: |args, arg_primes| {
                // d/dx exp(u) = exp(u) * u'
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(func("exp", u), u_prime)
            },
        },
        FunctionDefinition {
            name: "ln",
            arity: 1..=1,
            eval: |args| Some(args[0].ln()),
            derivative: |args, arg_primes| {
                // d/dx ln(u) = u' / u
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(Expr::pow(u, Expr::number(-1.0)), u_prime)
            },
        },
        FunctionDefinition {
            name: "log",
            arity: 1..=2,
            eval: |args| {
                if args.len() == 2 {
                    Some(args[0].log(args[1]))
                } else {
                    Some(args[0].ln())
                }
            },
            derivative: |args, arg_primes| {
                // log(u) is the natural logarithm; log(u, b) = ln(u) / ln(b)
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                let direct = mul_opt(Expr::pow(u.clone(), Expr::number(-1.0)), u_prime);
                if args.len() == 1 {
                    return direct;
                }

                let b = args[1].clone();
                let b_prime = arg_primes[1].clone();
                let ln_b = func("ln", b.clone());
                let argument_term = if direct.is_zero_num() {
                    direct
                } else {
                    Expr::div_expr(direct, ln_b.clone())
                };
                // d/dx ln(b) contributes only when the base itself varies
                let base_term = mul_opt(
                    Expr::div_expr(
                        func("ln", u),
                        Expr::mul_expr(b, Expr::pow(ln_b, Expr::number(2.0))),
                    ),
                    b_prime,
                );
                if base_term.is_zero_num() {
                    argument_term
                } else {
                    Expr::sub_expr(argument_term, base_term)
                }
            },
        },
        // Roots, absolute value
        FunctionDefinition {
            name: "sqrt",
            arity: 1..=1,
            eval: |args| Some(args[0].sqrt()),
            derivative: |args, arg_primes| {
                // d/dx sqrt(u) = u' / (2 * sqrt(u))
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(
                    Expr::div_expr(
                        Expr::number(1.0),
                        Expr::mul_expr(Expr::number(2.0), func("sqrt", u)),
                    ),
                    u_prime,
                )
            },
        },
        FunctionDefinition {
            name: "abs",
            arity: 1..=1,
            eval: |args| Some(args[0].abs()),
            derivative: |args, arg_primes| {
                // d/dx |u| = signum(u) * u'
                let u = args[0].clone();
                let u_prime = arg_primes[0].clone();
                mul_opt(func("signum", u), u_prime)
            },
        },
        FunctionDefinition {
            name: "signum",
            arity: 1..=1,
            eval: |args| Some(args[0].signum()),
            derivative: |_, _| {
                // d/dx signum(u) = 0 almost everywhere
                Expr::number(0.0)
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::Registry;

    #[test]
    fn test_registry_lookup() {
        assert!(Registry::get("sin").is_some());
        assert!(Registry::get("sqrt").is_some());
        assert!(Registry::get("besselj").is_none());
        assert!(Registry::get("foo").is_none());
    }

    #[test]
    fn test_arity_validation() {
        let def = Registry::get("sin").expect("sin is registered");
        assert!(def.validate_arity(1));
        assert!(!def.validate_arity(0));
        assert!(!def.validate_arity(2));
    }

    #[test]
    fn test_eval_closures() {
        let sin = Registry::get("sin").expect("sin is registered");
        let v = (sin.eval)(&[std::f64::consts::FRAC_PI_2]).expect("sin evaluates");
        assert!((v - 1.0).abs() < 1e-12);

        // Domain violations flow through as NaN, not None
        let ln = Registry::get("ln").expect("ln is registered");
        let v = (ln.eval)(&[-1.0]).expect("ln returns a value");
        assert!(v.is_nan());
    }

    #[test]
    fn test_reciprocal_trig_eval() {
        let sec = Registry::get("sec").expect("sec is registered");
        let v = (sec.eval)(&[0.0]).expect("sec evaluates");
        assert_eq!(v, 1.0);

        let csc = Registry::get("csc").expect("csc is registered");
        let v = (csc.eval)(&[std::f64::consts::FRAC_PI_2]).expect("csc evaluates");
        assert!((v - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_log_optional_base() {
        let log = Registry::get("log").expect("log is registered");
        assert!(log.validate_arity(1));
        assert!(log.validate_arity(2));
        assert!(!log.validate_arity(3));

        let v = (log.eval)(&[8.0, 2.0]).expect("log evaluates");
        assert!((v - 3.0).abs() < 1e-12);
        let v = (log.eval)(&[std::f64::consts::E]).expect("log evaluates");
        assert!((v - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_names_sorted() {
        let names = Registry::names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), all_definitions().len());
    }
}
