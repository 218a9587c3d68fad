// Display formatting for AST
use crate::ast::{Expr, ExprKind};
use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    if *n > 0.0 {
                        write!(f, "Infinity")
                    } else {
                        write!(f, "-Infinity")
                    }
                } else if n.fract() == 0.0 && n.abs() < 1e10 {
                    // Display as integer if no fractional part
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }

            ExprKind::Symbol(s) => write!(f, "{}", s),

            ExprKind::FunctionCall { name, args } => {
                if args.is_empty() {
                    write!(f, "{}()", name)
                } else {
                    let args_str: Vec<String> = args.iter().map(|arg| format!("{}", arg)).collect();
                    write!(f, "{}({})", name, args_str.join(", "))
                }
            }

            ExprKind::Add(u, v) => {
                // Check if v is a negative term (Mul with -1) to display as subtraction
                if let ExprKind::Mul(left, right) = &v.kind {
                    if let ExprKind::Number(n) = left.kind {
                        if n == -1.0 {
                            let inner_str = format_mul_operand(right);
                            write!(f, "{} - {}", u, inner_str)
                        } else {
                            write!(f, "{} + {}", u, v)
                        }
                    } else {
                        write!(f, "{} + {}", u, v)
                    }
                } else {
                    write!(f, "{} + {}", u, v)
                }
            }

            ExprKind::Sub(u, v) => {
                // Parenthesize RHS when it's an addition or subtraction to preserve
                // the intended grouping: `a - (b + c)` instead of `a - b + c`.
                let right_str = match &v.kind {
                    ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", v),
                    _ => format!("{}", v),
                };
                write!(f, "{} - {}", u, right_str)
            }

            ExprKind::Mul(u, v) => {
                if u.is_neg_one_num() {
                    write!(f, "-{}", format_mul_operand(v))
                } else {
                    write!(f, "{} * {}", format_mul_operand(u), format_mul_operand(v))
                }
            }

            ExprKind::Div(u, v) => {
                let num_str = format!("{}", u);
                let denom_str = format!("{}", v);
                // Add parentheses around numerator if it's addition or subtraction
                let formatted_num = match u.kind {
                    ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", num_str),
                    _ => num_str,
                };
                // Add parentheses around denominator if it's not a simple identifier, number, power, or function
                let formatted_denom = match v.kind {
                    ExprKind::Symbol(_)
                    | ExprKind::Number(_)
                    | ExprKind::Pow(_, _)
                    | ExprKind::FunctionCall { .. } => denom_str,
                    _ => format!("({})", denom_str),
                };
                write!(f, "{} / {}", formatted_num, formatted_denom)
            }

            ExprKind::Pow(u, v) => {
                // Special case: e^x displays as exp(x)
                if matches!(&u.kind, ExprKind::Symbol(s) if s == "e") {
                    write!(f, "exp({})", v)
                } else {
                    let base_str = format!("{}", u);
                    let exp_str = format!("{}", v);

                    // Add parentheses around base if it's not a simple expression
                    // CRITICAL: Mul and Div MUST be parenthesized to avoid ambiguity
                    // (2 * x)^2 should display as "(2 * x)^2", not "2 * x^2"
                    let formatted_base = match u.kind {
                        ExprKind::Add(_, _)
                        | ExprKind::Sub(_, _)
                        | ExprKind::Mul(_, _)
                        | ExprKind::Div(_, _) => {
                            format!("({})", base_str)
                        }
                        _ => base_str,
                    };

                    // Add parentheses around exponent if it's not a simple number or symbol
                    let formatted_exp = match v.kind {
                        ExprKind::Number(_) | ExprKind::Symbol(_) => exp_str,
                        _ => format!("({})", exp_str),
                    };

                    write!(f, "{}^{}", formatted_base, formatted_exp)
                }
            }
        }
    }
}

/// Format operand for multiplication to minimize parentheses
fn format_mul_operand(expr: &Expr) -> String {
    match expr.kind {
        ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", expr),
        _ => format!("{}", expr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_number() {
        let expr = Expr::number(3.0);
        assert_eq!(format!("{}", expr), "3");

        let expr = Expr::number(314.0 / 100.0);
        // Formatting may use full precision; ensure it starts with the expected prefix
        assert!(format!("{}", expr).starts_with("3.14"));

        assert_eq!(format!("{}", Expr::number(f64::NAN)), "NaN");
        assert_eq!(format!("{}", Expr::number(f64::NEG_INFINITY)), "-Infinity");
    }

    #[test]
    fn test_display_symbol() {
        let expr = Expr::symbol("x");
        assert_eq!(format!("{}", expr), "x");
    }

    #[test]
    fn test_display_addition() {
        let expr = Expr::add_expr(Expr::symbol("x"), Expr::number(1.0));
        assert_eq!(format!("{}", expr), "x + 1");
    }

    #[test]
    fn test_display_multiplication() {
        let expr = Expr::mul_expr(Expr::number(2.0), Expr::symbol("x"));
        assert_eq!(format!("{}", expr), "2 * x");
    }

    #[test]
    fn test_display_function() {
        let expr = Expr::func("sin", Expr::symbol("x"));
        assert_eq!(format!("{}", expr), "sin(x)");
    }

    #[test]
    fn test_display_negative_term() {
        let expr = Expr::mul_expr(Expr::number(-1.0), Expr::symbol("x"));
        assert_eq!(format!("{}", expr), "-x");

        let expr2 = Expr::mul_expr(Expr::number(-1.0), Expr::func("sin", Expr::symbol("x")));
        assert_eq!(format!("{}", expr2), "-sin(x)");
    }

    #[test]
    fn test_display_add_of_negative_is_subtraction() {
        // x + (-1 * y) renders as x - y
        let expr = Expr::add_expr(
            Expr::symbol("x"),
            Expr::mul_expr(Expr::number(-1.0), Expr::symbol("y")),
        );
        assert_eq!(format!("{}", expr), "x - y");
    }

    #[test]
    fn test_display_exp_special_case() {
        let expr = Expr::pow(Expr::symbol("e"), Expr::symbol("x"));
        assert_eq!(format!("{}", expr), "exp(x)");
    }

    #[test]
    fn test_display_power_parens() {
        // (2 * x)^2 keeps its parentheses
        let expr = Expr::pow(
            Expr::mul_expr(Expr::number(2.0), Expr::symbol("x")),
            Expr::number(2.0),
        );
        assert_eq!(format!("{}", expr), "(2 * x)^2");

        // x^(y + 1) parenthesizes the exponent
        let expr = Expr::pow(
            Expr::symbol("x"),
            Expr::add_expr(Expr::symbol("y"), Expr::number(1.0)),
        );
        assert_eq!(format!("{}", expr), "x^(y + 1)");
    }

    #[test]
    fn test_display_fraction_parens() {
        // 1 / x -> 1 / x
        let expr = Expr::div_expr(Expr::number(1.0), Expr::symbol("x"));
        assert_eq!(format!("{}", expr), "1 / x");

        // 1 / x^2 -> 1 / x^2
        let expr = Expr::div_expr(
            Expr::number(1.0),
            Expr::pow(Expr::symbol("x"), Expr::number(2.0)),
        );
        assert_eq!(format!("{}", expr), "1 / x^2");

        // 1 / sin(x) -> 1 / sin(x)
        let expr = Expr::div_expr(Expr::number(1.0), Expr::func("sin", Expr::symbol("x")));
        assert_eq!(format!("{}", expr), "1 / sin(x)");

        // 1 / (2 * x) -> 1 / (2 * x)
        let expr = Expr::div_expr(
            Expr::number(1.0),
            Expr::mul_expr(Expr::number(2.0), Expr::symbol("x")),
        );
        assert_eq!(format!("{}", expr), "1 / (2 * x)");

        // (x + 1) / (x - 1) parenthesizes both sides
        let expr = Expr::div_expr(
            Expr::add_expr(Expr::symbol("x"), Expr::number(1.0)),
            Expr::sub_expr(Expr::symbol("x"), Expr::number(1.0)),
        );
        assert_eq!(format!("{}", expr), "(x + 1) / (x - 1)");
    }
}
