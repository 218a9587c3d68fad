//! Token types shared by the lexer and the Pratt parser

/// A lexical token
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Identifier(String),
    Operator(Operator),
    LeftParen,
    RightParen,
    Comma,
}

impl Token {
    /// Human-readable rendering for error messages
    pub(crate) fn to_user_string(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Identifier(s) => s.clone(),
            Token::Operator(op) => op.to_name().to_string(),
            Token::LeftParen => "(".to_string(),
            Token::RightParen => ")".to_string(),
            Token::Comma => ",".to_string(),
        }
    }
}

/// Infix operators and built-in function heads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Log,
    Sqrt,
    Abs,
    Signum,
}

impl Operator {
    /// Binding power for the Pratt parser
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 10,
            Operator::Mul | Operator::Div => 20,
            Operator::Pow => 30,
            // Function heads never appear in infix position
            _ => 40,
        }
    }

    /// Whether this operator is a function head rather than an infix operator
    pub(crate) fn is_function(&self) -> bool {
        !matches!(
            self,
            Operator::Add | Operator::Sub | Operator::Mul | Operator::Div | Operator::Pow
        )
    }

    /// Canonical name, matching the function registry for function heads
    pub(crate) fn to_name(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Pow => "^",
            Operator::Sin => "sin",
            Operator::Cos => "cos",
            Operator::Tan => "tan",
            Operator::Cot => "cot",
            Operator::Sec => "sec",
            Operator::Csc => "csc",
            Operator::Asin => "asin",
            Operator::Acos => "acos",
            Operator::Atan => "atan",
            Operator::Sinh => "sinh",
            Operator::Cosh => "cosh",
            Operator::Tanh => "tanh",
            Operator::Exp => "exp",
            Operator::Ln => "ln",
            Operator::Log => "log",
            Operator::Sqrt => "sqrt",
            Operator::Abs => "abs",
            Operator::Signum => "signum",
        }
    }

    /// Map a lexed name onto a function head
    pub(crate) fn from_function_name(name: &str) -> Option<Operator> {
        match name {
            "sin" => Some(Operator::Sin),
            "cos" => Some(Operator::Cos),
            "tan" => Some(Operator::Tan),
            "cot" => Some(Operator::Cot),
            "sec" => Some(Operator::Sec),
            "csc" => Some(Operator::Csc),
            "asin" => Some(Operator::Asin),
            "acos" => Some(Operator::Acos),
            "atan" => Some(Operator::Atan),
            "sinh" => Some(Operator::Sinh),
            "cosh" => Some(Operator::Cosh),
            "tanh" => Some(Operator::Tanh),
            "exp" => Some(Operator::Exp),
            "ln" => Some(Operator::Ln),
            "log" => Some(Operator::Log),
            "sqrt" => Some(Operator::Sqrt),
            "abs" => Some(Operator::Abs),
            "signum" => Some(Operator::Signum),
            _ => None,
        }
    }
}
