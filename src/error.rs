use std::fmt;

/// Source location span for error reporting
/// Represents a range of characters in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed byte offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed byte offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

/// Errors produced while turning expression text into an AST
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    // Input validation errors
    EmptyFormula,
    UnbalancedParens {
        span: Option<Span>,
    },

    // Tokenization errors
    InvalidNumber {
        value: String,
        span: Option<Span>,
    },
    InvalidToken {
        token: String,
        span: Option<Span>,
    },

    // Structural errors
    UnexpectedToken {
        expected: String,
        got: String,
        span: Option<Span>,
    },
    UnexpectedEndOfInput,

    // Semantic errors against the whitelisted grammar
    UnknownSymbol {
        name: String,
        span: Option<Span>,
    },
    UnknownFunction {
        name: String,
        span: Option<Span>,
    },
    WrongArity {
        name: String,
        expected: usize,
        got: usize,
    },

    // Safety limits
    MaxDepthExceeded,
    MaxNodesExceeded,
}

impl ParseError {
    // Convenience constructors for the common no-span call sites

    /// Create InvalidNumber without span
    pub fn invalid_number(value: impl Into<String>) -> Self {
        ParseError::InvalidNumber {
            value: value.into(),
            span: None,
        }
    }

    /// Create InvalidToken without span
    pub fn invalid_token(token: impl Into<String>) -> Self {
        ParseError::InvalidToken {
            token: token.into(),
            span: None,
        }
    }

    /// Create InvalidToken with span
    pub fn invalid_token_at(token: impl Into<String>, span: Span) -> Self {
        ParseError::InvalidToken {
            token: token.into(),
            span: Some(span),
        }
    }

    /// Create UnknownSymbol with span
    pub fn unknown_symbol_at(name: impl Into<String>, span: Span) -> Self {
        ParseError::UnknownSymbol {
            name: name.into(),
            span: Some(span),
        }
    }

    /// Create UnknownFunction with span
    pub fn unknown_function_at(name: impl Into<String>, span: Span) -> Self {
        ParseError::UnknownFunction {
            name: name.into(),
            span: Some(span),
        }
    }

    /// Source span of the offending input, if one was recorded
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::UnbalancedParens { span }
            | ParseError::InvalidNumber { span, .. }
            | ParseError::InvalidToken { span, .. }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::UnknownSymbol { span, .. }
            | ParseError::UnknownFunction { span, .. } => *span,
            _ => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyFormula => write!(f, "Formula cannot be empty"),
            ParseError::UnbalancedParens { span } => {
                write!(
                    f,
                    "Unbalanced closing parenthesis{}",
                    span.map_or(String::new(), |s| s.display())
                )
            }
            ParseError::InvalidNumber { value, span } => {
                write!(
                    f,
                    "Invalid number format: '{}'{}",
                    value,
                    span.map_or(String::new(), |s| s.display())
                )
            }
            ParseError::InvalidToken { token, span } => {
                write!(
                    f,
                    "Invalid token: '{}'{}",
                    token,
                    span.map_or(String::new(), |s| s.display())
                )
            }
            ParseError::UnexpectedToken {
                expected,
                got,
                span,
            } => {
                write!(
                    f,
                    "Expected '{}', but got '{}'{}",
                    expected,
                    got,
                    span.map_or(String::new(), |s| s.display())
                )
            }
            ParseError::UnexpectedEndOfInput => write!(f, "Unexpected end of input"),
            ParseError::UnknownSymbol { name, span } => {
                write!(
                    f,
                    "Unknown symbol '{}': only x, y, pi and e are recognized{}",
                    name,
                    span.map_or(String::new(), |s| s.display())
                )
            }
            ParseError::UnknownFunction { name, span } => {
                write!(
                    f,
                    "Unknown function '{}'{}",
                    name,
                    span.map_or(String::new(), |s| s.display())
                )
            }
            ParseError::WrongArity {
                name,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Function '{}' takes {} argument{}, but got {}",
                    name,
                    expected,
                    if *expected == 1 { "" } else { "s" },
                    got
                )
            }
            ParseError::MaxDepthExceeded => {
                write!(f, "Expression nesting depth exceeds maximum limit")
            }
            ParseError::MaxNodesExceeded => {
                write!(f, "Expression size exceeds maximum node count limit")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors produced while evaluating an expression at a concrete point
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Substitution produced NaN or an infinity (division by zero,
    /// domain violation such as ln of a non-positive number, ...)
    NotFinite { what: String, x: f64, y: f64 },

    /// A symbol survived to bytecode compilation without a parameter slot
    UnboundVariable { name: String },

    /// A function call without a registry entry reached differentiation
    /// or bytecode compilation (possible only for hand-built trees)
    UnknownFunction { name: String },

    /// Expression nests deeper than the evaluation stack allows
    StackOverflow { depth: usize, limit: usize },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::NotFinite { what, x, y } => {
                write!(f, "{} is undefined at ({}, {})", what, x, y)
            }
            EvalError::UnboundVariable { name } => {
                write!(f, "Variable '{}' has no bound value", name)
            }
            EvalError::UnknownFunction { name } => {
                write!(f, "Unknown function '{}'", name)
            }
            EvalError::StackOverflow { depth, limit } => {
                write!(
                    f,
                    "Expression requires evaluation stack depth {} (limit {})",
                    depth, limit
                )
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Pipeline-level error: everything a render pass can fail with
#[derive(Debug, Clone, PartialEq)]
pub enum GradError {
    Parse(ParseError),
    Eval(EvalError),
}

impl fmt::Display for GradError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradError::Parse(e) => write!(f, "{}", e),
            GradError::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GradError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GradError::Parse(e) => Some(e),
            GradError::Eval(e) => Some(e),
        }
    }
}

impl From<ParseError> for GradError {
    fn from(e: ParseError) -> Self {
        GradError::Parse(e)
    }
}

impl From<EvalError> for GradError {
    fn from(e: EvalError) -> Self {
        GradError::Eval(e)
    }
}
