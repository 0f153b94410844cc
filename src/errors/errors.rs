use std::fmt::Display;

use thiserror::Error;

use crate::Position;

use super::diagnostics::Diagnostics;

/// A scan or parse error, tied to the source position it was found at.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnterminatedLiteral { .. } => "UnterminatedLiteral",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnterminatedLiteral { kind } => {
                ErrorTip::Suggestion(format!("Unterminated {}, is a closing quote missing?", kind))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.internal_error, self.position.1, self.position.0)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unterminated {kind}")]
    UnterminatedLiteral { kind: &'static str },
}

/// Fatal code generation errors.
///
/// Each one stops generation at its first occurrence; they mark programs
/// that type check but fall outside what the backend can lower.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    #[error("too many registers in use")]
    RegistersExhausted,
    #[error("scratch register {0} does not exist")]
    InvalidRegister(usize),
    #[error("too many arguments in call to {function}: {count} given, at most {max} supported")]
    TooManyArguments {
        function: String,
        count: usize,
        max: usize,
    },
    #[error("too many parameters in function {function}: {count} declared, at most {max} supported")]
    TooManyParameters {
        function: String,
        count: usize,
        max: usize,
    },
    #[error("local {name} cannot have type {ty}")]
    UnsupportedLocal { name: String, ty: String },
    #[error("global {name} cannot have type {ty}")]
    UnsupportedGlobal { name: String, ty: String },
    #[error("array {name} of type {ty} is not supported, only 1D arrays of integers are")]
    UnsupportedArray { name: String, ty: String },
    #[error("no more stack allocation space for {name} (slot {which})")]
    StackFrameExhausted { name: String, which: usize },
    #[error("global {name} can only be initialized by a constant value")]
    NonConstantInitializer { name: String },
    #[error("`{expr}` is not addressable")]
    NotAddressable { expr: String },
    #[error("{name} has no resolved symbol")]
    UnresolvedSymbol { name: String },
    #[error("return statement outside of a function")]
    ReturnOutsideFunction,
    #[error("cannot print a value of type {ty}")]
    UnsupportedPrint { ty: String },
}

/// Why a pipeline stage stopped.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("scan error: {0}")]
    Scan(Error),
    #[error("parse error: {0}")]
    Parse(Error),
    #[error("resolve error: {} resolve error(s)", .0.resolve_error_count())]
    Resolve(Diagnostics),
    #[error("type error: {} type error(s)", .0.type_error_count())]
    Type(Diagnostics),
    #[error("codegen error: {0}")]
    Codegen(#[from] CodegenError),
}
