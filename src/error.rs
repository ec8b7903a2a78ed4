//! error structs, helpers and reporting

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::lex::{Location, Token, TokenKind};

#[derive(PartialEq, Debug)]
pub enum ErrorKind {
    /// the source text does not parse
    Unexpected {
        token: TokenKind,
        expected: &'static str,
    },
    /// retrieved source must reproduce exactly one definition
    NotExactlyOneDef { count: usize },
    /// the value pinned for this name cannot be embedded as a literal node
    NotLiteral { name: String },
    /// the tree cannot be made into an executable unit
    InvalidAssignTarget,
    DuplicateParam { name: String },
    ParamAfterDefault { name: String },
    /// executing the unit did not bind a callable under the expected name
    NameNotDefined { name: String },

    // past this point: raised when invoking, not when transforming
    UnknownName { name: String },
    NotFunc { actual: &'static str },
    WrongArgCount {
        name: String,
        min: usize,
        max: usize,
        got: usize,
    },
    TypeMismatch {
        op: &'static str,
        actual: &'static str,
    },
}

#[derive(PartialEq, Debug)]
pub struct Error(pub Location, pub ErrorKind);

pub(crate) fn unexpected(token: Token, expected: &'static str) -> Error {
    let Token(loc, token) = token;
    Error(loc, ErrorKind::Unexpected { token, expected })
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        use ErrorKind::*;

        match &self.1 {
            Unexpected { token, expected } => {
                write!(f, "Unexpected {token}, expected {expected}")
            }

            NotExactlyOneDef { count } => {
                write!(f, "Expected exactly one definition, but the source holds {count}")
            }

            NotLiteral { name } => {
                write!(f, "Value pinned for '{name}' has no literal form")
            }

            InvalidAssignTarget => write!(f, "Cannot assign to this expression, only to a name"),
            DuplicateParam { name } => write!(f, "Parameter '{name}' is declared twice"),
            ParamAfterDefault { name } => {
                write!(f, "Parameter '{name}' without a default follows one with")
            }

            NameNotDefined { name } => {
                write!(f, "Executing the unit did not define '{name}'")
            }

            UnknownName { name } => write!(f, "Unknown name '{name}'"),
            NotFunc { actual } => write!(f, "Expected a function to call, but got a {actual}"),
            WrongArgCount { name, min, max, got } => {
                if min == max {
                    write!(f, "'{name}' takes {min} argument(s), got {got}")
                } else {
                    write!(f, "'{name}' takes {min} to {max} arguments, got {got}")
                }
            }
            TypeMismatch { op, actual } => {
                write!(f, "Operation '{op}' cannot be applied to a {actual}")
            }
        }?;

        write!(f, " ==> bytes {:?}", self.0 .0)
    }
}

impl std::error::Error for Error {}
