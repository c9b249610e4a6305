//! Error types surfaced by parsing, evaluation, and extension registration.

use thiserror::Error;

use crate::value::ValueKind;

/// The closed set of reasons a condition expression can fail to parse
/// (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected a property name")]
    ExpectedPropertyName,
    #[error("expected '('")]
    ExpectedStartParameter,
    #[error("unclosed function call")]
    UnclosedFunction,
    #[error("unclosed indexer")]
    UnclosedIndexer,
    #[error("unexpected symbol")]
    UnexpectedSymbol,
    #[error("unrecognized value")]
    UnrecognizedValue,
}

/// A condition expression failed to parse.
///
/// `token_index` is zero-based; [`ParseError::position`] renders the
/// one-based position used in human-readable messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: '{token_text}'. Located at position {} within condition expression: {raw}", self.position())]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub token_text: String,
    pub token_index: usize,
    pub token_length: usize,
    pub raw: String,
}

impl ParseError {
    /// The token's one-based position, for human-readable diagnostics.
    pub fn position(&self) -> usize {
        self.token_index + 1
    }
}

/// A value could not be coerced to the kind an operation demanded.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unable to coerce {from_kind} to {to_kind}: {value}")]
pub struct ConvertError {
    pub value: String,
    pub from_kind: ValueKind,
    pub to_kind: ValueKind,
}

/// An extension could not be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtensionRegistrationError {
    #[error("an extension named '{0}' is already registered")]
    DuplicateName(String),
}
