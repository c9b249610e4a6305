//! condeval - an embeddable condition expression language.
//!
//! A condition expression is a single line of text such as
//! `and(eq(variables['a'], 'b'), ge(1.2.3, 1.2.0))`. This crate parses that
//! text into an [`AstRoot`] with [`parse`], then evaluates it against a
//! caller-supplied [`EvaluationContext`] to produce a typed [`Value`].
//!
//! The pipeline is lex ([`condeval_lex`]) -> parse ([`parser`]) -> evaluate
//! ([`ast`]), with a closed seven-kind value model ([`value`]) and an
//! asymmetric set of coercion rules ([`coerce`]) sitting underneath all
//! three stages. Embedders extend the language with their own functions
//! through [`ExtensionRegistry`], and read from an opaque document tree
//! through [`StateNode`].

mod ast;
pub mod coerce;
mod context;
mod error;
mod extensions;
mod parser;
mod state;
mod value;

pub use ast::AstRoot;
pub use context::EvaluationContext;
pub use error::{ConvertError, ExtensionRegistrationError, ParseError, ParseErrorKind};
pub use extensions::{ExtensionFunction, ExtensionRegistry};
pub use parser::parse;
pub use state::StateNode;
pub use value::{Value, ValueKind};

pub use condeval_lex::{NullTraceWriter, TraceWriter, Version};
