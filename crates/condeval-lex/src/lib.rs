//! condeval-lex - lexical analysis for the condition expression language.
//!
//! A condition expression is a single line of text such as
//! `and(eq(variables['a'], 'b'), ge(1.2.3, 1.2.0))`. This crate turns that
//! text into a flat stream of [`Token`]s: punctuation (`[`, `]`, `(`, `)`,
//! `,`, `.`), literals (booleans, numbers, versions, strings), identifiers
//! (built-in function names, registered extension names, property names),
//! and `Unrecognized` for anything that fits none of those categories.
//!
//! Tokenization never fails outright: malformed input becomes an
//! `Unrecognized` token carrying the raw text, and it is left to the parser
//! to turn that into a proper diagnostic. This keeps the lexer a total
//! function over its input, which in turn keeps [`Lexer`] a plain
//! `Iterator`.

pub mod cursor;
pub mod extension_set;
mod lexer;
pub mod token;
pub mod trace;
pub mod version;

pub use extension_set::{ExtensionNameSet, NoExtensions};
pub use lexer::Lexer;
pub use token::{BuiltinFunction, Token, TokenKind};
pub use trace::{NullTraceWriter, TraceWriter};
pub use version::{Version, VersionParseError};
