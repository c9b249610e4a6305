//! Core lexer implementation.
//!
//! This module contains the main `Lexer` struct and its token-dispatch
//! method; the number/version and string scanners live in sibling modules.

use crate::cursor::Cursor;
use crate::extension_set::ExtensionNameSet;
use crate::token::{BuiltinFunction, Token, TokenKind};
use crate::trace::TraceWriter;

mod number;
mod string;

const PUNCTUATION: [char; 5] = ['[', ']', '(', ')', ','];

/// Tracks just enough about the previously emitted token to drive the two
/// position-sensitive lexing rules in §4.1: dot disambiguation and
/// property-name classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PrevToken {
    None,
    Dereference,
    Separator,
    StartIndex,
    StartParameter,
    Other,
}

impl PrevToken {
    fn from_kind(kind: &TokenKind) -> Self {
        match kind {
            TokenKind::Dereference => PrevToken::Dereference,
            TokenKind::Separator => PrevToken::Separator,
            TokenKind::StartIndex => PrevToken::StartIndex,
            TokenKind::StartParameter => PrevToken::StartParameter,
            _ => PrevToken::Other,
        }
    }
}

/// Lexer for the condition expression language.
///
/// The lexer transforms a raw condition string into a stream of tokens. It
/// is single-consumer and non-restartable: once `try_next` returns `None`,
/// the lexer is exhausted.
pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
    extensions: &'a dyn ExtensionNameSet,
    trace: &'a dyn TraceWriter,
    pub(crate) prev: PrevToken,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over `source`, recognizing the given set of
    /// registered extension names and writing diagnostics to `trace`.
    pub fn new(
        source: &'a str,
        extensions: &'a dyn ExtensionNameSet,
        trace: &'a dyn TraceWriter,
    ) -> Self {
        Self {
            cursor: Cursor::new(source),
            extensions,
            trace,
            prev: PrevToken::None,
        }
    }

    /// Returns the next token, or `None` once the source is exhausted.
    ///
    /// This is the lexer's single exposed operation (§4.1).
    pub fn try_next(&mut self) -> Option<Token> {
        self.cursor.skip_whitespace();

        let start = self.cursor.position();
        if self.cursor.is_at_end() {
            return None;
        }

        let kind = match self.cursor.current_char() {
            '[' => {
                self.cursor.advance();
                TokenKind::StartIndex
            }
            '(' => {
                self.cursor.advance();
                TokenKind::StartParameter
            }
            ']' => {
                self.cursor.advance();
                TokenKind::EndIndex
            }
            ')' => {
                self.cursor.advance();
                TokenKind::EndParameter
            }
            ',' => {
                self.cursor.advance();
                TokenKind::Separator
            }
            '\'' => self.scan_string(start),
            '.' if self.dot_starts_literal() => self.scan_number_or_version(start),
            '.' => {
                self.cursor.advance();
                TokenKind::Dereference
            }
            '-' => self.scan_number_or_version(start),
            c if c.is_ascii_digit() => self.scan_number_or_version(start),
            _ => self.scan_keyword(start),
        };

        if let TokenKind::Unrecognized(text) = &kind {
            self.trace
                .verbose(&format!("lex: unrecognized token '{text}' at {start}"));
        }

        self.prev = PrevToken::from_kind(&kind);
        let length = self.cursor.position() - start;
        Some(Token::new(kind, start, length))
    }

    /// §4.1: a leading `.` starts a number/version literal only when no
    /// token has been produced yet, or the previous token was one of
    /// `Separator`, `StartIndex`, `StartParameter`; otherwise it is a
    /// `Dereference`.
    fn dot_starts_literal(&self) -> bool {
        matches!(
            self.prev,
            PrevToken::None | PrevToken::Separator | PrevToken::StartIndex | PrevToken::StartParameter
        )
    }

    fn scan_keyword(&mut self, start: usize) -> TokenKind {
        while !self.cursor.is_at_end()
            && !self.cursor.current_char().is_whitespace()
            && !PUNCTUATION.contains(&self.cursor.current_char())
            && self.cursor.current_char() != '.'
        {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(start);
        if !is_identifier(text) {
            return TokenKind::Unrecognized(text.to_string());
        }

        if self.prev == PrevToken::Dereference {
            return TokenKind::PropertyName(text.to_string());
        }
        if text.eq_ignore_ascii_case("true") {
            return TokenKind::Boolean(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return TokenKind::Boolean(false);
        }
        if let Some(builtin) = BuiltinFunction::from_ident(text) {
            return TokenKind::Builtin(builtin);
        }
        if self.extensions.contains(text) {
            return TokenKind::Extension(text.to_string());
        }
        TokenKind::Unrecognized(text.to_string())
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next()
    }
}
