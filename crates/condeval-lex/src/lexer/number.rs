//! Number and version literal lexing.
//!
//! A run of digits, at most one leading `-`, and interior `.` characters is
//! classified by its dot count: zero or one dot is a [`Decimal`] number, two
//! or more is a [`Version`] (§4.1).

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::token::TokenKind;
use crate::version::Version;

use super::{Lexer, PUNCTUATION};

impl<'a> Lexer<'a> {
    pub(super) fn scan_number_or_version(&mut self, start: usize) -> TokenKind {
        if self.cursor.current_char() == '-' {
            self.cursor.advance();
        }
        while !self.cursor.is_at_end()
            && !self.cursor.current_char().is_whitespace()
            && !PUNCTUATION.contains(&self.cursor.current_char())
        {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(start);
        let dot_count = text.bytes().filter(|b| *b == b'.').count();

        if dot_count >= 2 {
            return match Version::from_str(text) {
                Ok(version) => TokenKind::Version(version),
                Err(_) => TokenKind::Unrecognized(text.to_string()),
            };
        }

        match Decimal::from_str(text) {
            Ok(number) => TokenKind::Number(number),
            Err(_) => TokenKind::Unrecognized(text.to_string()),
        }
    }
}
