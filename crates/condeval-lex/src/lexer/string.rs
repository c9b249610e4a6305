//! String literal lexing.
//!
//! String literals are single-quoted; a doubled quote `''` inside one is an
//! escaped literal quote character (§4.1). An unterminated literal is
//! reported as `Unrecognized` rather than failing the whole scan.

use crate::token::TokenKind;

use super::Lexer;

impl<'a> Lexer<'a> {
    pub(super) fn scan_string(&mut self, start: usize) -> TokenKind {
        debug_assert_eq!(self.cursor.current_char(), '\'');
        self.cursor.advance();

        let mut value = String::new();
        loop {
            if self.cursor.is_at_end() {
                let raw = self.cursor.slice_from(start);
                return TokenKind::Unrecognized(raw.to_string());
            }

            if self.cursor.current_char() == '\'' {
                if self.cursor.char_at(1) == '\'' {
                    value.push('\'');
                    self.cursor.advance_n(2);
                    continue;
                }
                self.cursor.advance();
                return TokenKind::String(value);
            }

            value.push(self.cursor.current_char());
            self.cursor.advance();
        }
    }
}
