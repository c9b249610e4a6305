//! The recursive-descent parser that turns a token stream into an [`AstRoot`]
//! (§4.2).
//!
//! The parser keeps an explicit stack of open containers (functions and
//! indexers) and the previously consumed token's shape, rather than
//! recursing through grammar productions, because the grammar itself is
//! flat: every token's legality depends only on what came immediately
//! before it and what container (if any) is currently open. This mirrors
//! the "container stack of arena indices" design note in §9.

use condeval_lex::{BuiltinFunction, Lexer, Token, TokenKind, TraceWriter};

use crate::ast::{AstRoot, ExtensionBinding, FunctionKind, NodeId, NodePayload};
use crate::error::{ParseError, ParseErrorKind};
use crate::extensions::ExtensionRegistry;
use crate::value::Value;

/// Parses a condition expression into an [`AstRoot`].
///
/// The empty expression is legal and parses to a null root (§4.2).
pub fn parse(raw: &str, trace: &dyn TraceWriter, extensions: &ExtensionRegistry) -> Result<AstRoot, ParseError> {
    tracing::debug!(len = raw.len(), "parsing condition expression");
    ParserState::new(raw, trace, extensions).run()
}

/// Tracks just enough about the previously consumed token to drive the
/// position-sensitive grammar rules in §4.2: where a literal/function may
/// start, and where indexing may attach.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Prev {
    None,
    StartIndex,
    StartParameter,
    EndIndex,
    EndParameter,
    Separator,
    PropertyName,
    /// Anything else that produced a value: a literal, or the name token
    /// of a function (before its required `(` lookahead).
    Other,
}

enum Container {
    Function {
        id: NodeId,
        min: usize,
        max: Option<usize>,
        open: Token,
    },
    Indexer {
        id: NodeId,
        open: Token,
    },
}

impl Container {
    fn id(&self) -> NodeId {
        match self {
            Container::Function { id, .. } => *id,
            Container::Indexer { id, .. } => *id,
        }
    }

    fn open(&self) -> &Token {
        match self {
            Container::Function { open, .. } => open,
            Container::Indexer { open, .. } => open,
        }
    }
}

struct ParserState<'a> {
    raw: &'a str,
    lexer: Lexer<'a>,
    extensions: &'a ExtensionRegistry,
    ast: AstRoot,
    stack: Vec<Container>,
    prev: Prev,
}

impl<'a> ParserState<'a> {
    fn new(raw: &'a str, trace: &'a dyn TraceWriter, extensions: &'a ExtensionRegistry) -> Self {
        Self {
            raw,
            lexer: Lexer::new(raw, extensions, trace),
            extensions,
            ast: AstRoot {
                arena: Vec::new(),
                root: None,
            },
            stack: Vec::new(),
            prev: Prev::None,
        }
    }

    fn run(mut self) -> Result<AstRoot, ParseError> {
        while let Some(token) = self.lexer.try_next() {
            self.step(token)?;
        }
        match self.stack.last() {
            None => Ok(self.ast),
            Some(container @ Container::Function { .. }) => {
                Err(self.make_error(ParseErrorKind::UnclosedFunction, container.open()))
            }
            Some(container @ Container::Indexer { .. }) => {
                Err(self.make_error(ParseErrorKind::UnclosedIndexer, container.open()))
            }
        }
    }

    fn step(&mut self, token: Token) -> Result<(), ParseError> {
        match token.kind.clone() {
            TokenKind::Unrecognized(_) => Err(self.make_error(ParseErrorKind::UnrecognizedValue, &token)),

            TokenKind::Boolean(_) | TokenKind::Number(_) | TokenKind::Version(_) | TokenKind::String(_) => {
                if !self.is_value_position() {
                    return Err(self.make_error(ParseErrorKind::UnexpectedSymbol, &token));
                }
                let value = literal_value(token.kind.clone());
                let id = self.ast.push(NodePayload::Leaf(value));
                self.attach(id);
                self.prev = Prev::Other;
                Ok(())
            }

            TokenKind::Builtin(builtin) => {
                if !self.is_value_position() {
                    return Err(self.make_error(ParseErrorKind::UnexpectedSymbol, &token));
                }
                let (min, max) = builtin.arity();
                let id = self.ast.push(NodePayload::Function(FunctionKind::Builtin(builtin)));
                self.attach(id);
                let open = self.expect_start_parameter()?;
                self.stack.push(Container::Function { id, min, max, open });
                self.prev = Prev::StartParameter;
                Ok(())
            }

            TokenKind::Extension(name) => {
                if !self.is_value_position() {
                    return Err(self.make_error(ParseErrorKind::UnexpectedSymbol, &token));
                }
                let (canonical_name, min, max, body) = self
                    .extensions
                    .lookup(&name)
                    .expect("lexer only emits Extension tokens for registered names");
                let binding = ExtensionBinding {
                    name: canonical_name.to_string(),
                    body,
                };
                let id = self.ast.push(NodePayload::Function(FunctionKind::Extension(binding)));
                self.attach(id);
                let open = self.expect_start_parameter()?;
                self.stack.push(Container::Function { id, min, max, open });
                self.prev = Prev::StartParameter;
                Ok(())
            }

            TokenKind::StartIndex => {
                if !self.is_indexable_position() {
                    return Err(self.make_error(ParseErrorKind::UnexpectedSymbol, &token));
                }
                let id = self.ast.push(NodePayload::Indexer);
                let target = self.swap_last_expr(id);
                self.ast.children_mut(id).push(target);
                self.stack.push(Container::Indexer { id, open: token });
                self.prev = Prev::StartIndex;
                Ok(())
            }

            TokenKind::Dereference => {
                if !self.is_indexable_position() {
                    return Err(self.make_error(ParseErrorKind::UnexpectedSymbol, &token));
                }
                let id = self.ast.push(NodePayload::Indexer);
                let target = self.swap_last_expr(id);
                self.ast.children_mut(id).push(target);

                let property = match self.lexer.try_next() {
                    Some(Token {
                        kind: TokenKind::PropertyName(name),
                        ..
                    }) => name,
                    Some(other) => return Err(self.make_error(ParseErrorKind::ExpectedPropertyName, &other)),
                    None => return Err(self.make_eof_error(ParseErrorKind::ExpectedPropertyName)),
                };
                let leaf = self.ast.push(NodePayload::Leaf(Value::String(property)));
                self.ast.children_mut(id).push(leaf);
                self.prev = Prev::PropertyName;
                Ok(())
            }

            TokenKind::EndParameter => self.step_end_parameter(&token),
            TokenKind::EndIndex => self.step_end_index(&token),
            TokenKind::Separator => self.step_separator(&token),

            TokenKind::StartParameter | TokenKind::PropertyName(_) => {
                Err(self.make_error(ParseErrorKind::UnexpectedSymbol, &token))
            }
        }
    }

    fn step_end_parameter(&mut self, token: &Token) -> Result<(), ParseError> {
        match self.stack.last() {
            Some(Container::Function { id, min, .. }) => {
                let count = self.ast.children(*id).len();
                if self.prev == Prev::Separator || count < *min {
                    return Err(self.make_error(ParseErrorKind::UnexpectedSymbol, token));
                }
                self.stack.pop();
                self.prev = Prev::EndParameter;
                Ok(())
            }
            _ => Err(self.make_error(ParseErrorKind::UnexpectedSymbol, token)),
        }
    }

    fn step_end_index(&mut self, token: &Token) -> Result<(), ParseError> {
        match self.stack.last() {
            Some(Container::Indexer { id, .. }) => {
                if self.ast.children(*id).len() != 2 {
                    return Err(self.make_error(ParseErrorKind::UnexpectedSymbol, token));
                }
                self.stack.pop();
                self.prev = Prev::EndIndex;
                Ok(())
            }
            _ => Err(self.make_error(ParseErrorKind::UnexpectedSymbol, token)),
        }
    }

    fn step_separator(&mut self, token: &Token) -> Result<(), ParseError> {
        match self.stack.last() {
            Some(Container::Function { id, max, .. }) => {
                let count = self.ast.children(*id).len();
                let under_max = max.map(|m| count < m).unwrap_or(true);
                if self.prev == Prev::Separator || count == 0 || !under_max {
                    return Err(self.make_error(ParseErrorKind::UnexpectedSymbol, token));
                }
                self.prev = Prev::Separator;
                Ok(())
            }
            _ => Err(self.make_error(ParseErrorKind::UnexpectedSymbol, token)),
        }
    }

    /// Literals and function names may start only here: at the very
    /// beginning of the expression, or right after `[`, `(`, or `,`.
    fn is_value_position(&self) -> bool {
        matches!(
            self.prev,
            Prev::None | Prev::StartIndex | Prev::StartParameter | Prev::Separator
        )
    }

    /// `[` and `.` may attach only to something that just produced a value
    /// receiver: a closed function call, a closed indexer, or a property
    /// name.
    fn is_indexable_position(&self) -> bool {
        matches!(self.prev, Prev::EndParameter | Prev::EndIndex | Prev::PropertyName)
    }

    fn attach(&mut self, id: NodeId) {
        if let Some(top) = self.stack.last() {
            let parent = top.id();
            self.ast.children_mut(parent).push(id);
        } else {
            self.ast.root = Some(id);
        }
    }

    /// Detaches the most recently produced expression (the root, if no
    /// container is open, or the innermost container's last child) and
    /// replaces its slot with `new_id`. `is_indexable_position` having
    /// returned true before the call guarantees a detachable expression
    /// exists.
    fn swap_last_expr(&mut self, new_id: NodeId) -> NodeId {
        if let Some(top) = self.stack.last() {
            let parent = top.id();
            let children = self.ast.children_mut(parent);
            let old = children.pop().expect("indexable position implies a prior expression");
            children.push(new_id);
            old
        } else {
            self.ast
                .root
                .replace(new_id)
                .expect("indexable position implies a prior root")
        }
    }

    fn expect_start_parameter(&mut self) -> Result<Token, ParseError> {
        match self.lexer.try_next() {
            Some(token) if token.kind == TokenKind::StartParameter => Ok(token),
            Some(token) => Err(self.make_error(ParseErrorKind::ExpectedStartParameter, &token)),
            None => Err(self.make_eof_error(ParseErrorKind::ExpectedStartParameter)),
        }
    }

    fn make_error(&self, kind: ParseErrorKind, token: &Token) -> ParseError {
        ParseError {
            kind,
            token_text: self.raw[token.start_index..token.start_index + token.length].to_string(),
            token_index: token.start_index,
            token_length: token.length,
            raw: self.raw.to_string(),
        }
    }

    /// Built for the case where the stream ends while a lookahead token is
    /// still required (e.g. a function name with no following `(`).
    fn make_eof_error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            token_text: String::new(),
            token_index: self.raw.len(),
            token_length: 0,
            raw: self.raw.to_string(),
        }
    }
}

fn literal_value(kind: TokenKind) -> Value {
    match kind {
        TokenKind::Boolean(b) => Value::Boolean(b),
        TokenKind::Number(n) => Value::Number(n),
        TokenKind::Version(v) => Value::Version(v),
        TokenKind::String(s) => Value::String(s),
        _ => unreachable!("literal_value only called for literal token kinds"),
    }
}
