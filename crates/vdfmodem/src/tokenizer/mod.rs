//! Character-driven VDF tokenizer.
//!
//! Overview
//! - [`Tokenizer::ingest_char`] is called once per input character and
//!   returns the tokens that character completed. [`Tokenizer::flush`] is
//!   called once at end of input.
//! - Two-character patterns (`//` comments and `\x` escapes) need one
//!   character of lookahead. The tokenizer therefore holds back the most
//!   recent character in `lookahead` and only resolves it once the next one
//!   arrives. The first call after construction, or after a two-character
//!   pattern was consumed, buffers and emits nothing.
//! - Carriage returns and byte-order marks are dropped before they reach the
//!   lookahead slot, so they never separate the halves of a pattern.
//!
//! Chunked input
//! - [`Tokenizer::feed`] wraps `ingest_char` for a whole `&str` and yields
//!   tokens lazily. When the iterator is dropped early, unread characters and
//!   undelivered tokens stay in the tokenizer and are delivered by the next
//!   `feed` or by `flush`, so the token sequence does not depend on how the
//!   input was split.
//!
//! Errors
//! - Every error is fatal for the instance. Later calls return the same
//!   error until [`Tokenizer::reset`].

mod trailing;
#[cfg(test)]
mod tests;

use alloc::{collections::VecDeque, string::String};
use core::mem;

use trailing::TrailingChars;

use crate::{
    error::{Location, ParserError, Position, SyntaxError},
    options::{ParserOptions, UnknownEscapeMode},
    token::{Token, TokenizerState, Tokens},
};

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Input character classes, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Newline,
    Whitespace,
    Quote,
    OpenBracket,
    CloseBracket,
    Escape,
    Slash,
    Ordinary,
}

impl CharClass {
    #[inline]
    fn of(c: char, escapes: bool) -> Self {
        match c {
            '\n' => Self::Newline,
            ' ' | '\t' => Self::Whitespace,
            '"' => Self::Quote,
            '{' => Self::OpenBracket,
            '}' => Self::CloseBracket,
            '\\' if escapes => Self::Escape,
            '/' => Self::Slash,
            _ => Self::Ordinary,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    ch: char,
    at: Position,
}

#[derive(Debug, Clone)]
enum Status {
    Open,
    Flushed,
    Failed(ParserError),
}

/// The streaming VDF tokenizer.
///
/// # Examples
///
/// ```rust
/// use vdfmodem::{ParserOptions, Token, Tokenizer};
///
/// let mut tokenizer = Tokenizer::new(ParserOptions::default());
/// let mut tokens = Vec::new();
/// for c in r#""a" "b""#.chars() {
///     tokens.extend(tokenizer.ingest_char(c)?);
/// }
/// tokens.extend(tokenizer.flush()?);
/// assert_eq!(tokens, [Token::Key("a".into()), Token::Value("b".into())]);
/// # Ok::<(), vdfmodem::ParserError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer {
    state: TokenizerState,
    /// Characters of the key or value being read.
    lexeme: String,
    depth: usize,
    lookahead: Option<Pending>,
    /// Position of the next character to be ingested.
    position: Position,
    trailing: TrailingChars,

    /// Tokens produced but not yet handed out by a dropped [`Feed`].
    queued: VecDeque<Token>,
    /// Input handed to a dropped [`Feed`] that it never read.
    unread: String,

    status: Status,
    options: ParserOptions,
}

impl Tokenizer {
    /// Creates a tokenizer in the initial `AfterValue` state.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            state: TokenizerState::AfterValue,
            lexeme: String::new(),
            depth: 0,
            lookahead: None,
            position: Position::default(),
            trailing: TrailingChars::new(options.debug_buffer_size),
            queued: VecDeque::new(),
            unread: String::new(),
            status: Status::Open,
            options,
        }
    }

    /// Discards all state, keeping the options.
    pub fn reset(&mut self) {
        *self = Self::new(self.options);
    }

    /// The options this tokenizer was created with.
    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// The current lexer state.
    #[must_use]
    pub fn state(&self) -> TokenizerState {
        self.state
    }

    /// Number of currently open blocks.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Position of the next character to be ingested.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether [`flush`](Self::flush) has completed successfully.
    #[must_use]
    pub fn is_flushed(&self) -> bool {
        matches!(self.status, Status::Flushed)
    }

    /// Ingest one character and return the tokens it completed.
    ///
    /// # Errors
    ///
    /// Returns the violated rule. The tokenizer is unusable afterwards.
    /// Calling this after [`flush`](Self::flush) fails with
    /// [`SyntaxError::MalformedIngestion`].
    pub fn ingest_char(&mut self, c: char) -> Result<Tokens, ParserError> {
        self.ensure_open()?;
        let mut out = Tokens::new();
        let result = self.ingest_into(c, &mut out);
        self.settle(result)?;
        Ok(out)
    }

    /// Ingest a chunk, yielding tokens lazily.
    ///
    /// Dropping the iterator before it is exhausted is allowed; the rest of
    /// the chunk is kept and processed by the next `feed` or `flush`.
    #[must_use = "the chunk is only processed as the iterator is driven"]
    pub fn feed<'t, 'src>(&'t mut self, chunk: &'src str) -> Feed<'t, 'src> {
        let carry = mem::take(&mut self.unread);
        Feed {
            tokenizer: self,
            carry,
            carry_pos: 0,
            chunk,
            chunk_pos: 0,
            done: false,
        }
    }

    /// Signal end of input and return the remaining tokens.
    ///
    /// # Errors
    ///
    /// Besides the rules checked per character, fails with
    /// [`SyntaxError::UnexpectedEndOfInput`] unless the input ended after a
    /// complete value with every block closed, and with
    /// [`SyntaxError::NoCharacterToEscape`] if it ended on a backslash inside
    /// a quoted token.
    pub fn flush(&mut self) -> Result<Tokens, ParserError> {
        self.ensure_open()?;
        let mut out: Tokens = self.queued.drain(..).collect();
        let result = self.flush_into(&mut out);
        self.settle(result)?;
        self.status = Status::Flushed;
        Ok(out)
    }

    fn flush_into(&mut self, out: &mut Tokens) -> Result<(), ParserError> {
        let unread = mem::take(&mut self.unread);
        for c in unread.chars() {
            self.ingest_into(c, out)?;
        }

        if let Some(pending) = self.lookahead {
            if pending.ch == '\\' && self.escapes_enabled() && self.state.is_quoted() {
                return Err(self.error_at(SyntaxError::NoCharacterToEscape, pending.at));
            }
        }

        // A synthetic newline terminates any unquoted token and comment. It
        // is not part of the input, so it does not move the position.
        let end = self.position;
        self.accept('\n', end, out)?;
        if let Some(pending) = self.lookahead.take() {
            self.step(pending.ch, pending.at, out)?;
        }

        if self.state != TokenizerState::AfterValue || self.depth != 0 {
            return Err(self.error_at(SyntaxError::UnexpectedEndOfInput, end));
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), ParserError> {
        match &self.status {
            Status::Open => Ok(()),
            Status::Flushed => {
                Err(self.error_at(SyntaxError::MalformedIngestion, self.position))
            }
            Status::Failed(err) => Err(err.clone()),
        }
    }

    fn settle(&mut self, result: Result<(), ParserError>) -> Result<(), ParserError> {
        let Err(err) = result else {
            return Ok(());
        };
        if self.options.verbose {
            debug!(error = %err, state = ?self.state, depth = self.depth, "tokenizer failed");
        }
        #[cfg(any(test, feature = "fuzzing"))]
        if self.options.panic_on_error {
            panic!("{err}");
        }
        self.status = Status::Failed(err.clone());
        Err(err)
    }

    fn ingest_into(&mut self, c: char, out: &mut Tokens) -> Result<(), ParserError> {
        if c == '\r' || c == BYTE_ORDER_MARK {
            return Ok(());
        }
        let at = self.position;
        if c == '\n' {
            self.position.line += 1;
            self.position.column = 0;
        } else {
            self.position.column += 1;
        }
        self.trailing.push(c);
        self.accept(c, at, out)
    }

    /// Resolve the held-back character now that `c` is known, then hold back
    /// `c` unless both formed a two-character pattern.
    fn accept(&mut self, c: char, at: Position, out: &mut Tokens) -> Result<(), ParserError> {
        let Some(prev) = self.lookahead.take() else {
            self.lookahead = Some(Pending { ch: c, at });
            return Ok(());
        };
        if !self.step_pair(prev, c, at)? {
            self.step(prev.ch, prev.at, out)?;
            self.lookahead = Some(Pending { ch: c, at });
        }
        Ok(())
    }

    /// Returns `true` if `prev` and `next` were consumed together.
    fn step_pair(&mut self, prev: Pending, next: char, at: Position) -> Result<bool, ParserError> {
        use TokenizerState::*;

        match (prev.ch, self.state) {
            ('/', AfterKey) if next == '/' => {
                self.transition(CommentAfterKey, prev.ch, prev.at);
                Ok(true)
            }
            ('/', AfterValue) if next == '/' => {
                self.transition(CommentAfterValue, prev.ch, prev.at);
                Ok(true)
            }
            ('\\', InKeyQuoted | InValueQuoted) if self.escapes_enabled() => {
                self.push_escape(next, at)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn push_escape(&mut self, c: char, at: Position) -> Result<(), ParserError> {
        match c {
            '\\' | '"' => self.lexeme.push(c),
            'n' | 't' => {
                self.lexeme.push('\\');
                self.lexeme.push(c);
            }
            _ => match self.options.unknown_escapes {
                UnknownEscapeMode::Error => {
                    return Err(self.error_at(SyntaxError::UnsupportedEscapeSequence(c), at));
                }
                UnknownEscapeMode::Passthrough => {
                    self.lexeme.push('\\');
                    self.lexeme.push(c);
                }
            },
        }
        Ok(())
    }

    /// Single-character transition.
    #[allow(clippy::match_same_arms)]
    fn step(&mut self, c: char, at: Position, out: &mut Tokens) -> Result<(), ParserError> {
        use CharClass::*;
        use TokenizerState::*;

        let class = CharClass::of(c, self.escapes_enabled());
        let next = match (self.state, class) {
            // Quoted tokens take everything up to the closing quote.
            (InKeyQuoted, Quote) => {
                self.emit_key(out);
                AfterKey
            }
            (InValueQuoted, Quote) => {
                self.emit_value(out);
                AfterValue
            }
            (InKeyQuoted | InValueQuoted, Escape) => {
                return Err(self.error_at(SyntaxError::NoCharacterToEscape, at));
            }
            (InKeyQuoted | InValueQuoted, _) => {
                self.lexeme.push(c);
                self.state
            }

            (InKeyUnquoted, Newline | Whitespace | Quote) => {
                self.emit_key(out);
                AfterKey
            }
            (InKeyUnquoted, OpenBracket) => {
                self.emit_key(out);
                self.open_block(out);
                AfterValue
            }
            (InKeyUnquoted | AfterKey, CloseBracket) => {
                return Err(self.error_at(SyntaxError::CloseBracketAfterKey, at));
            }

            (InValueUnquoted, Newline | Whitespace | Quote) => {
                self.emit_value(out);
                AfterValue
            }
            (InValueUnquoted | AfterValue, OpenBracket) => {
                return Err(self.error_at(SyntaxError::OpenBracketAfterValue, at));
            }
            (InValueUnquoted, CloseBracket) => {
                self.emit_value(out);
                self.close_block(at, out)?;
                AfterValue
            }

            (InKeyUnquoted | InValueUnquoted | AfterKey | AfterValue, Escape) => {
                return Err(self.error_at(SyntaxError::EscapeOutsideQuote, at));
            }
            (InKeyUnquoted | InValueUnquoted, Slash | Ordinary) => {
                self.lexeme.push(c);
                self.state
            }

            (AfterKey | AfterValue, Newline | Whitespace) => self.state,
            (AfterKey, Quote) => {
                self.lexeme.clear();
                InValueQuoted
            }
            (AfterKey, OpenBracket) => {
                self.open_block(out);
                AfterValue
            }
            (AfterKey, Slash | Ordinary) => {
                self.lexeme.clear();
                self.lexeme.push(c);
                InValueUnquoted
            }
            (AfterValue, Quote) => {
                self.lexeme.clear();
                InKeyQuoted
            }
            (AfterValue, CloseBracket) => {
                self.close_block(at, out)?;
                AfterValue
            }
            (AfterValue, Slash | Ordinary) => {
                self.lexeme.clear();
                self.lexeme.push(c);
                InKeyUnquoted
            }

            (CommentAfterKey, Newline) => AfterKey,
            (CommentAfterValue, Newline) => AfterValue,
            (CommentAfterKey | CommentAfterValue, _) => self.state,
        };
        self.transition(next, c, at);
        Ok(())
    }

    #[inline]
    fn transition(&mut self, next: TokenizerState, c: char, at: Position) {
        if self.options.verbose && next != self.state {
            trace!(
                from = ?self.state,
                to = ?next,
                ch = ?c,
                line = at.line,
                column = at.column,
                depth = self.depth,
                "tokenizer transition"
            );
        }
        self.state = next;
    }

    fn emit_key(&mut self, out: &mut Tokens) {
        out.push(Token::Key(mem::take(&mut self.lexeme)));
    }

    fn emit_value(&mut self, out: &mut Tokens) {
        out.push(Token::Value(mem::take(&mut self.lexeme)));
    }

    fn open_block(&mut self, out: &mut Tokens) {
        self.depth += 1;
        out.push(Token::NestStart);
    }

    fn close_block(&mut self, at: Position, out: &mut Tokens) -> Result<(), ParserError> {
        let Some(depth) = self.depth.checked_sub(1) else {
            return Err(self.error_at(SyntaxError::TooManyBrackets, at));
        };
        self.depth = depth;
        out.push(Token::NestEnd);
        Ok(())
    }

    #[inline]
    fn escapes_enabled(&self) -> bool {
        !self.options.disable_escape
    }

    fn error_at(&self, source: SyntaxError, at: Position) -> ParserError {
        let location = self.options.track_position.then(|| Location {
            position: at,
            context: self.trailing.snapshot(),
        });
        ParserError::located(source, location)
    }
}

/// Iterator returned by [`Tokenizer::feed`].
pub struct Feed<'t, 'src> {
    tokenizer: &'t mut Tokenizer,
    carry: String,
    carry_pos: usize,
    chunk: &'src str,
    chunk_pos: usize,
    done: bool,
}

impl Feed<'_, '_> {
    fn next_char(&mut self) -> Option<char> {
        if let Some(c) = self.carry[self.carry_pos..].chars().next() {
            self.carry_pos += c.len_utf8();
            return Some(c);
        }
        let c = self.chunk[self.chunk_pos..].chars().next()?;
        self.chunk_pos += c.len_utf8();
        Some(c)
    }
}

impl Iterator for Feed<'_, '_> {
    type Item = Result<Token, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if let Some(token) = self.tokenizer.queued.pop_front() {
                return Some(Ok(token));
            }
            let Some(c) = self.next_char() else {
                self.done = true;
                return None;
            };
            match self.tokenizer.ingest_char(c) {
                Ok(tokens) => self.tokenizer.queued.extend(tokens),
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl Drop for Feed<'_, '_> {
    fn drop(&mut self) {
        // Hand unread input back so the next feed or flush resumes here.
        self.tokenizer.unread.push_str(&self.carry[self.carry_pos..]);
        self.tokenizer.unread.push_str(&self.chunk[self.chunk_pos..]);
    }
}
