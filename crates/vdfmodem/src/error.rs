use alloc::string::String;
use core::fmt;

use thiserror::Error;

/// Rule violated by the input, or by a caller of the ingestion API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("closing bracket without a matching open block")]
    TooManyBrackets,
    #[error("opening bracket after a value")]
    OpenBracketAfterValue,
    #[error("closing bracket directly after a key")]
    CloseBracketAfterKey,
    #[error("escape character at end of input")]
    NoCharacterToEscape,
    #[error("unsupported escape sequence '\\{0}'")]
    UnsupportedEscapeSequence(char),
    #[error("escape character outside of a quoted key or value")]
    EscapeOutsideQuote,
    #[error("value without a key")]
    EmptyKeyEncountered,
    #[error("input delivered after the tokenizer was flushed")]
    MalformedIngestion,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

/// A 0-based line and column, counted in characters. Carriage returns and
/// byte-order marks are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Where an error happened, with the characters consumed just before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub position: Position,
    pub context: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            " at line {}, column {}",
            self.position.line, self.position.column
        )?;
        if !self.context.is_empty() {
            write!(f, " near {:?}", self.context)?;
        }
        Ok(())
    }
}

/// A fatal tokenizer or aggregation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{source}{}", LocationSuffix(.location.as_ref()))]
pub struct ParserError {
    pub(crate) source: SyntaxError,
    pub(crate) location: Option<Location>,
}

struct LocationSuffix<'a>(Option<&'a Location>);

impl fmt::Display for LocationSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(location) => location.fmt(f),
            None => Ok(()),
        }
    }
}

impl ParserError {
    pub(crate) fn new(source: SyntaxError) -> Self {
        Self {
            source,
            location: None,
        }
    }

    pub(crate) fn located(source: SyntaxError, location: Option<Location>) -> Self {
        Self { source, location }
    }

    /// The rule that was violated.
    #[must_use]
    pub fn kind(&self) -> &SyntaxError {
        &self.source
    }

    /// Location details, present when position tracking was enabled.
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Shorthand for the position in [`Self::location`].
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.location.as_ref().map(|l| l.position)
    }
}

impl From<SyntaxError> for ParserError {
    fn from(source: SyntaxError) -> Self {
        Self::new(source)
    }
}
