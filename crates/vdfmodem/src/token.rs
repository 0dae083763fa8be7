use alloc::string::String;

use smallvec::SmallVec;

/// A structural token produced by the [`Tokenizer`](crate::Tokenizer).
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// A completed key lexeme.
    Key(String),
    /// A completed value lexeme.
    Value(String),
    /// `{`: the preceding key opens a nested block.
    NestStart,
    /// `}`: the innermost open block is closed.
    NestEnd,
}

impl Token {
    /// Returns `true` for [`Token::NestStart`] and [`Token::NestEnd`].
    ///
    /// ```rust
    /// use vdfmodem::{ParserOptions, tokenize_str};
    ///
    /// let tokens = tokenize_str("a { b c }", ParserOptions::default())?;
    /// assert_eq!(tokens.iter().filter(|t| t.is_structural()).count(), 2);
    /// # Ok::<(), vdfmodem::ParserError>(())
    /// ```
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::NestStart | Self::NestEnd)
    }
}

/// Tokens emitted by a single ingestion call. A call emits at most two tokens
/// except for `flush`, which may spill onto the heap.
pub type Tokens = SmallVec<[Token; 2]>;

/// Lexer state. `AfterValue` is both the initial and the only accepting
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenizerState {
    InKeyQuoted,
    InValueQuoted,
    InKeyUnquoted,
    InValueUnquoted,
    AfterKey,
    AfterValue,
    CommentAfterKey,
    CommentAfterValue,
}

impl TokenizerState {
    /// Inside a quoted key or value, where escapes apply.
    #[must_use]
    pub fn is_quoted(self) -> bool {
        matches!(self, Self::InKeyQuoted | Self::InValueQuoted)
    }
}
