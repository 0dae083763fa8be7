#![allow(clippy::struct_excessive_bools)]

/// What to do with a backslash followed by a character other than `\`, `"`,
/// `n` or `t` inside a quoted key or value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownEscapeMode {
    /// Fail with [`SyntaxError::UnsupportedEscapeSequence`].
    ///
    /// [`SyntaxError::UnsupportedEscapeSequence`]: crate::SyntaxError::UnsupportedEscapeSequence
    #[default]
    Error,
    /// Keep both characters verbatim, e.g. `\q` stays `\q`.
    Passthrough,
}

/// Resolution of a key that appears more than once at the same path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateKeyPolicy {
    /// The first occurrence stands; later writes to an occupied slot are
    /// dropped silently.
    #[default]
    EarliestWins,
    /// The last occurrence replaces whatever the slot held. Nested blocks at
    /// the same path are still merged.
    LatestWins,
}

/// Configuration options for the VDF tokenizer.
///
/// # Examples
///
/// ```rust
/// use vdfmodem::{ParserOptions, Tokenizer, UnknownEscapeMode};
///
/// let options = ParserOptions {
///     unknown_escapes: UnknownEscapeMode::Passthrough,
///     ..Default::default()
/// };
/// let mut tokenizer = Tokenizer::new(options);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Treat `\` as an ordinary character everywhere.
    ///
    /// # Default
    ///
    /// `false`
    pub disable_escape: bool,

    /// Handling of unrecognized escape sequences in quoted tokens. Ignored
    /// when `disable_escape` is set.
    ///
    /// # Default
    ///
    /// [`UnknownEscapeMode::Error`]
    pub unknown_escapes: UnknownEscapeMode,

    /// Emit a `tracing` event for every state transition and error.
    ///
    /// Has no effect unless the `tracing` feature is enabled.
    ///
    /// # Default
    ///
    /// `false`
    pub verbose: bool,

    /// How many recently consumed characters an error message quotes. `0`
    /// disables the window.
    ///
    /// # Default
    ///
    /// `20`
    pub debug_buffer_size: usize,

    /// Attach line, column and the trailing window to errors.
    ///
    /// # Default
    ///
    /// `true`
    pub track_position: bool,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on syntax errors instead of returning them.
    ///
    /// Enabled only in test builds to produce backtraces on parse failures.
    pub panic_on_error: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            disable_escape: false,
            unknown_escapes: UnknownEscapeMode::default(),
            verbose: false,
            debug_buffer_size: 20,
            track_position: true,
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: false,
        }
    }
}

/// Options for folding pairs into a [`Map`](crate::Map).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValuesOptions {
    /// Duplicate-key resolution, fixed for the lifetime of the builder.
    ///
    /// # Default
    ///
    /// [`DuplicateKeyPolicy::EarliestWins`]
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl ValuesOptions {
    /// Options with [`DuplicateKeyPolicy::LatestWins`].
    #[must_use]
    pub fn latest_wins() -> Self {
        Self {
            duplicate_keys: DuplicateKeyPolicy::LatestWins,
        }
    }
}
