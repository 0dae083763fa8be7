use alloc::vec::Vec;

use crate::{
    ParserError, ParserOptions,
    aggregate::{KeyPathStack, Pair},
    tokenizer::{Feed, Tokenizer},
};

/// Adapter that feeds chunks through the tokenizer and yields completed
/// key-path/value pairs, without building a map.
///
/// ```rust
/// use vdfmodem::{ParserOptions, VdfModemPairs, key_path};
///
/// let mut modem = VdfModemPairs::new(ParserOptions::default());
/// let mut pairs = Vec::new();
/// for chunk in [r#""a" { "b" "#, r#""c" }"#] {
///     for pair in modem.feed(chunk) {
///         pairs.push(pair?);
///     }
/// }
/// pairs.extend(modem.finish()?);
/// assert_eq!(pairs[0].key_path, key_path!["a", "b"]);
/// assert_eq!(pairs[0].value, "c");
/// # Ok::<(), vdfmodem::ParserError>(())
/// ```
#[derive(Debug, Clone)]
pub struct VdfModemPairs {
    tokenizer: Tokenizer,
    stack: KeyPathStack,
}

impl VdfModemPairs {
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            tokenizer: Tokenizer::new(options),
            stack: KeyPathStack::new(),
        }
    }

    /// The keys enclosing the current position, outermost first.
    #[must_use]
    pub fn key_path(&self) -> &[alloc::string::String] {
        self.stack.path()
    }

    /// Feed a chunk and iterate over the pairs it completes.
    #[must_use = "the chunk is only processed as the iterator is driven"]
    pub fn feed<'a, 'src>(&'a mut self, chunk: &'src str) -> VdfModemPairsIter<'a, 'src> {
        VdfModemPairsIter {
            inner: self.tokenizer.feed(chunk),
            stack: &mut self.stack,
        }
    }

    /// Ingest a single character.
    ///
    /// # Errors
    ///
    /// See [`Tokenizer::ingest_char`].
    pub fn ingest_char(&mut self, c: char) -> Result<Vec<Pair>, ParserError> {
        let mut pairs = Vec::new();
        for token in self.tokenizer.ingest_char(c)? {
            pairs.extend(self.stack.push_token(token)?);
        }
        Ok(pairs)
    }

    /// Signal end of input and return the remaining pairs.
    ///
    /// # Errors
    ///
    /// See [`Tokenizer::flush`].
    pub fn finish(mut self) -> Result<Vec<Pair>, ParserError> {
        let mut pairs = Vec::new();
        for token in self.tokenizer.flush()? {
            pairs.extend(self.stack.push_token(token)?);
        }
        Ok(pairs)
    }
}

/// Iterator returned by [`VdfModemPairs::feed`].
pub struct VdfModemPairsIter<'a, 'src> {
    inner: Feed<'a, 'src>,
    stack: &'a mut KeyPathStack,
}

impl Iterator for VdfModemPairsIter<'_, '_> {
    type Item = Result<Pair, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let token = match self.inner.next()? {
                Ok(token) => token,
                Err(err) => return Some(Err(err)),
            };
            match self.stack.push_token(token) {
                Ok(Some(pair)) => return Some(Ok(pair)),
                Ok(None) => {}
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
