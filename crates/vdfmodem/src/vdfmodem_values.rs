use crate::{
    DuplicateKeyPolicy, ParserError, ParserOptions, ValuesOptions,
    aggregate::{KeyPathStack, insert_object, insert_pair},
    token::Token,
    tokenizer::Tokenizer,
    value::Map,
};

/// Adapter that folds a chunked VDF document into a [`Map`].
///
/// Duplicate keys are resolved by [`ValuesOptions::duplicate_keys`]. Empty
/// blocks are kept as empty maps.
///
/// ```rust
/// use vdfmodem::{ParserOptions, Value, ValuesOptions, VdfModemValues};
///
/// let mut modem = VdfModemValues::new(ParserOptions::default(), ValuesOptions::latest_wins());
/// modem.feed(r#""k" { "a" "1" } "k" "#)?;
/// modem.feed(r#""2""#)?;
/// let map = modem.finish()?;
/// assert_eq!(map["k"], Value::from("2"));
/// # Ok::<(), vdfmodem::ParserError>(())
/// ```
#[derive(Debug, Clone)]
pub struct VdfModemValues {
    tokenizer: Tokenizer,
    fold: Fold,
}

/// Folding state, kept apart from the tokenizer so a live [`Feed`] can
/// borrow the tokenizer while tokens are applied.
///
/// [`Feed`]: crate::Feed
#[derive(Debug, Clone)]
struct Fold {
    stack: KeyPathStack,
    root: Map,
    policy: DuplicateKeyPolicy,
    verbose: bool,
}

impl VdfModemValues {
    #[must_use]
    pub fn new(options: ParserOptions, values: ValuesOptions) -> Self {
        Self {
            tokenizer: Tokenizer::new(options),
            fold: Fold {
                stack: KeyPathStack::new(),
                root: Map::new(),
                policy: values.duplicate_keys,
                verbose: options.verbose,
            },
        }
    }

    /// The map built so far. Blocks that are still open are included with
    /// the pairs read up to now.
    #[must_use]
    pub fn map(&self) -> &Map {
        &self.fold.root
    }

    /// Feed a chunk of input.
    ///
    /// # Errors
    ///
    /// See [`Tokenizer::ingest_char`].
    pub fn feed(&mut self, chunk: &str) -> Result<(), ParserError> {
        for token in self.tokenizer.feed(chunk) {
            self.fold.apply(token?)?;
        }
        Ok(())
    }

    /// Feed a single character.
    ///
    /// # Errors
    ///
    /// See [`Tokenizer::ingest_char`].
    pub fn ingest_char(&mut self, c: char) -> Result<(), ParserError> {
        for token in self.tokenizer.ingest_char(c)? {
            self.fold.apply(token)?;
        }
        Ok(())
    }

    /// Apply a token from a custom source, bypassing the tokenizer.
    ///
    /// # Errors
    ///
    /// See [`KeyPathStack::push_token`].
    pub fn push_token(&mut self, token: Token) -> Result<(), ParserError> {
        self.fold.apply(token)
    }

    /// Signal end of input and return the finished map.
    ///
    /// # Errors
    ///
    /// See [`Tokenizer::flush`].
    pub fn finish(mut self) -> Result<Map, ParserError> {
        for token in self.tokenizer.flush()? {
            self.fold.apply(token)?;
        }
        Ok(self.fold.root)
    }
}

impl Fold {
    fn apply(&mut self, token: Token) -> Result<(), ParserError> {
        if token == Token::NestStart {
            let kept = insert_object(&mut self.root, self.stack.path(), self.policy)?;
            if !kept && self.verbose {
                trace!(key_path = ?self.stack.path(), policy = ?self.policy, "block dropped by duplicate key policy");
            }
            return self.stack.push_token(token).map(drop);
        }
        if let Some(pair) = self.stack.push_token(token)? {
            let stored = insert_pair(&mut self.root, &pair.key_path, pair.value, self.policy)?;
            if !stored && self.verbose {
                trace!(key_path = ?pair.key_path, policy = ?self.policy, "value dropped by duplicate key policy");
            }
        }
        Ok(())
    }
}
