//! Lifting tokens into key-path/value pairs and folding pairs into a map.

use alloc::{
    collections::btree_map::Entry,
    string::String,
    vec::Vec,
};

use crate::{
    error::{ParserError, SyntaxError},
    options::DuplicateKeyPolicy,
    token::Token,
    value::{Map, Value},
};

/// A leaf value together with the keys leading to it, outermost first.
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pair {
    pub key_path: Vec<String>,
    pub value: String,
}

/// Stack of enclosing keys, driven by tokens.
///
/// `Key` pushes, `Value` yields a [`Pair`] for the current path and pops,
/// `NestStart` keeps the key as the prefix of the block, `NestEnd` pops it.
///
/// ```rust
/// use vdfmodem::{KeyPathStack, Token, key_path};
///
/// let mut stack = KeyPathStack::new();
/// assert_eq!(stack.push_token(Token::Key("a".into()))?, None);
/// assert_eq!(stack.push_token(Token::NestStart)?, None);
/// assert_eq!(stack.push_token(Token::Key("b".into()))?, None);
/// let pair = stack.push_token(Token::Value("c".into()))?.unwrap();
/// assert_eq!(pair.key_path, key_path!["a", "b"]);
/// assert_eq!(stack.path(), key_path!["a"]);
/// # Ok::<(), vdfmodem::ParserError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyPathStack {
    keys: Vec<String>,
}

impl KeyPathStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The keys currently open, outermost first.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.keys
    }

    /// Apply one token.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::EmptyKeyEncountered`] for a value with no key on the
    /// stack and [`SyntaxError::TooManyBrackets`] for a block end with none
    /// open. Neither happens with tokens from the
    /// [`Tokenizer`](crate::Tokenizer).
    pub fn push_token(&mut self, token: Token) -> Result<Option<Pair>, ParserError> {
        match token {
            Token::Key(key) => {
                self.keys.push(key);
                Ok(None)
            }
            Token::Value(value) => {
                if self.keys.is_empty() {
                    return Err(SyntaxError::EmptyKeyEncountered.into());
                }
                let pair = Pair {
                    key_path: self.keys.clone(),
                    value,
                };
                self.keys.pop();
                Ok(Some(pair))
            }
            Token::NestStart => Ok(None),
            Token::NestEnd => match self.keys.pop() {
                Some(_) => Ok(None),
                None => Err(SyntaxError::TooManyBrackets.into()),
            },
        }
    }
}

/// Walk `segments` from `map`, creating blocks as needed. Returns `None` when
/// a string occupies a slot and the policy keeps it.
fn descend<'m>(
    mut map: &'m mut Map,
    segments: &[String],
    policy: DuplicateKeyPolicy,
) -> Option<&'m mut Map> {
    for segment in segments {
        let slot = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if slot.is_string() {
            match policy {
                DuplicateKeyPolicy::EarliestWins => return None,
                DuplicateKeyPolicy::LatestWins => *slot = Value::Object(Map::new()),
            }
        }
        let Value::Object(inner) = slot else {
            return None;
        };
        map = inner;
    }
    Some(map)
}

/// Fold one pair into `map`.
///
/// Blocks at the same path always merge. A string standing where a block is
/// needed, or any occupied leaf slot, is resolved by `policy`. Returns whether
/// the value was stored.
///
/// ```rust
/// use vdfmodem::{DuplicateKeyPolicy, Map, Value, insert_pair, key_path};
///
/// let mut map = Map::new();
/// insert_pair(&mut map, &key_path!["k"], "1".into(), DuplicateKeyPolicy::EarliestWins)?;
/// let stored = insert_pair(&mut map, &key_path!["k"], "2".into(), DuplicateKeyPolicy::EarliestWins)?;
/// assert!(!stored);
/// assert_eq!(map["k"], Value::from("1"));
/// # Ok::<(), vdfmodem::ParserError>(())
/// ```
///
/// # Errors
///
/// [`SyntaxError::EmptyKeyEncountered`] if `key_path` is empty.
pub fn insert_pair(
    map: &mut Map,
    key_path: &[String],
    value: String,
    policy: DuplicateKeyPolicy,
) -> Result<bool, ParserError> {
    let Some((leaf, parents)) = key_path.split_last() else {
        return Err(SyntaxError::EmptyKeyEncountered.into());
    };
    let Some(parent) = descend(map, parents, policy) else {
        return Ok(false);
    };
    match policy {
        DuplicateKeyPolicy::EarliestWins => match parent.entry(leaf.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Value::String(value));
                Ok(true)
            }
            Entry::Occupied(_) => Ok(false),
        },
        DuplicateKeyPolicy::LatestWins => {
            parent.insert(leaf.clone(), Value::String(value));
            Ok(true)
        }
    }
}

/// Make sure a block exists at `key_path`, so empty blocks survive in the
/// map. Returns whether the block is present afterwards.
///
/// # Errors
///
/// [`SyntaxError::EmptyKeyEncountered`] if `key_path` is empty.
pub fn insert_object(
    map: &mut Map,
    key_path: &[String],
    policy: DuplicateKeyPolicy,
) -> Result<bool, ParserError> {
    if key_path.is_empty() {
        return Err(SyntaxError::EmptyKeyEncountered.into());
    }
    Ok(descend(map, key_path, policy).is_some())
}
