//! A streaming, incremental parser for Valve's KeyValues text format (VDF).
//!
//! The crate is layered:
//!
//! - [`Tokenizer`] is the core: a character-driven state machine that turns
//!   text into [`Token`]s one character at a time, so input may arrive in
//!   chunks split anywhere.
//! - [`KeyPathStack`] lifts tokens into [`Pair`]s (a key path plus its value),
//!   and [`insert_pair`] folds pairs into a nested [`Map`].
//! - [`VdfModemPairs`] and [`VdfModemValues`] wire those together for callers
//!   that feed chunks and want pairs or a finished map.
//!
//! ```rust
//! use vdfmodem::{Value, from_str};
//!
//! let map = from_str(r#""app" { "name" "Example" "depots" { "1" "x" } }"#)?;
//! assert_eq!(map["app"].get("name"), Some(&Value::from("Example")));
//! # Ok::<(), vdfmodem::ParserError>(())
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

#[macro_use]
mod tracing_macros;

mod aggregate;
mod error;
mod options;
mod token;
mod tokenizer;
mod value;
mod vdfmodem_pairs;
mod vdfmodem_values;

#[cfg(feature = "std")]
mod io;


use alloc::vec::Vec;

pub use aggregate::{KeyPathStack, Pair, insert_object, insert_pair};
pub use error::{Location, ParserError, Position, SyntaxError};
#[cfg(feature = "std")]
pub use io::{ReadError, ReaderPairs, from_path, from_reader, pairs_from_reader};
pub use options::{DuplicateKeyPolicy, ParserOptions, UnknownEscapeMode, ValuesOptions};
pub use token::{Token, TokenizerState, Tokens};
pub use tokenizer::{Feed, Tokenizer};
pub use value::{Map, Value};
pub use vdfmodem_pairs::{VdfModemPairs, VdfModemPairsIter};
pub use vdfmodem_values::VdfModemValues;

#[doc(hidden)]
pub use alloc::{string::String as __String, vec as __vec};

/// Parse a complete VDF document into a [`Map`] with default options.
///
/// # Errors
///
/// Returns a [`ParserError`] for the first structural or escape violation.
pub fn from_str(input: &str) -> Result<Map, ParserError> {
    from_str_with(input, ParserOptions::default(), ValuesOptions::default())
}

/// Parse a complete VDF document into a [`Map`].
///
/// # Errors
///
/// Returns a [`ParserError`] for the first structural or escape violation.
pub fn from_str_with(
    input: &str,
    options: ParserOptions,
    values: ValuesOptions,
) -> Result<Map, ParserError> {
    let mut modem = VdfModemValues::new(options, values);
    modem.feed(input)?;
    modem.finish()
}

/// Parse a complete VDF document into its flat pair sequence.
///
/// # Errors
///
/// Returns a [`ParserError`] for the first structural or escape violation.
pub fn pairs_from_str(input: &str, options: ParserOptions) -> Result<Vec<Pair>, ParserError> {
    let mut modem = VdfModemPairs::new(options);
    let mut pairs = modem.feed(input).collect::<Result<Vec<_>, _>>()?;
    pairs.extend(modem.finish()?);
    Ok(pairs)
}

/// Tokenize a complete VDF document.
///
/// # Errors
///
/// Returns a [`ParserError`] for the first structural or escape violation.
pub fn tokenize_str(input: &str, options: ParserOptions) -> Result<Vec<Token>, ParserError> {
    let mut tokenizer = Tokenizer::new(options);
    let mut tokens = tokenizer.feed(input).collect::<Result<Vec<_>, _>>()?;
    tokens.extend(tokenizer.flush()?);
    Ok(tokens)
}

/// Build a key path (`Vec<String>`) from a list of string-like segments.
///
/// ```rust
/// use vdfmodem::key_path;
///
/// let p = key_path!["AppState", "UserConfig", "language"];
/// assert_eq!(p, vec!["AppState".to_string(), "UserConfig".into(), "language".into()]);
/// ```
#[macro_export]
macro_rules! key_path {
    ( $( $segment:expr ),* $(,)? ) => {{
        let path: $crate::__vec::Vec<$crate::__String> =
            $crate::__vec![$($crate::__String::from($segment)),*];
        path
    }};
}
