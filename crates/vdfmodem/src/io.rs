//! Reader adapters.
//!
//! Bytes are read in chunks and decoded incrementally, so a multi-byte
//! character split across two reads is reassembled before it reaches the
//! tokenizer. The parser itself never performs I/O.

use alloc::{collections::VecDeque, string::String, vec, vec::Vec};
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use thiserror::Error;

use crate::{
    Map, Pair, ParserError, ParserOptions, ValuesOptions, VdfModemPairs, VdfModemValues,
};

const DEFAULT_READ_SIZE: usize = 8 * 1024;

/// Errors from the reader adapters.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid UTF-8 at byte offset {offset}")]
    InvalidUtf8 { offset: u64 },
    #[error(transparent)]
    Parse(#[from] ParserError),
}

/// Incremental UTF-8 decoder. A trailing incomplete sequence is held back
/// until the next chunk completes it.
#[derive(Debug, Default)]
struct Utf8Decoder {
    pending: Vec<u8>,
    /// Byte offset of `pending[0]` in the stream.
    offset: u64,
}

impl Utf8Decoder {
    fn decode(&mut self, bytes: &[u8], out: &mut String) -> Result<(), ReadError> {
        self.pending.extend_from_slice(bytes);
        let mut i = 0;
        while i < self.pending.len() {
            let (ch, size) = bstr::decode_utf8(&self.pending[i..]);
            match ch {
                Some(c) => {
                    out.push(c);
                    i += size;
                }
                // A valid prefix running to the end may still be completed.
                None if i + size == self.pending.len() => break,
                None => return Err(self.invalid_at(i)),
            }
        }
        self.pending.drain(..i);
        self.offset += i as u64;
        Ok(())
    }

    fn finish(&self) -> Result<(), ReadError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(self.invalid_at(0))
        }
    }

    fn invalid_at(&self, index: usize) -> ReadError {
        ReadError::InvalidUtf8 {
            offset: self.offset + index as u64,
        }
    }
}

fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            result => return result,
        }
    }
}

/// Parse a VDF document from a reader into a [`Map`].
///
/// ```rust
/// use vdfmodem::{ParserOptions, Value, ValuesOptions, from_reader};
///
/// let input = "\"root\"\n{\n\t\"key\" \"value\"\n}\n";
/// let map = from_reader(input.as_bytes(), ParserOptions::default(), ValuesOptions::default())?;
/// assert_eq!(map["root"].get("key"), Some(&Value::from("value")));
/// # Ok::<(), vdfmodem::ReadError>(())
/// ```
///
/// # Errors
///
/// I/O failures, invalid UTF-8, and parse errors.
pub fn from_reader<R: Read>(
    mut reader: R,
    options: ParserOptions,
    values: ValuesOptions,
) -> Result<Map, ReadError> {
    let mut modem = VdfModemValues::new(options, values);
    let mut decoder = Utf8Decoder::default();
    let mut buf = vec![0; DEFAULT_READ_SIZE];
    let mut text = String::new();
    loop {
        let n = read_some(&mut reader, &mut buf)?;
        if n == 0 {
            break;
        }
        text.clear();
        decoder.decode(&buf[..n], &mut text)?;
        modem.feed(&text)?;
    }
    decoder.finish()?;
    Ok(modem.finish()?)
}

/// Open `path` and parse it with [`from_reader`].
///
/// # Errors
///
/// See [`from_reader`].
pub fn from_path<P: AsRef<Path>>(
    path: P,
    options: ParserOptions,
    values: ValuesOptions,
) -> Result<Map, ReadError> {
    from_reader(File::open(path)?, options, values)
}

/// Lazily read pairs from a reader.
///
/// ```rust
/// use vdfmodem::{ParserOptions, key_path, pairs_from_reader};
///
/// let input: &[u8] = br#""a" { "b" "c" }"#;
/// let pairs = pairs_from_reader(input, ParserOptions::default()).collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(pairs[0].key_path, key_path!["a", "b"]);
/// # Ok::<(), vdfmodem::ReadError>(())
/// ```
pub fn pairs_from_reader<R: Read>(reader: R, options: ParserOptions) -> ReaderPairs<R> {
    ReaderPairs::with_read_size(reader, options, DEFAULT_READ_SIZE)
}

/// Iterator returned by [`pairs_from_reader`]. Pairs completed before an
/// error are yielded first; iteration stops after the error.
pub struct ReaderPairs<R: Read> {
    reader: R,
    modem: Option<VdfModemPairs>,
    decoder: Utf8Decoder,
    buf: Vec<u8>,
    text: String,
    ready: VecDeque<Pair>,
    /// Delivered once `ready` has drained.
    failed: Option<ReadError>,
    done: bool,
}

impl<R: Read> ReaderPairs<R> {
    /// Like [`pairs_from_reader`], reading at most `read_size` bytes per call.
    /// A size of zero is treated as one.
    #[must_use]
    pub fn with_read_size(reader: R, options: ParserOptions, read_size: usize) -> Self {
        Self {
            reader,
            modem: Some(VdfModemPairs::new(options)),
            decoder: Utf8Decoder::default(),
            buf: vec![0; read_size.max(1)],
            text: String::new(),
            ready: VecDeque::new(),
            failed: None,
            done: false,
        }
    }

    fn fill(&mut self) -> Result<(), ReadError> {
        let n = read_some(&mut self.reader, &mut self.buf)?;
        if n == 0 {
            self.done = true;
            self.decoder.finish()?;
            if let Some(modem) = self.modem.take() {
                self.ready.extend(modem.finish()?);
            }
            return Ok(());
        }
        self.text.clear();
        self.decoder.decode(&self.buf[..n], &mut self.text)?;
        if let Some(modem) = self.modem.as_mut() {
            for pair in modem.feed(&self.text) {
                self.ready.push_back(pair?);
            }
        }
        Ok(())
    }
}

impl<R: Read> Iterator for ReaderPairs<R> {
    type Item = Result<Pair, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pair) = self.ready.pop_front() {
                return Some(Ok(pair));
            }
            if let Some(err) = self.failed.take() {
                return Some(Err(err));
            }
            if self.done {
                return None;
            }
            if let Err(err) = self.fill() {
                self.done = true;
                self.failed = Some(err);
            }
        }
    }
}
