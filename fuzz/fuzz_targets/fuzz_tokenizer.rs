#![no_main]
use std::cell::RefCell;

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use vdfmodem::{ParserOptions, Token, Tokenizer, UnknownEscapeMode, tokenize_str};

const HEADER: usize = 5; // 1 flag byte + 4-byte split seed

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&str] = &[" ", "\t", "\n", "\r\n", "\u{FEFF}", "// note\n", "//{}\"\n"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// A structurally valid document, rendered with random quoting and padding.
#[derive(Debug, Arbitrary)]
enum Node {
    Pair(String, String),
    Block(String, Vec<Node>),
}

fn push_lexeme(out: &mut String, s: &str, quoted: bool) {
    let bare = !s.is_empty()
        && s.chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | ':'));
    if bare && !quoted {
        out.push_str(s);
        return;
    }
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

fn push_ws(out: &mut String) {
    with_rng(|rng| {
        let n = rng.random_range(1..=3);
        for i in 0..n {
            // A comment must not swallow the next token, so it only follows
            // other padding.
            let table = if i == 0 { &WS_TABLE[..4] } else { WS_TABLE };
            out.push_str(table[rng.random_range(0..table.len())]);
        }
    });
}

fn render(nodes: &[Node], out: &mut String) {
    for node in nodes {
        push_ws(out);
        let quoted = with_rng(|rng| rng.random_bool(0.7));
        match node {
            Node::Pair(key, value) => {
                push_lexeme(out, key, quoted);
                push_ws(out);
                push_lexeme(out, value, quoted);
            }
            Node::Block(key, children) => {
                push_lexeme(out, key, quoted);
                push_ws(out);
                out.push('{');
                render(children, out);
                push_ws(out);
                out.push('}');
            }
        }
    }
    push_ws(out);
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if max_size <= HEADER {
        return fuzzer_mutate(data, size, max_size);
    }
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x07);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let len = with_rng(|rng| rng.random_range(0..=max_size.max(1)));
        let bytes: Vec<u8> = with_rng(|rng| (0..len).map(|_| rng.random::<u8>()).collect());
        let Ok(nodes) = Vec::<Node>::arbitrary(&mut Unstructured::new(&bytes)) else {
            return fuzzer_mutate(data, size, max_size);
        };
        let mut doc = String::new();
        render(&nodes, &mut doc);

        let len = doc.len().min(max_size - HEADER);
        data[HEADER..HEADER + len].copy_from_slice(&doc.as_bytes()[..len]);
        HEADER + len
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

/// Split into non-empty chunks on character boundaries, sizes drawn from
/// `split_seed`.
fn split_into_safe_chunks(text: &str, split_seed: u64) -> Vec<&str> {
    let mut rng = SmallRng::seed_from_u64(split_seed);
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let mut end = rng.random_range(1..=rest.len().min(16));
        while !rest.is_char_boundary(end) {
            end += 1;
        }
        let (head, tail) = rest.split_at(end);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

fn tokenize_chunked(chunks: &[&str], options: ParserOptions) -> Result<Vec<Token>, vdfmodem::ParserError> {
    let mut tokenizer = Tokenizer::new(options);
    let mut tokens = Vec::new();
    for chunk in chunks {
        for token in tokenizer.feed(chunk) {
            tokens.push(token?);
        }
    }
    tokens.extend(tokenizer.flush()?);
    assert_eq!(tokenizer.depth(), 0);
    Ok(tokens)
}

fn tokenizer(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let split_seed = u64::from(u32::from_le_bytes([data[1], data[2], data[3], data[4]]));
    let text = String::from_utf8_lossy(&data[HEADER..]).into_owned();

    let options = ParserOptions {
        disable_escape: flags & 1 != 0,
        unknown_escapes: if flags & 2 != 0 {
            UnknownEscapeMode::Passthrough
        } else {
            UnknownEscapeMode::Error
        },
        track_position: flags & 4 != 0,
        ..Default::default()
    };

    let whole = tokenize_str(&text, options);
    let chunked = tokenize_chunked(&split_into_safe_chunks(&text, split_seed), options);
    assert_eq!(whole, chunked, "chunking changed the outcome for {text:?}");

    if whole.is_ok() {
        let _ = vdfmodem::from_str_with(&text, options, vdfmodem::ValuesOptions::latest_wins());
    }
}

fuzz_target!(|data: &[u8]| tokenizer(data));
