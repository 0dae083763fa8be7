//! Streams a VDF file (or stdin) and prints every key path with its value as
//! soon as it is read, without building the whole document.
//!
//! Run with
//!
//! ```bash
//! cargo run -p vdfmodem --example dump_pairs -- path/to/appmanifest_440.acf
//! RUST_LOG=vdfmodem=trace cargo run -p vdfmodem --example dump_pairs -- --verbose file.vdf
//! ```

use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    process::ExitCode,
};

use tracing_subscriber::EnvFilter;
use vdfmodem::{ParserOptions, ReadError, pairs_from_reader};

fn run(reader: impl Read, verbose: bool) -> Result<usize, ReadError> {
    let options = ParserOptions {
        verbose,
        ..Default::default()
    };
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut count = 0;
    for pair in pairs_from_reader(reader, options) {
        let pair = pair?;
        writeln!(out, "{} = {:?}", pair.key_path.join("/"), pair.value)?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}

fn main() -> ExitCode {
    let mut verbose = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            _ => path = Some(arg),
        }
    }

    if verbose {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init();
    }

    let result = match path {
        Some(path) => File::open(&path)
            .map_err(ReadError::from)
            .and_then(|file| run(file, verbose)),
        None => run(io::stdin().lock(), verbose),
    };

    match result {
        Ok(count) => {
            eprintln!("{count} pairs");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
