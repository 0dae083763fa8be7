#![expect(missing_docs)]

mod common;

use core::fmt::Write;

use common::{APP_MANIFEST, char_chunks};
use vdfmodem::{Map, ParserOptions, Value, ValuesOptions, VdfModemPairs, VdfModemValues};

fn render_pairs(stream: &[String]) -> String {
    let mut modem = VdfModemPairs::new(ParserOptions::default());
    let mut out = String::new();
    let mut write = |pair: vdfmodem::Pair| {
        writeln!(out, "{} = {:?}", pair.key_path.join("/"), pair.value).unwrap();
    };
    for chunk in stream {
        for pair in modem.feed(chunk) {
            write(pair.expect("pairs error"));
        }
    }
    for pair in modem.finish().expect("finish error") {
        write(pair);
    }
    out
}

fn render_map(map: &Map, depth: usize, out: &mut String) {
    for (key, value) in map {
        let pad = "  ".repeat(depth);
        match value {
            Value::String(s) => writeln!(out, "{pad}{key}: {s:?}").unwrap(),
            Value::Object(inner) => {
                writeln!(out, "{pad}{key}:").unwrap();
                render_map(inner, depth + 1, out);
            }
        }
    }
}

#[test]
fn snapshot_pairs_any_chunking() {
    let whole = render_pairs(&[APP_MANIFEST.to_string()]);
    for size in [1, 2, 7, 64] {
        assert_eq!(render_pairs(&char_chunks(APP_MANIFEST, size)), whole, "chunk size {size}");
    }
    insta::assert_snapshot!(whole, @r#"
    AppState/appid = "440"
    AppState/Universe = "1"
    AppState/name = "Team Fortress 2"
    AppState/UserConfig/language = "english"
    AppState/InstalledDepots/441/manifest = "7707612755534149574"
    AppState/InstalledDepots/441/size = "15166358436"
    "#);
}

#[test]
fn snapshot_values() {
    let mut modem = VdfModemValues::new(ParserOptions::default(), ValuesOptions::default());
    for chunk in char_chunks(APP_MANIFEST, 5) {
        modem.feed(&chunk).expect("values error");
    }
    let map = modem.finish().expect("finish error");
    let mut out = String::new();
    render_map(&map, 0, &mut out);
    insta::assert_snapshot!(out, @r#"
    AppState:
      InstalledDepots:
        441:
          manifest: "7707612755534149574"
          size: "15166358436"
      MountedConfig:
      Universe: "1"
      UserConfig:
        language: "english"
      appid: "440"
      name: "Team Fortress 2"
    "#);
}

#[test]
fn snapshot_latest_wins() {
    let input = r#"
        "k" { "a" "1" }
        "k" { "b" "2" }
        "k" "scalar"
        "j" "1"
        "j" { "nested" "yes" }
    "#;
    let map = vdfmodem::from_str_with(input, ParserOptions::default(), ValuesOptions::latest_wins())
        .expect("parse error");
    let mut out = String::new();
    render_map(&map, 0, &mut out);
    insta::assert_snapshot!(out, @r#"
    j:
      nested: "yes"
    k: "scalar"
    "#);
}
