#![allow(missing_docs)]
#![allow(dead_code)]

pub const APP_MANIFEST: &str = "\u{FEFF}\"AppState\"\r
{\r
\t\"appid\"\t\t\"440\"\r
\t\"Universe\"\t\t\"1\"\r
\t\"name\"\t\t\"Team Fortress 2\"\r
\t// per-user settings\r
\t\"UserConfig\"\r
\t{\r
\t\t\"language\"\t\t\"english\"\r
\t}\r
\t\"InstalledDepots\"\r
\t{\r
\t\t\"441\"\r
\t\t{\r
\t\t\t\"manifest\"\t\t\"7707612755534149574\"\r
\t\t\t\"size\"\t\t\"15166358436\"\r
\t\t}\r
\t}\r
\t\"MountedConfig\"\t{ }\r
}\r
";

/// Split `src` into chunks of `size` characters.
pub fn char_chunks(src: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = src.chars().collect();
    chars.chunks(size).map(|c| c.iter().collect()).collect()
}
