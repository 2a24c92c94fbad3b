pub mod file;

use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Parse a document piped on stdin. `None` when stdin is a terminal or
/// nothing was piped.
fn read_piped<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(trimmed)?))
}

/// Read a typed document from `--input <file>` or, failing that, piped stdin.
pub fn read_document<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json(path);
    }
    read_piped()?.ok_or_else(|| format!("--input <file.json> or stdin required for {}", what).into())
}
