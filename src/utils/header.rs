//! ABOUTME header extraction.
//!
//! A header is a comment line of the form `# ABOUTME: text` or
//! `// ABOUTME: text`. Only the first two lines of a file are inspected.
//! `\n`, `\r\n` and a lone `\r` all end a line.

use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Tag keyword recognized in header lines
pub const HEADER_TAG: &str = "ABOUTME";

/// Number of leading lines that may carry a header
pub const HEADER_LINES: usize = 2;

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let pattern = format!(r"^(?:#|//)\s*{HEADER_TAG}:\s*(.+)$");
        Regex::new(&pattern).expect("header pattern is valid")
    })
}

/// Parse one line, returning the description fragment if it is a header.
///
/// Surrounding whitespace on the line is ignored.
pub fn parse_header_line(line: &str) -> Option<&str> {
    header_pattern()
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Read one line into `buf` without its terminator.
///
/// Stops at `\n`, `\r\n` or a lone `\r`. Returns `false` at end of input.
fn read_line_bytes<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    let mut read_any = false;
    loop {
        let (ended_on_cr, used) = {
            let available = reader.fill_buf()?;
            if available.is_empty() {
                return Ok(read_any);
            }
            read_any = true;
            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    buf.extend_from_slice(&available[..i]);
                    (Some(available[i] == b'\r'), i + 1)
                }
                None => {
                    buf.extend_from_slice(available);
                    (None, available.len())
                }
            }
        };
        reader.consume(used);

        match ended_on_cr {
            Some(true) => {
                if reader.fill_buf()?.first() == Some(&b'\n') {
                    reader.consume(1);
                }
                return Ok(true);
            }
            Some(false) => return Ok(true),
            None => {}
        }
    }
}

/// Extract the ABOUTME description of a file.
///
/// Returns `None` when neither of the first two lines is a header, or when
/// the file cannot be opened or is not valid UTF-8 text. Two header lines are
/// joined with a single space.
pub fn extract_header(path: &Path) -> Option<String> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!("Cannot open {}: {}", path.display(), e);
            return None;
        }
    };

    let mut reader = BufReader::new(file);
    let mut fragments: Vec<String> = Vec::with_capacity(HEADER_LINES);
    let mut buf = Vec::new();

    for _ in 0..HEADER_LINES {
        buf.clear();
        match read_line_bytes(&mut reader, &mut buf) {
            Ok(false) => break,
            Ok(true) => {}
            Err(e) => {
                debug!("Cannot read {}: {}", path.display(), e);
                return None;
            }
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(_) => {
                debug!("Skipping non-UTF-8 file {}", path.display());
                return None;
            }
        };

        if let Some(fragment) = parse_header_line(line) {
            fragments.push(fragment.to_string());
        }
    }

    if fragments.is_empty() {
        None
    } else {
        Some(fragments.join(" "))
    }
}
