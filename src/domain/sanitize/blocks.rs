//! Delimited file block parsing.
//!
//! ```text
//! === FILE: models.py ===
//! ...content...
//! === END FILE ===
//! ```

pub const FILE_END_MARKER: &str = "=== END FILE ===";
const FILE_START_PREFIX: &str = "=== FILE:";
const MARKER_SUFFIX: &str = "===";
const CODE_FENCE: &str = "```";

pub fn file_start_marker(name: &str) -> String {
    format!("{} {} {}", FILE_START_PREFIX, name, MARKER_SUFFIX)
}

/// A file block as it appeared in the response, before any fix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub name: String,
    pub content: String,
    /// False when the block ran into the next start marker or end of text.
    pub terminated: bool,
}

/// Split response text into file blocks. Text outside blocks is discarded.
pub fn split_blocks(raw: &str) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in raw.lines() {
        if let Some(name) = parse_start_marker(line) {
            if let Some((open_name, lines)) = current.take() {
                blocks.push(finish_block(open_name, &lines, false));
            }
            current = Some((name, Vec::new()));
            continue;
        }

        if line.trim() == FILE_END_MARKER {
            if let Some((open_name, lines)) = current.take() {
                blocks.push(finish_block(open_name, &lines, true));
            }
            continue;
        }

        if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }

    if let Some((open_name, lines)) = current.take() {
        blocks.push(finish_block(open_name, &lines, false));
    }

    blocks
}

fn parse_start_marker(line: &str) -> Option<String> {
    let inner = line.trim().strip_prefix(FILE_START_PREFIX)?.strip_suffix(MARKER_SUFFIX)?;
    let name = inner.trim().trim_matches('`').trim();
    let name = name.strip_prefix("./").unwrap_or(name);
    if name.is_empty() { None } else { Some(name.to_string()) }
}

fn finish_block(name: String, lines: &[&str], terminated: bool) -> RawBlock {
    RawBlock { name, content: strip_code_fence(lines), terminated }
}

/// Drop a markdown fence wrapping the block and surrounding blank lines.
fn strip_code_fence(lines: &[&str]) -> String {
    let mut start = 0;
    let mut end = lines.len();

    while start < end && lines[start].trim().is_empty() {
        start += 1;
    }
    while end > start && lines[end - 1].trim().is_empty() {
        end -= 1;
    }

    if start < end && lines[start].trim_start().starts_with(CODE_FENCE) {
        start += 1;
        if end > start && lines[end - 1].trim() == CODE_FENCE {
            end -= 1;
        }
    }

    let body = lines[start..end].join("\n");
    let body = body.trim_matches('\n');
    if body.trim().is_empty() { String::new() } else { format!("{}\n", body.trim_end()) }
}
