//! Fix-ups for the React/TypeScript path.
//!
//! Every `ensure_*` function is idempotent: applying it to its own output
//! returns the input unchanged.

pub const USE_CLIENT_DIRECTIVE: &str = "'use client';";
pub const REACT_IMPORT: &str = "import React from 'react';";

/// Index and text of the first line that is neither blank nor a comment.
fn first_code_line(content: &str) -> Option<(usize, &str)> {
    let mut in_block_comment = false;
    for (index, line) in content.lines().enumerate() {
        let mut code = line.trim();
        if in_block_comment {
            match code.find("*/") {
                Some(end) => {
                    in_block_comment = false;
                    code = code[end + 2..].trim();
                }
                None => continue,
            }
        }
        if let Some(comment) = code.strip_prefix("/*") {
            match comment.find("*/") {
                Some(end) => code = comment[end + 2..].trim(),
                None => {
                    in_block_comment = true;
                    continue;
                }
            }
        }
        if code.is_empty() || code.starts_with("//") {
            continue;
        }
        return Some((index, code));
    }
    None
}

fn is_directive(line: &str) -> bool {
    let directive = line.trim_end_matches(';').trim();
    directive == "'use client'" || directive == "\"use client\""
}

pub fn has_use_client_directive(content: &str) -> bool {
    first_code_line(content).is_some_and(|(_, line)| is_directive(line))
}

/// Prepend `'use client';` unless the file already opens with it.
pub fn ensure_use_client_directive(content: &str) -> String {
    if has_use_client_directive(content) {
        return content.to_string();
    }
    format!("{}\n{}", USE_CLIENT_DIRECTIVE, content)
}

pub fn has_react_import(content: &str) -> bool {
    content.lines().map(str::trim_start).any(|line| {
        line.starts_with("import React") || line.starts_with("import * as React")
    })
}

/// Insert the React import after the directive, or at the top when there is none.
pub fn ensure_react_import(content: &str) -> String {
    if has_react_import(content) {
        return content.to_string();
    }

    if let Some((directive_index, line)) = first_code_line(content)
        && is_directive(line)
    {
        let mut output = String::with_capacity(content.len() + REACT_IMPORT.len() + 1);
        for (index, line) in content.split_inclusive('\n').enumerate() {
            output.push_str(line);
            if index == directive_index {
                if !line.ends_with('\n') {
                    output.push('\n');
                }
                output.push_str(REACT_IMPORT);
                output.push('\n');
            }
        }
        return output;
    }

    format!("{}\n{}", REACT_IMPORT, content)
}

pub fn has_default_export(content: &str) -> bool {
    content.lines().map(str::trim_start).any(|line| {
        line.starts_with("export default")
            || (line.starts_with("export {") && line.contains("default"))
    })
}

pub fn has_export(content: &str) -> bool {
    content.lines().map(str::trim_start).any(|line| line.starts_with("export "))
}
