//! Comment stripping and `@name` macro resolution (C2).

use crate::error::{Error, Result};
use std::collections::HashMap;

/// Output of preprocessing: the cleaned CDL body ready for the lexer, plus
/// the side-channel data (`doc_comments`, resolved `definitions`) that the
/// parser folds straight into [`crate::ast::ParseResult`].
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessResult {
    pub text: String,
    pub doc_comments: Vec<String>,
    pub definitions: HashMap<String, String>,
}

/// Run the full preprocessing pipeline (§4.2) over raw CDL input.
pub fn preprocess(input: &str) -> Result<PreprocessResult> {
    if input.chars().count() > 5000 {
        return Err(Error::InputTooLong {
            len: input.chars().count(),
        });
    }

    let (without_doc_comments, doc_comments) = extract_doc_comments(input);
    let without_block_comments = strip_block_comments(&without_doc_comments);
    let without_line_comments = strip_line_comments(&without_block_comments);
    let (body, raw_definitions) = extract_definitions(&without_line_comments);

    let mut resolved: Vec<(String, String)> = Vec::with_capacity(raw_definitions.len());
    let mut resolved_map: HashMap<String, String> = HashMap::new();
    for (name, raw_body) in &raw_definitions {
        let expanded = substitute(raw_body, &resolved_map, false)?;
        resolved_map.insert(name.clone(), expanded.clone());
        resolved.push((name.clone(), expanded));
    }

    let expanded_body = substitute(&body, &resolved_map, true)?;
    let trimmed = expanded_body.trim().to_string();
    if trimmed.is_empty() {
        return Err(Error::EmptyInput);
    }

    Ok(PreprocessResult {
        text: trimmed,
        doc_comments,
        definitions: resolved_map,
    })
}

/// Lines whose leftmost non-whitespace starts with `#!` become doc comments
/// (rest of line, trimmed) and are removed from the body.
fn extract_doc_comments(input: &str) -> (String, Vec<String>) {
    let mut kept = Vec::new();
    let mut docs = Vec::new();
    for line in input.split('\n') {
        let trimmed_start = line.trim_start();
        if let Some(rest) = trimmed_start.strip_prefix("#!") {
            docs.push(rest.trim().to_string());
        } else {
            kept.push(line);
        }
    }
    (kept.join("\n"), docs)
}

/// Remove `/* ... */` block comments, non-greedy, across line boundaries.
fn strip_block_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        match rest.find("/*") {
            None => {
                out.push_str(rest);
                break;
            }
            Some(start) => {
                out.push_str(&rest[..start]);
                match rest[start..].find("*/") {
                    Some(end_rel) => {
                        rest = &rest[start + end_rel + 2..];
                    }
                    None => break, // unterminated block comment: drop the remainder
                }
            }
        }
    }
    out
}

/// Remove `#` to end-of-line comments.
fn strip_line_comments(text: &str) -> String {
    text.split('\n')
        .map(|line| match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract `@name = body` definition lines (in insertion order), returning
/// the remaining body text with those lines removed.
fn extract_definitions(text: &str) -> (String, Vec<(String, String)>) {
    let mut kept = Vec::new();
    let mut defs = Vec::new();
    for line in text.split('\n') {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix('@') {
            if let Some(eq_idx) = rest.find('=') {
                let name = rest[..eq_idx].trim();
                let body = rest[eq_idx + 1..].trim();
                if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    defs.push((name.to_string(), body.to_string()));
                    continue;
                }
            }
        }
        kept.push(line);
    }
    (kept.join("\n"), defs)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace `$name` references with their resolved bodies. In non-`strict`
/// mode (used while resolving each definition against only the definitions
/// that precede it), an unresolved `$name` is left untouched rather than
/// failing — it may be a forward reference that never actually gets used.
/// In `strict` mode (the final pass over the main CDL body), any `$name`
/// that is still unresolved is an error.
fn substitute(text: &str, defs: &HashMap<String, String>, strict: bool) -> Result<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '$' {
            let start = i + 1;
            let mut j = start;
            while j < chars.len() && is_word_char(chars[j]) {
                j += 1;
            }
            if j > start {
                let name: String = chars[start..j].iter().collect();
                match defs.get(&name) {
                    Some(value) => {
                        out.push_str(value);
                        i = j;
                        continue;
                    }
                    None if strict => {
                        return Err(Error::UnresolvedReference { name });
                    }
                    None => {
                        out.push('$');
                        out.push_str(&name);
                        i = j;
                        continue;
                    }
                }
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    Ok(out)
}
