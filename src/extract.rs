//! Structured extraction
//!
//! Recovers a JSON object embedded in free-form model text, e.g.
//! `Sure! {"a":1}` or a fenced code block, and deserializes it into the
//! caller's type.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ToolsError, ToolsResult};

static GREEDY_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// How the JSON span is located inside the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractStrategy {
    /// First balanced `{ ... }` object, skipping braces inside string literals
    #[default]
    BraceDepth,
    /// First `{` through last `}`
    ///
    /// Breaks when a response contains more than one object, e.g.
    /// `{"a":1} and {"b":2}`.
    Greedy,
}

/// Locate the JSON object span in `text`, if there is one
pub fn extract_json_span(text: &str, strategy: ExtractStrategy) -> Option<&str> {
    match strategy {
        ExtractStrategy::BraceDepth => brace_depth_span(text),
        ExtractStrategy::Greedy => GREEDY_OBJECT.find(text).map(|m| m.as_str()),
    }
}

fn brace_depth_span(text: &str) -> Option<&str> {
    match balanced_spans(text).next() {
        Some(span) => Some(span),
        // Unbalanced; let the greedy match have a go
        None => GREEDY_OBJECT.find(text).map(|m| m.as_str()),
    }
}

/// Balanced `{ ... }` spans in order, each scan resuming after the previous span
fn balanced_spans(text: &str) -> impl Iterator<Item = &str> {
    let mut pos = 0;
    std::iter::from_fn(move || {
        let start = pos + text[pos..].find('{')?;
        let end = balanced_end(text, start)?;
        pos = end;
        Some(&text[start..end])
    })
}

/// Byte offset just past the `}` closing the object opened at `start`
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + ch.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}

/// Deserialize the embedded object, or the whole text when no span is found
///
/// With [`ExtractStrategy::BraceDepth`], a span that does not deserialize
/// (e.g. a `{placeholder}` in prose) is skipped in favour of the next one.
pub fn extract_object<T>(text: &str, strategy: ExtractStrategy) -> ToolsResult<T>
where
    T: DeserializeOwned,
{
    if strategy == ExtractStrategy::BraceDepth {
        let mut first_error = None;
        for span in balanced_spans(text) {
            match serde_json::from_str(span) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(ToolsError::Extraction(e.to_string()));
        }
    }

    let candidate = extract_json_span(text, strategy).unwrap_or(text);
    serde_json::from_str(candidate).map_err(|e| ToolsError::Extraction(e.to_string()))
}

/// Append a JSON example of `T` to `prompt` so the model answers in that shape
pub fn formatting_prompt<T>(prompt: &str) -> ToolsResult<String>
where
    T: Serialize + Default,
{
    let example = serde_json::to_string(&T::default())?;
    Ok(format!(
        "{} Return response in this Json format. This will not be read by a human.{}",
        prompt, example
    ))
}
