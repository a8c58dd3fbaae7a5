//! Splits response text into the incremental units a stream delivers.
//!
//! A maximal run of word characters is one unit, a maximal run of
//! whitespace is one unit, and every other character stands alone.
//! Joining the units always reproduces the input exactly.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Space,
    Other,
}

fn classify(c: char) -> CharClass {
    if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else if c.is_whitespace() {
        CharClass::Space
    } else {
        CharClass::Other
    }
}

/// Segment `text` into stream units
pub fn segment(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut start = 0usize;
    let mut current: Option<CharClass> = None;

    for (idx, c) in text.char_indices() {
        let class = classify(c);
        match current {
            Some(prev) if prev == class && class != CharClass::Other => {}
            Some(_) => {
                tokens.push(text[start..idx].to_string());
                start = idx;
            }
            None => {}
        }
        current = Some(class);
    }

    if start < text.len() {
        tokens.push(text[start..].to_string());
    }

    tokens
}
