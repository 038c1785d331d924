//! Filename analysis: splitting a name into base, duplicate marker, and
//! extension, and rendering it back.
//!
//! The grammar is deliberately small. A name is `base [ "(" digits ")" ]
//! [ "." extension ]` where the extension is everything after the *last*
//! dot and the marker is a trailing parenthesized non-negative integer
//! sitting immediately before the extension delimiter. Parsing never
//! fails; anything that does not match the marker grammar stays part of
//! the base. `parse` and `render` round-trip: for every input `x`,
//! `FileName::parse(x).render() == x`.

use serde::{Deserialize, Serialize};

/// A filename decomposed into its structural parts.
///
/// `photo(2).png` parses to base `photo`, marker `2`, extension `png`.
/// `archive.tar.gz` parses to base `archive.tar`, no marker, extension
/// `gz`. A name without any dot has `extension == None`; a name ending
/// in a bare dot has `extension == Some("")` so the dot survives
/// re-rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileName {
    /// Everything before the marker and extension. May contain dots and
    /// parentheses that did not match the marker grammar.
    pub base: String,
    /// The duplicate marker value, when the name carries one.
    pub marker: Option<i64>,
    /// The extension after the last dot, without the dot itself.
    pub extension: Option<String>,
}

impl FileName {
    /// Parse a filename into base, marker, and extension.
    pub fn parse(raw: &str) -> Self {
        let (stem, extension) = match raw.rfind('.') {
            Some(dot) => (&raw[..dot], Some(raw[dot + 1..].to_string())),
            None => (raw, None),
        };
        let (base, marker) = split_marker(stem);
        Self {
            base,
            marker,
            extension,
        }
    }

    /// Render the filename back into a string.
    pub fn render(&self) -> String {
        let mut out = self.base.clone();
        if let Some(marker) = self.marker {
            out.push('(');
            out.push_str(&marker.to_string());
            out.push(')');
        }
        if let Some(extension) = &self.extension {
            out.push('.');
            out.push_str(extension);
        }
        out
    }

    /// The same name with the marker removed.
    pub fn without_marker(&self) -> Self {
        Self {
            base: self.base.clone(),
            marker: None,
            extension: self.extension.clone(),
        }
    }

    /// The same name carrying the given version as its marker.
    ///
    /// Version 0 is the original and renders unmarked.
    pub fn versioned(&self, version: i64) -> Self {
        Self {
            base: self.base.clone(),
            marker: if version > 0 { Some(version) } else { None },
            extension: self.extension.clone(),
        }
    }
}

/// Split a trailing `(digits)` marker off a stem.
///
/// The digits must be non-empty ASCII digits with no leading zero
/// (except `0` itself) and must fit in an `i64`; otherwise the
/// parentheses are treated as literal base text.
fn split_marker(stem: &str) -> (String, Option<i64>) {
    if !stem.ends_with(')') {
        return (stem.to_string(), None);
    }
    let Some(open) = stem.rfind('(') else {
        return (stem.to_string(), None);
    };
    let digits = &stem[open + 1..stem.len() - 1];
    if !is_marker_digits(digits) {
        return (stem.to_string(), None);
    }
    match digits.parse::<i64>() {
        Ok(value) => (stem[..open].to_string(), Some(value)),
        Err(_) => (stem.to_string(), None),
    }
}

fn is_marker_digits(digits: &str) -> bool {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    digits == "0" || !digits.starts_with('0')
}
