//! Field annotation parsing and naming defaults.

use crate::error::{EormError, Result};

/// Parsed field annotation.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct FieldTag {
    pub(crate) column: Option<String>,
    pub(crate) primary_key: bool,
    pub(crate) auto_increment: bool,
    pub(crate) ignored: bool,
}

/// Parses a comma-separated annotation such as `auto_increment,primary_key`.
pub(crate) fn parse_tag(field: &str, tag: &str) -> Result<FieldTag> {
    let mut parsed = FieldTag::default();
    for token in tag.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token {
            "auto_increment" => parsed.auto_increment = true,
            "primary_key" => parsed.primary_key = true,
            "-" => parsed.ignored = true,
            _ => match token.split_once('=') {
                Some((key, name)) if key.trim() == "column" && !name.trim().is_empty() => {
                    parsed.column = Some(name.trim().to_string());
                }
                _ => {
                    return Err(EormError::InvalidTag {
                        field: field.to_string(),
                        token: token.to_string(),
                    });
                }
            },
        }
    }
    Ok(parsed)
}

/// Converts a name to snake case: `TestModel` -> `test_model`.
///
/// Each uppercase character after the first position gets an underscore
/// prefix, then everything is lowercased.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
