//! Output path templates.
//!
//! Literal text with `{{.Year}}` and `{{.Day}}` markers. Whitespace inside the
//! braces is allowed; any other marker is an error.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template: unclosed marker starting at byte {0}")]
    Unclosed(usize),
    #[error("template: unknown marker \"{{{{{0}}}}}\" (expected {{{{.Year}}}} or {{{{.Day}}}})")]
    UnknownMarker(String),
}

/// Expand `template` with the given year and day.
pub fn render(template: &str, year: u32, day: u32) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or(TemplateError::Unclosed(offset + start))?;

        match after[..end].trim() {
            ".Year" => out.push_str(&year.to_string()),
            ".Day" => out.push_str(&day.to_string()),
            other => return Err(TemplateError::UnknownMarker(other.to_string())),
        }

        let consumed = start + 2 + end + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }

    out.push_str(rest);
    Ok(out)
}
