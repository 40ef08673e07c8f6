//! Parsing of computed CSS pixel lengths.
//!
//! `getComputedStyle` resolves every length to `"<number>px"`; mirror sizing
//! and frame offsets need those values back as numbers.

use thiserror::Error;
use winnow::combinator::opt;
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_while;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CssError {
    #[error("invalid CSS length {value:?}: {reason}")]
    InvalidLength { value: String, reason: String },
}

/// Parse a pixel length such as `"12px"`, `"-3.5px"` or `"0"`.
pub fn parse_px(value: &str) -> Result<f64, CssError> {
    let mut rest = value;
    let px = parse_length
        .parse_next(&mut rest)
        .map_err(|e| CssError::InvalidLength {
            value: value.to_string(),
            reason: e.to_string(),
        })?;
    if !rest.is_empty() {
        return Err(CssError::InvalidLength {
            value: value.to_string(),
            reason: format!("unexpected trailing input {rest:?}"),
        });
    }
    Ok(px)
}

/// Like [`parse_px`], but treats unparsable values (`""`, `"auto"`,
/// `"normal"`) as zero.
pub fn px_or_zero(value: &str) -> f64 {
    match parse_px(value) {
        Ok(px) => px,
        Err(e) => {
            log::trace!("{e}; using 0");
            0.0
        }
    }
}

/// Format a number as a CSS pixel length.
pub fn format_px(value: f64) -> String {
    format!("{value}px")
}

fn skip_space(input: &mut &str) {
    use winnow::ascii::space0;
    let _: Result<&str, winnow::error::ErrMode<ContextError>> = space0.parse_next(input);
}

fn parse_length(input: &mut &str) -> ModalResult<f64> {
    skip_space(input);
    let value = parse_number(input)?;
    let _ = opt("px").parse_next(input)?;
    skip_space(input);
    Ok(value)
}

fn parse_number(input: &mut &str) -> ModalResult<f64> {
    let start = *input;
    if input.starts_with('-') || input.starts_with('+') {
        *input = &input[1..];
    }
    let _ = take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    if input.starts_with('.') {
        *input = &input[1..];
        let _ =
            take_while::<_, _, ContextError>(0.., |c: char| c.is_ascii_digit()).parse_next(input);
    }
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f64>()
        .map_err(|_| winnow::error::ErrMode::Backtrack(ContextError::new()))
}
