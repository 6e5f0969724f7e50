use art_error::{error_context, format_context};
use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid number{}: {source}", format_context(.context))]
    Number { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },

    #[error("Out of range{}: {message}", format_context(.context))]
    Range { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

error_context!(
    ParseError, ParseErrorExt,
    variants: [Number, Range],
    sources: [Number(std::num::ParseIntError)]
);

fn percent(raw: &str) -> Result<u8, ParseError> {
    let value: u8 = raw.parse()?;
    if value > 100 {
        return Err(ParseError::Range { message: raw.to_owned().into(), context: None });
    }
    Ok(value)
}

#[test]
fn source_errors_convert_without_context() {
    let err = percent("abc").unwrap_err();
    assert!(matches!(err, ParseError::Number { context: None, .. }));
    assert!(err.to_string().starts_with("Invalid number: "));
}

#[test]
fn context_wraps_source_results() {
    let err = "x".parse::<u8>().context("volume").unwrap_err();
    assert!(err.to_string().starts_with("Invalid number (volume): "));
}

#[test]
fn context_replaces_on_own_results() {
    let err = percent("140").context("first").context("volume").unwrap_err();
    assert_eq!(err.to_string(), "Out of range (volume): 140");
}

#[test]
fn ok_values_pass_through() {
    assert_eq!(percent("42").context("volume").unwrap(), 42);
}
