use serde_json::Value;
use thiserror::Error;

use super::directive::{Directive, NO_MOOD};
use crate::patterns::PatternKind;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("no JSON object in response")]
    NoObject,

    #[error("malformed JSON object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response object has no 'pattern' field")]
    MissingPattern,
}

/// Slice from the first `{` to the last `}`, i.e. the outermost object the
/// model wrapped in whatever prose it felt like adding.
pub fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Turns a raw model reply into a directive.
///
/// Missing `params` become an empty map, missing `mood` the placeholder,
/// missing `text` the empty string. Unknown pattern names draw `wave`.
pub fn parse_directive(text: &str) -> Result<Directive, ParseError> {
    let object = extract_object(text).ok_or(ParseError::NoObject)?;
    let value: Value = serde_json::from_str(object)?;

    let pattern = value
        .get("pattern")
        .and_then(Value::as_str)
        .ok_or(ParseError::MissingPattern)?;
    let kind = PatternKind::from_name_lossy(pattern);

    let params = value
        .get("params")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let mood = value
        .get("mood")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(NO_MOOD);
    let spoken = value.get("text").and_then(Value::as_str).unwrap_or("").trim();

    Ok(Directive::new(kind, params, mood).with_text(spoken))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_ignores_surrounding_prose() {
        assert_eq!(extract_object("ok {\"a\":{\"b\":1}} bye"), Some("{\"a\":{\"b\":1}}"));
        assert_eq!(extract_object("no braces here"), None);
        assert_eq!(extract_object("} backwards {"), None);
    }

    #[test]
    fn test_missing_fields_default() {
        let directive = parse_directive(r#"{"pattern":"rain"}"#).unwrap();
        assert_eq!(directive.pattern, PatternKind::Rain);
        assert!(directive.params.is_empty());
        assert_eq!(directive.mood, NO_MOOD);
        assert_eq!(directive.text, "");
    }

    #[test]
    fn test_pattern_must_be_present() {
        let err = parse_directive(r#"{"mood":"lost"}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingPattern));
        let err = parse_directive(r#"{"pattern": 7}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingPattern));
    }

    #[test]
    fn test_broken_json_is_an_error() {
        let err = parse_directive(r#"{"pattern": "wave", }"#).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_unknown_pattern_draws_wave() {
        let directive = parse_directive(r#"{"pattern":"tornado","mood":"wild"}"#).unwrap();
        assert_eq!(directive.pattern, PatternKind::Wave);
        assert_eq!(directive.mood, "wild");
    }
}
