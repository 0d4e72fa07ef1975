//! Parsing of raw request-supplied filter values.
//!
//! The request surface delivers term identifiers as a single string,
//! optionally delimited with `+` (an OR group, e.g. `1+2+3`). A `,`
//! delimiter is also accepted and treated identically: AND across a single
//! term column can never match more than one value, so it degrades to OR.

use crate::domain::TermId;

/// Splits a raw filter argument into term identifiers.
///
/// Values are deduplicated, preserving first-occurrence order. Both `+` and
/// `,` act as delimiters and produce an OR group.
///
/// # Errors
///
/// Returns [`ArgumentError::Empty`] when the input contains no values and
/// [`ArgumentError::InvalidValue`] when any token is not a non-negative
/// integer. Malformed input is rejected outright rather than partially
/// applied.
pub fn parse_term_values(raw: &str) -> Result<Vec<TermId>, ArgumentError> {
    if raw.trim().is_empty() {
        return Err(ArgumentError::Empty);
    }

    let mut values = Vec::new();
    for token in raw.split(['+', ',']) {
        let token = token.trim();
        let id: TermId = token
            .parse()
            .map_err(|_| ArgumentError::InvalidValue(token.to_string()))?;
        if !values.contains(&id) {
            values.push(id);
        }
    }

    Ok(values)
}

/// Errors that can occur when parsing raw filter values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ArgumentError {
    /// The raw argument contained no values at all.
    #[error("empty filter argument")]
    Empty,
    /// A delimited token was not a valid term identifier.
    #[error("invalid term value '{0}'")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn tids(raw: &[u64]) -> Vec<TermId> {
        raw.iter().copied().map(TermId::new).collect()
    }

    #[test_case("7", &[7]; "single value")]
    #[test_case("1+2+3", &[1, 2, 3]; "plus delimited")]
    #[test_case("1,2,3", &[1, 2, 3]; "comma delimited treated as or")]
    #[test_case("3+1,2", &[3, 1, 2]; "mixed delimiters")]
    #[test_case(" 4 + 5 ", &[4, 5]; "whitespace tolerated")]
    #[test_case("2+2+2", &[2]; "duplicates collapse")]
    fn parses_delimited_values(raw: &str, expected: &[u64]) {
        assert_eq!(parse_term_values(raw).unwrap(), tids(expected));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(parse_term_values("").unwrap_err(), ArgumentError::Empty);
        assert_eq!(parse_term_values("   ").unwrap_err(), ArgumentError::Empty);
    }

    #[test_case("apple"; "non numeric")]
    #[test_case("1+"; "trailing delimiter")]
    #[test_case("1++2"; "empty token")]
    #[test_case("-1"; "negative sentinel")]
    fn malformed_input_is_rejected(raw: &str) {
        assert!(matches!(
            parse_term_values(raw),
            Err(ArgumentError::InvalidValue(_))
        ));
    }
}
