//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, ScholarId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidScholarId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidScholarId => "invalid_scholar_id",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const SCHOLAR_ID: FieldName = FieldName::new("scholarId");

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_scholar_id_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be 1-32 letters or digits")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidScholarId.as_str(),
    }))
}

/// Parse a scholar identifier supplied by a client.
pub(crate) fn parse_scholar_id(value: &str, field: FieldName) -> Result<ScholarId, Error> {
    if value.trim().is_empty() {
        return Err(missing_field_error(field));
    }
    ScholarId::new(value).map_err(|_| invalid_scholar_id_error(field, value))
}

/// Parse an optional scholar identifier from a request body.
pub(crate) fn require_scholar_id(value: Option<&str>, field: FieldName) -> Result<ScholarId, Error> {
    parse_scholar_id(value.unwrap_or_default(), field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::Value;

    fn detail(error: &Error, key: &str) -> Option<String> {
        error
            .details()
            .and_then(|details| details.get(key))
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn blank_identifiers_are_missing(#[case] value: Option<&str>) {
        let err = require_scholar_id(value, SCHOLAR_ID).expect_err("missing");
        assert_eq!(detail(&err, "code").as_deref(), Some("missing_field"));
        assert_eq!(detail(&err, "field").as_deref(), Some("scholarId"));
    }

    #[rstest]
    #[case("24-15062")]
    #[case("../etc")]
    #[case("2415062 2415063")]
    fn malformed_identifiers_are_reported_with_value(#[case] value: &str) {
        let err = parse_scholar_id(value, SCHOLAR_ID).expect_err("invalid");
        assert_eq!(detail(&err, "code").as_deref(), Some("invalid_scholar_id"));
        assert_eq!(detail(&err, "value").as_deref(), Some(value));
    }

    #[rstest]
    fn identifiers_are_trimmed() {
        let id = parse_scholar_id(" 25EC10001 ", SCHOLAR_ID).expect("valid");
        assert_eq!(id.as_str(), "25EC10001");
    }
}
