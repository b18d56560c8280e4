//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `invalid_request` error whose `details` name the
//! offending wire field and a stable code.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    AccountValidationError, CgpaRequestId, CgpaRequestValidationError, Decision, Error,
    RequestStatus,
};

pub(crate) fn missing_field_error(field: &str) -> Error {
    Error::invalid_request(format!("missing required field: {field}"))
        .with_details(json!({ "field": field, "code": "missing_field" }))
}

pub(crate) fn require<T>(value: Option<T>, field: &str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

fn with_value(error: &CgpaRequestValidationError, value: &str) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
        "value": value,
    }))
}

pub(crate) fn account_error(error: &AccountValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

pub(crate) fn parse_request_id(raw: &str) -> Result<CgpaRequestId, Error> {
    CgpaRequestId::new(raw).map_err(|error| with_value(&error, raw))
}

pub(crate) fn parse_decision(raw: &str) -> Result<Decision, Error> {
    Decision::from_str(raw).map_err(|error| with_value(&error, raw))
}

pub(crate) fn parse_status(raw: Option<&str>) -> Result<Option<RequestStatus>, Error> {
    raw.map(|value| RequestStatus::from_str(value).map_err(|error| with_value(&error, value)))
        .transpose()
}

/// A cgpa figure sent either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CgpaInput {
    Number(f64),
    Text(String),
}

impl CgpaInput {
    /// Numeric value, or an `invalid_number` error for unparsable text.
    ///
    /// Range checks are left to the domain.
    pub(crate) fn to_f64(&self, field: &str) -> Result<f64, Error> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(raw) => raw.trim().parse::<f64>().map_err(|_| {
                Error::invalid_request(format!("{field} must be a number")).with_details(json!({
                    "field": field,
                    "code": "invalid_number",
                    "value": raw,
                }))
            }),
        }
    }
}
