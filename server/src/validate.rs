//! Checks applied to request fields before they reach storage. Each check
//! names the offending field in the returned `INVALID_ARGUMENT` status.

use crate::{money::AMOUNT_SCALE, protobuf::into::ProtoInto};
use crowdfund_api::crowdfund::Amount;
use crowdfund_status::{
    well_known::{invalid_field, missing_required_field, unsupported_update_path},
    Status,
};
use prost_types::FieldMask;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

/// Largest amount a NUMERIC(15,2) column holds, plus one cent.
const AMOUNT_LIMIT: i64 = 10_000_000_000_000;

/// Rewraps `status` so that it blames `field_name`.
pub fn field_error(field_name: &str, status: Status) -> Status {
    invalid_field(field_name, status.message())
}

/// Text that must contain something other than whitespace. Returned trimmed.
pub fn required_text(field_name: &str, value: String) -> Result<String, Status> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(missing_required_field(field_name));
    }
    Ok(trimmed.to_string())
}

/// Like [`required_text`], but returns the text untouched.
pub fn non_blank_text(field_name: &str, value: String) -> Result<String, Status> {
    if value.trim().is_empty() {
        return Err(missing_required_field(field_name));
    }
    Ok(value)
}

/// Optional free text. Blank text is treated as absent.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

pub fn optional_url(field_name: &str, value: Option<String>) -> Result<Option<String>, Status> {
    match optional_text(value) {
        Some(url) if !validator::validate_url(url.as_str()) => {
            Err(invalid_field(field_name, "not a well-formed url"))
        }
        url => Ok(url),
    }
}

pub fn optional_email(field_name: &str, value: Option<String>) -> Result<Option<String>, Status> {
    match optional_text(value) {
        Some(email) if !validator::validate_email(email.as_str()) => {
            Err(invalid_field(field_name, "not a well-formed email address"))
        }
        email => Ok(email),
    }
}

pub fn uuid(field_name: &str, value: String) -> Result<Uuid, Status> {
    if value.is_empty() {
        return Err(missing_required_field(field_name));
    }
    value.proto_into_field(field_name)
}

/// Converts `amount` and rounds it to cents. The rounded amount must be
/// positive and fit the store.
pub fn positive_amount(field_name: &str, amount: Option<Amount>) -> Result<Decimal, Status> {
    let amount = amount.ok_or_else(|| missing_required_field(field_name))?;
    let value: Decimal = amount.proto_into_field(field_name)?;
    let value = value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if value <= Decimal::ZERO {
        return Err(invalid_field(field_name, "must be positive"));
    }
    if value >= Decimal::from(AMOUNT_LIMIT) {
        return Err(invalid_field(field_name, "too large"));
    }
    Ok(value)
}

/// Paths of an update mask, checked against the paths an update supports.
#[derive(Debug, Default)]
pub struct UpdatePaths(Vec<String>);

impl UpdatePaths {
    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|p| p == path)
    }
}

/// A missing mask updates nothing.
pub fn update_paths(
    update_mask: Option<FieldMask>,
    supported: &[&str],
) -> Result<UpdatePaths, Status> {
    let paths = update_mask.map(|mask| mask.paths).unwrap_or_default();
    if let Some(path) = paths.iter().find(|p| !supported.contains(&p.as_str())) {
        return Err(unsupported_update_path(path));
    }
    Ok(UpdatePaths(paths))
}
