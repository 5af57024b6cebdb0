//! Order number decoding.
//!
//! Order numbers are the only place the admin server records an order's
//! creation instant: the wire format is `ORD-YYMMDDhhmmss` (two-digit year
//! offset from 2000, then fixed-width month/day/hour/minute/second). This
//! module is the single point of truth for that format — no other module
//! may slice the string directly.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Fixed prefix every order number carries.
pub const ORDER_NUMBER_PREFIX: &str = "ORD-";

/// Number of digits after the prefix.
const DIGIT_RUN_LEN: usize = 12;

/// Century base for the two-digit year. Behavior after 2099 is undefined by
/// the wire format; the server would have to change the encoding first.
const CENTURY_BASE: i32 = 2000;

/// Fallback label shown when an order number cannot be decoded.
pub const INVALID_DATE_LABEL: &str = "Invalid date";

/// Why an order number failed to decode.
///
/// Decoding failures are display-only degradation: an order with a bad
/// number still loads, transitions, and counts — it just renders
/// [`INVALID_DATE_LABEL`] and sorts after decodable orders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("order number does not start with {ORDER_NUMBER_PREFIX}")]
    MissingPrefix,
    #[error("expected {DIGIT_RUN_LEN} digits after the prefix, got {0}")]
    WrongLength(usize),
    #[error("order number contains a non-digit character")]
    NonDigit,
    #[error("order number encodes an invalid calendar field")]
    InvalidCalendar,
}

/// Decode an order number into its creation instant (local wall-clock,
/// matching what the checkout terminal stamped into the string).
///
/// Pure and deterministic: equal inputs always decode to equal instants.
pub fn decode(order_number: &str) -> Result<NaiveDateTime, DecodeError> {
    let digits = order_number
        .strip_prefix(ORDER_NUMBER_PREFIX)
        .ok_or(DecodeError::MissingPrefix)?;

    if digits.len() != DIGIT_RUN_LEN {
        return Err(DecodeError::WrongLength(digits.len()));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::NonDigit);
    }

    let field = |start: usize| -> u32 {
        // Safe: length and digit checks above guarantee two ASCII digits.
        digits[start..start + 2].parse().unwrap_or(0)
    };

    let year = CENTURY_BASE + field(0) as i32;
    let date = NaiveDate::from_ymd_opt(year, field(2), field(4))
        .ok_or(DecodeError::InvalidCalendar)?;
    date.and_hms_opt(field(6), field(8), field(10))
        .ok_or(DecodeError::InvalidCalendar)
}

/// Render an order number's creation instant for display, falling back to
/// [`INVALID_DATE_LABEL`] when the number does not decode.
pub fn display_timestamp(order_number: &str) -> String {
    match decode(order_number) {
        Ok(dt) => dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        Err(_) => INVALID_DATE_LABEL.to_string(),
    }
}
