//! Wire encoding helpers shared by query-string rendering

use std::borrow::Cow;

/// Canonical token an enumerated value is sent as on the wire
pub trait WireToken {
    fn wire_token(&self) -> &'static str;
}

/// Percent-escape a value for use as a single query-string component.
///
/// Only unreserved characters (`A-Z a-z 0-9 - _ . ~`) pass through; spaces
/// become `%20`, never `+`.
pub fn escape_data_string(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
