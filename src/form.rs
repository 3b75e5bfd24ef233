//! Form field state and validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::FormConfig;
use crate::errors::ValidationError;

/// Inclusive seat-count bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatBounds {
    pub min: u32,
    pub max: u32,
}

impl Default for SeatBounds {
    fn default() -> Self {
        Self { min: 1, max: 999 }
    }
}

impl From<&FormConfig> for SeatBounds {
    fn from(config: &FormConfig) -> Self {
        Self {
            min: config.min_count,
            max: config.max_count,
        }
    }
}

/// Editable form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormField {
    Name,
    #[serde(rename = "ver")]
    Version,
    Count,
}

impl FormField {
    /// Field identifier, shared with the query key.
    pub fn id(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Version => "ver",
            FormField::Count => "count",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(FormField::Name),
            "ver" | "version" => Ok(FormField::Version),
            "count" | "seats" => Ok(FormField::Count),
            other => Err(format!("unknown form field '{other}'")),
        }
    }
}

/// Snapshot of the three user-supplied values, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub name: String,
    pub version: String,
    pub seat_count: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: "25.2".to_string(),
            seat_count: "1".to_string(),
        }
    }
}

impl From<&FormConfig> for FormState {
    fn from(config: &FormConfig) -> Self {
        Self {
            name: String::new(),
            version: config.default_version.clone(),
            seat_count: config.default_count.clone(),
        }
    }
}

impl FormState {
    /// Returns a new snapshot with one field replaced. `self` is untouched.
    pub fn with_field(&self, field: FormField, value: impl Into<String>) -> Self {
        let value = value.into();
        let mut next = self.clone();
        match field {
            FormField::Name => next.name = value,
            FormField::Version => next.version = value,
            FormField::Count => next.seat_count = value,
        }
        next
    }

    /// Current value of a field.
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Version => &self.version,
            FormField::Count => &self.seat_count,
        }
    }

    /// Check the snapshot against the submission contract.
    ///
    /// Fields are checked in display order and the first failure wins.
    /// Values are not trimmed: a single space is a valid name.
    pub fn validate(&self, bounds: SeatBounds) -> Result<u32, ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.version.is_empty() {
            return Err(ValidationError::EmptyVersion);
        }
        parse_seat_count(&self.seat_count, bounds)
    }
}

/// Parse a seat count as an integer within `bounds`.
///
/// Only ASCII digits with an optional leading `-` are accepted; a sign of
/// `+`, whitespace, decimals and exponents are all rejected.
pub fn parse_seat_count(raw: &str, bounds: SeatBounds) -> Result<u32, ValidationError> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidCount(raw.to_string()));
    }

    let value: i64 = raw
        .parse()
        .map_err(|_| ValidationError::InvalidCount(raw.to_string()))?;

    if value < i64::from(bounds.min) || value > i64::from(bounds.max) {
        return Err(ValidationError::CountOutOfRange {
            value,
            min: bounds.min,
            max: bounds.max,
        });
    }

    // In range of two u32 bounds, so this cannot truncate.
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(name: &str, version: &str, count: &str) -> FormState {
        FormState {
            name: name.to_string(),
            version: version.to_string(),
            seat_count: count.to_string(),
        }
    }

    #[test]
    fn defaults_match_initial_form() {
        let state = FormState::default();
        assert_eq!(state.name, "");
        assert_eq!(state.version, "25.2");
        assert_eq!(state.seat_count, "1");
    }

    #[test]
    fn with_field_leaves_original_untouched() {
        let original = FormState::default();
        let next = original.with_field(FormField::Name, "alice");

        assert_eq!(original.name, "");
        assert_eq!(next.name, "alice");
        assert_eq!(next.version, original.version);
        assert_eq!(next.get(FormField::Name), "alice");
    }

    #[test]
    fn valid_snapshot_passes() {
        let state = filled("alice", "25.2", "5");
        assert_eq!(state.validate(SeatBounds::default()), Ok(5));
    }

    #[test]
    fn empty_fields_are_reported_in_order() {
        let bounds = SeatBounds::default();
        assert_eq!(
            filled("", "", "0").validate(bounds),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            filled("bob", "", "1").validate(bounds),
            Err(ValidationError::EmptyVersion)
        );
    }

    #[test]
    fn count_bounds_are_inclusive() {
        let bounds = SeatBounds::default();
        assert_eq!(parse_seat_count("1", bounds), Ok(1));
        assert_eq!(parse_seat_count("999", bounds), Ok(999));
        assert!(matches!(
            parse_seat_count("0", bounds),
            Err(ValidationError::CountOutOfRange { value: 0, .. })
        ));
        assert!(matches!(
            parse_seat_count("1000", bounds),
            Err(ValidationError::CountOutOfRange { value: 1000, .. })
        ));
        assert!(matches!(
            parse_seat_count("-3", bounds),
            Err(ValidationError::CountOutOfRange { .. })
        ));
    }

    #[test]
    fn non_integer_counts_are_rejected() {
        let bounds = SeatBounds::default();
        for raw in ["", "abc", "2.5", "1e3", " 5", "+5", "-", "5 "] {
            assert_eq!(
                parse_seat_count(raw, bounds),
                Err(ValidationError::InvalidCount(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn field_names_parse() {
        assert_eq!("ver".parse::<FormField>(), Ok(FormField::Version));
        assert_eq!("count".parse::<FormField>(), Ok(FormField::Count));
        assert!("email".parse::<FormField>().is_err());
    }
}
