//! Mixed decimal / hex integer parsing
//!
//! Input JSON carries integers either as numbers or as strings in decimal or
//! `0x`-hex form. Everything is normalized to [`U256`] before any encoding
//! logic runs; narrowing to a fixed width is always bounds-checked, never
//! truncated.

use std::fmt;

use alloy_primitives::U256;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EncodeError;

/// Parse a decimal or `0x`-hex string into a 256-bit unsigned integer.
///
/// Only a bare run of digits (after an optional `0x`/`0X` prefix) is
/// accepted; whitespace and `_` separators are rejected rather than relying
/// on the underlying parser's leniency.
pub fn parse_u256(field: &'static str, input: &str) -> Result<U256, EncodeError> {
    let (digits, radix) = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(hex_digits) => (hex_digits, 16u32),
        None => (input, 10u32),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(EncodeError::InvalidNumber {
            field,
            value: input.to_string(),
        });
    }

    // digits are pre-validated, so the only way to fail is overflow
    U256::from_str_radix(digits, radix as u64).map_err(|_| EncodeError::OutOfRange {
        field,
        value: input.to_string(),
        bits: 256,
    })
}

/// Parse a decimal or `0x`-hex string into a u64, rejecting wider values.
pub fn parse_u64(field: &'static str, input: &str) -> Result<u64, EncodeError> {
    let value = parse_u256(field, input)?;
    u64::try_from(value).map_err(|_| EncodeError::OutOfRange {
        field,
        value: input.to_string(),
        bits: 64,
    })
}

/// A [`U256`] that deserializes from a JSON number or a decimal / `0x`-hex
/// string, and serializes back as a decimal string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Uint(pub U256);

impl From<u64> for Uint {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl fmt::Display for Uint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for Uint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Uint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct UintVisitor;

        impl<'de> de::Visitor<'de> for UintVisitor {
            type Value = Uint;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or a decimal / 0x-hex string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Uint, E> {
                Ok(Uint(U256::from(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Uint, E> {
                u64::try_from(v)
                    .map(|v| Uint(U256::from(v)))
                    .map_err(|_| E::custom(format!("negative value: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Uint, E> {
                // the type name, not a field name: the visitor has no idea
                // which field it is deserializing
                parse_u256("Uint", v).map(Uint).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(UintVisitor)
    }
}
