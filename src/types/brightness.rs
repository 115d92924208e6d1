// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type for dimmable plugs and wall switches.
//!
//! Only values from 1 to 100 can be sent to a device. A value of 0 is
//! rejected: turning the load off is done with the relay, not the dimmer.

use std::fmt;

use serde_json::Value;

use crate::error::ValueError;

/// Brightness level to set on a dimmable device, as a percentage (1-100).
///
/// # Examples
///
/// ```
/// use kasa_lib::types::Brightness;
///
/// let level = Brightness::new(75).unwrap();
/// assert_eq!(level.value(), 75);
///
/// assert_eq!(Brightness::MIN.value(), 1);
/// assert_eq!(Brightness::MAX.value(), 100);
///
/// // Zero and values above 100 are rejected
/// assert!(Brightness::new(0).is_err());
/// assert!(Brightness::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Brightness(u8);

impl Brightness {
    /// Lowest settable brightness (1%).
    pub const MIN: Self = Self(1);

    /// Full brightness (100%).
    pub const MAX: Self = Self(100);

    /// Creates a new brightness value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` unless `1 <= value <= 100`.
    pub fn new(value: i64) -> Result<Self, ValueError> {
        if !(i64::from(Self::MIN.0)..=i64::from(Self::MAX.0)).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: i64::from(Self::MIN.0),
                max: i64::from(Self::MAX.0),
                actual: value,
            });
        }
        // Range checked above
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(Self(value as u8))
    }

    /// Returns the brightness percentage.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Brightness {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl TryFrom<i32> for Brightness {
    type Error = ValueError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl TryFrom<i64> for Brightness {
    type Error = ValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Accepts untyped input, such as a value read from a CLI or a JSON payload.
///
/// Only JSON integers are accepted; floats, strings, and booleans are
/// rejected with [`ValueError::NotAnInteger`] before any range check.
impl TryFrom<&Value> for Brightness {
    type Error = ValueError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => match n.as_i64() {
                Some(v) => Self::new(v),
                // Larger than i64::MAX
                None => Err(ValueError::OutOfRange {
                    min: i64::from(Self::MIN.0),
                    max: i64::from(Self::MAX.0),
                    actual: i64::MAX,
                }),
            },
            other => Err(ValueError::NotAnInteger {
                field: "brightness",
                actual: other.to_string(),
            }),
        }
    }
}

impl TryFrom<Value> for Brightness {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}
