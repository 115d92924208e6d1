// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached `system.get_sysinfo` object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::types::{DeviceType, RelayState};

/// The device's self-reported system information.
///
/// Kept as the raw JSON object, since the set of keys varies by model and
/// firmware. Typed accessors read the keys the library relies on and report
/// a [`ParseError`] when one is absent or has the wrong type.
///
/// # Examples
///
/// ```
/// use kasa_lib::state::SysInfo;
/// use serde_json::json;
///
/// let info = SysInfo::from_value(json!({
///     "alias": "Kitchen",
///     "relay_state": 1,
///     "led_off": 0,
///     "on_time": 120,
/// })).unwrap();
///
/// assert_eq!(info.alias().unwrap(), "Kitchen");
/// assert!(info.relay_state().unwrap().is_on());
/// assert!(!info.is_dimmable());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SysInfo(Map<String, Value>);

impl SysInfo {
    /// Wraps an already-extracted sysinfo object.
    #[must_use]
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Builds a sysinfo from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedFormat`] if the value is not an object.
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ParseError::UnexpectedFormat(format!(
                "sysinfo is not an object: {other}"
            ))),
        }
    }

    /// Returns the raw value of a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    // ========== Capabilities ==========

    /// Returns `true` if the device reports a brightness level.
    #[must_use]
    pub fn is_dimmable(&self) -> bool {
        self.contains_key("brightness")
    }

    /// Returns `true` if the `feature` string advertises an energy meter.
    #[must_use]
    pub fn has_emeter(&self) -> bool {
        self.get("feature")
            .and_then(Value::as_str)
            .is_some_and(|features| features.split(':').any(|f| f == "ENE"))
    }

    /// Returns the device class inferred from this information.
    #[must_use]
    pub fn device_type(&self) -> DeviceType {
        DeviceType::detect(&self.0)
    }

    // ========== Plug state ==========

    /// Returns the relay state.
    ///
    /// # Errors
    ///
    /// Returns error if `relay_state` is missing or not a flag.
    pub fn relay_state(&self) -> Result<RelayState, ParseError> {
        self.flag("relay_state").map(RelayState::from)
    }

    /// Returns the raw "LED off" flag.
    ///
    /// # Errors
    ///
    /// Returns error if `led_off` is missing or not a flag.
    pub fn led_off(&self) -> Result<bool, ParseError> {
        self.flag("led_off")
    }

    /// Returns the seconds elapsed since the relay was switched on.
    ///
    /// # Errors
    ///
    /// Returns error if `on_time` is missing or not a non-negative integer.
    pub fn on_time(&self) -> Result<u64, ParseError> {
        self.get_required("on_time")?
            .as_u64()
            .ok_or_else(|| invalid("on_time", "expected a non-negative integer"))
    }

    /// Returns the reported brightness.
    ///
    /// # Errors
    ///
    /// Returns error if `brightness` is missing or outside 0-100.
    pub fn brightness(&self) -> Result<u8, ParseError> {
        self.get_required("brightness")?
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .filter(|v| *v <= 100)
            .ok_or_else(|| invalid("brightness", "expected an integer in 0-100"))
    }

    // ========== Identity ==========

    /// Returns the user-assigned name.
    ///
    /// # Errors
    ///
    /// Returns error if `alias` is missing or not a string.
    pub fn alias(&self) -> Result<&str, ParseError> {
        self.string("alias")
    }

    /// Returns the model string, such as `HS220(US)`.
    ///
    /// # Errors
    ///
    /// Returns error if `model` is missing or not a string.
    pub fn model(&self) -> Result<&str, ParseError> {
        self.string("model")
    }

    /// Returns the MAC address. Some models report it as `mic_mac`.
    ///
    /// # Errors
    ///
    /// Returns error if neither `mac` nor `mic_mac` is a string.
    pub fn mac(&self) -> Result<&str, ParseError> {
        self.string("mac").or_else(|_| self.string("mic_mac"))
    }

    /// Returns the device identifier.
    ///
    /// # Errors
    ///
    /// Returns error if `deviceId` is missing or not a string.
    pub fn device_id(&self) -> Result<&str, ParseError> {
        self.string("deviceId")
    }

    /// Returns the hardware version.
    ///
    /// # Errors
    ///
    /// Returns error if `hw_ver` is missing or not a string.
    pub fn hw_version(&self) -> Result<&str, ParseError> {
        self.string("hw_ver")
    }

    /// Returns the firmware version.
    ///
    /// # Errors
    ///
    /// Returns error if `sw_ver` is missing or not a string.
    pub fn sw_version(&self) -> Result<&str, ParseError> {
        self.string("sw_ver")
    }

    /// Returns the WiFi signal strength in dBm.
    ///
    /// # Errors
    ///
    /// Returns error if `rssi` is missing or not an integer.
    pub fn rssi(&self) -> Result<i64, ParseError> {
        self.get_required("rssi")?
            .as_i64()
            .ok_or_else(|| invalid("rssi", "expected an integer"))
    }

    // ========== Helpers ==========

    fn get_required(&self, key: &str) -> Result<&Value, ParseError> {
        self.get(key)
            .ok_or_else(|| ParseError::MissingField(key.to_string()))
    }

    fn string(&self, key: &str) -> Result<&str, ParseError> {
        self.get_required(key)?
            .as_str()
            .ok_or_else(|| invalid(key, "expected a string"))
    }

    /// Reads a 0/1 (or boolean) flag.
    fn flag(&self, key: &str) -> Result<bool, ParseError> {
        match self.get_required(key)? {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => n
                .as_i64()
                .map(|v| v != 0)
                .ok_or_else(|| invalid(key, "expected 0 or 1")),
            _ => Err(invalid(key, "expected 0 or 1")),
        }
    }
}

impl From<Map<String, Value>> for SysInfo {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn invalid(field: &str, message: &str) -> ParseError {
    ParseError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}
