// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Energy meter response parsing.

use serde::{Deserialize, Serialize};

/// Realtime energy meter reading.
///
/// Older firmware reports floating point base units (`power` in W,
/// `voltage` in V, `current` in A, `total` in kWh), newer firmware reports
/// integer milli-units (`power_mw`, `voltage_mv`, `current_ma`,
/// `total_wh`). The accessors accept either form.
///
/// # Examples
///
/// ```
/// use kasa_lib::response::EmeterStatus;
///
/// let old: EmeterStatus = serde_json::from_str(
///     r#"{"power": 45.2, "voltage": 230.1, "current": 0.2, "total": 1.5}"#,
/// ).unwrap();
/// let new: EmeterStatus = serde_json::from_str(
///     r#"{"power_mw": 45200, "voltage_mv": 230100, "current_ma": 200, "total_wh": 1500}"#,
/// ).unwrap();
///
/// assert_eq!(old.power(), new.power());
/// assert_eq!(old.total(), new.total());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmeterStatus {
    /// Power in Watts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    /// Power in milliwatts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_mw: Option<f64>,
    /// Voltage in Volts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
    /// Voltage in millivolts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_mv: Option<f64>,
    /// Current in Amperes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    /// Current in milliamperes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_ma: Option<f64>,
    /// Total energy in kWh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    /// Total energy in Wh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_wh: Option<f64>,
}

impl EmeterStatus {
    /// Returns the current power consumption in Watts.
    #[must_use]
    pub fn power(&self) -> Option<f64> {
        self.power.or(self.power_mw.map(|mw| mw / 1000.0))
    }

    /// Returns the voltage in Volts.
    #[must_use]
    pub fn voltage(&self) -> Option<f64> {
        self.voltage.or(self.voltage_mv.map(|mv| mv / 1000.0))
    }

    /// Returns the current in Amperes.
    #[must_use]
    pub fn current(&self) -> Option<f64> {
        self.current.or(self.current_ma.map(|ma| ma / 1000.0))
    }

    /// Returns the total energy consumed in kWh.
    #[must_use]
    pub fn total(&self) -> Option<f64> {
        self.total.or(self.total_wh.map(|wh| wh / 1000.0))
    }

    /// Returns whether the load is currently drawing power.
    #[must_use]
    pub fn is_consuming(&self) -> bool {
        self.power().is_some_and(|w| w > 0.0)
    }
}
