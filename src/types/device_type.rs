// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device class tag.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Class of a Kasa device, as inferred from its system information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// Smart plug or switch with a single relay.
    Plug,
    /// Smart bulb.
    Bulb,
    /// Power strip with child outlets.
    Strip,
    /// Wall dimmer.
    Dimmer,
    /// Unrecognized device.
    #[default]
    Unknown,
}

impl DeviceType {
    /// Infers the device class from the `type`/`mic_type`, `dev_name` and
    /// `children` fields of a sysinfo object.
    ///
    /// # Examples
    ///
    /// ```
    /// use kasa_lib::types::DeviceType;
    ///
    /// let plug = serde_json::json!({"type": "IOT.SMARTPLUGSWITCH"});
    /// assert_eq!(DeviceType::detect(plug.as_object().unwrap()), DeviceType::Plug);
    /// ```
    #[must_use]
    pub fn detect(sys_info: &serde_json::Map<String, serde_json::Value>) -> Self {
        let kind = sys_info
            .get("type")
            .or_else(|| sys_info.get("mic_type"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_lowercase)
            .unwrap_or_default();

        let dev_name = sys_info
            .get("dev_name")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();

        if dev_name.contains("Dimmer") {
            Self::Dimmer
        } else if kind.contains("smartplug") {
            if sys_info.contains_key("children") {
                Self::Strip
            } else {
                Self::Plug
            }
        } else if kind.contains("smartbulb") {
            Self::Bulb
        } else {
            Self::Unknown
        }
    }

    /// Returns the lowercase name of the device class.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plug => "plug",
            Self::Bulb => "bulb",
            Self::Strip => "strip",
            Self::Dimmer => "dimmer",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
