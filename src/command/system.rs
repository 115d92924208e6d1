// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Commands of the `system` namespace.

use std::time::Duration;

use serde_json::{Value, json};

use crate::command::{Command, SYSTEM};
use crate::types::RelayState;

/// Command in the `system` namespace.
///
/// # Examples
///
/// ```
/// use kasa_lib::command::{Command, SystemCommand};
///
/// // LED on means "off": 0
/// let cmd = SystemCommand::set_led(true);
/// assert_eq!(cmd.to_json(), r#"{"system":{"set_led_off":{"off":0}}}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemCommand {
    /// Query the system information blob.
    GetSysInfo,
    /// Switch the relay.
    SetRelayState(RelayState),
    /// Set the "LED off" (night mode) flag.
    SetLedOff(bool),
    /// Rename the device.
    SetAlias(String),
    /// Reboot the device after a delay.
    Reboot(Duration),
}

impl SystemCommand {
    /// Creates a command that turns the status LED on or off.
    ///
    /// The device stores the inverse flag, so `true` sends `off: 0`.
    #[must_use]
    pub const fn set_led(state: bool) -> Self {
        Self::SetLedOff(!state)
    }
}

impl Command for SystemCommand {
    fn namespace(&self) -> String {
        SYSTEM.to_string()
    }

    fn method(&self) -> String {
        match self {
            Self::GetSysInfo => "get_sysinfo",
            Self::SetRelayState(_) => "set_relay_state",
            Self::SetLedOff(_) => "set_led_off",
            Self::SetAlias(_) => "set_dev_alias",
            Self::Reboot(_) => "reboot",
        }
        .to_string()
    }

    fn params(&self) -> Value {
        match self {
            Self::GetSysInfo => json!({}),
            Self::SetRelayState(state) => json!({ "state": state.as_num() }),
            Self::SetLedOff(off) => json!({ "off": u8::from(*off) }),
            Self::SetAlias(alias) => json!({ "alias": alias }),
            Self::Reboot(delay) => json!({ "delay": delay.as_secs() }),
        }
    }
}
