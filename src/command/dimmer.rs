// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimmer commands for dimmable plugs and wall switches.

use serde_json::{Value, json};

use crate::command::{Command, DIMMER};
use crate::types::Brightness;

/// Command to control the dimmer module.
///
/// # Examples
///
/// ```
/// use kasa_lib::command::{Command, DimmerCommand};
/// use kasa_lib::types::Brightness;
///
/// let cmd = DimmerCommand::SetBrightness(Brightness::new(40).unwrap());
/// assert_eq!(cmd.namespace(), "smartlife.iot.dimmer");
/// assert_eq!(
///     cmd.to_json(),
///     r#"{"smartlife.iot.dimmer":{"set_brightness":{"brightness":40}}}"#
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimmerCommand {
    /// Set the brightness level.
    SetBrightness(Brightness),
}

impl Command for DimmerCommand {
    fn namespace(&self) -> String {
        DIMMER.to_string()
    }

    fn method(&self) -> String {
        match self {
            Self::SetBrightness(_) => "set_brightness".to_string(),
        }
    }

    fn params(&self) -> Value {
        match self {
            Self::SetBrightness(level) => json!({ "brightness": level.value() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_brightness_params() {
        let cmd = DimmerCommand::SetBrightness(Brightness::MAX);
        assert_eq!(cmd.method(), "set_brightness");
        assert_eq!(cmd.params(), json!({"brightness": 100}));
    }
}
