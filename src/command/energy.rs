// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Energy meter commands.
//!
//! Plugs expose their meter under the `emeter` namespace; other device
//! classes use a different one, so the namespace travels with the command.

use crate::command::{Command, EMETER};

/// Command to query or reset the energy meter.
///
/// # Examples
///
/// ```
/// use kasa_lib::command::{Command, EnergyCommand};
///
/// let cmd = EnergyCommand::realtime("emeter");
/// assert_eq!(cmd.to_json(), r#"{"emeter":{"get_realtime":{}}}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyCommand {
    /// Query current readings.
    GetRealtime {
        /// Namespace of the meter module.
        namespace: &'static str,
    },
    /// Erase the accumulated statistics.
    EraseStats {
        /// Namespace of the meter module.
        namespace: &'static str,
    },
}

impl EnergyCommand {
    /// Creates a realtime query against the given meter namespace.
    #[must_use]
    pub const fn realtime(namespace: &'static str) -> Self {
        Self::GetRealtime { namespace }
    }

    /// Creates a statistics reset against the given meter namespace.
    #[must_use]
    pub const fn erase_stats(namespace: &'static str) -> Self {
        Self::EraseStats { namespace }
    }
}

impl Default for EnergyCommand {
    fn default() -> Self {
        Self::realtime(EMETER)
    }
}

impl Command for EnergyCommand {
    fn namespace(&self) -> String {
        match self {
            Self::GetRealtime { namespace } | Self::EraseStats { namespace } => {
                (*namespace).to_string()
            }
        }
    }

    fn method(&self) -> String {
        match self {
            Self::GetRealtime { .. } => "get_realtime".to_string(),
            Self::EraseStats { .. } => "erase_emeter_stat".to_string(),
        }
    }
}
