// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot of a device taken by one update.

use chrono::{DateTime, Local};

use crate::response::EmeterStatus;

use super::SysInfo;

/// Everything learned about a device during one update.
///
/// A new snapshot replaces the previous one wholesale; nothing is merged.
///
/// # Examples
///
/// ```
/// use kasa_lib::state::{DeviceState, SysInfo};
///
/// let state = DeviceState::new(SysInfo::default(), None, chrono::Local::now());
/// assert!(state.emeter().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    sys_info: SysInfo,
    emeter: Option<EmeterStatus>,
    updated_at: DateTime<Local>,
}

impl DeviceState {
    /// Creates a snapshot.
    #[must_use]
    pub fn new(
        sys_info: SysInfo,
        emeter: Option<EmeterStatus>,
        updated_at: DateTime<Local>,
    ) -> Self {
        Self {
            sys_info,
            emeter,
            updated_at,
        }
    }

    /// Returns the cached system information.
    #[must_use]
    pub fn sys_info(&self) -> &SysInfo {
        &self.sys_info
    }

    /// Returns the realtime meter reading, for devices with a meter.
    #[must_use]
    pub fn emeter(&self) -> Option<&EmeterStatus> {
        self.emeter.as_ref()
    }

    /// Returns when the snapshot was taken.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Local> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_accessors() {
        let now = Local::now();
        let info = SysInfo::from_value(json!({"alias": "Lamp"})).unwrap();
        let emeter = EmeterStatus {
            power: Some(5.0),
            ..EmeterStatus::default()
        };

        let state = DeviceState::new(info.clone(), Some(emeter.clone()), now);

        assert_eq!(state.sys_info(), &info);
        assert_eq!(state.emeter(), Some(&emeter));
        assert_eq!(state.updated_at(), now);
    }
}
