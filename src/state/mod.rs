// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached device state.
//!
//! [`SysInfo`] wraps the `system.get_sysinfo` object a device reports about
//! itself. [`DeviceState`] is the snapshot a [`Device`](crate::Device) keeps
//! after each update: sysinfo plus, for metering plugs, the latest energy
//! reading.

mod device_state;
mod sys_info;

pub use device_state::DeviceState;
pub use sys_info::SysInfo;
