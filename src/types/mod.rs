// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Kasa device control.
//!
//! # Types
//!
//! - [`RelayState`] - On/Off state of the plug relay
//! - [`Brightness`] - Settable brightness level (1-100%)
//! - [`DeviceType`] - Device class inferred from system information

mod brightness;
mod device_type;
mod power;

pub use brightness::Brightness;
pub use device_type::DeviceType;
pub use power::RelayState;
