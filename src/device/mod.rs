// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device session and device-class adapters.
//!
//! A [`Device`] owns the protocol handle and the state cached by the last
//! [`update`](Device::update). Reads never touch the network: they are
//! answered from the cache, and fail with [`Error::UpdateRequired`] until the
//! first update succeeds. Writes send one command; adapters such as
//! [`SmartPlug`] then call `update` again so later reads see the result.
//!
//! ```no_run
//! use kasa_lib::Device;
//!
//! # async fn example() -> kasa_lib::Result<()> {
//! let device = Device::tcp("192.168.1.105").build().await?;
//! println!("{} ({})", device.alias()?, device.model()?);
//! # Ok(())
//! # }
//! ```

mod plug;
mod tcp_builder;

pub use plug::{StateInformation, SmartPlug, on_since};
pub use tcp_builder::DeviceBuilder;

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::command::{Command, EMETER, EnergyCommand, RawCommand, SystemCommand};
use crate::error::{DeviceError, Error, ParseError};
use crate::protocol::{Protocol, TcpClient, TcpConfig};
use crate::response::{EmeterStatus, extract_result};
use crate::state::{DeviceState, SysInfo};
use crate::types::DeviceType;

/// A session with one Kasa device.
///
/// # Type Parameter
///
/// `P` is the transport. [`TcpClient`] talks to real devices; any other
/// [`Protocol`] implementation can stand in for one.
///
/// # Concurrency
///
/// Reads take a short lock on the cache. Network operations are serialized
/// by the transport, not by the session.
#[derive(Debug)]
pub struct Device<P: Protocol> {
    protocol: Arc<P>,
    emeter_type: &'static str,
    state: Arc<RwLock<Option<DeviceState>>>,
}

impl<P: Protocol> Device<P> {
    /// Creates a session over the given protocol. Nothing is cached yet.
    #[must_use]
    pub fn new(protocol: P) -> Self {
        Self {
            protocol: Arc::new(protocol),
            emeter_type: EMETER,
            state: Arc::new(RwLock::new(None)),
        }
    }

    /// Sets the namespace used for energy meter queries.
    #[must_use]
    pub fn with_emeter_type(mut self, namespace: &'static str) -> Self {
        self.emeter_type = namespace;
        self
    }

    /// Returns the namespace used for energy meter queries.
    #[must_use]
    pub fn emeter_type(&self) -> &'static str {
        self.emeter_type
    }

    /// Returns the underlying protocol.
    #[must_use]
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Returns `true` once an update has succeeded.
    #[must_use]
    pub fn is_updated(&self) -> bool {
        self.state.read().is_some()
    }

    /// Returns a copy of the cached snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateRequired`] before the first update.
    pub fn state(&self) -> Result<DeviceState, Error> {
        self.state.read().clone().ok_or(Error::UpdateRequired)
    }

    /// Returns a copy of the cached system information.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateRequired`] before the first update.
    pub fn sys_info(&self) -> Result<SysInfo, Error> {
        self.with_sys_info(|info| Ok(info.clone()))
    }

    /// Runs `f` against the cached system information.
    ///
    /// This is the guard every cached read goes through.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateRequired`] before the first update, or whatever
    /// `f` returns.
    pub fn with_sys_info<T>(
        &self,
        f: impl FnOnce(&SysInfo) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or(Error::UpdateRequired)?;
        f(state.sys_info())
    }

    // ========== Requests ==========

    /// Sends a command and returns its unwrapped result object.
    ///
    /// # Errors
    ///
    /// Returns error if the transport fails, the response cannot be parsed,
    /// or the device reports a non-zero `err_code`.
    pub async fn send_command<C: Command + Sync>(
        &self,
        command: &C,
    ) -> Result<Map<String, Value>, Error> {
        let response = self
            .protocol
            .send_command(command)
            .await
            .map_err(Error::Protocol)?;
        let value: Value = response.parse().map_err(Error::Parse)?;
        extract_result(command, value)
    }

    /// Calls `method` in `namespace` with `params` and returns the result.
    ///
    /// # Errors
    ///
    /// Same as [`send_command`](Self::send_command).
    pub async fn query_helper(
        &self,
        namespace: &str,
        method: &str,
        params: Value,
    ) -> Result<Map<String, Value>, Error> {
        self.send_command(&RawCommand::new(namespace, method, params))
            .await
    }

    /// Refreshes the cache from the device.
    ///
    /// Devices with an energy meter are also asked for a realtime reading.
    /// On failure the previous cache is left untouched.
    ///
    /// # Errors
    ///
    /// Returns error if any query fails.
    pub async fn update(&self) -> Result<(), Error> {
        let sys_info = SysInfo::new(self.send_command(&SystemCommand::GetSysInfo).await?);

        let emeter = if sys_info.has_emeter() {
            let reading = self
                .send_command(&EnergyCommand::realtime(self.emeter_type))
                .await?;
            let status: EmeterStatus =
                serde_json::from_value(Value::Object(reading)).map_err(ParseError::from)?;
            Some(status)
        } else {
            None
        };

        tracing::debug!(
            alias = sys_info.alias().unwrap_or_default(),
            emeter = emeter.is_some(),
            "Updated device state"
        );

        *self.state.write() = Some(DeviceState::new(sys_info, emeter, Local::now()));
        Ok(())
    }

    // ========== Cached reads ==========

    /// Returns the device name.
    ///
    /// # Errors
    ///
    /// Returns error before the first update or if the field is missing.
    pub fn alias(&self) -> Result<String, Error> {
        self.with_sys_info(|info| Ok(info.alias()?.to_string()))
    }

    /// Returns the model string.
    ///
    /// # Errors
    ///
    /// Returns error before the first update or if the field is missing.
    pub fn model(&self) -> Result<String, Error> {
        self.with_sys_info(|info| Ok(info.model()?.to_string()))
    }

    /// Returns the MAC address.
    ///
    /// # Errors
    ///
    /// Returns error before the first update or if the field is missing.
    pub fn mac(&self) -> Result<String, Error> {
        self.with_sys_info(|info| Ok(info.mac()?.to_string()))
    }

    /// Returns the device identifier.
    ///
    /// # Errors
    ///
    /// Returns error before the first update or if the field is missing.
    pub fn device_id(&self) -> Result<String, Error> {
        self.with_sys_info(|info| Ok(info.device_id()?.to_string()))
    }

    /// Returns the hardware version.
    ///
    /// # Errors
    ///
    /// Returns error before the first update or if the field is missing.
    pub fn hw_version(&self) -> Result<String, Error> {
        self.with_sys_info(|info| Ok(info.hw_version()?.to_string()))
    }

    /// Returns the firmware version.
    ///
    /// # Errors
    ///
    /// Returns error before the first update or if the field is missing.
    pub fn sw_version(&self) -> Result<String, Error> {
        self.with_sys_info(|info| Ok(info.sw_version()?.to_string()))
    }

    /// Returns the WiFi signal strength in dBm.
    ///
    /// # Errors
    ///
    /// Returns error before the first update or if the field is missing.
    pub fn rssi(&self) -> Result<i64, Error> {
        self.with_sys_info(|info| Ok(info.rssi()?))
    }

    /// Returns the device class reported by the device itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateRequired`] before the first update.
    pub fn device_type(&self) -> Result<DeviceType, Error> {
        self.with_sys_info(|info| Ok(info.device_type()))
    }

    /// Returns `true` if the device has an energy meter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateRequired`] before the first update.
    pub fn has_emeter(&self) -> Result<bool, Error> {
        self.with_sys_info(|info| Ok(info.has_emeter()))
    }

    /// Returns the energy reading taken by the last update.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateRequired`] before the first update, or an
    /// unsupported capability error if the device has no meter.
    pub fn emeter_realtime(&self) -> Result<EmeterStatus, Error> {
        let guard = self.state.read();
        let state = guard.as_ref().ok_or(Error::UpdateRequired)?;
        state
            .emeter()
            .cloned()
            .ok_or_else(|| unsupported("energy monitoring"))
    }

    // ========== Writes ==========

    /// Renames the device, then updates.
    ///
    /// # Errors
    ///
    /// Returns error if the command or the update fails.
    pub async fn set_alias(&self, alias: impl Into<String>) -> Result<(), Error> {
        self.send_command(&SystemCommand::SetAlias(alias.into()))
            .await?;
        self.update().await
    }

    /// Reboots the device after `delay`.
    ///
    /// The cache is not refreshed, since the device drops off the network.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn reboot(&self, delay: Duration) -> Result<(), Error> {
        self.send_command(&SystemCommand::Reboot(delay)).await?;
        Ok(())
    }

    /// Erases the energy meter statistics, then updates.
    ///
    /// # Errors
    ///
    /// Returns error before the first update, if the device has no meter, or
    /// if the command or the update fails.
    pub async fn erase_emeter_stats(&self) -> Result<(), Error> {
        if !self.has_emeter()? {
            return Err(unsupported("energy monitoring"));
        }
        self.send_command(&EnergyCommand::erase_stats(self.emeter_type))
            .await?;
        self.update().await
    }
}

// ========== TCP Device Entry Point ==========

impl Device<TcpClient> {
    /// Creates a builder for a device reachable over TCP.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kasa_lib::Device;
    ///
    /// # async fn example() -> kasa_lib::Result<()> {
    /// let device = Device::tcp("192.168.1.105").build().await?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn tcp(host: impl Into<String>) -> DeviceBuilder {
        DeviceBuilder::new(TcpConfig::new(host))
    }

    /// Creates a builder from a full TCP configuration.
    #[must_use]
    pub fn tcp_config(config: TcpConfig) -> DeviceBuilder {
        DeviceBuilder::new(config)
    }
}

pub(crate) fn unsupported(capability: &str) -> Error {
    Error::Device(DeviceError::UnsupportedCapability {
        capability: capability.to_string(),
    })
}
