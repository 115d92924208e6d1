// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TCP device builder.

use std::time::Duration;

use crate::device::{Device, SmartPlug};
use crate::error::Error;
use crate::protocol::{TcpClient, TcpConfig};

/// Builder for creating TCP-based devices.
///
/// This builder can be created in two ways:
/// - `Device::tcp("host")` - Simple host string
/// - `Device::tcp_config(TcpConfig::new("host").with_port(9999))` - Full configuration
///
/// # Examples
///
/// ```no_run
/// use kasa_lib::Device;
/// use std::time::Duration;
///
/// # async fn example() -> kasa_lib::Result<()> {
/// // Connect and read the initial state
/// let device = Device::tcp("192.168.1.105")
///     .with_timeout(Duration::from_secs(2))
///     .build()
///     .await?;
///
/// // As a plug, without touching the network yet
/// let plug = Device::tcp("192.168.1.105").build_plug_without_update()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DeviceBuilder {
    config: TcpConfig,
}

impl DeviceBuilder {
    /// Creates a new builder with the specified TCP configuration.
    pub(crate) fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Sets the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Sets the transport retry count.
    #[must_use]
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.config = self.config.with_retry_count(retry_count);
        self
    }

    /// Returns the configuration built so far.
    #[must_use]
    pub fn config(&self) -> &TcpConfig {
        &self.config
    }

    /// Builds the device and performs the initial update.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the update fails.
    pub async fn build(self) -> Result<Device<TcpClient>, Error> {
        let device = self.build_without_update()?;
        device.update().await?;
        Ok(device)
    }

    /// Builds the device without contacting it.
    ///
    /// Cached reads fail with [`Error::UpdateRequired`] until
    /// [`Device::update`] is awaited.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub fn build_without_update(self) -> Result<Device<TcpClient>, Error> {
        let client = self.config.into_client().map_err(Error::Protocol)?;
        Ok(Device::new(client))
    }

    /// Builds a plug adapter and performs the initial update.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the update fails.
    pub async fn build_plug(self) -> Result<SmartPlug<TcpClient>, Error> {
        let plug = self.build_plug_without_update()?;
        plug.update().await?;
        Ok(plug)
    }

    /// Builds a plug adapter without contacting the device.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub fn build_plug_without_update(self) -> Result<SmartPlug<TcpClient>, Error> {
        Ok(SmartPlug::new(self.build_without_update()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_options() {
        let builder = DeviceBuilder::new(TcpConfig::new("192.168.1.105"))
            .with_port(9998)
            .with_timeout(Duration::from_secs(1))
            .with_retry_count(0);

        assert_eq!(builder.config().host(), "192.168.1.105");
        assert_eq!(builder.config().port(), 9998);
        assert_eq!(builder.config().timeout(), Duration::from_secs(1));
        assert_eq!(builder.config().retry_count(), 0);
    }

    #[test]
    fn build_without_update_is_not_ready() {
        let device = DeviceBuilder::new(TcpConfig::new("192.168.1.105"))
            .build_without_update()
            .unwrap();
        assert!(!device.is_updated());
        assert!(matches!(device.alias(), Err(Error::UpdateRequired)));
    }

    #[test]
    fn build_with_empty_host_fails() {
        let result = DeviceBuilder::new(TcpConfig::new("")).build_without_update();
        assert!(matches!(result, Err(Error::Protocol(_))));
    }

    #[test]
    fn build_plug_without_update_is_not_ready() {
        let plug = DeviceBuilder::new(TcpConfig::new("192.168.1.105"))
            .build_plug_without_update()
            .unwrap();
        assert!(matches!(plug.is_on(), Err(Error::UpdateRequired)));
    }
}
