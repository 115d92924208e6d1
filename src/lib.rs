// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Kasa` Lib - A Rust library to control TP-Link Kasa smart plugs.
//!
//! This library talks to devices over the local Kasa protocol: JSON
//! messages, XOR-obfuscated and length-prefixed, over TCP port 9999.
//!
//! # Supported Features
//!
//! - **Power control**: Turn plugs on/off, toggle, read how long they have been on
//! - **Dimming**: Brightness for dimmable plugs and wall switches
//! - **Status LED**: Read and switch the front LED (night mode)
//! - **System**: Alias, model, MAC, firmware, signal strength, reboot
//! - **Energy monitoring**: Realtime power, voltage, current and total for metering plugs
//!
//! # State Model
//!
//! Every read is answered from a cache filled by `update()`. Reading before
//! the first update returns [`Error::UpdateRequired`]. Every write sends one
//! command and then updates, so the cache reflects what the device reports.
//!
//! # Quick Start
//!
//! ```no_run
//! use kasa_lib::Device;
//!
//! #[tokio::main]
//! async fn main() -> kasa_lib::Result<()> {
//!     let plug = Device::tcp("192.168.1.105").build_plug().await?;
//!
//!     plug.turn_on().await?;
//!
//!     if plug.is_dimmable()? {
//!         plug.set_brightness(75).await?;
//!     }
//!
//!     println!("{:?}", plug.state_information()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Custom Transport Settings
//!
//! ```no_run
//! use std::time::Duration;
//! use kasa_lib::{Device, TcpConfig};
//!
//! #[tokio::main]
//! async fn main() -> kasa_lib::Result<()> {
//!     let config = TcpConfig::new("192.168.1.105")
//!         .with_timeout(Duration::from_secs(2))
//!         .with_retry_count(1);
//!
//!     let device = Device::tcp_config(config).build().await?;
//!     println!("{} runs {}", device.alias()?, device.sw_version()?);
//!     Ok(())
//! }
//! ```

pub mod command;
mod device;
pub mod error;
pub mod protocol;
pub mod response;
pub mod state;
pub mod types;

pub use command::{Command, DimmerCommand, EnergyCommand, RawCommand, SystemCommand};
pub use device::{Device, DeviceBuilder, SmartPlug, StateInformation, on_since};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use protocol::{Protocol, TcpClient, TcpClientBuilder, TcpConfig};
pub use response::EmeterStatus;
pub use state::{DeviceState, SysInfo};
pub use types::{Brightness, DeviceType, RelayState};
