// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Smart plug and switch adapter.

use chrono::{DateTime, Local, TimeDelta};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::command::{DimmerCommand, EMETER, SystemCommand};
use crate::device::{Device, unsupported};
use crate::error::{Error, ParseError, ValueError};
use crate::protocol::{Protocol, TcpClient};
use crate::types::{Brightness, DeviceType, RelayState};

/// A TP-Link smart plug or wall switch.
///
/// Reads come from the cache of the wrapped [`Device`] and fail with
/// [`Error::UpdateRequired`] until [`update`](Self::update) has been awaited.
/// Every write sends one command and then updates, so a read right after a
/// write reflects what the device reports.
///
/// Errors reported by the device are returned unchanged; the adapter never
/// retries.
///
/// # Examples
///
/// ```no_run
/// use kasa_lib::SmartPlug;
///
/// # async fn example() -> kasa_lib::Result<()> {
/// let plug = SmartPlug::tcp("192.168.1.105")?;
/// plug.update().await?;
///
/// plug.turn_on().await?;
/// assert!(plug.is_on()?);
///
/// println!("{:?}", plug.state_information()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SmartPlug<P: Protocol> {
    device: Device<P>,
    device_type: DeviceType,
}

impl SmartPlug<TcpClient> {
    /// Creates a plug for `host` with default TCP settings.
    ///
    /// Nothing is sent until [`update`](Self::update) is called.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty.
    pub fn tcp(host: impl Into<String>) -> Result<Self, Error> {
        Device::tcp(host).build_plug_without_update()
    }
}

impl<P: Protocol> SmartPlug<P> {
    /// Wraps a device session as a plug.
    #[must_use]
    pub fn new(device: Device<P>) -> Self {
        Self {
            device: device.with_emeter_type(EMETER),
            device_type: DeviceType::Plug,
        }
    }

    /// Returns the underlying session.
    #[must_use]
    pub fn device(&self) -> &Device<P> {
        &self.device
    }

    /// Returns the device class this adapter handles.
    #[must_use]
    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    /// Returns the energy meter namespace used by plugs.
    #[must_use]
    pub fn emeter_type(&self) -> &'static str {
        self.device.emeter_type()
    }

    /// Refreshes the cached state.
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be queried.
    pub async fn update(&self) -> Result<(), Error> {
        self.device.update().await
    }

    // ========== Power ==========

    /// Returns whether the relay is on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateRequired`] before the first update, or a parse
    /// error if `relay_state` is missing.
    pub fn is_on(&self) -> Result<bool, Error> {
        self.device
            .with_sys_info(|info| Ok(info.relay_state()?.is_on()))
    }

    /// Turns the relay on, then updates.
    ///
    /// # Errors
    ///
    /// Returns error if the command or the update fails.
    pub async fn turn_on(&self) -> Result<(), Error> {
        self.set_relay_state(RelayState::On).await
    }

    /// Turns the relay off, then updates.
    ///
    /// # Errors
    ///
    /// Returns error if the command or the update fails.
    pub async fn turn_off(&self) -> Result<(), Error> {
        self.set_relay_state(RelayState::Off).await
    }

    /// Flips the relay according to the cached state.
    ///
    /// Returns the new state.
    ///
    /// # Errors
    ///
    /// Returns error before the first update, or if the command or the
    /// update fails.
    pub async fn toggle(&self) -> Result<RelayState, Error> {
        let target = RelayState::from(!self.is_on()?);
        self.set_relay_state(target).await?;
        Ok(target)
    }

    async fn set_relay_state(&self, state: RelayState) -> Result<(), Error> {
        self.device
            .send_command(&SystemCommand::SetRelayState(state))
            .await?;
        self.device.update().await
    }

    // ========== Brightness ==========

    /// Returns whether the plug supports brightness changes.
    ///
    /// True exactly when the cached sysinfo has a `brightness` key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateRequired`] before the first update.
    pub fn is_dimmable(&self) -> Result<bool, Error> {
        self.device.with_sys_info(|info| Ok(info.is_dimmable()))
    }

    /// Returns the current brightness (0-100).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateRequired`] before the first update, or an
    /// unsupported capability error if the plug is not dimmable.
    pub fn brightness(&self) -> Result<u8, Error> {
        self.device.with_sys_info(|info| {
            if !info.is_dimmable() {
                return Err(unsupported("brightness control"));
            }
            Ok(info.brightness()?)
        })
    }

    /// Sets the brightness level.
    ///
    /// Accepts anything convertible to [`Brightness`]: integers, or a JSON
    /// value, which must be an integer. The level must be between 1 and 100;
    /// 0 is rejected.
    ///
    /// The relay is turned on first, even if it was already on. The full
    /// sequence is: `turn_on` (with its update), `set_brightness`, update.
    ///
    /// # Errors
    ///
    /// Checked in this order, before anything is sent:
    /// - [`Error::UpdateRequired`] before the first update
    /// - unsupported capability if the plug is not dimmable
    /// - [`ValueError::NotAnInteger`] or [`ValueError::OutOfRange`] for a bad value
    ///
    /// Afterwards, any failure of the three requests is returned as is.
    pub async fn set_brightness<B>(&self, value: B) -> Result<(), Error>
    where
        B: TryInto<Brightness>,
        ValueError: From<B::Error>,
    {
        if !self.is_dimmable()? {
            return Err(unsupported("brightness control"));
        }
        let level = value.try_into().map_err(ValueError::from)?;

        self.turn_on().await?;
        self.device
            .send_command(&DimmerCommand::SetBrightness(level))
            .await?;
        self.device.update().await
    }

    // ========== LED ==========

    /// Returns whether the status LED is on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateRequired`] before the first update, or a parse
    /// error if `led_off` is missing.
    pub fn led(&self) -> Result<bool, Error> {
        self.device.with_sys_info(|info| Ok(!info.led_off()?))
    }

    /// Turns the status LED (night mode) on or off, then updates.
    ///
    /// # Errors
    ///
    /// Returns error if the command or the update fails.
    pub async fn set_led(&self, state: bool) -> Result<(), Error> {
        self.device
            .send_command(&SystemCommand::set_led(state))
            .await?;
        self.device.update().await
    }

    // ========== On time ==========

    /// Returns when the relay was switched on, relative to the local clock.
    ///
    /// Recomputed on every call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UpdateRequired`] before the first update, or a parse
    /// error if `on_time` is missing or invalid.
    pub fn on_since(&self) -> Result<DateTime<Local>, Error> {
        self.on_since_at(Local::now())
    }

    /// Returns when the relay was switched on, relative to `now`.
    ///
    /// # Errors
    ///
    /// Same as [`on_since`](Self::on_since).
    pub fn on_since_at(&self, now: DateTime<Local>) -> Result<DateTime<Local>, Error> {
        let on_time = self.device.with_sys_info(|info| Ok(info.on_time()?))?;
        Ok(on_since(on_time, now)?)
    }

    // ========== Presentation ==========

    /// Returns the plug-specific state for display.
    ///
    /// # Errors
    ///
    /// Any error of [`led`](Self::led), [`on_since`](Self::on_since),
    /// [`is_dimmable`](Self::is_dimmable) or [`brightness`](Self::brightness).
    pub fn state_information(&self) -> Result<StateInformation, Error> {
        self.state_information_at(Local::now())
    }

    /// Returns the plug-specific state for display, with "on since"
    /// computed relative to `now`.
    ///
    /// # Errors
    ///
    /// Same as [`state_information`](Self::state_information).
    pub fn state_information_at(&self, now: DateTime<Local>) -> Result<StateInformation, Error> {
        let led_state = self.led()?;
        let on_since = self.on_since_at(now)?;
        let brightness = if self.is_dimmable()? {
            Some(self.brightness()?)
        } else {
            None
        };

        Ok(StateInformation {
            led_state,
            on_since,
            brightness,
        })
    }
}

/// Computes the moment a relay was switched on from its `on_time` counter.
///
/// # Errors
///
/// Returns [`ParseError::InvalidValue`] if `on_time` is too large to
/// subtract from `now`.
///
/// # Examples
///
/// ```
/// use chrono::{Local, TimeDelta};
/// use kasa_lib::on_since;
///
/// let now = Local::now();
/// assert_eq!(on_since(90, now).unwrap(), now - TimeDelta::seconds(90));
/// ```
pub fn on_since(on_time: u64, now: DateTime<Local>) -> Result<DateTime<Local>, ParseError> {
    i64::try_from(on_time)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|elapsed| now.checked_sub_signed(elapsed))
        .ok_or_else(|| ParseError::InvalidValue {
            field: "on_time".to_string(),
            message: format!("{on_time} seconds is out of range"),
        })
}

/// Plug state in presentation form.
///
/// Serializes to an object with the keys `"LED state"`, `"On since"`, and,
/// for dimmable plugs only, `"Brightness"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateInformation {
    /// Whether the status LED is on.
    #[serde(rename = "LED state")]
    pub led_state: bool,
    /// When the relay was switched on.
    #[serde(rename = "On since")]
    pub on_since: DateTime<Local>,
    /// Brightness level, present only on dimmable plugs.
    #[serde(rename = "Brightness", skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
}

impl StateInformation {
    /// Key of the LED entry.
    pub const LED_STATE: &'static str = "LED state";
    /// Key of the on-since entry.
    pub const ON_SINCE: &'static str = "On since";
    /// Key of the brightness entry.
    pub const BRIGHTNESS: &'static str = "Brightness";

    /// Returns the state as a JSON object keyed by display names.
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(Self::LED_STATE.to_string(), Value::Bool(self.led_state));
        map.insert(
            Self::ON_SINCE.to_string(),
            Value::String(self.on_since.to_rfc3339()),
        );
        if let Some(brightness) = self.brightness {
            map.insert(Self::BRIGHTNESS.to_string(), Value::from(brightness));
        }
        map
    }
}
