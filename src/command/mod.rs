// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kasa command definitions.
//!
//! Every Kasa request is a JSON object of the form
//! `{"<namespace>": {"<method>": <params>}}`, and the device answers with the
//! same two levels of nesting around the result.
//!
//! # Available Commands
//!
//! | Command Type | Namespace | Example |
//! |-------------|-----------|---------|
//! | [`SystemCommand`] | `system` | `get_sysinfo`, `set_relay_state` |
//! | [`DimmerCommand`] | `smartlife.iot.dimmer` | `set_brightness` |
//! | [`EnergyCommand`] | `emeter` | `get_realtime` |
//! | [`RawCommand`] | any | arbitrary namespace/method/params |
//!
//! # Examples
//!
//! ```
//! use kasa_lib::command::{Command, SystemCommand};
//! use kasa_lib::types::RelayState;
//!
//! let cmd = SystemCommand::SetRelayState(RelayState::On);
//! assert_eq!(cmd.namespace(), "system");
//! assert_eq!(cmd.method(), "set_relay_state");
//! assert_eq!(cmd.to_json(), r#"{"system":{"set_relay_state":{"state":1}}}"#);
//! ```

mod dimmer;
mod energy;
mod system;

pub use dimmer::DimmerCommand;
pub use energy::EnergyCommand;
pub use system::SystemCommand;

use serde_json::{Map, Value};

/// The `system` namespace.
pub const SYSTEM: &str = "system";

/// Namespace of the dimmer module on dimmable plugs and switches.
pub const DIMMER: &str = "smartlife.iot.dimmer";

/// Energy meter namespace on plugs.
pub const EMETER: &str = "emeter";

/// A command that can be sent to a Kasa device.
pub trait Command {
    /// Returns the module namespace, for example `"system"`.
    fn namespace(&self) -> String;

    /// Returns the method name inside the namespace, for example `"get_sysinfo"`.
    fn method(&self) -> String;

    /// Returns the method parameters. Queries send an empty object.
    fn params(&self) -> Value {
        Value::Object(Map::new())
    }

    /// Returns the full request object.
    fn to_request(&self) -> Value {
        let mut method = Map::new();
        method.insert(self.method(), self.params());
        let mut request = Map::new();
        request.insert(self.namespace(), Value::Object(method));
        Value::Object(request)
    }

    /// Returns the request serialized as compact JSON.
    fn to_json(&self) -> String {
        self.to_request().to_string()
    }
}

/// Command addressed by explicit namespace, method, and parameters.
///
/// # Examples
///
/// ```
/// use kasa_lib::command::{Command, RawCommand};
///
/// let cmd = RawCommand::new("schedule", "get_rules", serde_json::json!({}));
/// assert_eq!(cmd.to_json(), r#"{"schedule":{"get_rules":{}}}"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RawCommand {
    namespace: String,
    method: String,
    params: Value,
}

impl RawCommand {
    /// Creates a command. A `null` params value is sent as an empty object.
    #[must_use]
    pub fn new(namespace: impl Into<String>, method: impl Into<String>, params: Value) -> Self {
        let params = if params.is_null() {
            Value::Object(Map::new())
        } else {
            params
        };
        Self {
            namespace: namespace.into(),
            method: method.into(),
            params,
        }
    }
}

impl Command for RawCommand {
    fn namespace(&self) -> String {
        self.namespace.clone()
    }

    fn method(&self) -> String {
        self.method.clone()
    }

    fn params(&self) -> Value {
        self.params.clone()
    }
}
