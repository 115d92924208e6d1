// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol implementations for communicating with Kasa devices.
//!
//! Kasa devices speak JSON over TCP port 9999. Every request is obfuscated
//! with an XOR autokey cipher and prefixed with its length.
//!
//! # Protocols
//!
//! - [`TcpClient`]: the local TCP protocol, one connection per request
//!
//! The [`Protocol`] trait is the seam the [`Device`](crate::Device) session
//! talks to, so tests can substitute an in-memory device.

mod tcp;
pub mod xor;

pub use tcp::{TcpClient, TcpClientBuilder, TcpConfig};

use crate::command::Command;
use crate::error::ProtocolError;

/// Response to a Kasa request.
#[derive(Debug, Clone)]
pub struct CommandResponse {
    /// The decrypted JSON response body.
    body: String,
}

impl CommandResponse {
    /// Creates a new command response with the given body.
    #[must_use]
    pub fn new(body: String) -> Self {
        Self { body }
    }

    /// Returns the raw JSON response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the response as a specific type.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON cannot be parsed into the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, crate::error::ParseError> {
        serde_json::from_str(&self.body).map_err(Into::into)
    }
}

/// Trait for protocol implementations that can send requests to Kasa devices.
#[allow(async_fn_in_trait)]
pub trait Protocol {
    /// Sends a command to the device and returns the response.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the command fails to send or receive.
    async fn send_command<C: Command + Sync>(
        &self,
        command: &C,
    ) -> Result<CommandResponse, ProtocolError> {
        self.send_raw(&command.to_json()).await
    }

    /// Sends a raw JSON request string to the device.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails.
    async fn send_raw(&self, request: &str) -> Result<CommandResponse, ProtocolError>;
}
