// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Kasa library.
//!
//! This module provides the error hierarchy for handling failures across the
//! library: value validation, transport communication, JSON parsing, and
//! device-reported failures.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when interacting
/// with Kasa devices.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error reported by, or about, the device.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// Cached device state was read before the first successful update.
    #[error("you need to await update() to access the data")]
    UpdateRequired,
}

/// Errors related to value validation and constraints.
///
/// These are raised before anything is sent to the device.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// A value that must be an integer was given as another JSON type.
    #[error("{field} must be an integer, not {actual}")]
    NotAnInteger {
        /// The field being validated.
        field: &'static str,
        /// The offending value, rendered as JSON.
        actual: String,
    },

    /// An invalid relay state string was provided.
    #[error("invalid relay state: {0}")]
    InvalidRelayState(String),
}

/// Lets already-validated values pass through `TryInto` bounds.
impl From<std::convert::Infallible> for ValueError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// Errors related to transport communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Socket-level failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid host or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The response frame could not be decoded.
    #[error("malformed frame: {0}")]
    Framing(String),
}

/// Errors related to parsing device responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// A field was present but had the wrong type or value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Device does not support the requested capability.
    #[error("device does not support {capability}")]
    UnsupportedCapability {
        /// The capability that is not supported.
        capability: String,
    },

    /// Command was rejected by the device with a non-zero `err_code`.
    #[error("command {namespace}.{method} rejected (err_code {code}): {message}")]
    CommandRejected {
        /// Namespace of the rejected command.
        namespace: String,
        /// Method of the rejected command.
        method: String,
        /// Error code reported by the device.
        code: i64,
        /// Error message reported by the device, if any.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
