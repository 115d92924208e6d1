// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! XOR autokey cipher used by the Kasa TCP protocol.
//!
//! Each plaintext byte is XORed with the key, and the resulting ciphertext
//! byte becomes the key for the next one. The key starts at `171`.
//!
//! On the wire, every message is preceded by its payload length as a
//! big-endian `u32`.
//!
//! # Examples
//!
//! ```
//! use kasa_lib::protocol::xor;
//!
//! let frame = xor::encrypt(r#"{"system":{"get_sysinfo":{}}}"#);
//! let payload = &frame[xor::HEADER_LEN..];
//! assert_eq!(xor::decrypt(payload).unwrap(), r#"{"system":{"get_sysinfo":{}}}"#);
//! ```

use crate::error::ProtocolError;

/// Initial key of the autokey cipher.
pub const INITIAL_KEY: u8 = 171;

/// Length of the big-endian payload length header.
pub const HEADER_LEN: usize = 4;

/// Encrypts a request into a length-prefixed frame.
#[must_use]
pub fn encrypt(request: &str) -> Vec<u8> {
    let payload = request.as_bytes();
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());

    // Requests are short JSON documents, far below u32::MAX
    #[allow(clippy::cast_possible_truncation)]
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());

    let mut key = INITIAL_KEY;
    for &byte in payload {
        key ^= byte;
        frame.push(key);
    }
    frame
}

/// Decrypts a frame payload (without its length header).
///
/// # Errors
///
/// Returns [`ProtocolError::Framing`] if the decrypted bytes are not UTF-8.
pub fn decrypt(payload: &[u8]) -> Result<String, ProtocolError> {
    let mut key = INITIAL_KEY;
    let plain: Vec<u8> = payload
        .iter()
        .map(|&byte| {
            let plain = key ^ byte;
            key = byte;
            plain
        })
        .collect();

    String::from_utf8(plain).map_err(|e| ProtocolError::Framing(e.to_string()))
}

/// Reads the payload length from a frame header.
#[must_use]
pub fn payload_len(header: [u8; HEADER_LEN]) -> usize {
    u32::from_be_bytes(header) as usize
}
