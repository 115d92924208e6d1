// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing for Kasa JSON responses.
//!
//! A response mirrors the request: `{"<namespace>": {"<method>": {...}}}`.
//! Both levels may carry an `err_code`; any non-zero value means the device
//! refused the command.

mod energy;

pub use energy::EmeterStatus;

use serde_json::{Map, Value};

use crate::command::Command;
use crate::error::{DeviceError, Error, ParseError};

/// Extracts the method result from a full response.
///
/// The returned object no longer contains `err_code`.
///
/// # Errors
///
/// - [`ParseError::MissingField`] if the namespace or method is absent
/// - [`ParseError::UnexpectedFormat`] if the result is not an object
/// - [`DeviceError::CommandRejected`] if an `err_code` is non-zero
///
/// # Examples
///
/// ```
/// use kasa_lib::command::SystemCommand;
/// use kasa_lib::response::extract_result;
/// use serde_json::json;
///
/// let response = json!({"system": {"get_sysinfo": {"alias": "Lamp", "err_code": 0}}});
/// let result = extract_result(&SystemCommand::GetSysInfo, response).unwrap();
/// assert_eq!(result["alias"], "Lamp");
/// assert!(!result.contains_key("err_code"));
/// ```
pub fn extract_result<C: Command + ?Sized>(
    command: &C,
    response: Value,
) -> Result<Map<String, Value>, Error> {
    let namespace = command.namespace();
    let method = command.method();

    let Value::Object(mut response) = response else {
        return Err(ParseError::UnexpectedFormat(format!(
            "expected JSON object, got {response}"
        ))
        .into());
    };

    let mut module = match response.remove(&namespace) {
        Some(Value::Object(module)) => module,
        Some(other) => {
            return Err(ParseError::UnexpectedFormat(format!(
                "{namespace} is not an object: {other}"
            ))
            .into());
        }
        None => return Err(ParseError::MissingField(namespace).into()),
    };

    check_err_code(&module, &namespace, &method)?;

    let mut result = match module.remove(&method) {
        Some(Value::Object(result)) => result,
        Some(other) => {
            return Err(ParseError::UnexpectedFormat(format!(
                "{namespace}.{method} is not an object: {other}"
            ))
            .into());
        }
        None => return Err(ParseError::MissingField(format!("{namespace}.{method}")).into()),
    };

    check_err_code(&result, &namespace, &method)?;
    result.remove("err_code");

    Ok(result)
}

fn check_err_code(object: &Map<String, Value>, namespace: &str, method: &str) -> Result<(), Error> {
    let code = object.get("err_code").and_then(Value::as_i64).unwrap_or(0);
    if code == 0 {
        return Ok(());
    }

    let message = object
        .get("err_msg")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Err(DeviceError::CommandRejected {
        namespace: namespace.to_string(),
        method: method.to_string(),
        code,
        message,
    }
    .into())
}
