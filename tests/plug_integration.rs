// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the smart plug adapter against a simulated device.

use chrono::{Local, TimeDelta};
use kasa_lib::error::ProtocolError;
use kasa_lib::protocol::{CommandResponse, Protocol};
use kasa_lib::{Brightness, Device, DeviceError, Error, SmartPlug, StateInformation, ValueError};
use parking_lot::Mutex;
use serde_json::{Map, Value, json};

// ============================================================================
// Simulated device
// ============================================================================

/// In-memory plug that applies writes to its sysinfo and records every call.
struct SimulatedPlug {
    sys_info: Mutex<Map<String, Value>>,
    calls: Mutex<Vec<(String, Value)>>,
    reject: Option<&'static str>,
}

impl SimulatedPlug {
    fn new(sys_info: Value) -> Self {
        let Value::Object(map) = sys_info else {
            panic!("sysinfo must be an object");
        };
        Self {
            sys_info: Mutex::new(map),
            calls: Mutex::new(Vec::new()),
            reject: None,
        }
    }

    /// Answers `method` with `err_code: -1`.
    fn rejecting(mut self, method: &'static str) -> Self {
        self.reject = Some(method);
        self
    }

    fn methods(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(m, _)| m.clone()).collect()
    }

    fn params_of(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }

    fn clear(&self) {
        self.calls.lock().clear();
    }

    fn handle(&self, namespace: &str, method: &str, params: &Value) -> Value {
        if self.reject == Some(method) {
            return json!({"err_code": -1, "err_msg": "rejected"});
        }

        let mut info = self.sys_info.lock();
        match (namespace, method) {
            ("system", "get_sysinfo") => {
                let mut result = info.clone();
                result.insert("err_code".to_string(), json!(0));
                return Value::Object(result);
            }
            ("system", "set_relay_state") => {
                let state = params["state"].clone();
                if state == json!(1) && info.get("relay_state") != Some(&json!(1)) {
                    info.insert("on_time".to_string(), json!(0));
                }
                info.insert("relay_state".to_string(), state);
            }
            ("system", "set_led_off") => {
                info.insert("led_off".to_string(), params["off"].clone());
            }
            ("system", "set_dev_alias") => {
                info.insert("alias".to_string(), params["alias"].clone());
            }
            ("smartlife.iot.dimmer", "set_brightness") => {
                info.insert("brightness".to_string(), params["brightness"].clone());
            }
            ("system", "reboot") | ("emeter", "erase_emeter_stat") => {}
            ("emeter", "get_realtime") => {
                return json!({"power": 12.5, "voltage": 230.1, "current": 0.05, "total": 3.2, "err_code": 0});
            }
            _ => return json!({"err_code": -2, "err_msg": "module not support"}),
        }
        json!({"err_code": 0})
    }
}

impl Protocol for SimulatedPlug {
    async fn send_raw(&self, request: &str) -> Result<CommandResponse, ProtocolError> {
        let request: Value = serde_json::from_str(request)
            .map_err(|e| ProtocolError::Framing(e.to_string()))?;

        let mut response = Map::new();
        for (namespace, methods) in request.as_object().into_iter().flatten() {
            let mut results = Map::new();
            for (method, params) in methods.as_object().into_iter().flatten() {
                self.calls
                    .lock()
                    .push((method.clone(), params.clone()));
                results.insert(method.clone(), self.handle(namespace, method, params));
            }
            response.insert(namespace.clone(), Value::Object(results));
        }

        Ok(CommandResponse::new(Value::Object(response).to_string()))
    }
}

fn plain_sysinfo() -> Value {
    json!({
        "alias": "Coffee maker",
        "model": "HS105(US)",
        "mac": "50:C7:BF:00:00:01",
        "type": "IOT.SMARTPLUGSWITCH",
        "feature": "TIM",
        "relay_state": 0,
        "led_off": 0,
        "on_time": 0,
        "rssi": -52
    })
}

fn dimmer_sysinfo() -> Value {
    json!({
        "alias": "Hallway",
        "model": "HS220(US)",
        "mic_type": "IOT.SMARTPLUGSWITCH",
        "dev_name": "Smart Wi-Fi Dimmer",
        "feature": "TIM",
        "relay_state": 0,
        "led_off": 1,
        "on_time": 0,
        "brightness": 20
    })
}

fn plug(sys_info: Value) -> SmartPlug<SimulatedPlug> {
    SmartPlug::new(Device::new(SimulatedPlug::new(sys_info)))
}

async fn ready(sys_info: Value) -> SmartPlug<SimulatedPlug> {
    let plug = plug(sys_info);
    plug.update().await.unwrap();
    sim(&plug).clear();
    plug
}

fn sim(plug: &SmartPlug<SimulatedPlug>) -> &SimulatedPlug {
    plug.device().protocol()
}

fn is_value_error(err: &Error) -> bool {
    matches!(err, Error::Value(_))
}

fn is_unsupported(err: &Error) -> bool {
    matches!(err, Error::Device(DeviceError::UnsupportedCapability { .. }))
}

// ============================================================================
// Readiness
// ============================================================================

mod readiness {
    use super::*;

    #[tokio::test]
    async fn reads_before_update_require_update() {
        let plug = plug(dimmer_sysinfo());

        assert!(matches!(plug.is_on(), Err(Error::UpdateRequired)));
        assert!(matches!(plug.is_dimmable(), Err(Error::UpdateRequired)));
        assert!(matches!(plug.brightness(), Err(Error::UpdateRequired)));
        assert!(matches!(plug.led(), Err(Error::UpdateRequired)));
        assert!(matches!(plug.on_since(), Err(Error::UpdateRequired)));
        assert!(matches!(
            plug.state_information(),
            Err(Error::UpdateRequired)
        ));
    }

    #[tokio::test]
    async fn set_brightness_before_update_sends_nothing() {
        let plug = plug(dimmer_sysinfo());

        let err = plug.set_brightness(50).await.unwrap_err();

        assert!(matches!(err, Error::UpdateRequired));
        assert!(sim(&plug).methods().is_empty());
    }

    #[tokio::test]
    async fn update_queries_sysinfo_only_without_meter() {
        let plug = plug(plain_sysinfo());
        plug.update().await.unwrap();

        assert_eq!(sim(&plug).methods(), ["get_sysinfo"]);
        assert!(!plug.is_on().unwrap());
    }

    #[tokio::test]
    async fn update_reads_meter_on_metering_plug() {
        let mut info = plain_sysinfo();
        info["feature"] = json!("TIM:ENE");
        let plug = plug(info);

        plug.update().await.unwrap();

        assert_eq!(sim(&plug).methods(), ["get_sysinfo", "get_realtime"]);
        let reading = plug.device().emeter_realtime().unwrap();
        assert_eq!(reading.power(), Some(12.5));
        assert_eq!(plug.emeter_type(), "emeter");
    }
}

// ============================================================================
// Power
// ============================================================================

mod power {
    use super::*;

    #[tokio::test]
    async fn turn_on_sends_relay_state_then_updates() {
        let plug = ready(plain_sysinfo()).await;

        plug.turn_on().await.unwrap();

        assert_eq!(sim(&plug).methods(), ["set_relay_state", "get_sysinfo"]);
        assert_eq!(sim(&plug).params_of("set_relay_state"), [json!({"state": 1})]);
        assert!(plug.is_on().unwrap());
    }

    #[tokio::test]
    async fn turn_off_after_turn_on() {
        let plug = ready(plain_sysinfo()).await;

        plug.turn_on().await.unwrap();
        plug.turn_off().await.unwrap();

        assert!(!plug.is_on().unwrap());
        assert_eq!(
            sim(&plug).params_of("set_relay_state"),
            [json!({"state": 1}), json!({"state": 0})]
        );
    }

    #[tokio::test]
    async fn toggle_flips_relay() {
        let plug = ready(plain_sysinfo()).await;

        let state = plug.toggle().await.unwrap();

        assert!(state.is_on());
        assert!(plug.is_on().unwrap());
    }

    #[tokio::test]
    async fn rejected_turn_on_skips_update() {
        let plug = plug(SimulatedPlug::new(plain_sysinfo()).rejecting("set_relay_state"));
        plug.update().await.unwrap();
        sim(&plug).clear();

        let err = plug.turn_on().await.unwrap_err();

        assert!(matches!(
            err,
            Error::Device(DeviceError::CommandRejected { code: -1, .. })
        ));
        assert_eq!(sim(&plug).methods(), ["set_relay_state"]);
        assert!(!plug.is_on().unwrap());
    }

    #[tokio::test]
    async fn missing_relay_state_is_parse_error() {
        let mut info = plain_sysinfo();
        info.as_object_mut().unwrap().remove("relay_state");
        let plug = ready(info).await;

        assert!(matches!(plug.is_on(), Err(Error::Parse(_))));
    }

    fn plug(protocol: SimulatedPlug) -> SmartPlug<SimulatedPlug> {
        SmartPlug::new(Device::new(protocol))
    }
}

// ============================================================================
// Brightness
// ============================================================================

mod brightness {
    use super::*;

    #[tokio::test]
    async fn dimmable_plug_reports_brightness() {
        let plug = ready(dimmer_sysinfo()).await;

        assert!(plug.is_dimmable().unwrap());
        assert_eq!(plug.brightness().unwrap(), 20);
    }

    #[tokio::test]
    async fn set_brightness_turns_on_then_dims() {
        let plug = ready(dimmer_sysinfo()).await;

        plug.set_brightness(50).await.unwrap();

        assert_eq!(
            sim(&plug).methods(),
            ["set_relay_state", "get_sysinfo", "set_brightness", "get_sysinfo"]
        );
        assert_eq!(sim(&plug).params_of("set_relay_state"), [json!({"state": 1})]);
        assert_eq!(sim(&plug).params_of("set_brightness"), [json!({"brightness": 50})]);
        assert!(plug.is_on().unwrap());
        assert_eq!(plug.brightness().unwrap(), 50);
    }

    #[tokio::test]
    async fn set_brightness_turns_on_even_when_on() {
        let mut info = dimmer_sysinfo();
        info["relay_state"] = json!(1);
        let plug = ready(info).await;

        plug.set_brightness(Brightness::MAX).await.unwrap();

        assert_eq!(sim(&plug).methods()[0], "set_relay_state");
        assert_eq!(plug.brightness().unwrap(), 100);
    }

    #[tokio::test]
    async fn set_brightness_accepts_json_integer() {
        let plug = ready(dimmer_sysinfo()).await;

        plug.set_brightness(&json!(1)).await.unwrap();

        assert_eq!(plug.brightness().unwrap(), 1);
    }

    #[tokio::test]
    async fn every_valid_level_is_sent_once() {
        let plug = ready(dimmer_sysinfo()).await;

        for level in 1..=100 {
            sim(&plug).clear();

            plug.set_brightness(level).await.unwrap();

            assert_eq!(
                sim(&plug).params_of("set_brightness"),
                [json!({"brightness": level})]
            );
            assert_eq!(i32::from(plug.brightness().unwrap()), level);
        }
    }

    #[tokio::test]
    async fn invalid_levels_send_nothing() {
        let plug = ready(dimmer_sysinfo()).await;

        for level in [0, 101, -1] {
            let err = plug.set_brightness(level).await.unwrap_err();
            assert!(is_value_error(&err), "level {level}: {err}");
        }
        for value in [json!(50.5), json!("50"), json!(null)] {
            let err = plug.set_brightness(&value).await.unwrap_err();
            assert!(matches!(
                err,
                Error::Value(ValueError::NotAnInteger { .. })
            ));
        }

        assert!(sim(&plug).methods().is_empty());
        assert_eq!(plug.brightness().unwrap(), 20);
    }

    #[tokio::test]
    async fn non_dimmable_plug_rejects_brightness() {
        let plug = ready(plain_sysinfo()).await;

        assert!(!plug.is_dimmable().unwrap());
        assert!(is_unsupported(&plug.brightness().unwrap_err()));
        assert!(is_unsupported(&plug.set_brightness(50).await.unwrap_err()));
        assert!(sim(&plug).methods().is_empty());
    }

    #[tokio::test]
    async fn capability_is_checked_before_value() {
        let plug = ready(plain_sysinfo()).await;

        let err = plug.set_brightness(0).await.unwrap_err();

        assert!(is_unsupported(&err));
    }

    #[tokio::test]
    async fn rejected_dimmer_call_leaves_relay_on() {
        let protocol = SimulatedPlug::new(dimmer_sysinfo()).rejecting("set_brightness");
        let plug = SmartPlug::new(Device::new(protocol));
        plug.update().await.unwrap();
        sim(&plug).clear();

        let err = plug.set_brightness(60).await.unwrap_err();

        assert!(matches!(err, Error::Device(DeviceError::CommandRejected { .. })));
        assert_eq!(
            sim(&plug).methods(),
            ["set_relay_state", "get_sysinfo", "set_brightness"]
        );
        assert!(plug.is_on().unwrap());
        assert_eq!(plug.brightness().unwrap(), 20);
    }
}

// ============================================================================
// LED
// ============================================================================

mod led {
    use super::*;

    #[tokio::test]
    async fn led_is_inverse_of_led_off() {
        assert!(ready(plain_sysinfo()).await.led().unwrap());
        assert!(!ready(dimmer_sysinfo()).await.led().unwrap());
    }

    #[tokio::test]
    async fn set_led_sends_inverted_flag() {
        let plug = ready(plain_sysinfo()).await;

        plug.set_led(false).await.unwrap();
        assert!(!plug.led().unwrap());

        plug.set_led(true).await.unwrap();
        assert!(plug.led().unwrap());

        assert_eq!(
            sim(&plug).params_of("set_led_off"),
            [json!({"off": 1}), json!({"off": 0})]
        );
        assert_eq!(
            sim(&plug).methods(),
            ["set_led_off", "get_sysinfo", "set_led_off", "get_sysinfo"]
        );
    }
}

// ============================================================================
// On time and state information
// ============================================================================

mod state {
    use super::*;

    #[tokio::test]
    async fn on_since_is_now_minus_on_time() {
        let mut info = plain_sysinfo();
        info["on_time"] = json!(120);
        let plug = ready(info).await;
        let now = Local::now();

        assert_eq!(plug.on_since_at(now).unwrap(), now - TimeDelta::seconds(120));
    }

    #[tokio::test]
    async fn on_since_follows_the_clock() {
        let mut info = plain_sysinfo();
        info["on_time"] = json!(60);
        let plug = ready(info).await;
        let now = Local::now();
        let later = now + TimeDelta::seconds(30);

        let first = plug.on_since_at(now).unwrap();
        let second = plug.on_since_at(later).unwrap();

        assert_eq!(second - first, TimeDelta::seconds(30));
        assert!(sim(&plug).methods().is_empty());
    }

    #[tokio::test]
    async fn on_since_reads_the_wall_clock() {
        let mut info = plain_sysinfo();
        info["on_time"] = json!(60);
        let plug = ready(info).await;

        let first = plug.on_since().unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let second = plug.on_since().unwrap();

        let drift = second - first;
        assert!(drift >= TimeDelta::milliseconds(40), "drift {drift}");
        assert!(drift < TimeDelta::seconds(5), "drift {drift}");
        assert!(sim(&plug).methods().is_empty());
    }

    #[tokio::test]
    async fn state_information_without_dimmer() {
        let mut info = plain_sysinfo();
        info["on_time"] = json!(10);
        let plug = ready(info).await;
        let now = Local::now();

        let state = plug.state_information_at(now).unwrap();

        assert_eq!(
            state,
            StateInformation {
                led_state: true,
                on_since: now - TimeDelta::seconds(10),
                brightness: None,
            }
        );
        let map = state.to_map();
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("Brightness"));
    }

    #[tokio::test]
    async fn state_information_with_dimmer() {
        let plug = ready(dimmer_sysinfo()).await;

        let map = plug.state_information().unwrap().to_map();

        assert_eq!(map["LED state"], json!(false));
        assert_eq!(map["Brightness"], json!(20));
        assert!(map["On since"].is_string());
    }

    #[tokio::test]
    async fn alias_write_goes_through_session() {
        let plug = ready(plain_sysinfo()).await;

        plug.device().set_alias("Kettle").await.unwrap();

        assert_eq!(plug.device().alias().unwrap(), "Kettle");
        assert_eq!(sim(&plug).methods(), ["set_dev_alias", "get_sysinfo"]);
    }

    #[tokio::test]
    async fn erase_emeter_stats_then_updates() {
        let mut info = plain_sysinfo();
        info["feature"] = json!("TIM:ENE");
        let plug = ready(info).await;

        plug.device().erase_emeter_stats().await.unwrap();

        assert_eq!(
            sim(&plug).methods(),
            ["erase_emeter_stat", "get_sysinfo", "get_realtime"]
        );
    }

    #[tokio::test]
    async fn erase_emeter_stats_without_meter_sends_nothing() {
        let plug = ready(plain_sysinfo()).await;

        let err = plug.device().erase_emeter_stats().await.unwrap_err();

        assert!(is_unsupported(&err));
        assert!(sim(&plug).methods().is_empty());
    }

    #[tokio::test]
    async fn reboot_sends_delay_without_update() {
        let plug = ready(plain_sysinfo()).await;

        plug.device()
            .reboot(std::time::Duration::from_secs(3))
            .await
            .unwrap();

        assert_eq!(sim(&plug).methods(), ["reboot"]);
        assert_eq!(sim(&plug).params_of("reboot"), [json!({"delay": 3})]);
        assert!(plug.is_on().is_ok());
    }

    #[tokio::test]
    async fn unknown_method_is_rejected_by_device() {
        let plug = ready(plain_sysinfo()).await;

        let err = plug
            .device()
            .query_helper("schedule", "get_rules", Value::Null)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Device(DeviceError::CommandRejected { code: -2, .. })
        ));
    }
}
