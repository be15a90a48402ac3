use crate::OutgoingMessage;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VentRegisterMessage<'a> {
    device_type: &'static str,
    device_id: &'a str,
    current_angle: i32,
    config: VentConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VentConfig {
    min_angle: i32,
    max_angle: i32,
}

impl VentRegisterMessage<'_> {
    pub fn new(
        device_id: &str,
        current_angle: i32,
        min_angle: i32,
        max_angle: i32,
    ) -> VentRegisterMessage<'_> {
        VentRegisterMessage {
            device_type: "vent",
            device_id,
            current_angle,
            config: VentConfig {
                min_angle,
                max_angle,
            },
        }
    }
}

impl OutgoingMessage for VentRegisterMessage<'_> {
    fn message_type(&self) -> &'static str {
        "register"
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorRegisterMessage<'a> {
    device_type: &'static str,
    device_id: &'a str,
    current_temp: f64,
}

impl SensorRegisterMessage<'_> {
    pub fn new(device_id: &str, current_temp: f64) -> SensorRegisterMessage<'_> {
        SensorRegisterMessage {
            device_type: "sensor",
            device_id,
            current_temp,
        }
    }
}

impl OutgoingMessage for SensorRegisterMessage<'_> {
    fn message_type(&self) -> &'static str {
        "register"
    }
}
