use crate::OutgoingMessage;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TempUpdateMessage<'a> {
    device_id: &'a str,
    temperature: f64,
}

impl TempUpdateMessage<'_> {
    /// Readings go over the wire with one decimal place.
    pub fn new(device_id: &str, temperature: f64) -> TempUpdateMessage<'_> {
        TempUpdateMessage {
            device_id,
            temperature: (temperature * 10.0).round() / 10.0,
        }
    }
}

impl OutgoingMessage for TempUpdateMessage<'_> {
    fn message_type(&self) -> &'static str {
        "tempUpdate"
    }
}
