use crate::OutgoingMessage;
use serde::Serialize;

/// Acknowledgement for an applied `setAngle` command. Rejected commands
/// are not acknowledged at all.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AngleSetMessage<'a> {
    device_id: &'a str,
    angle: i32,
}

impl AngleSetMessage<'_> {
    pub fn new(device_id: &str, angle: i32) -> AngleSetMessage<'_> {
        AngleSetMessage { device_id, angle }
    }
}

impl OutgoingMessage for AngleSetMessage<'_> {
    fn message_type(&self) -> &'static str {
        "angleSet"
    }
}
