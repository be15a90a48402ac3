use serde::Deserialize;

/// Commands the hub may send to a device.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    SetAngle { angle: i32 },
}
