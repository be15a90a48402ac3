mod sensor;
pub use sensor::SensorState;

mod vent;
pub use vent::{OutOfRange, VentState};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Vent,
    Sensor,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Vent => write!(f, "vent"),
            DeviceKind::Sensor => write!(f, "sensor"),
        }
    }
}

#[derive(Debug)]
pub enum DeviceModel {
    Vent(VentState),
    Sensor(SensorState),
}

impl DeviceModel {
    pub fn kind(&self) -> DeviceKind {
        match self {
            DeviceModel::Vent(_) => DeviceKind::Vent,
            DeviceModel::Sensor(_) => DeviceKind::Sensor,
        }
    }
}

#[derive(Debug)]
pub struct Device {
    pub id: String,
    pub model: DeviceModel,
}

impl Device {
    pub fn vent(id: String) -> Device {
        Device {
            id,
            model: DeviceModel::Vent(VentState::default()),
        }
    }

    pub fn sensor(id: String) -> Device {
        Device {
            id,
            model: DeviceModel::Sensor(SensorState::default()),
        }
    }

    pub fn kind(&self) -> DeviceKind {
        self.model.kind()
    }
}
