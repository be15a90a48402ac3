mod device;
pub use device::{Device, DeviceKind, DeviceModel, OutOfRange, SensorState, VentState};

mod error;
pub use error::Error;

mod fleet;
pub use fleet::Fleet;

mod session;
pub use session::{DeviceHandle, Session, SessionState};

pub type Result<T> = std::result::Result<T, Error>;
