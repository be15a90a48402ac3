mod messages;
pub use messages::incoming::Command;
pub use messages::outgoing::{
    AngleSetMessage, SensorRegisterMessage, TempUpdateMessage, VentRegisterMessage,
};

mod ws_client;
use ws_client::OutgoingMessage;
pub use ws_client::{WsClient, WsError};

pub type Result<T> = std::result::Result<T, WsError>;
