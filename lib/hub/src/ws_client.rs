use std::fmt;
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use log::debug;
use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::{Command, Result};

#[derive(Debug)]
pub enum WsError {
    StreamClosed,
    SessionClosed,
    CannotParse(serde_json::Error),
    WebSocketError(tokio_tungstenite::tungstenite::error::Error),
    UnexpectedMessage(Message),
    Pong,
}

impl fmt::Display for WsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WsError::StreamClosed => write!(f, "stream closed"),
            WsError::SessionClosed => write!(f, "session closed"),
            WsError::CannotParse(error) => write!(f, "cannot parse: {}", error),
            WsError::WebSocketError(error) => write!(f, "websocket error: {}", error),
            WsError::UnexpectedMessage(message) => write!(f, "unexpected message: {:?}", message),
            WsError::Pong => write!(f, "pong"),
        }
    }
}

impl std::error::Error for WsError {}

impl From<serde_json::Error> for WsError {
    fn from(value: serde_json::Error) -> Self {
        WsError::CannotParse(value)
    }
}

impl From<tokio_tungstenite::tungstenite::error::Error> for WsError {
    fn from(value: tokio_tungstenite::tungstenite::error::Error) -> Self {
        if let tokio_tungstenite::tungstenite::error::Error::AlreadyClosed = value {
            WsError::StreamClosed
        } else {
            WsError::WebSocketError(value)
        }
    }
}

pub trait OutgoingMessage {
    fn message_type(&self) -> &'static str;
}

type Writer = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type Reader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// One device's connection to the hub. Clones share the underlying
/// socket and observe the same closed state.
#[derive(Clone)]
pub struct WsClient {
    write: Arc<Mutex<Writer>>,
    read: Arc<Mutex<Reader>>,
    closed_tx: Arc<watch::Sender<bool>>,
    closed_rx: watch::Receiver<bool>,
}

impl WsClient {
    pub async fn connect(uri: &str) -> Result<WsClient> {
        let (web_socket, _) = connect_async(uri).await?;

        let (write, read) = web_socket.split();
        let (closed_tx, closed_rx) = watch::channel(false);

        Ok(WsClient {
            write: Arc::new(Mutex::new(write)),
            read: Arc::new(Mutex::new(read)),
            closed_tx: Arc::new(closed_tx),
            closed_rx,
        })
    }

    pub async fn send_message<Msg>(&mut self, message: Msg) -> Result<()>
    where
        Msg: Serialize + OutgoingMessage,
    {
        if self.is_closed() {
            return Err(WsError::SessionClosed);
        }

        let text = encode(&message)?;
        debug!("sent {}", text);

        let mut write = self.write.lock().await;
        if let Err(error) = write.send(Message::text(text)).await {
            self.mark_closed();
            return Err(error.into());
        }

        Ok(())
    }

    pub async fn read_message(&mut self) -> Result<Command> {
        let next = {
            let mut read = self.read.lock().await;
            read.next().await
        };

        match next {
            Some(Ok(Message::Text(text))) => {
                debug!("received {}", text);

                let command: Command = serde_json::from_str(text.as_str())?;
                Ok(command)
            }
            Some(Ok(Message::Ping(payload))) => {
                let mut write = self.write.lock().await;
                write.send(Message::Pong(payload)).await?;

                Err(WsError::Pong)
            }
            Some(Ok(Message::Close(frame))) => {
                self.mark_closed();

                // complete the close handshake before giving up the stream
                let mut write = self.write.lock().await;
                _ = write.send(Message::Close(frame)).await;

                Err(WsError::StreamClosed)
            }
            None => {
                self.mark_closed();
                Err(WsError::StreamClosed)
            }
            Some(Ok(message)) => Err(WsError::UnexpectedMessage(message)),
            Some(Err(error)) => {
                self.mark_closed();
                Err(error.into())
            }
        }
    }

    pub async fn close(&self) -> Result<()> {
        if self.closed_tx.send_replace(true) {
            return Ok(());
        }

        let mut write = self.write.lock().await;
        write.send(Message::Close(None)).await?;

        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        *self.closed_rx.borrow()
    }

    /// Resolves once the session is closed, locally or by the hub.
    pub async fn closed(&self) {
        let mut closed_rx = self.closed_rx.clone();
        _ = closed_rx.wait_for(|closed| *closed).await;
    }

    fn mark_closed(&self) {
        self.closed_tx.send_replace(true);
    }
}

fn encode<Msg>(message: &Msg) -> serde_json::Result<String>
where
    Msg: Serialize + OutgoingMessage,
{
    let mut json = serde_json::to_value(message)?;

    if let Some(object) = json.as_object_mut() {
        object.insert(
            "type".to_string(),
            serde_json::Value::String(message.message_type().to_string()),
        );
    }

    serde_json::to_string(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AngleSetMessage, SensorRegisterMessage, TempUpdateMessage, VentRegisterMessage};
    use serde_json::{json, Value};

    fn encoded<Msg: Serialize + OutgoingMessage>(message: Msg) -> Value {
        serde_json::from_str(&encode(&message).unwrap()).unwrap()
    }

    #[test]
    fn test_vent_registration() {
        assert_eq!(
            encoded(VentRegisterMessage::new("ab12cd34", 15, 0, 90)),
            json!({
                "type": "register",
                "deviceType": "vent",
                "deviceId": "ab12cd34",
                "currentAngle": 15,
                "config": { "minAngle": 0, "maxAngle": 90 },
            })
        );
    }

    #[test]
    fn test_sensor_registration() {
        assert_eq!(
            encoded(SensorRegisterMessage::new("56ef78ab", 20.0)),
            json!({
                "type": "register",
                "deviceType": "sensor",
                "deviceId": "56ef78ab",
                "currentTemp": 20.0,
            })
        );
    }

    #[test]
    fn test_angle_set() {
        assert_eq!(
            encoded(AngleSetMessage::new("ab12cd34", 45)),
            json!({
                "type": "angleSet",
                "deviceId": "ab12cd34",
                "angle": 45,
            })
        );
    }

    #[test]
    fn test_temp_update_rounds_to_one_decimal() {
        assert_eq!(
            encoded(TempUpdateMessage::new("56ef78ab", 21.017)),
            json!({
                "type": "tempUpdate",
                "deviceId": "56ef78ab",
                "temperature": 21.0,
            })
        );

        assert_eq!(
            encoded(TempUpdateMessage::new("56ef78ab", 19.25)),
            json!({
                "type": "tempUpdate",
                "deviceId": "56ef78ab",
                "temperature": 19.3,
            })
        );
    }
}
