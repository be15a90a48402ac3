use std::time::Duration;

use hub::{
    AngleSetMessage, Command, SensorRegisterMessage, TempUpdateMessage, VentRegisterMessage,
    WsClient, WsError,
};
use log::{debug, error, info, warn};
use tokio::task::{self, JoinHandle};
use tokio::time;

use crate::device::{Device, DeviceKind, DeviceModel, SensorState, VentState};
use crate::Result;

const TELEMETRY_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Connecting,
    Registered,
    Active,
    Closed,
}

/// Connection lifecycle for a single device. Registration goes out
/// before any command processing or telemetry starts.
pub struct Session {
    device: Device,
    client: Option<WsClient>,
    state: SessionState,
}

impl Session {
    pub fn new(device: Device) -> Session {
        Session {
            device,
            client: None,
            state: SessionState::Created,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub async fn connect(&mut self, server: &str) -> Result<()> {
        self.state = SessionState::Connecting;

        match self.try_connect(server).await {
            Ok(client) => {
                self.client = Some(client);
                self.state = SessionState::Registered;

                info!("{} {} registered", self.device.kind(), self.device.id);

                Ok(())
            }
            Err(error) => {
                self.state = SessionState::Closed;
                Err(error.into())
            }
        }
    }

    async fn try_connect(&self, server: &str) -> hub::Result<WsClient> {
        let mut client = WsClient::connect(server).await?;

        match &self.device.model {
            DeviceModel::Vent(state) => {
                client
                    .send_message(VentRegisterMessage::new(
                        &self.device.id,
                        state.current_angle(),
                        state.min_angle(),
                        state.max_angle(),
                    ))
                    .await?
            }
            DeviceModel::Sensor(state) => {
                client
                    .send_message(SensorRegisterMessage::new(
                        &self.device.id,
                        state.current_temp(),
                    ))
                    .await?
            }
        }

        Ok(client)
    }

    /// Launches the device's receive loop and, for sensors, its telemetry
    /// cycle as independent tasks.
    pub fn spawn(mut self) -> DeviceHandle {
        self.state = SessionState::Active;

        let client = self.client.take().expect("connected session");
        let kind = self.device.kind();
        let Device { id, model } = self.device;

        let mut tasks = Vec::with_capacity(2);

        match model {
            DeviceModel::Vent(state) => {
                tasks.push(task::spawn(vent_loop(client.clone(), id.clone(), state)));
            }
            DeviceModel::Sensor(state) => {
                tasks.push(task::spawn(sensor_loop(client.clone(), id.clone())));
                tasks.push(task::spawn(telemetry_loop(
                    client.clone(),
                    id.clone(),
                    state,
                    TELEMETRY_INTERVAL,
                )));
            }
        }

        DeviceHandle {
            id,
            kind,
            client,
            tasks,
        }
    }
}

pub struct DeviceHandle {
    id: String,
    kind: DeviceKind,
    client: WsClient,
    tasks: Vec<JoinHandle<()>>,
}

impl DeviceHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn is_closed(&self) -> bool {
        self.client.is_closed()
    }

    pub async fn close(&self) -> hub::Result<()> {
        self.client.close().await
    }

    pub async fn join(self) {
        for task in self.tasks {
            _ = task.await;
        }
    }
}

async fn vent_loop(mut client: WsClient, device_id: String, mut state: VentState) {
    let session = client.clone();

    loop {
        let next = tokio::select! {
            next = client.read_message() => next,
            _ = session.closed() => break,
        };

        match next {
            Ok(Command::SetAngle { angle }) => match state.try_set_angle(angle) {
                Ok(()) => {
                    if let Err(error) = client
                        .send_message(AngleSetMessage::new(&device_id, angle))
                        .await
                    {
                        error!("vent {}: unable to send ack: {}", device_id, error);
                        break;
                    }

                    info!("vent {} angle set to {}", device_id, angle);
                }
                // rejected commands are logged only, nothing goes back to the hub
                Err(error) => warn!("vent {}: {}", device_id, error),
            },
            Err(WsError::Pong) => (),
            Err(WsError::CannotParse(error)) => {
                warn!("vent {}: dropped malformed message: {}", device_id, error)
            }
            Err(WsError::UnexpectedMessage(message)) => {
                warn!("vent {}: unexpected message: {:?}", device_id, message)
            }
            Err(WsError::StreamClosed) | Err(WsError::SessionClosed) => break,
            Err(WsError::WebSocketError(error)) => {
                error!("vent {}: websocket error: {}", device_id, error);
                break;
            }
        }
    }

    info!("vent {} disconnected", device_id);
}

async fn sensor_loop(mut client: WsClient, device_id: String) {
    let session = client.clone();

    loop {
        let next = tokio::select! {
            next = client.read_message() => next,
            _ = session.closed() => break,
        };

        match next {
            // sensors accept no commands
            Ok(command) => info!("sensor {} ignoring {:?}", device_id, command),
            Err(WsError::Pong) => (),
            Err(WsError::CannotParse(error)) => {
                warn!("sensor {}: dropped malformed message: {}", device_id, error)
            }
            Err(WsError::UnexpectedMessage(message)) => {
                warn!("sensor {}: unexpected message: {:?}", device_id, message)
            }
            Err(WsError::StreamClosed) | Err(WsError::SessionClosed) => break,
            Err(WsError::WebSocketError(error)) => {
                error!("sensor {}: websocket error: {}", device_id, error);
                break;
            }
        }
    }

    info!("sensor {} disconnected", device_id);
}

async fn telemetry_loop(
    mut client: WsClient,
    device_id: String,
    mut state: SensorState,
    interval: Duration,
) {
    let session = client.clone();

    loop {
        tokio::select! {
            _ = time::sleep(interval) => (),
            _ = session.closed() => break,
        }

        let temperature = state.drift();

        match client
            .send_message(TempUpdateMessage::new(&device_id, temperature))
            .await
        {
            Ok(()) => debug!("sensor {} reported {:.1}", device_id, temperature),
            Err(error) => {
                error!("sensor {}: unable to send telemetry: {}", device_id, error);
                break;
            }
        }
    }
}
