use std::collections::HashMap;

use log::{error, info};
use uuid::Uuid;

use crate::device::Device;
use crate::session::{DeviceHandle, Session};
use crate::{Error, Result};

/// The whole simulated device population, one session per device.
pub struct Fleet {
    devices: HashMap<String, DeviceHandle>,
}

impl std::fmt::Debug for Fleet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fleet")
            .field("devices", &self.devices.len())
            .finish()
    }
}

impl Fleet {
    /// Connects and registers every requested device, vents first. A
    /// device that fails to connect is logged and left out, the rest of
    /// the fleet goes on. Fails only if nothing connected at all.
    pub async fn start(server: &str, vents: usize, sensors: usize) -> Result<Fleet> {
        info!("starting fleet with {} vents and {} sensors", vents, sensors);

        let mut devices = HashMap::new();

        for _ in 0..vents {
            let device = Device::vent(unique_device_id(&devices));
            Self::add_device(server, device, &mut devices).await;
        }

        for _ in 0..sensors {
            let device = Device::sensor(unique_device_id(&devices));
            Self::add_device(server, device, &mut devices).await;
        }

        if devices.is_empty() && vents + sensors > 0 {
            return Err(Error::EmptyFleet);
        }

        info!("fleet is up, {} devices connected", devices.len());

        Ok(Fleet { devices })
    }

    async fn add_device(
        server: &str,
        device: Device,
        devices: &mut HashMap<String, DeviceHandle>,
    ) {
        let kind = device.kind();
        let id = device.id.clone();

        let mut session = Session::new(device);

        match session.connect(server).await {
            Ok(()) => {
                devices.insert(id, session.spawn());
            }
            Err(error) => error!("{} {}: unable to connect: {}", kind, id, error),
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Closes every session best-effort, then waits for all per-device
    /// tasks to finish.
    pub async fn shutdown(self) {
        info!("shutting down {} devices", self.devices.len());

        let mut handles = Vec::with_capacity(self.devices.len());

        for (id, handle) in self.devices {
            if let Err(error) = handle.close().await {
                error!("{} {}: unable to close session: {}", handle.kind(), id, error);
            }

            handles.push(handle);
        }

        for handle in handles {
            handle.join().await;
        }

        info!("fleet stopped");
    }
}

fn unique_device_id(devices: &HashMap<String, DeviceHandle>) -> String {
    loop {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(8);

        if !devices.contains_key(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::time::Duration;

    use futures_util::StreamExt;
    use serde_json::Value;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;
    use tokio::time;
    use tokio_tungstenite::accept_async;

    #[tokio::test]
    async fn test_fleet_starts_and_shuts_down() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("ws://{}", listener.local_addr().unwrap());

        let (tx, mut rx) = mpsc::unbounded_channel();

        let server = tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(accepted) => accepted,
                    Err(_) => break,
                };

                let tx = tx.clone();

                tokio::spawn(async move {
                    let mut ws = accept_async(stream).await.unwrap();

                    if let Some(Ok(first)) = ws.next().await {
                        let register: Value =
                            serde_json::from_str(first.to_text().unwrap()).unwrap();
                        tx.send(register).unwrap();
                    }

                    while let Some(Ok(_)) = ws.next().await {}
                });
            }
        });

        let fleet = Fleet::start(&addr, 3, 2).await.unwrap();
        assert_eq!(fleet.len(), 5);

        let mut vents = 0;
        let mut sensors = 0;
        let mut ids = HashSet::new();

        for _ in 0..5 {
            let register = rx.recv().await.unwrap();
            assert_eq!(register["type"], "register");

            match register["deviceType"].as_str().unwrap() {
                "vent" => vents += 1,
                "sensor" => sensors += 1,
                other => panic!("unexpected device type {other}"),
            }

            assert!(ids.insert(register["deviceId"].as_str().unwrap().to_string()));
        }

        assert_eq!(vents, 3);
        assert_eq!(sensors, 2);

        time::timeout(Duration::from_secs(1), fleet.shutdown())
            .await
            .unwrap();

        server.abort();
    }

    #[tokio::test]
    async fn test_connect_failure_skips_the_device() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("ws://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            // first connection is dropped before the handshake completes
            let (stream, _) = listener.accept().await.unwrap();
            drop(stream);

            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(accepted) => accepted,
                    Err(_) => break,
                };

                tokio::spawn(async move {
                    let mut ws = accept_async(stream).await.unwrap();
                    while let Some(Ok(_)) = ws.next().await {}
                });
            }
        });

        let fleet = Fleet::start(&addr, 3, 0).await.unwrap();
        assert_eq!(fleet.len(), 2);

        time::timeout(Duration::from_secs(1), fleet.shutdown())
            .await
            .unwrap();

        server.abort();
    }

    #[tokio::test]
    async fn test_empty_fleet_is_an_error() {
        let error = Fleet::start("ws://127.0.0.1:1", 1, 1).await.unwrap_err();
        assert!(matches!(error, Error::EmptyFleet));
    }

    #[test]
    fn test_device_ids_are_short_hex() {
        let devices = HashMap::new();
        let mut seen = HashSet::new();

        for _ in 0..100 {
            let id = unique_device_id(&devices);

            assert_eq!(id.len(), 8);
            assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
            assert!(seen.insert(id));
        }
    }
}
