//! The BLE side of the conversation.
//!
//! [`Transport`] and [`Connection`] are the only things the protocol code needs
//! from a Bluetooth stack. [`BleTransport`] provides them on top of `bluest`.

use std::time::Duration;

use anyhow::anyhow;
use bluest::Adapter;
use bluest::Characteristic;
use bluest::Device;
use bluest::Uuid;
use futures_util::stream::LocalBoxStream;
use futures_util::StreamExt;
use tokio::time::{sleep, timeout};

/// Characteristic the encrypted command is written to (FFF3)
pub const WRITE_CHARACTERISTIC_ID: Uuid = Uuid::from_u128(0x0000fff3_0000_1000_8000_00805f9b34fb);
/// Characteristic the encrypted notifications arrive on (FFF4)
pub const NOTIFY_CHARACTERISTIC_ID: Uuid = Uuid::from_u128(0x0000fff4_0000_1000_8000_00805f9b34fb);

/// One advertisement seen during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAdvertisement {
    pub address: String,
    pub name: Option<String>,
    pub rssi: Option<i16>,
}

/// A stream of raw, still encrypted, notification payloads.
///
/// Dropping the stream unsubscribes from the notify characteristic.
pub type Notifications<'a> = LocalBoxStream<'a, anyhow::Result<Vec<u8>>>;

#[allow(async_fn_in_trait)]
pub trait Transport {
    type Connection: Connection;

    /// Collect every advertisement seen during the discovery window.
    async fn discover(&self, window: Duration) -> anyhow::Result<Vec<DeviceAdvertisement>>;

    async fn connect(&self, address: &str, timeout: Duration) -> anyhow::Result<Self::Connection>;
}

#[allow(async_fn_in_trait)]
pub trait Connection {
    /// Write to the command characteristic, waiting for the device to acknowledge.
    async fn write_command(&self, frame: &[u8]) -> anyhow::Result<()>;

    async fn subscribe(&self) -> anyhow::Result<Notifications<'_>>;

    async fn close(self) -> anyhow::Result<()>;
}

pub struct BleTransport {
    adapter: Adapter,
}

impl BleTransport {
    /// Open the default adapter and wait until it is powered on.
    pub async fn new() -> anyhow::Result<Self> {
        let adapter = Adapter::default()
            .await
            .ok_or(anyhow!("Default adapter not found"))?;
        adapter.wait_available().await?;
        Ok(Self { adapter })
    }
}

impl Transport for BleTransport {
    type Connection = BleConnection;

    async fn discover(&self, window: Duration) -> anyhow::Result<Vec<DeviceAdvertisement>> {
        let adapter_events = self.adapter.scan(&[]).await?;
        let seen: Vec<_> = adapter_events.take_until(sleep(window)).collect().await;

        let mut advertisements = Vec::with_capacity(seen.len());
        for device in seen {
            let name = match device.adv_data.local_name {
                Some(name) => Some(name),
                None => device.device.name_async().await.ok(),
            };
            advertisements.push(DeviceAdvertisement {
                address: device.device.id().to_string(),
                name,
                rssi: device.rssi,
            });
        }

        tracing::debug!(count = advertisements.len(), "discovery window closed");
        Ok(advertisements)
    }

    async fn connect(&self, address: &str, connect_timeout: Duration) -> anyhow::Result<BleConnection> {
        let device = timeout(connect_timeout, self.find_device(address))
            .await
            .map_err(|_| anyhow!("Device with address {address} was not found"))??;

        timeout(connect_timeout, self.adapter.connect_device(&device))
            .await
            .map_err(|_| anyhow!("Timed out connecting to {address}"))??;
        tracing::debug!(address, "connected");

        let write = Self::find_characteristic(&device, WRITE_CHARACTERISTIC_ID).await?;
        let notify = Self::find_characteristic(&device, NOTIFY_CHARACTERISTIC_ID).await?;

        Ok(BleConnection { adapter: self.adapter.clone(), device, write, notify })
    }
}

impl BleTransport {
    async fn find_device(&self, address: &str) -> anyhow::Result<Device> {
        let mut adapter_events = self.adapter.scan(&[]).await?;
        while let Some(device) = adapter_events.next().await {
            if device.device.id().to_string() == address {
                return Ok(device.device);
            }
        }

        Err(anyhow!("Device with address {address} was not found"))
    }

    async fn find_characteristic(device: &Device, uuid: Uuid) -> anyhow::Result<Characteristic> {
        for service in device.discover_services().await? {
            if let Some(characteristic) = service
                .discover_characteristics_with_uuid(uuid)
                .await?
                .first()
            {
                return Ok(characteristic.clone());
            }
        }

        Err(anyhow!("Characteristic {uuid} not found"))
    }
}

pub struct BleConnection {
    adapter: Adapter,
    device: Device,
    write: Characteristic,
    notify: Characteristic,
}

impl Connection for BleConnection {
    async fn write_command(&self, frame: &[u8]) -> anyhow::Result<()> {
        self.write.write(frame).await?;
        Ok(())
    }

    async fn subscribe(&self) -> anyhow::Result<Notifications<'_>> {
        let reader = self.notify.notify().await?;
        Ok(reader.map(|data| data.map_err(anyhow::Error::from)).boxed_local())
    }

    /// Disconnect from the monitor
    async fn close(self) -> anyhow::Result<()> {
        self.adapter.disconnect_device(&self.device).await?;
        Ok(())
    }
}
