use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::transport::{DeviceAdvertisement, Transport};

/// The name every BM300 Pro advertises with. Matched exactly.
pub const DEVICE_NAME: &str = "BM300 Pro";

/// A monitor found by a scan, serialized as `[address, rssi]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannedDevice(pub String, pub Option<i16>);

impl ScannedDevice {
    pub fn address(&self) -> &str {
        &self.0
    }

    pub fn rssi(&self) -> Option<i16> {
        self.1
    }
}

/// Keep the BM300 Pro monitors among the given advertisements.
///
/// A device that advertised more than once keeps the position of its first
/// advertisement and the name and signal strength of its last one.
pub fn filter_devices<I>(advertisements: I) -> Vec<ScannedDevice>
where
    I: IntoIterator<Item = DeviceAdvertisement>,
{
    let mut latest: Vec<DeviceAdvertisement> = Vec::new();
    for advertisement in advertisements {
        match latest.iter_mut().find(|a| a.address == advertisement.address) {
            Some(seen) => *seen = advertisement,
            None => latest.push(advertisement),
        }
    }

    latest
        .into_iter()
        .filter(|a| a.name.as_deref() == Some(DEVICE_NAME))
        .map(|a| ScannedDevice(a.address, a.rssi))
        .collect()
}

/// Listen for the configured window and return the monitors seen.
pub async fn scan_devices<T: Transport>(transport: &T, config: &Config) -> Result<Vec<ScannedDevice>> {
    let advertisements = transport
        .discover(config.scan_timeout)
        .await
        .map_err(Error::Discovery)?;

    let devices = filter_devices(advertisements);
    tracing::debug!(?devices, "scan finished");
    Ok(devices)
}
