//! Read voltage, temperature and state of charge from Ancel BM300 Pro battery monitors over Bluetooth Low Energy
//!
//! The monitor exposes two GATT characteristics: commands are written to `FFF3` and
//! readings arrive as notifications on `FFF4`. Every message is a single AES-128-CBC
//! block under a key shared by all devices of this model.
//!
//! A read sends the poll command `d1550700...`, then listens until a notification
//! starting with the same header arrives. That notification carries:
//!
//! - Battery voltage (V)
//! - Temperature (°C)
//! - State of charge (%)
//!
//! # Example
//!
//! ```no_run
//! # #[tokio::main]
//! # pub async fn main() -> anyhow::Result<()> {
//!     let transport = bm300::BleTransport::new().await?;
//!     let config = bm300::Config::default();
//!     for device in bm300::scan_devices(&transport, &config).await? {
//!         let reading = bm300::read_device(&transport, device.address(), &config).await?;
//!         println!("{reading:?}");
//!     }
//! #   Ok(())
//! # }
//! ```

mod config;
mod error;
mod frame_codec;
mod message;
mod output;
mod reading;
mod scan;
mod session;
mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use frame_codec::{FrameCodec, FRAME_LEN, KEY};
pub use message::{parse, FrameOutcome, ReadingMessage};
pub use output::{render_reading, render_scan, Format};
pub use reading::Reading;
pub use scan::{filter_devices, scan_devices, ScannedDevice, DEVICE_NAME};
pub use session::{read_device, ReadingSession, SessionState};
pub use transport::{BleConnection, BleTransport, Connection, DeviceAdvertisement, Notifications, Transport};
