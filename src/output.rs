//! Rendering of scan results and readings for the command line.

use std::fmt::Display;

use crate::reading::{Reading, ReadingView};
use crate::scan::ScannedDevice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    #[default]
    Ascii,
    Json,
}

pub fn render_scan(devices: &[ScannedDevice], format: Format) -> serde_json::Result<String> {
    match format {
        Format::Ascii if devices.is_empty() => Ok("No Ancel BM300 Pro devices found.\n".to_string()),
        Format::Ascii => {
            let mut out = String::from("Address           RSSI\n");
            for device in devices {
                out.push_str(&format!("{} {}\n", device.address(), or_blank(device.rssi())));
            }
            Ok(out)
        }
        Format::Json => Ok(format!("{}\n", serde_json::to_string(devices)?)),
    }
}

pub fn render_reading(reading: &Reading, format: Format) -> serde_json::Result<String> {
    match format {
        Format::Ascii => Ok(format!(
            "Voltage: {}V\nTemperature: {}C\nSoC: {}%\n",
            // Debug keeps the fractional digit on whole volts: 5.0, not 5
            reading.voltage().map(|v| format!("{v:?}")).unwrap_or_default(),
            or_blank(reading.temperature_c),
            or_blank(reading.soc_pct),
        )),
        Format::Json => Ok(format!("{}\n", serde_json::to_string(&ReadingView::from(reading))?)),
    }
}

fn or_blank<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> Reading {
        Reading { voltage_cv: Some(1284), temperature_c: Some(-5), soc_pct: Some(87) }
    }

    #[test]
    fn test_render_reading_ascii() {
        assert_eq!(
            render_reading(&reading(), Format::Ascii).unwrap(),
            "Voltage: 12.84V\nTemperature: -5C\nSoC: 87%\n"
        );
    }

    #[test]
    fn test_render_reading_whole_volts() {
        let reading = Reading { voltage_cv: Some(500), temperature_c: Some(0), soc_pct: None };
        assert_eq!(
            render_reading(&reading, Format::Ascii).unwrap(),
            "Voltage: 5.0V\nTemperature: 0C\nSoC: %\n"
        );
    }

    #[test]
    fn test_render_reading_json() {
        assert_eq!(
            render_reading(&reading(), Format::Json).unwrap(),
            "{\"voltage\":12.84,\"temperature\":-5,\"soc\":87}\n"
        );
    }

    #[test]
    fn test_render_scan_ascii() {
        let devices = vec![
            ScannedDevice("A4:C1:38:00:00:01".to_string(), Some(-60)),
            ScannedDevice("A4:C1:38:00:00:02".to_string(), Some(-72)),
        ];
        assert_eq!(
            render_scan(&devices, Format::Ascii).unwrap(),
            "Address           RSSI\nA4:C1:38:00:00:01 -60\nA4:C1:38:00:00:02 -72\n"
        );
    }

    #[test]
    fn test_render_scan_empty() {
        assert_eq!(render_scan(&[], Format::Ascii).unwrap(), "No Ancel BM300 Pro devices found.\n");
        assert_eq!(render_scan(&[], Format::Json).unwrap(), "[]\n");
    }

    #[test]
    fn test_render_scan_json() {
        let devices = vec![ScannedDevice("A4:C1:38:00:00:01".to_string(), Some(-60))];
        assert_eq!(render_scan(&devices, Format::Json).unwrap(), "[[\"A4:C1:38:00:00:01\",-60]]\n");
    }
}
