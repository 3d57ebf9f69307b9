use crate::error::{Error, Result};

/// Every reading notification starts with these bytes. The acknowledgement
/// `d15507ff...` and anything else is ignored.
const HEADER: [u8; 4] = [0xd1, 0x55, 0x07, 0x00];

/// The last byte a reading notification needs is the low byte of the voltage.
const MIN_LEN: usize = 9;

const TEMPERATURE_SIGN_OFFSET: usize = 3;
const TEMPERATURE_OFFSET: usize = 4;
const SOC_OFFSET: usize = 6;
const VOLTAGE_OFFSET: usize = 7;

/// The value of the temperature sign byte which marks a negative temperature.
const NEGATIVE: u8 = 0x01;

/// A decoded reading notification.
///
/// Byte layout of the decrypted frame:
///
/// Byte | Meaning
/// 0-3  | A constant header `d1 55 07 00`
/// 3    | Temperature sign, `01` for negative (overlaps the header)
/// 4    | Temperature magnitude in °C
/// 6    | State of charge in %
/// 7-8  | Battery voltage in V/100, low nibble of byte 7 then byte 8
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingMessage {
    /// The battery voltage in V/100
    pub voltage_cv: u16,
    /// The temperature in °C
    pub temperature_c: i16,
    /// The state of charge in %
    pub soc_pct: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Ignored,
    Reading(ReadingMessage),
}

/// Interpret a decrypted notification.
///
/// Returns [`Error::TruncatedFrame`] when the header matches but the frame is too
/// short to hold the fields. Callers should drop the frame and keep listening.
pub fn parse(decrypted: &[u8]) -> Result<FrameOutcome> {
    if !decrypted.starts_with(&HEADER) {
        return Ok(FrameOutcome::Ignored);
    }

    if decrypted.len() < MIN_LEN {
        return Err(Error::TruncatedFrame(decrypted.len()));
    }

    Ok(FrameOutcome::Reading(ReadingMessage {
        voltage_cv: decode_voltage(decrypted[VOLTAGE_OFFSET], decrypted[VOLTAGE_OFFSET + 1]),
        temperature_c: decode_temperature(
            decrypted[TEMPERATURE_SIGN_OFFSET],
            decrypted[TEMPERATURE_OFFSET],
        ),
        soc_pct: decrypted[SOC_OFFSET],
    }))
}

/// The voltage is the three hex digits starting at the low nibble of `high`.
fn decode_voltage(high: u8, low: u8) -> u16 {
    (u16::from(high & 0x0f) << 8) | u16::from(low)
}

/// Sign-magnitude, not two's complement.
fn decode_temperature(sign: u8, magnitude: u8) -> i16 {
    if sign == NEGATIVE {
        -i16::from(magnitude)
    } else {
        i16::from(magnitude)
    }
}
