use serde::Serialize;

use crate::message::ReadingMessage;

/// The reported state of the battery monitor.
///
/// Starts empty and is filled in from reading notifications. Each field is set
/// by the first notification that carries it and never overwritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reading {
    /// The battery voltage in V/100
    pub voltage_cv: Option<u16>,
    /// The temperature in °C. The monitor does not report below 0°C in practice.
    pub temperature_c: Option<i16>,
    /// The state of charge of the battery in %
    pub soc_pct: Option<u8>,
}

impl Reading {
    /// The battery voltage in V
    pub fn voltage(&self) -> Option<f64> {
        self.voltage_cv.map(|cv| f64::from(cv) / 100.0)
    }

    /// A reading is complete once voltage and temperature are known. The state
    /// of charge arrives in the same notification and is not waited on.
    pub fn is_complete(&self) -> bool {
        self.voltage_cv.is_some() && self.temperature_c.is_some()
    }

    /// Fill in whichever fields are still missing. Returns whether anything changed.
    pub fn merge(&mut self, msg: &ReadingMessage) -> bool {
        let before = *self;
        self.voltage_cv.get_or_insert(msg.voltage_cv);
        self.temperature_c.get_or_insert(msg.temperature_c);
        self.soc_pct.get_or_insert(msg.soc_pct);
        before != *self
    }
}

/// The JSON shape printed by the command line tool.
#[derive(Serialize)]
pub(crate) struct ReadingView {
    pub voltage: Option<f64>,
    pub temperature: Option<i16>,
    pub soc: Option<u8>,
}

impl From<&Reading> for ReadingView {
    fn from(reading: &Reading) -> Self {
        Self {
            voltage: reading.voltage(),
            temperature: reading.temperature_c,
            soc: reading.soc_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST: ReadingMessage = ReadingMessage { voltage_cv: 412, temperature_c: -5, soc_pct: 40 };
    const SECOND: ReadingMessage = ReadingMessage { voltage_cv: 1284, temperature_c: 21, soc_pct: 87 };

    #[test]
    fn test_completeness() {
        let mut reading = Reading::default();
        assert!(!reading.is_complete());

        reading.voltage_cv = Some(412);
        assert!(!reading.is_complete());

        reading.temperature_c = Some(0);
        assert!(reading.is_complete());
        assert_eq!(reading.soc_pct, None);
    }

    #[test]
    fn test_merge_first_write_wins() {
        let mut reading = Reading { voltage_cv: Some(1300), ..Default::default() };
        assert!(reading.merge(&FIRST));
        assert!(!reading.merge(&SECOND));

        assert_eq!(
            reading,
            Reading { voltage_cv: Some(1300), temperature_c: Some(-5), soc_pct: Some(40) }
        );
    }

    #[test]
    fn test_voltage_scale() {
        let mut reading = Reading::default();
        reading.merge(&FIRST);
        assert_eq!(reading.voltage(), Some(4.12));
        assert_eq!(Reading::default().voltage(), None);
    }
}
