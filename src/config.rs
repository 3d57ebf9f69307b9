use std::time::Duration;

/// Timeouts for talking to the monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// How long to listen for advertisements when scanning
    pub scan_timeout: Duration,
    /// How long to spend finding and connecting to a device
    pub connect_timeout: Duration,
    /// How long to wait for a reading once the poll command has been sent
    pub read_timeout: Duration,
}

impl Config {
    pub const DEFAULT_SCAN_TIMEOUT_S: u64 = 7;
    pub const DEFAULT_CONNECT_TIMEOUT_S: u64 = 30;
    pub const DEFAULT_READ_TIMEOUT_S: u64 = 30;

    pub fn from_secs(scan_timeout_s: u64, connect_timeout_s: u64, read_timeout_s: u64) -> Self {
        Self {
            scan_timeout: Duration::from_secs(scan_timeout_s),
            connect_timeout: Duration::from_secs(connect_timeout_s),
            read_timeout: Duration::from_secs(read_timeout_s),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_secs(
            Self::DEFAULT_SCAN_TIMEOUT_S,
            Self::DEFAULT_CONNECT_TIMEOUT_S,
            Self::DEFAULT_READ_TIMEOUT_S,
        )
    }
}

#[test]
fn test_default_timeouts() {
    let config = Config::default();
    assert_eq!(config.scan_timeout, Duration::from_secs(7));
    assert_eq!(config.connect_timeout, Duration::from_secs(30));
    assert_eq!(config.read_timeout, Duration::from_secs(30));
}
