use std::time::Duration;

/// Errors raised while talking to a BM300 Pro.
///
/// The frame-level variants are recoverable: a session that meets one of them
/// drops the offending notification and keeps waiting. Everything sourced from
/// the transport ends the current read or scan.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid frame length: {0} bytes is not a positive multiple of 16")]
    InvalidFrameLength(usize),

    #[error("truncated frame: {0} bytes")]
    TruncatedFrame(usize),

    #[error("{0}")]
    TransportWrite(anyhow::Error),

    #[error("{0}")]
    TransportConnection(anyhow::Error),

    #[error("{0}")]
    Discovery(anyhow::Error),

    #[error("no reading received within {0:?}")]
    Timeout(Duration),

    #[error("notification stream ended before a reading was received")]
    NotificationsClosed,
}

impl Error {
    /// Whether the error only concerns a single frame and the session can carry on.
    pub fn is_frame_error(&self) -> bool {
        matches!(self, Error::InvalidFrameLength(_) | Error::TruncatedFrame(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[test]
fn test_transport_error_displays_unchanged() {
    let err = Error::TransportConnection(anyhow::anyhow!("The Bluetooth device is not ready for use."));
    assert_eq!(err.to_string(), "The Bluetooth device is not ready for use.");
    assert!(!err.is_frame_error());
}

#[test]
fn test_frame_errors_are_recoverable() {
    assert!(Error::TruncatedFrame(4).is_frame_error());
    assert!(Error::InvalidFrameLength(15).is_frame_error());
}
